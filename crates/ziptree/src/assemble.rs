//! Laying out file entries as a Zip archive.

use tracing::{debug, instrument};

use crate::{
	entry::FileEntry,
	error::{ErrorKind, Result},
	format::{
		CentralDirectoryFileHeader, CentralDirectoryRecord, EndOfCentralDirectoryRecord,
		FileFormat, HostSystem, LocalFileHeader, LocalFileRecord, LATEST_VERSION,
	},
	serial::Serial,
};

/// Build the archive structure for a list of entries.
///
/// Entries are laid out in the order given. Local header offsets and the central directory's
/// size and offset are computed here from the encoded sizes of the records; nothing is written.
///
/// Fails if a size, offset, or count doesn't fit its header field.
#[instrument(level = "debug", skip(entries))]
pub fn build(entries: impl IntoIterator<Item = FileEntry>) -> Result<FileFormat> {
	let version_made_by = HostSystem::current().version_made_by(LATEST_VERSION);

	let mut local_file_records = Vec::new();
	let mut headers = Vec::new();
	let mut offset = 0_u64;
	let mut central_directory_size = 0_u64;

	for entry in entries {
		let version_needed = entry.version_needed();
		let modified = entry.modified_dos();
		let method = u16::from(entry.compression_method);
		let name = entry.path.into_bytes();
		let data = entry.data;

		let file_name_length = fit_u16("file name length", name.len() as u64)?;
		let compressed_size = fit_u32("compressed size", data.len() as u64)?;
		let uncompressed_size = fit_u32("uncompressed size", entry.file_size)?;
		let offset_of_local_header = fit_u32("local header offset", offset)?;

		let local_file_header = LocalFileHeader {
			version_needed,
			flags: 0,
			compression_method: method,
			last_mod_file_time: modified.time,
			last_mod_file_date: modified.date,
			crc32: entry.crc32,
			compressed_size,
			uncompressed_size,
			file_name_length,
			extra_field_length: 0,
			file_name: name.clone(),
			..Default::default()
		};

		let central_header = CentralDirectoryFileHeader {
			version_made_by,
			version_needed,
			flags: 0,
			compression_method: method,
			last_mod_file_time: modified.time,
			last_mod_file_date: modified.date,
			crc32: entry.crc32,
			compressed_size,
			uncompressed_size,
			file_name_length,
			extra_field_length: 0,
			file_comment_length: 0,
			disk_number_start: 0,
			internal_file_attributes: 0,
			external_file_attributes: entry.attributes,
			offset_of_local_header,
			file_name: name,
			..Default::default()
		};

		debug!(
			name = %String::from_utf8_lossy(&local_file_header.file_name),
			offset,
			size = compressed_size,
			method,
			modified = %modified,
			"laid out entry"
		);

		offset += local_file_header.size_of() + data.len() as u64;
		central_directory_size += central_header.size_of();

		local_file_records.push(LocalFileRecord {
			local_file_header,
			file_data: data,
			data_descriptor: None,
		});
		headers.push(central_header);
	}

	let total_entries = fit_u16("number of entries", headers.len() as u64)?;
	let end_of_central_directory_record = EndOfCentralDirectoryRecord {
		disk_number: 0,
		start_disk_number: 0,
		disk_total_entries: total_entries,
		total_entries,
		central_directory_size: fit_u32("central directory size", central_directory_size)?,
		central_directory_offset: fit_u32("central directory offset", offset)?,
		..Default::default()
	};
	debug!(
		entries = total_entries,
		central_directory_offset = offset,
		central_directory_size,
		"laid out central directory"
	);

	Ok(FileFormat {
		local_file_records,
		central_directory_record: CentralDirectoryRecord {
			headers,
			digital_signature: None,
		},
		end_of_central_directory_record,
	})
}

fn fit_u16(what: &'static str, value: u64) -> Result<u16> {
	u16::try_from(value).map_err(|_| {
		ErrorKind::TooLarge {
			what,
			value,
			limit: u16::MAX.into(),
		}
		.into()
	})
}

fn fit_u32(what: &'static str, value: u64) -> Result<u32> {
	u32::try_from(value).map_err(|_| {
		ErrorKind::TooLarge {
			what,
			value,
			limit: u32::MAX.into(),
		}
		.into()
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		error::Error,
		format::{CompressionMethod, DEFAULT_VERSION, DEFLATE_VERSION},
		serial,
	};

	#[test]
	fn single_stored_file() {
		let archive = build([FileEntry::file("a.txt", b"0123456789".to_vec())]).unwrap();

		let eocd = &archive.end_of_central_directory_record;
		assert_eq!(eocd.total_entries, 1);
		assert_eq!(eocd.disk_total_entries, 1);

		let local = &archive.local_file_records[0].local_file_header;
		assert_eq!(
			CompressionMethod::try_from(local.compression_method),
			Ok(CompressionMethod::Stored)
		);
		assert_eq!(local.uncompressed_size, 10);
		assert_eq!(local.compressed_size, 10);
		assert_eq!(local.file_name, b"a.txt");
		assert_eq!(local.file_name_length, 5);
		assert_eq!(local.version_needed, DEFAULT_VERSION);

		let central = &archive.central_directory_record.headers[0];
		assert_eq!(central.offset_of_local_header, 0);
		assert_eq!(central.version_made_by & 0xFF, LATEST_VERSION);
		assert_eq!(central.version_made_by >> 8, HostSystem::current() as u16);
		assert_eq!(central.crc32, local.crc32);

		assert_eq!(eocd.central_directory_offset as u64, 30 + 5 + 10);
		assert_eq!(eocd.central_directory_size as u64, 46 + 5);
	}

	#[test]
	fn offsets_accumulate() {
		let archive = build([
			FileEntry::file("one", b"1".to_vec()),
			FileEntry::directory("two"),
			FileEntry::file("two/three", b"333".to_vec()),
		])
		.unwrap();

		let offsets: Vec<u32> = archive
			.central_directory_record
			.headers
			.iter()
			.map(|header| header.offset_of_local_header)
			.collect();
		assert_eq!(offsets, [0, 30 + 3 + 1, 30 + 3 + 1 + 30 + 4]);

		let bytes = serial::to_bytes(&archive).unwrap();
		for (record, header) in archive.entries() {
			let at = header.offset_of_local_header as usize;
			assert_eq!(&bytes[at..at + 4], b"PK\x03\x04");
			assert_eq!(record.local_file_header.file_name, header.file_name);
		}

		let eocd = &archive.end_of_central_directory_record;
		let cd_start = eocd.central_directory_offset as usize;
		assert_eq!(&bytes[cd_start..cd_start + 4], b"PK\x01\x02");
		assert_eq!(
			cd_start + eocd.central_directory_size as usize,
			bytes.len() - 22
		);
	}

	#[test]
	fn directories_and_deflate_need_version_20() {
		let mut deflated = FileEntry::file("d", b"squash squash squash squash".to_vec());
		deflated.deflate(6).unwrap();
		let archive = build([FileEntry::directory("dir"), deflated]).unwrap();

		for (record, header) in archive.entries() {
			assert_eq!(record.local_file_header.version_needed, DEFLATE_VERSION);
			assert_eq!(header.version_needed, DEFLATE_VERSION);
		}

		let header = &archive.local_file_records[1].local_file_header;
		assert_eq!(header.compression_method, 8);
		assert_eq!(header.uncompressed_size, 27);
		assert!(header.compressed_size < header.uncompressed_size);
	}

	#[test]
	fn empty_archive() {
		let archive = build(Vec::<FileEntry>::new()).unwrap();
		assert_eq!(archive.end_of_central_directory_record.total_entries, 0);
		assert_eq!(serial::to_bytes(&archive).unwrap().len(), 22);
	}

	#[test]
	fn name_too_long() {
		let err = build([FileEntry::file("x".repeat(70_000), Vec::new())]).unwrap_err();
		assert!(
			matches!(
				err,
				Error::Simple(ref simple) if matches!(simple.kind, ErrorKind::TooLarge { what: "file name length", .. })
			),
			"{err:?}"
		);
	}

	#[test]
	fn order_preserved() {
		let names = ["c", "a", "b"];
		let archive = build(names.map(|n| FileEntry::file(n, Vec::new()))).unwrap();
		let got: Vec<&[u8]> = archive
			.central_directory_record
			.headers
			.iter()
			.map(|h| h.file_name.as_slice())
			.collect();
		assert_eq!(got, [b"c", b"a", b"b"]);
	}
}
