//! Local file headers and records.

use super::constants::LOCAL_FILE_HEADER_SIGNATURE;
use crate::{
	dos::{DosDate, DosTime},
	record,
};

record! {
	@size_of(Self::wire_size)
	/// Local file header, immediately before each entry's data.
	#[derive(Clone, Debug, PartialEq, Eq)]
	pub struct LocalFileHeader {
		/// Always [`LOCAL_FILE_HEADER_SIGNATURE`].
		pub signature: [u8; 4],
		/// Version needed to extract.
		pub version_needed: u16,
		/// General purpose bit flags, see [`flags`](super::flags).
		pub flags: u16,
		/// Raw [`CompressionMethod`](super::CompressionMethod).
		pub compression_method: u16,
		/// Last modification time.
		pub last_mod_file_time: DosTime,
		/// Last modification date.
		pub last_mod_file_date: DosDate,
		/// CRC-32 of the uncompressed data.
		pub crc32: u32,
		/// Size of the data as stored.
		pub compressed_size: u32,
		/// Size of the data once extracted.
		pub uncompressed_size: u32,
		/// Length of `file_name`.
		pub file_name_length: u16,
		/// Length of `extra_field`.
		pub extra_field_length: u16,
		/// Entry name, `/`-separated.
		#[serial("len=file_name_length")]
		pub file_name: Vec<u8>,
		/// Extra field blocks.
		#[serial("len=extra_field_length")]
		pub extra_field: Vec<u8>,
	}
}

impl LocalFileHeader {
	/// Size of the header without its name and extra field.
	pub const FIXED_LENGTH: u64 = 30;

	fn wire_size(&self) -> u64 {
		Self::FIXED_LENGTH + self.file_name.len() as u64 + self.extra_field.len() as u64
	}
}

impl Default for LocalFileHeader {
	fn default() -> Self {
		Self {
			signature: LOCAL_FILE_HEADER_SIGNATURE,
			version_needed: Default::default(),
			flags: Default::default(),
			compression_method: Default::default(),
			last_mod_file_time: Default::default(),
			last_mod_file_date: Default::default(),
			crc32: Default::default(),
			compressed_size: Default::default(),
			uncompressed_size: Default::default(),
			file_name_length: Default::default(),
			extra_field_length: Default::default(),
			file_name: Default::default(),
			extra_field: Default::default(),
		}
	}
}

record! {
	/// Trailer with the CRC and sizes, for entries written before those were known.
	#[derive(Clone, Debug, Default, PartialEq, Eq)]
	pub struct DataDescriptor {
		/// CRC-32 of the uncompressed data.
		pub crc32: u32,
		/// Size of the data as stored.
		pub compressed_size: u32,
		/// Size of the data once extracted.
		pub uncompressed_size: u32,
	}
}

record! {
	/// A local file header, the entry's data, and its data descriptor if it has one.
	#[derive(Clone, Debug, Default, PartialEq, Eq)]
	pub struct LocalFileRecord {
		/// Header.
		pub local_file_header: LocalFileHeader,
		/// Entry data, possibly compressed.
		#[serial("len=local_file_header.compressed_size")]
		pub file_data: Vec<u8>,
		/// Present when the header has the data descriptor flag.
		#[serial("condition=bit(local_file_header.flags, 3)")]
		pub data_descriptor: Option<DataDescriptor>,
	}
}

#[cfg(test)]
mod tests {
	use std::io::Cursor;

	use super::*;
	use crate::{
		format::flags,
		serial::{self, Serial},
	};

	fn header_bytes(flags: u16, name: &[u8], compressed_size: u32) -> Vec<u8> {
		let mut bytes = Vec::new();
		bytes.extend_from_slice(b"PK\x03\x04");
		bytes.extend_from_slice(&20_u16.to_le_bytes());
		bytes.extend_from_slice(&flags.to_le_bytes());
		bytes.extend_from_slice(&0_u16.to_le_bytes());
		bytes.extend_from_slice(&DosTime::new(12, 0, 0).to_raw().to_le_bytes());
		bytes.extend_from_slice(&DosDate::new(2020, 6, 15).to_raw().to_le_bytes());
		bytes.extend_from_slice(&0xDEAD_BEEF_u32.to_le_bytes());
		bytes.extend_from_slice(&compressed_size.to_le_bytes());
		bytes.extend_from_slice(&compressed_size.to_le_bytes());
		bytes.extend_from_slice(&(name.len() as u16).to_le_bytes());
		bytes.extend_from_slice(&0_u16.to_le_bytes());
		bytes.extend_from_slice(name);
		bytes
	}

	#[test]
	fn name_length_drives_name() {
		let mut bytes = header_bytes(0, b"hello", 0);
		bytes.extend_from_slice(b"trailing");
		let mut stream = Cursor::new(&bytes[..]);

		let header: LocalFileHeader = serial::decode(&mut stream).unwrap();
		assert_eq!(header.file_name, b"hello");
		assert!(header.extra_field.is_empty());
		assert_eq!(header.last_mod_file_date, DosDate::new(2020, 6, 15));
		assert_eq!(stream.position(), LocalFileHeader::FIXED_LENGTH + 5);
		assert_eq!(header.size_of(), LocalFileHeader::FIXED_LENGTH + 5);
	}

	#[test]
	fn data_descriptor_when_flagged() {
		let mut bytes = header_bytes(flags::DATA_DESCRIPTOR, b"f", 3);
		bytes.extend_from_slice(b"abc");
		bytes.extend_from_slice(&1_u32.to_le_bytes());
		bytes.extend_from_slice(&3_u32.to_le_bytes());
		bytes.extend_from_slice(&3_u32.to_le_bytes());
		let mut stream = Cursor::new(&bytes[..]);

		let record: LocalFileRecord = serial::decode(&mut stream).unwrap();
		assert_eq!(record.file_data, b"abc");
		assert_eq!(record.data_descriptor, Some(DataDescriptor {
			crc32: 1,
			compressed_size: 3,
			uncompressed_size: 3,
		}));
		assert_eq!(stream.position(), bytes.len() as u64);
		assert_eq!(record.size_of(), bytes.len() as u64);
	}

	#[test]
	fn no_data_descriptor_when_not_flagged() {
		let mut bytes = header_bytes(0, b"f", 3);
		bytes.extend_from_slice(b"abc");
		let end = bytes.len() as u64;
		bytes.extend_from_slice(b"PK\x01\x02");
		let mut stream = Cursor::new(&bytes[..]);

		let record: LocalFileRecord = serial::decode(&mut stream).unwrap();
		assert_eq!(record.data_descriptor, None);
		assert_eq!(stream.position(), end);
	}

	#[test]
	fn default_header_has_signature() {
		let header = LocalFileHeader::default();
		assert_eq!(header.signature, LOCAL_FILE_HEADER_SIGNATURE);
		assert_eq!(
			serial::to_bytes(&header).unwrap().len() as u64,
			LocalFileHeader::FIXED_LENGTH
		);
	}
}
