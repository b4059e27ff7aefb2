//! End of central directory record.

use super::constants::END_OF_CENTRAL_DIRECTORY_SIGNATURE;
use crate::record;

record! {
	@size_of(Self::wire_size)
	/// Trailer of the archive, pointing at the central directory.
	#[derive(Clone, Debug, PartialEq, Eq)]
	pub struct EndOfCentralDirectoryRecord {
		/// Always [`END_OF_CENTRAL_DIRECTORY_SIGNATURE`].
		pub signature: [u8; 4],
		/// Number of this disk.
		pub disk_number: u16,
		/// Disk where the central directory starts.
		pub start_disk_number: u16,
		/// Central directory entries on this disk.
		pub disk_total_entries: u16,
		/// Central directory entries in total.
		pub total_entries: u16,
		/// Size of the central directory in bytes.
		pub central_directory_size: u32,
		/// Offset of the central directory from the start of the archive.
		pub central_directory_offset: u32,
		/// Length of `comment`.
		pub zip_file_comment_length: u16,
		/// Archive comment.
		#[serial("len=zip_file_comment_length")]
		pub comment: Vec<u8>,
	}
}

impl EndOfCentralDirectoryRecord {
	/// Size of the record without its comment.
	pub const FIXED_LENGTH: u64 = 22;

	fn wire_size(&self) -> u64 {
		Self::FIXED_LENGTH + self.comment.len() as u64
	}
}

impl Default for EndOfCentralDirectoryRecord {
	fn default() -> Self {
		Self {
			signature: END_OF_CENTRAL_DIRECTORY_SIGNATURE,
			disk_number: 0,
			start_disk_number: 0,
			disk_total_entries: 0,
			total_entries: 0,
			central_directory_size: 0,
			central_directory_offset: 0,
			zip_file_comment_length: 0,
			comment: Vec::new(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::serial::{self, Serial};

	#[test]
	fn empty_archive_is_just_the_trailer() {
		let bytes = serial::to_bytes(&EndOfCentralDirectoryRecord::default()).unwrap();
		assert_eq!(bytes, b"PK\x05\x06\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0");
	}

	#[test]
	fn comment() {
		let record = EndOfCentralDirectoryRecord {
			total_entries: 3,
			disk_total_entries: 3,
			central_directory_offset: 0x100,
			zip_file_comment_length: 4,
			comment: b"note".to_vec(),
			..Default::default()
		};
		let bytes = serial::to_bytes(&record).unwrap();
		assert_eq!(bytes.len() as u64, record.size_of());
		assert_eq!(record.size_of(), 26);
		assert_eq!(&bytes[22..], b"note");
		assert_eq!(serial::from_bytes::<EndOfCentralDirectoryRecord>(&bytes).unwrap(), record);
	}
}
