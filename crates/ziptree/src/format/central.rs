//! Central directory.

use super::constants::{CENTRAL_FILE_HEADER_SIGNATURE, DIGITAL_SIGNATURE_SIGNATURE};
use crate::{
	dos::{DosDate, DosTime},
	record,
};

record! {
	@size_of(Self::wire_size)
	/// Central directory entry, one per local file record.
	#[derive(Clone, Debug, PartialEq, Eq)]
	pub struct CentralDirectoryFileHeader {
		/// Always [`CENTRAL_FILE_HEADER_SIGNATURE`].
		pub signature: [u8; 4],
		/// Host system in the high byte, application note version in the low byte.
		pub version_made_by: u16,
		/// Version needed to extract.
		pub version_needed: u16,
		/// General purpose bit flags.
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
		/// Length of `file_comment`.
		pub file_comment_length: u16,
		/// Disk the entry starts on.
		pub disk_number_start: u16,
		/// Bit 0 set means the entry is probably text.
		pub internal_file_attributes: u16,
		/// Host-dependent attributes, see [`dos::attributes`](crate::dos::attributes).
		pub external_file_attributes: u32,
		/// Offset of the local file header from the start of the archive.
		pub offset_of_local_header: u32,
		/// Entry name, `/`-separated.
		#[serial("len=file_name_length")]
		pub file_name: Vec<u8>,
		/// Extra field blocks.
		#[serial("len=extra_field_length")]
		pub extra_field: Vec<u8>,
		/// Entry comment.
		#[serial("len=file_comment_length")]
		pub file_comment: Vec<u8>,
	}
}

impl CentralDirectoryFileHeader {
	/// Size of the header without its name, extra field, and comment.
	pub const FIXED_LENGTH: u64 = 46;

	fn wire_size(&self) -> u64 {
		Self::FIXED_LENGTH
			+ self.file_name.len() as u64
			+ self.extra_field.len() as u64
			+ self.file_comment.len() as u64
	}
}

impl Default for CentralDirectoryFileHeader {
	fn default() -> Self {
		Self {
			signature: CENTRAL_FILE_HEADER_SIGNATURE,
			version_made_by: Default::default(),
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
			file_comment_length: Default::default(),
			disk_number_start: Default::default(),
			internal_file_attributes: Default::default(),
			external_file_attributes: Default::default(),
			offset_of_local_header: Default::default(),
			file_name: Default::default(),
			extra_field: Default::default(),
			file_comment: Default::default(),
		}
	}
}

record! {
	/// Signature over the central directory.
	#[derive(Clone, Debug, PartialEq, Eq)]
	pub struct DigitalSignature {
		/// Always [`DIGITAL_SIGNATURE_SIGNATURE`].
		#[serial("prefix='PK\x05\x05'")]
		pub signature: [u8; 4],
		/// Length of `signature_data`.
		pub data_size: u16,
		/// Signature bytes.
		#[serial("len=data_size")]
		pub signature_data: Vec<u8>,
	}
}

impl Default for DigitalSignature {
	fn default() -> Self {
		Self {
			signature: DIGITAL_SIGNATURE_SIGNATURE,
			data_size: 0,
			signature_data: Vec::new(),
		}
	}
}

record! {
	/// All central directory headers, and the (never written) digital signature.
	#[derive(Clone, Debug, Default, PartialEq, Eq)]
	pub struct CentralDirectoryRecord {
		/// Headers, in the same order as the local file records.
		#[serial("prefix='PK\x01\x02'")]
		pub headers: Vec<CentralDirectoryFileHeader>,
		/// Not supported, always absent.
		#[serial("condition=false")]
		pub digital_signature: Option<DigitalSignature>,
	}
}
