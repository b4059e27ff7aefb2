//! The Zip container, as records.
//!
//! An archive is a run of [local file records](LocalFileRecord), then the
//! [central directory](CentralDirectoryRecord) with one [header](CentralDirectoryFileHeader) per
//! local record, then the [end of central directory record](EndOfCentralDirectoryRecord).
//!
//! Decoding finds where the local records stop and where the central directory headers stop by
//! looking at the signature of what comes next. A stored entry whose data happens to start with a
//! signature is therefore misread if its header doesn't give its size; archives written here
//! always do.

#[doc(inline)]
pub use self::central::*;
#[doc(inline)]
pub use self::constants::*;
#[doc(inline)]
pub use self::eocd::*;
#[doc(inline)]
pub use self::local::*;
use crate::record;

mod central;
mod constants;
mod eocd;
mod local;

record! {
	/// A whole Zip archive.
	#[derive(Clone, Debug, Default, PartialEq, Eq)]
	pub struct FileFormat {
		/// Entries' headers and data.
		#[serial("prefix='PK\x03\x04'")]
		pub local_file_records: Vec<LocalFileRecord>,
		/// Index of the entries.
		pub central_directory_record: CentralDirectoryRecord,
		/// Trailer.
		pub end_of_central_directory_record: EndOfCentralDirectoryRecord,
	}
}

impl FileFormat {
	/// Pair each local record with its central directory header.
	///
	/// Stops at the shorter of the two lists.
	pub fn entries(
		&self,
	) -> impl Iterator<Item = (&LocalFileRecord, &CentralDirectoryFileHeader)> + '_ {
		self.local_file_records
			.iter()
			.zip(self.central_directory_record.headers.iter())
	}
}
