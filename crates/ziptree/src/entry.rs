//! File entries: what goes into an archive, before it's laid out.

use std::{
	fmt,
	io,
	path::{Component, Path},
	time::SystemTime,
};

use chrono::{DateTime, Utc};
use tracing::{instrument, trace};

use crate::{
	crc32,
	deflate,
	dos::{attributes, DosDateTime},
	format::{CompressionMethod, DEFAULT_VERSION, DEFLATE_VERSION},
};

/// Entry timestamps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timestamps {
	/// Creation time (birth time).
	pub created: Option<Timestamp>,

	/// Modification time (mtime).
	pub modified: Option<Timestamp>,

	/// Access time (atime).
	pub accessed: Option<Timestamp>,
}

/// A timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
	/// Seconds between 1601-01-01 and 1970-01-01.
	const FILETIME_EPOCH_OFFSET: i64 = 11_644_473_600;

	/// From a Windows `FILETIME`: 100-nanosecond ticks since 1601-01-01 UTC.
	///
	/// Returns `None` if that's outside of what chrono can represent.
	pub fn from_filetime(ticks: u64) -> Option<Self> {
		let seconds = i64::try_from(ticks / 10_000_000).ok()? - Self::FILETIME_EPOCH_OFFSET;
		let nanos = u32::try_from(ticks % 10_000_000).ok()? * 100;
		DateTime::<Utc>::from_timestamp(seconds, nanos).map(Self)
	}

	/// As a DOS date and time, in local time.
	pub fn to_dos(self) -> DosDateTime {
		DosDateTime::from_local(&self.0)
	}
}

impl From<SystemTime> for Timestamp {
	fn from(st: SystemTime) -> Self {
		Self(st.into())
	}
}

impl From<DateTime<Utc>> for Timestamp {
	fn from(dt: DateTime<Utc>) -> Self {
		Self(dt)
	}
}

impl From<Timestamp> for DateTime<Utc> {
	fn from(ts: Timestamp) -> Self {
		ts.0
	}
}

impl fmt::Display for Timestamp {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// One file or directory to be archived.
///
/// `data` is the payload as it will be stored: after [`deflate`](FileEntry::deflate) it holds
/// compressed bytes, while `file_size` and `crc32` still describe the original content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileEntry {
	/// Name inside the archive: `/`-separated, relative, with a trailing `/` for directories.
	pub path: String,

	/// Timestamps. Only the modification time is recorded in the archive.
	pub timestamps: Timestamps,

	/// External attributes, see [`dos::attributes`](crate::dos::attributes).
	pub attributes: u32,

	/// Whether this is a directory.
	pub is_directory: bool,

	/// Size of the original content.
	pub file_size: u64,

	/// CRC-32 of the original content.
	pub crc32: u32,

	/// Payload, as stored.
	pub data: Vec<u8>,

	/// How `data` is stored.
	pub compression_method: CompressionMethod,
}

impl FileEntry {
	/// A stored file with the given content.
	pub fn file(path: impl Into<String>, data: Vec<u8>) -> Self {
		Self {
			path: path.into(),
			attributes: attributes::ARCHIVE,
			file_size: data.len() as u64,
			crc32: crc32::checksum(&data),
			data,
			..Default::default()
		}
	}

	/// An empty directory entry. A trailing `/` is added to the name if missing.
	pub fn directory(path: impl Into<String>) -> Self {
		let mut path = path.into();
		if !path.ends_with('/') {
			path.push('/');
		}

		Self {
			path,
			attributes: attributes::DIRECTORY,
			is_directory: true,
			..Default::default()
		}
	}

	/// Set the timestamps.
	pub fn with_timestamps(mut self, timestamps: Timestamps) -> Self {
		self.timestamps = timestamps;
		self
	}

	/// Set the external attributes.
	pub fn with_attributes(mut self, attributes: u32) -> Self {
		self.attributes = attributes;
		self
	}

	/// Compress the payload with DEFLATE.
	///
	/// Directories, entries smaller than [`MIN_DEFLATE_SIZE`](deflate::MIN_DEFLATE_SIZE), and
	/// entries that aren't stored are left alone. Returns whether the entry was compressed.
	#[instrument(level = "trace", skip(self), fields(path = %self.path))]
	pub fn deflate(&mut self, level: u32) -> io::Result<bool> {
		if self.is_directory
			|| self.data.len() < deflate::MIN_DEFLATE_SIZE
			|| self.compression_method != CompressionMethod::Stored
		{
			trace!(len = self.data.len(), "left stored");
			return Ok(false);
		}

		self.data = deflate::compress(&self.data, level)?;
		self.compression_method = CompressionMethod::Deflated;
		Ok(true)
	}

	/// Version needed to extract this entry.
	pub fn version_needed(&self) -> u16 {
		if self.is_directory || self.compression_method == CompressionMethod::Deflated {
			DEFLATE_VERSION
		} else {
			DEFAULT_VERSION
		}
	}

	/// Modification time as DOS date and time, or 1980-01-01 00:00:00 if unknown.
	pub fn modified_dos(&self) -> DosDateTime {
		self.timestamps
			.modified
			.map(Timestamp::to_dos)
			.unwrap_or_default()
	}
}

/// Name of a path inside an archive.
///
/// Only normal components are kept: roots, drive prefixes, `.` and `..` are dropped. Components
/// are joined with `/`, backslashes become `/`, and directories get a trailing `/`. Returns `None`
/// if nothing is left.
pub fn archive_name(path: &Path, is_directory: bool) -> Option<String> {
	let mut name = path
		.components()
		.filter_map(|c| {
			if let Component::Normal(comp) = c {
				Some(comp.to_string_lossy().replace('\\', "/"))
			} else {
				None
			}
		})
		.flat_map(|comp| {
			comp.split('/')
				.filter(|part| !part.is_empty() && *part != "." && *part != "..")
				.map(str::to_string)
				.collect::<Vec<_>>()
		})
		.collect::<Vec<_>>()
		.join("/");

	if name.is_empty() {
		return None;
	}

	if is_directory {
		name.push('/');
	}
	Some(name)
}

#[cfg(test)]
mod tests {
	use chrono::TimeZone;

	use super::*;

	#[test]
	fn file_entry_checksums() {
		let entry = FileEntry::file("a.txt", b"0123456789".to_vec());
		assert_eq!(entry.file_size, 10);
		assert_eq!(entry.crc32, crc32::checksum(b"0123456789"));
		assert_eq!(entry.compression_method, CompressionMethod::Stored);
		assert_eq!(entry.version_needed(), DEFAULT_VERSION);
		assert!(!entry.is_directory);
	}

	#[test]
	fn directory_entry() {
		let entry = FileEntry::directory("some/dir");
		assert_eq!(entry.path, "some/dir/");
		assert!(entry.data.is_empty());
		assert_eq!(entry.version_needed(), DEFLATE_VERSION);
		assert_eq!(FileEntry::directory("x/").path, "x/");
	}

	#[test]
	fn small_entries_stay_stored() {
		let mut entry = FileEntry::file("tiny", b"fifteen bytes!!".to_vec());
		assert_eq!(entry.data.len(), 15);
		assert!(!entry.deflate(deflate::DEFAULT_LEVEL).unwrap());
		assert_eq!(entry.compression_method, CompressionMethod::Stored);

		let mut dir = FileEntry::directory("d");
		assert!(!dir.deflate(deflate::DEFAULT_LEVEL).unwrap());
	}

	#[test]
	fn deflate_keeps_original_size_and_crc() {
		let content = b"hello hello hello hello hello hello".to_vec();
		let mut entry = FileEntry::file("h", content.clone());
		assert!(entry.deflate(deflate::DEFAULT_LEVEL).unwrap());
		assert_eq!(entry.compression_method, CompressionMethod::Deflated);
		assert_eq!(entry.file_size, content.len() as u64);
		assert_eq!(entry.crc32, crc32::checksum(&content));
		assert_ne!(entry.data, content);
		assert_eq!(entry.version_needed(), DEFLATE_VERSION);

		// only once
		assert!(!entry.deflate(deflate::DEFAULT_LEVEL).unwrap());
	}

	#[test]
	fn filetime_epoch() {
		assert_eq!(
			Timestamp::from_filetime(116_444_736_000_000_000),
			Some(Timestamp(Utc.timestamp_opt(0, 0).unwrap()))
		);
		assert_eq!(
			Timestamp::from_filetime(116_444_736_000_000_015),
			Some(Timestamp(Utc.timestamp_opt(0, 1_500).unwrap()))
		);
	}

	#[test]
	fn unknown_modification_time() {
		let entry = FileEntry::file("x", Vec::new());
		assert_eq!(entry.modified_dos(), DosDateTime::MIN);
	}

	#[test]
	fn names() {
		assert_eq!(archive_name(Path::new("a/b/c.txt"), false).as_deref(), Some("a/b/c.txt"));
		assert_eq!(archive_name(Path::new("/abs/path"), true).as_deref(), Some("abs/path/"));
		assert_eq!(archive_name(Path::new("./x/../y"), false).as_deref(), Some("x/y"));
		assert_eq!(archive_name(Path::new("win\\style"), false).as_deref(), Some("win/style"));
		assert_eq!(archive_name(Path::new("/"), true), None);
		assert_eq!(archive_name(Path::new("."), true), None);
	}
}
