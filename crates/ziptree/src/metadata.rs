//! Helpers to read file metadata to build [`FileEntry`]s.

use std::{
	fs::{self, Metadata},
	io::Result,
	path::Path,
};

use tracing::{instrument, trace};

use crate::entry::{archive_name, FileEntry, Timestamp, Timestamps};

/// Build a [`FileEntry`] from a path on the filesystem.
///
/// Symlinks are followed. Directories become directory entries; regular files are read in full.
/// Returns `Ok(None)` for anything else (sockets, devices…) and for paths that have no name
/// inside an archive (like `/` or `.`).
///
/// This will perform syscalls; these are logged at trace level. To get more control you can use
/// the individual functions [in this module][self].
#[instrument(level = "trace")]
pub fn build_entry(path: &Path) -> Result<Option<FileEntry>> {
	trace!("reading metadata");
	let meta = fs::metadata(path)?;
	let file_type = meta.file_type();
	let is_directory = file_type.is_dir();

	let Some(name) = archive_name(path, is_directory) else {
		trace!("no archive name, skipping");
		return Ok(None);
	};

	let entry = if is_directory {
		FileEntry::directory(name)
	} else if file_type.is_file() {
		trace!("reading contents");
		FileEntry::file(name, fs::read(path)?)
	} else {
		trace!(?file_type, "not a file or directory, skipping");
		return Ok(None);
	};

	Ok(Some(
		entry
			.with_timestamps(timestamps(&meta))
			.with_attributes(file_attributes(&meta)),
	))
}

/// Get the timestamps of the file.
#[instrument(level = "trace")]
pub fn timestamps(meta: &Metadata) -> Timestamps {
	Timestamps {
		created: meta.created().map(Timestamp::from).ok(),
		modified: meta.modified().map(Timestamp::from).ok(),
		accessed: meta.accessed().map(Timestamp::from).ok(),
	}
}

/// Get the external attributes of the file, as recorded in a central directory header.
///
/// ## Unix
///
/// The low half has the DOS-compatible bits (directory, read-only, archive for files) and the
/// high half has the POSIX mode, including the file type bits.
///
/// ## Windows
///
/// The [`FILE_ATTRIBUTE_*`][win32-file-attrs] bits as reported by the system.
///
/// ## Others
///
/// Directory, read-only, and archive bits only.
///
/// [win32-file-attrs]: https://learn.microsoft.com/en-us/windows/win32/fileio/file-attribute-constants
#[instrument(level = "trace")]
pub fn file_attributes(meta: &Metadata) -> u32 {
	#[cfg(windows)]
	{
		use std::os::windows::fs::MetadataExt;
		meta.file_attributes()
	}

	#[cfg(not(windows))]
	{
		use crate::dos::attributes;

		let mut dos = if meta.is_dir() {
			attributes::DIRECTORY
		} else {
			attributes::ARCHIVE
		};
		if meta.permissions().readonly() {
			dos |= attributes::READONLY;
		}

		#[cfg(unix)]
		{
			use std::os::unix::fs::MetadataExt;
			attributes::with_unix_mode(dos, meta.mode())
		}

		#[cfg(not(unix))]
		{
			dos
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::dos::attributes;

	#[test]
	fn directory_attributes() {
		let dir = std::env::temp_dir();
		let meta = fs::metadata(&dir).unwrap();
		let attrs = file_attributes(&meta);
		assert_ne!(attrs & attributes::DIRECTORY, 0);
	}

	#[test]
	fn no_name_no_entry() {
		assert_eq!(build_entry(Path::new("/")).unwrap(), None);
	}
}
