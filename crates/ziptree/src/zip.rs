use std::{fmt, io::Write, path::Path};

use tracing::{debug, instrument, trace, warn};

use crate::{
	assemble,
	deflate::{DEFAULT_LEVEL, MAX_LEVEL},
	entry::FileEntry,
	error::{Error, ErrorKind, Result, SimpleError},
	format::{CompressionMethod, FileFormat},
	metadata::build_entry,
	serial::Serial,
};

/// Zip archive builder.
///
/// Collects entries in the order they're added, then lays them out and writes them in one go.
#[derive(Clone)]
pub struct Zip {
	compression_method: CompressionMethod,
	deflate_level: u32,
	entries: Vec<FileEntry>,
}

impl fmt::Debug for Zip {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Zip")
			.field("compression_method", &self.compression_method)
			.field("deflate_level", &self.deflate_level)
			.field("entries", &self.entries.len())
			.finish()
	}
}

impl Default for Zip {
	fn default() -> Self {
		Self::new()
	}
}

impl Zip {
	/// A new, empty archive, storing entries uncompressed.
	pub fn new() -> Self {
		Self {
			compression_method: CompressionMethod::Stored,
			deflate_level: DEFAULT_LEVEL,
			entries: Vec::new(),
		}
	}

	/// Set how entries added from now on are compressed.
	///
	/// Only [`Stored`](CompressionMethod::Stored) and [`Deflated`](CompressionMethod::Deflated)
	/// are supported.
	#[instrument(level = "trace", skip(self))]
	pub fn set_compression_method(&mut self, method: CompressionMethod) -> Result<()> {
		match method {
			CompressionMethod::Stored | CompressionMethod::Deflated => {
				self.compression_method = method;
				Ok(())
			}
			other => Err(SimpleError::new(ErrorKind::UnsupportedMethod(other))
				.with_message(format!(
					"cannot write {other} entries, only stored and deflated are supported"
				))
				.into()),
		}
	}

	/// Set the DEFLATE compression level, 0–9. Higher values are clamped.
	///
	/// This will apply to future entries.
	#[instrument(level = "trace", skip(self))]
	pub fn set_deflate_level(&mut self, level: u32) {
		self.deflate_level = level.min(MAX_LEVEL);
	}

	/// Add a file or directory from the filesystem.
	///
	/// Directories are added on their own, not recursively. If the metadata or content of the path
	/// can't be read, or it's not something that can be archived, it is skipped with a warning and
	/// this returns `Ok(false)`.
	#[instrument(level = "debug", skip(self))]
	pub fn add(&mut self, path: impl AsRef<Path> + fmt::Debug) -> Result<bool> {
		let path = path.as_ref();
		let entry = match build_entry(path) {
			Ok(Some(entry)) => entry,
			Ok(None) => {
				warn!(?path, "nothing to archive, skipping");
				return Ok(false);
			}
			Err(err) => {
				warn!(?path, %err, "cannot read, skipping");
				return Ok(false);
			}
		};

		self.add_entry(entry)?;
		Ok(true)
	}

	/// Add an entry, compressing it if configured to.
	#[instrument(level = "trace", skip(self, entry), fields(path = %entry.path))]
	pub fn add_entry(&mut self, mut entry: FileEntry) -> Result<()> {
		if self.compression_method == CompressionMethod::Deflated {
			entry
				.deflate(self.deflate_level)
				.map_err(|source| Error::Codec {
					path: entry.path.clone(),
					source,
				})?;
		}

		trace!(
			method = %entry.compression_method,
			stored = entry.data.len(),
			original = entry.file_size,
			"added entry"
		);
		self.entries.push(entry);
		Ok(())
	}

	/// Entries added so far.
	pub fn entries(&self) -> &[FileEntry] {
		&self.entries
	}

	/// Lay out the archive.
	pub fn build(self) -> Result<FileFormat> {
		assemble::build(self.entries)
	}

	/// Lay out the archive and write it.
	///
	/// Flushes the writer and returns the number of bytes written.
	#[instrument(level = "debug", skip(writer))]
	pub fn write_to<W: Write>(self, writer: &mut W) -> Result<u64> {
		let archive = self.build()?;
		let size = archive.size_of();
		archive.encode(writer)?;
		writer.flush()?;
		debug!(size, "wrote archive");
		Ok(size)
	}
}
