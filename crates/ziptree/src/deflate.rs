//! DEFLATE compression of entry data.

use std::io::{Result, Write};

use flate2::{write::DeflateEncoder, Compression};
use tracing::{instrument, trace};

/// Compression level used unless configured otherwise.
pub const DEFAULT_LEVEL: u32 = 6;

/// Highest compression level.
pub const MAX_LEVEL: u32 = 9;

/// Entries smaller than this are always stored.
pub const MIN_DEFLATE_SIZE: usize = 16;

/// Compress to a raw DEFLATE stream, as Zip expects (no zlib or gzip framing).
///
/// Levels above [`MAX_LEVEL`] are clamped.
#[instrument(level = "trace", skip(data), fields(len = data.len()))]
pub fn compress(data: &[u8], level: u32) -> Result<Vec<u8>> {
	let mut encoder = DeflateEncoder::new(
		Vec::with_capacity(data.len() / 2),
		Compression::new(level.min(MAX_LEVEL)),
	);
	encoder.write_all(data)?;
	let compressed = encoder.finish()?;
	trace!(compressed = compressed.len(), "deflated");
	Ok(compressed)
}

#[cfg(test)]
mod tests {
	use std::io::Read;

	use flate2::read::DeflateDecoder;

	use super::*;

	fn inflate(data: &[u8]) -> Vec<u8> {
		let mut out = Vec::new();
		DeflateDecoder::new(data).read_to_end(&mut out).unwrap();
		out
	}

	#[test]
	fn compresses_repetitive_data() {
		let data = b"abcabcabc".repeat(100);
		let compressed = compress(&data, DEFAULT_LEVEL).unwrap();
		assert!(compressed.len() < data.len());
		assert_eq!(inflate(&compressed), data);
	}

	#[test]
	fn level_zero_still_deflate() {
		let data = b"not compressed at all".to_vec();
		let compressed = compress(&data, 0).unwrap();
		assert_eq!(inflate(&compressed), data);
	}

	#[test]
	fn level_clamped() {
		let data = b"zzzzzzzzzzzzzzzzzzzzzzzzzzzzzz".to_vec();
		assert_eq!(compress(&data, 200).unwrap(), compress(&data, MAX_LEVEL).unwrap());
	}
}
