//! Windows/DOS file attribute bits.
//!
//! These go in the low 16 bits of a central directory header's external attributes when the
//! archive is made on DOS or Windows. On Unix the low bits carry the DOS-compatible subset
//! (directory, read-only, archive) and the POSIX mode goes in the high 16 bits.
//!
//! See <https://learn.microsoft.com/en-us/windows/win32/fileio/file-attribute-constants>.

/// `FILE_ATTRIBUTE_READONLY`
pub const READONLY: u32 = 0x0000_0001;
/// `FILE_ATTRIBUTE_HIDDEN`
pub const HIDDEN: u32 = 0x0000_0002;
/// `FILE_ATTRIBUTE_SYSTEM`
pub const SYSTEM: u32 = 0x0000_0004;
/// `FILE_ATTRIBUTE_DIRECTORY`
pub const DIRECTORY: u32 = 0x0000_0010;
/// `FILE_ATTRIBUTE_ARCHIVE`
pub const ARCHIVE: u32 = 0x0000_0020;
/// `FILE_ATTRIBUTE_DEVICE`
pub const DEVICE: u32 = 0x0000_0040;
/// `FILE_ATTRIBUTE_NORMAL`
pub const NORMAL: u32 = 0x0000_0080;
/// `FILE_ATTRIBUTE_TEMPORARY`
pub const TEMPORARY: u32 = 0x0000_0100;
/// `FILE_ATTRIBUTE_SPARSE_FILE`
pub const SPARSE_FILE: u32 = 0x0000_0200;
/// `FILE_ATTRIBUTE_REPARSE_POINT`
pub const REPARSE_POINT: u32 = 0x0000_0400;
/// `FILE_ATTRIBUTE_COMPRESSED`
pub const COMPRESSED: u32 = 0x0000_0800;
/// `FILE_ATTRIBUTE_OFFLINE`
pub const OFFLINE: u32 = 0x0000_1000;
/// `FILE_ATTRIBUTE_NOT_CONTENT_INDEXED`
pub const NOT_CONTENT_INDEXED: u32 = 0x0000_2000;
/// `FILE_ATTRIBUTE_ENCRYPTED`
pub const ENCRYPTED: u32 = 0x0000_4000;
/// `FILE_ATTRIBUTE_INTEGRITY_STREAM`
pub const INTEGRITY_STREAM: u32 = 0x0000_8000;
/// `FILE_ATTRIBUTE_VIRTUAL`
pub const VIRTUAL: u32 = 0x0001_0000;
/// `FILE_ATTRIBUTE_NO_SCRUB_DATA`
pub const NO_SCRUB_DATA: u32 = 0x0002_0000;
/// `FILE_ATTRIBUTE_EA`
pub const EA: u32 = 0x0004_0000;
/// `FILE_ATTRIBUTE_PINNED`
pub const PINNED: u32 = 0x0008_0000;
/// `FILE_ATTRIBUTE_UNPINNED`
pub const UNPINNED: u32 = 0x0010_0000;
/// `FILE_ATTRIBUTE_RECALL_ON_OPEN`
///
/// Shares its value with [`EA`]; which one applies depends on the file.
pub const RECALL_ON_OPEN: u32 = 0x0004_0000;
/// `FILE_ATTRIBUTE_RECALL_ON_DATA_ACCESS`
pub const RECALL_ON_DATA_ACCESS: u32 = 0x0040_0000;

/// Attribute bits with the POSIX mode in the high half.
pub fn with_unix_mode(dos: u32, mode: u32) -> u32 {
	(dos & 0xFFFF) | ((mode & 0xFFFF) << 16)
}

/// The POSIX mode from the high half of external attributes, if any.
pub fn unix_mode(external: u32) -> Option<u32> {
	match external >> 16 {
		0 => None,
		mode => Some(mode),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unix_mode_in_high_half() {
		let attrs = with_unix_mode(DIRECTORY | ARCHIVE, 0o40755);
		assert_eq!(attrs & 0xFFFF, DIRECTORY | ARCHIVE);
		assert_eq!(unix_mode(attrs), Some(0o40755));
		assert_eq!(unix_mode(READONLY), None);
	}
}
