//! Signatures, versions, flags, and enumerations from the Zip application note.

use std::fmt;

/// Local file header signature, `PK\x03\x04`.
pub const LOCAL_FILE_HEADER_SIGNATURE: [u8; 4] = *b"PK\x03\x04";

/// Central directory file header signature, `PK\x01\x02`.
pub const CENTRAL_FILE_HEADER_SIGNATURE: [u8; 4] = *b"PK\x01\x02";

/// End of central directory record signature, `PK\x05\x06`.
pub const END_OF_CENTRAL_DIRECTORY_SIGNATURE: [u8; 4] = *b"PK\x05\x06";

/// Central directory digital signature, `PK\x05\x05`.
pub const DIGITAL_SIGNATURE_SIGNATURE: [u8; 4] = *b"PK\x05\x05";

/// Version needed to extract a plain stored file: 1.0.
pub const DEFAULT_VERSION: u16 = 10;

/// Version needed to extract a directory or a deflated file: 2.0.
pub const DEFLATE_VERSION: u16 = 20;

/// Latest application note version this implementation follows: 6.3.
pub const LATEST_VERSION: u16 = 63;

/// General purpose bit flags.
pub mod flags {
	/// Entry is encrypted.
	pub const ENCRYPTED: u16 = 1 << 0;
	/// Compression option, meaning depends on the method.
	pub const COMPRESSION_OPTION_1: u16 = 1 << 1;
	/// Compression option, meaning depends on the method.
	pub const COMPRESSION_OPTION_2: u16 = 1 << 2;
	/// CRC and sizes are zero in the local header and follow the data in a data descriptor.
	pub const DATA_DESCRIPTOR: u16 = 1 << 3;
	/// Reserved for enhanced deflating.
	pub const ENHANCED_DEFLATION: u16 = 1 << 4;
	/// Compressed patched data.
	pub const COMPRESSED_PATCHED_DATA: u16 = 1 << 5;
	/// Strong encryption.
	pub const STRONG_ENCRYPTION: u16 = 1 << 6;
	/// Name and comment are UTF-8.
	pub const LANGUAGE_ENCODING: u16 = 1 << 11;
	/// Local header values are masked.
	pub const MASK_HEADER_VALUES: u16 = 1 << 13;
}

/// Compression method of an entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum CompressionMethod {
	/// No compression.
	#[default]
	Stored = 0,
	/// Shrunk.
	Shrunk = 1,
	/// Reduced with compression factor 1.
	Reduced1 = 2,
	/// Reduced with compression factor 2.
	Reduced2 = 3,
	/// Reduced with compression factor 3.
	Reduced3 = 4,
	/// Reduced with compression factor 4.
	Reduced4 = 5,
	/// Imploded.
	Imploded = 6,
	/// Reserved for Tokenizing compression.
	Tokenized = 7,
	/// Deflated.
	Deflated = 8,
	/// Enhanced Deflating (Deflate64).
	Deflate64 = 9,
	/// PKWARE Data Compression Library Imploding.
	PkwareImploded = 10,
	/// BZIP2.
	Bzip2 = 12,
	/// LZMA.
	Lzma = 14,
	/// IBM z/OS CMPSC.
	IbmCmpsc = 16,
	/// IBM TERSE.
	IbmTerse = 18,
	/// IBM LZ77 z Architecture.
	IbmLz77 = 19,
	/// Zstandard, deprecated code.
	ZstdDeprecated = 20,
	/// Zstandard.
	Zstd = 93,
	/// MP3.
	Mp3 = 94,
	/// XZ.
	Xz = 95,
	/// JPEG variant.
	Jpeg = 96,
	/// WavPack.
	WavPack = 97,
	/// PPMd version I, Rev 1.
	Ppmd = 98,
	/// AE-x encryption marker.
	Aex = 99,
}

impl CompressionMethod {
	/// Every known method.
	pub const ALL: [Self; 24] = [
		Self::Stored,
		Self::Shrunk,
		Self::Reduced1,
		Self::Reduced2,
		Self::Reduced3,
		Self::Reduced4,
		Self::Imploded,
		Self::Tokenized,
		Self::Deflated,
		Self::Deflate64,
		Self::PkwareImploded,
		Self::Bzip2,
		Self::Lzma,
		Self::IbmCmpsc,
		Self::IbmTerse,
		Self::IbmLz77,
		Self::ZstdDeprecated,
		Self::Zstd,
		Self::Mp3,
		Self::Xz,
		Self::Jpeg,
		Self::WavPack,
		Self::Ppmd,
		Self::Aex,
	];
}

impl From<CompressionMethod> for u16 {
	fn from(method: CompressionMethod) -> Self {
		method as u16
	}
}

impl TryFrom<u16> for CompressionMethod {
	type Error = u16;

	fn try_from(raw: u16) -> Result<Self, Self::Error> {
		Self::ALL
			.into_iter()
			.find(|method| u16::from(*method) == raw)
			.ok_or(raw)
	}
}

impl fmt::Display for CompressionMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{self:?} ({})", u16::from(*self))
	}
}

/// Host system in the high byte of "version made by".
///
/// This determines how external file attributes are to be read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HostSystem {
	/// MS-DOS and OS/2 (FAT / VFAT / FAT32 file systems).
	MsDos = 0,
	/// Amiga.
	Amiga = 1,
	/// OpenVMS.
	OpenVms = 2,
	/// UNIX.
	Unix = 3,
	/// VM/CMS.
	VmCms = 4,
	/// Atari ST.
	AtariSt = 5,
	/// OS/2 H.P.F.S.
	Os2Hpfs = 6,
	/// Macintosh.
	Macintosh = 7,
	/// Z-System.
	ZSystem = 8,
	/// CP/M.
	CpM = 9,
	/// Windows NTFS.
	WindowsNtfs = 10,
	/// MVS (OS/390 - Z/OS).
	Mvs = 11,
	/// VSE.
	Vse = 12,
	/// Acorn Risc.
	AcornRisc = 13,
	/// VFAT.
	Vfat = 14,
	/// Alternate MVS.
	AlternateMvs = 15,
	/// BeOS.
	BeOs = 16,
	/// Tandem.
	Tandem = 17,
	/// OS/400.
	Os400 = 18,
	/// OS X (Darwin).
	Darwin = 19,
}

impl HostSystem {
	/// The host this program runs on, as far as attributes are concerned.
	///
	/// Unix-likes (including macOS) record POSIX modes, so they're all [`Unix`](Self::Unix);
	/// everything else records DOS attributes.
	pub const fn current() -> Self {
		if cfg!(unix) {
			Self::Unix
		} else {
			Self::MsDos
		}
	}

	/// Human-readable name.
	pub const fn description(self) -> &'static str {
		match self {
			Self::MsDos => "MS-DOS and OS/2 (FAT / VFAT / FAT32 file systems)",
			Self::Amiga => "Amiga",
			Self::OpenVms => "OpenVMS",
			Self::Unix => "UNIX",
			Self::VmCms => "VM/CMS",
			Self::AtariSt => "Atari ST",
			Self::Os2Hpfs => "OS/2 H.P.F.S.",
			Self::Macintosh => "Macintosh",
			Self::ZSystem => "Z-System",
			Self::CpM => "CP/M",
			Self::WindowsNtfs => "Windows NTFS",
			Self::Mvs => "MVS (OS/390 - Z/OS)",
			Self::Vse => "VSE",
			Self::AcornRisc => "Acorn Risc",
			Self::Vfat => "VFAT",
			Self::AlternateMvs => "alternate MVS",
			Self::BeOs => "BeOS",
			Self::Tandem => "Tandem",
			Self::Os400 => "OS/400",
			Self::Darwin => "OS X (Darwin)",
		}
	}

	/// "Version made by" for this host and an application note version.
	pub const fn version_made_by(self, version: u16) -> u16 {
		((self as u16) << 8) | (version & 0xFF)
	}
}

impl TryFrom<u8> for HostSystem {
	type Error = u8;

	fn try_from(raw: u8) -> Result<Self, Self::Error> {
		Ok(match raw {
			0 => Self::MsDos,
			1 => Self::Amiga,
			2 => Self::OpenVms,
			3 => Self::Unix,
			4 => Self::VmCms,
			5 => Self::AtariSt,
			6 => Self::Os2Hpfs,
			7 => Self::Macintosh,
			8 => Self::ZSystem,
			9 => Self::CpM,
			10 => Self::WindowsNtfs,
			11 => Self::Mvs,
			12 => Self::Vse,
			13 => Self::AcornRisc,
			14 => Self::Vfat,
			15 => Self::AlternateMvs,
			16 => Self::BeOs,
			17 => Self::Tandem,
			18 => Self::Os400,
			19 => Self::Darwin,
			other => return Err(other),
		})
	}
}

impl fmt::Display for HostSystem {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.description())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn method_round_trips() {
		for method in CompressionMethod::ALL {
			assert_eq!(CompressionMethod::try_from(u16::from(method)), Ok(method));
		}
		assert_eq!(u16::from(CompressionMethod::Deflated), 8);
		assert_eq!(CompressionMethod::try_from(11), Err(11));
		assert_eq!(CompressionMethod::default(), CompressionMethod::Stored);
	}

	#[test]
	fn version_made_by() {
		assert_eq!(HostSystem::Unix.version_made_by(LATEST_VERSION), 0x033F);
		assert_eq!(HostSystem::MsDos.version_made_by(LATEST_VERSION), 63);
		assert_eq!(HostSystem::try_from(10), Ok(HostSystem::WindowsNtfs));
		assert_eq!(HostSystem::try_from(20), Err(20));
	}

	#[test]
	fn signatures() {
		assert_eq!(LOCAL_FILE_HEADER_SIGNATURE, [0x50, 0x4B, 0x03, 0x04]);
		assert_eq!(END_OF_CENTRAL_DIRECTORY_SIGNATURE, [0x50, 0x4B, 0x05, 0x06]);
	}
}
