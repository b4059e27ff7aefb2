//! CRC-32 checksums, as used by Zip entries.
//!
//! This is the reflected CRC-32/ISO-HDLC variant (polynomial `0xEDB88320`), table-driven. The
//! table is computed at compile time, so there is nothing to initialise and it can be read from
//! any number of threads.

/// Reflected polynomial.
pub const POLYNOMIAL: u32 = 0xEDB8_8320;

/// Lookup table, one entry per byte value.
pub static TABLE: [u32; 256] = build_table(POLYNOMIAL);

const fn build_table(polynomial: u32) -> [u32; 256] {
	let mut table = [0; 256];
	let mut i = 0;
	while i < 256 {
		let mut crc = i as u32;
		let mut round = 0;
		while round < 8 {
			crc = if crc & 1 != 0 {
				(crc >> 1) ^ polynomial
			} else {
				crc >> 1
			};
			round += 1;
		}
		table[i] = crc;
		i += 1;
	}
	table
}

/// Compute the CRC-32 of a byte slice.
pub fn checksum(data: &[u8]) -> u32 {
	let mut hasher = Crc32::new();
	hasher.update(data);
	hasher.finalize()
}

/// Incremental CRC-32.
///
/// Feeding data in several chunks gives the same result as [`checksum`] over the concatenation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Crc32 {
	register: u32,
}

impl Crc32 {
	/// Start a new checksum.
	pub const fn new() -> Self {
		Self {
			register: 0xFFFF_FFFF,
		}
	}

	/// Feed more data.
	pub fn update(&mut self, data: &[u8]) {
		self.register = data.iter().fold(self.register, |register, byte| {
			(register >> 8) ^ TABLE[((register ^ u32::from(*byte)) & 0xFF) as usize]
		});
	}

	/// The checksum of everything fed so far.
	pub const fn finalize(&self) -> u32 {
		!self.register
	}
}

impl Default for Crc32 {
	fn default() -> Self {
		Self::new()
	}
}
