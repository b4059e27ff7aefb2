use std::{
	fmt,
	io::{Read, Seek, Write},
	sync::Arc,
};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Timelike};

use crate::serial::{Accessor, Field, Kind, Resolve, Result, Serial};

/// MS-DOS time of day.
///
/// Packed into 16 bits as hour (5 bits), minute (6 bits), and seconds divided by two (5 bits), so
/// seconds are always even.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DosTime {
	hour: u8,
	minute: u8,
	second: u8,
}

impl DosTime {
	/// A time of day. Odd seconds are rounded down.
	///
	/// Out of range values are truncated to their bit widths on encoding.
	pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
		Self {
			hour,
			minute,
			second: second & !1,
		}
	}

	/// Hour, 0–23.
	pub const fn hour(self) -> u8 {
		self.hour
	}

	/// Minute, 0–59.
	pub const fn minute(self) -> u8 {
		self.minute
	}

	/// Second, even, 0–58.
	pub const fn second(self) -> u8 {
		self.second
	}

	/// Packed representation.
	pub const fn to_raw(self) -> u16 {
		(((self.second as u16) >> 1) & 0x1F)
			| (((self.minute as u16) & 0x3F) << 5)
			| (((self.hour as u16) & 0x1F) << 11)
	}

	/// Unpack.
	pub const fn from_raw(raw: u16) -> Self {
		Self {
			hour: ((raw >> 11) & 0x1F) as u8,
			minute: ((raw >> 5) & 0x3F) as u8,
			second: ((raw & 0x1F) << 1) as u8,
		}
	}
}

impl fmt::Display for DosTime {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
	}
}

/// MS-DOS calendar date.
///
/// Packed into 16 bits as years since 1980 (7 bits), month (4 bits), and day (5 bits).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DosDate {
	year: u16,
	month: u8,
	day: u8,
}

impl DosDate {
	/// Earliest representable year.
	pub const EPOCH_YEAR: u16 = 1980;

	/// Latest representable year.
	pub const MAX_YEAR: u16 = Self::EPOCH_YEAR + 0x7F;

	/// A calendar date.
	///
	/// Dates before 1980 become 1980-01-01, the earliest representable date. Month and day are
	/// otherwise taken as given.
	pub const fn new(year: u16, month: u8, day: u8) -> Self {
		if year < Self::EPOCH_YEAR {
			return Self {
				year: Self::EPOCH_YEAR,
				month: 1,
				day: 1,
			};
		}

		Self { year, month, day }
	}

	/// Full year, 1980–2107.
	pub const fn year(self) -> u16 {
		self.year
	}

	/// Month, 1–12.
	pub const fn month(self) -> u8 {
		self.month
	}

	/// Day of month, 1–31.
	pub const fn day(self) -> u8 {
		self.day
	}

	/// Packed representation.
	pub const fn to_raw(self) -> u16 {
		((self.day as u16) & 0x1F)
			| (((self.month as u16) & 0x0F) << 5)
			| ((self.year.saturating_sub(Self::EPOCH_YEAR) & 0x7F) << 9)
	}

	/// Unpack.
	pub const fn from_raw(raw: u16) -> Self {
		Self {
			year: ((raw >> 9) & 0x7F) + Self::EPOCH_YEAR,
			month: ((raw >> 5) & 0x0F) as u8,
			day: (raw & 0x1F) as u8,
		}
	}
}

impl Default for DosDate {
	fn default() -> Self {
		Self::new(Self::EPOCH_YEAR, 1, 1)
	}
}

impl fmt::Display for DosDate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:04}/{:02}/{:02}", self.year, self.month, self.day)
	}
}

macro_rules! packed {
	($($ty:ty),*) => {$(
		impl Resolve for $ty {
			fn accessor(path: &[&str]) -> Option<Accessor<Self>> {
				if !path.is_empty() {
					return None;
				}

				let accessor: Accessor<Self> = Arc::new(|value: &$ty| Some(u64::from(value.to_raw())));
				Some(accessor)
			}
		}

		impl Serial for $ty {
			const KIND: Kind = Kind::Custom { width: 2 };

			fn decode<R: Read + Seek, P>(reader: &mut R, _field: Field<'_, P>) -> Result<Self> {
				Ok(Self::from_raw(reader.read_u16::<LittleEndian>()?))
			}

			fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
				Ok(writer.write_u16::<LittleEndian>(self.to_raw())?)
			}

			fn size_of(&self) -> u64 {
				2
			}
		}
	)*};
}

packed!(DosTime, DosDate);

/// A DOS date and time together.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DosDateTime {
	/// Calendar date.
	pub date: DosDate,

	/// Time of day.
	pub time: DosTime,
}

impl DosDateTime {
	/// Earliest representable instant, 1980-01-01 00:00:00.
	pub const MIN: Self = Self {
		date: DosDate::new(DosDate::EPOCH_YEAR, 1, 1),
		time: DosTime::new(0, 0, 0),
	};

	/// Latest representable instant, 2107-12-31 23:59:58.
	pub const MAX: Self = Self {
		date: DosDate::new(DosDate::MAX_YEAR, 12, 31),
		time: DosTime::new(23, 59, 58),
	};

	/// From any timezone-aware instant, as the wall-clock time of the local timezone.
	pub fn from_local<Tz: TimeZone>(datetime: &DateTime<Tz>) -> Self {
		datetime.with_timezone(&chrono::Local).naive_local().into()
	}

	/// As a naive date and time, if it's a valid calendar date.
	pub fn to_naive(self) -> Option<NaiveDateTime> {
		NaiveDate::from_ymd_opt(
			i32::from(self.date.year),
			u32::from(self.date.month),
			u32::from(self.date.day),
		)?
		.and_hms_opt(
			u32::from(self.time.hour),
			u32::from(self.time.minute),
			u32::from(self.time.second),
		)
	}
}

impl From<NaiveDateTime> for DosDateTime {
	/// Instants outside the representable range are clamped to [`MIN`](Self::MIN) or
	/// [`MAX`](Self::MAX).
	fn from(datetime: NaiveDateTime) -> Self {
		if datetime.year() < i32::from(DosDate::EPOCH_YEAR) {
			return Self::MIN;
		}
		if datetime.year() > i32::from(DosDate::MAX_YEAR) {
			return Self::MAX;
		}

		Self {
			date: DosDate::new(
				datetime.year() as u16,
				datetime.month() as u8,
				datetime.day() as u8,
			),
			time: DosTime::new(
				datetime.hour() as u8,
				datetime.minute() as u8,
				// leap seconds show up as nanoseconds, not as second 60
				datetime.second() as u8,
			),
		}
	}
}

impl fmt::Display for DosDateTime {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {}", self.date, self.time)
	}
}

#[cfg(test)]
mod tests {
	use chrono::Utc;

	use super::*;
	use crate::serial;

	#[test]
	fn time_packing() {
		let time = DosTime::new(13, 37, 42);
		assert_eq!(time.to_raw(), (13 << 11) | (37 << 5) | 21);
		assert_eq!(DosTime::from_raw(time.to_raw()), time);
	}

	#[test]
	fn odd_seconds_round_down() {
		let time = DosTime::new(1, 2, 59);
		assert_eq!(time.second(), 58);
		assert_eq!(DosTime::from_raw(time.to_raw()), time);
	}

	#[test]
	fn date_packing() {
		let date = DosDate::new(2024, 2, 29);
		assert_eq!(date.to_raw(), (44 << 9) | (2 << 5) | 29);
		assert_eq!(DosDate::from_raw(date.to_raw()), date);
		assert_eq!(DosDate::from_raw(0).year(), 1980);
	}

	#[test]
	fn dates_before_epoch_clamp_whole() {
		assert_eq!(DosDate::new(1975, 6, 15), DosDate::new(1980, 1, 1));
		assert_eq!(DosDate::new(1979, 12, 31).to_raw(), 0x21);
		assert_eq!(DosDate::new(1980, 6, 15).month(), 6);
	}

	#[test]
	fn raw_round_trips() {
		for raw in [0, 1, 0x21, 0x7FFF, 0xBEEF, 0xFFFF] {
			assert_eq!(DosTime::from_raw(raw).to_raw(), raw);
			assert_eq!(DosDate::from_raw(raw).to_raw(), raw);
		}
	}

	#[test]
	fn display() {
		assert_eq!(DosTime::new(9, 5, 3).to_string(), "09:05:02");
		assert_eq!(DosDate::new(1999, 12, 31).to_string(), "1999/12/31");
		assert_eq!(DosDateTime::MIN.to_string(), "1980/01/01 00:00:00");
	}

	#[test]
	fn serial_little_endian() {
		let date = DosDate::new(2000, 1, 2);
		let bytes = serial::to_bytes(&date).unwrap();
		assert_eq!(bytes, date.to_raw().to_le_bytes());
		assert_eq!(serial::from_bytes::<DosDate>(&bytes).unwrap(), date);
		assert_eq!(<DosTime as Serial>::KIND, Kind::Custom { width: 2 });
		assert_eq!(serial::size_of(&DosTime::default()), 2);
	}

	#[test]
	fn from_naive_clamps() {
		let before = NaiveDate::from_ymd_opt(1970, 1, 1)
			.unwrap()
			.and_hms_opt(12, 0, 0)
			.unwrap();
		assert_eq!(DosDateTime::from(before), DosDateTime::MIN);

		let after = NaiveDate::from_ymd_opt(2200, 6, 1)
			.unwrap()
			.and_hms_opt(0, 0, 0)
			.unwrap();
		assert_eq!(DosDateTime::from(after), DosDateTime::MAX);

		let within = NaiveDate::from_ymd_opt(2023, 10, 5)
			.unwrap()
			.and_hms_opt(17, 30, 11)
			.unwrap();
		let dos = DosDateTime::from(within);
		assert_eq!(dos.date, DosDate::new(2023, 10, 5));
		assert_eq!(dos.time, DosTime::new(17, 30, 10));
		assert_eq!(
			dos.to_naive(),
			NaiveDate::from_ymd_opt(2023, 10, 5)
				.unwrap()
				.and_hms_opt(17, 30, 10)
		);
	}

	#[test]
	fn from_local_is_in_range() {
		let dos = DosDateTime::from_local(&Utc::now());
		assert!(dos >= DosDateTime::MIN);
		assert!(dos <= DosDateTime::MAX);
	}
}
