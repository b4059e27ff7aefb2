//! [`Serial`] for scalars, sequences, arrays, and optionals.

use std::{
	io::{self, Read, Seek, Write},
	sync::Arc,
};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use tracing::trace;

use super::{Accessor, Error, Field, Kind, Resolve, Result, Serial};

macro_rules! integer {
	($($ty:ty => $read:ident, $write:ident;)*) => {$(
		impl Resolve for $ty {
			fn accessor(path: &[&str]) -> Option<Accessor<Self>> {
				if !path.is_empty() {
					return None;
				}

				let accessor: Accessor<Self> = Arc::new(|value: &$ty| Some(*value as u64));
				Some(accessor)
			}
		}

		impl Serial for $ty {
			const KIND: Kind = Kind::Scalar { width: ::std::mem::size_of::<$ty>() as u8 };

			fn decode<R: Read + Seek, P>(reader: &mut R, _field: Field<'_, P>) -> Result<Self> {
				Ok(reader.$read::<LittleEndian>()?)
			}

			fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
				Ok(writer.$write::<LittleEndian>(*self)?)
			}

			fn size_of(&self) -> u64 {
				::std::mem::size_of::<$ty>() as u64
			}
		}
	)*};
}

integer! {
	u16 => read_u16, write_u16;
	u32 => read_u32, write_u32;
	u64 => read_u64, write_u64;
	i16 => read_i16, write_i16;
	i32 => read_i32, write_i32;
	i64 => read_i64, write_i64;
}

macro_rules! float {
	($($ty:ty => $read:ident, $write:ident;)*) => {$(
		impl Resolve for $ty {}

		impl Serial for $ty {
			const KIND: Kind = Kind::Scalar { width: ::std::mem::size_of::<$ty>() as u8 };

			fn decode<R: Read + Seek, P>(reader: &mut R, _field: Field<'_, P>) -> Result<Self> {
				Ok(reader.$read::<LittleEndian>()?)
			}

			fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
				Ok(writer.$write::<LittleEndian>(*self)?)
			}

			fn size_of(&self) -> u64 {
				::std::mem::size_of::<$ty>() as u64
			}
		}
	)*};
}

float! {
	f32 => read_f32, write_f32;
	f64 => read_f64, write_f64;
}

// single bytes have no endianness, and sequences of them are read and written as one block

impl Resolve for u8 {
	fn accessor(path: &[&str]) -> Option<Accessor<Self>> {
		if !path.is_empty() {
			return None;
		}

		let accessor: Accessor<Self> = Arc::new(|value: &u8| Some(u64::from(*value)));
		Some(accessor)
	}
}

impl Serial for u8 {
	const KIND: Kind = Kind::Scalar { width: 1 };

	fn decode<R: Read + Seek, P>(reader: &mut R, _field: Field<'_, P>) -> Result<Self> {
		Ok(reader.read_u8()?)
	}

	fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
		Ok(writer.write_u8(*self)?)
	}

	fn size_of(&self) -> u64 {
		1
	}

	fn decode_many<R: Read + Seek, P>(
		reader: &mut R,
		count: u64,
		_field: Field<'_, P>,
	) -> Result<Vec<Self>> {
		let mut bytes = Vec::new();
		reader.by_ref().take(count).read_to_end(&mut bytes)?;
		if (bytes.len() as u64) < count {
			return Err(io::Error::new(
				io::ErrorKind::UnexpectedEof,
				format!("expected {count} bytes, got {}", bytes.len()),
			)
			.into());
		}
		Ok(bytes)
	}

	fn encode_many<W: Write>(items: &[Self], writer: &mut W) -> Result<()> {
		Ok(writer.write_all(items)?)
	}
}

impl Resolve for i8 {
	fn accessor(path: &[&str]) -> Option<Accessor<Self>> {
		if !path.is_empty() {
			return None;
		}

		let accessor: Accessor<Self> = Arc::new(|value: &i8| Some(*value as u64));
		Some(accessor)
	}
}

impl Serial for i8 {
	const KIND: Kind = Kind::Scalar { width: 1 };

	fn decode<R: Read + Seek, P>(reader: &mut R, _field: Field<'_, P>) -> Result<Self> {
		Ok(reader.read_i8()?)
	}

	fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
		Ok(writer.write_i8(*self)?)
	}

	fn size_of(&self) -> u64 {
		1
	}
}

impl<T: Serial> Resolve for Vec<T> {}

impl<T: Serial> Serial for Vec<T> {
	const KIND: Kind = Kind::Sequence;

	fn decode<R: Read + Seek, P>(reader: &mut R, field: Field<'_, P>) -> Result<Self> {
		let length = field.length();
		if length > 0 {
			trace!(field = field.name(), length, "sequence with known length");
			return T::decode_many(reader, length, field);
		}

		let mut items = Vec::new();
		while field.check_prefix(reader) {
			items.push(T::decode(reader, field.element())?);
		}
		trace!(field = field.name(), count = items.len(), "sequence by prefix");
		Ok(items)
	}

	fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
		T::encode_many(self, writer)
	}

	fn size_of(&self) -> u64 {
		self.iter().map(Serial::size_of).sum()
	}
}

impl<T: Serial, const N: usize> Resolve for [T; N] {}

impl<T: Serial, const N: usize> Serial for [T; N] {
	const KIND: Kind = Kind::Array { len: N };

	fn decode<R: Read + Seek, P>(reader: &mut R, field: Field<'_, P>) -> Result<Self> {
		let items = T::decode_many(reader, N as u64, field.element())?;
		items.try_into().map_err(|items: Vec<T>| {
			Error::from(io::Error::new(
				io::ErrorKind::InvalidData,
				format!("expected {N} elements, got {}", items.len()),
			))
		})
	}

	fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
		T::encode_many(self, writer)
	}

	fn size_of(&self) -> u64 {
		self.iter().map(Serial::size_of).sum()
	}
}

impl<T: Serial> Resolve for Option<T> {
	fn accessor(path: &[&str]) -> Option<Accessor<Self>> {
		let inner = T::accessor(path)?;
		let accessor: Accessor<Self> =
			Arc::new(move |value: &Option<T>| value.as_ref().and_then(|value| inner(value)));
		Some(accessor)
	}
}

impl<T: Serial> Serial for Option<T> {
	const KIND: Kind = Kind::Optional;

	fn decode<R: Read + Seek, P>(reader: &mut R, field: Field<'_, P>) -> Result<Self> {
		if !field.is_present() {
			trace!(field = field.name(), "condition false, absent");
			return Ok(None);
		}

		T::decode(reader, field).map(Some)
	}

	fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
		match self {
			Some(value) => value.encode(writer),
			None => Ok(()),
		}
	}

	fn size_of(&self) -> u64 {
		self.as_ref().map_or(0, Serial::size_of)
	}
}
