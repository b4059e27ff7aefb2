//! Declarative binary serialisation.
//!
//! Types implement [`Serial`] to be read from and written to little-endian byte streams. Scalars,
//! byte arrays, sequences and optionals are provided here; records (structs of other serial
//! types) are declared with the [`record!`](crate::record) macro, which takes field annotations
//! describing where a sequence's length comes from, when an optional field is present, or which
//! bytes signal that a sequence continues. See [`options`] for the annotation grammar.
//!
//! Encoding needs no annotations: every value already carries its own lengths. Decoding is
//! strictly in declared field order, so a length or flags field must come before the fields that
//! depend on it.
//!
//! ```
//! use ziptree::{record, serial};
//!
//! record! {
//! 	/// A length-prefixed greeting.
//! 	#[derive(Clone, Debug, Default, PartialEq, Eq)]
//! 	pub struct Greeting {
//! 		pub length: u16,
//! 		#[serial("len=length")]
//! 		pub text: Vec<u8>,
//! 	}
//! }
//!
//! let bytes = serial::to_bytes(&Greeting { length: 2, text: b"hi".to_vec() }).unwrap();
//! assert_eq!(bytes, b"\x02\x00hi");
//! let greeting: Greeting = serial::from_bytes(&bytes).unwrap();
//! assert_eq!(greeting.text, b"hi");
//! ```

use std::io::{Cursor, Read, Seek, Write};

use tracing::instrument;

#[doc(inline)]
pub use self::error::{Error, Result, SchemaError, SchemaErrorKind};
#[doc(inline)]
pub use self::options::{Accessor, Descriptor, Expression, Options};

pub mod error;
pub mod options;
mod primitives;
mod record;

/// Structural kind of a serial type.
///
/// Dispatch is static, so this is informational: it's what the engine would switch on if it had
/// to, and lets tooling and tests ask what a type is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
	/// Fixed-width little-endian integer or float.
	Scalar {
		/// Width in bytes.
		width: u8,
	},

	/// Type with its own fixed-width encoding.
	Custom {
		/// Width in bytes.
		width: u8,
	},

	/// Value present or absent according to a condition.
	Optional,

	/// Sequence with a length from another field, or continued by a prefix.
	Sequence,

	/// Sequence of statically known length.
	Array {
		/// Number of elements.
		len: usize,
	},

	/// Struct of serial fields.
	Record,
}

/// Path lookup into a type, for field annotations.
///
/// Records implement this to resolve the first segment of a dotted path to one of their fields,
/// and delegate the rest to the field's type. Integers resolve the empty path to themselves. All
/// other types resolve nothing, which is the default.
pub trait Resolve: Sized + 'static {
	/// Build an accessor for the integer at `path`, if there is one.
	fn accessor(path: &[&str]) -> Option<Accessor<Self>> {
		let _ = path;
		None
	}
}

/// A type that can be decoded from and encoded to a byte stream.
pub trait Serial: Resolve {
	/// Structural kind of this type.
	const KIND: Kind;

	/// Decode a value.
	///
	/// `field` carries the annotation of the field being decoded, if any, and the partially
	/// decoded record that owns it.
	fn decode<R: Read + Seek, P>(reader: &mut R, field: Field<'_, P>) -> Result<Self>;

	/// Encode the value.
	fn encode<W: Write>(&self, writer: &mut W) -> Result<()>;

	/// Number of bytes [`encode`](Serial::encode) writes.
	fn size_of(&self) -> u64;

	/// Decode `count` values in a row.
	fn decode_many<R: Read + Seek, P>(
		reader: &mut R,
		count: u64,
		field: Field<'_, P>,
	) -> Result<Vec<Self>> {
		// no preallocation: count comes from the stream
		let mut items = Vec::new();
		for _ in 0..count {
			items.push(Self::decode(reader, field.element())?);
		}
		Ok(items)
	}

	/// Encode values in a row.
	fn encode_many<W: Write>(items: &[Self], writer: &mut W) -> Result<()> {
		for item in items {
			item.encode(writer)?;
		}
		Ok(())
	}
}

/// Decoding context for one field.
pub struct Field<'a, P> {
	parent: &'a P,
	descriptor: Option<&'a Descriptor<P>>,
}

impl<P> Clone for Field<'_, P> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<P> Copy for Field<'_, P> {}

impl<'a, P> Field<'a, P> {
	/// Field described by an annotation, owned by `parent`.
	pub fn new(parent: &'a P, descriptor: &'a Descriptor<P>) -> Self {
		Self::with(parent, Some(descriptor))
	}

	/// Field without an annotation.
	pub fn bare(parent: &'a P) -> Self {
		Self::with(parent, None)
	}

	/// Field with an optional annotation.
	pub fn with(parent: &'a P, descriptor: Option<&'a Descriptor<P>>) -> Self {
		Self { parent, descriptor }
	}

	/// The record that owns this field.
	pub fn parent(&self) -> &'a P {
		self.parent
	}

	/// The field's name, if it has an annotation.
	pub fn name(&self) -> Option<&'static str> {
		self.descriptor.map(Descriptor::field)
	}

	/// Element count from `len`, or zero.
	pub fn length(&self) -> u64 {
		self.descriptor
			.map_or(0, |descriptor| descriptor.resolve_length(self.parent))
	}

	/// Byte size from `size`, or zero.
	pub fn size(&self) -> u64 {
		self.descriptor
			.map_or(0, |descriptor| descriptor.resolve_size(self.parent))
	}

	/// Whether the field's `condition` holds. Fields without one are always present.
	pub fn is_present(&self) -> bool {
		self.descriptor
			.map_or(true, |descriptor| descriptor.evaluate_condition(self.parent))
	}

	/// Whether the upcoming bytes match the field's `prefix`. Never moves the stream.
	pub fn check_prefix<R: Read + Seek>(&self, reader: &mut R) -> bool {
		self.descriptor
			.map_or(false, |descriptor| descriptor.check_prefix(reader))
	}

	/// Context for an element of this field: same parent, no annotation.
	///
	/// Annotations describe the field as a whole, not what's inside it.
	pub fn element(&self) -> Self {
		Self::bare(self.parent)
	}
}

/// Decode a value from the current position of a stream.
#[instrument(level = "trace", skip(reader))]
pub fn decode<T: Serial, R: Read + Seek>(reader: &mut R) -> Result<T> {
	T::decode(reader, Field::bare(&()))
}

/// Encode a value at the current position of a stream.
#[instrument(level = "trace", skip(value, writer))]
pub fn encode<T: Serial, W: Write>(value: &T, writer: &mut W) -> Result<()> {
	value.encode(writer)
}

/// Number of bytes a value encodes to.
pub fn size_of<T: Serial>(value: &T) -> u64 {
	value.size_of()
}

/// Encode a value to a new buffer.
pub fn to_bytes<T: Serial>(value: &T) -> Result<Vec<u8>> {
	let mut buf = Vec::with_capacity(usize::try_from(value.size_of()).unwrap_or(0));
	value.encode(&mut buf)?;
	Ok(buf)
}

/// Decode a value from the start of a byte slice.
///
/// Trailing bytes are ignored.
pub fn from_bytes<T: Serial>(bytes: &[u8]) -> Result<T> {
	decode(&mut Cursor::new(bytes))
}
