//! The [`record!`](crate::record) macro.

/// Declare a record: a struct whose fields are encoded and decoded in order.
///
/// Every field must be `pub` and of a [`Serial`](crate::serial::Serial) type, and the struct must
/// implement [`Default`] (decoding starts from a default record and fills it in). Fields can
/// carry a `#[serial("...")]` annotation, see [`options`](crate::serial::options) for its grammar.
/// Doc comments on fields go before the annotation.
///
/// Preceding the struct with `@size_of(path::to::fn)` replaces the derived size computation with
/// a call to that function, which takes `&Self` and returns `u64`.
///
/// The macro also generates an inherent `descriptors()` method returning the parsed annotations,
/// and a [`Resolve`](crate::serial::Resolve) implementation so that the record's integer fields
/// can be referred to by path from annotations in enclosing records.
///
/// ```
/// use ziptree::{record, serial};
///
/// record! {
/// 	#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// 	pub struct Header {
/// 		pub flags: u8,
/// 		pub count: u8,
/// 	}
/// }
///
/// record! {
/// 	#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// 	pub struct Chunk {
/// 		pub header: Header,
/// 		#[serial("len=header.count")]
/// 		pub items: Vec<u16>,
/// 		#[serial("condition=bit(header.flags, 0)")]
/// 		pub checksum: Option<u32>,
/// 	}
/// }
///
/// let chunk: Chunk = serial::from_bytes(b"\x00\x02\x01\x00\x02\x00").unwrap();
/// assert_eq!(chunk.items, [1, 2]);
/// assert_eq!(chunk.checksum, None);
/// ```
#[macro_export]
macro_rules! record {
	(@__annotation) => { "" };
	(@__annotation $annotation:literal) => { $annotation };

	(@__size $this:ident [$size:path] [$($field:ident)*]) => { $size($this) };
	(@__size $this:ident [] [$($field:ident)*]) => {
		0 $(+ $crate::serial::Serial::size_of(&$this.$field))*
	};

	(
		$(@size_of($size:path))?
		$(#[$attr:meta])*
		$vis:vis struct $name:ident {
			$(
				$(#[doc = $doc:literal])*
				$(#[serial($annotation:literal)])?
				pub $field:ident : $ty:ty
			),* $(,)?
		}
	) => {
		$(#[$attr])*
		$vis struct $name {
			$(
				$(#[doc = $doc])*
				pub $field: $ty,
			)*
		}

		impl $name {
			/// Field annotations, parsed once per program run.
			#[allow(dead_code)]
			pub fn descriptors() -> ::std::result::Result<
				&'static [$crate::serial::Descriptor<Self>],
				$crate::serial::SchemaError,
			> {
				static DESCRIPTORS: ::std::sync::OnceLock<
					::std::result::Result<
						::std::vec::Vec<$crate::serial::Descriptor<$name>>,
						$crate::serial::SchemaError,
					>,
				> = ::std::sync::OnceLock::new();

				DESCRIPTORS
					.get_or_init(|| {
						::std::result::Result::Ok(::std::vec![$(
							$crate::serial::Descriptor::parse(
								::std::stringify!($name),
								::std::stringify!($field),
								$crate::record!(@__annotation $($annotation)?),
							)?
						),*])
					})
					.as_ref()
					.map(::std::vec::Vec::as_slice)
					.map_err(::std::clone::Clone::clone)
			}
		}

		impl $crate::serial::Resolve for $name {
			fn accessor(path: &[&str]) -> ::std::option::Option<$crate::serial::Accessor<Self>> {
				let (first, rest) = path.split_first()?;
				$(
					if *first == ::std::stringify!($field) {
						let inner = <$ty as $crate::serial::Resolve>::accessor(rest)?;
						let accessor: $crate::serial::Accessor<Self> =
							::std::sync::Arc::new(move |record: &$name| inner(&record.$field));
						return ::std::option::Option::Some(accessor);
					}
				)*
				let _ = rest;
				::std::option::Option::None
			}
		}

		impl $crate::serial::Serial for $name {
			const KIND: $crate::serial::Kind = $crate::serial::Kind::Record;

			fn decode<R: ::std::io::Read + ::std::io::Seek, P>(
				reader: &mut R,
				_field: $crate::serial::Field<'_, P>,
			) -> $crate::serial::Result<Self> {
				let descriptors = Self::descriptors()?;
				let mut record = <Self as ::std::default::Default>::default();
				#[allow(unused_mut, unused_variables)]
				let mut fields = descriptors.iter();
				$(
					$crate::__tracing::trace!(
						record = ::std::stringify!($name),
						field = ::std::stringify!($field),
						"decode field"
					);
					record.$field = <$ty as $crate::serial::Serial>::decode(
						reader,
						$crate::serial::Field::with(&record, fields.next()),
					)?;
				)*
				::std::result::Result::Ok(record)
			}

			fn encode<W: ::std::io::Write>(&self, writer: &mut W) -> $crate::serial::Result<()> {
				$(
					$crate::serial::Serial::encode(&self.$field, writer)?;
				)*
				let _ = writer;
				::std::result::Result::Ok(())
			}

			fn size_of(&self) -> u64 {
				let this = self;
				$crate::record!(@__size this [$($size)?] [$($field)*])
			}
		}
	};
}

#[cfg(test)]
mod tests {
	use std::io::Cursor;

	use crate::serial::{self, Error, Kind, Resolve, SchemaErrorKind, Serial};

	record! {
		#[derive(Clone, Debug, Default, PartialEq, Eq)]
		pub struct Inner {
			pub flags: u16,
			pub length: u8,
		}
	}

	record! {
		#[derive(Clone, Debug, Default, PartialEq, Eq)]
		pub struct Outer {
			/// Tag.
			pub tag: [u8; 2],
			pub inner: Inner,
			#[serial("len=inner.length")]
			pub body: Vec<u8>,
			#[serial("condition=bit(inner.flags, 3)")]
			pub trailer: Option<u32>,
		}
	}

	record! {
		#[derive(Clone, Debug, Default, PartialEq, Eq)]
		pub struct Tagged {
			pub tag: [u8; 2],
			pub value: u8,
		}
	}

	record! {
		#[derive(Clone, Debug, Default, PartialEq, Eq)]
		pub struct Stream {
			#[serial("prefix='TG'")]
			pub items: Vec<Tagged>,
			pub end: u8,
		}
	}

	record! {
		#[derive(Clone, Debug, Default, PartialEq, Eq)]
		pub struct Broken {
			pub length: u8,
			#[serial("prefix=TG")]
			pub items: Vec<u8>,
		}
	}

	fn fixed_size(_: &Sized8) -> u64 {
		8
	}

	record! {
		@size_of(fixed_size)
		#[derive(Clone, Debug, Default, PartialEq, Eq)]
		pub struct Sized8 {
			pub value: u64,
		}
	}

	#[test]
	fn decode_in_order_with_nested_paths() {
		let bytes = b"AB\x08\x00\x03xyz\x78\x56\x34\x12rest";
		let mut stream = Cursor::new(&bytes[..]);
		let outer: Outer = serial::decode(&mut stream).unwrap();
		assert_eq!(outer, Outer {
			tag: *b"AB",
			inner: Inner {
				flags: 8,
				length: 3
			},
			body: b"xyz".to_vec(),
			trailer: Some(0x1234_5678),
		});
		assert_eq!(stream.position(), 12);
	}

	#[test]
	fn condition_false_reads_nothing() {
		let bytes = b"AB\x00\x00\x01zrest";
		let mut stream = Cursor::new(&bytes[..]);
		let outer: Outer = serial::decode(&mut stream).unwrap();
		assert_eq!(outer.body, b"z");
		assert_eq!(outer.trailer, None);
		assert_eq!(stream.position(), 6);
	}

	#[test]
	fn zero_length_without_prefix_is_empty() {
		let outer: Outer = serial::from_bytes(b"AB\x00\x00\x00").unwrap();
		assert!(outer.body.is_empty());
	}

	#[test]
	fn encode_matches_size() {
		let outer = Outer {
			tag: *b"CD",
			inner: Inner {
				flags: 8,
				length: 2,
			},
			body: b"hi".to_vec(),
			trailer: Some(1),
		};
		let bytes = serial::to_bytes(&outer).unwrap();
		assert_eq!(bytes, b"CD\x08\x00\x02hi\x01\x00\x00\x00");
		assert_eq!(outer.size_of(), bytes.len() as u64);
		assert_eq!(serial::from_bytes::<Outer>(&bytes).unwrap(), outer);
	}

	#[test]
	fn prefix_repetition_stops_at_mismatch() {
		let bytes = b"TG\x01TG\x02XX";
		let mut stream = Cursor::new(&bytes[..]);
		let decoded: Stream = serial::decode(&mut stream).unwrap();
		assert_eq!(decoded.items.len(), 2);
		assert_eq!(decoded.items[1].value, 2);
		assert_eq!(decoded.end, b'X');
		assert_eq!(stream.position(), 7);
	}

	#[test]
	fn prefix_zero_matches() {
		let decoded: Stream = serial::from_bytes(b"\x09").unwrap();
		assert!(decoded.items.is_empty());
		assert_eq!(decoded.end, 9);
	}

	#[test]
	fn truncated_input_fails() {
		let err = serial::from_bytes::<Outer>(b"AB\x00\x00\x05ab").unwrap_err();
		assert!(matches!(err, Error::Io(_)), "{err:?}");
	}

	#[test]
	fn broken_annotation_is_reported_every_time() {
		for _ in 0..2 {
			let err = serial::from_bytes::<Broken>(b"\x00").unwrap_err();
			let Error::Schema(schema) = err else {
				panic!("expected schema error, got {err:?}");
			};
			assert_eq!(schema.kind, SchemaErrorKind::UnquotedPrefix);
			assert_eq!(schema.record, "Broken");
			assert_eq!(schema.field, "items");
			assert!(schema.message.ends_with("in `prefix=TG`"), "{}", schema.message);
		}

		// encoding doesn't need annotations
		let bytes = serial::to_bytes(&Broken {
			length: 1,
			items: vec![2],
		})
		.unwrap();
		assert_eq!(bytes, [1, 2]);
	}

	#[test]
	fn size_override() {
		assert_eq!(Sized8 { value: 1 }.size_of(), 8);
		assert_eq!(<Sized8 as Serial>::KIND, Kind::Record);
	}

	#[test]
	fn resolve_paths() {
		let outer = Outer {
			inner: Inner {
				flags: 0xF0,
				length: 4,
			},
			trailer: Some(77),
			..Default::default()
		};
		let flags = Outer::accessor(&["inner", "flags"]).expect("resolves");
		assert_eq!(flags(&outer), Some(0xF0));
		let trailer = Outer::accessor(&["trailer"]).expect("resolves through optional");
		assert_eq!(trailer(&outer), Some(77));
		assert_eq!(trailer(&Outer::default()), None);
		assert!(Outer::accessor(&["inner"]).is_none(), "records aren't integers");
		assert!(Outer::accessor(&["body"]).is_none());
		assert!(Outer::accessor(&["inner", "nope"]).is_none());
		assert!(Outer::accessor(&[]).is_none());
	}

	#[test]
	fn descriptors_are_shared() {
		let first = Outer::descriptors().unwrap();
		let second = Outer::descriptors().unwrap();
		assert_eq!(first.len(), 4);
		assert!(std::ptr::eq(first, second));
		assert_eq!(first[2].field(), "body");
		assert_eq!(first[2].record(), "Outer");
	}
}
