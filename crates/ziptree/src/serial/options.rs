//! Field annotations.
//!
//! An annotation is a comma-separated list of `key=value` items attached to a record field:
//!
//! - `len=path`: the field is a sequence whose element count is held in another field.
//! - `size=path`: the byte size of the field is held in another field.
//! - `condition=expr`: an optional field is present only if `expr` holds. `expr` is `true`,
//!   `false`, or `bit(path, n)` which tests bit `n` of the value at `path`.
//! - `prefix='bytes'`: a count-less sequence continues for as long as the upcoming bytes
//!   equal this literal.
//!
//! Paths are dotted field names relative to the record that owns the annotated field, and may
//! reach into nested records (`local_file_header.flags`). They're resolved once, when a record's
//! [descriptors](Descriptor) are built, into accessors that are then evaluated against each record
//! instance as it's being decoded.
//!
//! Lookups that fail are not errors: a missing length is zero, a missing condition is false. Only
//! syntactically broken annotations are reported, as [`SchemaError`]s.

use std::{
	fmt,
	io::{Read, Seek, SeekFrom},
	sync::{Arc, OnceLock},
};

use regex::Regex;
use tracing::{trace, warn};

use super::{
	error::{SchemaError, SchemaErrorKind},
	Resolve,
};

/// Typed accessor for an integer field somewhere inside a `P`, widened to `u64`.
///
/// Returns `None` if the field is behind an absent optional.
pub type Accessor<P> = Arc<dyn Fn(&P) -> Option<u64> + Send + Sync>;

/// Annotation options, parsed but not yet bound to a record type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
	/// Path to the field holding the element count.
	pub len: Option<String>,

	/// Path to the field holding the byte size.
	pub size: Option<String>,

	/// Presence condition expression.
	pub condition: Option<String>,

	/// Literal bytes to sniff for.
	pub prefix: Option<Vec<u8>>,
}

impl Options {
	/// Parse an annotation string.
	///
	/// Unknown keys and bare flags are ignored.
	pub fn parse(annotation: &str) -> Result<Self, SchemaErrorKind> {
		let mut options = Self::default();
		for item in split_items(annotation) {
			let item = item.trim();
			if item.is_empty() {
				continue;
			}

			let Some((key, value)) = item.split_once('=') else {
				trace!(flag = item, "ignoring bare annotation flag");
				continue;
			};

			let key = key.trim();
			let value = value.trim();
			if key.is_empty() {
				return Err(SchemaErrorKind::EmptyKey);
			}

			let slot = match key {
				"len" => &mut options.len,
				"size" => &mut options.size,
				"condition" => &mut options.condition,
				"prefix" => {
					options.prefix = Some(parse_prefix(value)?);
					continue;
				}
				other => {
					trace!(key = other, "ignoring unknown annotation key");
					continue;
				}
			};

			if value.is_empty() {
				return Err(SchemaErrorKind::MissingValue(match key {
					"len" => "len",
					"size" => "size",
					_ => "condition",
				}));
			}
			*slot = Some(value.to_string());
		}

		Ok(options)
	}
}

/// Split on commas that are outside of parentheses and quotes.
fn split_items(annotation: &str) -> Vec<&str> {
	let mut items = Vec::new();
	let mut depth = 0_usize;
	let mut quoted = false;
	let mut start = 0;
	for (at, c) in annotation.char_indices() {
		match c {
			'\'' => quoted = !quoted,
			'(' if !quoted => depth += 1,
			')' if !quoted => depth = depth.saturating_sub(1),
			',' if !quoted && depth == 0 => {
				items.push(&annotation[start..at]);
				start = at + 1;
			}
			_ => {}
		}
	}
	items.push(&annotation[start..]);
	items
}

fn parse_prefix(value: &str) -> Result<Vec<u8>, SchemaErrorKind> {
	let inner = value
		.strip_prefix('\'')
		.and_then(|rest| rest.strip_suffix('\''))
		.ok_or(if value.is_empty() {
			SchemaErrorKind::MissingValue("prefix")
		} else {
			SchemaErrorKind::UnquotedPrefix
		})?;

	if inner.is_empty() {
		return Err(SchemaErrorKind::EmptyPrefix);
	}

	Ok(inner.as_bytes().to_vec())
}

/// A parsed condition expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expression {
	/// `true` or `false`.
	Literal(bool),

	/// `bit(path, n)`.
	Bit {
		/// Path to the flags field.
		path: String,

		/// Bit index, from the least significant.
		bit: u32,
	},

	/// Anything else. Evaluates to false.
	Unrecognised(String),
}

#[allow(clippy::unwrap_used)]
fn call_pattern() -> &'static Regex {
	static CALL: OnceLock<Regex> = OnceLock::new();
	CALL.get_or_init(|| {
		// UNWRAP: the pattern is a literal that compiles
		Regex::new(
			r"^([a-z]+)\(\s*([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)\s*,\s*([0-9]+)\s*\)$",
		)
		.unwrap()
	})
}

impl Expression {
	/// Parse a condition expression.
	///
	/// This never fails: what can't be understood becomes [`Expression::Unrecognised`].
	pub fn parse(expression: &str) -> Self {
		let expression = expression.trim();
		match expression {
			"true" => return Self::Literal(true),
			"false" => return Self::Literal(false),
			_ => {}
		}

		let Some(call) = call_pattern().captures(expression) else {
			return Self::Unrecognised(expression.into());
		};

		match (&call[1], call[3].parse::<u32>()) {
			("bit", Ok(bit)) if bit < u64::BITS => Self::Bit {
				path: call[2].to_string(),
				bit,
			},
			_ => Self::Unrecognised(expression.into()),
		}
	}
}

enum Condition<P> {
	Always,
	Never,
	Bit { value: Accessor<P>, bit: u32 },
}

/// Annotation options bound to the fields of a record type `P`.
///
/// Evaluation methods take the parent record explicitly: the record that owns the annotated
/// field, in whatever state of completion it is when the field is reached.
pub struct Descriptor<P> {
	record: &'static str,
	field: &'static str,
	length: Option<Accessor<P>>,
	size: Option<Accessor<P>>,
	condition: Condition<P>,
	prefix: Option<Vec<u8>>,
}

impl<P: Resolve> Descriptor<P> {
	/// Parse an annotation and bind it to `P`.
	pub fn parse(
		record: &'static str,
		field: &'static str,
		annotation: &str,
	) -> Result<Self, SchemaError> {
		let options = Options::parse(annotation).map_err(|kind| {
			SchemaError::new(kind, record, field)
				.with_message(format!("{} in `{annotation}`", kind.default_message()))
		})?;
		Ok(Self::bind(record, field, &options))
	}

	/// Bind parsed options to `P`, resolving their paths.
	pub fn bind(record: &'static str, field: &'static str, options: &Options) -> Self {
		let lookup = |key: &'static str, path: &str| {
			let segments: Vec<&str> = path.split('.').map(str::trim).collect();
			let accessor = P::accessor(&segments);
			if accessor.is_none() {
				warn!(
					record,
					field, key, path, "annotation path does not lead to an integer field"
				);
			}
			accessor
		};

		let condition = match options.condition.as_deref().map(Expression::parse) {
			None | Some(Expression::Literal(true)) => Condition::Always,
			Some(Expression::Literal(false)) => Condition::Never,
			Some(Expression::Bit { path, bit }) => match lookup("condition", &path) {
				Some(value) => Condition::Bit { value, bit },
				None => Condition::Never,
			},
			Some(Expression::Unrecognised(expression)) => {
				warn!(record, field, %expression, "unrecognised condition, field will be absent");
				Condition::Never
			}
		};

		Self {
			record,
			field,
			length: options.len.as_deref().and_then(|path| lookup("len", path)),
			size: options.size.as_deref().and_then(|path| lookup("size", path)),
			condition,
			prefix: options.prefix.clone(),
		}
	}
}

impl<P> Descriptor<P> {
	/// Name of the annotated field.
	pub fn field(&self) -> &'static str {
		self.field
	}

	/// Name of the record that owns the annotated field.
	pub fn record(&self) -> &'static str {
		self.record
	}

	/// Element count from the `len` path, or zero.
	pub fn resolve_length(&self, parent: &P) -> u64 {
		self.length
			.as_ref()
			.and_then(|length| length(parent))
			.unwrap_or(0)
	}

	/// Byte size from the `size` path, or zero.
	pub fn resolve_size(&self, parent: &P) -> u64 {
		self.size.as_ref().and_then(|size| size(parent)).unwrap_or(0)
	}

	/// Whether the field is present. Without a `condition`, it always is.
	pub fn evaluate_condition(&self, parent: &P) -> bool {
		match &self.condition {
			Condition::Always => true,
			Condition::Never => false,
			Condition::Bit { value, bit } => value(parent).map_or(false, |flags| flags & (1 << bit) != 0),
		}
	}

	/// Whether the next bytes in the stream equal the `prefix` literal.
	///
	/// Never moves the stream. Without a `prefix`, this is always false.
	pub fn check_prefix<R: Read + Seek>(&self, reader: &mut R) -> bool {
		self.prefix
			.as_deref()
			.map_or(false, |prefix| peek_matches(reader, prefix))
	}
}

impl<P> fmt::Debug for Descriptor<P> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Descriptor")
			.field("record", &self.record)
			.field("field", &self.field)
			.field("length", &self.length.as_ref().map(|_| "accessor"))
			.field("size", &self.size.as_ref().map(|_| "accessor"))
			.field(
				"condition",
				&match &self.condition {
					Condition::Always => "always".to_string(),
					Condition::Never => "never".to_string(),
					Condition::Bit { bit, .. } => format!("bit {bit}"),
				},
			)
			.field("prefix", &self.prefix)
			.finish()
	}
}

/// Seeks back to where it was created when dropped.
struct Rewind<'r, R: Seek> {
	reader: &'r mut R,
	start: u64,
}

impl<R: Seek> Drop for Rewind<'_, R> {
	fn drop(&mut self) {
		if let Err(err) = self.reader.seek(SeekFrom::Start(self.start)) {
			warn!(%err, start = self.start, "failed to rewind after peeking");
		}
	}
}

/// Compare the upcoming bytes with `expected`, then rewind.
pub(crate) fn peek_matches<R: Read + Seek>(reader: &mut R, expected: &[u8]) -> bool {
	let Ok(start) = reader.stream_position() else {
		return false;
	};

	let peek = Rewind { reader, start };
	let mut upcoming = vec![0; expected.len()];
	match peek.reader.read_exact(&mut upcoming) {
		Ok(()) => upcoming == expected,
		Err(err) => {
			trace!(%err, "short read while peeking");
			false
		}
	}
}
