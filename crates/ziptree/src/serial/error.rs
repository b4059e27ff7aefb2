//! Error types for the [serial](super) engine.
use std::borrow::Cow;

use miette::Diagnostic;
use thiserror::Error;

/// Convenience return type.
pub type Result<T> = std::result::Result<T, Error>;

/// Combined error type for encoding and decoding records.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
	/// I/O error, including running out of input.
	#[error(transparent)]
	Io(#[from] std::io::Error),

	/// A record's field annotations could not be parsed.
	#[error(transparent)]
	#[diagnostic(transparent)]
	Schema(#[from] SchemaError),
}

/// Malformed field annotation.
///
/// This is structural: a record type with a bad annotation can never be decoded, so this is
/// reported on every attempt rather than retried.
#[derive(Clone, Error, Diagnostic, Debug, PartialEq, Eq)]
#[error("serial schema {record}.{field}: {message}")]
#[diagnostic(
	code(ziptree::serial::schema),
	help("annotations are comma-separated key=value pairs with keys len, size, condition, prefix")
)]
pub struct SchemaError {
	/// Error kind.
	pub kind: SchemaErrorKind,

	/// Record type the annotation belongs to.
	pub record: &'static str,

	/// Field the annotation is attached to.
	pub field: &'static str,

	/// Error message.
	pub message: Cow<'static, str>,
}

impl SchemaError {
	/// New error for a field of a record.
	pub fn new(kind: SchemaErrorKind, record: &'static str, field: &'static str) -> Self {
		Self {
			kind,
			record,
			field,
			message: kind.default_message(),
		}
	}

	/// Change the error message.
	pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
		self.message = message.into();
		self
	}
}

/// Schema error kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchemaErrorKind {
	/// An item had a `=` but nothing before it.
	EmptyKey,

	/// A recognised key was given without a value.
	MissingValue(&'static str),

	/// The prefix literal wasn't wrapped in single quotes.
	UnquotedPrefix,

	/// The prefix literal was empty, which would match forever.
	EmptyPrefix,
}

impl SchemaErrorKind {
	/// Get the default error message for this error kind.
	pub fn default_message(self) -> Cow<'static, str> {
		match self {
			Self::EmptyKey => Cow::Borrowed("annotation item has an empty key"),
			Self::MissingValue(key) => Cow::Owned(format!("annotation key `{key}` has no value")),
			Self::UnquotedPrefix => Cow::Borrowed("prefix must be a single-quoted byte string"),
			Self::EmptyPrefix => Cow::Borrowed("prefix must not be empty"),
		}
	}
}
