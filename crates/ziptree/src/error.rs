//! Error types for building archives.
use std::borrow::Cow;

use miette::Diagnostic;
use thiserror::Error;

use crate::{format::CompressionMethod, serial};

/// Convenience return type.
pub type Result<T> = std::result::Result<T, Error>;

/// Combined error type for building and writing archives.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
	/// I/O error.
	#[error(transparent)]
	Io(#[from] std::io::Error),

	/// Encoding or decoding error.
	#[error(transparent)]
	#[diagnostic(transparent)]
	Serial(#[from] serial::Error),

	/// The compression codec failed.
	#[error("ziptree: compressing {path}")]
	#[diagnostic(code(ziptree::codec))]
	Codec {
		/// Entry being compressed.
		path: String,

		/// Codec error.
		#[source]
		source: std::io::Error,
	},

	/// Error that's just a message.
	#[error(transparent)]
	#[diagnostic(transparent)]
	Simple(#[from] SimpleError),
}

/// Archive error.
#[derive(Error, Diagnostic, Debug)]
#[error("ziptree: {message}")]
#[diagnostic(code(ziptree::archive))]
pub struct SimpleError {
	/// Error kind.
	pub kind: ErrorKind,

	/// Error message.
	pub message: Cow<'static, str>,
}

impl SimpleError {
	/// New error.
	pub fn new(kind: ErrorKind) -> Self {
		Self {
			kind,
			message: kind.default_message(),
		}
	}

	/// Change the error message.
	pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
		self.message = message.into();
		self
	}
}

/// Archive error kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// A value doesn't fit its header field. Larger archives need ZIP64, which isn't supported.
	TooLarge {
		/// What overflowed.
		what: &'static str,
		/// The value.
		value: u64,
		/// The largest value the field holds.
		limit: u64,
	},

	/// Only stored and deflated entries can be written.
	UnsupportedMethod(CompressionMethod),
}

impl ErrorKind {
	/// Get the default error message for this error kind.
	pub fn default_message(self) -> Cow<'static, str> {
		match self {
			ErrorKind::TooLarge { what, value, limit } => Cow::Owned(format!(
				"{what} is {value}, over the limit of {limit} (ZIP64 is not supported)"
			)),
			ErrorKind::UnsupportedMethod(method) => {
				Cow::Owned(format!("unsupported compression method {method}"))
			}
		}
	}
}

impl From<ErrorKind> for SimpleError {
	fn from(ek: ErrorKind) -> Self {
		Self::new(ek)
	}
}

impl From<ErrorKind> for Error {
	fn from(ek: ErrorKind) -> Self {
		Self::Simple(ek.into())
	}
}
