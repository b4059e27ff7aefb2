//! Ziptree: Zip archives from filesystem trees.
//!
//! The archive layout is described as plain records in [`format`], and read or written by the
//! declarative engine in [`serial`]. [`Zip`] gathers files and assembles them into a
//! [`FileFormat`](format::FileFormat) ready to be written out.

#![warn(clippy::unwrap_used, missing_docs)]
#![deny(rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod assemble;
pub mod crc32;
pub mod deflate;
pub mod dos;
pub mod entry;
pub mod error;
pub mod format;
pub mod metadata;
pub mod serial;
mod zip;

#[doc(inline)]
pub use self::error::{Error, Result};
#[doc(inline)]
pub use self::zip::Zip;

#[doc(hidden)]
pub use tracing as __tracing;
