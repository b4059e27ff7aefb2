//! MS-DOS date, time, and file attributes, as found in Zip headers.

pub mod attributes;
mod datetime;

#[doc(inline)]
pub use self::datetime::{DosDate, DosDateTime, DosTime};
