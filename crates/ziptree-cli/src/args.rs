use std::path::PathBuf;

use clap::{value_parser, ArgAction, Parser, ValueHint};

/// Build a Zip archive from files and directories.
///
/// Directories are walked recursively, following symlinks, in file name order. Each path added
/// to the archive is printed. Files and directories that can't be read are skipped with a warning;
/// any other error aborts without writing the archive.
#[derive(Debug, Clone, Parser)]
#[command(
	name = "ziptree",
	bin_name = "ziptree",
	author,
	version,
	after_help = "Want more detail? Try the long '--help' flag!",
	after_long_help = "Didn't expect this much output? Use the short '-h' flag to get short help."
)]
#[cfg_attr(debug_assertions, command(before_help = "⚠ DEBUG BUILD ⚠"))]
pub struct Args {
	/// Compress entries with DEFLATE.
	///
	/// Entries smaller than 16 bytes are always stored as-is.
	#[arg(short, long)]
	pub deflate: bool,

	/// DEFLATE compression level.
	///
	/// From 0 (fastest) to 9 (smallest). Only applies with '--deflate'.
	#[arg(
		long,
		value_name = "LEVEL",
		default_value = "6",
		value_parser = value_parser!(u32).range(0..=9),
	)]
	pub level: u32,

	/// Set diagnostic log level.
	///
	/// This enables diagnostic logging, which is useful for investigating bugs. Use multiple times
	/// to increase verbosity.
	///
	/// You may want to use with '--log-file' to avoid polluting your terminal.
	///
	/// Setting $RUST_LOG also works, and takes precedence, but is not recommended unless you know
	/// what you're doing.
	#[arg(
		long,
		short,
		action = ArgAction::Count,
		num_args = 0,
	)]
	pub verbose: Option<u8>,

	/// Write diagnostic logs to a file.
	///
	/// This writes diagnostic logs to a file, instead of the terminal, in JSON format. If the path
	/// is a directory, a file named with the current date and time is created in it.
	#[arg(
		long,
		value_hint = ValueHint::AnyPath,
		value_name = "PATH",
	)]
	pub log_file: Option<PathBuf>,

	/// Output file.
	#[arg(
		value_hint = ValueHint::FilePath,
		value_name = "OUTPUT",
	)]
	pub output: PathBuf,

	/// Paths to add.
	#[arg(
		required = true,
		num_args = 1..,
		value_hint = ValueHint::AnyPath,
		value_name = "INPUT",
	)]
	pub paths: Vec<PathBuf>,
}
