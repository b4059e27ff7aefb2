use std::{
	fs::File,
	io::{BufWriter, Write},
};

use miette::{Context, IntoDiagnostic, Result};
use tracing::{debug, info};
use walkdir::WalkDir;
use ziptree::{format::CompressionMethod, Zip};

use crate::args::Args;

pub(crate) fn pack(args: Args) -> Result<()> {
	let mut zip = Zip::new();
	if args.deflate {
		debug!(level = args.level, "enable deflate");
		zip.set_compression_method(CompressionMethod::Deflated)?;
		zip.set_deflate_level(args.level);
	}

	for path in &args.paths {
		info!("walk {path:?}");
		for entry in WalkDir::new(path).follow_links(true).sort_by_file_name() {
			let entry = entry
				.into_diagnostic()
				.wrap_err_with(|| format!("walking {}", path.display()))?;

			let filename = entry.path();
			debug!("add {filename:?}");
			if zip.add(filename)? {
				if let Some(added) = zip.entries().last() {
					println!("{}", added.path);
				}
			}
		}
	}

	info!(path=?args.output, "create output file");
	let file = File::create(&args.output)
		.into_diagnostic()
		.wrap_err_with(|| format!("creating {}", args.output.display()))?;
	let mut writer = BufWriter::new(file);

	info!(entries = zip.entries().len(), "writing archive");
	let size = zip.write_to(&mut writer)?;
	writer.flush().into_diagnostic()?;
	debug!(size, "done");
	Ok(())
}
