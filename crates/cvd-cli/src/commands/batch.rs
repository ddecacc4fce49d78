//! Batch processing command

use crate::BatchArgs;
use anyhow::{Result, bail};
use cvd_vision::VisionSimulator;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

pub fn run(args: BatchArgs, verbose: u8) -> Result<()> {
    trace!(pattern = %args.input, condition = %args.condition, "batch::run");

    // Find matching files
    let files: Vec<PathBuf> = glob::glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        bail!("No files match pattern: {}", args.input);
    }

    info!(files = files.len(), pattern = %args.input, condition = %args.condition, "Starting batch processing");

    if verbose > 0 {
        println!("Found {} files matching '{}'", files.len(), args.input);
    }

    std::fs::create_dir_all(&args.output_dir)?;

    // One simulator per file; each image is also banded internally.
    let results: Vec<(&PathBuf, Result<PathBuf>)> = files
        .par_iter()
        .map(|input| (input, process_file(input, &args)))
        .collect();

    let mut success = 0;
    let mut failed = 0;
    for (input, r) in results {
        match r {
            Ok(output) => {
                success += 1;
                if verbose > 0 {
                    println!("{} -> {}", input.display(), output.display());
                }
            }
            Err(e) => {
                failed += 1;
                warn!(input = %input.display(), error = %format!("{:#}", e), "skipped");
                eprintln!("Error: {:#}", e);
            }
        }
    }

    info!(success, failed, "Batch processing complete");
    println!("Processed: {} success, {} failed", success, failed);

    if failed > 0 {
        bail!("{} files failed", failed);
    }

    Ok(())
}

fn process_file(input: &Path, args: &BatchArgs) -> Result<PathBuf> {
    let output = super::condition_output(input, &args.output_dir, args.condition);
    debug!(input = %input.display(), output = %output.display(), "processing");

    let mut image = super::load_image(input)?;
    super::ensure_opaque(&mut image, args.flatten, input)?;
    VisionSimulator::new().simulate_image(&mut image, args.condition)?;
    super::save_image(&output, &image)?;

    Ok(output)
}
