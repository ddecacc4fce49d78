//! Simulate command

use crate::SimulateArgs;
use anyhow::{Context, Result};
use cvd_vision::{VisionCondition, VisionSimulator};
use std::path::PathBuf;
use tracing::{info, trace};

pub fn run(args: SimulateArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), all = args.all, "simulate::run");

    let mut image = super::load_image(&args.input)?;
    super::ensure_opaque(&mut image, args.flatten, &args.input)?;

    let jobs: Vec<(VisionCondition, PathBuf)> = match args.condition {
        Some(condition) if !args.all => {
            let output = match args.output {
                Some(path) => path,
                None => super::condition_output(&args.input, input_dir(&args.input), condition),
            };
            vec![(condition, output)]
        }
        _ => {
            let dir = args.output.unwrap_or_else(|| input_dir(&args.input).to_path_buf());
            VisionCondition::DEFICIENT
                .iter()
                .map(|&c| (c, super::condition_output(&args.input, &dir, c)))
                .collect()
        }
    };

    let mut sim = VisionSimulator::new();
    for (condition, output) in jobs {
        let simulated = sim
            .simulated_copy(&image, condition)
            .with_context(|| format!("Failed to simulate {} on {}", condition, args.input.display()))?;
        super::save_image(&output, &simulated)?;

        info!(%condition, output = %output.display(), "written");
        if verbose > 0 {
            println!("{} -> {} ({})", args.input.display(), output.display(), condition);
        }
    }

    Ok(())
}

fn input_dir(input: &std::path::Path) -> &std::path::Path {
    input
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("."))
}
