//! Single color command

use crate::ColorArgs;
use anyhow::{Context, Result};
use cvd_vision::{VisionCondition, simulate_color};
use tracing::trace;

pub fn run(args: ColorArgs) -> Result<()> {
    trace!(color = %args.color, "color::run");

    let conditions = match args.condition {
        Some(c) => vec![c],
        None => VisionCondition::ALL.to_vec(),
    };

    for condition in conditions {
        let out = simulate_color(args.color, condition)
            .with_context(|| format!("Cannot simulate {}", args.color))?;
        println!("{:<14} {}", condition.name(), out);
    }
    Ok(())
}
