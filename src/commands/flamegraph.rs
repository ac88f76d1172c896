//! Flamegraph command implementation.

use super::models::FlamegraphArgs;
use super::utils::open_source;
use crate::aggregator::build_collapsed_stacks;
use crate::flamegraph::generate_flamegraph;
use crate::output::write_svg;
use crate::tree::reconstruct;
use anyhow::{bail, Context, Result};
use log::{debug, info};

/// Execute the flamegraph command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Trace read or parse failures
/// * No timed calls to draw
/// * SVG write failures
pub fn execute_flamegraph(args: FlamegraphArgs) -> Result<()> {
    let mut source = open_source(&args.input);
    let document = source
        .read_document()
        .with_context(|| format!("Failed to read trace from {}", source.describe()))?;

    let forest = reconstruct(document.events);
    let stacks = build_collapsed_stacks(&forest);
    debug!("Built {} unique stacks", stacks.len());

    let svg = generate_flamegraph(&stacks, Some(&args.flamegraph_config))
        .context("Failed to generate flamegraph (does the trace carry durations?)")?;
    write_svg(&svg, &args.output_svg).context("Failed to write flamegraph SVG")?;

    info!("✓ Flamegraph written to: {}", args.output_svg.display());
    Ok(())
}

/// Validate flamegraph arguments
pub fn validate_args(args: &FlamegraphArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        bail!("Input path cannot be empty");
    }

    let width = args.flamegraph_config.width;
    if width < 100 {
        bail!("Flamegraph width is too small (min 100)");
    }
    if width > 20_000 {
        bail!("Flamegraph width is too large (max 20000)");
    }

    Ok(())
}
