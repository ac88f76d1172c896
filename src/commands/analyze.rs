//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Reads and parses the trace
//! 2. Reconstructs the call forest
//! 3. Computes the performance report
//! 4. Writes the JSON report and/or prints the text summary

use super::models::AnalyzeArgs;
use super::utils::open_source;
use crate::aggregator::{analyze, calculate_time_distribution, PerformanceReport};
use crate::flamegraph::generate_text_summary;
use crate::output::write_report;
use crate::tree::reconstruct_with_stats;
use anyhow::{bail, Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Trace read or parse failures
/// * Report write failures
pub fn execute_analyze(args: AnalyzeArgs) -> Result<PerformanceReport> {
    let start_time = Instant::now();

    info!("Step 1/3: Reading trace...");
    let mut source = open_source(&args.input);
    let document = source
        .read_document()
        .with_context(|| format!("Failed to read trace from {}", source.describe()))?;

    info!("Step 2/3: Reconstructing {} events...", document.events.len());
    let (forest, stats) = reconstruct_with_stats(document.events);
    debug!(
        "{} nodes, {} returns merged, {} dropped",
        stats.nodes_created, stats.returns_merged, stats.returns_dropped
    );

    info!("Step 3/3: Aggregating method statistics...");
    let report = analyze(&forest);
    info!(
        "Time distribution: {}",
        calculate_time_distribution(&report).summary()
    );

    if let Some(path) = &args.output_json {
        write_report(&report, path).context("Failed to write report JSON")?;
        info!("✓ Report written to: {}", path.display());
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("PERFORMANCE SUMMARY");
        println!("{}", "=".repeat(80));
        println!("Trace:      {}", source.describe());
        println!("Recorded:   {}", document.timestamp);
        println!("Max Depth:  {}", forest.max_depth());
        println!("\n{}", generate_text_summary(&report, args.top));
        println!("{}", "=".repeat(80));
    }

    info!(
        "Analysis completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(report)
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        bail!("Input path cannot be empty");
    }

    if args.print_summary && args.top == 0 {
        bail!("top must be greater than 0");
    }

    if args.output_json.as_ref().is_some_and(|p| p.is_dir()) {
        bail!("Report output path is a directory");
    }

    Ok(())
}
