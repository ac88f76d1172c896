//! SVG flamegraph generation through inferno, plus a terminal summary.
//!
//! Flamegraph frames are `Class#method` labels weighted by self time in
//! microseconds. The text summary renders the ranked performance report
//! with hotspot and high-variance indicators.

use crate::aggregator::metrics::{MethodStat, PerformanceReport};
use crate::aggregator::stack_builder::CollapsedStack;
use crate::format::{format_duration, format_percentage};
use crate::utils::error::FlamegraphError;
use colored::Colorize;
use inferno::flamegraph::{self, Options};
use log::{debug, info};

/// Flamegraph configuration
#[derive(Debug, Clone)]
pub struct FlamegraphConfig {
    pub title: String,
    pub width: usize,
}

impl Default for FlamegraphConfig {
    fn default() -> Self {
        Self {
            title: "Call Trace Profile".to_string(),
            width: 1200,
        }
    }
}

impl FlamegraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }
}

/// Generate SVG flamegraph from collapsed stacks
///
/// **Public** - main entry point for flamegraph rendering
///
/// # Arguments
/// * `stacks` - Collapsed stacks, weights in microseconds of self time
/// * `config` - Title and width; defaults when `None`
///
/// # Errors
/// * `FlamegraphError::EmptyStacks` - Nothing to draw
/// * `FlamegraphError::Render` - inferno failed while rendering
/// * `FlamegraphError::InvalidUtf8` - inferno produced non UTF-8 output
pub fn generate_flamegraph(
    stacks: &[CollapsedStack],
    config: Option<&FlamegraphConfig>,
) -> Result<String, FlamegraphError> {
    if stacks.is_empty() {
        return Err(FlamegraphError::EmptyStacks);
    }

    let config = config.cloned().unwrap_or_default();
    info!("Generating flamegraph with {} stacks", stacks.len());

    let mut options = Options::default();
    options.title = config.title.clone();
    options.count_name = "μs".to_string();
    options.image_width = Some(config.width);

    let lines: Vec<String> = stacks.iter().map(CollapsedStack::to_line).collect();
    let mut svg = Vec::new();
    flamegraph::from_lines(&mut options, lines.iter().map(String::as_str), &mut svg)
        .map_err(|e| FlamegraphError::Render(e.to_string()))?;

    let svg = String::from_utf8(svg)?;
    debug!("Flamegraph rendered ({} bytes)", svg.len());
    Ok(svg)
}

/// Create a text summary of the performance report
///
/// **Public** - printed by `analyze --summary`
///
/// Methods whose single call exceeds the hotspot share are marked red,
/// methods with high variance are marked yellow.
pub fn generate_text_summary(report: &PerformanceReport, max_lines: usize) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "  TOTAL: {} across {} calls ({} methods)",
        format_duration(report.total_time),
        report.total_calls,
        report.methods.len()
    ));
    lines.push(String::new());

    lines.push("  METHODS BY TOTAL TIME".bold().to_string());
    lines.push(format!(
        "  {:<44} {:>12} {:>8} {:>12} {:>12}",
        "Method", "Total", "Calls", "Average", "Max"
    ));
    lines.push(format!("  {}", "─".repeat(92)));

    for stat in report.by_total_time.iter().take(max_lines) {
        lines.push(method_line(report, stat));
    }

    if !report.slow_calls.is_empty() {
        lines.push(String::new());
        lines.push("  SLOWEST CALLS".bold().to_string());

        for call in report.slow_calls.iter().take(max_lines) {
            let duration = format_duration(call.duration);
            let duration = if call.hotspot {
                duration.red().bold().to_string()
            } else {
                duration
            };
            lines.push(format!(
                "  {:>6} {:<44} depth {:<4} {} ({})",
                call.id.to_string(),
                display_key(&call.key),
                call.depth,
                duration,
                format_percentage(call.duration, report.total_time)
            ));
        }
    }

    if report.by_total_time.len() > max_lines {
        lines.push(String::new());
        lines.push(format!(
            "   (Showing top {} of {} ranked methods)",
            max_lines,
            report.by_total_time.len()
        ));
    }

    lines.join("\n")
}

/// **Private** - one row of the method table
fn method_line(report: &PerformanceReport, stat: &MethodStat) -> String {
    let key = format!("{:<44}", display_key(&stat.key));
    let key = if report.is_hotspot(stat.max_time) {
        key.red().to_string()
    } else if stat.has_high_variance() {
        key.yellow().to_string()
    } else {
        key
    };

    format!(
        "  {} {:>12} {:>8} {:>12} {:>12}",
        key,
        format_duration(stat.total_time),
        stat.call_count,
        format_duration(stat.average_time),
        format_duration(stat.max_time)
    )
}

/// Keep long keys inside the table column
fn display_key(key: &str) -> String {
    let count = key.chars().count();
    if count > 44 {
        let tail: String = key.chars().skip(count - 41).collect();
        format!("...{}", tail)
    } else {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{analyze, build_collapsed_stacks};
    use crate::parser::{EventKind, TraceEvent};
    use crate::tree::reconstruct;

    fn sample_report() -> PerformanceReport {
        let forest = reconstruct(vec![
            TraceEvent::new(EventKind::Call, "run", 0)
                .with_class("App")
                .with_duration(0.010),
            TraceEvent::new(EventKind::CallReturn, "save", 1)
                .with_class("User")
                .with_duration(0.006),
            TraceEvent::new(EventKind::Return, "run", 0),
        ]);
        analyze(&forest)
    }

    #[test]
    fn test_empty_stacks_rejected() {
        let result = generate_flamegraph(&[], None);
        assert!(matches!(result, Err(FlamegraphError::EmptyStacks)));
    }

    #[test]
    fn test_flamegraph_contains_frames() {
        let forest = reconstruct(vec![
            TraceEvent::new(EventKind::Call, "run", 0)
                .with_class("App")
                .with_duration(0.010),
            TraceEvent::new(EventKind::CallReturn, "save", 1)
                .with_class("User")
                .with_duration(0.006),
        ]);
        let stacks = build_collapsed_stacks(&forest);
        let config = FlamegraphConfig::new().with_title("Checkout");

        let svg = generate_flamegraph(&stacks, Some(&config)).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Checkout"));
        assert!(svg.contains("User#save"));
    }

    #[test]
    fn test_render_failure_is_reported() {
        let err = FlamegraphError::Render("unexpected end of stream".to_string());
        assert_eq!(
            err.to_string(),
            "Flamegraph rendering failed: unexpected end of stream"
        );
    }

    #[test]
    fn test_text_summary_lists_methods() {
        colored::control::set_override(false);
        let summary = generate_text_summary(&sample_report(), 5);
        assert!(summary.contains("App#run"));
        assert!(summary.contains("User#save"));
        assert!(summary.contains("SLOWEST CALLS"));
    }

    #[test]
    fn test_display_key_truncates_from_front() {
        let key = format!("{}#call", "Deeply::Nested".repeat(5));
        let shown = display_key(&key);
        assert_eq!(shown.chars().count(), 44);
        assert!(shown.starts_with("...") && shown.ends_with("#call"));
    }
}
