//! Pretty-printers for durations, parameters and values.
//!
//! Everything here is a pure function of its arguments; the tree display and
//! the performance report share these helpers.

pub mod params;
pub mod value;

pub use params::{format_parameter, format_parameters, ParamsFormat};
pub use value::{format_value, truncate_chars, ValueFormat};

use crate::tree::CallNode;

/// Format a duration given in seconds
///
/// Below 1ms renders microseconds, below 1s milliseconds, otherwise seconds
/// with three decimals.
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.001 {
        format!("{:.1}μs", seconds * 1_000_000.0)
    } else if seconds < 1.0 {
        format!("{:.1}ms", seconds * 1_000.0)
    } else {
        format!("{:.3}s", seconds)
    }
}

/// Format an optional duration, `-` when absent
pub fn format_optional_duration(seconds: Option<f64>) -> String {
    seconds.map(format_duration).unwrap_or_else(|| "-".to_string())
}

/// Display label of a call: `Class#method`, or the bare method name
pub fn format_node_label(node: &CallNode) -> String {
    node.label()
}

/// Format a share of a total as a percentage
pub fn format_percentage(part: f64, total: f64) -> String {
    if total > 0.0 {
        format!("{:.1}%", part / total * 100.0)
    } else {
        "0.0%".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_units() {
        assert_eq!(format_duration(0.0005), "500.0μs");
        assert_eq!(format_duration(0.25), "250.0ms");
        assert_eq!(format_duration(2.5), "2.500s");
        assert_eq!(format_duration(0.001), "1.0ms");
        assert_eq!(format_duration(1.0), "1.000s");
    }

    #[test]
    fn test_optional_and_percentage() {
        assert_eq!(format_optional_duration(None), "-");
        assert_eq!(format_percentage(1.0, 4.0), "25.0%");
        assert_eq!(format_percentage(1.0, 0.0), "0.0%");
    }
}
