//! JSON report writer.
//!
//! Writes `PerformanceReport` values to JSON files with pretty formatting.

use super::prepare_output_path;
use crate::aggregator::PerformanceReport;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Write a performance report to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `report` - Report produced by `analyze`
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_report(
    report: &PerformanceReport,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();
    info!("Writing report to: {}", output_path.display());

    prepare_output_path(output_path)?;

    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;

    info!(
        "Report written successfully ({} bytes)",
        std::fs::metadata(output_path).map(|m| m.len()).unwrap_or(0)
    );
    Ok(())
}

/// Serialize a report for stdout
pub fn report_to_string(report: &PerformanceReport) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Read a report back from a JSON file
///
/// **Public** - used by tests and for comparing runs
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_report(input_path: impl AsRef<Path>) -> Result<PerformanceReport, OutputError> {
    let input_path = input_path.as_ref();
    debug!("Reading report from: {}", input_path.display());

    let file = File::open(input_path)?;
    let report: PerformanceReport = serde_json::from_reader(BufReader::new(file))?;

    debug!(
        "Report loaded: version {}, {} calls",
        report.version, report.total_calls
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::analyze;
    use crate::parser::{EventKind, TraceEvent};
    use crate::tree::reconstruct;
    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    fn create_test_report() -> PerformanceReport {
        let forest = reconstruct(vec![
            TraceEvent::new(EventKind::Call, "checkout", 0)
                .with_class("Cart")
                .with_duration(0.02),
            TraceEvent::new(EventKind::CallReturn, "total", 1)
                .with_class("Cart")
                .with_duration(0.005),
        ]);
        analyze(&forest)
    }

    #[test]
    fn test_write_and_read_report() {
        let report = create_test_report();
        let temp_file = NamedTempFile::new().unwrap();

        write_report(&report, temp_file.path()).unwrap();
        let loaded = read_report(temp_file.path()).unwrap();

        assert_eq!(loaded, report);
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/report.json");

        write_report(&create_test_report(), &nested_path).unwrap();
        assert!(nested_path.exists());
    }

    #[test]
    fn test_report_to_string_is_json() {
        let text = report_to_string(&create_test_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["total_calls"], 2);
    }
}
