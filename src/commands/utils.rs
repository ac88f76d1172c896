use crate::parser::{DocumentSource, FileSource, ReaderSource};
use crate::tree::reconstruct_with_stats;
use crate::utils::config::{DOCUMENT_VERSION, SCHEMA_VERSION};
use anyhow::{Context, Result};
use std::path::Path;

/// Build the document source for a CLI input argument
///
/// `-` reads the whole of stdin, anything else is a file path.
pub fn open_source(input: &Path) -> Box<dyn DocumentSource> {
    if input.as_os_str() == "-" {
        Box::new(ReaderSource::new(std::io::stdin(), "<stdin>"))
    } else {
        Box::new(FileSource::new(input))
    }
}

/// Validate a trace file and report what it contains
pub fn validate_trace_file(input: &Path) -> Result<()> {
    let mut source = open_source(input);
    println!("Validating trace: {}", source.describe());

    let document = source
        .read_document()
        .with_context(|| format!("Invalid trace: {}", source.describe()))?;
    let event_count = document.events.len();
    let (forest, stats) = reconstruct_with_stats(document.events);

    println!("✓ Valid trace JSON");
    println!("  Version: {}", document.version);
    println!("  Timestamp: {}", document.timestamp);
    println!("  Events: {}", event_count);
    println!("  Calls: {} ({} roots)", forest.len(), forest.roots().len());
    println!("  Max Depth: {}", forest.max_depth());
    println!("  Returns Merged: {}", stats.returns_merged);
    if stats.returns_dropped > 0 {
        println!("  Unmatched Returns: {}", stats.returns_dropped);
    }
    if stats.unmatched_calls > 0 {
        println!("  Calls Without Return: {}", stats.unmatched_calls);
    }

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Call Trace Studio Schemas");
    println!("Trace Document Version: {}", DOCUMENT_VERSION);
    println!("Report Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Trace Document:");
        println!("  version: string          - Document version (optional)");
        println!("  timestamp: string        - ISO 8601 capture time (optional)");
        println!("  events: array            - Flat, time-ordered events (or a bare array)");
        println!("    event: string          - call | return | call_return");
        println!("    method_name: string    - Invoked method");
        println!("    defined_class: string? - Owner class");
        println!("    depth: number          - Nesting depth, 0 = top level");
        println!("    parameters: array?     - {{type, name, value}}");
        println!("    return_value: any?     - Returned value");
        println!("    path, lineno           - Source location (optional)");
        println!("    start_time, end_time, duration: number? - Seconds");
        println!();
        println!("Performance Report:");
        println!("  version: string          - Report schema version");
        println!("  by_total_time, by_average_time, by_call_count: array - Top methods");
        println!("  slow_calls: array        - Slowest single calls");
        println!("  total_time: number       - Sum of all durations");
        println!("  total_calls: number      - Number of calls");
        println!("  methods: array           - Every method group");
        println!("  generated_at: string     - ISO 8601 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Call Trace Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Call tree reconstruction and performance analysis for method-call traces.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_validate_trace_file_ok() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"event":"call_return","method_name":"run","depth":0}}]"#
        )
        .unwrap();
        assert!(validate_trace_file(file.path()).is_ok());
    }

    #[test]
    fn test_validate_trace_file_rejects_garbage() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "42").unwrap();
        assert!(validate_trace_file(file.path()).is_err());
    }

    #[test]
    fn test_open_source_describes_input() {
        assert_eq!(open_source(Path::new("-")).describe(), "<stdin>");
        assert_eq!(open_source(Path::new("trace.json")).describe(), "trace.json");
    }
}
