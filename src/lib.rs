//! Call Trace Studio
//!
//! Call tree reconstruction, interactive exploration and performance
//! analysis for method-call traces.
//!
//! This crate provides the core implementation for the `calltrace` CLI
//! tool: a flat `call` / `return` / `call_return` event stream is rebuilt
//! into a call forest, projected into visible rows for windowed display,
//! and rolled up into per-method statistics.
//!
//! ## Getting Started
//!
//! ```bash
//! calltrace tree trace.json --expand-all
//! calltrace analyze trace.json --summary --output report.json
//! ```

pub mod aggregator;
pub mod commands;
pub mod explorer;
pub mod flamegraph;
pub mod format;
pub mod output;
pub mod parser;
pub mod tree;
pub mod utils;
