//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod analyze;
pub mod flamegraph;
pub mod models;
pub mod tree;
pub mod utils;

// Re-export main command functions
pub use analyze::execute_analyze;
pub use flamegraph::execute_flamegraph;
pub use models::{AnalyzeArgs, FlamegraphArgs, TreeArgs};
pub use tree::{execute_tree, render_tree};
pub use utils::{display_schema, display_version, open_source, validate_trace_file};
