use crate::flamegraph::FlamegraphConfig;
use crate::utils::config::ExplorerConfig;
use std::path::PathBuf;

/// Arguments for the tree command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone, Default)]
pub struct TreeArgs {
    /// Trace file, or `-` for stdin
    pub input: PathBuf,

    /// Case-insensitive method / class filter
    pub search: Option<String>,

    /// Show only rows matching `search`
    pub filtered_only: bool,

    /// Start with every node expanded
    pub expand_all: bool,

    /// Scroll offset in pixels
    pub scroll: f64,

    /// Viewport height in pixels, falls back to the config value
    pub height: Option<f64>,

    pub config: ExplorerConfig,
}

/// Arguments for the analyze command
#[derive(Debug, Clone, Default)]
pub struct AnalyzeArgs {
    /// Trace file, or `-` for stdin
    pub input: PathBuf,

    /// Output path for the JSON report (optional)
    pub output_json: Option<PathBuf>,

    /// Print the ranked text summary to stdout
    pub print_summary: bool,

    /// Rows per table in the text summary
    pub top: usize,
}

/// Arguments for the flamegraph command
#[derive(Debug, Clone)]
pub struct FlamegraphArgs {
    /// Trace file, or `-` for stdin
    pub input: PathBuf,

    /// Output path for the SVG flamegraph
    pub output_svg: PathBuf,

    pub flamegraph_config: FlamegraphConfig,
}

impl Default for FlamegraphArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output_svg: PathBuf::from("flamegraph.svg"),
            flamegraph_config: FlamegraphConfig::default(),
        }
    }
}
