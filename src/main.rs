//! Call Trace Studio CLI
//!
//! Explore and profile method-call traces.
//! Prints call trees, performance reports and flamegraphs from trace files.

use anyhow::{Context, Result};
use calltrace_studio::commands::{
    analyze, display_schema, display_version, execute_analyze, execute_flamegraph, execute_tree,
    flamegraph, validate_trace_file, AnalyzeArgs, FlamegraphArgs, TreeArgs,
};
use calltrace_studio::flamegraph::FlamegraphConfig;
use calltrace_studio::utils::config::{load_config, ExplorerConfig, TOP_METHODS};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::debug;
use std::path::PathBuf;

/// Call Trace Studio - call tree exploration and performance analysis
#[derive(Parser, Debug)]
#[command(name = "calltrace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Explorer config file (TOML)
    #[arg(long, global = true, env = "CALLTRACE_CONFIG")]
    config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the visible rows of the call tree
    Tree {
        /// Trace JSON file, or `-` for stdin
        file: PathBuf,

        /// Case-insensitive method or class search
        #[arg(short, long)]
        search: Option<String>,

        /// Only show rows matching the search
        #[arg(long)]
        filtered_only: bool,

        /// Expand every node
        #[arg(long)]
        expand_all: bool,

        /// Scroll offset in pixels
        #[arg(long, default_value = "0")]
        scroll: f64,

        /// Viewport height in pixels
        #[arg(long)]
        height: Option<f64>,
    },

    /// Compute per-method performance statistics
    Analyze {
        /// Trace JSON file, or `-` for stdin
        file: PathBuf,

        /// Output path for the JSON report
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,

        /// Rows per table in the summary
        #[arg(long, default_value_t = TOP_METHODS)]
        top: usize,
    },

    /// Render a self-time flamegraph
    Flamegraph {
        /// Trace JSON file, or `-` for stdin
        file: PathBuf,

        /// Output path for SVG flamegraph
        #[arg(short, long, default_value = "flamegraph.svg")]
        output: PathBuf,

        /// Flamegraph title
        #[arg(long)]
        title: Option<String>,

        /// Flamegraph width in pixels
        #[arg(long, default_value = "1200")]
        width: usize,
    },

    /// Validate a trace file
    Validate {
        /// Trace JSON file, or `-` for stdin
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ExplorerConfig::default(),
    };
    debug!("Explorer config: {:?}", config);

    match cli.command {
        Commands::Tree {
            file,
            search,
            filtered_only,
            expand_all,
            scroll,
            height,
        } => {
            execute_tree(TreeArgs {
                input: file,
                search,
                filtered_only,
                expand_all,
                scroll,
                height,
                config,
            })?;
        }

        Commands::Analyze {
            file,
            output,
            summary,
            top,
        } => {
            let args = AnalyzeArgs {
                input: file,
                output_json: output,
                print_summary: summary,
                top,
            };
            analyze::validate_args(&args)?;
            execute_analyze(args)?;
        }

        Commands::Flamegraph {
            file,
            output,
            title,
            width,
        } => {
            let mut flamegraph_config = FlamegraphConfig::new().with_width(width);
            if let Some(title) = title {
                flamegraph_config = flamegraph_config.with_title(title);
            }

            let args = FlamegraphArgs {
                input: file,
                output_svg: output,
                flamegraph_config,
            };
            flamegraph::validate_args(&args)?;
            execute_flamegraph(args)?;
        }

        Commands::Validate { file } => {
            validate_trace_file(&file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
