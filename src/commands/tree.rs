//! Tree command implementation.
//!
//! The tree command:
//! 1. Loads the trace into an explorer session
//! 2. Applies expansion and search settings
//! 3. Computes the render window for the requested scroll position
//! 4. Prints one line per materialized row

use super::models::TreeArgs;
use super::utils::open_source;
use crate::explorer::{materialize, ExplorerSession, Viewport};
use crate::format::{
    format_node_label, format_optional_duration, format_parameters, format_value, ParamsFormat,
    ValueFormat,
};
use crate::tree::CallNode;
use crate::utils::config::ExplorerConfig;
use anyhow::{Context, Result};
use log::{debug, info};

/// Execute the tree command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Trace read or parse failures
pub fn execute_tree(args: TreeArgs) -> Result<()> {
    let lines = render_tree(&args)?;
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

/// Produce the lines `execute_tree` prints
///
/// **Public** - separated from printing for tests
pub fn render_tree(args: &TreeArgs) -> Result<Vec<String>> {
    let mut source = open_source(&args.input);
    let mut session = ExplorerSession::new();
    session
        .load_from(source.as_mut())
        .with_context(|| format!("Failed to load trace from {}", source.describe()))?;

    if args.expand_all {
        session.expand_all();
    }
    if let Some(search) = &args.search {
        session.set_search(search);
        session.set_filtered_only(args.filtered_only);
    }

    let Some(forest) = session.forest() else {
        return Ok(Vec::new());
    };
    if forest.is_empty() {
        return Ok(vec!["No events to display".to_string()]);
    }

    let config = &args.config;
    let viewport = Viewport::new(
        args.scroll,
        args.height.unwrap_or(config.viewport_height),
    );
    let window = session.window(viewport, config.row_height, config.overscan);
    info!(
        "Showing rows {}..{} of {}",
        window.start,
        window.end,
        session.visible_rows().len()
    );

    let Some(view) = session.view() else {
        return Ok(Vec::new());
    };
    let mut lines = Vec::with_capacity(window.len());
    for (_, id, _) in materialize(&session, &window) {
        if let Some(node) = forest.get(id) {
            let marker = if !node.has_children() {
                ' '
            } else if view.is_expanded(id) {
                '▾'
            } else {
                '▸'
            };
            lines.push(render_row(node, marker, config));
        }
    }

    debug!("Rendered {} lines", lines.len());
    Ok(lines)
}

/// **Private** - one tree row: two spaces per level, marker, space, label
fn render_row(node: &CallNode, marker: char, config: &ExplorerConfig) -> String {
    let params = format_parameters(
        node.parameters.as_deref(),
        ParamsFormat::Compact {
            max_value_len: config.compact_value_len,
        },
    );
    let mut line = format!(
        "{}{} {}({})",
        "  ".repeat(node.level as usize),
        marker,
        format_node_label(node),
        params
    );

    if node.returned {
        let value = format_value(
            node.return_value.as_ref(),
            ValueFormat::Compact {
                max_len: config.compact_value_len,
            },
        );
        line.push_str(&format!(" → {}", value));
    }
    line.push_str(&format!("  [{}]", format_optional_duration(node.duration)));
    line
}
