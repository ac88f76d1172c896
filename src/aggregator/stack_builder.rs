//! Build collapsed stack format from a call forest.
//!
//! Collapsed stacks are the input format for flamegraph generation.
//! Format: "parent;child;grandchild weight"
//!
//! Example: "App#run;User#save;DB#query 1500"
//! This means: run called save which called query, spending 1500μs in query itself.

use crate::tree::{CallForest, NodeId};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single collapsed stack entry
///
/// **Public** - used by flamegraph generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollapsedStack {
    /// Stack trace as semicolon-separated string
    pub stack: String,

    /// Weight (self time in microseconds)
    pub weight: u64,
}

impl CollapsedStack {
    /// Create a new collapsed stack
    pub fn new(stack: String, weight: u64) -> Self {
        Self { stack, weight }
    }

    /// Line in the folded format consumed by inferno
    pub fn to_line(&self) -> String {
        format!("{} {}", self.stack, self.weight)
    }
}

/// Build collapsed stacks from a call forest
///
/// **Public** - main entry point for stack building
///
/// # Algorithm
/// 1. Walk the forest depth-first, tracking the label path from the root
/// 2. Compute each node's self time (duration minus children, floored at 0)
/// 3. Aggregate by unique path (sum weights)
/// 4. Sort by weight descending, then by path
pub fn build_collapsed_stacks(forest: &CallForest) -> Vec<CollapsedStack> {
    debug!("Building collapsed stacks from {} call nodes", forest.len());

    let mut stack_map: HashMap<String, u64> = HashMap::new();

    // (node, path of its parent)
    let mut pending: Vec<(NodeId, String)> = forest
        .roots()
        .iter()
        .rev()
        .map(|&id| (id, String::new()))
        .collect();

    while let Some((id, prefix)) = pending.pop() {
        let Some(node) = forest.get(id) else {
            continue;
        };

        let label = sanitize_frame(&node.label());
        let path = if prefix.is_empty() {
            label
        } else {
            format!("{};{}", prefix, label)
        };

        let children_time: f64 = node
            .children
            .iter()
            .filter_map(|&c| forest.get(c))
            .map(|c| c.duration_or_zero().max(0.0))
            .sum();
        let self_time = (node.duration_or_zero() - children_time).max(0.0);
        let weight = (self_time * 1_000_000.0).round() as u64;

        if weight > 0 {
            *stack_map.entry(path.clone()).or_insert(0) += weight;
        }

        for &child in node.children.iter().rev() {
            pending.push((child, path.clone()));
        }
    }

    let mut stacks: Vec<CollapsedStack> = stack_map
        .into_iter()
        .map(|(stack, weight)| CollapsedStack::new(stack, weight))
        .collect();

    stacks.sort_by(|a, b| b.weight.cmp(&a.weight).then_with(|| a.stack.cmp(&b.stack)));
    debug!("Built {} unique collapsed stacks", stacks.len());

    stacks
}

/// Frames may not contain the folded-format separators
fn sanitize_frame(label: &str) -> String {
    label.replace(';', ":").replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{EventKind, TraceEvent};
    use crate::tree::reconstruct;
    use pretty_assertions::assert_eq;

    fn call(name: &str, depth: u32) -> TraceEvent {
        TraceEvent::new(EventKind::Call, name, depth).with_class("App")
    }

    fn ret(name: &str, depth: u32, duration: f64) -> TraceEvent {
        TraceEvent::new(EventKind::Return, name, depth).with_duration(duration)
    }

    #[test]
    fn test_self_time_stacks() {
        let forest = reconstruct(vec![
            call("run", 0),
            call("load", 1),
            ret("load", 1, 0.002),
            call("save", 1),
            ret("save", 1, 0.003),
            ret("run", 0, 0.010),
        ]);

        let stacks = build_collapsed_stacks(&forest);
        assert_eq!(
            stacks,
            vec![
                CollapsedStack::new("App#run".to_string(), 5000),
                CollapsedStack::new("App#run;App#save".to_string(), 3000),
                CollapsedStack::new("App#run;App#load".to_string(), 2000),
            ]
        );
        assert_eq!(stacks[0].to_line(), "App#run 5000");
    }

    #[test]
    fn test_untimed_forest_has_no_stacks() {
        let forest = reconstruct(vec![call("run", 0)]);
        assert!(build_collapsed_stacks(&forest).is_empty());
    }
}
