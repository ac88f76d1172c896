//! Visible-row projection of a call forest.
//!
//! The projection is a pure function of `(forest, expanded, search,
//! filtered_only)`. Equal inputs always produce the same sequence, so row
//! indices map to the same nodes across recomputation.

use crate::tree::{CallForest, NodeId};
use std::collections::HashSet;

/// Which panel of the explorer is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Tree,
    Performance,
}

/// Explorer UI state; every update returns a new value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub expanded: HashSet<NodeId>,
    pub search: String,
    pub filtered_only: bool,
    pub selected: Option<NodeId>,
    pub active_view: ActiveView,
}

impl ViewState {
    /// Initial state for a freshly loaded forest: roots open, rest collapsed
    pub fn for_forest(forest: &CallForest) -> Self {
        Self {
            expanded: initial_expanded(forest),
            ..Default::default()
        }
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.contains(&id)
    }

    /// Flip one node between expanded and collapsed
    pub fn toggled(mut self, id: NodeId) -> Self {
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_filtered_only(mut self, filtered_only: bool) -> Self {
        self.filtered_only = filtered_only;
        self
    }

    pub fn with_expanded_all(mut self, forest: &CallForest) -> Self {
        self.expanded = expand_all(forest);
        self
    }

    pub fn with_collapsed_all(mut self) -> Self {
        self.expanded = collapse_all();
        self
    }

    pub fn with_selection(mut self, selected: Option<NodeId>) -> Self {
        self.selected = selected;
        self
    }

    pub fn with_active_view(mut self, view: ActiveView) -> Self {
        self.active_view = view;
        self
    }

    /// Expand every ancestor of `id` so the node itself becomes reachable
    pub fn revealing(mut self, forest: &CallForest, id: NodeId) -> Self {
        self.expanded.extend(forest.ancestors(id));
        self
    }

    /// Visible projection under this state
    pub fn project(&self, forest: &CallForest) -> Vec<NodeId> {
        project(forest, &self.expanded, &self.search, self.filtered_only)
    }
}

/// Root ids only: top level open, all descendants collapsed
pub fn initial_expanded(forest: &CallForest) -> HashSet<NodeId> {
    forest.roots().iter().copied().collect()
}

/// Every node that has at least one child
pub fn expand_all(forest: &CallForest) -> HashSet<NodeId> {
    forest.ids_with_children().collect()
}

pub fn collapse_all() -> HashSet<NodeId> {
    HashSet::new()
}

/// Compute the ordered list of visible rows
///
/// **Public** - main entry point for visibility projection
///
/// Depth-first pre-order. A node is emitted when `filtered_only` is off or it
/// matches `search` (case-insensitive, method name or defined class). A
/// node's children are visited only when it is expanded; a match deeper down
/// never opens a collapsed ancestor.
pub fn project(
    forest: &CallForest,
    expanded: &HashSet<NodeId>,
    search: &str,
    filtered_only: bool,
) -> Vec<NodeId> {
    let needle = search.to_lowercase();
    let mut visible = Vec::new();
    let mut stack: Vec<NodeId> = forest.roots().iter().rev().copied().collect();

    while let Some(id) = stack.pop() {
        let Some(node) = forest.get(id) else {
            continue;
        };

        if !filtered_only || node.matches_lowercase(&needle) {
            visible.push(id);
        }

        if expanded.contains(&id) {
            stack.extend(node.children.iter().rev().copied());
        }
    }

    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{EventKind, TraceEvent};
    use crate::tree::reconstruct;
    use pretty_assertions::assert_eq;

    // a(0) -> b(1) -> c(2); d(0)
    fn sample() -> CallForest {
        reconstruct(vec![
            TraceEvent::new(EventKind::Call, "a", 0).with_class("Alpha"),
            TraceEvent::new(EventKind::Call, "b", 1).with_class("Beta"),
            TraceEvent::new(EventKind::CallReturn, "c", 2).with_class("Gamma"),
            TraceEvent::new(EventKind::CallReturn, "d", 0),
        ])
    }

    #[test]
    fn test_initial_state_shows_roots_and_their_children() {
        let forest = sample();
        let state = ViewState::for_forest(&forest);
        assert_eq!(state.project(&forest), vec![NodeId(0), NodeId(1), NodeId(3)]);
    }

    #[test]
    fn test_toggle_round_trip() {
        let forest = sample();
        let state = ViewState::for_forest(&forest);
        let opened = state.clone().toggled(NodeId(1));
        assert_eq!(opened.project(&forest).len(), 4);
        assert_eq!(opened.toggled(NodeId(1)), state);
    }

    #[test]
    fn test_search_matches_class_case_insensitively() {
        let forest = sample();
        let state = ViewState::default()
            .with_expanded_all(&forest)
            .with_search("GAMMA")
            .with_filtered_only(true);
        assert_eq!(state.project(&forest), vec![NodeId(2)]);
    }

    #[test]
    fn test_revealing_expands_ancestors() {
        let forest = sample();
        let state = ViewState::default()
            .with_collapsed_all()
            .revealing(&forest, NodeId(2));
        assert!(state.project(&forest).contains(&NodeId(2)));
    }
}
