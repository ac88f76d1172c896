//! Current-document state of the explorer.
//!
//! The session is either empty or holds exactly one loaded trace. Loading
//! builds the forest, report and initial view state completely before the
//! previous trace is replaced, so no partially built state is observable.

use super::visibility::{ActiveView, ViewState};
use super::window::{compute_window, RenderWindow, RowSource, Viewport};
use crate::aggregator::{analyze, MethodStat, PerformanceReport};
use crate::parser::{DocumentSource, TraceDocument};
use crate::tree::{reconstruct_with_stats, CallForest, CallNode, NodeId, ReconstructStats};
use crate::utils::error::ParseError;
use log::{debug, info, warn};

/// Everything derived from one loaded document
#[derive(Debug, Clone)]
pub struct LoadedTrace {
    pub version: String,
    pub timestamp: String,
    pub event_count: usize,
    pub forest: CallForest,
    pub stats: ReconstructStats,
    pub report: PerformanceReport,
    view: ViewState,
    visible: Vec<NodeId>,
}

impl LoadedTrace {
    fn build(document: TraceDocument) -> Self {
        let event_count = document.events.len();
        let (forest, stats) = reconstruct_with_stats(document.events);
        let report = analyze(&forest);
        let view = ViewState::for_forest(&forest);
        let visible = view.project(&forest);

        Self {
            version: document.version,
            timestamp: document.timestamp,
            event_count,
            forest,
            stats,
            report,
            view,
            visible,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Current visible projection
    pub fn visible(&self) -> &[NodeId] {
        &self.visible
    }
}

/// Process-wide document state: empty or loaded
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Empty,
    Loaded(Box<LoadedTrace>),
}

/// Explorer over at most one in-memory trace
#[derive(Debug, Clone, Default)]
pub struct ExplorerSession {
    state: SessionState,
    layout_generation: u64,
}

impl ExplorerSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, SessionState::Loaded(_))
    }

    pub fn loaded(&self) -> Option<&LoadedTrace> {
        match &self.state {
            SessionState::Loaded(trace) => Some(trace),
            SessionState::Empty => None,
        }
    }

    pub fn forest(&self) -> Option<&CallForest> {
        self.loaded().map(|t| &t.forest)
    }

    pub fn report(&self) -> Option<&PerformanceReport> {
        self.loaded().map(|t| &t.report)
    }

    pub fn view(&self) -> Option<&ViewState> {
        self.loaded().map(|t| &t.view)
    }

    /// Visible rows, empty when nothing is loaded
    pub fn visible_rows(&self) -> &[NodeId] {
        self.loaded().map(|t| t.visible()).unwrap_or(&[])
    }

    /// Changes whenever cached row offsets must be discarded
    pub fn layout_generation(&self) -> u64 {
        self.layout_generation
    }

    /// Replace the current trace with `document`
    pub fn load(&mut self, document: TraceDocument) {
        let trace = LoadedTrace::build(document);
        info!(
            "Loaded trace: {} events -> {} nodes ({} roots)",
            trace.event_count,
            trace.forest.len(),
            trace.forest.roots().len()
        );
        if trace.stats.returns_dropped > 0 {
            debug!("{} unmatched return events dropped", trace.stats.returns_dropped);
        }

        self.state = SessionState::Loaded(Box::new(trace));
        self.layout_generation += 1;
    }

    /// Read a document and load it; on error the current trace is kept
    pub fn load_from(&mut self, source: &mut dyn DocumentSource) -> Result<(), ParseError> {
        match source.read_document() {
            Ok(document) => {
                self.load(document);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load {}: {}", source.describe(), e);
                Err(e)
            }
        }
    }

    /// Drop the current trace
    pub fn reset(&mut self) {
        if self.is_loaded() {
            self.state = SessionState::Empty;
            self.layout_generation += 1;
        }
    }

    /// Apply a view-state transition and refresh the projection
    ///
    /// Returns false when nothing is loaded.
    pub fn update<F>(&mut self, transition: F) -> bool
    where
        F: FnOnce(ViewState, &CallForest) -> ViewState,
    {
        let SessionState::Loaded(trace) = &mut self.state else {
            return false;
        };

        let next = transition(trace.view.clone(), &trace.forest);
        let reproject = next.expanded != trace.view.expanded
            || next.search != trace.view.search
            || next.filtered_only != trace.view.filtered_only;
        let view_switched = next.active_view != trace.view.active_view;

        let mut rows_changed = false;
        if reproject {
            let visible = next.project(&trace.forest);
            rows_changed = visible != trace.visible;
            trace.visible = visible;
        }
        trace.view = next;

        if rows_changed || view_switched {
            self.layout_generation += 1;
        }
        true
    }

    pub fn toggle(&mut self, id: NodeId) -> bool {
        self.update(|view, _| view.toggled(id))
    }

    pub fn set_search(&mut self, search: &str) -> bool {
        self.update(|view, _| view.with_search(search))
    }

    pub fn set_filtered_only(&mut self, filtered_only: bool) -> bool {
        self.update(|view, _| view.with_filtered_only(filtered_only))
    }

    pub fn expand_all(&mut self) -> bool {
        self.update(|view, forest| view.with_expanded_all(forest))
    }

    pub fn collapse_all(&mut self) -> bool {
        self.update(|view, _| view.with_collapsed_all())
    }

    pub fn set_active_view(&mut self, active_view: ActiveView) -> bool {
        self.update(|view, _| view.with_active_view(active_view))
    }

    /// Record a selection; any id is accepted
    pub fn select_node(&mut self, id: Option<NodeId>) -> bool {
        self.update(|view, _| view.with_selection(id))
    }

    /// Row of the selected node, `None` when unselected or hidden
    pub fn selected_row(&self) -> Option<usize> {
        let trace = self.loaded()?;
        let selected = trace.view.selected?;
        trace.visible.iter().position(|&id| id == selected)
    }

    pub fn selected_node(&self) -> Option<&CallNode> {
        let row = self.selected_row()?;
        let id = self.visible_rows().get(row)?;
        self.forest()?.get(*id)
    }

    /// Show `id` in the tree view: switch view, expand its ancestors and
    /// select it. Returns the row to scroll to.
    pub fn navigate_to(&mut self, id: NodeId) -> Option<usize> {
        if !self.forest()?.contains(id) {
            debug!("Ignoring navigation to unknown node {}", id);
            return None;
        }

        self.update(|view, forest| {
            view.revealing(forest, id)
                .with_active_view(ActiveView::Tree)
                .with_selection(Some(id))
        });
        self.selected_row()
    }

    /// Jump to the first recorded call of a method
    pub fn navigate_to_method(&mut self, stat: &MethodStat) -> Option<usize> {
        self.navigate_to(stat.example()?)
    }

    /// Rows to render for the current projection and viewport
    pub fn window(&self, viewport: Viewport, row_height: f64, overscan: usize) -> RenderWindow {
        compute_window(self.row_count(), row_height, viewport, overscan)
    }
}

impl RowSource for ExplorerSession {
    fn row_count(&self) -> usize {
        self.visible_rows().len()
    }

    fn row_at(&self, index: usize) -> Option<NodeId> {
        self.visible_rows().get(index).copied()
    }
}
