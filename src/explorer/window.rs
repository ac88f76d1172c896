//! Windowed rendering support.
//!
//! Only the rows intersecting the viewport (plus an overscan margin) are
//! materialized. The row list itself is owned elsewhere and reached through
//! `RowSource`, which must be index-addressable in O(1).

use crate::tree::NodeId;
use serde::{Deserialize, Serialize};

/// Scroll position and size of the visible area, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scroll_offset: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(scroll_offset: f64, height: f64) -> Self {
        Self {
            scroll_offset,
            height,
        }
    }
}

/// Placement of one materialized row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowPlacement {
    pub index: usize,
    /// Offset of the row's top edge from the top of the list
    pub top: f64,
}

/// Rows to materialize for the current viewport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderWindow {
    /// First row to render (inclusive)
    pub start: usize,
    /// Last row to render (exclusive)
    pub end: usize,
    pub rows: Vec<RowPlacement>,
    /// Height of the full list, for the scrollbar
    pub total_height: f64,
}

impl RenderWindow {
    pub fn empty(total_height: f64) -> Self {
        Self {
            start: 0,
            end: 0,
            rows: Vec::new(),
            total_height,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Index-addressable list of rows consumed by the rendering widget
pub trait RowSource {
    fn row_count(&self) -> usize;

    fn row_at(&self, index: usize) -> Option<NodeId>;
}

/// A computed visible projection
impl RowSource for [NodeId] {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn row_at(&self, index: usize) -> Option<NodeId> {
        self.get(index).copied()
    }
}

impl RowSource for Vec<NodeId> {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn row_at(&self, index: usize) -> Option<NodeId> {
        self.get(index).copied()
    }
}

/// Compute the contiguous range of rows to materialize
///
/// **Public** - main entry point for windowing
///
/// # Arguments
/// * `total_rows` - Length of the visible projection
/// * `row_height` - Estimated height of one row
/// * `viewport` - Current scroll offset and viewport height
/// * `overscan` - Extra rows rendered beyond each edge
pub fn compute_window(
    total_rows: usize,
    row_height: f64,
    viewport: Viewport,
    overscan: usize,
) -> RenderWindow {
    if !row_height.is_finite() || row_height <= 0.0 {
        return RenderWindow::empty(0.0);
    }

    let total_height = total_rows as f64 * row_height;
    if total_rows == 0 {
        return RenderWindow::empty(total_height);
    }

    let scroll = if viewport.scroll_offset.is_finite() {
        viewport.scroll_offset.max(0.0)
    } else {
        0.0
    };
    let height = if viewport.height.is_finite() {
        viewport.height.max(0.0)
    } else {
        0.0
    };

    let first = (scroll / row_height).floor() as usize;
    let last = ((scroll + height) / row_height).ceil() as usize;

    let start = first.saturating_sub(overscan).min(total_rows);
    let end = last.saturating_add(overscan).min(total_rows);
    let start = start.min(end);

    let rows = (start..end)
        .map(|index| RowPlacement {
            index,
            top: index as f64 * row_height,
        })
        .collect();

    RenderWindow {
        start,
        end,
        rows,
        total_height,
    }
}

/// Resolve the rows of a window against their source
///
/// Returns `(index, node, top)` for each materialized row; nothing outside
/// the window is read.
pub fn materialize<S: RowSource + ?Sized>(
    source: &S,
    window: &RenderWindow,
) -> Vec<(usize, NodeId, f64)> {
    window
        .rows
        .iter()
        .filter_map(|row| source.row_at(row.index).map(|id| (row.index, id, row.top)))
        .collect()
}

/// Smallest scroll change that brings row `index` fully into view
pub fn scroll_to_index(index: usize, row_height: f64, viewport: Viewport) -> f64 {
    let top = index as f64 * row_height;
    let bottom = top + row_height;
    let scroll = viewport.scroll_offset.max(0.0);

    if top < scroll {
        top
    } else if bottom > scroll + viewport.height {
        (bottom - viewport.height).max(0.0)
    } else {
        scroll
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_window_at_top() {
        let window = compute_window(1000, 20.0, Viewport::new(0.0, 100.0), 2);
        assert_eq!((window.start, window.end), (0, 7));
        assert_eq!(window.total_height, 20_000.0);
        assert_eq!(window.rows[3], RowPlacement { index: 3, top: 60.0 });
    }

    #[test]
    fn test_window_mid_scroll_with_overscan() {
        let window = compute_window(1000, 20.0, Viewport::new(1010.0, 100.0), 3);
        // rows 50..56 intersect the viewport
        assert_eq!((window.start, window.end), (47, 59));
        assert_eq!(window.rows.first().map(|r| r.top), Some(940.0));
    }

    #[test]
    fn test_window_clamped_at_end() {
        let window = compute_window(10, 20.0, Viewport::new(150.0, 100.0), 5);
        assert_eq!((window.start, window.end), (2, 10));

        let past_end = compute_window(10, 20.0, Viewport::new(10_000.0, 100.0), 2);
        assert!(past_end.is_empty());
    }

    #[test]
    fn test_window_degenerate_inputs() {
        assert!(compute_window(0, 20.0, Viewport::new(0.0, 100.0), 2).is_empty());
        assert!(compute_window(10, 0.0, Viewport::new(0.0, 100.0), 2).is_empty());
        let negative = compute_window(10, 20.0, Viewport::new(-50.0, 40.0), 0);
        assert_eq!((negative.start, negative.end), (0, 2));
    }

    #[test]
    fn test_materialize_only_window_rows() {
        let rows: Vec<NodeId> = (0..100).map(NodeId).collect();
        let window = compute_window(rows.len(), 10.0, Viewport::new(200.0, 30.0), 0);
        let out = materialize(&rows, &window);
        assert_eq!(
            out,
            vec![
                (20, NodeId(20), 200.0),
                (21, NodeId(21), 210.0),
                (22, NodeId(22), 220.0),
            ]
        );
    }

    #[test]
    fn test_scroll_to_index() {
        let viewport = Viewport::new(100.0, 50.0);
        assert_eq!(scroll_to_index(2, 20.0, viewport), 40.0);
        assert_eq!(scroll_to_index(5, 20.0, viewport), 100.0);
        assert_eq!(scroll_to_index(10, 20.0, viewport), 170.0);
    }
}
