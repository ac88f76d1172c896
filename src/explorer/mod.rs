//! Interactive exploration of a call forest.
//!
//! - `visibility`: expansion- and search-aware visible-row projection
//! - `window`: viewport windowing over the projection
//! - `session`: the single current trace plus its view state

pub mod session;
pub mod visibility;
pub mod window;

pub use session::{ExplorerSession, LoadedTrace, SessionState};
pub use visibility::{collapse_all, expand_all, initial_expanded, project, ActiveView, ViewState};
pub use window::{
    compute_window, materialize, scroll_to_index, RenderWindow, RowPlacement, RowSource, Viewport,
};
