//! Call tree reconstruction.
//!
//! Turns the flat `call` / `return` / `call_return` event stream into a
//! forest of call nodes with parent/child links and merged return data.

pub mod node;
pub mod reconstruct;

pub use node::{CallForest, CallNode, NodeId, Preorder};
pub use reconstruct::{reconstruct, reconstruct_with_stats, ReconstructStats};
