//! Rebuild a call tree from the flat event stream.
//!
//! Single forward pass over the events:
//! 1. Keep a stack of open nodes (candidate parents)
//! 2. Before attaching a call, pop every open node at the same or deeper depth
//! 3. Track the latest unmatched `call` per call key `(depth, method_name)`
//! 4. Merge a `return` into the node pending under its key, or drop it

use super::node::{CallForest, CallNode, NodeId};
use crate::parser::{EventKind, TraceEvent};
use log::{debug, trace};
use std::collections::HashMap;

/// Counters describing how the event stream was consumed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconstructStats {
    /// Nodes created from `call` and `call_return` events
    pub nodes_created: usize,

    /// `return` events merged into a pending call
    pub returns_merged: usize,

    /// `return` events with no pending call at their key
    pub returns_dropped: usize,

    /// `call` nodes that never received a return
    pub unmatched_calls: usize,
}

/// Build a call forest from ordered trace events
///
/// **Public** - main entry point for reconstruction
pub fn reconstruct(events: impl IntoIterator<Item = TraceEvent>) -> CallForest {
    reconstruct_with_stats(events).0
}

/// Build a call forest and report how events were matched
///
/// Malformed or truncated traces never fail: unmatched returns are dropped
/// and unmatched calls stay as nodes without return data.
pub fn reconstruct_with_stats(
    events: impl IntoIterator<Item = TraceEvent>,
) -> (CallForest, ReconstructStats) {
    let mut nodes: Vec<CallNode> = Vec::new();
    let mut roots: Vec<NodeId> = Vec::new();
    let mut stats = ReconstructStats::default();

    // Open nodes, strictly increasing in depth from bottom to top
    let mut stack: Vec<NodeId> = Vec::new();

    // Call key -> most recent unmatched `call` at that key
    let mut pending: HashMap<(u32, String), NodeId> = HashMap::new();

    for event in events {
        match event.event {
            EventKind::Return => {
                let key = (event.depth, event.method_name);
                match pending.remove(&key) {
                    Some(id) => {
                        let node = &mut nodes[id.index()];
                        node.return_value = event.return_value;
                        node.end_time = event.end_time.or(node.end_time);
                        node.duration = event.duration.or(node.duration);
                        node.returned = true;
                        stats.returns_merged += 1;
                    }
                    None => {
                        trace!(
                            "Dropping unmatched return for {} at depth {}",
                            key.1,
                            key.0
                        );
                        stats.returns_dropped += 1;
                    }
                }
            }
            EventKind::Call | EventKind::CallReturn => {
                let depth = event.depth;

                // Unwind: nothing at this depth or deeper can be an ancestor
                while let Some(&top) = stack.last() {
                    let open = &nodes[top.index()];
                    if open.depth < depth {
                        break;
                    }
                    stack.pop();
                    let key = (open.depth, open.method_name.clone());
                    if pending.get(&key) == Some(&top) {
                        pending.remove(&key);
                    }
                }

                let id = NodeId(nodes.len() as u32);
                let is_call = event.event == EventKind::Call;
                let mut node = CallNode::from_event(id, event);

                match stack.last() {
                    Some(&parent) => {
                        node.parent = Some(parent);
                        nodes[parent.index()].children.push(id);
                    }
                    None => roots.push(id),
                }

                if is_call {
                    // Single slot per key: a later call replaces an earlier one
                    pending.insert((node.depth, node.method_name.clone()), id);
                }

                nodes.push(node);
                stack.push(id);
                stats.nodes_created += 1;
            }
        }
    }

    stats.unmatched_calls = nodes
        .iter()
        .filter(|n| n.event == EventKind::Call && !n.returned)
        .count();

    debug!(
        "Reconstructed {} nodes ({} roots): {} returns merged, {} dropped, {} calls unmatched",
        stats.nodes_created,
        roots.len(),
        stats.returns_merged,
        stats.returns_dropped,
        stats.unmatched_calls
    );

    (CallForest::from_parts(nodes, roots), stats)
}
