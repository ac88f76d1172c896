//! Reconstructed call nodes and the forest that owns them.
//!
//! Nodes live in a single arena indexed by `NodeId`. A parent owns its
//! children through `children`; `parent` is only a lookup relation.

use crate::parser::{EventKind, Parameter, TraceEvent, TraceValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a call node within one forest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One method invocation in the reconstructed tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallNode {
    pub id: NodeId,

    /// `Call` or `CallReturn`; return events never become nodes
    pub event: EventKind,

    pub method_name: String,

    pub defined_class: Option<String>,

    pub parameters: Option<Vec<Parameter>>,

    pub return_value: Option<TraceValue>,

    pub depth: u32,

    /// Display level, equal to `depth`
    pub level: u32,

    pub path: Option<String>,

    pub lineno: Option<u32>,

    pub start_time: Option<f64>,

    pub end_time: Option<f64>,

    pub duration: Option<f64>,

    /// False for a `call` whose `return` never arrived
    pub returned: bool,

    pub parent: Option<NodeId>,

    pub children: Vec<NodeId>,
}

impl CallNode {
    /// Build a node from a `call` or `call_return` event
    pub(crate) fn from_event(id: NodeId, event: TraceEvent) -> Self {
        let returned = event.event == EventKind::CallReturn;
        Self {
            id,
            event: event.event,
            method_name: event.method_name,
            defined_class: event.defined_class,
            parameters: event.parameters,
            return_value: event.return_value,
            depth: event.depth,
            level: event.depth,
            path: event.path,
            lineno: event.lineno,
            start_time: event.start_time,
            end_time: event.end_time,
            duration: event.duration,
            returned,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Duration in seconds, absent counted as zero
    pub fn duration_or_zero(&self) -> f64 {
        self.duration.unwrap_or(0.0)
    }

    /// `Class#method`, or just `method` when the class is unknown
    pub fn label(&self) -> String {
        match &self.defined_class {
            Some(class) => format!("{}#{}", class, self.method_name),
            None => self.method_name.clone(),
        }
    }

    /// Case-insensitive match of `needle` (already lowercased) against
    /// method name and defined class. An empty needle matches.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.method_name.to_lowercase().contains(needle)
            || self
                .defined_class
                .as_deref()
                .is_some_and(|class| class.to_lowercase().contains(needle))
    }
}

/// Rooted forest of call nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallForest {
    nodes: Vec<CallNode>,
    roots: Vec<NodeId>,
}

impl CallForest {
    pub(crate) fn from_parts(nodes: Vec<CallNode>, roots: Vec<NodeId>) -> Self {
        Self { nodes, roots }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root ids in first-seen order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn get(&self, id: NodeId) -> Option<&CallNode> {
        self.nodes.get(id.index())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// All nodes in creation order
    pub fn nodes(&self) -> &[CallNode] {
        &self.nodes
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Ancestors of `id`, nearest first
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            out.push(parent);
            current = self.parent(parent);
        }
        out
    }

    /// Ids of every node with at least one child
    pub fn ids_with_children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().filter(|n| n.has_children()).map(|n| n.id)
    }

    pub fn max_depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Depth-first pre-order walk over the whole forest
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            forest: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }
}

/// Iterative pre-order traversal, safe on very deep traces
pub struct Preorder<'a> {
    forest: &'a CallForest,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a CallNode;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.forest.get(id)?;
        self.stack.extend(node.children.iter().rev().copied());
        Some(node)
    }
}
