use std::collections::HashSet;

use crate::types::Node;

/// Append-only record of nodes already stood on during a run.
///
/// Keyed by case-insensitive name through [`Node`]'s equality. Nothing is
/// ever evicted; a run holds at most one entry per turn.
#[derive(Debug, Default, Clone)]
pub struct VisitedMemory {
    visited: HashSet<Node>,
}

impl VisitedMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a node. Returns `false` if it was already present.
    pub fn record(&mut self, node: &Node) -> bool {
        self.visited.insert(node.clone())
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.visited.contains(node)
    }

    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }
}
