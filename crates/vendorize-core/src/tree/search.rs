//! Predicate-based lookups over a tree.

use super::arena::Tree;
use super::node::NodeId;
use crate::query::Query;

impl Tree {
    /// Check if a node matches the query. Freed handles never match.
    pub fn is(&self, id: NodeId, query: &Query) -> bool {
        self.get(id).is_some_and(|node| query.matches(node))
    }

    /// Immediate children matching the query, in order.
    pub fn children(&self, id: NodeId, query: &Query) -> Vec<NodeId> {
        self.get(id)
            .map(|node| {
                node.children()
                    .iter()
                    .copied()
                    .filter(|&child| self.is(child, query))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Check if any immediate child matches.
    pub fn has_child(&self, id: NodeId, query: &Query) -> bool {
        self.get(id)
            .is_some_and(|node| node.children().iter().any(|&child| self.is(child, query)))
    }

    /// Every matching node of the subtree rooted at `id` (itself included),
    /// in document order.
    pub fn search(&self, id: NodeId, query: &Query) -> Vec<NodeId> {
        let mut result = Vec::new();
        self.search_recursive(id, query, &mut result);
        result
    }

    fn search_recursive(&self, id: NodeId, query: &Query, result: &mut Vec<NodeId>) {
        let Some(node) = self.get(id) else {
            return;
        };
        if query.matches(node) {
            result.push(id);
        }
        for &child in node.children() {
            self.search_recursive(child, query, result);
        }
    }

    /// Check if the node or any descendant matches.
    pub fn has(&self, id: NodeId, query: &Query) -> bool {
        self.get(id).is_some_and(|node| {
            query.matches(node) || node.children().iter().any(|&child| self.has(child, query))
        })
    }

    /// The nearest node on the path from `id` up to the root (inclusive) that
    /// matches the query.
    pub fn ancestor(&self, id: NodeId, query: &Query) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(current_id) = current {
            let node = self.get(current_id)?;
            if query.matches(node) {
                return Some(current_id);
            }
            current = node.parent();
        }
        None
    }
}
