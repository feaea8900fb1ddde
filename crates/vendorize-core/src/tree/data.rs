//! Scoped key/value storage.
//!
//! Values set on a node are visible to its whole subtree: a lookup that
//! misses locally continues with the parent, up to the root.

use std::any::Any;
use std::collections::HashMap;

use super::arena::Tree;
use super::node::NodeId;
use crate::Result;

impl Tree {
    /// Look up `key` on the node, then on each ancestor in turn.
    ///
    /// The nearest node holding the key wins. If its value is not a `T`, the
    /// lookup yields `None` rather than continuing upwards.
    pub fn get_data<T: Any>(&self, id: NodeId, key: &str) -> Option<&T> {
        let mut current = Some(id);
        while let Some(current_id) = current {
            let node = self.get(current_id)?;
            if let Some(value) = node.data.as_ref().and_then(|data| data.get(key)) {
                return value.downcast_ref::<T>();
            }
            current = node.parent();
        }
        None
    }

    /// Store a value on this node only. Returns the tree for chaining.
    pub fn set_data<T: Any>(
        &mut self,
        id: NodeId,
        key: impl Into<String>,
        value: T,
    ) -> Result<&mut Self> {
        self.node_mut(id)?
            .data
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), Box::new(value));
        Ok(self)
    }

    /// Remove a value stored on this node, returning it.
    pub fn remove_data(&mut self, id: NodeId, key: &str) -> Result<Option<Box<dyn Any>>> {
        Ok(self
            .node_mut(id)?
            .data
            .as_mut()
            .and_then(|data| data.remove(key)))
    }
}
