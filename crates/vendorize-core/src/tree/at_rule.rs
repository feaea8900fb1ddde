//! At-rule specific operations.

use super::arena::Tree;
use super::node::NodeId;
use crate::logging::targets;
use crate::Result;

impl Tree {
    /// Insert a vendor-prefixed copy of a node right before it.
    ///
    /// The copy is a textual clone renamed to `prefix + name`, so
    /// `@keyframes spin` with prefix `-webkit-` gains a preceding
    /// `@-webkit-keyframes spin` sibling with an identical body. The
    /// original stays in place. Returns `None` when the node is orphaned.
    pub fn add_vendor_prefix(&mut self, id: NodeId, prefix: &str) -> Result<Option<NodeId>> {
        let name = self.node(id)?.name().unwrap_or_default().to_owned();
        let clone = self.clone_node(id)?;
        self.set_name(clone, format!("{prefix}{name}"))?;
        tracing::trace!(target: targets::TREE, ?id, ?clone, prefix, "added vendor prefix");
        self.insert_before(id, clone)
    }
}
