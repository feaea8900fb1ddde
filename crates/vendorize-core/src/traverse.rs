//! Mutation-safe plugin traversal.
//!
//! Handlers may insert siblings, clone nodes, remove nodes (including the
//! one being visited) while the walk is in progress. The walk never trusts a
//! child index across a recursive call: after each child is finalized the
//! scan restarts from the first child and picks the first one not yet
//! finalized. Finalized nodes are tracked in a set owned by the call, so
//! every surviving node is finalized exactly once per traversal and repeated
//! traversals need no reset.

use std::collections::HashSet;

use crate::logging::targets;
use crate::plugin::{Phase, PluginModule, SupportMatrix};
use crate::tree::{NodeId, NodeKind, Tree};
use crate::Result;

impl Tree {
    /// Apply every plugin module to the whole tree.
    ///
    /// Root `Before` handlers run first, then every node is finalized
    /// bottom-up (children before their parent).
    #[tracing::instrument(skip_all, target = "vendorize_core::traverse", level = "debug")]
    pub fn execute_plugins(
        &mut self,
        plugins: &[PluginModule],
        support: Option<&SupportMatrix>,
    ) -> Result<()> {
        let root = self.root();
        self.execute_plugins_at(root, plugins, support, None)
    }

    /// Apply every plugin module to the subtree rooted at `id`.
    ///
    /// With a `vendor` context, nodes carrying a different vendor are removed
    /// together with their subtree. Without one, the first vendor met on a
    /// path becomes the context for everything below it.
    #[tracing::instrument(skip(self, plugins, support), target = "vendorize_core::traverse", level = "debug")]
    pub fn execute_plugins_at(
        &mut self,
        id: NodeId,
        plugins: &[PluginModule],
        support: Option<&SupportMatrix>,
        vendor: Option<&str>,
    ) -> Result<()> {
        let mut finalized = HashSet::new();
        self.visit(id, plugins, support, vendor.map(str::to_owned), &mut finalized)?;
        tracing::debug!(
            target: targets::TRAVERSE,
            finalized = finalized.len(),
            "traversal complete"
        );
        Ok(())
    }

    fn visit(
        &mut self,
        id: NodeId,
        plugins: &[PluginModule],
        support: Option<&SupportMatrix>,
        vendor: Option<String>,
        finalized: &mut HashSet<NodeId>,
    ) -> Result<()> {
        if self.node(id)?.kind() == NodeKind::Root {
            for module in plugins {
                self.execute_plugin(id, module, support, Phase::Before)?;
            }
        }

        let own_vendor = self.node(id)?.vendor().map(str::to_owned);
        let vendor = match vendor {
            Some(context) => {
                if let Some(own) = own_vendor
                    && own != context
                {
                    tracing::debug!(
                        target: targets::TRAVERSE,
                        ?id,
                        vendor = %own,
                        context = %context,
                        "pruning node of foreign vendor"
                    );
                    self.remove(id)?;
                    return Ok(());
                }
                Some(context)
            }
            None => own_vendor,
        };

        while let Some(child) = self.first_unfinalized_child(id, finalized) {
            self.visit(child, plugins, support, vendor.clone(), finalized)?;
        }

        for module in plugins {
            self.execute_plugin(id, module, support, Phase::After)?;
        }

        finalized.insert(id);
        tracing::trace!(target: targets::TRAVERSE, ?id, "finalized node");
        Ok(())
    }

    fn first_unfinalized_child(&self, id: NodeId, finalized: &HashSet<NodeId>) -> Option<NodeId> {
        self.get(id)?
            .children()
            .iter()
            .copied()
            .find(|child| !finalized.contains(child))
    }
}
