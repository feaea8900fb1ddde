//! Resolving and invoking the handlers of one plugin module on one node.

use super::{need_fix, HandlerSlot, Phase, Plugin, SupportMatrix};
use crate::logging::targets;
use crate::tree::{NodeId, Tree};
use crate::Result;

impl Tree {
    /// Run every applicable handler of `module` on a node.
    ///
    /// For each plugin in order, the slot for the node's kind and `phase` is
    /// looked up and skipped when absent or when the compatibility gate says
    /// the fix is unnecessary. Direct handlers always run; name-keyed tables
    /// run the entry for the node's name, falling back to its module; nodes
    /// without a name (roots, rules) never match one. Every matching handler
    /// runs, not only the first.
    pub fn execute_plugin(
        &mut self,
        id: NodeId,
        module: &[Plugin],
        support: Option<&SupportMatrix>,
        phase: Phase,
    ) -> Result<()> {
        for plugin in module {
            // Re-read on each plugin: a previous handler may have renamed the node.
            let Some(node) = self.get(id) else {
                return Ok(());
            };
            let kind = node.kind();

            let Some(slot) = plugin.slot(kind, phase) else {
                continue;
            };

            if !need_fix(support, plugin.disable_map()) {
                tracing::debug!(
                    target: targets::PLUGIN,
                    plugin = plugin.name(),
                    %kind,
                    "fix not needed for targeted browsers"
                );
                continue;
            }

            let handler = match slot {
                HandlerSlot::Direct(handler) => handler,
                HandlerSlot::ByName(handlers) => {
                    let Some(name) = node.name() else {
                        continue;
                    };
                    let found = handlers
                        .get(name)
                        .or_else(|| node.module().and_then(|module| handlers.get(module)));
                    match found {
                        Some(handler) => handler,
                        None => continue,
                    }
                }
            };

            tracing::trace!(
                target: targets::PLUGIN,
                plugin = plugin.name(),
                ?id,
                %kind,
                ?phase,
                "running handler"
            );
            handler(self, id)?;
        }
        Ok(())
    }
}
