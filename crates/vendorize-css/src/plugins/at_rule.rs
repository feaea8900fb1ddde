use vendorize_core::{DisableMap, NodeKind, Plugin, Query};

use crate::targets;

/// Add a `prefix`ed copy before every `@name` at-rule.
///
/// The copy keeps the prelude and the whole body; the traversal then prunes
/// declarations inside it that carry a different vendor.
pub fn prefix_at_rule(name: &str, prefix: &str, disable: DisableMap) -> Plugin {
    let prefix = prefix.to_owned();

    Plugin::new(format!("@{prefix}{name}"))
        .disable(disable)
        .on_name(NodeKind::AtRule, name, move |tree, id| {
            let node = tree.node(id)?;
            let Some(parent) = node.parent() else {
                return Ok(());
            };
            let prefixed = format!("{prefix}{}", node.name().unwrap_or_default());
            let existing = Query::kind(NodeKind::AtRule)
                .name(prefixed.as_str())
                .value(node.value().unwrap_or_default());

            if tree.has_child(parent, &existing) {
                tracing::trace!(target: targets::PLUGINS, ?id, %prefixed, "already prefixed");
                return Ok(());
            }
            tree.add_vendor_prefix(id, &prefix)?;
            Ok(())
        })
}
