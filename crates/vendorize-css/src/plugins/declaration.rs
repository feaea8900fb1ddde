use vendorize_core::{DisableMap, NodeKind, Plugin, Query};

/// Add a `prefix`ed copy before every `property` declaration.
pub fn prefix_declaration(property: &str, prefix: &str, disable: DisableMap) -> Plugin {
    let prefixed = format!("{prefix}{property}");

    Plugin::new(prefixed.clone())
        .disable(disable)
        .on_name(NodeKind::Declaration, property, move |tree, id| {
            let Some(parent) = tree.node(id)?.parent() else {
                return Ok(());
            };
            let existing = Query::kind(NodeKind::Declaration).name(prefixed.as_str());
            if tree.has_child(parent, &existing) {
                return Ok(());
            }

            if let Some(clone) = tree.clone_before(id)? {
                tree.set_name(clone, prefixed.as_str())?;
            }
            Ok(())
        })
}
