//! The boundary to the text grammar.
//!
//! The tree engine never tokenizes text itself. Clones, text children and
//! whole documents are realized through a [`Syntax`] implementation that
//! turns text into [`NodeSpec`] descriptions.

use crate::tree::{NodeKind, NodeSpec};
use crate::{Error, Result};

/// A grammar that parses text into node descriptions.
pub trait Syntax {
    /// Parse text into zero or more top-level node descriptions.
    fn parse(&self, text: &str) -> Result<Vec<NodeSpec>>;

    /// Create a single node of `kind` from its serialized text.
    ///
    /// A serialized node must parse back into a node of the same kind, so the
    /// default takes the first parsed node and checks its kind. A root is
    /// rebuilt from every parsed node.
    fn create(&self, kind: NodeKind, text: &str) -> Result<NodeSpec> {
        let mut specs = self.parse(text)?;
        if kind == NodeKind::Root {
            return Ok(NodeSpec::root(specs));
        }
        if specs.is_empty() {
            return Err(Error::create(kind, "text contains no node"));
        }
        let spec = specs.swap_remove(0);
        if spec.kind != kind {
            return Err(Error::create(kind, format!("text parsed as {}", spec.kind)));
        }
        Ok(spec)
    }
}
