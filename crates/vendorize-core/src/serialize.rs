//! Turning nodes back into text.
//!
//! Serialization is per kind:
//!
//! - Root: non-empty child texts joined by the line break
//! - Rule: `prelude {` + children + `}`, or nothing when the body is empty
//! - AtRule: `@name ` + the rule form above, or `@name prelude;` without a block
//! - Declaration: `name: value;`
//!
//! Empty children are dropped, so a rule whose declarations were all removed
//! disappears from the output instead of leaving an empty shell.

use serde::{Deserialize, Serialize};

use crate::tree::{NodeData, NodeId, NodeKind, Tree};
use crate::Result;

/// Output options for [`Tree::to_code`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeStyle {
    /// Separator placed between sibling nodes and around block bodies.
    pub linebreak: String,
}

impl CodeStyle {
    /// A style joining nodes with the given separator.
    pub fn with_linebreak(linebreak: impl Into<String>) -> Self {
        Self {
            linebreak: linebreak.into(),
        }
    }

    /// Everything on a single line, separated by spaces.
    pub fn minified() -> Self {
        Self::with_linebreak(" ")
    }
}

impl Default for CodeStyle {
    fn default() -> Self {
        Self::with_linebreak("\n")
    }
}

impl Tree {
    /// Canonical text form of a node (newline separated).
    ///
    /// This is the form clones are rebuilt from.
    pub fn to_string(&self, id: NodeId) -> Result<String> {
        self.to_code(id, &CodeStyle::default())
    }

    /// Text form of a node using the given style.
    pub fn to_code(&self, id: NodeId, style: &CodeStyle) -> Result<String> {
        let node = self.node(id)?;

        Ok(match node.kind() {
            NodeKind::Root => self.join_children(node, style)?,
            NodeKind::Rule => self.block_code(node, style)?,
            NodeKind::AtRule => {
                let name = node.name().unwrap_or_default();
                if node.has_block() {
                    let body = self.block_code(node, style)?;
                    if body.is_empty() {
                        String::new()
                    } else {
                        format!("@{name} {body}")
                    }
                } else {
                    match node.value().filter(|prelude| !prelude.is_empty()) {
                        Some(prelude) => format!("@{name} {prelude};"),
                        None => format!("@{name};"),
                    }
                }
            }
            NodeKind::Declaration => match node.name() {
                Some(name) => format!("{name}: {};", node.value().unwrap_or_default()),
                None => String::new(),
            },
        })
    }

    fn join_children(&self, node: &NodeData, style: &CodeStyle) -> Result<String> {
        let mut parts = Vec::with_capacity(node.children().len());
        for &child in node.children() {
            let code = self.to_code(child, style)?;
            if !code.is_empty() {
                parts.push(code);
            }
        }
        Ok(parts.join(&style.linebreak))
    }

    fn block_code(&self, node: &NodeData, style: &CodeStyle) -> Result<String> {
        let body = self.join_children(node, style)?;
        if body.is_empty() {
            return Ok(String::new());
        }
        let lb = &style.linebreak;
        Ok(match node.value().filter(|prelude| !prelude.is_empty()) {
            Some(prelude) => format!("{prelude} {{{lb}{body}{lb}}}"),
            None => format!("{{{lb}{body}{lb}}}"),
        })
    }
}
