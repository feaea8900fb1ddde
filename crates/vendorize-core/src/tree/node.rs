//! Node storage types: handles, kinds, per-node data and parsed descriptions.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use slotmap::new_key_type;

new_key_type! {
    /// A handle to a node stored in a [`Tree`](crate::Tree).
    ///
    /// Handles stay valid when the node is detached or removed; only
    /// [`Tree::compact`](crate::Tree::compact) frees the underlying slot.
    pub struct NodeId;
}

/// The closed set of node variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    /// The document root.
    Root,
    /// A qualified rule: prelude (selector) plus a declaration block.
    Rule,
    /// An at-rule such as `@keyframes spin { ... }` or `@import url(a.css);`.
    AtRule,
    /// A `property: value` declaration.
    Declaration,
}

impl NodeKind {
    /// The kind tag as used by query filters.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Root => "Root",
            Self::Rule => "Rule",
            Self::AtRule => "AtRule",
            Self::Declaration => "Declaration",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static VENDOR_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-(\w+)-").expect("vendor prefix pattern is valid"));

/// Extract the vendor token from a name such as `-webkit-keyframes`.
///
/// Returns the bare token (`webkit`), or `None` when the name carries no
/// leading `-token-` prefix.
pub fn vendor_of(name: &str) -> Option<&str> {
    VENDOR_PREFIX
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Data stored in the arena for each node.
pub struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) name: Option<String>,
    pub(crate) vendor: Option<String>,
    pub(crate) value: Option<String>,
    pub(crate) module: Option<String>,
    pub(crate) block: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) data: Option<HashMap<String, Box<dyn Any>>>,
}

impl NodeData {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            name: None,
            vendor: None,
            value: None,
            module: None,
            block: matches!(kind, NodeKind::Root | NodeKind::Rule),
            parent: None,
            children: Vec::new(),
            data: None,
        }
    }

    /// Set the name and re-derive the vendor from it.
    pub(crate) fn set_name(&mut self, name: Option<String>) {
        self.vendor = name.as_deref().and_then(vendor_of).map(str::to_owned);
        self.name = name;
    }

    /// The node variant.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The node name (at-rule name without `@`, or declaration property).
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The vendor token derived from the name.
    pub fn vendor(&self) -> Option<&str> {
        self.vendor.as_deref()
    }

    /// Declaration value, or the prelude of a rule or at-rule.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Fallback identifier for name-keyed plugin dispatch.
    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    /// Whether the node owns a `{}` body.
    pub fn has_block(&self) -> bool {
        self.block
    }

    /// The parent handle, if attached.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The ordered child handles.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Keys stored locally on this node (not inherited ones).
    pub fn data_keys(&self) -> Vec<&str> {
        self.data
            .as_ref()
            .map(|data| data.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

impl fmt::Debug for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeData")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("vendor", &self.vendor)
            .field("value", &self.value)
            .field("module", &self.module)
            .field("block", &self.block)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

/// An owned, arena-independent description of a node, produced by a
/// [`Syntax`](crate::Syntax) and materialized into a tree.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub kind: NodeKind,
    pub name: Option<String>,
    pub value: Option<String>,
    pub block: bool,
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    /// A root holding the given top-level nodes.
    pub fn root(children: Vec<NodeSpec>) -> Self {
        Self {
            kind: NodeKind::Root,
            name: None,
            value: None,
            block: true,
            children,
        }
    }

    /// A qualified rule.
    pub fn rule(prelude: impl Into<String>, children: Vec<NodeSpec>) -> Self {
        Self {
            kind: NodeKind::Rule,
            name: None,
            value: Some(prelude.into()),
            block: true,
            children,
        }
    }

    /// An at-rule. `body` is `None` for statement at-rules ending in `;`.
    pub fn at_rule(
        name: impl Into<String>,
        prelude: impl Into<String>,
        body: Option<Vec<NodeSpec>>,
    ) -> Self {
        let prelude = prelude.into();
        Self {
            kind: NodeKind::AtRule,
            name: Some(name.into()),
            value: (!prelude.is_empty()).then_some(prelude),
            block: body.is_some(),
            children: body.unwrap_or_default(),
        }
    }

    /// A declaration.
    pub fn declaration(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Declaration,
            name: Some(name.into()),
            value: Some(value.into()),
            block: false,
            children: Vec::new(),
        }
    }
}
