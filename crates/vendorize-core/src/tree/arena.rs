//! Arena-backed node tree with ownership-preserving mutation.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use slotmap::SlotMap;

use super::node::{NodeData, NodeId, NodeKind, NodeSpec};
use crate::logging::targets;
use crate::syntax::Syntax;
use crate::{Error, Result};

/// A child to insert: an existing node, or text realized through the
/// parent's syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewChild {
    /// An existing node (detached from its current parent first).
    Node(NodeId),
    /// Raw text parsed into a single node.
    Text(String),
}

impl From<NodeId> for NewChild {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl From<&str> for NewChild {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for NewChild {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// A stylesheet tree.
///
/// All nodes live in one arena keyed by [`NodeId`]. Each node owns an ordered
/// list of child handles and keeps a non-owning handle to its parent. The two
/// are updated together by every mutation, so a node is always listed by
/// exactly the parent it points back to.
///
/// Detached and removed nodes stay in the arena as orphans until
/// [`Tree::compact`] frees everything unreachable from the root.
pub struct Tree {
    nodes: SlotMap<NodeId, NodeData>,
    root: NodeId,
    syntax: Arc<dyn Syntax>,
}

impl Tree {
    /// Create a tree holding an empty root.
    pub fn new(syntax: Arc<dyn Syntax>) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(NodeData::new(NodeKind::Root));
        Self {
            nodes,
            root,
            syntax,
        }
    }

    /// Parse text into a new tree whose root holds every top-level node.
    pub fn parse(text: &str, syntax: Arc<dyn Syntax>) -> Result<Self> {
        let specs = syntax.parse(text)?;
        let mut tree = Self::new(syntax);
        let root = tree.root;
        for spec in specs {
            let child = tree.materialize(spec);
            tree.link(root, child, None);
        }
        tracing::debug!(target: targets::TREE, nodes = tree.nodes.len(), "parsed tree");
        Ok(tree)
    }

    /// The root node handle.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The syntax used for clones and text children.
    pub fn syntax(&self) -> &dyn Syntax {
        self.syntax.as_ref()
    }

    /// Get a node's data.
    pub fn node(&self, id: NodeId) -> Result<&NodeData> {
        self.nodes.get(id).ok_or(Error::InvalidNode)
    }

    /// Get a node's data, or `None` for a freed handle.
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeData> {
        self.nodes.get_mut(id).ok_or(Error::InvalidNode)
    }

    /// Check if a handle still refers to a node in the arena.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes in the arena, orphans included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root is never freed.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create an empty orphan node.
    pub fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let id = self.nodes.insert(NodeData::new(kind));
        tracing::trace!(target: targets::TREE, ?id, %kind, "created node");
        id
    }

    /// Build an orphan subtree from a parsed description.
    pub fn materialize(&mut self, spec: NodeSpec) -> NodeId {
        let NodeSpec {
            kind,
            name,
            value,
            block,
            children,
        } = spec;

        let mut data = NodeData::new(kind);
        data.set_name(name);
        data.value = value;
        data.block = block;
        let id = self.nodes.insert(data);

        for child in children {
            let child_id = self.materialize(child);
            self.link(id, child_id, None);
        }
        id
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// Rename a node, re-deriving its vendor from the new name.
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) -> Result<()> {
        self.node_mut(id)?.set_name(Some(name.into()));
        Ok(())
    }

    /// Set the declaration value or prelude.
    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) -> Result<()> {
        self.node_mut(id)?.value = Some(value.into());
        Ok(())
    }

    /// Set the fallback identifier used by name-keyed dispatch.
    pub fn set_module(&mut self, id: NodeId, module: impl Into<String>) -> Result<()> {
        self.node_mut(id)?.module = Some(module.into());
        Ok(())
    }

    /// Position of the node within its parent's children, `None` if orphaned.
    pub fn index(&self, id: NodeId) -> Option<usize> {
        let parent = self.nodes.get(id)?.parent?;
        self.nodes
            .get(parent)?
            .children
            .iter()
            .position(|&child| child == id)
    }

    // =========================================================================
    // Ownership & mutation
    // =========================================================================

    /// Insert a child under `parent`.
    ///
    /// The child is detached from its current parent first. It is appended
    /// when `index` is `None`, or when `after` is set and `index` equals the
    /// current length; otherwise it goes to `index` (`index + 1` with `after`),
    /// clamped to the end of the list.
    pub fn add(
        &mut self,
        parent: NodeId,
        child: impl Into<NewChild>,
        index: Option<usize>,
        after: bool,
    ) -> Result<NodeId> {
        self.node(parent)?;
        let child = match child.into() {
            NewChild::Node(id) => id,
            NewChild::Text(text) => self.parse_child(parent, &text)?,
        };
        self.node(child)?;

        if self.is_ancestor_of(child, parent) {
            return Err(Error::CircularParentage);
        }

        self.detach(child)?;

        let len = self.nodes[parent].children.len();
        let position = match index {
            None => None,
            Some(i) if after && i == len => None,
            Some(i) if after => Some((i + 1).min(len)),
            Some(i) => Some(i.min(len)),
        };
        self.link(parent, child, position);

        tracing::trace!(target: targets::TREE, ?parent, ?child, ?position, "added node");
        Ok(child)
    }

    /// Append a child.
    pub fn append(&mut self, parent: NodeId, child: impl Into<NewChild>) -> Result<NodeId> {
        self.add(parent, child, None, false)
    }

    /// Insert a child at the front.
    pub fn prepend(&mut self, parent: NodeId, child: impl Into<NewChild>) -> Result<NodeId> {
        self.add(parent, child, Some(0), false)
    }

    /// Insert `child` immediately before `id`. Does nothing for an orphan.
    pub fn insert_before(
        &mut self,
        id: NodeId,
        child: impl Into<NewChild>,
    ) -> Result<Option<NodeId>> {
        self.node(id)?;
        let (Some(parent), Some(index)) = (self.nodes[id].parent, self.index(id)) else {
            return Ok(None);
        };
        self.add(parent, child, Some(index), false).map(Some)
    }

    /// Insert `child` immediately after `id`. Does nothing for an orphan.
    pub fn insert_after(
        &mut self,
        id: NodeId,
        child: impl Into<NewChild>,
    ) -> Result<Option<NodeId>> {
        self.node(id)?;
        let (Some(parent), Some(index)) = (self.nodes[id].parent, self.index(id)) else {
            return Ok(None);
        };
        self.add(parent, child, Some(index), true).map(Some)
    }

    /// Clone a node and insert the clone before it.
    pub fn clone_before(&mut self, id: NodeId) -> Result<Option<NodeId>> {
        let clone = self.clone_node(id)?;
        self.insert_before(id, clone)
    }

    /// Clone a node and insert the clone after it.
    pub fn clone_after(&mut self, id: NodeId) -> Result<Option<NodeId>> {
        let clone = self.clone_node(id)?;
        self.insert_after(id, clone)
    }

    /// Remove `id` and put `child` at its former position.
    pub fn replace_with(
        &mut self,
        id: NodeId,
        child: impl Into<NewChild>,
    ) -> Result<Option<NodeId>> {
        self.node(id)?;
        let (Some(parent), Some(index)) = (self.nodes[id].parent, self.index(id)) else {
            return Ok(None);
        };
        self.remove(id)?;
        self.add(parent, child, Some(index), false).map(Some)
    }

    /// Detach a node and empty its whole subtree.
    ///
    /// Every node below `id` ends up orphaned with no children. Removing an
    /// already removed node does nothing.
    pub fn remove(&mut self, id: NodeId) -> Result<NodeId> {
        self.detach(id)?;
        self.remove_propagated(id);
        tracing::trace!(target: targets::TREE, ?id, "removed node");
        Ok(id)
    }

    fn remove_propagated(&mut self, id: NodeId) {
        let Some(data) = self.nodes.get_mut(id) else {
            return;
        };
        data.parent = None;
        let children = std::mem::take(&mut data.children);
        for child in children {
            self.remove_propagated(child);
        }
    }

    /// Take a node out of its parent's children, keeping its own subtree.
    pub fn detach(&mut self, id: NodeId) -> Result<NodeId> {
        let parent = self.node(id)?.parent;
        if let Some(parent) = parent {
            if let Some(parent_data) = self.nodes.get_mut(parent) {
                parent_data.children.retain(|&child| child != id);
            }
            self.nodes[id].parent = None;
        }
        Ok(id)
    }

    /// Clone a node by serializing it and parsing the text back.
    ///
    /// The clone is an orphan that shares no node with the source. Anything
    /// the text form cannot carry (scoped data, modules) is not copied. A node
    /// that serializes to nothing (such as a rule with an empty body) clones
    /// to a childless node keeping its kind, name and prelude.
    pub fn clone_node(&mut self, id: NodeId) -> Result<NodeId> {
        let kind = self.node(id)?.kind;
        let text = self.to_string(id)?;
        let spec = if text.is_empty() {
            let node = &self.nodes[id];
            NodeSpec {
                kind,
                name: node.name.clone(),
                value: node.value.clone(),
                block: node.block,
                children: Vec::new(),
            }
        } else {
            self.syntax.create(kind, &text)?
        };
        let clone = self.materialize(spec);
        tracing::trace!(target: targets::TREE, source = ?id, ?clone, "cloned node");
        Ok(clone)
    }

    /// Parse text into a single orphan node suitable as a child of `parent`.
    pub fn parse_child(&mut self, parent: NodeId, text: &str) -> Result<NodeId> {
        let kind = self.node(parent)?.kind;
        let spec = self
            .syntax
            .parse(text)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::create(kind, format!("no child node in '{text}'")))?;
        Ok(self.materialize(spec))
    }

    /// Serialized text of each child.
    pub fn content(&self, id: NodeId) -> Result<Vec<String>> {
        self.node(id)?
            .children
            .iter()
            .map(|&child| self.to_string(child))
            .collect()
    }

    /// Replace all children with nodes parsed from the given texts.
    ///
    /// Every text is parsed before anything changes, so a parse error leaves
    /// the children as they were. The previous children are dropped from the
    /// list without being removed, so they keep their own subtrees.
    pub fn set_content<I, S>(&mut self, id: NodeId, texts: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.node(id)?;
        let replacements = texts
            .into_iter()
            .map(|text| self.parse_child(id, &text.into()))
            .collect::<Result<Vec<_>>>()?;

        let previous = std::mem::take(&mut self.nodes[id].children);
        for child in previous {
            if let Some(data) = self.nodes.get_mut(child) {
                data.parent = None;
            }
        }
        for child in replacements {
            self.link(id, child, None);
        }
        Ok(())
    }

    /// Free every node that is not reachable from the root.
    ///
    /// Handles to freed nodes become invalid. Returns the number freed.
    pub fn compact(&mut self) -> usize {
        let mut reachable = HashSet::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if reachable.insert(id)
                && let Some(data) = self.nodes.get(id)
            {
                stack.extend(data.children.iter().copied());
            }
        }

        let before = self.nodes.len();
        self.nodes.retain(|id, _| reachable.contains(&id));
        let freed = before - self.nodes.len();
        tracing::debug!(target: targets::TREE, freed, "compacted tree");
        freed
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    /// Attach an orphan `child` under `parent` at `position` (append on `None`).
    fn link(&mut self, parent: NodeId, child: NodeId, position: Option<usize>) {
        self.nodes[child].parent = Some(parent);
        let children = &mut self.nodes[parent].children;
        match position {
            Some(position) => children.insert(position, child),
            None => children.push(child),
        }
    }

    /// Check if `potential_ancestor` is `id` or one of its ancestors.
    fn is_ancestor_of(&self, potential_ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            if current_id == potential_ancestor {
                return true;
            }
            current = self.nodes.get(current_id).and_then(|d| d.parent);
        }
        false
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("root", &self.root)
            .field("nodes", &self.nodes.len())
            .finish_non_exhaustive()
    }
}
