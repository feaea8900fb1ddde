//! Plugin definitions and per-node handler dispatch.
//!
//! A [`PluginModule`] is an ordered list of [`Plugin`]s. Each plugin maps a
//! node kind and [`Phase`] to a handler slot, which is either a single
//! handler or a table of handlers keyed by node name:
//!
//! ```ignore
//! let keyframes = Plugin::new("keyframes")
//!     .disable(DisableMap::new().since("chrome", 43.0).since("firefox", 16.0))
//!     .on_name(NodeKind::AtRule, "keyframes", |tree, id| {
//!         tree.add_vendor_prefix(id, "-webkit-")?;
//!         Ok(())
//!     });
//!
//! tree.execute_plugins(&[vec![keyframes]], Some(&support))?;
//! ```

mod dispatch;
mod support;

use std::collections::HashMap;
use std::fmt;

use crate::tree::{NodeId, NodeKind, Tree};
use crate::Result;

pub use support::{need_fix, DisableMap, NativeSupport, SupportMatrix, Target};

/// A handler invoked with the tree and the node being finalized.
pub type Handler = Box<dyn Fn(&mut Tree, NodeId) -> Result<()>>;

/// An ordered group of plugins applied together.
pub type PluginModule = Vec<Plugin>;

/// When a handler runs during a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Once on the root, before any descendant is visited.
    Before,
    /// When the node is finalized, after all of its children.
    After,
}

/// The handlers a plugin registers for one kind and phase.
pub enum HandlerSlot {
    /// Runs for every node of the kind.
    Direct(Handler),
    /// Runs for nodes whose name (or, failing that, module) is a key.
    ByName(HashMap<String, Handler>),
}

impl fmt::Debug for HandlerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(_) => f.write_str("Direct(..)"),
            Self::ByName(handlers) => {
                let mut names: Vec<_> = handlers.keys().collect();
                names.sort();
                f.debug_tuple("ByName").field(&names).finish()
            }
        }
    }
}

/// A set of node handlers sharing one compatibility gate.
#[derive(Debug)]
pub struct Plugin {
    name: String,
    disable: Option<DisableMap>,
    slots: HashMap<(NodeKind, Phase), HandlerSlot>,
}

impl Plugin {
    /// Create a plugin with no handlers. The name is used for logging.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            disable: None,
            slots: HashMap::new(),
        }
    }

    /// Declare the versions from which browsers no longer need this fix.
    pub fn disable(mut self, disable: DisableMap) -> Self {
        self.disable = Some(disable);
        self
    }

    /// Run `handler` on every finalized node of `kind`.
    pub fn on<F>(self, kind: NodeKind, handler: F) -> Self
    where
        F: Fn(&mut Tree, NodeId) -> Result<()> + 'static,
    {
        self.with_direct(kind, Phase::After, Box::new(handler))
    }

    /// Run `handler` on a root of `kind` before its descendants are visited.
    pub fn before<F>(self, kind: NodeKind, handler: F) -> Self
    where
        F: Fn(&mut Tree, NodeId) -> Result<()> + 'static,
    {
        self.with_direct(kind, Phase::Before, Box::new(handler))
    }

    /// Run `handler` on finalized nodes of `kind` named `name`.
    ///
    /// Replaces a direct handler registered for the same kind.
    pub fn on_name<F>(self, kind: NodeKind, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Tree, NodeId) -> Result<()> + 'static,
    {
        self.with_named(kind, Phase::After, name.into(), Box::new(handler))
    }

    /// Name-keyed variant of [`Plugin::before`].
    pub fn before_name<F>(self, kind: NodeKind, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Tree, NodeId) -> Result<()> + 'static,
    {
        self.with_named(kind, Phase::Before, name.into(), Box::new(handler))
    }

    /// The plugin name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The compatibility thresholds, if declared.
    pub fn disable_map(&self) -> Option<&DisableMap> {
        self.disable.as_ref()
    }

    /// The handler slot for a kind and phase.
    pub fn slot(&self, kind: NodeKind, phase: Phase) -> Option<&HandlerSlot> {
        self.slots.get(&(kind, phase))
    }

    fn with_direct(mut self, kind: NodeKind, phase: Phase, handler: Handler) -> Self {
        self.slots.insert((kind, phase), HandlerSlot::Direct(handler));
        self
    }

    fn with_named(mut self, kind: NodeKind, phase: Phase, name: String, handler: Handler) -> Self {
        let key = (kind, phase);
        if !matches!(self.slots.get(&key), Some(HandlerSlot::ByName(_))) {
            self.slots.insert(key, HandlerSlot::ByName(HashMap::new()));
        }
        if let Some(HandlerSlot::ByName(handlers)) = self.slots.get_mut(&key) {
            handlers.insert(name, handler);
        }
        self
    }
}
