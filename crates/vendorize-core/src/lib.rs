//! Core tree engine for vendorize.
//!
//! This crate provides the grammar-independent half of a stylesheet
//! transformer:
//!
//! - **Node Tree**: Arena-backed roots, rules, at-rules and declarations with
//!   single-owner parent/child links
//! - **Queries**: Attribute filters for `is`, `children`, `search`, `has` and
//!   `ancestor`
//! - **Scoped Data**: Typed key/value storage inherited by descendants
//! - **Plugins**: Per-kind and per-name handlers gated by browser support
//! - **Traversal**: A bottom-up walk that tolerates mutation and prunes
//!   foreign vendor prefixes
//!
//! Text is turned into nodes by a [`Syntax`] implementation, such as the
//! one in `vendorize-css`.
//!
//! # Example
//!
//! ```ignore
//! use vendorize_core::prelude::*;
//!
//! let mut tree = Tree::parse("@keyframes spin { to { top: 0; } }", syntax)?;
//!
//! let keyframes = Plugin::new("keyframes")
//!     .disable(DisableMap::new().since("chrome", 43.0))
//!     .on_name(NodeKind::AtRule, "keyframes", |tree, id| {
//!         tree.add_vendor_prefix(id, "-webkit-")?;
//!         Ok(())
//!     });
//!
//! let support = SupportMatrix::new().target("chrome", 30.0);
//! tree.execute_plugins(&[vec![keyframes]], Some(&support))?;
//!
//! let found = tree.search(tree.root(), &Query::kind(NodeKind::AtRule).name("-webkit-keyframes"));
//! assert_eq!(found.len(), 1);
//! ```

mod config;
mod error;
pub mod logging;
pub mod plugin;
pub mod query;
mod serialize;
mod syntax;
mod traverse;
pub mod tree;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::{TreeDebug, TreeFormatOptions, TreeStyle};
pub use plugin::{
    need_fix, DisableMap, Handler, HandlerSlot, NativeSupport, Phase, Plugin, PluginModule,
    SupportMatrix, Target,
};
pub use query::{Pattern, Query};
pub use serialize::CodeStyle;
pub use syntax::Syntax;
pub use tree::{vendor_of, NewChild, NodeData, NodeId, NodeKind, NodeSpec, Tree};

/// Commonly used types for writing plugins.
pub mod prelude {
    pub use crate::{
        Config, DisableMap, Error, NodeId, NodeKind, Phase, Plugin, PluginModule, Query, Result,
        SupportMatrix, Syntax, Tree,
    };
}
