//! CSS syntax and prefixing plugins for vendorize.
//!
//! This crate connects the grammar-independent tree in `vendorize-core` to
//! real stylesheets:
//!
//! - **Parsing**: [`CssSyntax`], a `cssparser`-based [`Syntax`] used for
//!   whole documents, clones and text children
//! - **Plugins**: A small catalog of vendor-prefixing plugins
//!
//! # Example
//!
//! ```ignore
//! use vendorize_css::prelude::*;
//!
//! let mut tree = parse_stylesheet("@keyframes spin { to { transform: rotate(1turn) } }")?;
//!
//! let support = SupportMatrix::new().target("chrome", 30.0).exclude("firefox");
//! tree.execute_plugins(&default_plugins(), Some(&support))?;
//!
//! println!("{}", tree.to_string(tree.root())?);
//! ```
//!
//! [`Syntax`]: vendorize_core::Syntax

pub mod parser;
pub mod plugins;

/// Target names for log filtering.
pub mod targets {
    /// Stylesheet parsing and file loading.
    pub const PARSER: &str = "vendorize_css::parser";
    /// Prefixing plugin decisions.
    pub const PLUGINS: &str = "vendorize_css::plugins";
}

pub use parser::{parse_css, parse_file, parse_stylesheet, CssSyntax};
pub use plugins::default_plugins;

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::parser::{parse_file, parse_stylesheet, CssSyntax};
    pub use crate::plugins::{
        default_plugins, keyframes, prefix_at_rule, prefix_declaration, transition,
    };
    pub use vendorize_core::prelude::*;
    pub use vendorize_core::CodeStyle;
}
