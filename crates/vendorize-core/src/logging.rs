//! Logging targets and tree visualization.
//!
//! vendorize reports through the `tracing` crate. Install a subscriber in the
//! host application to see the events:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("vendorize_core::traverse=debug")
//!     .init();
//! ```
//!
//! Use [`TreeDebug`] to dump a subtree while debugging a plugin:
//!
//! ```ignore
//! use vendorize_core::logging::TreeDebug;
//!
//! println!("{}", TreeDebug::new().format_subtree(&tree, tree.root())?);
//! ```

use std::fmt::Write as FmtWrite;

use crate::tree::{NodeId, Tree};
use crate::Result;

/// Target names for log filtering.
///
/// The CSS crate lists its own targets in `vendorize_css::targets`.
pub mod targets {
    /// Node creation, insertion, removal and cloning.
    pub const TREE: &str = "vendorize_core::tree";
    /// Plugin traversal and vendor pruning.
    pub const TRAVERSE: &str = "vendorize_core::traverse";
    /// Handler dispatch and compatibility gating.
    pub const PLUGIN: &str = "vendorize_core::plugin";
    /// Configuration loading.
    pub const CONFIG: &str = "vendorize_core::config";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact dash-prefixed lines.
    Compact,
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show node handles.
    pub show_ids: bool,
    /// Whether to show values (declaration values, preludes).
    pub show_values: bool,
    /// Whether to show locally stored data keys.
    pub show_data: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: false,
            show_values: true,
            show_data: false,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Everything, including handles and data keys.
    pub fn detailed() -> Self {
        Self {
            show_ids: true,
            show_data: true,
            ..Default::default()
        }
    }

    /// Kinds and names only.
    pub fn minimal() -> Self {
        Self {
            show_values: false,
            ..Default::default()
        }
    }
}

/// Debug utility for visualizing node trees.
#[derive(Debug, Clone, Default)]
pub struct TreeDebug {
    options: TreeFormatOptions,
}

impl TreeDebug {
    /// Create a visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format the subtree rooted at `id`.
    pub fn format_subtree(&self, tree: &Tree, id: NodeId) -> Result<String> {
        let mut output = String::new();
        self.format_subtree_into(tree, id, 0, true, &mut output)?;
        Ok(output)
    }

    fn format_subtree_into(
        &self,
        tree: &Tree,
        id: NodeId,
        depth: usize,
        is_last: bool,
        output: &mut String,
    ) -> Result<()> {
        if let Some(max) = self.options.max_depth
            && depth > max
        {
            return Ok(());
        }

        let node = tree.node(id)?;

        output.push_str(&self.build_prefix(depth, is_last));
        output.push_str(node.kind().as_str());

        if let Some(name) = node.name() {
            write!(output, " {name}").expect("write to String");
        }
        if self.options.show_values
            && let Some(value) = node.value()
        {
            write!(output, " {value:?}").expect("write to String");
        }
        if let Some(vendor) = node.vendor() {
            write!(output, " <{vendor}>").expect("write to String");
        }
        if self.options.show_ids {
            write!(output, " [{id:?}]").expect("write to String");
        }
        output.push('\n');

        if self.options.show_data {
            let mut keys = node.data_keys();
            keys.sort_unstable();
            let data_prefix = self.build_data_prefix(depth);
            for key in keys {
                writeln!(output, "{data_prefix}  .{key}").expect("write to String");
            }
        }

        let children = node.children();
        let child_count = children.len();
        for (i, &child) in children.iter().enumerate() {
            self.format_subtree_into(tree, child, depth + 1, i + 1 == child_count, output)?;
        }

        Ok(())
    }

    fn build_prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, tee, corner) = match self.options.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
            TreeStyle::Compact => ("", "-", "-"),
        };

        let mut prefix = String::new();
        for _ in 0..(depth - 1) {
            prefix.push_str(branch);
            prefix.push_str(&" ".repeat(self.options.indent_size));
        }
        prefix.push_str(if is_last { corner } else { tee });
        prefix.push(' ');
        prefix
    }

    fn build_data_prefix(&self, depth: usize) -> String {
        let branch = match self.options.style {
            TreeStyle::Ascii => "|",
            TreeStyle::Unicode => "\u{2502}",
            TreeStyle::Compact => "",
        };
        let mut prefix = String::new();
        for _ in 0..depth {
            prefix.push_str(branch);
            prefix.push_str(&" ".repeat(self.options.indent_size));
        }
        prefix
    }
}
