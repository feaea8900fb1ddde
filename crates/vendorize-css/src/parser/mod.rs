//! CSS parsing module.

mod css_parser;

use std::path::Path;
use std::sync::Arc;

use vendorize_core::{Error, NodeSpec, Result, Syntax, Tree};

use crate::targets;

pub use css_parser::parse_css;

/// The CSS grammar, for use as a tree's [`Syntax`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CssSyntax;

impl Syntax for CssSyntax {
    fn parse(&self, text: &str) -> Result<Vec<NodeSpec>> {
        parse_css(text)
    }
}

/// Parse a stylesheet into a tree backed by [`CssSyntax`].
pub fn parse_stylesheet(css: &str) -> Result<Tree> {
    Tree::parse(css, Arc::new(CssSyntax))
}

/// Load and parse a stylesheet from a file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Tree> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

    let tree = parse_stylesheet(&content)?;
    tracing::debug!(target: targets::PARSER, path = %path.display(), "parsed stylesheet");
    Ok(tree)
}
