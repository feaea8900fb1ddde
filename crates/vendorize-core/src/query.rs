//! Node filters used by `is`, `children`, `search`, `has` and `ancestor`.

use regex::Regex;

use crate::tree::{NodeData, NodeKind};

/// A matcher for a single node attribute.
#[derive(Debug, Clone, Default)]
pub enum Pattern {
    /// Wildcard; matches anything, including an absent attribute.
    #[default]
    Any,
    /// Matches a present, non-empty attribute.
    Present,
    /// Matches an attribute equal to the string.
    Exact(String),
    /// Matches an attribute equal to any of the alternatives.
    OneOf(Vec<String>),
    /// Matches an attribute the expression finds a match in.
    Regex(Regex),
}

impl Pattern {
    /// Test an attribute value against this pattern.
    pub fn matches(&self, actual: Option<&str>) -> bool {
        match self {
            Self::Any => true,
            Self::Present => actual.is_some_and(|value| !value.is_empty()),
            Self::Exact(expected) => actual == Some(expected.as_str()),
            Self::OneOf(alternatives) => {
                actual.is_some_and(|value| alternatives.iter().any(|alt| alt == value))
            }
            Self::Regex(re) => actual.is_some_and(|value| re.is_match(value)),
        }
    }
}

impl From<&str> for Pattern {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Self::Any
        } else {
            Self::Exact(value.to_owned())
        }
    }
}

impl From<String> for Pattern {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<bool> for Pattern {
    fn from(value: bool) -> Self {
        if value { Self::Present } else { Self::Any }
    }
}

impl From<Regex> for Pattern {
    fn from(re: Regex) -> Self {
        Self::Regex(re)
    }
}

impl From<NodeKind> for Pattern {
    fn from(kind: NodeKind) -> Self {
        Self::Exact(kind.as_str().to_owned())
    }
}

impl From<Vec<String>> for Pattern {
    fn from(alternatives: Vec<String>) -> Self {
        Self::OneOf(alternatives)
    }
}

impl<const N: usize> From<[&str; N]> for Pattern {
    fn from(alternatives: [&str; N]) -> Self {
        Self::OneOf(alternatives.iter().map(|s| (*s).to_owned()).collect())
    }
}

impl<const N: usize> From<[NodeKind; N]> for Pattern {
    fn from(kinds: [NodeKind; N]) -> Self {
        Self::OneOf(kinds.iter().map(|k| k.as_str().to_owned()).collect())
    }
}

/// A conjunction of attribute patterns; omitted attributes match anything.
///
/// ```ignore
/// let query = Query::kind(NodeKind::AtRule).name("keyframes");
/// let found = tree.search(tree.root(), &query);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub kind: Pattern,
    pub name: Pattern,
    pub value: Pattern,
    pub vendor: Pattern,
}

impl Query {
    /// A query matching every node.
    pub fn any() -> Self {
        Self::default()
    }

    /// Start a query filtering on kind.
    pub fn kind(kind: impl Into<Pattern>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Filter on name.
    pub fn name(mut self, name: impl Into<Pattern>) -> Self {
        self.name = name.into();
        self
    }

    /// Filter on value.
    pub fn value(mut self, value: impl Into<Pattern>) -> Self {
        self.value = value.into();
        self
    }

    /// Filter on vendor.
    pub fn vendor(mut self, vendor: impl Into<Pattern>) -> Self {
        self.vendor = vendor.into();
        self
    }

    /// Test a node against every filter.
    pub fn matches(&self, node: &NodeData) -> bool {
        self.kind.matches(Some(node.kind().as_str()))
            && self.name.matches(node.name())
            && self.value.matches(node.value())
            && self.vendor.matches(node.vendor())
    }
}
