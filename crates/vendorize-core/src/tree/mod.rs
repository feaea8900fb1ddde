//! The node tree: arena storage, mutation, queries and scoped data.

mod arena;
mod at_rule;
mod data;
mod node;
mod search;

pub use arena::{NewChild, Tree};
pub use node::{vendor_of, NodeData, NodeId, NodeKind, NodeSpec};

#[cfg(test)]
pub(crate) mod tests;
