//! The resolved-graph shape (spec §3 `GraphNode`/`GraphItem`).

use modulus_core::{LibraryRange, Version};
use modulus_providers::{ProviderKind, ProviderToken};

/// A candidate paired with its declared dependency ranges for a given
/// framework (spec GLOSSARY "Graph item").
#[derive(Debug, Clone)]
pub struct GraphItem {
    pub library_name: String,
    pub library_version: Version,
    pub provider: ProviderKind,
    pub token: ProviderToken,
    pub dependencies: Vec<LibraryRange>,
}

/// One node of the (explicit, tree-shaped) resolved dependency graph.
/// `item` is `None` while pending and for unresolved ranges (spec §3).
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub range: LibraryRange,
    pub item: Option<GraphItem>,
    pub deps: Vec<GraphNode>,
    /// Set when a provider's spelling differs from `range.name` only in
    /// case (spec §4.3 "case policy").
    pub suggestion: Option<String>,
}

impl GraphNode {
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.item.is_some()
    }

    /// Depth-first iterator over every node in this subtree, including self.
    pub fn iter(&self) -> impl Iterator<Item = &GraphNode> {
        GraphNodeIter { stack: vec![self] }
    }
}

struct GraphNodeIter<'a> {
    stack: Vec<&'a GraphNode>,
}

impl<'a> Iterator for GraphNodeIter<'a> {
    type Item = &'a GraphNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.deps.iter());
        Some(node)
    }
}
