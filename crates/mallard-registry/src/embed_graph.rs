//! Embedding graph over registered types.
//!
//! Uses `petgraph::DiGraph` with:
//! - one node per named type that participates in embedding
//! - one edge per embedded (anonymous) struct field, pointing at the
//!   embedded field's named base type
//!
//! The graph is built incrementally at registration time and drives every
//! embedding traversal (method-set computation and selector resolution), so
//! promotion is a walk over explicit edges rather than a re-scan of field
//! lists on each access.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;

use mallard_core::TypeHash;

/// Edge payload for one embedded field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedEdge {
    /// Index of the embedded field in the owning struct's field list.
    pub field_index: usize,
    /// Whether the field embeds through a single-level reference (`*T`
    /// rather than `T`). Promotion through a reference carries the full
    /// method set; a plain embed carries only value-receiver methods.
    pub via_pointer: bool,
}

/// Directed graph of embedding relationships.
#[derive(Debug, Default)]
pub struct EmbedGraph {
    graph: DiGraph<TypeHash, EmbedEdge>,
    nodes: FxHashMap<TypeHash, NodeIndex>,
}

impl EmbedGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the node for a type.
    pub fn ensure_node(&mut self, ty: TypeHash) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(&ty) {
            return idx;
        }
        let idx = self.graph.add_node(ty);
        self.nodes.insert(ty, idx);
        idx
    }

    /// Record that `owner` embeds `target` (the named base type of the
    /// embedded field).
    pub fn add_embed(&mut self, owner: TypeHash, target: TypeHash, edge: EmbedEdge) {
        let from = self.ensure_node(owner);
        let to = self.ensure_node(target);
        self.graph.add_edge(from, to, edge);
    }

    /// The embedded targets of a type, in field declaration order.
    ///
    /// Returns an empty list for types with no embedded fields (or no node).
    pub fn embeds_of(&self, ty: TypeHash) -> Vec<(EmbedEdge, TypeHash)> {
        let Some(&idx) = self.nodes.get(&ty) else {
            return Vec::new();
        };
        let mut edges: Vec<(EmbedEdge, TypeHash)> = self
            .graph
            .edges(idx)
            .map(|e| (*e.weight(), self.graph[e.target()]))
            .collect();
        edges.sort_by_key(|(edge, _)| edge.field_index);
        edges
    }

    /// Whether the type has any embedded fields.
    pub fn has_embeds(&self, ty: TypeHash) -> bool {
        self.nodes
            .get(&ty)
            .map(|&idx| self.graph.edges(idx).next().is_some())
            .unwrap_or(false)
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }
}
