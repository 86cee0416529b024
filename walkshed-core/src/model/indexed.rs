//! Dense, immutable routing graph derived from a [`StreetGraph`](super::StreetGraph).

use hashbrown::HashMap;
use itertools::Itertools;
use petgraph::graph::DiGraph;
use petgraph::visit::EdgeRef;
use serde::Serialize;

use crate::{Minutes, NodeId, NodeIndex};

/// Counters collected while indexing a street graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub nodes: usize,
    pub edges: usize,
    /// Edges without a usable time weight that received the default weight
    pub defaulted_edges: usize,
    /// Node list entries whose ID had already been indexed
    pub duplicate_nodes: usize,
    /// Nodes only known as edge endpoints
    pub implicit_nodes: usize,
}

/// Street graph with nodes renumbered into `[0, N)`.
///
/// Node weights hold the external ID (index -> ID), `id_to_index` holds the
/// inverse. Parallel edges are kept as separate adjacency entries. The
/// structure is never mutated after construction, so a single instance can be
/// shared by any number of concurrent searches.
#[derive(Debug, Clone)]
pub struct IndexedGraph {
    graph: DiGraph<NodeId, Minutes>,
    id_to_index: HashMap<NodeId, NodeIndex>,
    stats: IndexStats,
}

impl IndexedGraph {
    pub(crate) fn from_parts(
        graph: DiGraph<NodeId, Minutes>,
        id_to_index: HashMap<NodeId, NodeIndex>,
        stats: IndexStats,
    ) -> Self {
        debug_assert_eq!(graph.node_count(), id_to_index.len());
        Self {
            graph,
            id_to_index,
            stats,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    /// Underlying petgraph structure, read-only
    pub fn as_petgraph(&self) -> &DiGraph<NodeId, Minutes> {
        &self.graph
    }

    pub fn contains_index(&self, index: NodeIndex) -> bool {
        index.index() < self.graph.node_count()
    }

    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.id_to_index.get(&id).copied()
    }

    pub fn id_of(&self, index: NodeIndex) -> Option<NodeId> {
        self.graph.node_weight(index).copied()
    }

    /// Outgoing `(successor, weight)` pairs of `index`, one per edge
    pub fn successors(&self, index: NodeIndex) -> impl Iterator<Item = (NodeIndex, Minutes)> + '_ {
        self.graph
            .edges(index)
            .map(|edge| (edge.target(), *edge.weight()))
    }

    /// Translates external IDs to indices, skipping IDs that are not in the graph.
    ///
    /// Returns the indices found and the IDs that were missing.
    pub fn indices_of(&self, ids: &[NodeId]) -> (Vec<NodeIndex>, Vec<NodeId>) {
        let mut indices = Vec::with_capacity(ids.len());
        let mut missing = Vec::new();

        for &id in ids {
            match self.index_of(id) {
                Some(index) => indices.push(index),
                None => missing.push(id),
            }
        }

        if !missing.is_empty() {
            log::warn!(
                "Could not find indices for {} nodes: [{}]",
                missing.len(),
                missing.iter().take(10).join(", ")
            );
        }

        (indices, missing)
    }

    /// Translates indices back to external IDs, skipping out-of-range indices.
    pub fn ids_of(&self, indices: &[NodeIndex]) -> (Vec<NodeId>, Vec<NodeIndex>) {
        let mut ids = Vec::with_capacity(indices.len());
        let mut missing = Vec::new();

        for &index in indices {
            match self.id_of(index) {
                Some(id) => ids.push(id),
                None => missing.push(index),
            }
        }

        if !missing.is_empty() {
            log::warn!(
                "Could not find node IDs for {} indices: [{}]",
                missing.len(),
                missing
                    .iter()
                    .take(10)
                    .map(|index| index.index())
                    .join(", ")
            );
        }

        (ids, missing)
    }
}
