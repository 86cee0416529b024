use geo::Point;

use super::components::{StreetEdge, StreetNode};
use crate::{Minutes, NodeId};

/// Directed street multigraph keyed by external node IDs.
///
/// This is the hand-off format between the graph loading collaborator and
/// the routing core. Nothing here is validated; [`crate::GraphIndexer`]
/// deals with duplicates, dangling endpoints and missing weights.
#[derive(Debug, Clone, Default)]
pub struct StreetGraph {
    nodes: Vec<StreetNode>,
    edges: Vec<StreetEdge>,
}

impl StreetGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            edges: Vec::with_capacity(edges),
        }
    }

    pub fn add_node(&mut self, id: NodeId, geometry: Point<f64>) {
        self.nodes.push(StreetNode::new(id, geometry));
    }

    pub fn add_edge(&mut self, edge: StreetEdge) {
        self.edges.push(edge);
    }

    /// Adds an edge that already carries its traversal time
    pub fn add_timed_edge(&mut self, from: NodeId, to: NodeId, length: f64, weight: Minutes) {
        self.edges
            .push(StreetEdge::new(from, to, length).with_walking_time(weight));
    }

    pub fn nodes(&self) -> &[StreetNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[StreetEdge] {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> &mut [StreetEdge] {
        &mut self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether any edge already carries a traversal time
    pub fn has_time_weights(&self) -> bool {
        self.edges.iter().any(|edge| edge.weight.is_some())
    }
}

impl FromIterator<StreetEdge> for StreetGraph {
    fn from_iter<T: IntoIterator<Item = StreetEdge>>(iter: T) -> Self {
        Self {
            nodes: Vec::new(),
            edges: iter.into_iter().collect(),
        }
    }
}
