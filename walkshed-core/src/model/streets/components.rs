//! Street network components - nodes and edges

use geo::Point;

use crate::{Minutes, NodeId};

/// Street graph node
#[derive(Debug, Clone)]
pub struct StreetNode {
    /// External ID of the node
    pub id: NodeId,
    /// Node coordinates in the projected CRS of the source graph
    pub geometry: Point<f64>,
}

impl StreetNode {
    pub fn new(id: NodeId, geometry: Point<f64>) -> Self {
        Self { id, geometry }
    }
}

/// Street graph edge (street segment)
///
/// Several edges may connect the same ordered pair of nodes.
#[derive(Debug, Clone)]
pub struct StreetEdge {
    pub from: NodeId,
    pub to: NodeId,
    /// Segment length in meters
    pub length: f64,
    /// Traversal time in minutes, if already known
    pub weight: Option<Minutes>,
}

impl StreetEdge {
    pub fn new(from: NodeId, to: NodeId, length: f64) -> Self {
        Self {
            from,
            to,
            length,
            weight: None,
        }
    }

    #[must_use]
    pub fn with_walking_time(mut self, weight: Minutes) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn walking_time(&self) -> Option<Minutes> {
        self.weight
    }
}
