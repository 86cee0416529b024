//! Pedestrian street network as supplied by the caller

pub mod components;
pub mod network;

pub use components::{StreetEdge, StreetNode};
pub use network::StreetGraph;
