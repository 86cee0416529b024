//! Data model for walk-time routing
//!
//! `streets` holds the graph as delivered by the caller, `indexed` the dense
//! routing structure derived from it.

pub mod indexed;
pub mod streets;

pub use indexed::{IndexStats, IndexedGraph};
pub use streets::{StreetEdge, StreetGraph, StreetNode};
