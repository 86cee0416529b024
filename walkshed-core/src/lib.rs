//! Walk-time reachability engine.
//!
//! Indexes a time-weighted street multigraph once, then runs one bounded
//! Dijkstra per origin and buckets every reachable target into the smallest
//! trip-time threshold it satisfies. Origins can be fanned out over a thread
//! pool while the indexed graph is shared read-only between workers.

pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;
pub mod walk_times;

pub use error::Error;
pub use loading::{
    ConversionCache, FailurePolicy, GraphIndexer, WalkTimeConfig, add_time_weights,
    ensure_time_weights,
};
pub use model::{IndexStats, IndexedGraph, StreetEdge, StreetGraph, StreetNode};
pub use routing::dijkstra::bounded_dijkstra;
pub use walk_times::{
    BatchDiagnostics, DispatchOptions, NoProgress, PartitionFailure, ProgressObserver,
    TripTimeThresholds, WalkTimeBatch, WalkTimeQuery, WalkTimeRecord, calculate_walk_times,
    calculate_walk_times_parallel, merge_partitions,
};

/// External node identifier as assigned by the street network source
pub type NodeId = i64;

/// Travel time in minutes
pub type Minutes = f64;

/// Dense node index inside an [`IndexedGraph`]
pub type NodeIndex = petgraph::graph::NodeIndex;
