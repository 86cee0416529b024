// Re-export key components
pub use crate::loading::{
    ConversionCache, DEFAULT_EDGE_WEIGHT, DEFAULT_TRAVEL_SPEED, FailurePolicy, GraphIndexer,
    WalkTimeConfig, add_time_weights, ensure_time_weights,
};
pub use crate::model::{IndexStats, IndexedGraph, StreetEdge, StreetGraph, StreetNode};
pub use crate::routing::dijkstra::bounded_dijkstra;
pub use crate::walk_times::{
    BatchDiagnostics, DEFAULT_TRIP_TIMES, DispatchOptions, NoProgress, PartitionFailure,
    ProgressObserver, TripTimeThresholds, WalkTimeBatch, WalkTimeQuery, WalkTimeRecord,
    calculate_walk_times, calculate_walk_times_parallel, merge_partitions,
};

// Core types
pub use crate::Error;
pub use crate::Minutes;
pub use crate::NodeId;
pub use crate::NodeIndex;
