//! This module turns a caller-supplied street graph into the indexed
//! routing structure and holds the batch configuration.

mod cache;
mod config;
mod indexer;
mod time_weights;

pub use cache::ConversionCache;
pub use config::{FailurePolicy, WalkTimeConfig};
pub use indexer::{DEFAULT_EDGE_WEIGHT, GraphIndexer};
pub use time_weights::{DEFAULT_TRAVEL_SPEED, add_time_weights, ensure_time_weights};
