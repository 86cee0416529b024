//! Walk times from many origins to a fixed set of targets.
//!
//! A [`WalkTimeQuery`] resolves origin and target IDs once; it can then run
//! serially or be split into partitions executed on a thread pool.

mod aggregate;
mod dispatcher;
mod progress;
mod query;
mod record;
mod thresholds;

pub use aggregate::merge_partitions;
pub use dispatcher::{
    DispatchOptions, PartitionFailure, calculate_walk_times_parallel, default_worker_count,
    dispatch, dispatch_with_progress, effective_worker_count,
};
pub use progress::{NoProgress, ProgressObserver};
pub use query::{BatchDiagnostics, WalkTimeQuery, calculate_walk_times};
pub use record::{WalkTimeBatch, WalkTimeRecord};
pub use thresholds::{DEFAULT_TRIP_TIMES, TripTimeThresholds};
