use std::any::Any;
use std::fmt;
use std::ops::Range;
use std::panic::{AssertUnwindSafe, catch_unwind};

use log::{debug, info, warn};
use rayon::ThreadPool;
use rayon::prelude::*;
use serde::Serialize;

use super::query::{PartitionOutput, ResolvedOrigin};
use super::{
    NoProgress, ProgressObserver, TripTimeThresholds, WalkTimeBatch, WalkTimeQuery, WalkTimeRecord,
    merge_partitions,
};
use crate::{Error, FailurePolicy, IndexedGraph, NodeId};

/// How a batch is spread over worker threads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOptions {
    /// `None` uses [`default_worker_count`], 0 or 1 runs serially
    pub worker_count: Option<usize>,
    pub failure_policy: FailurePolicy,
}

impl DispatchOptions {
    pub fn with_workers(worker_count: usize) -> Self {
        Self {
            worker_count: Some(worker_count),
            ..Self::default()
        }
    }
}

/// A partition of origins whose worker did not complete
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionFailure {
    pub partition: usize,
    /// Positions of the partition's origins in the resolved origin list
    pub origins: Range<usize>,
    /// External IDs of the partition's origins, for retries
    pub origin_ids: Vec<NodeId>,
    pub message: String,
}

impl fmt::Display for PartitionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Walk time partition {} (origins {}..{}) failed: {}",
            self.partition, self.origins.start, self.origins.end, self.message
        )
    }
}

/// Available cores minus one, but at least one
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map_or(1, std::num::NonZeroUsize::get)
        .saturating_sub(1)
        .max(1)
}

/// Worker count actually used for `origin_count` origins.
///
/// Never more workers than origins, never less than one.
pub fn effective_worker_count(requested: Option<usize>, origin_count: usize) -> usize {
    requested
        .unwrap_or_else(default_worker_count)
        .min(origin_count)
        .max(1)
}

#[derive(Debug, Clone, Copy)]
struct OriginPartition<'q> {
    index: usize,
    offset: usize,
    origins: &'q [ResolvedOrigin],
}

impl OriginPartition<'_> {
    fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.origins.len()
    }

    fn failure(&self, message: String) -> PartitionFailure {
        PartitionFailure {
            partition: self.index,
            origins: self.range(),
            origin_ids: self.origins.iter().map(|origin| origin.id).collect(),
            message,
        }
    }
}

/// Splits origins into `workers` contiguous chunks whose sizes differ by at
/// most one. Every origin lands in exactly one chunk.
fn partition_origins(origins: &[ResolvedOrigin], workers: usize) -> Vec<OriginPartition<'_>> {
    let workers = workers.clamp(1, origins.len().max(1));
    let base = origins.len() / workers;
    let remainder = origins.len() % workers;

    let mut partitions = Vec::with_capacity(workers);
    let mut offset = 0;
    for index in 0..workers {
        let len = base + usize::from(index < remainder);
        partitions.push(OriginPartition {
            index,
            offset,
            origins: &origins[offset..offset + len],
        });
        offset += len;
    }
    partitions
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}

fn run_partition<F>(
    partition: &OriginPartition<'_>,
    work: &F,
) -> Result<PartitionOutput, PartitionFailure>
where
    F: Fn(&[ResolvedOrigin]) -> PartitionOutput + Sync,
{
    debug!(
        "Partition {} starting with {} origins",
        partition.index,
        partition.origins.len()
    );
    catch_unwind(AssertUnwindSafe(|| work(partition.origins)))
        .map_err(|payload| partition.failure(panic_message(payload.as_ref())))
}

/// Runs every partition, on `pool` if given and on the calling thread
/// otherwise, then applies the failure policy in partition order
fn execute_partitions<F>(
    pool: Option<&ThreadPool>,
    partitions: &[OriginPartition<'_>],
    policy: FailurePolicy,
    work: F,
) -> Result<(Vec<PartitionOutput>, Vec<PartitionFailure>), Error>
where
    F: Fn(&[ResolvedOrigin]) -> PartitionOutput + Sync,
{
    let results: Vec<_> = match pool {
        Some(pool) => pool.install(|| {
            partitions
                .par_iter()
                .map(|partition| run_partition(partition, &work))
                .collect()
        }),
        None => partitions
            .iter()
            .map(|partition| run_partition(partition, &work))
            .collect(),
    };

    let mut outputs = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for result in results {
        match (result, policy) {
            (Ok(output), _) => outputs.push(output),
            (Err(failure), FailurePolicy::FailFast) => return Err(failure.into()),
            (Err(failure), FailurePolicy::Salvage) => {
                warn!("{failure}; keeping the other partitions");
                failures.push(failure);
            }
        }
    }
    Ok((outputs, failures))
}

/// Runs a resolved query, fanning its origins out over a dedicated pool.
///
/// Workers share the query, and through it the graph, targets and
/// thresholds; each produces its own record list and the lists are merged
/// once all of them are done. A single worker runs the whole origin list as
/// one partition on the calling thread.
///
/// # Errors
///
/// Returns [`Error::WorkerPool`] if the pool cannot be built, and under
/// [`FailurePolicy::FailFast`] [`Error::PartitionFailed`] for a failed
/// partition, discarding every other partition's records
pub fn dispatch(
    query: &WalkTimeQuery<'_>,
    options: &DispatchOptions,
) -> Result<WalkTimeBatch, Error> {
    dispatch_with_progress(query, options, &NoProgress)
}

/// [`dispatch`] that reports every finished origin to `progress`
///
/// # Errors
///
/// Same as [`dispatch`]
pub fn dispatch_with_progress(
    query: &WalkTimeQuery<'_>,
    options: &DispatchOptions,
    progress: &dyn ProgressObserver,
) -> Result<WalkTimeBatch, Error> {
    let workers = effective_worker_count(options.worker_count, query.origin_count());
    let partitions = partition_origins(query.origins(), workers);
    let work = |origins: &[ResolvedOrigin]| query.run_origins(origins, progress);

    let (outputs, failed_partitions) = if workers <= 1 {
        debug!("Running walk times serially");
        execute_partitions(None, &partitions, options.failure_policy, work)?
    } else {
        info!(
            "Calculating walk times with {workers} parallel workers over {} origins",
            query.origin_count()
        );
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("walkshed-worker-{index}"))
            .build()?;
        execute_partitions(Some(&pool), &partitions, options.failure_policy, work)?
    };

    let mut diagnostics = query.diagnostics().clone();
    diagnostics.failed_searches = outputs.iter().map(|output| output.failed_searches).sum();
    let records = merge_partitions(outputs.into_iter().map(|output| output.records).collect());
    info!("Calculated {} walk time records", records.len());

    Ok(WalkTimeBatch {
        records,
        diagnostics,
        failed_partitions,
    })
}

/// Parallel counterpart of [`super::calculate_walk_times`].
///
/// `worker_count` of `None` picks [`default_worker_count`]; 0 or 1 runs
/// serially. Partition failures abort the whole batch.
///
/// # Errors
///
/// Returns a configuration error if no origin is part of the graph, and
/// any [`dispatch`] error
pub fn calculate_walk_times_parallel(
    graph: &IndexedGraph,
    origin_ids: &[NodeId],
    target_ids: &[NodeId],
    thresholds: &TripTimeThresholds,
    worker_count: Option<usize>,
) -> Result<Vec<WalkTimeRecord>, Error> {
    let query = WalkTimeQuery::new(graph, origin_ids, target_ids, thresholds)?;
    let options = DispatchOptions {
        worker_count,
        failure_policy: FailurePolicy::FailFast,
    };
    Ok(dispatch(&query, &options)?.records)
}
