use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};
use walkshed_core::prelude::*;
use walkshed_core::walk_times::{dispatch_with_progress, effective_worker_count};

use crate::config::AppConfig;
use crate::input::{read_node_ids, read_street_graph};
use crate::output::{write_records, write_summary};
use crate::progress::OriginProgress;

/// What a run did, written next to the records when requested
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub graph: IndexStats,
    pub batch: BatchDiagnostics,
    pub workers: usize,
    pub records: usize,
    pub failed_partitions: Vec<PartitionFailure>,
    pub records_path: PathBuf,
    pub elapsed_secs: f64,
}

/// Loads the street graph, adding walking times from lengths when the
/// input carries none, and indexes it
///
/// # Errors
///
/// Returns an error if the inputs cannot be read or the graph is empty
pub fn inspect_graph(config: &AppConfig) -> Result<IndexedGraph> {
    let mut streets = read_street_graph(&config.input.edges, config.input.nodes.as_deref())?;
    ensure_time_weights(&mut streets, config.walk_times.travel_speed_kmh)?;

    let graph = config
        .walk_times
        .indexer()?
        .build(&streets)
        .context("Failed to index street graph")?;
    Ok(graph)
}

/// Runs one walk time batch as described by `config` and writes its outputs
///
/// # Errors
///
/// Returns an error if an input cannot be read, the configuration is
/// invalid, the batch fails or an output cannot be written
pub fn run(config: &AppConfig) -> Result<RunSummary> {
    let started = Instant::now();

    let thresholds = config.walk_times.trip_times()?;
    let graph = inspect_graph(config)?;
    let origins = read_node_ids(&config.input.origins)?;
    let targets = read_node_ids(&config.input.targets)?;

    let query = WalkTimeQuery::new(&graph, &origins, &targets, &thresholds)
        .context("Failed to prepare walk time batch")?;
    let options = config.walk_times.dispatch_options();
    let workers = effective_worker_count(options.worker_count, query.origin_count());

    let progress = if config.output.progress {
        OriginProgress::new(query.origin_count())
    } else {
        OriginProgress::hidden(query.origin_count())
    };
    let batch = dispatch_with_progress(&query, &options, &progress);
    progress.finish();
    let batch = batch.context("Walk time batch failed")?;
    for failure in &batch.failed_partitions {
        warn!("{failure}");
    }

    write_records(&config.output.records, &batch.records)?;

    let summary = RunSummary {
        graph: *graph.stats(),
        batch: batch.diagnostics,
        workers,
        records: batch.records.len(),
        failed_partitions: batch.failed_partitions,
        records_path: config.output.records.clone(),
        elapsed_secs: started.elapsed().as_secs_f64(),
    };
    if let Some(path) = &config.output.summary {
        write_summary(path, &summary)?;
    }

    info!(
        "Finished in {:.2}s: {} records from {} origins to {} targets",
        summary.elapsed_secs,
        summary.records,
        query.origin_count(),
        query.target_count()
    );
    Ok(summary)
}
