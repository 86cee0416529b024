use hashbrown::HashSet;
use itertools::Itertools;
use log::{debug, info, warn};
use serde::Serialize;

use super::{NoProgress, ProgressObserver, TripTimeThresholds, WalkTimeBatch, WalkTimeRecord};
use crate::{Error, IndexedGraph, NodeId, NodeIndex, bounded_dijkstra};

/// Counters describing how the requested IDs mapped onto the graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchDiagnostics {
    pub origins_requested: usize,
    pub origins_resolved: usize,
    pub origins_missing: usize,
    pub origins_duplicate: usize,
    pub targets_requested: usize,
    pub targets_resolved: usize,
    pub targets_missing: usize,
    pub targets_duplicate: usize,
    /// Searches that failed and were counted as reaching nothing
    pub failed_searches: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResolvedOrigin {
    pub(crate) id: NodeId,
    pub(crate) index: NodeIndex,
}

#[derive(Debug, Default)]
pub(crate) struct PartitionOutput {
    pub(crate) records: Vec<WalkTimeRecord>,
    pub(crate) failed_searches: usize,
}

/// A batch of origins and targets resolved against one [`IndexedGraph`].
///
/// The query only borrows the graph and the thresholds, and is itself
/// read-only once built, so a single instance serves every worker.
#[derive(Debug)]
pub struct WalkTimeQuery<'a> {
    graph: &'a IndexedGraph,
    thresholds: &'a TripTimeThresholds,
    origins: Vec<ResolvedOrigin>,
    targets: Vec<(NodeIndex, NodeId)>,
    diagnostics: BatchDiagnostics,
}

struct Resolution {
    resolved: Vec<(NodeId, NodeIndex)>,
    missing: Vec<NodeId>,
    duplicate: usize,
}

fn resolve(graph: &IndexedGraph, ids: &[NodeId]) -> Resolution {
    let mut seen = HashSet::with_capacity(ids.len());
    let mut resolution = Resolution {
        resolved: Vec::with_capacity(ids.len()),
        missing: Vec::new(),
        duplicate: 0,
    };

    for &id in ids {
        if !seen.insert(id) {
            resolution.duplicate += 1;
            continue;
        }
        match graph.index_of(id) {
            Some(index) => resolution.resolved.push((id, index)),
            None => resolution.missing.push(id),
        }
    }

    resolution
}

impl<'a> WalkTimeQuery<'a> {
    /// Resolves origin and target IDs against the graph.
    ///
    /// IDs missing from the graph are skipped, repeated IDs are collapsed
    /// to their first occurrence.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `origin_ids` is empty or none of
    /// its IDs is part of the graph
    pub fn new(
        graph: &'a IndexedGraph,
        origin_ids: &[NodeId],
        target_ids: &[NodeId],
        thresholds: &'a TripTimeThresholds,
    ) -> Result<Self, Error> {
        if origin_ids.is_empty() {
            return Err(Error::Configuration("Origin set is empty".to_string()));
        }

        let origins = resolve(graph, origin_ids);
        if origins.resolved.is_empty() {
            return Err(Error::Configuration(format!(
                "None of the {} origins is part of the street graph",
                origin_ids.len()
            )));
        }
        if !origins.missing.is_empty() {
            warn!(
                "Skipping {} origins not found in graph: [{}]",
                origins.missing.len(),
                origins.missing.iter().take(10).join(", ")
            );
        }

        let targets = resolve(graph, target_ids);
        if !targets.missing.is_empty() {
            warn!(
                "Skipping {} targets not found in graph: [{}]",
                targets.missing.len(),
                targets.missing.iter().take(10).join(", ")
            );
        }
        if targets.resolved.is_empty() {
            warn!("No target is part of the street graph, the batch will be empty");
        }

        let diagnostics = BatchDiagnostics {
            origins_requested: origin_ids.len(),
            origins_resolved: origins.resolved.len(),
            origins_missing: origins.missing.len(),
            origins_duplicate: origins.duplicate,
            targets_requested: target_ids.len(),
            targets_resolved: targets.resolved.len(),
            targets_missing: targets.missing.len(),
            targets_duplicate: targets.duplicate,
            failed_searches: 0,
        };

        info!(
            "Calculating walk times for {} origins and {} targets",
            diagnostics.origins_resolved, diagnostics.targets_resolved
        );
        info!("Trip times: {:?} minutes", thresholds.as_slice());

        Ok(Self {
            graph,
            thresholds,
            origins: origins
                .resolved
                .into_iter()
                .map(|(id, index)| ResolvedOrigin { id, index })
                .collect(),
            targets: targets
                .resolved
                .into_iter()
                .map(|(id, index)| (index, id))
                .collect(),
            diagnostics,
        })
    }

    pub fn diagnostics(&self) -> &BatchDiagnostics {
        &self.diagnostics
    }

    /// Number of distinct origins present in the graph
    pub fn origin_count(&self) -> usize {
        self.origins.len()
    }

    /// Number of distinct targets present in the graph
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    pub(crate) fn origins(&self) -> &[ResolvedOrigin] {
        &self.origins
    }

    /// Runs every origin on the calling thread
    pub fn run_serial(&self) -> WalkTimeBatch {
        let output = self.run_origins(&self.origins, &NoProgress);

        let mut diagnostics = self.diagnostics.clone();
        diagnostics.failed_searches = output.failed_searches;
        info!("Calculated {} walk time records", output.records.len());

        WalkTimeBatch {
            records: output.records,
            diagnostics,
            failed_partitions: Vec::new(),
        }
    }

    pub(crate) fn run_origins(
        &self,
        origins: &[ResolvedOrigin],
        progress: &dyn ProgressObserver,
    ) -> PartitionOutput {
        let mut output = PartitionOutput::default();

        for origin in origins {
            match self.walk_times_from(*origin) {
                Ok(records) => output.records.extend(records),
                Err(e) => {
                    warn!("Error calculating walk times from node {}: {e}", origin.id);
                    output.failed_searches += 1;
                }
            }
            progress.origin_done();
        }

        debug!(
            "Processed {} origins, {} records",
            origins.len(),
            output.records.len()
        );
        output
    }

    /// One bounded search, then every reached target goes into its bucket
    fn walk_times_from(&self, origin: ResolvedOrigin) -> Result<Vec<WalkTimeRecord>, Error> {
        let distances = bounded_dijkstra(self.graph, origin.index, self.thresholds.max())?;

        Ok(self
            .targets
            .iter()
            .filter_map(|&(target_index, target_id)| {
                distances
                    .get(&target_index)
                    .and_then(|&distance| self.thresholds.bucket(distance))
                    .map(|threshold| WalkTimeRecord::new(origin.id, target_id, threshold))
            })
            .collect())
    }
}

/// Walk times from every origin to every target, computed serially.
///
/// For each origin in the graph one bounded search runs with the largest
/// threshold as bound; each reached target yields one record carrying the
/// smallest threshold its walking time fits into.
///
/// # Errors
///
/// Returns a configuration error if no origin is part of the graph
pub fn calculate_walk_times(
    graph: &IndexedGraph,
    origin_ids: &[NodeId],
    target_ids: &[NodeId],
    thresholds: &TripTimeThresholds,
) -> Result<Vec<WalkTimeRecord>, Error> {
    let query = WalkTimeQuery::new(graph, origin_ids, target_ids, thresholds)?;
    Ok(query.run_serial().records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GraphIndexer, StreetGraph};

    fn sample_graph() -> IndexedGraph {
        let mut streets = StreetGraph::new();
        streets.add_timed_edge(1, 2, 75.0, 1.0);
        streets.add_timed_edge(2, 3, 75.0, 1.0);
        streets.add_timed_edge(2, 4, 105.0, 1.4);
        streets.add_timed_edge(4, 3, 105.0, 1.4);
        GraphIndexer::default().build(&streets).unwrap()
    }

    fn thresholds(values: &[f64]) -> TripTimeThresholds {
        TripTimeThresholds::try_from(values).unwrap()
    }

    fn sorted(mut records: Vec<WalkTimeRecord>) -> Vec<WalkTimeRecord> {
        records.sort_by_key(|record| (record.origin_id, record.target_id));
        records
    }

    #[test]
    fn buckets_reachable_targets() {
        let graph = sample_graph();
        let records =
            calculate_walk_times(&graph, &[1], &[3, 4], &thresholds(&[5.0, 10.0, 15.0])).unwrap();

        assert_eq!(
            sorted(records),
            vec![
                WalkTimeRecord::new(1, 3, 5.0),
                WalkTimeRecord::new(1, 4, 5.0),
            ]
        );
    }

    #[test]
    fn targets_beyond_largest_threshold_are_dropped() {
        let graph = sample_graph();
        // 1 -> 3 takes 2.0, 1 -> 4 takes 2.4
        let records =
            calculate_walk_times(&graph, &[1], &[3, 4], &thresholds(&[1.0, 2.0, 2.2])).unwrap();

        assert_eq!(records, vec![WalkTimeRecord::new(1, 3, 2.0)]);
    }

    #[test]
    fn origin_is_reachable_from_itself() {
        let graph = sample_graph();
        let records = calculate_walk_times(&graph, &[2], &[2, 1], &thresholds(&[5.0])).unwrap();

        assert_eq!(records, vec![WalkTimeRecord::new(2, 2, 5.0)]);
    }

    #[test]
    fn missing_origin_is_skipped() {
        let graph = sample_graph();
        let trip_times = thresholds(&[5.0, 10.0]);
        let query = WalkTimeQuery::new(&graph, &[999, 1], &[3, 777], &trip_times).unwrap();

        assert_eq!(query.origin_count(), 1);
        assert_eq!(query.diagnostics().origins_missing, 1);
        assert_eq!(query.diagnostics().targets_missing, 1);

        let batch = query.run_serial();
        assert_eq!(batch.records, vec![WalkTimeRecord::new(1, 3, 5.0)]);
        assert!(batch.is_complete());
    }

    #[test]
    fn empty_or_absent_origins_are_configuration_errors() {
        let graph = sample_graph();
        let trip_times = thresholds(&[5.0]);

        assert!(matches!(
            WalkTimeQuery::new(&graph, &[], &[3], &trip_times),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            calculate_walk_times(&graph, &[998, 999], &[3], &trip_times),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn repeated_ids_yield_one_record_per_pair() {
        let graph = sample_graph();
        let trip_times = thresholds(&[5.0]);
        let query = WalkTimeQuery::new(&graph, &[1, 1, 1], &[3, 3], &trip_times).unwrap();

        assert_eq!(query.diagnostics().origins_duplicate, 2);
        assert_eq!(query.diagnostics().targets_duplicate, 1);
        assert_eq!(
            query.run_serial().records,
            vec![WalkTimeRecord::new(1, 3, 5.0)]
        );
    }

    #[test]
    fn no_targets_means_no_records() {
        let graph = sample_graph();
        let records = calculate_walk_times(&graph, &[1], &[], &thresholds(&[5.0])).unwrap();
        assert!(records.is_empty());
    }
}
