use std::sync::Arc;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use log::{info, warn};
use petgraph::graph::DiGraph;

use super::cache::ConversionCache;
use crate::{Error, IndexStats, IndexedGraph, Minutes, NodeId, NodeIndex, StreetGraph};

/// Weight substituted for edges without a usable walking time
pub const DEFAULT_EDGE_WEIGHT: Minutes = 1.0;

/// Builds [`IndexedGraph`]s from street graphs
#[derive(Debug, Clone, Copy)]
pub struct GraphIndexer {
    default_edge_weight: Minutes,
}

impl Default for GraphIndexer {
    fn default() -> Self {
        Self {
            default_edge_weight: DEFAULT_EDGE_WEIGHT,
        }
    }
}

impl GraphIndexer {
    /// # Errors
    ///
    /// Returns a configuration error if the weight is not a positive number
    pub fn new(default_edge_weight: Minutes) -> Result<Self, Error> {
        if !default_edge_weight.is_finite() || default_edge_weight <= 0.0 {
            return Err(Error::Configuration(format!(
                "Default edge weight must be a positive number, got {default_edge_weight}"
            )));
        }
        Ok(Self {
            default_edge_weight,
        })
    }

    pub fn default_edge_weight(&self) -> Minutes {
        self.default_edge_weight
    }

    /// Renumbers the street graph into a dense index space.
    ///
    /// Indices follow first-seen order: the node list first, then edge
    /// endpoints missing from it. Every edge is kept, parallel ones included.
    /// Missing, negative or non-finite edge times are replaced by the default
    /// weight and counted in [`IndexStats::defaulted_edges`].
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the graph has no nodes
    pub fn build(&self, streets: &StreetGraph) -> Result<IndexedGraph, Error> {
        info!(
            "Indexing street graph (nodes: {}, edges: {})",
            streets.node_count(),
            streets.edge_count()
        );

        let mut graph: DiGraph<NodeId, Minutes> =
            DiGraph::with_capacity(streets.node_count(), streets.edge_count());
        let mut id_to_index: HashMap<NodeId, NodeIndex> =
            HashMap::with_capacity(streets.node_count());
        let mut stats = IndexStats::default();

        for node in streets.nodes() {
            match id_to_index.entry(node.id) {
                Entry::Vacant(entry) => {
                    entry.insert(graph.add_node(node.id));
                }
                Entry::Occupied(_) => stats.duplicate_nodes += 1,
            }
        }

        for edge in streets.edges() {
            let from = Self::endpoint(&mut graph, &mut id_to_index, &mut stats, edge.from);
            let to = Self::endpoint(&mut graph, &mut id_to_index, &mut stats, edge.to);

            let weight = match edge.weight {
                Some(weight) if weight.is_finite() && weight >= 0.0 => weight,
                _ => {
                    stats.defaulted_edges += 1;
                    self.default_edge_weight
                }
            };
            graph.add_edge(from, to, weight);
        }

        if graph.node_count() == 0 {
            return Err(Error::Configuration(
                "Street graph has no nodes".to_string(),
            ));
        }

        stats.nodes = graph.node_count();
        stats.edges = graph.edge_count();
        Self::report(&stats, self.default_edge_weight);

        Ok(IndexedGraph::from_parts(graph, id_to_index, stats))
    }

    /// Returns the graph cached under `key`, building and caching it on a miss.
    ///
    /// # Errors
    ///
    /// Propagates [`GraphIndexer::build`] errors; nothing is cached then
    pub fn get_or_build(
        &self,
        streets: &StreetGraph,
        key: &str,
        cache: &mut ConversionCache,
    ) -> Result<Arc<IndexedGraph>, Error> {
        cache.get_or_try_insert_with(key, || self.build(streets))
    }

    fn endpoint(
        graph: &mut DiGraph<NodeId, Minutes>,
        id_to_index: &mut HashMap<NodeId, NodeIndex>,
        stats: &mut IndexStats,
        id: NodeId,
    ) -> NodeIndex {
        *id_to_index.entry(id).or_insert_with(|| {
            stats.implicit_nodes += 1;
            graph.add_node(id)
        })
    }

    fn report(stats: &IndexStats, default_edge_weight: Minutes) {
        if stats.defaulted_edges > 0 {
            warn!(
                "{} edges had no usable time weight (used default weight {default_edge_weight})",
                stats.defaulted_edges
            );
        }
        if stats.duplicate_nodes > 0 {
            warn!("Ignored {} duplicate node IDs", stats.duplicate_nodes);
        }
        if stats.implicit_nodes > 0 {
            warn!(
                "{} nodes were only referenced by edges and were added implicitly",
                stats.implicit_nodes
            );
        }
        info!(
            "Indexed graph: {} nodes, {} edges",
            stats.nodes, stats.edges
        );
    }
}

#[cfg(test)]
mod tests {
    use geo::Point;

    use super::*;
    use crate::StreetEdge;

    fn sample_streets() -> StreetGraph {
        let mut streets = StreetGraph::new();
        for (id, x) in [(1, 0.0), (2, 1.0), (3, 2.0), (4, 3.0)] {
            streets.add_node(id, Point::new(x, 0.0));
        }
        streets.add_timed_edge(1, 2, 75.0, 1.0);
        streets.add_timed_edge(2, 3, 75.0, 1.0);
        streets.add_timed_edge(2, 4, 105.0, 1.4);
        streets.add_timed_edge(4, 3, 105.0, 1.4);
        streets
    }

    #[test]
    fn indices_follow_node_order() {
        let graph = GraphIndexer::default().build(&sample_streets()).unwrap();

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 4);
        for (position, id) in [1, 2, 3, 4].into_iter().enumerate() {
            assert_eq!(graph.index_of(id), Some(NodeIndex::new(position)));
        }
        assert_eq!(graph.stats().defaulted_edges, 0);
    }

    #[test]
    fn missing_weights_use_default() {
        let mut streets = sample_streets();
        streets.add_edge(StreetEdge::new(3, 1, 10.0));
        streets.add_timed_edge(3, 2, 10.0, -1.0);
        streets.add_timed_edge(3, 4, 10.0, f64::NAN);

        let graph = GraphIndexer::new(2.0).unwrap().build(&streets).unwrap();

        assert_eq!(graph.edge_count(), 7);
        assert_eq!(graph.stats().defaulted_edges, 3);
        let from = graph.index_of(3).unwrap();
        assert!(graph.successors(from).all(|(_, weight)| weight == 2.0));
    }

    #[test]
    fn dangling_endpoints_and_duplicates_are_counted() {
        let mut streets = sample_streets();
        streets.add_node(2, Point::new(9.0, 9.0));
        streets.add_timed_edge(4, 5, 1.0, 1.0);
        streets.add_timed_edge(6, 5, 1.0, 1.0);

        let graph = GraphIndexer::default().build(&streets).unwrap();

        assert_eq!(graph.node_count(), 6);
        assert_eq!(graph.stats().duplicate_nodes, 1);
        assert_eq!(graph.stats().implicit_nodes, 2);
        assert_eq!(graph.index_of(5), Some(NodeIndex::new(4)));
        assert_eq!(graph.index_of(6), Some(NodeIndex::new(5)));
    }

    #[test]
    fn empty_graph_is_a_configuration_error() {
        let result = GraphIndexer::default().build(&StreetGraph::new());
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn edge_only_graph_is_indexed() {
        let streets: StreetGraph = [StreetEdge::new(7, 8, 1.0).with_walking_time(0.5)]
            .into_iter()
            .collect();
        let graph = GraphIndexer::default().build(&streets).unwrap();
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn invalid_default_weight_is_rejected() {
        for weight in [0.0, -1.0, f64::NAN] {
            assert!(GraphIndexer::new(weight).is_err());
        }
    }

    #[test]
    fn cached_graph_is_reused() {
        let indexer = GraphIndexer::default();
        let mut cache = ConversionCache::new();

        let first = indexer
            .get_or_build(&sample_streets(), "region", &mut cache)
            .unwrap();
        // A different graph under the same key must not trigger a rebuild
        let second = indexer
            .get_or_build(&StreetGraph::new(), "region", &mut cache)
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn failed_build_is_not_cached() {
        let indexer = GraphIndexer::default();
        let mut cache = ConversionCache::new();

        assert!(
            indexer
                .get_or_build(&StreetGraph::new(), "empty", &mut cache)
                .is_err()
        );
        assert!(cache.is_empty());
    }
}
