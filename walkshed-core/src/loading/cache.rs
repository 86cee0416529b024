use std::sync::Arc;

use hashbrown::HashMap;
use log::info;

use crate::{Error, IndexedGraph};

/// Caller-owned store of indexed graphs keyed by an arbitrary name.
///
/// Graphs are handed out as `Arc`s, so every hit shares the same allocation.
#[derive(Debug, Default)]
pub struct ConversionCache {
    graphs: HashMap<String, Arc<IndexedGraph>>,
    hits: usize,
    misses: usize,
}

impl ConversionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Arc<IndexedGraph>> {
        self.graphs.get(key).cloned()
    }

    pub fn insert(&mut self, key: impl Into<String>, graph: IndexedGraph) -> Arc<IndexedGraph> {
        let graph = Arc::new(graph);
        self.graphs.insert(key.into(), Arc::clone(&graph));
        graph
    }

    /// Returns the entry for `key`, or builds, stores and returns it.
    ///
    /// # Errors
    ///
    /// Propagates the error of `build`; the cache is left untouched
    pub fn get_or_try_insert_with<F>(
        &mut self,
        key: &str,
        build: F,
    ) -> Result<Arc<IndexedGraph>, Error>
    where
        F: FnOnce() -> Result<IndexedGraph, Error>,
    {
        if let Some(graph) = self.graphs.get(key) {
            self.hits += 1;
            info!("Using cached indexed graph (key: {key})");
            return Ok(Arc::clone(graph));
        }

        self.misses += 1;
        let graph = self.insert(key, build()?);
        info!("Cached indexed graph (key: {key})");
        Ok(graph)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.graphs.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Arc<IndexedGraph>> {
        self.graphs.remove(key)
    }

    pub fn clear(&mut self) {
        self.graphs.clear();
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GraphIndexer, StreetGraph};

    fn tiny_graph() -> IndexedGraph {
        let mut streets = StreetGraph::new();
        streets.add_timed_edge(1, 2, 1.0, 1.0);
        GraphIndexer::default().build(&streets).unwrap()
    }

    #[test]
    fn entries_can_be_inspected_and_evicted() {
        let mut cache = ConversionCache::new();
        let stored = cache.insert("a", tiny_graph());

        assert!(cache.contains_key("a"));
        assert!(Arc::ptr_eq(&stored, &cache.get("a").unwrap()));
        assert!(cache.get("b").is_none());

        assert!(cache.remove("a").is_some());
        assert!(cache.is_empty());

        cache.insert("a", tiny_graph());
        cache.insert("b", tiny_graph());
        cache.clear();
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn distinct_keys_build_separately() {
        let mut cache = ConversionCache::new();
        let mut builds = 0;

        for key in ["x", "y", "x", "y", "x"] {
            cache
                .get_or_try_insert_with(key, || {
                    builds += 1;
                    Ok(tiny_graph())
                })
                .unwrap();
        }

        assert_eq!(builds, 2);
        assert_eq!(cache.misses(), 2);
        assert_eq!(cache.hits(), 3);
    }
}
