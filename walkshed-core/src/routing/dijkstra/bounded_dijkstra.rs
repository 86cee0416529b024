use std::collections::BinaryHeap;

use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use super::state::State;
use crate::{Error, IndexedGraph, Minutes, NodeIndex};

/// Dijkstra's algorithm cut off at `max_distance`.
///
/// Returns the exact shortest walking time to every node whose distance
/// from `source` is at most `max_distance`, and nothing else. The heap yields
/// costs in non-decreasing order, so the search stops at the first entry past
/// the bound. Parallel edges are all relaxed.
///
/// # Errors
///
/// Returns [`Error::InvalidNodeIndex`] if `source` is not part of the graph
pub fn bounded_dijkstra(
    graph: &IndexedGraph,
    source: NodeIndex,
    max_distance: Minutes,
) -> Result<HashMap<NodeIndex, Minutes>, Error> {
    if !graph.contains_index(source) {
        return Err(Error::InvalidNodeIndex(source.index()));
    }

    let mut distances: HashMap<NodeIndex, Minutes> = HashMap::new();
    if max_distance.is_nan() || max_distance < 0.0 {
        return Ok(distances);
    }

    let mut visited = FixedBitSet::with_capacity(graph.node_count());
    let mut heap = BinaryHeap::new();

    heap.push(State {
        cost: 0.0,
        node: source,
    });
    distances.insert(source, 0.0);

    while let Some(State { cost, node }) = heap.pop() {
        if visited.contains(node.index()) {
            continue;
        }

        if cost > max_distance {
            break;
        }

        visited.insert(node.index());

        for (next, weight) in graph.successors(node) {
            let next_cost = cost + weight;
            if next_cost > max_distance {
                continue;
            }

            match distances.entry(next) {
                Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    heap.push(State {
                        cost: next_cost,
                        node: next,
                    });
                }
                Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        heap.push(State {
                            cost: next_cost,
                            node: next,
                        });
                    }
                }
            }
        }
    }

    log::trace!(
        "Bounded Dijkstra from node {}: reached {} nodes (max_dist={max_distance:.1})",
        source.index(),
        distances.len()
    );

    Ok(distances)
}
