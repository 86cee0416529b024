use std::path::Path;

use anyhow::{Context, Result};
use geo::Point;
use serde::Deserialize;
use tracing::info;
use walkshed_core::{Minutes, NodeId, StreetEdge, StreetGraph};

#[derive(Debug, Deserialize)]
struct EdgeRow {
    from: NodeId,
    to: NodeId,
    length: f64,
    #[serde(default)]
    time: Option<Minutes>,
}

#[derive(Debug, Deserialize)]
struct NodeRow {
    id: NodeId,
    x: f64,
    y: f64,
}

#[derive(Debug, Deserialize)]
struct IdRow {
    id: NodeId,
}

fn read_rows<T>(path: &Path) -> Result<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open file '{}'", path.display()))?;

    reader
        .deserialize()
        .enumerate()
        .map(|(line, row)| {
            row.with_context(|| format!("Invalid row {} in '{}'", line + 1, path.display()))
        })
        .collect()
}

/// Builds a street graph from an edge list and an optional node list
///
/// # Errors
///
/// Returns an error if a file cannot be read or holds a malformed row
pub fn read_street_graph(edges: &Path, nodes: Option<&Path>) -> Result<StreetGraph> {
    let edge_rows: Vec<EdgeRow> = read_rows(edges)?;
    let node_rows: Vec<NodeRow> = match nodes {
        Some(path) => read_rows(path)?,
        None => Vec::new(),
    };

    let mut streets = StreetGraph::with_capacity(node_rows.len(), edge_rows.len());
    for node in node_rows {
        streets.add_node(node.id, Point::new(node.x, node.y));
    }
    for edge in edge_rows {
        streets.add_edge(StreetEdge {
            from: edge.from,
            to: edge.to,
            length: edge.length,
            weight: edge.time,
        });
    }

    info!(
        "Loaded street graph with {} nodes and {} edges from {}",
        streets.node_count(),
        streets.edge_count(),
        edges.display()
    );
    Ok(streets)
}

/// Reads a single-column `id` file
///
/// # Errors
///
/// Returns an error if the file cannot be read or holds a malformed row
pub fn read_node_ids(path: &Path) -> Result<Vec<NodeId>> {
    let rows: Vec<IdRow> = read_rows(path)?;
    Ok(rows.into_iter().map(|row| row.id).collect())
}
