//! Multi-source longest paths and the critical path of a DAG.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, instrument};

use super::reconstruct;
use crate::error::GraphError;
use crate::graph::Graph;
use crate::metrics::PathMetrics;

/// Longest distances from any entry vertex, plus the critical path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LongestPaths {
    /// `None` where no path has been established.
    pub dist: Vec<Option<i64>>,
    pub parent: Vec<Option<usize>>,
    /// Entry vertex first, end vertex last. Empty for an empty graph.
    pub critical_path: Vec<usize>,
    /// Maximum over all established distances.
    pub critical_length: Option<i64>,
    pub metrics: PathMetrics,
}

impl LongestPaths {
    #[must_use]
    pub fn distance(&self, vertex: usize) -> Option<i64> {
        self.dist.get(vertex).copied().flatten()
    }

    /// Longest path ending at `vertex`, entry vertex first.
    #[must_use]
    pub fn path_to(&self, vertex: usize) -> Vec<usize> {
        reconstruct(&self.dist, &self.parent, vertex)
    }

    /// Last vertex of the critical path.
    #[must_use]
    pub fn critical_end(&self) -> Option<usize> {
        self.critical_path.last().copied()
    }
}

/// Maximizing relaxation over `order`.
///
/// Every vertex without an incoming edge (a self-loop counts as incoming)
/// starts at distance 0. The critical end is the first vertex, scanning
/// ascending, whose distance is strictly greater than all before it.
///
/// # Errors
///
/// Returns [`GraphError::VertexOutOfRange`] if any entry of `order` is not
/// a vertex of `graph`.
#[instrument(name = "paths.longest", skip_all, fields(vertices = graph.vertex_count()))]
pub fn longest_paths(graph: &Graph, order: &[usize]) -> Result<LongestPaths, GraphError> {
    let n = graph.vertex_count();
    if let Some(&bad) = order.iter().find(|&&v| v >= n) {
        return Err(GraphError::VertexOutOfRange {
            vertex: bad,
            vertex_count: n,
        });
    }

    let started = Instant::now();
    let mut dist: Vec<Option<i64>> = graph
        .in_degrees()
        .into_iter()
        .map(|degree| (degree == 0).then_some(0))
        .collect();
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut relaxations = 0u64;

    for &u in order {
        let Some(du) = dist[u] else { continue };
        for edge in graph.neighbors(u) {
            relaxations += 1;
            let candidate = du.saturating_add(edge.weight);
            if dist[edge.to].is_none_or(|dv| candidate > dv) {
                dist[edge.to] = Some(candidate);
                parent[edge.to] = Some(u);
            }
        }
    }

    let mut end: Option<(usize, i64)> = None;
    for (v, d) in dist.iter().enumerate() {
        if let Some(d) = *d
            && end.is_none_or(|(_, best)| d > best)
        {
            end = Some((v, d));
        }
    }

    let critical_path = end.map_or_else(Vec::new, |(v, _)| reconstruct(&dist, &parent, v));
    let critical_length = end.map(|(_, d)| d);
    let metrics = PathMetrics {
        relaxations,
        elapsed: started.elapsed(),
    };
    debug!(
        relaxations,
        critical_length = ?critical_length,
        path_len = critical_path.len(),
        "longest paths finished"
    );

    Ok(LongestPaths {
        dist,
        parent,
        critical_path,
        critical_length,
        metrics,
    })
}
