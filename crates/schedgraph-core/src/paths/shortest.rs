//! Single-source shortest paths on a DAG.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, instrument};

use super::reconstruct;
use crate::error::GraphError;
use crate::graph::Graph;
use crate::metrics::PathMetrics;

/// Shortest distances and predecessors from one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortestPaths {
    pub source: usize,
    /// `None` where the vertex is unreachable from `source`.
    pub dist: Vec<Option<i64>>,
    pub parent: Vec<Option<usize>>,
    pub metrics: PathMetrics,
}

impl ShortestPaths {
    #[must_use]
    pub fn distance(&self, vertex: usize) -> Option<i64> {
        self.dist.get(vertex).copied().flatten()
    }

    /// Path from the source to `vertex`, source first. Empty when
    /// `vertex` is unreachable.
    #[must_use]
    pub fn path_to(&self, vertex: usize) -> Vec<usize> {
        reconstruct(&self.dist, &self.parent, vertex)
    }

    /// Number of vertices with a finite distance, the source included.
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        self.dist.iter().filter(|d| d.is_some()).count()
    }
}

/// Relax edges in `order` starting from `source` at distance 0.
///
/// Only vertices already reached relax their edges; every relaxation
/// attempt counts toward the metric whether or not it improves anything.
/// On equal distances the first predecessor found is kept.
///
/// # Errors
///
/// Returns [`GraphError::VertexOutOfRange`] if `source` or any entry of
/// `order` is not a vertex of `graph`.
#[instrument(name = "paths.shortest", skip_all, fields(source = source, vertices = graph.vertex_count()))]
pub fn shortest_paths(
    graph: &Graph,
    source: usize,
    order: &[usize],
) -> Result<ShortestPaths, GraphError> {
    let n = graph.vertex_count();
    let out_of_range = |vertex| GraphError::VertexOutOfRange {
        vertex,
        vertex_count: n,
    };
    if source >= n {
        return Err(out_of_range(source));
    }
    if let Some(&bad) = order.iter().find(|&&v| v >= n) {
        return Err(out_of_range(bad));
    }

    let started = Instant::now();
    let mut dist: Vec<Option<i64>> = vec![None; n];
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut relaxations = 0u64;
    dist[source] = Some(0);

    for &u in order {
        let Some(du) = dist[u] else { continue };
        for edge in graph.neighbors(u) {
            relaxations += 1;
            let candidate = du.saturating_add(edge.weight);
            if dist[edge.to].is_none_or(|dv| candidate < dv) {
                dist[edge.to] = Some(candidate);
                parent[edge.to] = Some(u);
            }
        }
    }

    let metrics = PathMetrics {
        relaxations,
        elapsed: started.elapsed(),
    };
    debug!(relaxations, "shortest paths finished");

    Ok(ShortestPaths {
        source,
        dist,
        parent,
        metrics,
    })
}
