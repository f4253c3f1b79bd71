//! Topological ordering.
//!
//! [`kahn`] is the instrumented engine: in-degree driven, FIFO, with cycle
//! detection. [`dfs_order`] is a static alternative for graphs already
//! known to be acyclic; it yields a different but equally valid order and
//! records no metrics.

use std::collections::VecDeque;
use std::time::Instant;

use fixedbitset::FixedBitSet;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::graph::Graph;
use crate::metrics::TopoMetrics;
use crate::traversal::{DfsCounters, depth_first};

/// Output of [`kahn`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopoResult {
    /// Vertices in emission order. Covers every vertex only when `is_dag`.
    pub order: Vec<usize>,
    /// `true` iff `order` has one entry per vertex.
    pub is_dag: bool,
    pub metrics: TopoMetrics,
}

/// Kahn's algorithm.
///
/// Zero in-degree vertices seed the queue in ascending index order. Each
/// enqueue counts as a push and each dequeue as a pop. A cyclic graph is
/// not an error: the result carries the consistent prefix and
/// `is_dag == false`.
#[must_use]
#[instrument(name = "topo.kahn", skip_all, fields(vertices = graph.vertex_count()))]
pub fn kahn(graph: &Graph) -> TopoResult {
    let n = graph.vertex_count();
    let started = Instant::now();
    let mut pushes = 0u64;
    let mut pops = 0u64;

    let mut in_degree = graph.in_degrees();
    let mut queue: VecDeque<usize> = VecDeque::new();
    for (v, &degree) in in_degree.iter().enumerate() {
        if degree == 0 {
            queue.push_back(v);
            pushes += 1;
        }
    }

    let mut order = Vec::with_capacity(n);
    while let Some(u) = queue.pop_front() {
        pops += 1;
        order.push(u);
        for edge in graph.neighbors(u) {
            let remaining = &mut in_degree[edge.to];
            *remaining -= 1;
            if *remaining == 0 {
                queue.push_back(edge.to);
                pushes += 1;
            }
        }
    }

    let is_dag = order.len() == n;
    let metrics = TopoMetrics {
        pushes,
        pops,
        elapsed: started.elapsed(),
    };
    debug!(
        emitted = order.len(),
        is_dag,
        pushes,
        pops,
        "kahn finished"
    );

    TopoResult {
        order,
        is_dag,
        metrics,
    }
}

/// Depth-first topological order: reverse post-order over roots taken in
/// ascending index order.
///
/// Only meaningful for acyclic graphs. On a cyclic graph the result is
/// still a permutation of the vertices but some edge will point backwards.
#[must_use]
pub fn dfs_order(graph: &Graph) -> Vec<usize> {
    let n = graph.vertex_count();
    let mut visited = FixedBitSet::with_capacity(n);
    let mut counters = DfsCounters::default();
    let mut post_order = Vec::with_capacity(n);

    for root in 0..n {
        if !visited.contains(root) {
            depth_first(graph, root, &mut visited, &mut counters, |v| {
                post_order.push(v);
            });
        }
    }

    post_order.reverse();
    post_order
}

/// `true` if every edge of `graph` points forward in `order`.
///
/// `order` must be a permutation of the vertices; missing vertices make
/// the check fail.
#[must_use]
pub fn is_valid_order(graph: &Graph, order: &[usize]) -> bool {
    let n = graph.vertex_count();
    if order.len() != n {
        return false;
    }
    let mut position = vec![usize::MAX; n];
    for (pos, &v) in order.iter().enumerate() {
        match position.get_mut(v) {
            Some(slot) if *slot == usize::MAX => *slot = pos,
            _ => return false,
        }
    }
    graph
        .edges()
        .all(|(u, edge)| position[u] < position[edge.to])
}
