//! Finish-order/transpose SCC engine (Kosaraju, two passes).
//!
//! Pass 1 runs depth-first over the graph from every unvisited vertex in
//! index order and records vertices as they finish. Pass 2 builds the
//! transpose and pops the finish stack: every still-unvisited vertex seeds
//! a depth-first search on the transpose, and everything that search
//! reaches is one component.
//!
//! Visit and edge counters accumulate across both passes, so on the same
//! graph this engine reports roughly twice the work of [`super::Tarjan`].

use std::time::Instant;

use fixedbitset::FixedBitSet;
use tracing::{debug, instrument};

use super::{SccAlgorithm, SccResult};
use crate::graph::Graph;
use crate::metrics::SccMetrics;
use crate::traversal::{DfsCounters, depth_first};

/// Two-pass finish-order/transpose engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct Kosaraju;

impl SccAlgorithm for Kosaraju {
    const NAME: &'static str = "kosaraju";

    #[instrument(name = "scc.kosaraju", skip_all, fields(vertices = graph.vertex_count()))]
    fn run(&self, graph: &Graph) -> SccResult {
        let n = graph.vertex_count();
        let started = Instant::now();
        let mut counters = DfsCounters::default();

        // Pass 1: finish order on the original graph.
        let mut visited = FixedBitSet::with_capacity(n);
        let mut finish_stack: Vec<usize> = Vec::with_capacity(n);
        for root in 0..n {
            if !visited.contains(root) {
                depth_first(graph, root, &mut visited, &mut counters, |v| {
                    finish_stack.push(v);
                });
            }
        }

        // Pass 2: components on the transpose, latest finisher first.
        let transposed = graph.transpose();
        visited.clear();
        let mut components: Vec<Vec<usize>> = Vec::new();
        while let Some(v) = finish_stack.pop() {
            if visited.contains(v) {
                continue;
            }
            let mut component = Vec::new();
            depth_first(&transposed, v, &mut visited, &mut counters, |w| {
                component.push(w);
            });
            components.push(component);
        }

        let metrics = SccMetrics {
            dfs_visits: counters.visits,
            edges_explored: counters.edges,
            elapsed: started.elapsed(),
        };
        debug!(
            components = components.len(),
            dfs_visits = metrics.dfs_visits,
            edges_explored = metrics.edges_explored,
            "kosaraju finished"
        );

        SccResult::from_components(components, n, metrics)
    }
}
