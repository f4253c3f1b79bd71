//! Index/low-link SCC engine (Tarjan, single pass).
//!
//! Each vertex gets a discovery index on first visit and a low-link that
//! starts equal to it. Tree edges pull the child's low-link up into the
//! parent when the child finishes; edges to a vertex still on the SCC stack
//! pull that vertex's index. Edges into already-finalized components are
//! ignored. A vertex whose low-link equals its index is a root: the SCC
//! stack is popped down through it to form one component.
//!
//! The traversal runs on an explicit frame stack; a frame's exhaustion is
//! the point where the recursive formulation would return.

use std::time::Instant;

use fixedbitset::FixedBitSet;
use tracing::{debug, instrument};

use super::{SccAlgorithm, SccResult};
use crate::graph::Graph;
use crate::metrics::SccMetrics;

/// Single-pass index/low-link engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tarjan;

impl SccAlgorithm for Tarjan {
    const NAME: &'static str = "tarjan";

    #[instrument(name = "scc.tarjan", skip_all, fields(vertices = graph.vertex_count()))]
    fn run(&self, graph: &Graph) -> SccResult {
        let n = graph.vertex_count();
        let started = Instant::now();

        let mut state = State::new(n);
        for root in 0..n {
            if state.index[root].is_none() {
                state.strong_connect(graph, root);
            }
        }

        let metrics = SccMetrics {
            dfs_visits: state.visits,
            edges_explored: state.edges,
            elapsed: started.elapsed(),
        };
        debug!(
            components = state.components.len(),
            dfs_visits = metrics.dfs_visits,
            edges_explored = metrics.edges_explored,
            "tarjan finished"
        );

        SccResult::from_components(state.components, n, metrics)
    }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    vertex: usize,
    next_edge: usize,
}

struct State {
    index: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: FixedBitSet,
    stack: Vec<usize>,
    next_index: usize,
    components: Vec<Vec<usize>>,
    visits: u64,
    edges: u64,
}

impl State {
    fn new(n: usize) -> Self {
        Self {
            index: vec![None; n],
            lowlink: vec![0; n],
            on_stack: FixedBitSet::with_capacity(n),
            stack: Vec::new(),
            next_index: 0,
            components: Vec::new(),
            visits: 0,
            edges: 0,
        }
    }

    fn discover(&mut self, v: usize) {
        self.index[v] = Some(self.next_index);
        self.lowlink[v] = self.next_index;
        self.next_index += 1;
        self.stack.push(v);
        self.on_stack.insert(v);
        self.visits += 1;
    }

    fn strong_connect(&mut self, graph: &Graph, root: usize) {
        self.discover(root);
        let mut frames = vec![Frame {
            vertex: root,
            next_edge: 0,
        }];

        while let Some(frame) = frames.last_mut() {
            let v = frame.vertex;

            if let Some(edge) = graph.neighbors(v).get(frame.next_edge) {
                frame.next_edge += 1;
                self.edges += 1;
                let w = edge.to;

                match self.index[w] {
                    None => {
                        self.discover(w);
                        frames.push(Frame {
                            vertex: w,
                            next_edge: 0,
                        });
                    }
                    Some(w_index) if self.on_stack.contains(w) => {
                        self.lowlink[v] = self.lowlink[v].min(w_index);
                    }
                    // Already assigned to an earlier component.
                    Some(_) => {}
                }
                continue;
            }

            frames.pop();

            if self.index[v] == Some(self.lowlink[v]) {
                self.pop_component(v);
            }

            if let Some(parent) = frames.last() {
                let p = parent.vertex;
                self.lowlink[p] = self.lowlink[p].min(self.lowlink[v]);
            }
        }
    }

    fn pop_component(&mut self, root: usize) {
        let mut component = Vec::new();
        while let Some(w) = self.stack.pop() {
            self.on_stack.set(w, false);
            component.push(w);
            if w == root {
                break;
            }
        }
        self.components.push(component);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(result: &SccResult) -> Vec<Vec<usize>> {
        result
            .components()
            .iter()
            .map(|c| c.members().to_vec())
            .collect()
    }

    #[test]
    fn empty_graph_has_no_components() {
        let result = Tarjan.run(&Graph::new(0, true));
        assert!(result.is_empty());
        assert_eq!(result.metrics().dfs_visits, 0);
        assert_eq!(result.metrics().edges_explored, 0);
    }

    #[test]
    fn chain_yields_singletons() {
        let mut g = Graph::new(4, true);
        g.add_edge(0, 1, 2);
        g.add_edge(1, 2, 3);
        g.add_edge(2, 3, 1);

        let result = Tarjan.run(&g);
        assert_eq!(members(&result), vec![vec![0], vec![1], vec![2], vec![3]]);
        assert_eq!(result.metrics().dfs_visits, 4);
        assert_eq!(result.metrics().edges_explored, 3);
    }

    #[test]
    fn three_cycle_with_tails() {
        // 0 → 1 → 2 → 3 → 1, 3 → 4
        let mut g = Graph::new(5, true);
        g.add_edge(0, 1, 1);
        g.add_edge(1, 2, 2);
        g.add_edge(2, 3, 3);
        g.add_edge(3, 1, 1);
        g.add_edge(3, 4, 2);

        let result = Tarjan.run(&g);
        assert_eq!(members(&result), vec![vec![0], vec![1, 2, 3], vec![4]]);
        assert_eq!(result.component_index(), &[0, 1, 1, 1, 2]);
        assert_eq!(result.metrics().dfs_visits, 5);
        assert_eq!(result.metrics().edges_explored, 5);
    }

    #[test]
    fn edges_into_finished_components_are_counted_but_ignored() {
        // 1 ⇄ 2 discovered from 0; later 3 → 1 points into a finished SCC.
        let mut g = Graph::new(4, true);
        g.add_edge(0, 1, 1);
        g.add_edge(1, 2, 1);
        g.add_edge(2, 1, 1);
        g.add_edge(3, 1, 1);

        let result = Tarjan.run(&g);
        assert_eq!(members(&result), vec![vec![0], vec![1, 2], vec![3]]);
        assert_eq!(result.metrics().edges_explored, 4);
    }

    #[test]
    fn self_loops_and_duplicates_are_examined() {
        let mut g = Graph::new(2, true);
        g.add_edge(0, 0, 1);
        g.add_edge(0, 1, 1);
        g.add_edge(0, 1, 1);

        let result = Tarjan.run(&g);
        assert_eq!(members(&result), vec![vec![0], vec![1]]);
        assert_eq!(result.metrics().edges_explored, 3);
        assert_eq!(result.metrics().dfs_visits, 2);
    }

    #[test]
    fn rerun_is_identical_and_not_cumulative() {
        let mut g = Graph::new(3, true);
        g.add_edge(0, 1, 1);
        g.add_edge(1, 0, 1);
        g.add_edge(1, 2, 1);

        let first = Tarjan.run(&g);
        let second = Tarjan.run(&g);
        assert!(first.same_partition(&second));
        assert_eq!(first.metrics().dfs_visits, second.metrics().dfs_visits);
        assert_eq!(second.metrics().dfs_visits, 3);
        assert_eq!(second.metrics().edges_explored, 3);
    }

    #[test]
    fn long_cycle_does_not_overflow() {
        let n = 100_000;
        let mut g = Graph::new(n, true);
        for v in 0..n {
            g.add_edge(v, (v + 1) % n, 1);
        }

        let result = Tarjan.run(&g);
        assert_eq!(result.len(), 1);
        assert_eq!(result.largest_size(), n);
    }
}
