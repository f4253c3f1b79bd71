//! Explicit-stack depth-first traversal.
//!
//! Long chains must not exhaust the call stack, so every depth-first pass
//! in the crate runs on a heap-allocated frame stack. Each frame remembers
//! the next edge to examine, which reproduces recursive visit order
//! exactly: a vertex is entered on discovery and finished once its last
//! edge has been examined.

use fixedbitset::FixedBitSet;

use crate::graph::Graph;

/// Visit and edge counters accumulated by [`depth_first`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct DfsCounters {
    pub visits: u64,
    pub edges: u64,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    vertex: usize,
    next_edge: usize,
}

/// Depth-first search from `root` over vertices not yet in `visited`.
///
/// Calls `on_finish` in post-order. `root` must be unvisited.
pub(crate) fn depth_first(
    graph: &Graph,
    root: usize,
    visited: &mut FixedBitSet,
    counters: &mut DfsCounters,
    mut on_finish: impl FnMut(usize),
) {
    visited.insert(root);
    counters.visits += 1;
    let mut stack = vec![Frame {
        vertex: root,
        next_edge: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let v = frame.vertex;
        if let Some(edge) = graph.neighbors(v).get(frame.next_edge) {
            frame.next_edge += 1;
            counters.edges += 1;
            let w = edge.to;
            if !visited.contains(w) {
                visited.insert(w);
                counters.visits += 1;
                stack.push(Frame {
                    vertex: w,
                    next_edge: 0,
                });
            }
        } else {
            stack.pop();
            on_finish(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_order_matches_recursive_visit() {
        // 0 → 1 → 3, 0 → 2 → 3
        let mut g = Graph::new(4, true);
        g.add_edge(0, 1, 1);
        g.add_edge(0, 2, 1);
        g.add_edge(1, 3, 1);
        g.add_edge(2, 3, 1);

        let mut visited = FixedBitSet::with_capacity(4);
        let mut counters = DfsCounters::default();
        let mut finished = Vec::new();
        depth_first(&g, 0, &mut visited, &mut counters, |v| finished.push(v));

        assert_eq!(finished, vec![3, 1, 2, 0]);
        assert_eq!(counters.visits, 4);
        assert_eq!(counters.edges, 4);
    }

    #[test]
    fn skips_already_visited_vertices() {
        let mut g = Graph::new(3, true);
        g.add_edge(0, 1, 1);
        g.add_edge(1, 2, 1);

        let mut visited = FixedBitSet::with_capacity(3);
        visited.insert(1);
        let mut counters = DfsCounters::default();
        let mut finished = Vec::new();
        depth_first(&g, 0, &mut visited, &mut counters, |v| finished.push(v));

        assert_eq!(finished, vec![0]);
        assert_eq!(counters.visits, 1);
        assert_eq!(counters.edges, 1);
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        let n = 200_000;
        let mut g = Graph::new(n, true);
        for v in 0..n - 1 {
            g.add_edge(v, v + 1, 1);
        }

        let mut visited = FixedBitSet::with_capacity(n);
        let mut counters = DfsCounters::default();
        let mut count = 0usize;
        depth_first(&g, 0, &mut visited, &mut counters, |_| count += 1);

        assert_eq!(count, n);
    }
}
