//! SCC condensation.
//!
//! Collapses each component of an [`SccResult`] into one vertex. The
//! condensation has an edge `a → b` iff some original edge runs from a
//! member of component `a` to a member of component `b != a`. Parallel
//! edges between the same ordered pair collapse into one, keeping the
//! weight of the first original edge seen while scanning vertices ascending
//! and each adjacency list in insertion order.
//!
//! Intra-component edges (including self-loops) are dropped, so the result
//! is acyclic whenever the partition is a true SCC partition.

use std::collections::HashSet;

use tracing::{debug, instrument, warn};

use crate::graph::Graph;
use crate::scc::SccResult;

/// Build the condensation of `graph` under the partition in `sccs`.
///
/// The condensation's source, if `graph` has one, is the component that
/// holds the original source.
#[must_use]
#[instrument(skip_all, fields(components = sccs.len()))]
pub fn condense(graph: &Graph, sccs: &SccResult) -> Graph {
    let mut condensed = build_condensation(graph, sccs.component_index(), sccs.len());
    if let Some(source) = graph.source() {
        let component = sccs.component_of(source);
        if let Err(err) = condensed.set_source(component) {
            warn!(component, error = %err, "condensation source not mapped");
        }
    }
    condensed
}

/// Condense `graph` given a vertex → component index over
/// `component_count` components.
///
/// # Panics
///
/// Panics if `component_of` is shorter than the vertex count or maps a
/// vertex to an index `>= component_count`.
#[must_use]
pub fn build_condensation(graph: &Graph, component_of: &[usize], component_count: usize) -> Graph {
    let mut condensed = Graph::new(component_count, true);
    if let Some(model) = graph.weight_model() {
        condensed.set_weight_model(model);
    }

    let mut emitted: HashSet<(usize, usize)> = HashSet::new();
    for (u, edge) in graph.edges() {
        let from = component_of[u];
        let to = component_of[edge.to];
        if from != to && emitted.insert((from, to)) {
            condensed.add_edge(from, to, edge.weight);
        }
    }

    debug!(
        vertices = condensed.vertex_count(),
        edges = condensed.edge_count(),
        "condensation built"
    );
    condensed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;
    use crate::scc::{Kosaraju, SccAlgorithm, Tarjan};

    fn cycle_with_tails() -> Graph {
        // 0 → 1, 1 → 2 (2), 2 → 3 (3), 3 → 1 (1), 3 → 4 (2)
        let mut g = Graph::new(5, true);
        g.add_edge(0, 1, 1);
        g.add_edge(1, 2, 2);
        g.add_edge(2, 3, 3);
        g.add_edge(3, 1, 1);
        g.add_edge(3, 4, 2);
        g
    }

    #[test]
    fn collapses_cycle_into_one_vertex() {
        let g = cycle_with_tails();
        let sccs = Tarjan.run(&g);
        let c = condense(&g, &sccs);

        // Components: 0={0}, 1={1,2,3}, 2={4}
        assert_eq!(c.vertex_count(), 3);
        assert_eq!(c.edge_count(), 2);
        assert_eq!(c.neighbors(0), &[Edge { to: 1, weight: 1 }]);
        assert_eq!(c.neighbors(1), &[Edge { to: 2, weight: 2 }]);
        assert!(c.neighbors(2).is_empty());
    }

    #[test]
    fn parallel_edges_keep_first_seen_weight() {
        // {0,1} cycle with two exits into 2; the exit from vertex 0 is seen first.
        let mut g = Graph::new(3, true);
        g.add_edge(0, 1, 1);
        g.add_edge(0, 2, 7);
        g.add_edge(1, 0, 1);
        g.add_edge(1, 2, 3);
        g.add_edge(0, 2, 9);

        let sccs = Tarjan.run(&g);
        let c = condense(&g, &sccs);
        assert_eq!(c.vertex_count(), 2);
        assert_eq!(c.neighbors(0), &[Edge { to: 1, weight: 7 }]);
        assert_eq!(c.edge_count(), 1);
    }

    #[test]
    fn self_loops_and_internal_edges_are_dropped() {
        let mut g = Graph::new(2, true);
        g.add_edge(0, 0, 5);
        g.add_edge(0, 1, 2);
        g.add_edge(1, 1, 5);

        let sccs = Tarjan.run(&g);
        let c = condense(&g, &sccs);
        assert_eq!(c.vertex_count(), 2);
        assert_eq!(c.edge_count(), 1);
        assert!(!c.has_self_loop(0));
    }

    #[test]
    fn either_engine_gives_the_same_condensation() {
        let g = cycle_with_tails();
        let from_tarjan = Tarjan.run(&g).condense(&g);
        let from_kosaraju = Kosaraju.run(&g).condense(&g);
        assert_eq!(from_tarjan, from_kosaraju);
    }

    #[test]
    fn source_maps_to_its_component() {
        let mut g = cycle_with_tails();
        g.set_source(2).expect("source");
        let sccs = Tarjan.run(&g);
        let c = condense(&g, &sccs);
        assert_eq!(c.source(), Some(1));
    }

    #[test]
    fn explicit_index_builder() {
        let mut g = Graph::new(4, true);
        g.add_edge(0, 2, 4);
        g.add_edge(1, 3, 6);
        g.add_edge(2, 3, 8);

        // Arbitrary grouping {0,1} and {2,3}
        let c = build_condensation(&g, &[0, 0, 1, 1], 2);
        assert_eq!(c.neighbors(0), &[Edge { to: 1, weight: 4 }]);
        assert_eq!(c.edge_count(), 1);
    }
}
