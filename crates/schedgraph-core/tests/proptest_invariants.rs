use std::collections::BTreeSet;

use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;
use proptest::prelude::*;
use schedgraph_core::topo::is_valid_order;
use schedgraph_core::{
    Graph, Kosaraju, SccAlgorithm, SccResult, Tarjan, dfs_order, kahn, longest_paths,
    shortest_paths,
};

use generators::*;

fn partition(result: &SccResult) -> Vec<Vec<usize>> {
    result
        .components()
        .iter()
        .map(|c| c.members().to_vec())
        .collect()
}

/// Same partition from an unrelated implementation, in our canonical order.
fn oracle_partition(graph: &Graph) -> Vec<Vec<usize>> {
    let mut pg: DiGraph<(), i64> = DiGraph::new();
    let nodes: Vec<_> = (0..graph.vertex_count()).map(|_| pg.add_node(())).collect();
    for (u, edge) in graph.edges() {
        pg.add_edge(nodes[u], nodes[edge.to], edge.weight);
    }
    let mut sets: Vec<Vec<usize>> = tarjan_scc(&pg)
        .into_iter()
        .map(|scc| {
            let mut members: Vec<usize> = scc.into_iter().map(|idx| idx.index()).collect();
            members.sort_unstable();
            members
        })
        .collect();
    sets.sort_unstable_by_key(|members| members[0]);
    sets
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(512))]

    #[test]
    fn engines_agree_with_each_other_and_oracle(g in arb_graph(24, 60)) {
        let t = Tarjan.run(&g);
        let k = Kosaraju.run(&g);
        prop_assert!(t.same_partition(&k));
        prop_assert_eq!(t.component_index(), k.component_index());
        prop_assert_eq!(partition(&t), oracle_partition(&g));
    }

    #[test]
    fn components_partition_the_vertices(g in arb_graph(24, 60)) {
        let result = Tarjan.run(&g);
        let mut seen = BTreeSet::new();
        for (idx, component) in result.components().iter().enumerate() {
            prop_assert!(!component.is_empty());
            prop_assert!(component.members().windows(2).all(|w| w[0] < w[1]));
            for &v in component.members() {
                prop_assert!(seen.insert(v), "vertex {} in two components", v);
                prop_assert_eq!(result.component_of(v), idx);
            }
        }
        prop_assert_eq!(seen.len(), g.vertex_count());

        let mins: Vec<usize> = result.components().iter().filter_map(|c| c.min()).collect();
        prop_assert!(mins.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn tarjan_counters_are_exact(g in arb_graph(24, 60)) {
        let m = Tarjan.run(&g).metrics();
        prop_assert_eq!(m.dfs_visits, g.vertex_count() as u64);
        prop_assert_eq!(m.edges_explored, g.edge_count() as u64);

        let m = Kosaraju.run(&g).metrics();
        prop_assert_eq!(m.dfs_visits, 2 * g.vertex_count() as u64);
        prop_assert_eq!(m.edges_explored, 2 * g.edge_count() as u64);
    }

    #[test]
    fn condensation_is_acyclic(g in arb_graph(24, 60)) {
        for result in [Tarjan.run(&g), Kosaraju.run(&g)] {
            let c = result.condense(&g);
            prop_assert_eq!(c.vertex_count(), result.len());
            let topo = kahn(&c);
            prop_assert!(topo.is_dag);
            prop_assert_eq!(topo.order.len(), c.vertex_count());
            prop_assert!(is_valid_order(&c, &topo.order));
        }
    }

    #[test]
    fn task_order_is_a_permutation(g in arb_graph(24, 60)) {
        let result = Tarjan.run(&g);
        let topo = kahn(&result.condense(&g));
        let mut order = result.task_order(&topo.order);
        prop_assert_eq!(order.len(), g.vertex_count());
        order.sort_unstable();
        prop_assert_eq!(order, (0..g.vertex_count()).collect::<Vec<_>>());
    }

    #[test]
    fn kahn_orders_are_valid_on_dags(g in arb_dag(24, 60)) {
        let topo = kahn(&g);
        prop_assert!(topo.is_dag);
        prop_assert!(is_valid_order(&g, &topo.order));
        prop_assert_eq!(topo.metrics.pushes, g.vertex_count() as u64);
        prop_assert_eq!(topo.metrics.pops, g.vertex_count() as u64);
        prop_assert!(is_valid_order(&g, &dfs_order(&g)));
    }

    #[test]
    fn kahn_flags_cycles(g in arb_graph(24, 60)) {
        let topo = kahn(&g);
        let cyclic = Tarjan.run(&g).cyclic_components(&g).next().is_some();
        prop_assert_eq!(topo.is_dag, !cyclic);
        prop_assert_eq!(topo.metrics.pushes, topo.metrics.pops);
    }

    #[test]
    fn shortest_paths_reach_fixed_point(g in arb_dag(24, 60), pick in any::<prop::sample::Index>()) {
        let source = pick.index(g.vertex_count());
        let order = kahn(&g).order;
        let sp = shortest_paths(&g, source, &order).expect("valid source");
        prop_assert_eq!(sp.distance(source), Some(0));
        for (u, edge) in g.edges() {
            if let Some(du) = sp.distance(u) {
                let dv = sp.distance(edge.to).expect("reachable through u");
                prop_assert!(dv <= du + edge.weight);
            }
        }
        for v in 0..g.vertex_count() {
            let path = sp.path_to(v);
            prop_assert_eq!(path.is_empty(), sp.distance(v).is_none());
            if let Some(&first) = path.first() {
                prop_assert_eq!(first, source);
            }
        }
    }

    #[test]
    fn longest_paths_reach_dual_fixed_point(g in arb_dag(24, 60)) {
        let order = kahn(&g).order;
        let lp = longest_paths(&g, &order).expect("valid order");
        for (u, edge) in g.edges() {
            if let Some(du) = lp.distance(u) {
                let dv = lp.distance(edge.to).expect("established through u");
                prop_assert!(dv >= du + edge.weight);
            }
        }
        let max = lp.dist.iter().flatten().copied().max();
        prop_assert_eq!(lp.critical_length, max);

        // The critical path's edge weights add up to the critical length.
        let mut total = 0i64;
        for pair in lp.critical_path.windows(2) {
            let best = g
                .neighbors(pair[0])
                .iter()
                .filter(|e| e.to == pair[1])
                .map(|e| e.weight)
                .max()
                .expect("consecutive path vertices are adjacent");
            total += best;
        }
        prop_assert_eq!(Some(total), lp.critical_length);
    }

    #[test]
    fn engines_are_idempotent(g in arb_graph(16, 40)) {
        prop_assert!(Tarjan.run(&g).same_partition(&Tarjan.run(&g)));
        prop_assert_eq!(kahn(&g).order, kahn(&g).order);
        prop_assert_eq!(Kosaraju.run(&g).metrics().dfs_visits, Kosaraju.run(&g).metrics().dfs_visits);
    }
}
