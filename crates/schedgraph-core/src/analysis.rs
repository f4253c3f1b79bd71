//! End-to-end analysis of one graph.
//!
//! ```text
//! Graph ─┬─ Tarjan ───┐
//!        └─ Kosaraju ─┴─ agree? ── primary partition
//!                                      │
//!                         condense ── kahn ── task order
//!                                      │
//!          all singletons? ── kahn(original) ── DAG? ── paths (original)
//!                 │ no                                │ no
//!                 └────────── paths (condensation) ───┘
//! ```
//!
//! Path engines only ever see an acyclic graph: the original when it is a
//! DAG, the condensation otherwise.

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::error::GraphError;
use crate::graph::Graph;
use crate::metrics::SccMetrics;
use crate::paths::{LongestPaths, ShortestPaths, longest_paths, shortest_paths};
use crate::scc::{SccEngine, SccResult};
use crate::stats::GraphStats;
use crate::topo::{TopoResult, kahn};

/// Caller choices for [`analyze`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Engine whose partition feeds condensation and scheduling.
    pub engine: SccEngine,
    /// Shortest-path source; falls back to the graph's own source, then
    /// vertex 0.
    pub source: Option<usize>,
}

/// One SCC engine's run, kept for side-by-side comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngineRun {
    pub engine: SccEngine,
    pub components: usize,
    pub metrics: SccMetrics,
}

/// Which graph the path section was computed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PathScope {
    /// The input graph, which was acyclic.
    Original,
    /// The condensation; vertices are component indices.
    Condensation,
}

/// Shortest and longest paths over one acyclic graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathReport {
    pub scope: PathScope,
    /// Source in `scope` coordinates.
    pub source: usize,
    pub shortest: ShortestPaths,
    pub longest: LongestPaths,
}

/// Everything [`analyze`] computes for one graph.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub content_hash: String,
    pub stats: GraphStats,
    pub primary: SccEngine,
    /// Partition from the primary engine.
    pub sccs: SccResult,
    /// Both engines, in [`SccEngine::ALL`] order.
    pub engine_runs: Vec<EngineRun>,
    pub engines_agree: bool,
    #[serde(skip)]
    pub condensation: Graph,
    /// Kahn over the condensation; always a DAG for a true partition.
    pub condensation_topo: TopoResult,
    /// Condensation order expanded into vertices.
    pub task_order: Vec<usize>,
    /// Kahn over the input graph, run only when every component is a
    /// singleton.
    pub original_topo: Option<TopoResult>,
    pub paths: Option<PathReport>,
}

impl AnalysisReport {
    /// Metrics recorded for `engine`.
    #[must_use]
    pub fn engine_metrics(&self, engine: SccEngine) -> Option<SccMetrics> {
        self.engine_runs
            .iter()
            .find(|run| run.engine == engine)
            .map(|run| run.metrics)
    }

    /// `true` when the input graph was found to be acyclic.
    #[must_use]
    pub fn is_dag(&self) -> bool {
        self.original_topo.as_ref().is_some_and(|t| t.is_dag)
    }
}

/// Run the full pipeline on `graph`.
///
/// # Errors
///
/// Returns [`GraphError::VertexOutOfRange`] if `options.source` is not a
/// vertex of `graph`.
#[instrument(skip_all, fields(vertices = graph.vertex_count(), engine = %options.engine))]
pub fn analyze(graph: &Graph, options: &AnalysisOptions) -> Result<AnalysisReport, GraphError> {
    let n = graph.vertex_count();
    if let Some(source) = options.source
        && source >= n
    {
        return Err(GraphError::VertexOutOfRange {
            vertex: source,
            vertex_count: n,
        });
    }

    let mut engine_runs = Vec::with_capacity(SccEngine::ALL.len());
    let mut results = Vec::with_capacity(SccEngine::ALL.len());
    for engine in SccEngine::ALL {
        let result = engine.run(graph);
        engine_runs.push(EngineRun {
            engine,
            components: result.len(),
            metrics: result.metrics(),
        });
        results.push((engine, result));
    }
    let engines_agree = results
        .windows(2)
        .all(|pair| pair[0].1.same_partition(&pair[1].1));
    if !engines_agree {
        warn!("SCC engines disagree on the partition");
    }
    let sccs = results
        .into_iter()
        .find_map(|(engine, result)| (engine == options.engine).then_some(result))
        .unwrap_or_else(|| options.engine.run(graph));

    let stats = GraphStats::compute(graph, &sccs);
    let condensation = sccs.condense(graph);
    let condensation_topo = kahn(&condensation);
    let task_order = sccs.task_order(&condensation_topo.order);

    let source = options
        .source
        .or_else(|| graph.source())
        .or_else(|| (n > 0).then_some(0));

    let original_topo = sccs.all_singletons().then(|| kahn(graph));
    let paths = match (source, &original_topo) {
        (None, _) => None,
        (Some(source), Some(topo)) if topo.is_dag => Some(PathReport {
            scope: PathScope::Original,
            source,
            shortest: shortest_paths(graph, source, &topo.order)?,
            longest: longest_paths(graph, &topo.order)?,
        }),
        (Some(source), _) if condensation_topo.is_dag => {
            let component = sccs.component_of(source);
            Some(PathReport {
                scope: PathScope::Condensation,
                source: component,
                shortest: shortest_paths(&condensation, component, &condensation_topo.order)?,
                longest: longest_paths(&condensation, &condensation_topo.order)?,
            })
        }
        (Some(_), _) => None,
    };

    info!(
        components = sccs.len(),
        kind = %stats.kind,
        engines_agree,
        critical_length = ?paths.as_ref().and_then(|p| p.longest.critical_length),
        "analysis complete"
    );

    Ok(AnalysisReport {
        content_hash: graph.content_hash(),
        stats,
        primary: options.engine,
        sccs,
        engine_runs,
        engines_agree,
        condensation,
        condensation_topo,
        task_order,
        original_topo,
        paths,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::GraphKind;

    fn chain() -> Graph {
        let mut g = Graph::new(4, true);
        g.add_edge(0, 1, 2);
        g.add_edge(1, 2, 3);
        g.add_edge(2, 3, 1);
        g
    }

    fn cycle_with_tails() -> Graph {
        let mut g = Graph::new(5, true);
        g.add_edge(0, 1, 1);
        g.add_edge(1, 2, 2);
        g.add_edge(2, 3, 3);
        g.add_edge(3, 1, 1);
        g.add_edge(3, 4, 2);
        g
    }

    #[test]
    fn dag_runs_paths_on_original_graph() {
        let report = analyze(&chain(), &AnalysisOptions::default()).expect("analysis");

        assert!(report.engines_agree);
        assert!(report.is_dag());
        assert_eq!(report.stats.kind, GraphKind::Dag);
        assert_eq!(report.task_order, vec![0, 1, 2, 3]);

        let paths = report.paths.expect("paths for a DAG");
        assert_eq!(paths.scope, PathScope::Original);
        assert_eq!(paths.source, 0);
        assert_eq!(
            paths.shortest.dist,
            vec![Some(0), Some(2), Some(5), Some(6)]
        );
        assert_eq!(paths.longest.critical_path, vec![0, 1, 2, 3]);
        assert_eq!(paths.longest.critical_length, Some(6));
    }

    #[test]
    fn cyclic_graph_falls_back_to_condensation() {
        let g = cycle_with_tails();
        let report = analyze(&g, &AnalysisOptions::default()).expect("analysis");

        assert!(report.engines_agree);
        assert!(!report.is_dag());
        assert!(report.original_topo.is_none());
        assert_eq!(report.sccs.len(), 3);
        assert_eq!(report.condensation.vertex_count(), 3);
        assert!(report.condensation_topo.is_dag);
        assert_eq!(report.task_order, vec![0, 1, 2, 3, 4]);

        let paths = report.paths.expect("condensation paths");
        assert_eq!(paths.scope, PathScope::Condensation);
        assert_eq!(paths.shortest.dist, vec![Some(0), Some(1), Some(3)]);
        assert_eq!(paths.longest.critical_path, vec![0, 1, 2]);
    }

    #[test]
    fn self_loop_only_graph_uses_condensation() {
        let mut g = Graph::new(3, true);
        g.add_edge(0, 1, 4);
        g.add_edge(1, 1, 1);
        g.add_edge(1, 2, 4);

        let report = analyze(&g, &AnalysisOptions::default()).expect("analysis");
        let topo = report.original_topo.as_ref().expect("all singletons");
        assert!(!topo.is_dag);
        assert_eq!(report.stats.kind, GraphKind::Cyclic);

        let paths = report.paths.expect("condensation paths");
        assert_eq!(paths.scope, PathScope::Condensation);
        assert_eq!(paths.longest.critical_length, Some(8));
    }

    #[test]
    fn source_precedence() {
        let mut g = chain();
        g.set_source(1).expect("in range");

        let from_graph = analyze(&g, &AnalysisOptions::default()).expect("analysis");
        let paths = from_graph.paths.expect("paths");
        assert_eq!(paths.source, 1);
        assert_eq!(paths.shortest.distance(0), None);

        let options = AnalysisOptions {
            source: Some(2),
            ..AnalysisOptions::default()
        };
        let overridden = analyze(&g, &options).expect("analysis");
        assert_eq!(overridden.paths.expect("paths").source, 2);
    }

    #[test]
    fn bad_source_override_is_an_error() {
        let options = AnalysisOptions {
            source: Some(4),
            ..AnalysisOptions::default()
        };
        let err = analyze(&chain(), &options).expect_err("out of range");
        assert!(matches!(err, GraphError::VertexOutOfRange { vertex: 4, .. }));
    }

    #[test]
    fn primary_engine_is_selectable_and_both_are_recorded() {
        let options = AnalysisOptions {
            engine: SccEngine::Kosaraju,
            source: None,
        };
        let report = analyze(&cycle_with_tails(), &options).expect("analysis");
        assert_eq!(report.primary, SccEngine::Kosaraju);
        assert_eq!(report.engine_runs.len(), 2);

        let tarjan = report.engine_metrics(SccEngine::Tarjan).expect("tarjan ran");
        let kosaraju = report
            .engine_metrics(SccEngine::Kosaraju)
            .expect("kosaraju ran");
        assert_eq!(tarjan.dfs_visits, 5);
        assert_eq!(kosaraju.dfs_visits, 10);
    }

    #[test]
    fn empty_graph_has_no_paths() {
        let report = analyze(&Graph::new(0, true), &AnalysisOptions::default()).expect("analysis");
        assert!(report.paths.is_none());
        assert!(report.task_order.is_empty());
        assert!(report.engines_agree);
    }

    #[test]
    fn report_serializes_without_condensation_graph() {
        let report = analyze(&chain(), &AnalysisOptions::default()).expect("analysis");
        let json = serde_json::to_value(&report).expect("serialize");
        assert!(json.get("condensation").is_none());
        assert_eq!(json["primary"], "tarjan");
        assert_eq!(json["paths"]["scope"], "original");
        assert_eq!(json["stats"]["kind"], "dag");
    }
}
