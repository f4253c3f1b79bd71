//! Structural summary of a graph.
//!
//! # Statistics Provided
//!
//! - **nodes** / **edges**: vertex and stored-edge counts (duplicates and
//!   self-loops included).
//! - **density**: `edges / (nodes * (nodes - 1))`. Zero for 0 or 1 node.
//!   Can exceed 1.0 when duplicate edges or self-loops are present.
//! - **scc_count** / **largest_scc**: from the SCC partition.
//! - **cycle_count**: components that contain a cycle, a lone vertex with a
//!   self-loop included.
//! - **sources** / **sinks**: vertices with in-degree 0 / out-degree 0.
//! - **kind**: [`GraphKind::Dag`] when `cycle_count == 0`.

use std::fmt;

use serde::Serialize;

use crate::graph::Graph;
use crate::scc::SccResult;

/// Whether a graph needs condensation before it can be scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphKind {
    Dag,
    Cyclic,
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dag => "DAG",
            Self::Cyclic => "Cyclic",
        })
    }
}

// ---------------------------------------------------------------------------
// GraphStats
// ---------------------------------------------------------------------------

/// Counts reported for every analysed dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub density: f64,
    pub scc_count: usize,
    pub largest_scc: usize,
    pub cycle_count: usize,
    pub self_loops: usize,
    pub sources: usize,
    pub sinks: usize,
    pub kind: GraphKind,
}

impl GraphStats {
    /// Summarize `graph` given its SCC partition.
    #[must_use]
    pub fn compute(graph: &Graph, sccs: &SccResult) -> Self {
        let nodes = graph.vertex_count();
        let edges = graph.edge_count();

        let self_loops = graph.edges().filter(|(u, e)| *u == e.to).count();
        let sources = graph.in_degrees().iter().filter(|&&d| d == 0).count();
        let sinks = (0..nodes)
            .filter(|&v| graph.neighbors(v).is_empty())
            .count();
        let cycle_count = sccs.cyclic_components(graph).count();
        let kind = if cycle_count == 0 {
            GraphKind::Dag
        } else {
            GraphKind::Cyclic
        };

        Self {
            nodes,
            edges,
            density: compute_density(nodes, edges),
            scc_count: sccs.len(),
            largest_scc: sccs.largest_size(),
            cycle_count,
            self_loops,
            sources,
            sinks,
            kind,
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn compute_density(nodes: usize, edges: usize) -> f64 {
    if nodes < 2 {
        return 0.0_f64;
    }
    let max_edges = (nodes * (nodes - 1)) as f64;
    edges as f64 / max_edges
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
