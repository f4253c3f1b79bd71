//! Per-run instrumentation records.
//!
//! Every engine run returns one of these next to its primary result. They
//! are built fresh for each run, so running an engine twice never
//! accumulates counts.

use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};

/// Counters for one SCC engine run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SccMetrics {
    /// Vertex entries across every depth-first pass.
    pub dfs_visits: u64,
    /// Edges examined across every depth-first pass, whatever the outcome.
    pub edges_explored: u64,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

/// Counters for one topological sort run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TopoMetrics {
    pub pushes: u64,
    pub pops: u64,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

/// Counters for one DAG path run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PathMetrics {
    /// Relaxation attempts, improving or not.
    pub relaxations: u64,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

/// Milliseconds as a float, the unit every report uses.
#[must_use]
pub fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1_000.0
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(millis(*duration))
}

impl fmt::Display for SccMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DFS visits: {}, edges explored: {}, time: {:.3} ms",
            self.dfs_visits,
            self.edges_explored,
            millis(self.elapsed)
        )
    }
}

impl fmt::Display for TopoMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "queue pushes: {}, queue pops: {}, time: {:.3} ms",
            self.pushes,
            self.pops,
            millis(self.elapsed)
        )
    }
}

impl fmt::Display for PathMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "edge relaxations: {}, time: {:.3} ms",
            self.relaxations,
            millis(self.elapsed)
        )
    }
}
