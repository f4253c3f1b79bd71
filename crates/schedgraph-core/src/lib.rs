#![forbid(unsafe_code)]
//! schedgraph-core library.
//!
//! Structural and path analysis of directed, edge-weighted graphs for
//! scheduling: strongly connected components (two engines), condensation,
//! topological order with cycle detection, and DAG shortest/critical paths.
//!
//! # Conventions
//!
//! - **Errors**: Typed [`GraphError`] at the loading boundary. Engines do
//!   not fail; cycles and unreachable vertices are part of their results.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`).
//!   Engine entry points carry `#[instrument]` spans.
//! - **Traversal**: No recursion. Depth-first passes run on explicit
//!   frame stacks.
//!
//! # Example
//!
//! ```
//! use schedgraph_core::{Graph, SccAlgorithm, Tarjan, kahn, longest_paths};
//!
//! # fn main() -> Result<(), schedgraph_core::GraphError> {
//! let mut g = Graph::new(4, true);
//! g.add_edge(0, 1, 2);
//! g.add_edge(1, 2, 3);
//! g.add_edge(2, 3, 1);
//!
//! assert_eq!(Tarjan.run(&g).len(), 4);
//! let topo = kahn(&g);
//! assert!(topo.is_dag);
//! let lp = longest_paths(&g, &topo.order)?;
//! assert_eq!(lp.critical_length, Some(6));
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod condense;
pub mod error;
pub mod graph;
pub mod metrics;
pub mod paths;
pub mod scc;
pub mod stats;
pub mod topo;

mod traversal;

pub use analysis::{AnalysisOptions, AnalysisReport, EngineRun, PathReport, PathScope, analyze};
pub use condense::condense;
pub use error::{ErrorCode, GraphError};
pub use graph::{Edge, EdgeData, Graph, GraphData};
pub use metrics::{PathMetrics, SccMetrics, TopoMetrics};
pub use paths::{LongestPaths, ShortestPaths, longest_paths, shortest_paths};
pub use scc::{Component, Kosaraju, SccAlgorithm, SccEngine, SccResult, Tarjan, UnknownEngine};
pub use stats::{GraphKind, GraphStats};
pub use topo::{TopoResult, dfs_order, kahn};
