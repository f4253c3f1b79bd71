//! Adjacency-list graph shared read-only by every analysis engine.
//!
//! # Overview
//!
//! A [`Graph`] has a fixed vertex count `n`; vertices are the indices
//! `0..n`. Each vertex owns an ordered list of outgoing [`Edge`]s kept in
//! insertion order. Duplicate edges and self-loops are allowed and are seen
//! by the engines exactly as inserted.
//!
//! ## Lifecycle
//!
//! ```text
//! Graph::new(n, directed)      ← build phase
//!        ↓  add_edge / try_add_edge / set_source
//! &Graph                        ← read-only from here on
//!        ↓
//! scc::Tarjan / scc::Kosaraju, condense, topo, paths
//! ```
//!
//! Nothing in the analysis layer takes `&mut Graph`, so running any engine
//! any number of times observes the same edges in the same order.
//!
//! ## Weights
//!
//! Weights are signed (`i64`). Negative weights are legal: the path engines
//! rely on a topological order, not on non-negativity.

pub mod io;

use serde::Serialize;

use crate::error::GraphError;

pub use io::{EdgeData, GraphData, MAX_VERTICES};

/// One outgoing edge: target vertex and signed weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    pub to: usize,
    pub weight: i64,
}

/// Directed, edge-weighted graph over vertices `0..n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    adjacency: Vec<Vec<Edge>>,
    directed: bool,
    source: Option<usize>,
    weight_model: Option<String>,
}

impl Graph {
    /// Allocate a graph with `n` vertices and no edges.
    #[must_use]
    pub fn new(n: usize, directed: bool) -> Self {
        Self {
            adjacency: vec![Vec::new(); n],
            directed,
            source: None,
            weight_model: None,
        }
    }

    /// Append `u → v` with `weight` to `u`'s edge list.
    ///
    /// # Panics
    ///
    /// Panics if `u` or `v` is not a vertex of this graph. Out-of-range
    /// endpoints are a caller bug; use [`Graph::try_add_edge`] at trust
    /// boundaries.
    pub fn add_edge(&mut self, u: usize, v: usize, weight: i64) {
        let n = self.vertex_count();
        assert!(v < n, "edge target {v} out of range for {n} vertices");
        self.adjacency[u].push(Edge { to: v, weight });
    }

    /// Bounds-checked variant of [`Graph::add_edge`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] if either endpoint is not a
    /// vertex of this graph. The graph is left unchanged in that case.
    pub fn try_add_edge(&mut self, u: usize, v: usize, weight: i64) -> Result<(), GraphError> {
        self.check_vertex(u)?;
        self.check_vertex(v)?;
        self.adjacency[u].push(Edge { to: v, weight });
        Ok(())
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Total number of stored edges (duplicates and self-loops included).
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// `true` when the graph has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Outgoing edges of `u` in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if `u` is not a vertex of this graph.
    #[must_use]
    pub fn neighbors(&self, u: usize) -> &[Edge] {
        &self.adjacency[u]
    }

    /// Every edge as `(from, edge)`, scanning vertices ascending and each
    /// vertex's edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, &Edge)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(u, edges)| edges.iter().map(move |e| (u, e)))
    }

    #[must_use]
    pub const fn is_directed(&self) -> bool {
        self.directed
    }

    /// Designated source for shortest-path queries, if any.
    #[must_use]
    pub const fn source(&self) -> Option<usize> {
        self.source
    }

    /// Designate the shortest-path source.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] if `source` is not a vertex.
    pub fn set_source(&mut self, source: usize) -> Result<(), GraphError> {
        self.check_vertex(source)?;
        self.source = Some(source);
        Ok(())
    }

    /// Informational weight-model tag carried through from the input.
    #[must_use]
    pub fn weight_model(&self) -> Option<&str> {
        self.weight_model.as_deref()
    }

    pub fn set_weight_model(&mut self, model: impl Into<String>) {
        self.weight_model = Some(model.into());
    }

    /// In-degree of every vertex, counting duplicates and self-loops.
    #[must_use]
    pub fn in_degrees(&self) -> Vec<usize> {
        let mut in_degree = vec![0; self.vertex_count()];
        for (_, edge) in self.edges() {
            in_degree[edge.to] += 1;
        }
        in_degree
    }

    /// `true` if `v` has at least one edge to itself.
    #[must_use]
    pub fn has_self_loop(&self, v: usize) -> bool {
        self.adjacency
            .get(v)
            .is_some_and(|edges| edges.iter().any(|e| e.to == v))
    }

    /// Build the transpose: every `u → v (w)` becomes `v → u (w)`.
    ///
    /// Sources are scanned ascending, so each transposed adjacency list is
    /// ordered by original source vertex, then original insertion order.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut transposed = Self::new(self.vertex_count(), self.directed);
        for (u, edge) in self.edges() {
            transposed.adjacency[edge.to].push(Edge {
                to: u,
                weight: edge.weight,
            });
        }
        transposed.source = self.source;
        transposed.weight_model.clone_from(&self.weight_model);
        transposed
    }

    /// BLAKE3 digest of the vertex count and edge list in insertion order.
    ///
    /// Two graphs with the same hash present identical input to every
    /// engine. Formatted as `blake3:<hex>`.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.vertex_count() as u64).to_le_bytes());
        for (u, edge) in self.edges() {
            hasher.update(&(u as u64).to_le_bytes());
            hasher.update(&(edge.to as u64).to_le_bytes());
            hasher.update(&edge.weight.to_le_bytes());
        }
        format!("blake3:{}", hasher.finalize().to_hex())
    }

    fn check_vertex(&self, vertex: usize) -> Result<(), GraphError> {
        if vertex < self.adjacency.len() {
            Ok(())
        } else {
            Err(GraphError::VertexOutOfRange {
                vertex,
                vertex_count: self.adjacency.len(),
            })
        }
    }
}
