//! JSON graph documents.
//!
//! The on-disk shape is
//!
//! ```json
//! { "directed": true, "n": 4,
//!   "edges": [ { "u": 0, "v": 1, "w": 2 } ],
//!   "source": 0, "weight_model": "edge" }
//! ```
//!
//! Edges are inserted in document order, so the document order *is* the
//! adjacency order every engine observes. Unlike [`Graph::add_edge`], loading
//! validates endpoints and reports bad ones as [`GraphError`] values.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::Graph;
use crate::error::GraphError;

/// Serde mirror of a graph document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default = "default_directed")]
    pub directed: bool,
    pub n: usize,
    #[serde(default)]
    pub edges: Vec<EdgeData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_model: Option<String>,
}

/// One edge record: `u → v` with weight `w`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeData {
    pub u: usize,
    pub v: usize,
    pub w: i64,
}

const fn default_directed() -> bool {
    true
}

/// Largest vertex count a document may declare.
pub const MAX_VERTICES: usize = 1 << 24;

impl Graph {
    /// Build a graph from a parsed document.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::TooManyVertices`] when `n` exceeds
    /// [`MAX_VERTICES`], checked before anything is allocated, and
    /// [`GraphError::VertexOutOfRange`] for the first edge endpoint or source
    /// outside `[0, n)`.
    pub fn from_data(data: GraphData) -> Result<Self, GraphError> {
        if data.n > MAX_VERTICES {
            return Err(GraphError::TooManyVertices {
                vertex_count: data.n,
                limit: MAX_VERTICES,
            });
        }
        let mut graph = Self::new(data.n, data.directed);
        for edge in &data.edges {
            graph.try_add_edge(edge.u, edge.v, edge.w)?;
        }
        if let Some(source) = data.source {
            graph.set_source(source)?;
        }
        if let Some(model) = data.weight_model {
            graph.set_weight_model(model);
        }
        Ok(graph)
    }

    /// Convert back into a document, emitting edges in adjacency order.
    #[must_use]
    pub fn to_data(&self) -> GraphData {
        GraphData {
            directed: self.is_directed(),
            n: self.vertex_count(),
            edges: self
                .edges()
                .map(|(u, e)| EdgeData {
                    u,
                    v: e.to,
                    w: e.weight,
                })
                .collect(),
            source: self.source(),
            weight_model: self.weight_model().map(str::to_string),
        }
    }

    /// Parse a graph document from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Json`] for malformed JSON and
    /// [`GraphError::VertexOutOfRange`] for invalid endpoints.
    pub fn from_json_str(json: &str) -> Result<Self, GraphError> {
        let data: GraphData = serde_json::from_str(json)?;
        Self::from_data(data)
    }

    /// Load a graph document from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`Graph::from_json_str`].
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| GraphError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let graph = Self::from_json_str(&content)?;
        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "graph loaded"
        );
        Ok(graph)
    }

    /// Write this graph to `path` as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Io`] if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), GraphError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&self.to_data())?;
        std::fs::write(path, json).map_err(|source| GraphError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
