use std::fmt;
use std::path::PathBuf;

/// Errors raised at the validating boundary of the graph model.
///
/// The engines themselves never fail: cycles, unreachable vertices and
/// partial orders are all represented in their typed results. These errors
/// only come from loading or mutating a [`crate::graph::Graph`] with input
/// that violates its invariants.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// An edge endpoint or designated source lies outside `[0, n)`.
    #[error("vertex {vertex} is out of range for a graph with {vertex_count} vertices")]
    VertexOutOfRange { vertex: usize, vertex_count: usize },

    /// A document declares more vertices than the loader accepts.
    #[error("graph declares {vertex_count} vertices; at most {limit} are supported")]
    TooManyVertices { vertex_count: usize, limit: usize },

    /// The graph document could not be read or written.
    #[error("failed to access graph file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The graph document is not valid JSON for the expected schema.
    #[error("invalid graph document: {0}")]
    Json(#[from] serde_json::Error),
}

impl GraphError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::VertexOutOfRange { .. } => ErrorCode::VertexOutOfRange,
            Self::TooManyVertices { .. } => ErrorCode::GraphTooLarge,
            Self::Io { .. } => ErrorCode::GraphFileUnreadable,
            Self::Json(_) => ErrorCode::GraphParseError,
        }
    }
}

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    GraphFileUnreadable,
    GraphParseError,
    VertexOutOfRange,
    GraphTooLarge,
    NoGraphsAnalyzed,
    EngineDisagreement,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::GraphFileUnreadable => "E2001",
            Self::GraphParseError => "E2002",
            Self::VertexOutOfRange => "E2003",
            Self::GraphTooLarge => "E2004",
            Self::NoGraphsAnalyzed => "E3001",
            Self::EngineDisagreement => "E4001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::GraphFileUnreadable => "Graph file could not be read",
            Self::GraphParseError => "Graph file is not a valid graph document",
            Self::VertexOutOfRange => "Edge or source refers to a missing vertex",
            Self::GraphTooLarge => "Graph declares too many vertices",
            Self::NoGraphsAnalyzed => "No graph could be analyzed",
            Self::EngineDisagreement => "SCC engines produced different partitions",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in sg.toml and retry."),
            Self::GraphFileUnreadable => Some("Check the path and read permissions."),
            Self::GraphParseError => {
                Some("Expected {\"n\": .., \"edges\": [{\"u\": .., \"v\": .., \"w\": ..}]}.")
            }
            Self::VertexOutOfRange => Some("Every edge endpoint and the source must be in [0, n)."),
            Self::GraphTooLarge => Some("A document may declare at most 2^24 vertices."),
            Self::NoGraphsAnalyzed => Some("Run `sg generate` to create the standard datasets."),
            Self::EngineDisagreement => Some("Report a bug with the graph file attached."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCode, GraphError};
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::ConfigParseError,
            ErrorCode::GraphFileUnreadable,
            ErrorCode::GraphParseError,
            ErrorCode::VertexOutOfRange,
            ErrorCode::GraphTooLarge,
            ErrorCode::NoGraphsAnalyzed,
            ErrorCode::EngineDisagreement,
            ErrorCode::InternalUnexpected,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::VertexOutOfRange.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn graph_error_maps_to_code() {
        let err = GraphError::VertexOutOfRange {
            vertex: 9,
            vertex_count: 3,
        };
        assert_eq!(err.code(), ErrorCode::VertexOutOfRange);
        assert_eq!(
            err.to_string(),
            "vertex 9 is out of range for a graph with 3 vertices"
        );
    }
}
