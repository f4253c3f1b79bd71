use std::path::PathBuf;

use schedgraph_core::{ErrorCode, GraphError};

/// Failures raised by the CLI layer itself.
#[derive(Debug, thiserror::Error)]
pub enum CliFailure {
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no graph could be analyzed from {inputs} input(s)")]
    NoGraphsAnalyzed { inputs: usize },

    #[error("tarjan and kosaraju disagree on {path} (run {run})")]
    EngineDisagreement { path: PathBuf, run: usize },
}

impl CliFailure {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::ConfigRead { .. } | Self::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Self::NoGraphsAnalyzed { .. } => ErrorCode::NoGraphsAnalyzed,
            Self::EngineDisagreement { .. } => ErrorCode::EngineDisagreement,
        }
    }
}

/// First typed error in the chain decides the code.
#[must_use]
pub fn code_for(err: &anyhow::Error) -> ErrorCode {
    err.chain()
        .find_map(|cause| {
            cause
                .downcast_ref::<GraphError>()
                .map(GraphError::code)
                .or_else(|| cause.downcast_ref::<CliFailure>().map(CliFailure::code))
        })
        .unwrap_or(ErrorCode::InternalUnexpected)
}
