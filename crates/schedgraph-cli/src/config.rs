//! `sg.toml` loading.
//!
//! Every key is optional. Lookup order: `--config <path>` (must exist),
//! then `./sg.toml`, then built-in defaults.

use std::path::{Path, PathBuf};

use schedgraph_core::SccEngine;
use schedgraph_sim::DEFAULT_SEED;
use serde::{Deserialize, Serialize};

use crate::error::CliFailure;
use crate::output::OutputMode;

pub const CONFIG_FILE: &str = "sg.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SgConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub generate: GenerateConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Engine whose partition drives condensation and scheduling.
    #[serde(default)]
    pub engine: SccEngine,
    /// Default repetition count for `sg compare`.
    #[serde(default = "default_runs")]
    pub runs: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            engine: SccEngine::default(),
            runs: default_runs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            out_dir: default_out_dir(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: Option<OutputMode>,
}

const fn default_runs() -> usize {
    1
}

const fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Load the effective config.
///
/// # Errors
///
/// Returns [`CliFailure::ConfigRead`] if `explicit` names a file that cannot
/// be read, and [`CliFailure::ConfigParse`] if the chosen file is not valid
/// TOML for [`SgConfig`].
pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<SgConfig, CliFailure> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let implicit = cwd.join(CONFIG_FILE);
            if !implicit.exists() {
                return Ok(SgConfig::default());
            }
            implicit
        }
    };

    let content = std::fs::read_to_string(&path).map_err(|source| CliFailure::ConfigRead {
        path: path.clone(),
        source,
    })?;
    let config = toml::from_str(&content)
        .map_err(|source| CliFailure::ConfigParse { path: path.clone(), source })?;
    tracing::debug!(path = %path.display(), "config loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_implicit_file_yields_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let config = load(None, dir.path()).expect("defaults");
        assert_eq!(config, SgConfig::default());
        assert_eq!(config.analysis.runs, 1);
        assert_eq!(config.generate.seed, 42);
        assert_eq!(config.generate.out_dir, PathBuf::from("data"));
        assert_eq!(config.output.format, None);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[analysis]\nengine = \"kosaraju\"\n\n[output]\nformat = \"json\"\n",
        )
        .expect("write config");

        let config = load(None, dir.path()).expect("parse");
        assert_eq!(config.analysis.engine, SccEngine::Kosaraju);
        assert_eq!(config.analysis.runs, 1);
        assert_eq!(config.generate, GenerateConfig::default());
        assert_eq!(config.output.format, Some(OutputMode::Json));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = TempDir::new().expect("tempdir");
        let err = load(Some(&dir.path().join("nope.toml")), dir.path()).expect_err("missing");
        assert!(matches!(err, CliFailure::ConfigRead { .. }));
    }

    #[test]
    fn bad_values_are_parse_errors() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[analysis]\nengine = \"dijkstra\"\n").expect("write config");

        let err = load(Some(&path), dir.path()).expect_err("unknown engine");
        assert!(matches!(err, CliFailure::ConfigParse { .. }));
        assert!(err.to_string().contains("custom.toml"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join(CONFIG_FILE), "[generate]\nsed = 7\n")
            .expect("write config");
        assert!(load(None, dir.path()).is_err());
    }
}
