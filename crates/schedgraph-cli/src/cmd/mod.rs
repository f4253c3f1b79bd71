pub mod analyze;
pub mod compare;
pub mod completions;
pub mod generate;
pub mod report;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use schedgraph_core::Graph;

/// Load a graph document, naming the file in any error.
pub fn load_graph(path: &Path) -> Result<Graph> {
    Graph::load(path).with_context(|| format!("failed to load {}", path.display()))
}

/// Directories expand to their `*.json` files, sorted; files pass through.
pub fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = std::fs::read_dir(input)
                .with_context(|| format!("failed to list {}", input.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

/// Short dataset label: the file stem.
#[must_use]
pub fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn directories_expand_to_sorted_json_files() {
        let dir = TempDir::new().expect("tempdir");
        for name in ["b.json", "a.json", "notes.txt"] {
            std::fs::write(dir.path().join(name), "{}").expect("write");
        }
        std::fs::create_dir(dir.path().join("nested.json")).expect("mkdir");
        let extra = PathBuf::from("explicit.json");

        let files =
            expand_inputs(&[dir.path().to_path_buf(), extra.clone()]).expect("expand inputs");
        assert_eq!(
            files,
            vec![dir.path().join("a.json"), dir.path().join("b.json"), extra]
        );
    }

    #[test]
    fn dataset_name_is_stem() {
        assert_eq!(dataset_name(Path::new("data/small_dag.json")), "small_dag");
    }

    #[test]
    fn load_graph_names_the_file() {
        let err = load_graph(Path::new("/nonexistent/g.json")).expect_err("missing file");
        assert!(format!("{err:#}").contains("/nonexistent/g.json"));
    }
}
