//! Seeded synthesis of graph documents.
//!
//! Three shapes:
//!
//! - **DAG**: every `u < v` pair becomes an edge with probability
//!   `density`. Edges only point up the index order, so the result is
//!   acyclic by construction.
//! - **Cyclic**: a ring `i → (i + 1) mod n` through every vertex, topped up
//!   with random non-self-loop edges until `n * (n - 1) * density` edges
//!   exist. The ring alone makes the whole graph one SCC.
//! - **Multi-SCC**: `k` consecutive blocks, each closed into a ring with
//!   random internal chords, chained by one forward edge per block pair.
//!
//! Weights are uniform in `[1, 10]`. Every document names vertex 0 as
//! source and carries the `"edge"` weight model.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::Rng;
use schedgraph_core::{EdgeData, GraphData};
use tracing::{debug, info, instrument};

use crate::rng::DeterministicRng;

pub const DEFAULT_SEED: u64 = 42;

const WEIGHT_MODEL: &str = "edge";

/// Shape and size parameter of one dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Dag { density: f64 },
    Cyclic { density: f64 },
    MultiScc { blocks: usize },
}

/// One named entry of a dataset suite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetSpec {
    pub name: &'static str,
    pub n: usize,
    pub shape: Shape,
}

/// The nine standard datasets: small, medium and large of each shape.
pub const STANDARD_SUITE: [DatasetSpec; 9] = [
    DatasetSpec {
        name: "small_dag_1",
        n: 6,
        shape: Shape::Dag { density: 0.3 },
    },
    DatasetSpec {
        name: "small_cyclic_1",
        n: 8,
        shape: Shape::Cyclic { density: 0.2 },
    },
    DatasetSpec {
        name: "small_mixed_1",
        n: 10,
        shape: Shape::MultiScc { blocks: 2 },
    },
    DatasetSpec {
        name: "medium_dag_1",
        n: 12,
        shape: Shape::Dag { density: 0.25 },
    },
    DatasetSpec {
        name: "medium_cyclic_1",
        n: 15,
        shape: Shape::Cyclic { density: 0.2 },
    },
    DatasetSpec {
        name: "medium_mixed_1",
        n: 18,
        shape: Shape::MultiScc { blocks: 3 },
    },
    DatasetSpec {
        name: "large_dag_1",
        n: 25,
        shape: Shape::Dag { density: 0.15 },
    },
    DatasetSpec {
        name: "large_cyclic_1",
        n: 35,
        shape: Shape::Cyclic { density: 0.1 },
    },
    DatasetSpec {
        name: "large_mixed_1",
        n: 40,
        shape: Shape::MultiScc { blocks: 4 },
    },
];

/// Deterministic graph generator. The same seed and call sequence always
/// yields the same documents.
#[derive(Debug, Clone)]
pub struct DatasetGenerator {
    rng: DeterministicRng,
}

impl Default for DatasetGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl DatasetGenerator {
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            rng: DeterministicRng::new(seed),
        }
    }

    fn weight(&mut self) -> i64 {
        self.rng.gen_range(1..=10)
    }

    fn edge(&mut self, u: usize, v: usize) -> EdgeData {
        EdgeData {
            u,
            v,
            w: self.weight(),
        }
    }

    /// Random DAG over `n` vertices.
    #[must_use]
    pub fn generate_dag(&mut self, n: usize, density: f64) -> GraphData {
        let p = clamp_probability(density);
        let mut edges = Vec::new();
        for u in 0..n {
            for v in u + 1..n {
                if self.rng.gen_bool(p) {
                    edges.push(self.edge(u, v));
                }
            }
        }
        document(n, edges)
    }

    /// Ring plus random extra edges. With `n == 1` the ring is a self-loop.
    #[must_use]
    pub fn generate_cyclic(&mut self, n: usize, density: f64) -> GraphData {
        let mut edges: Vec<EdgeData> = (0..n).map(|i| self.edge(i, (i + 1) % n)).collect();

        let target = target_edge_count(n, clamp_probability(density));
        while edges.len() < target {
            let u = self.rng.gen_range(0..n);
            let v = self.rng.gen_range(0..n);
            if u != v {
                edges.push(self.edge(u, v));
            }
        }
        document(n, edges)
    }

    /// `blocks` ring-shaped SCCs chained in index order.
    ///
    /// `blocks` is clamped to `1..=n`; the last block absorbs the
    /// remainder when `n` is not a multiple of `blocks`.
    #[must_use]
    pub fn generate_multi_scc(&mut self, n: usize, blocks: usize) -> GraphData {
        if n == 0 {
            return document(0, Vec::new());
        }
        let blocks = blocks.clamp(1, n);
        let per_block = n / blocks;
        let mut edges = Vec::new();

        for block in 0..blocks {
            let start = block * per_block;
            let end = if block == blocks - 1 {
                n
            } else {
                start + per_block
            };

            for i in start..end {
                let next = if i == end - 1 { start } else { i + 1 };
                edges.push(self.edge(i, next));
            }
            for i in start..end - 1 {
                if self.rng.gen_bool(0.5) {
                    let j = self.rng.gen_range(start..end);
                    if i != j {
                        edges.push(self.edge(i, j));
                    }
                }
            }
        }

        for block in 0..blocks - 1 {
            let u = block * per_block + self.rng.gen_range(0..per_block);
            let v = (block + 1) * per_block + self.rng.gen_range(0..per_block);
            edges.push(self.edge(u, v));
        }

        document(n, edges)
    }

    /// Generate one dataset from its spec.
    #[must_use]
    pub fn generate(&mut self, spec: &DatasetSpec) -> GraphData {
        match spec.shape {
            Shape::Dag { density } => self.generate_dag(spec.n, density),
            Shape::Cyclic { density } => self.generate_cyclic(spec.n, density),
            Shape::MultiScc { blocks } => self.generate_multi_scc(spec.n, blocks),
        }
    }
}

/// Generate [`STANDARD_SUITE`] in order from one seeded stream.
#[must_use]
pub fn standard_suite(seed: u64) -> Vec<(&'static str, GraphData)> {
    let mut generator = DatasetGenerator::new(seed);
    STANDARD_SUITE
        .iter()
        .map(|spec| (spec.name, generator.generate(spec)))
        .collect()
}

/// Write the standard suite as pretty JSON files `<dir>/<name>.json`.
///
/// Creates `dir` if needed and returns the written paths in suite order.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or a file cannot
/// be written.
#[instrument(skip_all, fields(dir = %dir.display(), seed = seed))]
pub fn write_suite(dir: &Path, seed: u64) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create dataset directory {}", dir.display()))?;

    let mut written = Vec::with_capacity(STANDARD_SUITE.len());
    for (name, data) in standard_suite(seed) {
        let path = dir.join(format!("{name}.json"));
        let json = serde_json::to_string_pretty(&data)
            .with_context(|| format!("failed to serialize dataset {name}"))?;
        fs::write(&path, json)
            .with_context(|| format!("failed to write dataset {}", path.display()))?;
        debug!(name, n = data.n, edges = data.edges.len(), "dataset written");
        written.push(path);
    }

    info!(count = written.len(), "dataset suite written");
    Ok(written)
}

fn document(n: usize, edges: Vec<EdgeData>) -> GraphData {
    GraphData {
        directed: true,
        n,
        edges,
        source: (n > 0).then_some(0),
        weight_model: Some(WEIGHT_MODEL.to_string()),
    }
}

fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn target_edge_count(n: usize, density: f64) -> usize {
    if n < 2 {
        return 0;
    }
    ((n * (n - 1)) as f64 * density) as usize
}

#[cfg(test)]
mod tests {
    use schedgraph_core::{Graph, GraphKind, GraphStats, SccAlgorithm, Tarjan, kahn};

    use super::*;

    fn build(data: GraphData) -> Graph {
        Graph::from_data(data).expect("generated data is valid")
    }

    #[test]
    fn dag_edges_point_forward() {
        let data = DatasetGenerator::new(1).generate_dag(30, 0.4);
        assert!(data.edges.iter().all(|e| e.u < e.v));
        assert!(data.edges.iter().all(|e| (1..=10).contains(&e.w)));
        assert!(kahn(&build(data)).is_dag);
    }

    #[test]
    fn dag_density_extremes() {
        let mut generator = DatasetGenerator::new(5);
        assert!(generator.generate_dag(10, 0.0).edges.is_empty());
        assert_eq!(generator.generate_dag(10, 1.0).edges.len(), 45);
        assert!(generator.generate_dag(10, f64::NAN).edges.is_empty());
    }

    #[test]
    fn cyclic_graph_is_one_component() {
        let data = DatasetGenerator::new(2).generate_cyclic(15, 0.2);
        assert_eq!(data.edges.len(), 42);
        assert!(data.edges.iter().skip(15).all(|e| e.u != e.v));

        let g = build(data);
        assert_eq!(Tarjan.run(&g).len(), 1);
    }

    #[test]
    fn sparse_cyclic_graph_is_just_the_ring() {
        let data = DatasetGenerator::new(2).generate_cyclic(8, 0.1);
        assert_eq!(data.edges.len(), 8);
    }

    #[test]
    fn multi_scc_blocks_become_components() {
        let data = DatasetGenerator::new(3).generate_multi_scc(18, 3);
        let g = build(data);
        let sccs = Tarjan.run(&g);
        let sizes: Vec<usize> = sccs.components().iter().map(|c| c.len()).collect();
        assert_eq!(sizes, vec![6, 6, 6]);

        let condensation = sccs.condense(&g);
        assert_eq!(condensation.edge_count(), 2);
        assert_eq!(kahn(&condensation).order, vec![0, 1, 2]);
    }

    #[test]
    fn multi_scc_last_block_takes_remainder() {
        let g = build(DatasetGenerator::new(4).generate_multi_scc(10, 3));
        let sizes: Vec<usize> = Tarjan
            .run(&g)
            .components()
            .iter()
            .map(|c| c.len())
            .collect();
        assert_eq!(sizes, vec![3, 3, 4]);
    }

    #[test]
    fn multi_scc_degenerate_inputs() {
        let mut generator = DatasetGenerator::default();
        assert_eq!(generator.generate_multi_scc(0, 3).n, 0);
        let g = build(generator.generate_multi_scc(3, 0));
        assert_eq!(Tarjan.run(&g).len(), 1);
    }

    #[test]
    fn suite_matches_standard_shapes() {
        let suite = standard_suite(DEFAULT_SEED);
        assert_eq!(suite.len(), 9);
        for ((name, data), spec) in suite.iter().zip(STANDARD_SUITE.iter()) {
            assert_eq!(*name, spec.name);
            assert_eq!(data.n, spec.n);
            assert_eq!(data.source, Some(0));
            assert_eq!(data.weight_model.as_deref(), Some("edge"));

            let g = build(data.clone());
            let stats = GraphStats::compute(&g, &Tarjan.run(&g));
            let expected = match spec.shape {
                Shape::Dag { .. } => GraphKind::Dag,
                Shape::Cyclic { .. } | Shape::MultiScc { .. } => GraphKind::Cyclic,
            };
            assert_eq!(stats.kind, expected, "{name}");
        }
    }

    #[test]
    fn suite_is_reproducible() {
        assert_eq!(standard_suite(7), standard_suite(7));
        assert_ne!(standard_suite(7), standard_suite(8));
    }

    #[test]
    fn write_suite_creates_loadable_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("data");
        let paths = write_suite(&out, DEFAULT_SEED).expect("write suite");

        assert_eq!(paths.len(), 9);
        assert!(paths[0].ends_with("small_dag_1.json"));
        for path in &paths {
            let g = Graph::load(path).expect("load generated file");
            assert!(g.vertex_count() > 0);
            assert_eq!(g.source(), Some(0));
        }
    }
}
