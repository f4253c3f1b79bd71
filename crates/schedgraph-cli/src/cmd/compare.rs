//! `sg compare` — Tarjan vs Kosaraju over repeated runs.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use schedgraph_core::metrics::millis;
use schedgraph_core::{Graph, SccEngine, SccResult};
use serde::Serialize;
use tracing::{debug, instrument};

use super::{dataset_name, expand_inputs, load_graph};
use crate::error::CliFailure;
use crate::output::{OutputMode, Table, pretty_section, render_mode};
use crate::timing::{StageTimings, percentile, scc_stage};

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Graph files or directories of `*.json` graphs.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Runs per engine and dataset; defaults to `analysis.runs` from `sg.toml`.
    #[arg(long)]
    pub runs: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
struct EngineSummary {
    engine: SccEngine,
    dfs_visits: u64,
    edges_explored: u64,
    p50_ms: f64,
    p95_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
struct DatasetComparison {
    dataset: String,
    nodes: usize,
    edges: usize,
    components: usize,
    runs: usize,
    engines: Vec<EngineSummary>,
    faster: SccEngine,
    /// Slower p50 over faster p50; absent when the faster time rounds to 0.
    speedup: Option<f64>,
}

#[derive(Debug, Serialize)]
struct CompareOutput {
    datasets: Vec<DatasetComparison>,
}

/// Execute `sg compare`.
///
/// # Errors
///
/// Returns an error if a file cannot be loaded or the engines disagree on
/// any run.
#[instrument(name = "cmd.compare", skip_all, fields(inputs = args.paths.len()))]
pub fn run_compare(
    args: &CompareArgs,
    default_runs: usize,
    output: OutputMode,
    timings: &mut StageTimings,
) -> Result<()> {
    let runs = args.runs.unwrap_or(default_runs).max(1);
    let mut datasets = Vec::new();
    for path in expand_inputs(&args.paths)? {
        let graph = load_graph(&path)?;
        let comparison = compare_engines(&graph, runs, timings)
            .map_err(|run| CliFailure::EngineDisagreement {
                path: path.clone(),
                run,
            })?;
        datasets.push(DatasetComparison {
            dataset: dataset_name(&path),
            ..comparison
        });
    }

    render_mode(
        output,
        &CompareOutput { datasets },
        render_compare_text,
        render_compare_pretty,
    )
}

/// Which engine was faster and by how much, from two timings.
#[must_use]
pub fn speedup(tarjan: Duration, kosaraju: Duration) -> (SccEngine, Option<f64>) {
    let faster = if tarjan < kosaraju {
        SccEngine::Tarjan
    } else {
        SccEngine::Kosaraju
    };
    let (fast, slow) = (tarjan.min(kosaraju), tarjan.max(kosaraju));
    let ratio = (!fast.is_zero()).then(|| slow.as_secs_f64() / fast.as_secs_f64());
    (faster, ratio)
}

/// Run both engines `runs` times, recording each run's time under its
/// engine stage. `Err(run)` names the first run on which the partitions
/// differed.
fn compare_engines(
    graph: &Graph,
    runs: usize,
    timings: &mut StageTimings,
) -> Result<DatasetComparison, usize> {
    let mut samples: Vec<Vec<Duration>> = vec![Vec::with_capacity(runs); SccEngine::ALL.len()];
    let mut last: Vec<Option<SccResult>> = vec![None; SccEngine::ALL.len()];

    for run in 1..=runs {
        for (slot, engine) in SccEngine::ALL.into_iter().enumerate() {
            let result = engine.run(graph);
            let elapsed = result.metrics().elapsed;
            timings.record(scc_stage(engine), elapsed);
            samples[slot].push(elapsed);
            last[slot] = Some(result);
        }
        let agree = match (&last[0], &last[1]) {
            (Some(a), Some(b)) => a.same_partition(b),
            _ => false,
        };
        if !agree {
            return Err(run);
        }
        debug!(run, "engines agree");
    }

    let mut engines = Vec::with_capacity(SccEngine::ALL.len());
    let mut p50s = Vec::with_capacity(SccEngine::ALL.len());
    for ((engine, mut times), result) in SccEngine::ALL.into_iter().zip(samples).zip(&last) {
        times.sort_unstable();
        let metrics = result.as_ref().map(SccResult::metrics).unwrap_or_default();
        let p50 = percentile(&times, 50);
        p50s.push(p50);
        engines.push(EngineSummary {
            engine,
            dfs_visits: metrics.dfs_visits,
            edges_explored: metrics.edges_explored,
            p50_ms: millis(p50),
            p95_ms: millis(percentile(&times, 95)),
        });
    }
    let (faster, ratio) = speedup(p50s[0], p50s[1]);

    Ok(DatasetComparison {
        dataset: String::new(),
        nodes: graph.vertex_count(),
        edges: graph.edge_count(),
        components: last[0].as_ref().map_or(0, SccResult::len),
        runs,
        engines,
        faster,
        speedup: ratio,
    })
}

/// `2.50x`, or `N/A` without a ratio.
#[must_use]
pub fn speedup_cell(speedup: Option<f64>) -> String {
    speedup.map_or_else(|| "N/A".to_string(), |s| format!("{s:.2}x"))
}

fn render_compare_text(payload: &CompareOutput, w: &mut dyn Write) -> io::Result<()> {
    for d in &payload.datasets {
        write!(
            w,
            "dataset={} nodes={} edges={} sccs={} runs={}",
            d.dataset, d.nodes, d.edges, d.components, d.runs
        )?;
        for e in &d.engines {
            write!(
                w,
                " {name}_p50_ms={:.3} {name}_p95_ms={:.3} {name}_dfs_visits={} {name}_edges_explored={}",
                e.p50_ms,
                e.p95_ms,
                e.dfs_visits,
                e.edges_explored,
                name = e.engine
            )?;
        }
        writeln!(w, " faster={} speedup={}", d.faster, speedup_cell(d.speedup))?;
    }
    Ok(())
}

fn render_compare_pretty(payload: &CompareOutput, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Tarjan vs Kosaraju")?;
    let mut table = Table::new([
        "Dataset",
        "Nodes",
        "Edges",
        "SCCs",
        "Runs",
        "Tarjan p50",
        "Tarjan p95",
        "Kosaraju p50",
        "Kosaraju p95",
        "Faster",
        "Speedup",
    ]);
    for d in &payload.datasets {
        let mut row = vec![
            d.dataset.clone(),
            d.nodes.to_string(),
            d.edges.to_string(),
            d.components.to_string(),
            d.runs.to_string(),
        ];
        for e in &d.engines {
            row.push(format!("{:.3}", e.p50_ms));
            row.push(format!("{:.3}", e.p95_ms));
        }
        row.push(d.faster.to_string());
        row.push(speedup_cell(d.speedup));
        table.row(row);
    }
    table.write(w)?;

    writeln!(w)?;
    pretty_section(w, "Work counters")?;
    let mut counters = Table::new(["Dataset", "Engine", "DFS Visits", "Edges Explored"]);
    for d in &payload.datasets {
        for e in &d.engines {
            counters.row([
                d.dataset.clone(),
                e.engine.to_string(),
                e.dfs_visits.to_string(),
                e.edges_explored.to_string(),
            ]);
        }
    }
    counters.write(w)
}
