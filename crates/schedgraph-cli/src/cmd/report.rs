//! `sg report` — batch analysis with the five comparison tables.
//!
//! A file that fails to load or analyze is logged and listed as skipped;
//! the command fails only when nothing could be analyzed.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use schedgraph_core::metrics::millis;
use schedgraph_core::{AnalysisOptions, AnalysisReport, GraphKind, PathScope, SccEngine, analyze};
use serde::Serialize;
use tracing::{instrument, warn};

use super::compare::{speedup, speedup_cell};
use super::{dataset_name, expand_inputs, load_graph};
use crate::error::CliFailure;
use crate::output::{OutputMode, Table, dist_cell, pretty_kv, pretty_section, render_mode};
use crate::timing::StageTimings;

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Graph files or directories of `*.json` graphs.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// SCC engine driving condensation: tarjan or kosaraju.
    #[arg(long)]
    pub engine: Option<SccEngine>,
}

#[derive(Debug, Clone, Copy, Serialize)]
struct EngineCell {
    dfs_visits: u64,
    edges_explored: u64,
    ms: f64,
}

#[derive(Debug, Clone, Serialize)]
struct PathRow {
    scope: PathScope,
    /// Largest finite shortest distance from the source.
    max_distance: Option<i64>,
    sp_relaxations: u64,
    sp_ms: f64,
    critical_length: Option<i64>,
    critical_path: Vec<usize>,
    lp_relaxations: u64,
    lp_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
struct DatasetRow {
    dataset: String,
    nodes: usize,
    edges: usize,
    density: f64,
    sccs: usize,
    largest_scc: usize,
    kind: GraphKind,
    tarjan: EngineCell,
    kosaraju: EngineCell,
    faster: SccEngine,
    speedup: Option<f64>,
    topo_pushes: u64,
    topo_pops: u64,
    topo_ms: f64,
    condensation_is_dag: bool,
    paths: Option<PathRow>,
}

#[derive(Debug, Clone, Serialize)]
struct Skipped {
    path: String,
    error: String,
}

#[derive(Debug, Clone, Serialize)]
struct Summary {
    analyzed: usize,
    avg_tarjan_ms: f64,
    avg_kosaraju_ms: f64,
    tarjan_faster: usize,
}

#[derive(Debug, Serialize)]
struct ReportOutput {
    datasets: Vec<DatasetRow>,
    skipped: Vec<Skipped>,
    summary: Summary,
}

/// Execute `sg report`.
///
/// # Errors
///
/// Returns [`CliFailure::NoGraphsAnalyzed`] if no input could be analyzed,
/// or an error if output cannot be written.
#[instrument(name = "cmd.report", skip_all, fields(inputs = args.paths.len()))]
pub fn run_report(
    args: &ReportArgs,
    default_engine: SccEngine,
    output: OutputMode,
    timings: &mut StageTimings,
) -> Result<()> {
    let options = AnalysisOptions {
        engine: args.engine.unwrap_or(default_engine),
        source: None,
    };
    let files = expand_inputs(&args.paths)?;

    let mut datasets = Vec::with_capacity(files.len());
    let mut skipped = Vec::new();
    for path in &files {
        match analyze_file(path, &options) {
            Ok(report) => {
                timings.record_analysis(&report);
                datasets.push(row_for(&dataset_name(path), &report));
            }
            Err(err) => {
                warn!(path = %path.display(), error = %format!("{err:#}"), "skipping dataset");
                skipped.push(Skipped {
                    path: path.display().to_string(),
                    error: format!("{err:#}"),
                });
            }
        }
    }

    if datasets.is_empty() {
        return Err(CliFailure::NoGraphsAnalyzed {
            inputs: files.len(),
        }
        .into());
    }

    let summary = summarize(&datasets);
    render_mode(
        output,
        &ReportOutput {
            datasets,
            skipped,
            summary,
        },
        render_report_text,
        render_report_pretty,
    )
}

fn analyze_file(path: &Path, options: &AnalysisOptions) -> Result<AnalysisReport> {
    let graph = load_graph(path)?;
    Ok(analyze(&graph, options)?)
}

fn engine_cell(report: &AnalysisReport, engine: SccEngine) -> EngineCell {
    let metrics = report.engine_metrics(engine).unwrap_or_default();
    EngineCell {
        dfs_visits: metrics.dfs_visits,
        edges_explored: metrics.edges_explored,
        ms: millis(metrics.elapsed),
    }
}

fn row_for(dataset: &str, report: &AnalysisReport) -> DatasetRow {
    let stats = &report.stats;
    let (faster, ratio) = speedup(
        report
            .engine_metrics(SccEngine::Tarjan)
            .unwrap_or_default()
            .elapsed,
        report
            .engine_metrics(SccEngine::Kosaraju)
            .unwrap_or_default()
            .elapsed,
    );
    let topo = &report.condensation_topo;

    DatasetRow {
        dataset: dataset.to_string(),
        nodes: stats.nodes,
        edges: stats.edges,
        density: stats.density,
        sccs: stats.scc_count,
        largest_scc: stats.largest_scc,
        kind: stats.kind,
        tarjan: engine_cell(report, SccEngine::Tarjan),
        kosaraju: engine_cell(report, SccEngine::Kosaraju),
        faster,
        speedup: ratio,
        topo_pushes: topo.metrics.pushes,
        topo_pops: topo.metrics.pops,
        topo_ms: millis(topo.metrics.elapsed),
        condensation_is_dag: topo.is_dag,
        paths: report.paths.as_ref().map(|p| PathRow {
            scope: p.scope,
            max_distance: p.shortest.dist.iter().flatten().max().copied(),
            sp_relaxations: p.shortest.metrics.relaxations,
            sp_ms: millis(p.shortest.metrics.elapsed),
            critical_length: p.longest.critical_length,
            critical_path: p.longest.critical_path.clone(),
            lp_relaxations: p.longest.metrics.relaxations,
            lp_ms: millis(p.longest.metrics.elapsed),
        }),
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    values.sum::<f64>() / count as f64
}

fn summarize(rows: &[DatasetRow]) -> Summary {
    Summary {
        analyzed: rows.len(),
        avg_tarjan_ms: mean(rows.iter().map(|r| r.tarjan.ms), rows.len()),
        avg_kosaraju_ms: mean(rows.iter().map(|r| r.kosaraju.ms), rows.len()),
        tarjan_faster: rows
            .iter()
            .filter(|r| r.faster == SccEngine::Tarjan)
            .count(),
    }
}

const fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

fn render_report_text(payload: &ReportOutput, w: &mut dyn Write) -> io::Result<()> {
    for r in &payload.datasets {
        write!(
            w,
            "dataset={} nodes={} edges={} density={:.3} sccs={} largest_scc={} kind={} \
             tarjan_ms={:.3} kosaraju_ms={:.3} faster={} topo_pushes={} topo_pops={} \
             condensation_dag={}",
            r.dataset,
            r.nodes,
            r.edges,
            r.density,
            r.sccs,
            r.largest_scc,
            r.kind,
            r.tarjan.ms,
            r.kosaraju.ms,
            r.faster,
            r.topo_pushes,
            r.topo_pops,
            r.condensation_is_dag
        )?;
        if let Some(p) = &r.paths {
            write!(
                w,
                " max_dist={} sp_relax={} critical_len={} lp_relax={}",
                dist_cell(p.max_distance),
                p.sp_relaxations,
                dist_cell(p.critical_length),
                p.lp_relaxations
            )?;
        }
        writeln!(w)?;
    }
    for s in &payload.skipped {
        writeln!(w, "skipped={} error={}", s.path, s.error)?;
    }
    let sum = &payload.summary;
    writeln!(
        w,
        "summary analyzed={} avg_tarjan_ms={:.3} avg_kosaraju_ms={:.3} tarjan_faster={}/{}",
        sum.analyzed, sum.avg_tarjan_ms, sum.avg_kosaraju_ms, sum.tarjan_faster, sum.analyzed
    )
}

fn render_report_pretty(payload: &ReportOutput, w: &mut dyn Write) -> io::Result<()> {
    let rows = &payload.datasets;

    pretty_section(w, "Table 1: Dataset Overview")?;
    let mut t1 = Table::new([
        "Dataset",
        "Nodes",
        "Edges",
        "Density",
        "SCCs",
        "Largest SCC",
        "Type",
    ]);
    for r in rows {
        t1.row([
            r.dataset.clone(),
            r.nodes.to_string(),
            r.edges.to_string(),
            format!("{:.3}", r.density),
            r.sccs.to_string(),
            r.largest_scc.to_string(),
            r.kind.to_string(),
        ]);
    }
    t1.write(w)?;

    writeln!(w)?;
    pretty_section(w, "Table 2: Tarjan vs Kosaraju")?;
    let mut t2 = Table::new([
        "Dataset",
        "Nodes",
        "Tarjan (ms)",
        "Kosaraju (ms)",
        "Faster",
        "Speedup",
    ]);
    for r in rows {
        t2.row([
            r.dataset.clone(),
            r.nodes.to_string(),
            format!("{:.3}", r.tarjan.ms),
            format!("{:.3}", r.kosaraju.ms),
            r.faster.to_string(),
            speedup_cell(r.speedup),
        ]);
    }
    t2.write(w)?;

    writeln!(w)?;
    pretty_section(w, "Table 3: SCC Detection (Tarjan)")?;
    let mut t3 = Table::new([
        "Dataset",
        "Nodes",
        "Edges",
        "SCCs",
        "DFS Visits",
        "Edges Explored",
        "Time (ms)",
    ]);
    for r in rows {
        t3.row([
            r.dataset.clone(),
            r.nodes.to_string(),
            r.edges.to_string(),
            r.sccs.to_string(),
            r.tarjan.dfs_visits.to_string(),
            r.tarjan.edges_explored.to_string(),
            format!("{:.3}", r.tarjan.ms),
        ]);
    }
    t3.write(w)?;

    writeln!(w)?;
    pretty_section(w, "Table 4: Topological Sort (on Condensation)")?;
    let mut t4 = Table::new([
        "Dataset",
        "Nodes",
        "SCCs",
        "Pushes",
        "Pops",
        "Time (ms)",
        "Is DAG?",
    ]);
    for r in rows {
        t4.row([
            r.dataset.clone(),
            r.nodes.to_string(),
            r.sccs.to_string(),
            r.topo_pushes.to_string(),
            r.topo_pops.to_string(),
            format!("{:.3}", r.topo_ms),
            yes_no(r.condensation_is_dag).to_string(),
        ]);
    }
    t4.write(w)?;

    writeln!(w)?;
    pretty_section(w, "Table 5: DAG Shortest/Longest Paths")?;
    let mut t5 = Table::new([
        "Dataset",
        "Scope",
        "Max Dist",
        "SP Relax",
        "SP (ms)",
        "Critical Len",
        "LP Relax",
        "LP (ms)",
    ]);
    for r in rows {
        match &r.paths {
            Some(p) => t5.row([
                r.dataset.clone(),
                match p.scope {
                    PathScope::Original => "original".to_string(),
                    PathScope::Condensation => "condensation".to_string(),
                },
                dist_cell(p.max_distance),
                p.sp_relaxations.to_string(),
                format!("{:.3}", p.sp_ms),
                dist_cell(p.critical_length),
                p.lp_relaxations.to_string(),
                format!("{:.3}", p.lp_ms),
            ]),
            None => {
                let mut cells = vec![r.dataset.clone()];
                cells.extend(std::iter::repeat_n("N/A".to_string(), 7));
                t5.row(cells);
            }
        }
    }
    t5.write(w)?;

    if !payload.skipped.is_empty() {
        writeln!(w)?;
        pretty_section(w, "Skipped")?;
        for s in &payload.skipped {
            writeln!(w, "  {}: {}", s.path, s.error)?;
        }
    }

    let sum = &payload.summary;
    writeln!(w)?;
    pretty_section(w, "Summary")?;
    pretty_kv(w, "Analyzed", sum.analyzed.to_string())?;
    pretty_kv(w, "Avg Tarjan", format!("{:.3} ms", sum.avg_tarjan_ms))?;
    pretty_kv(w, "Avg Kosaraju", format!("{:.3} ms", sum.avg_kosaraju_ms))?;
    pretty_kv(
        w,
        "Tarjan faster",
        format!("{}/{} datasets", sum.tarjan_faster, sum.analyzed),
    )
}
