//! `sg analyze` — full pipeline on one graph file.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use schedgraph_core::metrics::millis;
use schedgraph_core::{AnalysisOptions, AnalysisReport, PathScope, SccEngine, analyze};
use serde::Serialize;
use tracing::instrument;

use super::{dataset_name, load_graph};
use crate::output::{OutputMode, dist_cell, pretty_kv, pretty_section, render_mode};
use crate::timing::StageTimings;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Graph document (JSON).
    pub path: PathBuf,

    /// SCC engine driving condensation: tarjan or kosaraju.
    #[arg(long)]
    pub engine: Option<SccEngine>,

    /// Shortest-path source vertex; defaults to the file's `source`, then 0.
    #[arg(long)]
    pub source: Option<usize>,

    /// Maximum list entries shown in pretty output.
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

#[derive(Debug, Serialize)]
struct AnalyzeOutput<'a> {
    dataset: String,
    path: String,
    #[serde(flatten)]
    report: &'a AnalysisReport,
}

/// Execute `sg analyze`.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded, the source is out of
/// range, or output cannot be written.
#[instrument(name = "cmd.analyze", skip_all, fields(path = %args.path.display()))]
pub fn run_analyze(
    args: &AnalyzeArgs,
    default_engine: SccEngine,
    output: OutputMode,
    timings: &mut StageTimings,
) -> anyhow::Result<()> {
    let graph = load_graph(&args.path)?;
    let options = AnalysisOptions {
        engine: args.engine.unwrap_or(default_engine),
        source: args.source,
    };
    let report = analyze(&graph, &options)?;
    timings.record_analysis(&report);
    let payload = AnalyzeOutput {
        dataset: dataset_name(&args.path),
        path: args.path.display().to_string(),
        report: &report,
    };

    let limit = args.limit;
    render_mode(output, &payload, render_analyze_text, |p, w| {
        render_analyze_pretty(p, limit, w)
    })
}

fn join(vertices: &[usize]) -> String {
    vertices
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn truncated(vertices: &[usize], limit: usize) -> String {
    if vertices.len() <= limit {
        return join(vertices);
    }
    format!(
        "{} … (+{} more)",
        join(&vertices[..limit]),
        vertices.len() - limit
    )
}

fn render_analyze_text(payload: &AnalyzeOutput<'_>, w: &mut dyn Write) -> io::Result<()> {
    let r = payload.report;
    writeln!(w, "dataset={}", payload.dataset)?;
    writeln!(w, "nodes={} edges={}", r.stats.nodes, r.stats.edges)?;
    writeln!(w, "density={:.4}", r.stats.density)?;
    writeln!(
        w,
        "sccs={} largest_scc={} cycles={}",
        r.stats.scc_count, r.stats.largest_scc, r.stats.cycle_count
    )?;
    writeln!(w, "kind={} is_dag={}", r.stats.kind, r.is_dag())?;
    writeln!(w, "engine={} engines_agree={}", r.primary, r.engines_agree)?;
    for run in &r.engine_runs {
        writeln!(
            w,
            "{}_ms={:.3} {}_dfs_visits={} {}_edges_explored={}",
            run.engine,
            millis(run.metrics.elapsed),
            run.engine,
            run.metrics.dfs_visits,
            run.engine,
            run.metrics.edges_explored
        )?;
    }
    writeln!(
        w,
        "topo_pushes={} topo_pops={}",
        r.condensation_topo.metrics.pushes, r.condensation_topo.metrics.pops
    )?;
    writeln!(w, "task_order={}", join(&r.task_order))?;

    if let Some(paths) = &r.paths {
        writeln!(w, "paths_scope={}", scope_label(paths.scope))?;
        writeln!(w, "sp_source={}", paths.source)?;
        writeln!(w, "sp_relaxations={}", paths.shortest.metrics.relaxations)?;
        writeln!(
            w,
            "critical_length={}",
            dist_cell(paths.longest.critical_length)
        )?;
        writeln!(w, "critical_path={}", join(&paths.longest.critical_path))?;
        if let Some(end) = paths.longest.critical_end() {
            writeln!(w, "critical_end={end}")?;
        }
        writeln!(w, "lp_relaxations={}", paths.longest.metrics.relaxations)?;
    }
    Ok(())
}

const fn scope_label(scope: PathScope) -> &'static str {
    match scope {
        PathScope::Original => "original",
        PathScope::Condensation => "condensation",
    }
}

fn render_analyze_pretty(
    payload: &AnalyzeOutput<'_>,
    limit: usize,
    w: &mut dyn Write,
) -> io::Result<()> {
    let r = payload.report;
    let stats = &r.stats;

    pretty_section(w, &format!("Dataset: {}", payload.dataset))?;
    pretty_kv(w, "Nodes", stats.nodes.to_string())?;
    pretty_kv(w, "Edges", stats.edges.to_string())?;
    pretty_kv(w, "Density", format!("{:.4}", stats.density))?;
    pretty_kv(w, "Type", stats.kind.to_string())?;
    pretty_kv(
        w,
        "Entry/exit",
        format!("{} sources, {} sinks", stats.sources, stats.sinks),
    )?;
    if stats.self_loops > 0 {
        pretty_kv(w, "Self-loops", stats.self_loops.to_string())?;
    }
    pretty_kv(w, "Hash", &r.content_hash)?;

    writeln!(w)?;
    pretty_section(w, "Strongly connected components")?;
    for run in &r.engine_runs {
        let marker = if run.engine == r.primary { "*" } else { " " };
        writeln!(
            w,
            "{marker} {:<9} {} components; {}",
            run.engine.name(),
            run.components,
            run.metrics
        )?;
    }
    if !r.engines_agree {
        writeln!(w, "  WARNING: engines disagree on the partition")?;
    }
    pretty_kv(w, "SCCs", stats.scc_count.to_string())?;
    pretty_kv(w, "Largest SCC", stats.largest_scc.to_string())?;
    pretty_kv(w, "Cyclic SCCs", stats.cycle_count.to_string())?;
    for (idx, component) in r
        .sccs
        .components()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.len() > 1)
        .take(limit)
    {
        writeln!(
            w,
            "  C{idx} [{}]: {}",
            component.len(),
            truncated(component.members(), limit)
        )?;
    }

    writeln!(w)?;
    pretty_section(w, "Schedule (condensation)")?;
    pretty_kv(w, "Components", r.condensation.vertex_count().to_string())?;
    pretty_kv(w, "Links", r.condensation.edge_count().to_string())?;
    pretty_kv(w, "Kahn", r.condensation_topo.metrics.to_string())?;
    pretty_kv(w, "Order", truncated(&r.condensation_topo.order, limit))?;
    pretty_kv(w, "Task order", truncated(&r.task_order, limit))?;

    if let Some(paths) = &r.paths {
        writeln!(w)?;
        let unit = match paths.scope {
            PathScope::Original => "vertex",
            PathScope::Condensation => "component",
        };
        pretty_section(w, &format!("DAG paths ({} graph)", scope_label(paths.scope)))?;
        pretty_kv(w, "Source", format!("{unit} {}", paths.source))?;
        pretty_kv(
            w,
            "Reachable",
            format!(
                "{} of {}",
                paths.shortest.reachable_count(),
                paths.shortest.dist.len()
            ),
        )?;
        pretty_kv(w, "Shortest", paths.shortest.metrics.to_string())?;
        for (v, d) in paths.shortest.dist.iter().enumerate().take(limit) {
            writeln!(w, "  {unit} {v:>5}  dist {}", dist_cell(*d))?;
        }
        pretty_kv(w, "Critical len", dist_cell(paths.longest.critical_length))?;
        if let Some(end) = paths.longest.critical_end() {
            pretty_kv(w, "Critical end", format!("{unit} {end}"))?;
        }
        pretty_kv(
            w,
            "Critical path",
            truncated(&paths.longest.critical_path, limit),
        )?;
        pretty_kv(w, "Longest", paths.longest.metrics.to_string())?;
    }
    Ok(())
}
