//! Per-stage timing profile, printed to stderr with `--timing` or `SG_TIMING`.
//!
//! Stages share their names with the tracing spans of the passes they
//! measure (`scc.tarjan`, `topo.kahn`, `paths.longest`, ...). Pass durations
//! are read from the metrics each engine already records, so nothing here
//! re-times the engines; only whole commands (`cmd.*`) are measured with a
//! clock of their own.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::time::Duration;

use schedgraph_core::metrics::millis;
use schedgraph_core::{AnalysisReport, SccEngine};
use serde::Serialize;

use crate::output::{OutputMode, Table};

/// `true` when `SG_TIMING` is set to `1`, `true`, `yes` or `on`.
#[must_use]
pub fn enabled_from_env() -> bool {
    std::env::var("SG_TIMING").is_ok_and(|value| {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

/// Stage name for one SCC engine's run.
#[must_use]
pub const fn scc_stage(engine: SccEngine) -> &'static str {
    match engine {
        SccEngine::Tarjan => "scc.tarjan",
        SccEngine::Kosaraju => "scc.kosaraju",
    }
}

/// Durations grouped by stage name.
#[derive(Debug, Clone, Default)]
pub struct StageTimings {
    stages: BTreeMap<&'static str, Vec<Duration>>,
}

/// One row of the profile.
#[derive(Debug, Clone, Serialize)]
pub struct StageSummary {
    pub stage: &'static str,
    pub count: usize,
    pub total_ms: f64,
    pub p50_ms: f64,
    pub max_ms: f64,
}

impl StageTimings {
    pub fn record(&mut self, stage: &'static str, elapsed: Duration) {
        self.stages.entry(stage).or_default().push(elapsed);
    }

    /// Record every pass [`schedgraph_core::analyze`] ran for one graph.
    ///
    /// Kahn over the original graph only counts when it ran, i.e. when every
    /// component was a singleton.
    pub fn record_analysis(&mut self, report: &AnalysisReport) {
        for run in &report.engine_runs {
            self.record(scc_stage(run.engine), run.metrics.elapsed);
        }
        self.record("topo.kahn", report.condensation_topo.metrics.elapsed);
        if let Some(topo) = &report.original_topo {
            self.record("topo.kahn", topo.metrics.elapsed);
        }
        if let Some(paths) = &report.paths {
            self.record("paths.shortest", paths.shortest.metrics.elapsed);
            self.record("paths.longest", paths.longest.metrics.elapsed);
        }
    }

    /// One summary per stage, by stage name.
    #[must_use]
    pub fn summary(&self) -> Vec<StageSummary> {
        self.stages
            .iter()
            .map(|(&stage, samples)| {
                let mut sorted = samples.clone();
                sorted.sort_unstable();
                StageSummary {
                    stage,
                    count: sorted.len(),
                    total_ms: millis(sorted.iter().sum()),
                    p50_ms: millis(percentile(&sorted, 50)),
                    max_ms: millis(sorted.last().copied().unwrap_or_default()),
                }
            })
            .collect()
    }

    /// JSON document in JSON mode, an aligned table otherwise.
    pub fn write(&self, w: &mut dyn Write, mode: OutputMode) -> io::Result<()> {
        let stages = self.summary();
        if mode == OutputMode::Json {
            serde_json::to_writer_pretty(&mut *w, &serde_json::json!({ "timing": stages }))?;
            return writeln!(w);
        }
        if stages.is_empty() {
            return writeln!(w, "timing: no stages recorded");
        }

        writeln!(w, "timing:")?;
        let mut table = Table::new(["Stage", "Count", "Total ms", "p50 ms", "Max ms"]);
        for s in &stages {
            table.row([
                s.stage.to_string(),
                s.count.to_string(),
                format!("{:.3}", s.total_ms),
                format!("{:.3}", s.p50_ms),
                format!("{:.3}", s.max_ms),
            ]);
        }
        table.write(w)
    }
}

/// Nearest-rank percentile of an ascending slice; zero when empty.
#[must_use]
pub fn percentile(sorted: &[Duration], pct: usize) -> Duration {
    let rank = (pct.min(100) * sorted.len()).div_ceil(100).max(1);
    sorted.get(rank - 1).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use schedgraph_core::{AnalysisOptions, Graph, analyze};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn count(timings: &StageTimings, stage: &str) -> usize {
        timings
            .summary()
            .iter()
            .find(|s| s.stage == stage)
            .map_or(0, |s| s.count)
    }

    #[test]
    fn percentile_uses_nearest_rank() {
        let sorted = [ms(1), ms(2), ms(3), ms(4)];
        assert_eq!(percentile(&sorted, 50), ms(2));
        assert_eq!(percentile(&sorted, 95), ms(4));
        assert_eq!(percentile(&sorted, 0), ms(1));
        assert_eq!(percentile(&[], 50), Duration::ZERO);
    }

    #[test]
    fn dag_analysis_records_every_pass() {
        let mut g = Graph::new(3, true);
        g.add_edge(0, 1, 2);
        g.add_edge(1, 2, 3);
        let report = analyze(&g, &AnalysisOptions::default()).expect("analysis");

        let mut timings = StageTimings::default();
        timings.record_analysis(&report);

        assert_eq!(count(&timings, "scc.tarjan"), 1);
        assert_eq!(count(&timings, "scc.kosaraju"), 1);
        assert_eq!(count(&timings, "topo.kahn"), 2);
        assert_eq!(count(&timings, "paths.shortest"), 1);
        assert_eq!(count(&timings, "paths.longest"), 1);
    }

    #[test]
    fn cyclic_analysis_skips_kahn_on_the_original() {
        let mut g = Graph::new(2, true);
        g.add_edge(0, 1, 1);
        g.add_edge(1, 0, 1);
        let report = analyze(&g, &AnalysisOptions::default()).expect("analysis");

        let mut timings = StageTimings::default();
        timings.record_analysis(&report);
        assert_eq!(count(&timings, "topo.kahn"), 1);
    }

    #[test]
    fn summary_is_sorted_by_stage() {
        let mut timings = StageTimings::default();
        timings.record("scc.tarjan", ms(3));
        timings.record("scc.tarjan", ms(1));
        timings.record("cmd.compare", ms(10));

        let summary = timings.summary();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].stage, "cmd.compare");
        assert_eq!(summary[1].count, 2);
        assert!((summary[1].total_ms - 4.0).abs() < 1e-9);
        assert!((summary[1].p50_ms - 1.0).abs() < 1e-9);
        assert!((summary[1].max_ms - 3.0).abs() < 1e-9);
    }

    #[test]
    fn writes_table_or_json() {
        let mut timings = StageTimings::default();
        timings.record("paths.longest", ms(2));

        let mut buf = Vec::new();
        timings.write(&mut buf, OutputMode::Text).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.starts_with("timing:"));
        assert!(text.contains("paths.longest"));
        assert!(text.contains("2.000"));

        let mut buf = Vec::new();
        timings.write(&mut buf, OutputMode::Json).expect("write");
        let json: serde_json::Value = serde_json::from_slice(&buf).expect("json");
        assert_eq!(json["timing"][0]["stage"], "paths.longest");
        assert_eq!(json["timing"][0]["count"], 1);
    }

    #[test]
    fn empty_profile_says_so() {
        let mut buf = Vec::new();
        StageTimings::default()
            .write(&mut buf, OutputMode::Pretty)
            .expect("write");
        assert_eq!(
            String::from_utf8(buf).expect("utf8"),
            "timing: no stages recorded\n"
        );
    }
}
