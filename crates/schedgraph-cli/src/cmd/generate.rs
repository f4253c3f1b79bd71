//! `sg generate` — write the standard dataset suite.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use schedgraph_sim::write_suite;
use serde::Serialize;
use tracing::instrument;

use crate::config::GenerateConfig;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Output directory; defaults to `generate.out_dir` from `sg.toml`.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Generator seed; defaults to `generate.seed` from `sg.toml`.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct GenerateOutput {
    dir: String,
    seed: u64,
    files: Vec<String>,
}

/// Execute `sg generate`.
///
/// # Errors
///
/// Returns an error if the directory or any dataset file cannot be written.
#[instrument(name = "cmd.generate", skip_all)]
pub fn run_generate(
    args: &GenerateArgs,
    defaults: &GenerateConfig,
    output: OutputMode,
) -> Result<()> {
    let dir = args.out.clone().unwrap_or_else(|| defaults.out_dir.clone());
    let seed = args.seed.unwrap_or(defaults.seed);
    let written = write_suite(&dir, seed)?;

    let payload = GenerateOutput {
        dir: dir.display().to_string(),
        seed,
        files: written.iter().map(|p| p.display().to_string()).collect(),
    };
    render_mode(output, &payload, render_generate_text, render_generate_pretty)
}

fn render_generate_text(payload: &GenerateOutput, w: &mut dyn Write) -> io::Result<()> {
    for file in &payload.files {
        writeln!(w, "{file}")?;
    }
    Ok(())
}

fn render_generate_pretty(payload: &GenerateOutput, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Datasets generated")?;
    pretty_kv(w, "Directory", &payload.dir)?;
    pretty_kv(w, "Seed", payload.seed.to_string())?;
    pretty_kv(w, "Files", payload.files.len().to_string())?;
    for file in &payload.files {
        writeln!(w, "  {file}")?;
    }
    Ok(())
}
