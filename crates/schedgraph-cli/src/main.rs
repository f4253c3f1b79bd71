#![forbid(unsafe_code)]

mod cmd;
mod config;
mod error;
mod output;
mod timing;

use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use timing::StageTimings;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "sg: strongly connected components, condensation and DAG paths for task graphs",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print a per-stage timing profile to stderr.
    #[arg(long, global = true)]
    timing: bool,

    /// Output format: pretty, text or json.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Config file; defaults to `./sg.toml` when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Analysis",
        about = "Analyze one graph",
        long_about = "Run both SCC engines, condense, order the condensation and compute DAG \
                      shortest/longest paths for one graph document.",
        after_help = "EXAMPLES:\n    # Analyze a generated dataset\n    sg analyze data/medium_cyclic_1.json\n\n    # Use Kosaraju's partition and start shortest paths at vertex 3\n    sg analyze g.json --engine kosaraju --source 3\n\n    # Emit machine-readable output\n    sg analyze g.json --format json"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "Compare Tarjan and Kosaraju",
        long_about = "Time both SCC engines over repeated runs, check that they agree on every \
                      run and report work counters with p50/p95 timings.",
        after_help = "EXAMPLES:\n    # Compare engines on every dataset in a directory\n    sg compare data\n\n    # Ten runs per engine\n    sg compare data/large_dag_1.json --runs 10"
    )]
    Compare(cmd::compare::CompareArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "Batch report over many graphs",
        long_about = "Analyze every input and print the dataset overview, engine comparison, \
                      SCC, topological sort and DAG path tables. Unreadable files are skipped.",
        after_help = "EXAMPLES:\n    # Report on the generated suite\n    sg report data\n\n    # Emit machine-readable output\n    sg report data --json"
    )]
    Report(cmd::report::ReportArgs),

    #[command(
        next_help_heading = "Datasets",
        about = "Generate the standard datasets",
        long_about = "Write the nine standard datasets (small, medium and large; DAG, cyclic \
                      and multi-SCC) as JSON graph documents.",
        after_help = "EXAMPLES:\n    # Write to ./data with the default seed\n    sg generate\n\n    # Custom directory and seed\n    sg generate --out /tmp/sets --seed 7"
    )]
    Generate(cmd::generate::GenerateArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completions",
        long_about = "Print a shell completion script for sg.",
        after_help = "EXAMPLES:\n    # Bash\n    sg completions bash > ~/.local/share/bash-completion/completions/sg"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

impl Commands {
    /// Timing stage for the whole command.
    const fn stage(&self) -> &'static str {
        match self {
            Self::Analyze(_) => "cmd.analyze",
            Self::Compare(_) => "cmd.compare",
            Self::Report(_) => "cmd.report",
            Self::Generate(_) => "cmd.generate",
            Self::Completions(_) => "cmd.completions",
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("SG_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "schedgraph=debug,info"
        } else {
            "schedgraph=info,warn"
        })
    });

    let format = env::var("SG_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());
    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(
    cli: &Cli,
    output: OutputMode,
    config: &config::SgConfig,
    timings: &mut StageTimings,
) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Analyze(args) => {
            cmd::analyze::run_analyze(args, config.analysis.engine, output, timings)
        }
        Commands::Compare(args) => {
            cmd::compare::run_compare(args, config.analysis.runs, output, timings)
        }
        Commands::Report(args) => {
            cmd::report::run_report(args, config.analysis.engine, output, timings)
        }
        Commands::Generate(args) => cmd::generate::run_generate(args, &config.generate, output),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let timing_enabled = cli.timing || timing::enabled_from_env();

    let early_mode = resolve_output_mode(cli.format, cli.json, None);
    let loaded = env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| config::load(cli.config.as_deref(), &cwd).map_err(anyhow::Error::from));
    let config = match loaded {
        Ok(config) => config,
        Err(err) => {
            let _ = render_error(early_mode, &CliError::from_anyhow(&err));
            return ExitCode::FAILURE;
        }
    };
    let output = resolve_output_mode(cli.format, cli.json, config.output.format);
    debug!(?output, engine = %config.analysis.engine, "resolved settings");
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let mut timings = StageTimings::default();
    let started = Instant::now();
    let result = run(&cli, output, &config, &mut timings);
    timings.record(cli.command.stage(), started.elapsed());

    if timing_enabled && let Err(err) = timings.write(&mut io::stderr().lock(), output) {
        debug!(error = %err, "timing report failed");
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = render_error(output, &CliError::from_anyhow(&err));
            ExitCode::FAILURE
        }
    }
}
