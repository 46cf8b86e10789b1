//! diffgate - semantic change gates for CI
//!
//! Each subcommand is one CI entry point. It prints `<gate> OK` and exits 0
//! when the gate passes, or one `ERROR: <message>` line per violation and
//! exits 1. Repository or filesystem failures print `fatal: ...` to stderr and
//! also exit 1, so CI treats an unevaluable gate as a failing one.
//!
//! ## Commands
//!
//! - `semantic-change`: docs must follow meaningful metrics/ML/architecture changes
//! - `metric-companion`: metric changes need tests and a benchmark log
//! - `model-artifacts`: model changes need a model card; no tracked binaries
//! - `architecture-boundaries`: core layers must not import UI code
//! - `privacy-guards`: no raw video handling; landmark filter must be applied
//! - `doc-lint`: documentation hygiene
//! - `coverage`: line coverage threshold over `coverage/lcov.info`
//! - `all`: every gate except coverage
//! - `policy`: print the compiled-in policy tables as JSON

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};

use diffgate_core::{
    init_tracing, new_run_id, write_report, GateKind, GitCli, PolicyConfig, PolicyReport,
    PolicyRunner, RunReport, RunSpan, DEFAULT_BASE_REF,
};

#[derive(Parser)]
#[command(name = "diffgate")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Semantic change gates for CI pipelines", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Repository root
    #[arg(long, global = true, env = "DIFFGATE_REPO", default_value = ".")]
    repo: PathBuf,

    /// Base reference the diff is taken against
    #[arg(long, global = true, env = "BASE_REF", default_value = DEFAULT_BASE_REF)]
    base_ref: String,

    /// Write `<gate>.json` and `<gate>.digest` reports into this directory
    #[arg(long, global = true)]
    report_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Require documentation updates for semantic metrics, ML and architecture changes
    SemanticChange,

    /// Require tests and a benchmark log for metric changes
    MetricCompanion,

    /// Require model cards and benchmarks for model changes; forbid tracked binaries
    ModelArtifacts,

    /// Forbid UI and platform imports in core layers
    ArchitectureBoundaries,

    /// Forbid raw video handling and require the landmark privacy filter
    PrivacyGuards,

    /// Check documentation for trailing whitespace and leading headings
    DocLint,

    /// Enforce the line coverage threshold
    Coverage,

    /// Run every gate except coverage
    All,

    /// Print the compiled-in policy tables as JSON
    Policy,
}

impl Commands {
    fn gate_kind(&self) -> Option<GateKind> {
        match self {
            Commands::SemanticChange => Some(GateKind::SemanticChange),
            Commands::MetricCompanion => Some(GateKind::MetricCompanion),
            Commands::ModelArtifacts => Some(GateKind::ModelArtifacts),
            Commands::ArchitectureBoundaries => Some(GateKind::ArchitectureBoundaries),
            Commands::PrivacyGuards => Some(GateKind::PrivacyGuards),
            Commands::DocLint => Some(GateKind::DocLint),
            Commands::Coverage => Some(GateKind::Coverage),
            Commands::All => Some(GateKind::All),
            Commands::Policy => None,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    let result = match cli.command.gate_kind() {
        Some(kind) => cmd_gate(kind, &cli.repo, &cli.base_ref, cli.report_dir.as_deref()),
        None => cmd_policy().map(|()| 0),
    };

    ExitCode::from(exit_status(result))
}

/// Map a command result to the process exit status, reporting fatal errors.
fn exit_status(result: Result<u8>) -> u8 {
    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("fatal: {e:#}");
            1
        }
    }
}

/// Run one gate and print its result. Returns the process exit status.
fn cmd_gate(kind: GateKind, repo: &Path, base_ref: &str, report_dir: Option<&Path>) -> Result<u8> {
    let run_id = new_run_id();
    let _span = RunSpan::enter(&run_id, kind.name());

    let config = PolicyConfig::for_gate(kind).context("Failed to build policy tables")?;
    let vcs = GitCli::new(repo);
    let report = PolicyRunner::new(&vcs, repo)
        .run(&config, base_ref)
        .with_context(|| format!("{} could not be evaluated", kind.name()))?;

    if let Some(dir) = report_dir {
        let path = write_report(&PolicyReport::new(&run_id, kind.name(), &report), dir)
            .with_context(|| format!("Failed to write report into {}", dir.display()))?;
        info!(path = %path.display(), "report written");
    }

    let min_ratio = config.coverage.as_ref().map(|c| c.min_ratio);
    for line in render(kind, &report, min_ratio) {
        println!("{line}");
    }
    Ok(report.outcome.exit_code() as u8)
}

/// Output lines for a finished run.
fn render(kind: GateKind, report: &RunReport, min_ratio: Option<f64>) -> Vec<String> {
    let mut lines = Vec::new();
    if let (Some(ratio), Some(min)) = (report.coverage.and_then(|c| c.ratio()), min_ratio) {
        lines.push(format!(
            "Coverage: {:.2}% (min {:.0}%)",
            ratio * 100.0,
            min * 100.0
        ));
    }
    if report.outcome.passed {
        lines.push(format!("{} OK", kind.name()));
    } else {
        lines.extend(report.outcome.error_lines());
    }
    lines
}

fn cmd_policy() -> Result<()> {
    let config = PolicyConfig::builtin().context("Failed to build policy tables")?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
