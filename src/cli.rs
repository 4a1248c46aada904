//! Command-line interface for codebase-analyzer.

use clap::Parser;
use std::path::PathBuf;

use crate::report;
use crate::runner;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "ai_analysis";

/// Analyze a repository and write a resumable context for AI-assisted
/// development.
///
/// Walks the tree, extracts imports, declarations and domain patterns per
/// file, and writes JSON artifacts plus a Markdown summary.
#[derive(Parser, Debug)]
#[command(name = "codebase-analyzer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the repository to analyze
    pub repo_path: PathBuf,

    /// Output directory for analysis results
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Write only the AI summary file
    #[arg(long)]
    pub summary_only: bool,

    /// Path to config YAML file (default: auto-discover in the repository)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log per-file progress
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Run an analysis as described by the arguments.
pub fn run(args: &Cli) -> anyhow::Result<i32> {
    crate::init();

    let analysis = runner::analyze(&args.repo_path, args.config.as_deref())?;

    let written = report::write_artifacts(
        &args.output,
        &analysis.records,
        &analysis.summary,
        &analysis.context,
        args.summary_only,
    )?;

    report::write_pretty(&analysis.summary, &args.output, &written);

    Ok(EXIT_SUCCESS)
}
