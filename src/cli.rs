use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rex-report",
    version,
    about = "RAG evaluation scoring and report generation CLI"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the weighted score card for one evaluation
    Score(ScoreCommand),
    /// Render a full report for one evaluation
    Report(ReportCommand),
    /// Check an evaluation file against the input contract
    Validate(ValidateCommand),
    /// Print the metric tier table
    Tiers,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ScoreFormat {
    Text,
    Json,
}

#[derive(Clone, ValueEnum)]
pub enum ReportFormat {
    Html,
    Md,
    Json,
}

#[derive(Args)]
pub struct ScoreCommand {
    /// Evaluation result file (JSON)
    pub eval: PathBuf,

    #[arg(short, long, value_enum, default_value = "text")]
    pub format: ScoreFormat,
}

#[derive(Args)]
pub struct ReportCommand {
    /// Evaluation result file (JSON)
    pub eval: PathBuf,

    /// Previous evaluation file for trend comparison
    #[arg(long, conflicts_with = "history")]
    pub previous: Option<PathBuf>,

    /// Directory of past evaluation files; the latest earlier run is used
    /// for trend comparison
    #[arg(long)]
    pub history: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value = "html")]
    pub format: ReportFormat,

    /// Directory the report file is written into
    #[arg(short, long, default_value = ".")]
    pub out: PathBuf,

    /// Print the rendered report to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,
}

#[derive(Args)]
pub struct ValidateCommand {
    /// Evaluation result file (JSON)
    pub eval: PathBuf,
}
