mod analyze;
mod cli;
mod config;
mod error;
mod load;
mod report;
mod tiers;
mod types;

use crate::error::RexError;
use crate::types::report::Grade;
use chrono::Utc;
use clap::Parser;
use std::path::Path;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const WARNINGS: i32 = 1;
    pub const BLOCKING: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter = tracing_subscriber::EnvFilter::try_from_env("REX_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Exit-code gate shared by `score` and `report`: a Critical grade blocks,
/// anything below Fair or any warning is a warning exit.
fn gate(analysis: &types::report::EvaluationAnalysis) -> i32 {
    match analysis.grade.grade {
        Grade::Critical => exit_code::BLOCKING,
        Grade::Poor => exit_code::WARNINGS,
        _ if !analysis.grade.warnings.is_empty() => exit_code::WARNINGS,
        _ => exit_code::SUCCESS,
    }
}

fn config_dir(eval_path: &Path) -> &Path {
    eval_path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."))
}

fn require_path(path: &Path) -> Result<(), RexError> {
    if !path.exists() {
        return Err(RexError::PathNotFound(path.display().to_string()));
    }
    Ok(())
}

fn run() -> Result<i32, RexError> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        cli::Commands::Score(cmd) => {
            require_path(&cmd.eval)?;
            let loaded = config::load_config(config_dir(&cmd.eval))?;
            let evaluation = load::load_evaluation(&cmd.eval)?;
            let analysis = analyze::analyze(&evaluation, None, loaded.as_ref());

            match cmd.format {
                cli::ScoreFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&analysis)?);
                }
                cli::ScoreFormat::Text => {
                    println!("evaluation: {} ({})", evaluation.name, evaluation.id);
                    println!(
                        "overall: {:.1} ({})",
                        analysis.score.overall,
                        analysis.grade.grade.label()
                    );
                    println!("reliability: {}", analysis.score.reliability.name());
                    println!("metrics evaluated: {}", analysis.score.evaluated);
                    for entry in &analysis.score.tiers {
                        let average = entry
                            .average
                            .map(|average| format!("{average:.1}"))
                            .unwrap_or_else(|| "N/A".to_string());
                        println!(
                            "tier {}: {}/{} present, avg {}",
                            entry.tier.name(),
                            entry.present,
                            entry.member_count,
                            average
                        );
                    }
                    if analysis.grade.warnings.is_empty() {
                        println!("warnings: none");
                    } else {
                        println!("warnings:");
                        for warning in &analysis.grade.warnings {
                            println!("- {warning}");
                        }
                    }
                    if let Some(recommendation) = &analysis.grade.recommendation {
                        println!("recommendation: {recommendation}");
                    }
                }
            }

            Ok(gate(&analysis))
        }
        cli::Commands::Report(cmd) => {
            require_path(&cmd.eval)?;
            let loaded = config::load_config(config_dir(&cmd.eval))?;
            let evaluation = load::load_evaluation(&cmd.eval)?;

            let previous = match (&cmd.previous, &cmd.history) {
                (Some(path), _) => {
                    require_path(path)?;
                    Some(load::load_evaluation(path)?)
                }
                (None, Some(dir)) => {
                    require_path(dir)?;
                    load::find_previous(dir, &evaluation)
                }
                (None, None) => None,
            };

            let analysis = analyze::analyze(&evaluation, previous.as_ref(), loaded.as_ref());
            let generated_at = Utc::now();
            let ctx = report::ReportContext {
                evaluation: &evaluation,
                previous: previous.as_ref(),
                analysis: &analysis,
                generated_at,
                include_failure_cases: loaded
                    .as_ref()
                    .map(config::RexConfig::include_failure_cases)
                    .unwrap_or(true),
            };
            let format = match cmd.format {
                cli::ReportFormat::Html => report::OutputFormat::Html,
                cli::ReportFormat::Md => report::OutputFormat::Md,
                cli::ReportFormat::Json => report::OutputFormat::Json,
            };
            let rendered = report::render(&ctx, format)?;

            if cmd.stdout {
                println!("{rendered}");
            } else {
                let filename =
                    report::report_filename(&evaluation.name, generated_at.date_naive(), format);
                std::fs::create_dir_all(&cmd.out)?;
                let path = cmd.out.join(filename);
                std::fs::write(&path, &rendered)?;
                println!("report file: {}", path.display());
            }

            Ok(gate(&analysis))
        }
        cli::Commands::Validate(cmd) => {
            require_path(&cmd.eval)?;
            let evaluation = load::load_evaluation(&cmd.eval)?;
            let findings = load::contract_findings(&evaluation);

            println!("fingerprint: {}", analyze::fingerprint(&evaluation));
            if findings.is_empty() {
                println!("validate: no findings");
                return Ok(exit_code::SUCCESS);
            }

            for finding in &findings {
                let level = if finding.blocking { "BLOCKING" } else { "WARN" };
                println!("[{}] {}: {}", level, finding.id, finding.message);
            }

            if findings.iter().any(|finding| finding.blocking) {
                Ok(exit_code::BLOCKING)
            } else {
                Ok(exit_code::WARNINGS)
            }
        }
        cli::Commands::Tiers => {
            for tier in tiers::Tier::ALL {
                println!(
                    "{} (weight {:.1}): {}",
                    tier.name(),
                    tier.weight(),
                    tier.description()
                );
                for metric in tier.members() {
                    println!("  - {}: {}", metric, tiers::bilingual_name(metric));
                }
            }
            Ok(exit_code::SUCCESS)
        }
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
