use crate::error::{Result, RexError};
use crate::tiers;
use crate::types::evaluation::Evaluation;
use std::path::Path;
use walkdir::WalkDir;

pub fn load_evaluation(path: &Path) -> Result<Evaluation> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| RexError::EvalParse(format!("{}: {}", path.display(), e)))
}

/// Walk a history directory of evaluation JSON files and pick the latest run
/// started strictly before `current`. The current run itself (matched by id)
/// and files that fail to parse are skipped.
pub fn find_previous(dir: &Path, current: &Evaluation) -> Option<Evaluation> {
    let mut best: Option<Evaluation> = None;
    for entry in WalkDir::new(dir).into_iter().filter_map(|entry| entry.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        match load_evaluation(entry.path()) {
            Ok(candidate) => {
                if candidate.id == current.id || candidate.started_at >= current.started_at {
                    continue;
                }
                let newer = best
                    .as_ref()
                    .map(|kept| candidate.started_at > kept.started_at)
                    .unwrap_or(true);
                if newer {
                    tracing::debug!(
                        "previous run candidate: {} ({})",
                        candidate.id,
                        entry.path().display()
                    );
                    best = Some(candidate);
                }
            }
            Err(e) => tracing::debug!("skipping {}: {}", entry.path().display(), e),
        }
    }
    best
}

#[derive(Debug, Clone)]
pub struct ContractFinding {
    pub id: String,
    pub message: String,
    pub blocking: bool,
}

/// Check the evaluation against the input contract. Violations are findings,
/// not errors: scoring tolerates all of them, so the caller decides how loud
/// to be.
pub fn contract_findings(evaluation: &Evaluation) -> Vec<ContractFinding> {
    let mut findings = Vec::new();

    if evaluation.name.trim().is_empty() {
        findings.push(ContractFinding {
            id: "eval.empty_name".to_string(),
            message: "evaluation name is empty; the report filename will be bare".to_string(),
            blocking: false,
        });
    }

    if evaluation.scores.is_empty() {
        findings.push(ContractFinding {
            id: "scores.empty".to_string(),
            message: "score mapping is empty; overall score will be 0 with low reliability"
                .to_string(),
            blocking: false,
        });
    }

    for (metric, score) in &evaluation.scores {
        if !(0.0..=1.0).contains(score) {
            findings.push(ContractFinding {
                id: "scores.out_of_range".to_string(),
                message: format!("score for '{metric}' is {score}; it will be clamped to [0, 1]"),
                blocking: false,
            });
        }
        if tiers::tier_of(metric).is_none() {
            findings.push(ContractFinding {
                id: "scores.unknown_metric".to_string(),
                message: format!(
                    "metric '{metric}' is not registered in any tier; it aggregates at weight {}",
                    tiers::UNKNOWN_METRIC_WEIGHT
                ),
                blocking: false,
            });
        }
    }

    if let Some(completed_at) = evaluation.completed_at {
        if completed_at < evaluation.started_at {
            findings.push(ContractFinding {
                id: "eval.inverted_timestamps".to_string(),
                message: "completedAt precedes startedAt; the run record is corrupt".to_string(),
                blocking: true,
            });
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn eval_json(id: &str, started_at: &str, score: f64) -> String {
        format!(
            r#"{{
                "id": "{id}",
                "name": "run {id}",
                "scores": {{"faithfulness": {score}}},
                "startedAt": "{started_at}"
            }}"#
        )
    }

    #[test]
    fn load_evaluation_reads_valid_file() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("eval.json");
        fs::write(&path, eval_json("eval-1", "2025-03-01T10:00:00Z", 0.9))
            .expect("evaluation should write");
        let eval = load_evaluation(&path).expect("evaluation should load");
        assert_eq!(eval.id, "eval-1");
    }

    #[test]
    fn load_evaluation_reports_parse_errors_with_path() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").expect("file should write");
        let err = load_evaluation(&path).expect_err("load should fail");
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn find_previous_picks_latest_earlier_run() {
        let dir = TempDir::new().expect("temp dir should be created");
        fs::write(
            dir.path().join("a.json"),
            eval_json("eval-a", "2025-01-01T00:00:00Z", 0.7),
        )
        .expect("a should write");
        fs::write(
            dir.path().join("b.json"),
            eval_json("eval-b", "2025-02-01T00:00:00Z", 0.8),
        )
        .expect("b should write");
        fs::write(
            dir.path().join("later.json"),
            eval_json("eval-later", "2025-04-01T00:00:00Z", 0.9),
        )
        .expect("later should write");
        fs::write(dir.path().join("junk.json"), "not an evaluation").expect("junk should write");
        fs::write(dir.path().join("notes.txt"), "ignored").expect("notes should write");

        let current: Evaluation =
            serde_json::from_str(&eval_json("eval-now", "2025-03-01T00:00:00Z", 0.95))
                .expect("current should parse");
        let previous = find_previous(dir.path(), &current).expect("a previous run should exist");
        assert_eq!(previous.id, "eval-b");
    }

    #[test]
    fn find_previous_skips_the_current_run_by_id() {
        let dir = TempDir::new().expect("temp dir should be created");
        fs::write(
            dir.path().join("self.json"),
            eval_json("eval-now", "2025-01-01T00:00:00Z", 0.7),
        )
        .expect("self should write");

        let current: Evaluation =
            serde_json::from_str(&eval_json("eval-now", "2025-03-01T00:00:00Z", 0.95))
                .expect("current should parse");
        assert!(find_previous(dir.path(), &current).is_none());
    }

    #[test]
    fn contract_findings_flag_range_and_unknown_metrics() {
        let current: Evaluation = serde_json::from_str(
            r#"{
                "id": "eval-1",
                "name": "run",
                "scores": {"faithfulness": 1.4, "made_up": 0.5},
                "startedAt": "2025-03-01T10:00:00Z"
            }"#,
        )
        .expect("evaluation should parse");
        let findings = contract_findings(&current);
        assert!(findings
            .iter()
            .any(|finding| finding.id == "scores.out_of_range" && !finding.blocking));
        assert!(findings
            .iter()
            .any(|finding| finding.id == "scores.unknown_metric" && !finding.blocking));
    }

    #[test]
    fn contract_findings_block_inverted_timestamps() {
        let current: Evaluation = serde_json::from_str(
            r#"{
                "id": "eval-1",
                "name": "run",
                "scores": {"faithfulness": 0.9},
                "startedAt": "2025-03-01T10:00:00Z",
                "completedAt": "2025-03-01T09:00:00Z"
            }"#,
        )
        .expect("evaluation should parse");
        let findings = contract_findings(&current);
        assert!(findings
            .iter()
            .any(|finding| finding.id == "eval.inverted_timestamps" && finding.blocking));
    }

    #[test]
    fn clean_evaluation_has_no_findings() {
        let current: Evaluation = serde_json::from_str(
            r#"{
                "id": "eval-1",
                "name": "run",
                "scores": {"faithfulness": 0.9},
                "startedAt": "2025-03-01T10:00:00Z",
                "completedAt": "2025-03-01T11:00:00Z"
            }"#,
        )
        .expect("evaluation should parse");
        assert!(contract_findings(&current).is_empty());
    }
}
