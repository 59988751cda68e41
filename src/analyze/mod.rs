pub mod aggregate;
pub mod grade;
pub mod insights;

use crate::config::RexConfig;
use crate::types::evaluation::Evaluation;
use crate::types::report::EvaluationAnalysis;
use sha2::{Digest, Sha256};

/// Run the full scoring pipeline for one evaluation: weighted aggregation,
/// grading, and (when a previous run is supplied) trend insights. Everything
/// is recomputed per call; nothing is cached.
pub fn analyze(
    evaluation: &Evaluation,
    previous: Option<&Evaluation>,
    config: Option<&RexConfig>,
) -> EvaluationAnalysis {
    let min_metrics_high = config
        .map(RexConfig::min_metrics_high)
        .unwrap_or_else(RexConfig::default_min_metrics_high);
    let warn_threshold = config
        .map(RexConfig::warn_threshold)
        .unwrap_or_else(RexConfig::default_warn_threshold);
    let insight_min_delta = config
        .map(RexConfig::insight_min_delta)
        .unwrap_or_else(RexConfig::default_insight_min_delta);

    let score = aggregate::aggregate(&evaluation.scores, min_metrics_high);
    let grade = grade::grade_info(score.overall, &evaluation.scores, &score.tiers, warn_threshold);
    let insights = insights::insights(
        &evaluation.scores,
        previous.map(|run| &run.scores),
        insight_min_delta,
    );

    EvaluationAnalysis {
        score,
        grade,
        insights,
        fingerprint: fingerprint(evaluation),
    }
}

/// Stable content fingerprint over the evaluation id and its score mapping,
/// embedded in report footers for traceability. The score map is ordered,
/// so the digest is deterministic.
pub fn fingerprint(evaluation: &Evaluation) -> String {
    let mut hasher = Sha256::new();
    hasher.update(evaluation.id.as_bytes());
    for (metric, score) in &evaluation.scores {
        hasher.update([0u8]);
        hasher.update(metric.as_bytes());
        hasher.update(score.to_le_bytes());
    }
    let digest = hasher.finalize();
    format!("{digest:x}")
}
