use crate::analyze::aggregate::sub_score;
use crate::report::ReportContext;
use crate::tiers::{self, GENERATION_METRICS, RETRIEVAL_METRICS};
use crate::types::evaluation::Score;

fn fmt_score(value: Option<Score>) -> String {
    match value {
        Some(value) => format!("{value:.1}"),
        None => "N/A".to_string(),
    }
}

pub fn to_markdown(ctx: &ReportContext) -> String {
    let evaluation = ctx.evaluation;
    let analysis = ctx.analysis;

    let mut output = String::new();
    output.push_str("# REX Evaluation Report\n\n");
    output.push_str(&format!("Evaluation: {} ({})\n", evaluation.name, evaluation.id));
    if let Some(model) = &evaluation.model_name {
        output.push_str(&format!("Model: {model}\n"));
    }
    if let Some(vector_db) = &evaluation.vector_db_name {
        output.push_str(&format!("Vector DB: {vector_db}\n"));
    }
    if let Some(dataset) = &evaluation.dataset_name {
        output.push_str(&format!("Dataset: {dataset}\n"));
    }
    output.push_str(&format!("Started: {}\n", evaluation.started_at.to_rfc3339()));
    if let Some(completed_at) = evaluation.completed_at {
        output.push_str(&format!("Completed: {}\n", completed_at.to_rfc3339()));
    }
    output.push('\n');

    output.push_str("## Overall\n\n");
    output.push_str(&format!(
        "- score: {:.1} / 100\n- grade: {} ({})\n- reliability: {}\n- metrics evaluated: {}\n\n",
        analysis.score.overall,
        analysis.grade.grade.label(),
        analysis.grade.description,
        analysis.score.reliability.name(),
        analysis.score.evaluated
    ));

    output.push_str("## Sub-scores\n\n");
    output.push_str(&format!(
        "- retrieval: {}\n- generation: {}\n\n",
        fmt_score(sub_score(&evaluation.scores, &RETRIEVAL_METRICS)),
        fmt_score(sub_score(&evaluation.scores, &GENERATION_METRICS))
    ));

    output.push_str("## Tier Breakdown\n\n");
    for entry in &analysis.score.tiers {
        output.push_str(&format!(
            "- {} (weight {:.1}): {}/{} metrics, avg {}\n",
            entry.tier.name(),
            entry.tier.weight(),
            entry.present,
            entry.member_count,
            fmt_score(entry.average)
        ));
    }
    output.push('\n');

    output.push_str("## Metrics\n\n");
    if evaluation.scores.is_empty() {
        output.push_str("- none\n");
    } else {
        for (metric, score) in &evaluation.scores {
            output.push_str(&format!(
                "- {}: {:.1}\n",
                tiers::bilingual_name(metric),
                100.0 * score.clamp(0.0, 1.0)
            ));
        }
    }
    output.push('\n');

    output.push_str("## Warnings\n\n");
    if analysis.grade.warnings.is_empty() {
        output.push_str("- none\n");
    } else {
        for warning in &analysis.grade.warnings {
            output.push_str(&format!("- {warning}\n"));
        }
    }
    output.push('\n');

    if let Some(recommendation) = &analysis.grade.recommendation {
        output.push_str("## Recommendation\n\n");
        output.push_str(&format!("{recommendation}\n\n"));
    }

    if !analysis.insights.is_empty() {
        output.push_str("## Trend vs Previous Run\n\n");
        for insight in &analysis.insights {
            let marker = if insight.actionable { " (action needed)" } else { "" };
            output.push_str(&format!("- {}{}\n", insight.message, marker));
        }
        output.push('\n');
    }

    if ctx.include_failure_cases && !evaluation.failed_cases.is_empty() {
        output.push_str("## Failure Cases\n\n");
        for case in &evaluation.failed_cases {
            output.push_str(&format!(
                "- {} (x{}): {}\n",
                case.question, case.count, case.reason
            ));
        }
        if let Some(summary) = &evaluation.diagnosis_summary {
            output.push_str(&format!("\nDiagnosis: {summary}\n"));
        }
        output.push('\n');
    }

    output.push_str(&format!(
        "---\nGenerated {} · fingerprint {}\n",
        ctx.generated_at.to_rfc3339(),
        analysis.fingerprint
    ));

    output
}
