use crate::report::ReportContext;
use crate::types::evaluation::Evaluation;
use crate::types::report::EvaluationAnalysis;
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    generated_at: String,
    evaluation: &'a Evaluation,
    previous_id: Option<&'a str>,
    analysis: &'a EvaluationAnalysis,
}

pub fn to_json(ctx: &ReportContext) -> Result<String, serde_json::Error> {
    let report = JsonReport {
        version: env!("CARGO_PKG_VERSION"),
        generated_at: ctx.generated_at.to_rfc3339(),
        evaluation: ctx.evaluation,
        previous_id: ctx.previous.map(|run| run.id.as_str()),
        analysis: ctx.analysis,
    };
    serde_json::to_string_pretty(&report)
}
