//! HTML reporter: renders one evaluation as a self-contained static page.
//! All CSS is inlined and no external resources are referenced, so the
//! string can be offered directly as a file download.

use crate::analyze::aggregate::sub_score;
use crate::report::ReportContext;
use crate::tiers::{self, GENERATION_METRICS, RETRIEVAL_METRICS};
use crate::types::evaluation::Score;

/// Escapes user-supplied text for embedding in HTML element content and
/// attribute values.
fn esc(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn fmt_score(value: Option<Score>) -> String {
    match value {
        Some(value) => format!("{value:.1}"),
        None => "N/A".to_string(),
    }
}

fn bar_color(value: Score) -> &'static str {
    if value >= 80.0 {
        "#22c55e"
    } else if value >= 60.0 {
        "#eab308"
    } else {
        "#ef4444"
    }
}

fn template_head(title: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
:root{{--bg:#0d0d11;--surface:#16161b;--border:#2a2a32;--text:#e4e4e7;--muted:#71717a;--radius:8px}}
*{{box-sizing:border-box;margin:0;padding:0}}
body{{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;background:var(--bg);color:var(--text);line-height:1.5;padding:2rem;max-width:960px;margin:0 auto}}
header{{padding-bottom:1rem;border-bottom:1px solid var(--border);margin-bottom:1.5rem}}
header h1{{font-size:1.25rem;font-weight:700}}
header .meta{{font-size:.8125rem;color:var(--muted);margin-top:.25rem}}
.stats{{display:flex;gap:0;border:1px solid var(--border);border-radius:var(--radius);background:var(--surface);margin-bottom:1.5rem}}
.stat{{flex:1;padding:.875rem 1.25rem;border-right:1px solid var(--border);text-align:center}}
.stat:last-child{{border-right:none}}
.stat .val{{font-size:1.5rem;font-weight:700;display:block}}
.stat .lbl{{font-size:.75rem;color:var(--muted);text-transform:uppercase;letter-spacing:.5px}}
section{{margin-bottom:1.5rem}}
section h2{{font-size:.8125rem;text-transform:uppercase;letter-spacing:.5px;color:var(--muted);margin-bottom:.5rem;padding-bottom:.375rem;border-bottom:1px solid var(--border)}}
table{{width:100%;border-collapse:collapse;font-size:.8125rem}}
th{{text-align:left;color:var(--muted);font-weight:600;padding:.375rem .5rem}}
td{{padding:.375rem .5rem;border-top:1px solid var(--border)}}
td.num{{text-align:right;font-variant-numeric:tabular-nums;white-space:nowrap}}
.bar{{height:6px;background:var(--border);border-radius:3px;overflow:hidden;min-width:80px}}
.bar span{{display:block;height:100%;border-radius:3px}}
.tag{{display:inline-block;font-size:.6875rem;font-weight:700;padding:.125rem .5rem;border-radius:10px;text-transform:uppercase}}
ul{{padding-left:1.25rem;font-size:.8125rem}}
li{{margin-bottom:.25rem}}
.warn{{color:#eab308}}
.ok{{color:var(--muted)}}
footer{{margin-top:2rem;padding-top:1rem;border-top:1px solid var(--border);font-size:.75rem;color:var(--muted);word-break:break-all}}
</style>
</head>
<body>
"##
    )
}

pub fn to_html(ctx: &ReportContext) -> String {
    let evaluation = ctx.evaluation;
    let analysis = ctx.analysis;
    let grade = analysis.grade.grade;

    let mut html = String::with_capacity(16_384);
    html.push_str(&template_head(&format!(
        "REX Report – {}",
        esc(&evaluation.name)
    )));

    // Header and metadata.
    html.push_str("<header><h1>REX Evaluation Report</h1><div class=\"meta\">");
    html.push_str(&esc(&evaluation.name));
    html.push_str(" · ");
    html.push_str(&esc(&evaluation.id));
    html.push_str("</div></header>\n");

    // Stat bar: overall, grade, reliability, coverage.
    html.push_str("<div class=\"stats\">");
    html.push_str(&format!(
        "<div class=\"stat\"><span class=\"val\" style=\"color:{}\">{:.1}</span><span class=\"lbl\">Overall</span></div>",
        grade.color(),
        analysis.score.overall
    ));
    html.push_str(&format!(
        "<div class=\"stat\"><span class=\"val\" style=\"color:{}\">{}</span><span class=\"lbl\">Grade</span></div>",
        grade.color(),
        grade.label()
    ));
    html.push_str(&format!(
        "<div class=\"stat\"><span class=\"val\">{}</span><span class=\"lbl\">Reliability</span></div>",
        analysis.score.reliability.name()
    ));
    html.push_str(&format!(
        "<div class=\"stat\"><span class=\"val\">{}</span><span class=\"lbl\">Metrics</span></div>",
        analysis.score.evaluated
    ));
    html.push_str("</div>\n");

    html.push_str(&format!(
        "<section><p style=\"font-size:.875rem\">{}</p></section>\n",
        esc(&analysis.grade.description)
    ));

    // Run metadata; optional fields are omitted rather than rendered empty.
    html.push_str("<section><h2>Run</h2><table>");
    let mut meta_row = |label: &str, value: &str| {
        html.push_str(&format!("<tr><th>{}</th><td>{}</td></tr>", label, esc(value)));
    };
    if let Some(model) = &evaluation.model_name {
        meta_row("Model", model);
    }
    if let Some(vector_db) = &evaluation.vector_db_name {
        meta_row("Vector DB", vector_db);
    }
    if let Some(dataset) = &evaluation.dataset_name {
        meta_row("Dataset", dataset);
    }
    if let Some(config_id) = &evaluation.config_id {
        meta_row("Config", config_id);
    }
    meta_row("Started", &evaluation.started_at.to_rfc3339());
    if let Some(completed_at) = evaluation.completed_at {
        meta_row("Completed", &completed_at.to_rfc3339());
    }
    if let Some(previous) = ctx.previous {
        meta_row("Compared against", &previous.name);
    }
    html.push_str("</table></section>\n");

    // Retrieval / generation sub-scores.
    html.push_str("<section><h2>Sub-scores</h2><table>");
    for (label, members) in [
        ("Retrieval", &RETRIEVAL_METRICS[..]),
        ("Generation", &GENERATION_METRICS[..]),
    ] {
        html.push_str(&format!(
            "<tr><th>{}</th><td class=\"num\">{}</td></tr>",
            label,
            fmt_score(sub_score(&evaluation.scores, members))
        ));
    }
    html.push_str("</table></section>\n");

    // Tier breakdown.
    html.push_str("<section><h2>Tier Breakdown</h2><table>");
    html.push_str("<tr><th>Tier</th><th>Weight</th><th>Coverage</th><th>Average</th><th></th></tr>");
    for entry in &analysis.score.tiers {
        let average = entry.average.unwrap_or(0.0);
        html.push_str(&format!(
            "<tr><td><span class=\"tag\" style=\"background:{color}22;color:{color}\" title=\"{desc}\">{name}</span></td><td class=\"num\">{weight:.1}</td><td class=\"num\">{present}/{total}</td><td class=\"num\">{avg}</td><td><div class=\"bar\"><span style=\"width:{fill:.0}%;background:{color}\"></span></div></td></tr>",
            color = entry.tier.color(),
            desc = entry.tier.description(),
            name = entry.tier.name(),
            weight = entry.tier.weight(),
            present = entry.present,
            total = entry.member_count,
            avg = fmt_score(entry.average),
            fill = average,
        ));
    }
    html.push_str("</table></section>\n");

    // Per-metric scores.
    html.push_str("<section><h2>Metrics</h2>");
    if evaluation.scores.is_empty() {
        html.push_str("<p class=\"ok\">No metrics were evaluated.</p>");
    } else {
        html.push_str("<table><tr><th>Metric</th><th>Score</th><th></th></tr>");
        for (metric, raw) in &evaluation.scores {
            let scaled = 100.0 * raw.clamp(0.0, 1.0);
            html.push_str(&format!(
                "<tr><td>{}</td><td class=\"num\">{:.1}</td><td><div class=\"bar\"><span style=\"width:{:.0}%;background:{}\"></span></div></td></tr>",
                esc(&tiers::bilingual_name(metric)),
                scaled,
                scaled,
                bar_color(scaled)
            ));
        }
        html.push_str("</table>");
    }
    html.push_str("</section>\n");

    // Warnings and the top-priority recommendation.
    html.push_str("<section><h2>Warnings</h2>");
    if analysis.grade.warnings.is_empty() {
        html.push_str("<p class=\"ok\">No metrics below the warning threshold.</p>");
    } else {
        html.push_str("<ul>");
        for warning in &analysis.grade.warnings {
            html.push_str(&format!("<li class=\"warn\">{}</li>", esc(warning)));
        }
        html.push_str("</ul>");
    }
    html.push_str("</section>\n");

    if let Some(recommendation) = &analysis.grade.recommendation {
        html.push_str(&format!(
            "<section><h2>Recommendation</h2><p style=\"font-size:.875rem\">{}</p></section>\n",
            esc(recommendation)
        ));
    }

    // Trend section only renders when a previous run produced insights.
    if !analysis.insights.is_empty() {
        html.push_str("<section><h2>Trend vs Previous Run</h2><ul>");
        for insight in &analysis.insights {
            let class = if insight.actionable { "warn" } else { "ok" };
            html.push_str(&format!(
                "<li class=\"{}\">{}</li>",
                class,
                esc(&insight.message)
            ));
        }
        html.push_str("</ul></section>\n");
    }

    if ctx.include_failure_cases && !evaluation.failed_cases.is_empty() {
        html.push_str("<section><h2>Failure Cases</h2><table>");
        html.push_str("<tr><th>Question</th><th>Root Cause</th><th>Count</th></tr>");
        for case in &evaluation.failed_cases {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td class=\"num\">{}</td></tr>",
                esc(&case.question),
                esc(&case.reason),
                case.count
            ));
        }
        html.push_str("</table>");
        if let Some(summary) = &evaluation.diagnosis_summary {
            html.push_str(&format!(
                "<p style=\"font-size:.8125rem;margin-top:.5rem\">{}</p>",
                esc(summary)
            ));
        }
        html.push_str("</section>\n");
    }

    html.push_str(&format!(
        "<footer>Generated {} · rex-report v{} · fingerprint {}</footer>\n",
        ctx.generated_at.to_rfc3339(),
        env!("CARGO_PKG_VERSION"),
        analysis.fingerprint
    ));
    html.push_str("</body>\n</html>\n");
    html
}
