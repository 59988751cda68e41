pub mod html;
pub mod json;
pub mod md;

use crate::error::{Result, RexError};
use crate::types::evaluation::Evaluation;
use crate::types::report::EvaluationAnalysis;
use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Html,
    Md,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Md => "md",
            OutputFormat::Json => "json",
        }
    }
}

/// Everything a renderer needs. The generation timestamp is an input rather
/// than sampled inside the renderers, so identical contexts produce
/// byte-identical output.
pub struct ReportContext<'a> {
    pub evaluation: &'a Evaluation,
    pub previous: Option<&'a Evaluation>,
    pub analysis: &'a EvaluationAnalysis,
    pub generated_at: DateTime<Utc>,
    pub include_failure_cases: bool,
}

pub fn render(ctx: &ReportContext, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Html => Ok(html::to_html(ctx)),
        OutputFormat::Md => Ok(md::to_markdown(ctx)),
        OutputFormat::Json => json::to_json(ctx).map_err(RexError::Json),
    }
}

/// Download filename convention: `REX_Report_<name>_<YYYY-MM-DD>.<ext>` with
/// whitespace replaced by underscores. Non-ASCII text is preserved; only
/// filesystem-hostile characters are stripped.
pub fn report_filename(name: &str, date: NaiveDate, format: OutputFormat) -> String {
    format!(
        "REX_Report_{}_{}.{}",
        sanitize_name(name),
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

fn sanitize_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| {
            !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') && !c.is_control()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 31).expect("valid date")
    }

    #[test]
    fn filename_replaces_whitespace_and_keeps_korean() {
        let name = "2025년 3분기 챗봇 평가";
        assert_eq!(
            report_filename(name, date(), OutputFormat::Html),
            "REX_Report_2025년_3분기_챗봇_평가_2025-03-31.html"
        );
    }

    #[test]
    fn filename_strips_hostile_characters() {
        assert_eq!(
            report_filename("a/b:c*d", date(), OutputFormat::Json),
            "REX_Report_abcd_2025-03-31.json"
        );
    }

    #[test]
    fn filename_extension_follows_format() {
        assert!(report_filename("run", date(), OutputFormat::Md).ends_with(".md"));
    }
}
