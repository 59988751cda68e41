use crate::tiers::{self, Tier};
use crate::types::evaluation::Score;
use crate::types::report::{Grade, GradeInfo, TierBreakdown};
use std::collections::BTreeMap;

/// Derive the qualitative grade, per-metric warnings, and the top-priority
/// recommendation from an aggregated score. Pure function of its inputs.
pub fn grade_info(
    overall: Score,
    scores: &BTreeMap<String, Score>,
    breakdown: &[TierBreakdown],
    warn_threshold: Score,
) -> GradeInfo {
    let grade = Grade::from_score(overall);

    let mut warnings = Vec::new();
    for (metric, raw) in scores {
        let scaled = 100.0 * raw.clamp(0.0, 1.0);
        if scaled < warn_threshold {
            warnings.push(format!(
                "{} scored {:.1}, below threshold {:.0}",
                tiers::display_name(metric),
                scaled,
                warn_threshold
            ));
        }
    }

    GradeInfo {
        grade,
        description: description(grade).to_string(),
        warnings,
        recommendation: recommendation(breakdown),
    }
}

fn description(grade: Grade) -> &'static str {
    match grade {
        Grade::Excellent => "Production-ready quality across the evaluated metrics.",
        Grade::Good => "Solid quality with a few metrics worth tightening.",
        Grade::Fair => "Usable, but several metrics need attention before wider rollout.",
        Grade::Poor => "Quality gaps are user-visible; prioritize the weakest tier.",
        Grade::Critical => "Severe quality problems; the pipeline needs rework before use.",
    }
}

/// Single top-priority action, derived from the lowest-scoring tier that has
/// any metrics present.
fn recommendation(breakdown: &[TierBreakdown]) -> Option<String> {
    let weakest = breakdown
        .iter()
        .filter_map(|entry| entry.average.map(|average| (entry.tier, average)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))?;

    let action = match weakest.0 {
        Tier::Critical => {
            "Revisit the generation pipeline: grounding and answer correctness carry the highest weight."
        }
        Tier::Important => {
            "Tune the retriever: recall and ranking improvements lift the score at high weight."
        }
        Tier::Supporting => {
            "Polish response style: similarity, coherence and fluency are dragging the supporting tier."
        }
        Tier::Additional => {
            "Review auxiliary quality checks; they carry low weight but flag hygiene issues."
        }
    };
    Some(action.to_string())
}
