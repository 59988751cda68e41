use crate::tiers::{self, Tier};
use crate::types::evaluation::Score;
use crate::types::report::{Reliability, TierBreakdown, WeightedScore};
use std::collections::BTreeMap;

/// Compute the tier-weighted overall score from a sparse metric mapping.
///
/// Scores outside [0, 1] are clamped before aggregation. Unknown metric
/// identifiers contribute at the lowest tier weight instead of being
/// dropped. An empty mapping yields overall 0 with low reliability.
pub fn aggregate(scores: &BTreeMap<String, Score>, min_metrics_high: usize) -> WeightedScore {
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    let mut unknown_metrics = Vec::new();

    for (metric, raw) in scores {
        let score = clamp_score(metric, *raw);
        let weight = tiers::weight_of(metric);
        if tiers::tier_of(metric).is_none() {
            tracing::warn!("unknown metric '{metric}', using weight {weight}");
            unknown_metrics.push(metric.clone());
        }
        weighted_sum += score * weight;
        weight_total += weight;
    }

    let overall = if weight_total > 0.0 {
        100.0 * weighted_sum / weight_total
    } else {
        0.0
    };

    let breakdown = tier_breakdown(scores);
    let reliability = reliability(scores, min_metrics_high);

    WeightedScore {
        overall,
        evaluated: scores.len(),
        tiers: breakdown,
        reliability,
        unknown_metrics,
    }
}

fn clamp_score(metric: &str, raw: Score) -> Score {
    if !(0.0..=1.0).contains(&raw) {
        tracing::warn!("score for '{metric}' out of range ({raw}), clamping to [0, 1]");
    }
    raw.clamp(0.0, 1.0)
}

fn tier_breakdown(scores: &BTreeMap<String, Score>) -> Vec<TierBreakdown> {
    Tier::ALL
        .iter()
        .map(|&tier| {
            let present: Vec<Score> = tier
                .members()
                .iter()
                .filter_map(|metric| scores.get(*metric))
                .map(|raw| raw.clamp(0.0, 1.0))
                .collect();
            let average = if present.is_empty() {
                None
            } else {
                Some(100.0 * present.iter().sum::<Score>() / present.len() as Score)
            };
            TierBreakdown {
                tier,
                present: present.len(),
                member_count: tier.members().len(),
                average,
            }
        })
        .collect()
}

fn reliability(scores: &BTreeMap<String, Score>, min_metrics_high: usize) -> Reliability {
    let critical_present = Tier::Critical
        .members()
        .iter()
        .filter(|metric| scores.contains_key(**metric))
        .count();
    let important_present = Tier::Important
        .members()
        .iter()
        .filter(|metric| scores.contains_key(**metric))
        .count();

    let critical_total = Tier::Critical.members().len();
    let upper_total = critical_total + Tier::Important.members().len();

    if critical_present == critical_total && scores.len() >= min_metrics_high {
        Reliability::High
    } else if 2 * (critical_present + important_present) >= upper_total {
        Reliability::Medium
    } else {
        Reliability::Low
    }
}

/// Unweighted mean of whichever member metrics are present, on the 0-100
/// scale. `None` when no member is present, so callers render a fallback
/// instead of dividing by zero.
pub fn sub_score(scores: &BTreeMap<String, Score>, members: &[&str]) -> Option<Score> {
    let present: Vec<Score> = members
        .iter()
        .filter_map(|metric| scores.get(*metric))
        .map(|raw| raw.clamp(0.0, 1.0))
        .collect();
    if present.is_empty() {
        return None;
    }
    Some(100.0 * present.iter().sum::<Score>() / present.len() as Score)
}
