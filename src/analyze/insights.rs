use crate::tiers;
use crate::types::evaluation::Score;
use crate::types::report::Insight;
use std::collections::BTreeMap;

/// Compare the current run against a previous one, metric by metric.
/// Deltas are on the 0-100 scale; only moves of at least `min_delta` points
/// are reported. Without a previous run, or without common metrics, the
/// result is empty.
pub fn insights(
    current: &BTreeMap<String, Score>,
    previous: Option<&BTreeMap<String, Score>>,
    min_delta: Score,
) -> Vec<Insight> {
    let Some(previous) = previous else {
        return Vec::new();
    };

    let mut result = Vec::new();
    for (metric, now) in current {
        let Some(before) = previous.get(metric) else {
            continue;
        };
        let delta = 100.0 * (now.clamp(0.0, 1.0) - before.clamp(0.0, 1.0));
        if delta.abs() < min_delta {
            continue;
        }
        let name = tiers::display_name(metric);
        let message = if delta < 0.0 {
            format!("{name} dropped {:.1} points since the last run", delta.abs())
        } else {
            format!("{name} improved {:.1} points since the last run", delta)
        };
        result.push(Insight {
            metric: metric.clone(),
            delta,
            message,
            actionable: delta < 0.0,
        });
    }
    result
}
