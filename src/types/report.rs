use crate::tiers::Tier;
use crate::types::evaluation::Score;
use serde::Serialize;

/// Coverage-based confidence in the aggregated score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reliability {
    High,
    Medium,
    Low,
}

impl Reliability {
    pub fn name(self) -> &'static str {
        match self {
            Reliability::High => "high",
            Reliability::Medium => "medium",
            Reliability::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TierBreakdown {
    pub tier: Tier,
    pub present: usize,
    pub member_count: usize,
    /// Unweighted mean of the tier's present metrics on the 0-100 scale.
    /// `None` when no member metric was evaluated.
    pub average: Option<Score>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeightedScore {
    /// 0-100 scale.
    pub overall: Score,
    pub evaluated: usize,
    pub tiers: Vec<TierBreakdown>,
    pub reliability: Reliability,
    pub unknown_metrics: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

impl Grade {
    /// Band boundaries on the 0-100 scale. The input is rounded to one
    /// decimal first so the grade always agrees with the displayed score.
    pub fn from_score(overall: Score) -> Grade {
        let overall = (overall * 10.0).round() / 10.0;
        if overall >= 95.0 {
            Grade::Excellent
        } else if overall >= 80.0 {
            Grade::Good
        } else if overall >= 70.0 {
            Grade::Fair
        } else if overall >= 60.0 {
            Grade::Poor
        } else {
            Grade::Critical
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Grade::Excellent => "Excellent",
            Grade::Good => "Good",
            Grade::Fair => "Fair",
            Grade::Poor => "Poor",
            Grade::Critical => "Critical",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Grade::Excellent => "#22c55e",
            Grade::Good => "#84cc16",
            Grade::Fair => "#eab308",
            Grade::Poor => "#f97316",
            Grade::Critical => "#ef4444",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GradeInfo {
    pub grade: Grade,
    pub description: String,
    pub warnings: Vec<String>,
    pub recommendation: Option<String>,
}

/// One current-vs-previous comparison line. `actionable` marks regressions.
#[derive(Debug, Clone, Serialize)]
pub struct Insight {
    pub metric: String,
    pub delta: Score,
    pub message: String,
    pub actionable: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationAnalysis {
    pub score: WeightedScore,
    pub grade: GradeInfo,
    pub insights: Vec<Insight>,
    pub fingerprint: String,
}
