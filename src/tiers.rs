use serde::Serialize;

/// Importance classification for evaluation metrics. The assignment is fixed
/// at build time; every known metric belongs to exactly one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Critical,
    Important,
    Supporting,
    Additional,
}

/// Weight applied to metrics that are not registered in any tier. Unknown
/// metrics are kept at the lowest weight rather than dropped, so a score
/// mapping with unexpected keys still aggregates to a defined result.
pub const UNKNOWN_METRIC_WEIGHT: f64 = 1.0;

pub const RETRIEVAL_METRICS: [&str; 3] =
    ["context_precision", "context_recall", "context_entity_recall"];

pub const GENERATION_METRICS: [&str; 6] = [
    "faithfulness",
    "answer_correctness",
    "answer_relevancy",
    "answer_similarity",
    "coherence",
    "fluency",
];

impl Tier {
    pub const ALL: [Tier; 4] = [
        Tier::Critical,
        Tier::Important,
        Tier::Supporting,
        Tier::Additional,
    ];

    pub fn weight(self) -> f64 {
        match self {
            Tier::Critical => 3.0,
            Tier::Important => 2.0,
            Tier::Supporting => 1.5,
            Tier::Additional => 1.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tier::Critical => "critical",
            Tier::Important => "important",
            Tier::Supporting => "supporting",
            Tier::Additional => "additional",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Tier::Critical => "Core answer quality; failures here make the system unusable",
            Tier::Important => "Retrieval and relevance quality with direct user impact",
            Tier::Supporting => "Style and consistency signals that refine the result",
            Tier::Additional => "Auxiliary hygiene checks carried at low weight",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Tier::Critical => "#ef4444",
            Tier::Important => "#f97316",
            Tier::Supporting => "#eab308",
            Tier::Additional => "#3b82f6",
        }
    }

    pub fn members(self) -> &'static [&'static str] {
        match self {
            Tier::Critical => &["faithfulness", "answer_correctness", "context_precision"],
            Tier::Important => &[
                "answer_relevancy",
                "context_recall",
                "context_entity_recall",
            ],
            Tier::Supporting => &["answer_similarity", "coherence", "fluency"],
            Tier::Additional => &["conciseness", "context_utilization", "harmfulness"],
        }
    }
}

/// Number of metrics registered across all tiers.
pub fn known_metric_count() -> usize {
    Tier::ALL.iter().map(|tier| tier.members().len()).sum()
}

pub fn tier_of(metric: &str) -> Option<Tier> {
    match metric {
        "faithfulness" | "answer_correctness" | "context_precision" => Some(Tier::Critical),
        "answer_relevancy" | "context_recall" | "context_entity_recall" => Some(Tier::Important),
        "answer_similarity" | "coherence" | "fluency" => Some(Tier::Supporting),
        "conciseness" | "context_utilization" | "harmfulness" => Some(Tier::Additional),
        _ => None,
    }
}

pub fn weight_of(metric: &str) -> f64 {
    tier_of(metric)
        .map(Tier::weight)
        .unwrap_or(UNKNOWN_METRIC_WEIGHT)
}

#[derive(Debug, Clone, Copy)]
pub struct MetricLabel {
    pub en: &'static str,
    pub ko: &'static str,
}

pub fn metric_label(metric: &str) -> Option<MetricLabel> {
    let (en, ko) = match metric {
        "faithfulness" => ("Faithfulness", "충실성"),
        "answer_correctness" => ("Answer Correctness", "답변 정확성"),
        "context_precision" => ("Context Precision", "문맥 정밀도"),
        "answer_relevancy" => ("Answer Relevancy", "답변 관련성"),
        "context_recall" => ("Context Recall", "문맥 재현율"),
        "context_entity_recall" => ("Context Entity Recall", "문맥 개체 재현율"),
        "answer_similarity" => ("Answer Similarity", "답변 유사도"),
        "coherence" => ("Coherence", "일관성"),
        "fluency" => ("Fluency", "유창성"),
        "conciseness" => ("Conciseness", "간결성"),
        "context_utilization" => ("Context Utilization", "문맥 활용도"),
        "harmfulness" => ("Harmfulness", "유해성"),
        _ => return None,
    };
    Some(MetricLabel { en, ko })
}

/// English display name, falling back to the raw identifier for metrics
/// outside the registered set.
pub fn display_name(metric: &str) -> String {
    metric_label(metric)
        .map(|label| label.en.to_string())
        .unwrap_or_else(|| metric.to_string())
}

/// Bilingual display name used in rendered reports.
pub fn bilingual_name(metric: &str) -> String {
    metric_label(metric)
        .map(|label| format!("{} ({})", label.en, label.ko))
        .unwrap_or_else(|| metric.to_string())
}
