use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type Score = f64;

/// One evaluation run as supplied by the caller. Scores are keyed by metric
/// identifier and expected in [0, 1]; the map is sparse and keys are unique
/// by construction. A `BTreeMap` keeps iteration order stable so rendered
/// reports are deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub id: String,
    pub name: String,
    pub scores: BTreeMap<String, Score>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub dataset_name: Option<String>,
    pub model_name: Option<String>,
    pub vector_db_name: Option<String>,
    pub config_id: Option<String>,
    #[serde(default)]
    pub failed_cases: Vec<FailedCase>,
    pub diagnosis_summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedCase {
    pub question: String,
    pub reason: String,
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_count() -> u32 {
    1
}
