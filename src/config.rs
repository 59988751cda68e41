use crate::error::{Result, RexError};
use crate::tiers;
use crate::types::evaluation::Score;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = "rex.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".rex/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/rex-report/config.toml";

pub const DEFAULT_WARN_THRESHOLD: Score = 70.0;
pub const DEFAULT_INSIGHT_MIN_DELTA: Score = 2.0;
pub const DEFAULT_MIN_METRICS_HIGH: usize = 8;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RexConfig {
    pub grading: Option<GradingConfig>,
    pub reliability: Option<ReliabilityConfig>,
    pub report: Option<ReportConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GradingConfig {
    pub warn_threshold: Option<Score>,
    pub insight_min_delta: Option<Score>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReliabilityConfig {
    pub min_metrics_high: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    pub include_failure_cases: Option<bool>,
}

impl RexConfig {
    pub fn default_warn_threshold() -> Score {
        DEFAULT_WARN_THRESHOLD
    }

    pub fn default_insight_min_delta() -> Score {
        DEFAULT_INSIGHT_MIN_DELTA
    }

    pub fn default_min_metrics_high() -> usize {
        DEFAULT_MIN_METRICS_HIGH
    }

    pub fn warn_threshold(&self) -> Score {
        self.grading
            .as_ref()
            .and_then(|grading| grading.warn_threshold)
            .unwrap_or(DEFAULT_WARN_THRESHOLD)
    }

    pub fn insight_min_delta(&self) -> Score {
        self.grading
            .as_ref()
            .and_then(|grading| grading.insight_min_delta)
            .unwrap_or(DEFAULT_INSIGHT_MIN_DELTA)
    }

    pub fn min_metrics_high(&self) -> usize {
        self.reliability
            .as_ref()
            .and_then(|reliability| reliability.min_metrics_high)
            .unwrap_or(DEFAULT_MIN_METRICS_HIGH)
    }

    pub fn include_failure_cases(&self) -> bool {
        self.report
            .as_ref()
            .and_then(|report| report.include_failure_cases)
            .unwrap_or(true)
    }

    pub fn validate(&self) -> Result<()> {
        let warn_threshold = self.warn_threshold();
        if !(0.0..=100.0).contains(&warn_threshold) {
            return Err(RexError::ConfigParse(
                "grading.warn_threshold must be between 0 and 100".to_string(),
            ));
        }

        let insight_min_delta = self.insight_min_delta();
        if !(0.0..=100.0).contains(&insight_min_delta) {
            return Err(RexError::ConfigParse(
                "grading.insight_min_delta must be between 0 and 100".to_string(),
            ));
        }

        let min_metrics_high = self.min_metrics_high();
        if min_metrics_high == 0 || min_metrics_high > tiers::known_metric_count() {
            return Err(RexError::ConfigParse(format!(
                "reliability.min_metrics_high must be between 1 and {}",
                tiers::known_metric_count()
            )));
        }

        Ok(())
    }
}

/// Load the layered configuration for evaluations under `dir`. Returns
/// `Ok(None)` when no `rex.toml` is present; a global user config and a
/// local override file are merged around it when they exist.
pub fn load_config(dir: &Path) -> Result<Option<RexConfig>> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(dir, global.as_deref())
}

pub(crate) fn load_config_with_global(
    dir: &Path,
    global_path: Option<&Path>,
) -> Result<Option<RexConfig>> {
    let dir_path = dir.join(DEFAULT_CONFIG_FILE);
    if !dir_path.exists() {
        return Ok(None);
    }

    let mut merged = Value::Table(Map::new());
    if let Some(path) = global_path {
        merge_file_if_exists(&mut merged, path)?;
    }
    merge_file_if_exists(&mut merged, &dir_path)?;
    merge_file_if_exists(&mut merged, &dir.join(DEFAULT_LOCAL_FILE))?;

    let cfg: RexConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| RexError::ConfigParse(e.to_string()))?;
    cfg.validate()?;
    Ok(Some(cfg))
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let content = std::fs::read_to_string(path)?;
    let value = toml::from_str(&content)
        .map_err(|e| RexError::ConfigParse(format!("{}: {}", path.display(), e)))?;
    merge_toml(merged, value);
    Ok(())
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}
