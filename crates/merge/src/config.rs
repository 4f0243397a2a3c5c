use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

use crate::error::MergeError;
use crate::model::{AVERAGE_KPI_SCORE, AVERAGE_MANAGER_SCORE, AVERAGE_OKR_SCORE};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeamrankConfig {
    pub name: String,
    #[serde(default = "default_key")]
    pub key: String,
    /// Merge order matters: the first source is the merge base.
    pub sources: Vec<SourceSpec>,
    /// Post-join rename, raw column → canonical field.
    #[serde(default = "default_rename")]
    pub rename: BTreeMap<String, String>,
    #[serde(default)]
    pub ranking: RankingConfig,
}

fn default_key() -> String {
    "user_id".into()
}

/// Suffix convention used by the stock employee exports.
pub fn default_rename() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("average_okr_score_df1".to_string(), AVERAGE_OKR_SCORE.to_string()),
        ("average_kpi_score_df2".to_string(), AVERAGE_KPI_SCORE.to_string()),
        ("average_manager_score_df4".to_string(), AVERAGE_MANAGER_SCORE.to_string()),
    ])
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSpec {
    pub name: String,
    pub file: String,
    #[serde(default)]
    pub delimiter: Option<String>,
    /// Applied at load time, before the collision check.
    #[serde(default)]
    pub columns: BTreeMap<String, String>,
}

impl SourceSpec {
    /// Delimiter byte, `,` when unset. Validated by [`TeamrankConfig::validate`].
    pub fn delimiter_byte(&self) -> u8 {
        match self.delimiter.as_deref() {
            Some("\\t") => b'\t',
            Some(d) if d.len() == 1 => d.as_bytes()[0],
            _ => b',',
        }
    }
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RankingConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_cutoff")]
    pub cutoff: f64,
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    #[serde(default = "default_cutoff")]
    pub suggestion_cutoff: f64,
}

fn default_top_n() -> usize {
    5
}

fn default_cutoff() -> f64 {
    0.6
}

fn default_max_suggestions() -> usize {
    3
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            cutoff: default_cutoff(),
            max_suggestions: default_max_suggestions(),
            suggestion_cutoff: default_cutoff(),
        }
    }
}

/// A not-found result offers at most this many team names.
const MAX_SUGGESTIONS: usize = 3;

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl TeamrankConfig {
    pub fn from_toml(input: &str) -> Result<Self, MergeError> {
        let config: TeamrankConfig =
            toml::from_str(input).map_err(|e| MergeError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MergeError> {
        if self.key.trim().is_empty() {
            return Err(MergeError::ConfigValidation("key must not be empty".into()));
        }

        if self.sources.is_empty() {
            return Err(MergeError::ConfigValidation(
                "at least 1 source is required".into(),
            ));
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err(MergeError::ConfigValidation("source name must not be empty".into()));
            }
            if source.file.trim().is_empty() {
                return Err(MergeError::ConfigValidation(format!(
                    "source '{}': file must not be empty",
                    source.name
                )));
            }
            if !seen.insert(source.name.as_str()) {
                return Err(MergeError::ConfigValidation(format!(
                    "duplicate source name '{}'",
                    source.name
                )));
            }
            if let Some(ref d) = source.delimiter {
                if d != "\\t" && (d.len() != 1 || !d.is_ascii()) {
                    return Err(MergeError::ConfigValidation(format!(
                        "source '{}': delimiter must be a single ASCII character, got {d:?}",
                        source.name
                    )));
                }
            }
            self.validate_mapping(&format!("source '{}' columns", source.name), &source.columns)?;
        }

        self.validate_mapping("rename", &self.rename)?;

        let r = &self.ranking;
        for (label, value) in [("cutoff", r.cutoff), ("suggestion_cutoff", r.suggestion_cutoff)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(MergeError::ConfigValidation(format!(
                    "ranking.{label} must be between 0 and 1, got {value}"
                )));
            }
        }
        if r.max_suggestions > MAX_SUGGESTIONS {
            return Err(MergeError::ConfigValidation(format!(
                "ranking.max_suggestions must be at most {MAX_SUGGESTIONS}, got {}",
                r.max_suggestions
            )));
        }

        Ok(())
    }

    fn validate_mapping(&self, label: &str, mapping: &BTreeMap<String, String>) -> Result<(), MergeError> {
        for (raw, target) in mapping {
            if raw == &self.key || target == &self.key {
                return Err(MergeError::ConfigValidation(format!(
                    "{label}: cannot rename to or from key column '{}'",
                    self.key
                )));
            }
            if target.trim().is_empty() {
                return Err(MergeError::ConfigValidation(format!(
                    "{label}: empty target for '{raw}'"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
