use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Canonical field names
// ---------------------------------------------------------------------------

pub const FULL_NAME: &str = "full_name";
pub const TEAM_NAME: &str = "team_name";
pub const AVERAGE_OKR_SCORE: &str = "average_okr_score";
pub const AVERAGE_KPI_SCORE: &str = "average_kpi_score";
pub const AVERAGE_MANAGER_SCORE: &str = "average_manager_score";
pub const YEAR_OF_SERVICE: &str = "year_of_service";
pub const SUM_TARDY: &str = "sum_tardy";
pub const SUM_ABSENT: &str = "sum_absent";

/// Score fields that are always numeric after reconciliation.
pub const SCORE_FIELDS: [&str; 3] = [AVERAGE_OKR_SCORE, AVERAGE_KPI_SCORE, AVERAGE_MANAGER_SCORE];

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single raw cell. Numbers keep the text they were read from, so ids
/// and names that merely look numeric survive unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Empty,
    Number { value: f64, raw: String },
    Text(String),
}

impl Value {
    /// Classify a raw delimited-file cell. Blank → `Empty`, finite float →
    /// `Number`, anything else → trimmed `Text`.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return Self::Empty;
        }
        match s.parse::<f64>() {
            // `-0` reads as zero
            Ok(n) if n.is_finite() => Self::Number {
                value: if n == 0.0 { 0.0 } else { n },
                raw: s.to_string(),
            },
            _ => Self::Text(s.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Trimmed source text of a non-empty value.
    pub fn as_text(&self) -> Option<String> {
        self.as_str().map(str::to_string)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Number { raw, .. } => Some(raw.as_str()),
            Self::Text(s) => Some(s.as_str()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or_default())
    }
}

/// One raw dataset: ordered columns and ordered rows.
#[derive(Debug, Clone, Default)]
pub struct SourceTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<HashMap<String, Value>>,
}

impl SourceTable {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// No columns and no rows: contributes nothing to the merge.
    pub fn is_blank(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }

    /// Rename columns per `mapping` (raw → canonical), in the header and every row.
    /// If the source already carries the canonical column, the renamed cell only
    /// fills rows where it is empty.
    pub fn rename_columns(&mut self, mapping: &BTreeMap<String, String>) {
        if mapping.is_empty() {
            return;
        }
        let mut renamed: Vec<String> = Vec::with_capacity(self.columns.len());
        for col in &self.columns {
            let name = mapping.get(col.as_str()).unwrap_or(col);
            if !renamed.contains(name) {
                renamed.push(name.clone());
            }
        }
        self.columns = renamed;

        for row in &mut self.rows {
            for (raw, target) in mapping {
                let Some(v) = row.remove(raw) else {
                    continue;
                };
                match row.get(target) {
                    Some(existing) if !existing.is_empty() => {}
                    _ => {
                        row.insert(target.clone(), v);
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Employee identifier, the trimmed key cell exactly as written. Integer-looking
/// ids order numerically (`007` just before `7`) and sort before any
/// non-numeric id; the rest order lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<i128> {
        self.0.parse().ok()
    }
}

impl Ord for UserId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for UserId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalEmployee {
    pub user_id: UserId,
    pub full_name: Option<String>,
    pub team_name: Option<String>,
    pub average_okr_score: f64,
    pub average_kpi_score: f64,
    pub average_manager_score: f64,
    pub year_of_service: Option<f64>,
    pub sum_tardy: Option<f64>,
    pub sum_absent: Option<f64>,
}

impl CanonicalEmployee {
    /// Lower-cased, trimmed team name; `None` when blank.
    pub fn team_key(&self) -> Option<String> {
        self.team_name
            .as_deref()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
    }
}

/// Immutable result of one reconciliation run.
#[derive(Debug, Clone, Serialize)]
pub struct CanonicalTable {
    pub built_at: DateTime<Utc>,
    pub sources: Vec<String>,
    employees: BTreeMap<UserId, CanonicalEmployee>,
}

impl CanonicalTable {
    pub fn new(sources: Vec<String>, employees: BTreeMap<UserId, CanonicalEmployee>) -> Self {
        Self {
            built_at: Utc::now(),
            sources,
            employees,
        }
    }

    pub fn get(&self, id: &UserId) -> Option<&CanonicalEmployee> {
        self.employees.get(id)
    }

    /// Rows in key order.
    pub fn iter(&self) -> impl Iterator<Item = &CanonicalEmployee> {
        self.employees.values()
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}
