use std::collections::{BTreeMap, HashMap};

use crate::config::{default_rename, TeamrankConfig};
use crate::error::MergeError;
use crate::model::{
    CanonicalEmployee, CanonicalTable, SourceTable, UserId, Value, AVERAGE_KPI_SCORE,
    AVERAGE_MANAGER_SCORE, AVERAGE_OKR_SCORE, FULL_NAME, SUM_ABSENT, SUM_TARDY, TEAM_NAME,
    YEAR_OF_SERVICE,
};

#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    pub key: String,
    /// Applied once after all joins, raw column → canonical field.
    pub rename: BTreeMap<String, String>,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            key: "user_id".into(),
            rename: default_rename(),
        }
    }
}

impl From<&TeamrankConfig> for ReconcileOptions {
    fn from(config: &TeamrankConfig) -> Self {
        Self {
            key: config.key.clone(),
            rename: config.rename.clone(),
        }
    }
}

/// Working table: ordered column names plus one cell map per key.
struct Accumulated {
    columns: Vec<String>,
    rows: BTreeMap<UserId, HashMap<String, Value>>,
}

/// Merge all sources into one row per key. Outer join in source order;
/// a column name already present in the accumulated table is dropped from
/// later sources, so the first source to define a column keeps it.
pub fn reconcile(sources: &[SourceTable], options: &ReconcileOptions) -> Result<CanonicalTable, MergeError> {
    let mut acc = Accumulated {
        columns: Vec::new(),
        rows: BTreeMap::new(),
    };
    let mut contributors = Vec::new();

    for source in sources {
        if source.is_blank() {
            log::debug!("source '{}': blank, skipped", source.name);
            continue;
        }
        join_source(&mut acc, source, &options.key)?;
        contributors.push(source.name.clone());
    }

    apply_rename(&mut acc, &options.rename);

    let mut employees = BTreeMap::new();
    for (user_id, cells) in acc.rows {
        let employee = to_canonical(user_id.clone(), &cells)?;
        employees.insert(user_id, employee);
    }

    log::info!(
        "reconciled {} employees from {} source(s)",
        employees.len(),
        contributors.len()
    );
    Ok(CanonicalTable::new(contributors, employees))
}

fn join_source(acc: &mut Accumulated, source: &SourceTable, key: &str) -> Result<(), MergeError> {
    if !source.columns.iter().any(|c| c == key) {
        return Err(MergeError::MissingKey {
            source: source.name.clone(),
            column: key.into(),
        });
    }

    let kept: Vec<&String> = source
        .columns
        .iter()
        .filter(|c| c.as_str() != key && !c.is_empty())
        .filter(|c| !acc.columns.contains(*c))
        .collect();

    let dropped = source.columns.len() - kept.len() - 1;
    log::debug!(
        "source '{}': joining {} column(s), dropping {} already present",
        source.name,
        kept.len(),
        dropped
    );

    for (i, row) in source.rows.iter().enumerate() {
        // Keyed on the cell text; never through its numeric reading
        let id = match row.get(key).and_then(Value::as_str) {
            Some(raw) => UserId::new(raw),
            _ => {
                return Err(MergeError::BlankKey {
                    source: source.name.clone(),
                    row: i + 1,
                })
            }
        };

        let cells = acc.rows.entry(id.clone()).or_default();
        for col in &kept {
            let Some(value) = row.get(col.as_str()) else {
                continue;
            };
            match cells.get(col.as_str()) {
                Some(existing) if !existing.is_empty() => {
                    if !value.is_empty() && existing != value {
                        log::warn!(
                            "source '{}': duplicate key '{}', keeping first {}",
                            source.name,
                            id,
                            col
                        );
                    }
                }
                _ => {
                    cells.insert((*col).clone(), value.clone());
                }
            }
        }
    }

    acc.columns.extend(kept.into_iter().cloned());
    Ok(())
}

/// Coalesce renamed columns into their canonical field. The canonical value,
/// when present, wins over the renamed one.
fn apply_rename(acc: &mut Accumulated, rename: &BTreeMap<String, String>) {
    for (raw, target) in rename {
        if !acc.columns.iter().any(|c| c == raw) {
            continue;
        }
        for cells in acc.rows.values_mut() {
            let Some(value) = cells.remove(raw) else {
                continue;
            };
            match cells.get(target) {
                Some(existing) if !existing.is_empty() => {}
                _ => {
                    cells.insert(target.clone(), value);
                }
            }
        }
        acc.columns.retain(|c| c != raw);
        if !acc.columns.contains(target) {
            acc.columns.push(target.clone());
        }
        log::debug!("renamed column '{raw}' to '{target}'");
    }
}

fn to_canonical(user_id: UserId, cells: &HashMap<String, Value>) -> Result<CanonicalEmployee, MergeError> {
    let text = |col: &str| cells.get(col).and_then(Value::as_text);
    let number = |col: &str| match cells.get(col) {
        None | Some(Value::Empty) => None,
        Some(Value::Number { value, .. }) => Some(*value),
        Some(other) => {
            log::warn!("employee '{user_id}': ignoring non-numeric {col} '{other}'");
            None
        }
    };
    let score = |col: &str| match cells.get(col) {
        None | Some(Value::Empty) => Ok(0.0),
        Some(Value::Number { value, .. }) => Ok(*value),
        Some(other) => Err(MergeError::InvalidScore {
            user_id: user_id.to_string(),
            column: col.into(),
            value: other.to_string(),
        }),
    };

    Ok(CanonicalEmployee {
        full_name: text(FULL_NAME),
        team_name: text(TEAM_NAME),
        average_okr_score: score(AVERAGE_OKR_SCORE)?,
        average_kpi_score: score(AVERAGE_KPI_SCORE)?,
        average_manager_score: score(AVERAGE_MANAGER_SCORE)?,
        year_of_service: number(YEAR_OF_SERVICE),
        sum_tardy: number(SUM_TARDY),
        sum_absent: number(SUM_ABSENT),
        user_id,
    })
}
