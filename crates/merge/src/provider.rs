use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::{SourceSpec, TeamrankConfig};
use crate::error::MergeError;
use crate::model::{SourceTable, Value};

/// Supplies the raw rows for one configured source.
pub trait SourceProvider {
    fn load(&self, spec: &SourceSpec) -> Result<SourceTable, MergeError>;
}

/// Reads delimited files, resolving relative paths against `base_dir`.
pub struct CsvProvider {
    base_dir: PathBuf,
}

impl CsvProvider {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn path_for(&self, spec: &SourceSpec) -> PathBuf {
        let file = Path::new(&spec.file);
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.base_dir.join(file)
        }
    }
}

impl SourceProvider for CsvProvider {
    fn load(&self, spec: &SourceSpec) -> Result<SourceTable, MergeError> {
        let path = self.path_for(spec);
        let data = std::fs::read_to_string(&path).map_err(|e| MergeError::SourceLoad {
            source: spec.name.clone(),
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        parse_delimited(&spec.name, &data, spec.delimiter_byte())
    }
}

/// Parse delimited text with a header row into a [`SourceTable`].
/// Short rows are padded with empty cells; empty input yields a blank table.
pub fn parse_delimited(name: &str, data: &str, delimiter: u8) -> Result<SourceTable, MergeError> {
    let load_err = |e: csv::Error| MergeError::SourceLoad {
        source: name.into(),
        message: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(load_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    // A zero-byte file parses as a single empty header.
    if headers.iter().all(|h| h.is_empty()) {
        return Ok(SourceTable::new(name, Vec::new()));
    }

    let mut table = SourceTable::new(name, headers);

    for record in reader.records() {
        let record = record.map_err(load_err)?;
        let mut row = HashMap::with_capacity(table.columns.len());
        for (i, h) in table.columns.iter().enumerate() {
            if h.is_empty() {
                continue;
            }
            let value = record.get(i).map(Value::parse).unwrap_or(Value::Empty);
            row.insert(h.clone(), value);
        }
        table.rows.push(row);
    }

    log::debug!(
        "source '{}': {} columns, {} rows",
        name,
        table.columns.len(),
        table.rows.len()
    );
    Ok(table)
}

/// Load every configured source in order, applying each source's column
/// mapping. Stops at the first source that fails.
pub fn load_sources(
    config: &TeamrankConfig,
    provider: &dyn SourceProvider,
) -> Result<Vec<SourceTable>, MergeError> {
    let mut tables = Vec::with_capacity(config.sources.len());
    for spec in &config.sources {
        let mut table = provider.load(spec)?;
        table.name = spec.name.clone();
        table.rename_columns(&spec.columns);
        tables.push(table);
    }
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic() {
        let data = "user_id,full_name,average_okr_score\n1,Ada,4.5\n2,Grace,\n";
        let t = parse_delimited("okr", data, b',').unwrap();
        assert_eq!(t.name, "okr");
        assert_eq!(t.columns, vec!["user_id", "full_name", "average_okr_score"]);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0]["full_name"], Value::Text("Ada".into()));
        assert_eq!(t.rows[0]["average_okr_score"].as_number(), Some(4.5));
        assert_eq!(t.rows[1]["average_okr_score"], Value::Empty);
    }

    #[test]
    fn parse_semicolon_and_short_rows() {
        let data = "user_id;team_name;sum_tardy\n7;Sales\n";
        let t = parse_delimited("att", data, b';').unwrap();
        assert_eq!(t.rows[0]["team_name"], Value::Text("Sales".into()));
        assert_eq!(t.rows[0]["sum_tardy"], Value::Empty);
    }

    #[test]
    fn parse_empty_input_is_blank() {
        let t = parse_delimited("empty", "", b',').unwrap();
        assert!(t.is_blank());
    }

    #[test]
    fn parse_header_only() {
        let t = parse_delimited("hdr", "user_id,team_name\n", b',').unwrap();
        assert_eq!(t.columns.len(), 2);
        assert!(t.rows.is_empty());
        assert!(!t.is_blank());
    }

    #[test]
    fn missing_file_names_source() {
        let dir = tempfile::tempdir().unwrap();
        let provider = CsvProvider::new(dir.path());
        let spec = SourceSpec {
            name: "kpi".into(),
            file: "nope.csv".into(),
            delimiter: None,
            columns: Default::default(),
        };
        let err = provider.load(&spec).unwrap_err();
        assert_eq!(err.source_name(), Some("kpi"));
        assert!(err.to_string().contains("nope.csv"));
    }
}
