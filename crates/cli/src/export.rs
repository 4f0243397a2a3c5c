//! `teamrank merge` — reconcile sources and export the canonical table.

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use teamrank_merge::{CanonicalEmployee, CanonicalTable};

use crate::exit_codes::EXIT_ERROR;
use crate::session::Session;
use crate::CliError;

#[derive(Debug, Serialize)]
struct MergeExport<'a> {
    name: &'a str,
    built_at: String,
    sources: &'a [String],
    employee_count: usize,
    employees: Vec<&'a CanonicalEmployee>,
}

pub fn cmd_merge(config: PathBuf, json: bool, output: Option<PathBuf>) -> Result<(), CliError> {
    let session = Session::open(&config)?;

    let bytes = if json {
        let export = MergeExport {
            name: &session.config.name,
            built_at: session.table.built_at.to_rfc3339(),
            sources: &session.table.sources,
            employee_count: session.table.len(),
            employees: session.table.iter().collect(),
        };
        let mut text = serde_json::to_string_pretty(&export)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        text.push('\n');
        text.into_bytes()
    } else {
        write_csv(&session.table)?
    };

    match output {
        Some(path) => {
            std::fs::write(&path, &bytes).map_err(|e| {
                CliError::new(EXIT_ERROR, format!("cannot write {}: {e}", path.display()))
            })?;
            eprintln!("wrote {} employees to {}", session.table.len(), path.display());
        }
        None => {
            std::io::stdout()
                .write_all(&bytes)
                .map_err(|e| CliError::new(EXIT_ERROR, format!("cannot write output: {e}")))?;
        }
    }
    Ok(())
}

/// One CSV row per employee, canonical columns in declaration order.
fn write_csv(table: &CanonicalTable) -> Result<Vec<u8>, CliError> {
    let csv_err = |e: csv::Error| CliError::new(EXIT_ERROR, format!("CSV write error: {e}"));
    let mut writer = csv::Writer::from_writer(Vec::new());
    for employee in table.iter() {
        writer.serialize(employee).map_err(csv_err)?;
    }
    // No rows means serialize never wrote the header
    if table.is_empty() {
        writer
            .write_record([
                "user_id",
                "full_name",
                "team_name",
                "average_okr_score",
                "average_kpi_score",
                "average_manager_score",
                "year_of_service",
                "sum_tardy",
                "sum_absent",
            ])
            .map_err(csv_err)?;
    }
    writer
        .into_inner()
        .map_err(|e| CliError::new(EXIT_ERROR, format!("CSV write error: {e}")))
}
