//! Load a config, its sources, and the reconciled table.
//!
//! A session reconciles exactly once; every query made through it reads the
//! same table.

use std::path::{Path, PathBuf};

use teamrank_merge::{
    load_sources, reconcile, CanonicalTable, CsvProvider, ReconcileOptions, TeamrankConfig,
};
use teamrank_rank::{ResolveOptions, Resolver};

use crate::exit_codes::{merge_exit_code, EXIT_CONFIG};
use crate::CliError;

pub struct Session {
    pub config: TeamrankConfig,
    pub table: CanonicalTable,
}

impl Session {
    pub fn open(config_path: &Path) -> Result<Self, CliError> {
        let config = read_config(config_path)?;

        // Source paths are relative to the config file's directory
        let base_dir = config_dir(config_path);
        let provider = CsvProvider::new(base_dir);

        let sources = load_sources(&config, &provider).map_err(CliError::merge)?;
        let table = reconcile(&sources, &ReconcileOptions::from(&config)).map_err(CliError::merge)?;

        log::info!(
            "session '{}': {} employees from {}",
            config.name,
            table.len(),
            table.sources.join(", ")
        );
        Ok(Self { config, table })
    }

    /// Resolver over this session's table, with `top_n` overriding the config.
    pub fn resolver(&self, top_n: Option<usize>) -> Resolver<'_> {
        let mut options = ResolveOptions::from(&self.config.ranking);
        if let Some(n) = top_n {
            options.top_n = n;
        }
        Resolver::new(&self.table, options)
    }
}

pub fn read_config(path: &Path) -> Result<TeamrankConfig, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| CliError {
        code: EXIT_CONFIG,
        message: format!("cannot read config {}: {e}", path.display()),
        hint: None,
    })?;
    TeamrankConfig::from_toml(&text).map_err(|e| CliError {
        code: merge_exit_code(&e),
        message: format!("{}: {e}", path.display()),
        hint: Some("see `teamrank validate --help` for the config format".into()),
    })
}

fn config_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
