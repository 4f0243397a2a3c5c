//! `teamrank-merge` — Multi-source employee dataset reconciliation.
//!
//! Pure engine crate: receives pre-loaded source tables, returns one canonical
//! row per employee. CSV loading lives behind the [`SourceProvider`] seam.

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod provider;

pub use config::{RankingConfig, SourceSpec, TeamrankConfig};
pub use engine::{reconcile, ReconcileOptions};
pub use error::MergeError;
pub use model::{CanonicalEmployee, CanonicalTable, SourceTable, UserId, Value};
pub use provider::{load_sources, CsvProvider, SourceProvider};
