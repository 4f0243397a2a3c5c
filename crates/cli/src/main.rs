// teamrank CLI - top performers per team across merged employee datasets

mod exit_codes;
mod export;
mod query;
mod render;
mod session;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use exit_codes::{merge_exit_code, EXIT_SUCCESS};
use teamrank_merge::MergeError;

#[derive(Parser)]
#[command(name = "teamrank")]
#[command(about = "Rank a team's employees by OKR, KPI and manager scores")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank one team and exit (exit 6 when no team matches)
    #[command(after_help = "\
Examples:
  teamrank query teamrank.toml Engineering
  teamrank query teamrank.toml enginering --top 3
  teamrank query teamrank.toml sales --json | jq '.views[0]'")]
    Query {
        /// Path to the teamrank.toml config file
        config: PathBuf,

        /// Team name (case-insensitive, typos tolerated)
        team: String,

        /// Entries per ranking (default: ranking.top_n from config)
        #[arg(long, short = 'n', env = "TEAMRANK_TOP")]
        top: Option<usize>,

        /// Output JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Answer team queries read from stdin, one per line
    #[command(after_help = "\
Sources are merged once at startup; every query reuses the merged table.
Type 'quit' or press Ctrl-D to leave.

Examples:
  teamrank ask teamrank.toml
  printf 'sales\\nengineering\\n' | teamrank ask teamrank.toml")]
    Ask {
        /// Path to the teamrank.toml config file
        config: PathBuf,

        /// Entries per ranking (default: ranking.top_n from config)
        #[arg(long, short = 'n', env = "TEAMRANK_TOP")]
        top: Option<usize>,
    },

    /// Merge all sources and export one row per employee
    #[command(after_help = "\
Examples:
  teamrank merge teamrank.toml
  teamrank merge teamrank.toml --json
  teamrank merge teamrank.toml --output merged.csv")]
    Merge {
        /// Path to the teamrank.toml config file
        config: PathBuf,

        /// Output JSON instead of CSV
        #[arg(long)]
        json: bool,

        /// Write to file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Validate a config without loading sources
    #[command(after_help = "\
Config format:
  name = \"Employee performance\"
  key = \"user_id\"                  # optional

  [[sources]]                       # merge order; first source is the base
  name = \"okr\"
  file = \"employees (1).csv\"       # relative to the config file
  delimiter = \",\"                  # optional
  [sources.columns]                 # optional raw -> canonical mapping
  okr = \"average_okr_score\"

  [rename]                          # optional post-merge rename
  average_okr_score_df1 = \"average_okr_score\"

  [ranking]                         # optional
  top_n = 5
  cutoff = 0.6
  max_suggestions = 3
  suggestion_cutoff = 0.6

Examples:
  teamrank validate teamrank.toml")]
    Validate {
        /// Path to the teamrank.toml config file
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: teamrank <command> [options]");
            eprintln!("       teamrank --help for more information");
            Ok(())
        }
        Some(Commands::Query { config, team, top, json }) => query::cmd_query(config, team, top, json),
        Some(Commands::Ask { config, top }) => query::cmd_ask(config, top),
        Some(Commands::Merge { config, json, output }) => export::cmd_merge(config, json, output),
        Some(Commands::Validate { config }) => cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn cmd_validate(config: PathBuf) -> Result<(), CliError> {
    let cfg = session::read_config(&config)?;
    eprintln!(
        "{}: ok ({} source(s), key '{}')",
        cfg.name,
        cfg.sources.len(),
        cfg.key
    );
    Ok(())
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    /// Error from loading or merging sources, with the source named when known.
    pub fn merge(err: MergeError) -> Self {
        let hint = match &err {
            MergeError::SourceLoad { .. } => {
                Some("source paths are resolved relative to the config file".to_string())
            }
            MergeError::MissingKey { column, .. } => {
                Some(format!("every source needs a '{column}' column; set `key` in the config to use another"))
            }
            _ => None,
        };
        Self { code: merge_exit_code(&err), message: err.to_string(), hint }
    }
}
