//! `teamrank query` and `teamrank ask` — resolve team names against a session.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use teamrank_rank::RankingResult;

use crate::exit_codes::{EXIT_ERROR, EXIT_NOT_FOUND};
use crate::render::render_result;
use crate::session::Session;
use crate::CliError;

const QUIT_WORDS: [&str; 2] = ["quit", "exit"];

pub fn cmd_query(config: PathBuf, team: String, top: Option<usize>, json: bool) -> Result<(), CliError> {
    let session = Session::open(&config)?;
    let resolver = session.resolver(top);
    let result = resolver.resolve(&team);

    if json {
        let text = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        println!("{text}");
    } else {
        print!("{}", render_result(&result));
    }

    match result {
        RankingResult::Ranked(_) => Ok(()),
        // Already explained on stdout
        RankingResult::NotFound(_) => Err(CliError::new(EXIT_NOT_FOUND, "")),
    }
}

pub fn cmd_ask(config: PathBuf, top: Option<usize>) -> Result<(), CliError> {
    let session = Session::open(&config)?;
    let resolver = session.resolver(top);

    eprintln!(
        "{}: {} employees loaded. Enter a team name (Ctrl-D or 'quit' to leave).",
        session.config.name,
        session.table.len()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        eprint!("team> ");
        let _ = io::stderr().flush();

        let Some(line) = lines.next() else {
            eprintln!();
            break;
        };
        let line = line.map_err(|e| CliError::new(EXIT_ERROR, format!("cannot read input: {e}")))?;
        if QUIT_WORDS.contains(&line.trim().to_lowercase().as_str()) {
            break;
        }

        let result = resolver.resolve(&line);
        writeln!(stdout, "{}", render_result(&result))
            .map_err(|e| CliError::new(EXIT_ERROR, format!("cannot write output: {e}")))?;
    }
    Ok(())
}
