//! CLI Exit Code Registry
//!
//! Single source of truth for all `teamrank` exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Codes
//!
//! | Code | Meaning                                        |
//! |------|------------------------------------------------|
//! | 0    | Success                                        |
//! | 1    | General error (unspecified)                    |
//! | 2    | CLI usage error (bad args)                     |
//! | 3    | Config file unreadable or invalid              |
//! | 4    | A configured source could not be loaded        |
//! | 5    | Reconciliation failed (missing key, bad score) |
//! | 6    | Query did not resolve to a team (`query` only) |

use teamrank_merge::MergeError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure (output write, serialization).
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments. clap exits with this code itself.
#[allow(dead_code)]
pub const EXIT_USAGE: u8 = 2;

/// Config file missing, unparseable, or failing validation.
pub const EXIT_CONFIG: u8 = 3;

/// A source file could not be read or parsed.
pub const EXIT_SOURCE_LOAD: u8 = 4;

/// Sources loaded but could not be merged.
pub const EXIT_RECONCILE: u8 = 5;

/// One-shot query found no team. Interactive mode never exits with this.
pub const EXIT_NOT_FOUND: u8 = 6;

/// Map a merge-layer error to its exit code.
pub fn merge_exit_code(err: &MergeError) -> u8 {
    match err {
        MergeError::ConfigParse(_) | MergeError::ConfigValidation(_) => EXIT_CONFIG,
        MergeError::SourceLoad { .. } => EXIT_SOURCE_LOAD,
        MergeError::MissingKey { .. }
        | MergeError::BlankKey { .. }
        | MergeError::InvalidScore { .. } => EXIT_RECONCILE,
    }
}
