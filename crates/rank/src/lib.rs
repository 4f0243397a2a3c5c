//! `teamrank-rank` — Team name resolution and per-score rankings.
//!
//! Pure crate: takes a reconciled [`CanonicalTable`](teamrank_merge::CanonicalTable)
//! and a free-text team query, returns a [`RankingResult`]. Never fails; an
//! unresolvable query is a `NotFound` value.

pub mod index;
pub mod matcher;
pub mod model;
pub mod resolver;
pub mod similarity;

pub use index::TeamIndex;
pub use matcher::close_matches;
pub use model::{NoMatch, NoMatchReason, RankedEntry, RankedView, RankingResult, ScoreKind, TeamRanking};
pub use resolver::{resolve, ResolveOptions, Resolver};
pub use similarity::SequenceMatcher;
