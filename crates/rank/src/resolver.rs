use std::cell::OnceCell;
use std::cmp::Ordering;

use teamrank_merge::{CanonicalEmployee, CanonicalTable, RankingConfig};

use crate::index::TeamIndex;
use crate::matcher::close_matches;
use crate::model::{NoMatch, NoMatchReason, RankedEntry, RankedView, RankingResult, ScoreKind, TeamRanking};

#[derive(Debug, Clone, PartialEq)]
pub struct ResolveOptions {
    pub top_n: usize,
    pub cutoff: f64,
    pub max_suggestions: usize,
    pub suggestion_cutoff: f64,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self::from(&RankingConfig::default())
    }
}

impl From<&RankingConfig> for ResolveOptions {
    fn from(config: &RankingConfig) -> Self {
        Self {
            top_n: config.top_n,
            cutoff: config.cutoff,
            max_suggestions: config.max_suggestions,
            suggestion_cutoff: config.suggestion_cutoff,
        }
    }
}

/// Answers team queries against one reconciled table. The team index is
/// built on the first query and reused for the rest.
pub struct Resolver<'t> {
    table: &'t CanonicalTable,
    options: ResolveOptions,
    index: OnceCell<TeamIndex>,
}

impl<'t> Resolver<'t> {
    pub fn new(table: &'t CanonicalTable, options: ResolveOptions) -> Self {
        Self {
            table,
            options,
            index: OnceCell::new(),
        }
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    pub fn index(&self) -> &TeamIndex {
        self.index.get_or_init(|| TeamIndex::build(self.table))
    }

    pub fn resolve(&self, query: &str) -> RankingResult {
        self.resolve_top(query, self.options.top_n)
    }

    /// Same as [`resolve`](Self::resolve) with a per-query `top_n`.
    pub fn resolve_top(&self, query: &str, top_n: usize) -> RankingResult {
        let normalized = query.trim().to_lowercase();
        if normalized.is_empty() {
            return not_found(query, NoMatchReason::EmptyQuery, Vec::new());
        }

        let index = self.index();
        let (team, fuzzy) = if index.get(&normalized).is_some() {
            (normalized.clone(), false)
        } else {
            let best = close_matches(&normalized, index.keys(), 1, self.options.cutoff);
            match best.first() {
                Some(hit) => {
                    log::debug!("'{normalized}' resolved to '{}' (ratio {:.3})", hit.candidate, hit.score);
                    (hit.candidate.to_string(), true)
                }
                None => {
                    let suggestions = close_matches(
                        &normalized,
                        index.keys(),
                        self.options.max_suggestions,
                        self.options.suggestion_cutoff,
                    )
                    .into_iter()
                    .map(|m| m.candidate.to_string())
                    .collect();
                    return not_found(query, NoMatchReason::NoMatch, suggestions);
                }
            }
        };

        let Some(entry) = index.get(&team) else {
            return not_found(query, NoMatchReason::EmptyTeam, Vec::new());
        };
        let members: Vec<&CanonicalEmployee> =
            entry.members.iter().filter_map(|id| self.table.get(id)).collect();
        if members.is_empty() {
            return not_found(query, NoMatchReason::EmptyTeam, Vec::new());
        }

        let views = ScoreKind::ALL
            .iter()
            .map(|&kind| rank_by(&members, kind, top_n))
            .collect();

        RankingResult::Ranked(TeamRanking {
            display_name: entry.display_name.clone(),
            team,
            fuzzy,
            views,
        })
    }
}

/// Resolve one query against `table`. Builds a fresh team index; use a
/// [`Resolver`] to answer several queries against the same table.
pub fn resolve(query: &str, table: &CanonicalTable, options: &ResolveOptions) -> RankingResult {
    Resolver::new(table, options.clone()).resolve(query)
}

/// Members sorted by `kind` descending, ties in member order, first `top_n`.
fn rank_by(members: &[&CanonicalEmployee], kind: ScoreKind, top_n: usize) -> RankedView {
    let mut sorted: Vec<&CanonicalEmployee> = members.to_vec();
    // Scores are finite; `-0.0` and `0.0` tie
    sorted.sort_by(|a, b| kind.of(b).partial_cmp(&kind.of(a)).unwrap_or(Ordering::Equal));
    RankedView {
        score: kind,
        entries: sorted
            .into_iter()
            .take(top_n)
            .map(|e| RankedEntry::project(e, kind))
            .collect(),
    }
}

fn not_found(query: &str, reason: NoMatchReason, suggestions: Vec<String>) -> RankingResult {
    RankingResult::NotFound(NoMatch {
        query: query.trim().to_string(),
        reason,
        suggestions,
    })
}
