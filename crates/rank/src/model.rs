use serde::Serialize;

use teamrank_merge::{CanonicalEmployee, UserId};

// ---------------------------------------------------------------------------
// Score dimensions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreKind {
    Okr,
    Kpi,
    Manager,
}

impl ScoreKind {
    pub const ALL: [ScoreKind; 3] = [ScoreKind::Okr, ScoreKind::Kpi, ScoreKind::Manager];

    pub fn of(&self, employee: &CanonicalEmployee) -> f64 {
        match self {
            Self::Okr => employee.average_okr_score,
            Self::Kpi => employee.average_kpi_score,
            Self::Manager => employee.average_manager_score,
        }
    }

    /// Canonical column name of this score.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Okr => teamrank_merge::model::AVERAGE_OKR_SCORE,
            Self::Kpi => teamrank_merge::model::AVERAGE_KPI_SCORE,
            Self::Manager => teamrank_merge::model::AVERAGE_MANAGER_SCORE,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Okr => "Average OKR Score",
            Self::Kpi => "Average KPI Score",
            Self::Manager => "Average Manager Score",
        }
    }
}

impl std::fmt::Display for ScoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Okr => write!(f, "okr"),
            Self::Kpi => write!(f, "kpi"),
            Self::Manager => write!(f, "manager"),
        }
    }
}

// ---------------------------------------------------------------------------
// Ranked output
// ---------------------------------------------------------------------------

/// Display projection of one employee within a view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub user_id: UserId,
    pub full_name: Option<String>,
    pub score: f64,
    pub year_of_service: Option<f64>,
    pub sum_tardy: Option<f64>,
    pub sum_absent: Option<f64>,
}

impl RankedEntry {
    pub fn project(employee: &CanonicalEmployee, kind: ScoreKind) -> Self {
        Self {
            user_id: employee.user_id.clone(),
            full_name: employee.full_name.clone(),
            score: kind.of(employee),
            year_of_service: employee.year_of_service,
            sum_tardy: employee.sum_tardy,
            sum_absent: employee.sum_absent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedView {
    pub score: ScoreKind,
    pub entries: Vec<RankedEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRanking {
    /// Lower-cased team name the query resolved to.
    pub team: String,
    pub display_name: String,
    /// Whether the query needed fuzzy matching to resolve.
    pub fuzzy: bool,
    /// One view per [`ScoreKind::ALL`], in that order.
    pub views: Vec<RankedView>,
}

impl TeamRanking {
    pub fn view(&self, kind: ScoreKind) -> Option<&RankedView> {
        self.views.iter().find(|v| v.score == kind)
    }
}

// ---------------------------------------------------------------------------
// Not found
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoMatchReason {
    /// Query was blank after trimming.
    EmptyQuery,
    /// No known team cleared the cutoff.
    NoMatch,
    /// Resolved team has no members.
    EmptyTeam,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoMatch {
    pub query: String,
    pub reason: NoMatchReason,
    /// Lower-cased team names, best first. Empty means "no similar team".
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RankingResult {
    Ranked(TeamRanking),
    NotFound(NoMatch),
}

impl RankingResult {
    pub fn is_ranked(&self) -> bool {
        matches!(self, Self::Ranked(_))
    }

    pub fn ranking(&self) -> Option<&TeamRanking> {
        match self {
            Self::Ranked(r) => Some(r),
            Self::NotFound(_) => None,
        }
    }

    pub fn suggestions(&self) -> &[String] {
        match self {
            Self::Ranked(_) => &[],
            Self::NotFound(n) => &n.suggestions,
        }
    }
}
