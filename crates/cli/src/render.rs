//! Human-readable rendering of ranking results.

use std::fmt::Write;

use teamrank_rank::{NoMatch, NoMatchReason, RankedView, RankingResult, TeamRanking};

use crate::util::{display_width, format_number, pad_left, pad_right};

const MAX_NAME_WIDTH: usize = 32;

pub fn render_result(result: &RankingResult) -> String {
    match result {
        RankingResult::Ranked(ranking) => render_ranking(ranking),
        RankingResult::NotFound(no_match) => render_not_found(no_match),
    }
}

fn render_ranking(ranking: &TeamRanking) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Top employees in team '{}':", ranking.display_name);
    for view in &ranking.views {
        out.push('\n');
        let _ = writeln!(out, "Top Employees Ranked by {}", view.score.label());
        out.push_str(&render_view(view));
    }
    out
}

fn render_not_found(no_match: &NoMatch) -> String {
    if no_match.reason == NoMatchReason::EmptyQuery {
        return "Please enter a team name.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "No employees found for team '{}'.", no_match.query);
    if no_match.suggestions.is_empty() {
        out.push_str("No similar team names found.\n");
    } else {
        out.push_str("Did you mean one of these?\n");
        for s in &no_match.suggestions {
            let _ = writeln!(out, "  - {s}");
        }
    }
    out
}

/// Aligned table: rank, id, name, score, tenure, attendance.
fn render_view(view: &RankedView) -> String {
    if view.entries.is_empty() {
        return "  (no entries)\n".to_string();
    }

    let headers = [
        "#",
        "user_id",
        "full_name",
        view.score.field(),
        "year_of_service",
        "sum_tardy",
        "sum_absent",
    ];
    let rows: Vec<[String; 7]> = view
        .entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            [
                (i + 1).to_string(),
                e.user_id.to_string(),
                e.full_name.clone().unwrap_or_default(),
                format_number(Some(e.score)),
                format_number(e.year_of_service),
                format_number(e.sum_tardy),
                format_number(e.sum_absent),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(*h)).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(display_width(cell));
        }
    }
    widths[2] = widths[2].min(MAX_NAME_WIDTH);

    // Text columns left-aligned, numeric columns right-aligned
    let align = |col: usize, s: &str, w: usize| {
        if col == 1 || col == 2 {
            pad_right(s, w)
        } else {
            pad_left(s, w)
        }
    };

    let mut out = String::new();
    let header_line: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(c, h)| align(c, *h, widths[c]))
        .collect();
    let _ = writeln!(out, "  {}", header_line.join("  ").trim_end());
    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(c, cell)| align(c, cell.as_str(), widths[c]))
            .collect();
        let _ = writeln!(out, "  {}", line.join("  ").trim_end());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use teamrank_merge::UserId;
    use teamrank_rank::{RankedEntry, ScoreKind};

    fn entry(id: &str, name: &str, score: f64) -> RankedEntry {
        RankedEntry {
            user_id: UserId::new(id),
            full_name: Some(name.into()),
            score,
            year_of_service: Some(3.0),
            sum_tardy: None,
            sum_absent: Some(1.0),
        }
    }

    #[test]
    fn ranked_has_three_sections() {
        let ranking = TeamRanking {
            team: "sales".into(),
            display_name: "Sales".into(),
            fuzzy: false,
            views: ScoreKind::ALL
                .iter()
                .map(|&k| RankedView { score: k, entries: vec![entry("3", "Cara Ong", 4.8)] })
                .collect(),
        };
        let text = render_result(&RankingResult::Ranked(ranking));
        assert!(text.starts_with("Top employees in team 'Sales':"));
        assert!(text.contains("Top Employees Ranked by Average OKR Score"));
        assert!(text.contains("Top Employees Ranked by Average KPI Score"));
        assert!(text.contains("Top Employees Ranked by Average Manager Score"));
        assert!(text.contains("average_manager_score"));
        assert!(text.contains("Cara Ong"));
        assert!(text.contains("4.8"));
    }

    #[test]
    fn columns_align() {
        let view = RankedView {
            score: ScoreKind::Okr,
            entries: vec![entry("1", "Al", 4.5), entry("22", "Bartholomew", 10.0)],
        };
        let text = render_view(&view);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        // Score column is right-aligned, so values end where the header ends
        let header_end = lines[0].find("average_okr_score").unwrap() + "average_okr_score".len();
        assert_eq!(lines[1].find("4.5").unwrap() + 3, header_end);
        assert_eq!(lines[2].find("10").unwrap() + 2, header_end);
    }

    #[test]
    fn did_you_mean() {
        let nm = NoMatch {
            query: "slack".into(),
            reason: NoMatchReason::NoMatch,
            suggestions: vec!["sales".into()],
        };
        let text = render_result(&RankingResult::NotFound(nm));
        assert_eq!(
            text,
            "No employees found for team 'slack'.\nDid you mean one of these?\n  - sales\n"
        );
    }

    #[test]
    fn no_similar_team() {
        let nm = NoMatch {
            query: "xyzzyzzy".into(),
            reason: NoMatchReason::NoMatch,
            suggestions: vec![],
        };
        let text = render_result(&RankingResult::NotFound(nm));
        assert!(text.ends_with("No similar team names found.\n"));
    }

    #[test]
    fn empty_query_prompts() {
        let nm = NoMatch {
            query: String::new(),
            reason: NoMatchReason::EmptyQuery,
            suggestions: vec![],
        };
        assert_eq!(render_result(&RankingResult::NotFound(nm)), "Please enter a team name.\n");
    }
}
