use crate::similarity::SequenceMatcher;

/// A candidate that cleared the cutoff.
#[derive(Debug, Clone, PartialEq)]
pub struct CloseMatch<'a> {
    pub candidate: &'a str,
    pub score: f64,
}

/// Up to `n` candidates whose similarity to `word` is at least `cutoff`,
/// best first. Equal scores keep candidate order.
pub fn close_matches<'a, S: AsRef<str>>(
    word: &str,
    candidates: &'a [S],
    n: usize,
    cutoff: f64,
) -> Vec<CloseMatch<'a>> {
    if n == 0 {
        return Vec::new();
    }

    // Index `word` once; the cheap bounds prune before the full ratio.
    let mut matcher = SequenceMatcher::new("", word);
    let mut hits = Vec::new();
    for candidate in candidates {
        let candidate = candidate.as_ref();
        matcher.set_seq1(candidate);
        if matcher.real_quick_ratio() < cutoff || matcher.quick_ratio() < cutoff {
            continue;
        }
        let score = matcher.ratio();
        if score >= cutoff {
            hits.push(CloseMatch { candidate, score });
        }
    }

    // Stable: ties stay in candidate order.
    hits.sort_by(|x, y| y.score.total_cmp(&x.score));
    hits.truncate(n);
    hits
}
