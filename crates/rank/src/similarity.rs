//! Longest-matching-blocks similarity (Ratcliff/Obershelp).
//!
//! `ratio = 2 * M / T` where `T` is the combined length of both sequences and
//! `M` the number of elements in matching blocks, found by recursively taking
//! the longest common contiguous block and repeating on both sides of it.
//! Sequences are compared as Unicode scalar values. No junk heuristic; when
//! `b` has 200 or more elements, elements occurring in more than 1% of it
//! are excluded as block seeds ("popular" pruning).

use std::collections::{HashMap, HashSet};

const AUTOJUNK_MIN_LEN: usize = 200;

/// Block of `size` equal elements at `a[a_start..]` and `b[b_start..]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Block {
    pub a_start: usize,
    pub b_start: usize,
    pub size: usize,
}

/// Compares one fixed sequence `b` against any number of `a` sequences.
/// The index over `b` is built once in [`SequenceMatcher::new`].
#[derive(Debug, Clone)]
pub struct SequenceMatcher {
    a: Vec<char>,
    b: Vec<char>,
    b2j: HashMap<char, Vec<usize>>,
}

impl SequenceMatcher {
    pub fn new(a: &str, b: &str) -> Self {
        let mut matcher = Self {
            a: Vec::new(),
            b: Vec::new(),
            b2j: HashMap::new(),
        };
        matcher.set_seq2(b);
        matcher.set_seq1(a);
        matcher
    }

    /// Replace `a`, keeping the index over `b`.
    pub fn set_seq1(&mut self, a: &str) {
        self.a = a.chars().collect();
    }

    /// Replace `b` and rebuild its index.
    pub fn set_seq2(&mut self, b: &str) {
        self.b = b.chars().collect();
        self.b2j.clear();
        for (j, &c) in self.b.iter().enumerate() {
            self.b2j.entry(c).or_default().push(j);
        }

        let n = self.b.len();
        if n >= AUTOJUNK_MIN_LEN {
            let ntest = n / 100 + 1;
            let popular: HashSet<char> = self
                .b2j
                .iter()
                .filter(|(_, idxs)| idxs.len() > ntest)
                .map(|(&c, _)| c)
                .collect();
            for c in popular {
                self.b2j.remove(&c);
            }
        }
    }

    /// Longest matching block in `a[alo..ahi]` and `b[blo..bhi]`. Among
    /// equally long blocks, the one starting earliest in `a` wins, then
    /// earliest in `b`.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
        let (a, b) = (&self.a, &self.b);
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0usize);

        // j2len[j] = length of the longest block ending at a[i-1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(idxs) = self.b2j.get(c) {
                for &j in idxs {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let prev = if j == 0 { 0 } else { j2len.get(&(j - 1)).copied().unwrap_or(0) };
                    let k = prev + 1;
                    next.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = next;
        }

        // Popular elements were never seeds; extend across them.
        while besti > alo && bestj > blo && a[besti - 1] == b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi && bestj + bestsize < bhi && a[besti + bestsize] == b[bestj + bestsize] {
            bestsize += 1;
        }

        Block {
            a_start: besti,
            b_start: bestj,
            size: bestsize,
        }
    }

    /// Non-overlapping matching blocks in ascending order, adjacent blocks merged.
    pub fn matching_blocks(&self) -> Vec<Block> {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size == 0 {
                continue;
            }
            blocks.push(m);
            if alo < m.a_start && blo < m.b_start {
                queue.push((alo, m.a_start, blo, m.b_start));
            }
            if m.a_start + m.size < ahi && m.b_start + m.size < bhi {
                queue.push((m.a_start + m.size, ahi, m.b_start + m.size, bhi));
            }
        }
        blocks.sort();

        let mut merged: Vec<Block> = Vec::with_capacity(blocks.len());
        for block in blocks {
            match merged.last_mut() {
                Some(last)
                    if last.a_start + last.size == block.a_start
                        && last.b_start + last.size == block.b_start =>
                {
                    last.size += block.size;
                }
                _ => merged.push(block),
            }
        }
        merged
    }

    pub fn ratio(&self) -> f64 {
        let matches: usize = self.matching_blocks().iter().map(|b| b.size).sum();
        calculate_ratio(matches, self.a.len() + self.b.len())
    }

    /// Upper bound on [`ratio`](Self::ratio) from shared character counts.
    pub fn quick_ratio(&self) -> f64 {
        let mut avail: HashMap<char, usize> = HashMap::new();
        for &c in &self.b {
            *avail.entry(c).or_insert(0) += 1;
        }
        let mut matches = 0;
        for c in &self.a {
            if let Some(n) = avail.get_mut(c) {
                if *n > 0 {
                    *n -= 1;
                    matches += 1;
                }
            }
        }
        calculate_ratio(matches, self.a.len() + self.b.len())
    }

    /// Upper bound on [`quick_ratio`](Self::quick_ratio) from lengths alone.
    pub fn real_quick_ratio(&self) -> f64 {
        let (la, lb) = (self.a.len(), self.b.len());
        calculate_ratio(la.min(lb), la + lb)
    }
}

fn calculate_ratio(matches: usize, length: usize) -> f64 {
    if length == 0 {
        return 1.0;
    }
    2.0 * matches as f64 / length as f64
}

/// Similarity of `a` to `b` in `[0, 1]`.
pub fn ratio(a: &str, b: &str) -> f64 {
    SequenceMatcher::new(a, b).ratio()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(x: f64, y: f64) -> bool {
        (x - y).abs() < 1e-12
    }

    #[test]
    fn identical_and_disjoint() {
        assert_eq!(ratio("engineering", "engineering"), 1.0);
        assert_eq!(ratio("", ""), 1.0);
        assert_eq!(ratio("engineering", "xyzzyzzy"), 0.0);
        assert_eq!(ratio("abc", ""), 0.0);
    }

    #[test]
    fn classic_abcd_bcde() {
        // Longest block "bcd" → 2*3/8.
        assert!(approx(ratio("abcd", "bcde"), 0.75));
    }

    #[test]
    fn typo_scores_high() {
        // "engine" + "ring" = 10 matched of 21 total.
        assert!(approx(ratio("engineering", "enginering"), 20.0 / 21.0));
    }

    #[test]
    fn single_char_blocks() {
        // s|a matched, then nothing to the right of "a" → 4/10.
        assert!(approx(ratio("sales", "slack"), 0.4));
        assert!(approx(ratio("marketing", "slack"), 4.0 / 14.0));
    }

    #[test]
    fn blocks_for_known_pair() {
        let m = SequenceMatcher::new("abxcd", "abcd");
        let blocks = m.matching_blocks();
        assert_eq!(
            blocks,
            vec![
                Block { a_start: 0, b_start: 0, size: 2 },
                Block { a_start: 3, b_start: 2, size: 2 },
            ]
        );
    }

    #[test]
    fn earliest_block_in_a_wins_ties() {
        let m = SequenceMatcher::new("xab_ab", "ab");
        let best = m.find_longest_match(0, 6, 0, 2);
        assert_eq!(best, Block { a_start: 1, b_start: 0, size: 2 });
    }

    #[test]
    fn bounds_hold() {
        let m = SequenceMatcher::new("private", "primate");
        assert!(m.real_quick_ratio() >= m.quick_ratio());
        assert!(m.quick_ratio() >= m.ratio());
    }

    #[test]
    fn popular_pruning_on_long_b() {
        let b = format!("x{}", "a".repeat(249));
        let m = SequenceMatcher::new("aaaa", &b);
        // "a" is popular and never seeds a block. Extension from the range
        // start still grows over it when the first elements line up.
        let best = m.find_longest_match(0, 4, 1, 250);
        assert_eq!(best.size, 4);
        assert_eq!(m.find_longest_match(0, 4, 0, 250).size, 0);
    }

    #[test]
    fn non_ascii_is_per_char() {
        assert!(approx(ratio("équipe", "equipe"), 10.0 / 12.0));
    }
}
