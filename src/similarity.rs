//! String similarity used for fuzzy folder-name lookup.
//!
//! The default metric is the Ratcliff/Obershelp "gestalt" ratio: twice the
//! number of characters in matching blocks divided by the combined length.
//! Matching blocks are found by taking the longest common substring and
//! recursing on the pieces to its left and right. Jaro-Winkler and
//! normalized Levenshtein are available through `strsim`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Similarity {
    #[default]
    Ratio,
    JaroWinkler,
    Levenshtein,
}

impl Similarity {
    /// Similarity of `candidate` to `query` in 0.0..=1.0.
    pub fn score(self, candidate: &str, query: &str) -> f64 {
        match self {
            Similarity::Ratio => ratio(candidate, query),
            Similarity::JaroWinkler => strsim::jaro_winkler(candidate, query),
            Similarity::Levenshtein => strsim::normalized_levenshtein(candidate, query),
        }
    }
}

/// Pick the single key most similar to `query`, if any reaches `cutoff`.
///
/// Keys with equal similarity resolve to the lexicographically greatest
/// one, so the result does not depend on iteration order.
pub fn closest_match<'a, I>(query: &str, keys: I, cutoff: f64, similarity: Similarity) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(f64, &'a str)> = None;

    for key in keys {
        let score = similarity.score(key, query);
        if score < cutoff {
            continue;
        }
        let better = match best {
            None => true,
            Some((best_score, best_key)) => {
                score > best_score || (score == best_score && key > best_key)
            }
        };
        if better {
            best = Some((score, key));
        }
    }

    best.map(|(_, key)| key)
}

/// Ratcliff/Obershelp similarity ratio. Two empty strings are identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        b2j.entry(*c).or_default().push(j);
    }

    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, &b2j, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    matched
}

/// Longest block `a[i..i+size] == b[j..j+size]` inside the given window.
/// Among equally long blocks the one starting earliest in `a`, then in
/// `b`, wins.
fn longest_match(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // run length of the match ending at (i - 1, j)
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b2j.get(c) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let prev = j
                    .checked_sub(1)
                    .and_then(|p| j2len.get(&p))
                    .copied()
                    .unwrap_or(0);
                let run = prev + 1;
                next.insert(j, run);
                if run > best_size {
                    best_i = i + 1 - run;
                    best_j = j + 1 - run;
                    best_size = run;
                }
            }
        }
        j2len = next;
    }

    (best_i, best_j, best_size)
}
