//! Word-level alignment of an original text against its corrected version
//!
//! Alignment runs in two phases. First, tokens common to both sequences are
//! matched: shared prefix and suffix, then tokens unique to both sides used as
//! anchors (longest increasing subsequence over their positions), then either
//! an exact LCS table for small regions or a bounded lookahead scan for large
//! ones. Second, each unmatched region ("hunk") between matches is resolved
//! into substitutions, splits and merges. Pure insertions and deletions
//! resolve to nothing.

use std::collections::HashMap;

use crate::model::WordChange;
use crate::text::tokenizer::{self, Token};

/// Largest region (cells) solved with an exact LCS table
pub const DEFAULT_LCS_CELL_LIMIT: usize = 1_000_000;

/// Largest hunk (cells) paired by similarity; bigger hunks pair positionally
pub const DEFAULT_PAIR_CELL_LIMIT: usize = 40_000;

/// Tokens searched ahead by the lookahead scan
pub const DEFAULT_LOOKAHEAD: usize = 32;

/// Most fragments considered for one split or merge
const MAX_GROUP: usize = 4;

/// Anchor recursion stops here and falls back to table or scan
const MAX_ANCHOR_DEPTH: usize = 64;

const UNIT_COST: u32 = 1000;

/// Aligns token sequences and reports word changes
#[derive(Debug, Clone)]
pub struct WordAligner {
    lcs_cell_limit: usize,
    pair_cell_limit: usize,
    lookahead: usize,
}

impl Default for WordAligner {
    fn default() -> Self {
        Self {
            lcs_cell_limit: DEFAULT_LCS_CELL_LIMIT,
            pair_cell_limit: DEFAULT_PAIR_CELL_LIMIT,
            lookahead: DEFAULT_LOOKAHEAD,
        }
    }
}

impl WordAligner {
    /// Aligner with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the exact-LCS region size limit
    pub fn with_lcs_cell_limit(mut self, cells: usize) -> Self {
        self.lcs_cell_limit = cells;
        self
    }

    /// Override the lookahead distance of the scan fallback
    pub fn with_lookahead(mut self, tokens: usize) -> Self {
        self.lookahead = tokens.max(1);
        self
    }

    /// Compare two texts and return their word changes, unclassified
    pub fn align(&self, original: &str, corrected: &str) -> Vec<WordChange> {
        let before = tokenizer::tokenize(original);
        let after = tokenizer::tokenize(corrected);
        self.align_tokens(&before, &after)
    }

    /// Align pre-tokenized sequences
    pub fn align_tokens(&self, before: &[Token<'_>], after: &[Token<'_>]) -> Vec<WordChange> {
        let a: Vec<&str> = before.iter().map(|t| t.text).collect();
        let b: Vec<&str> = after.iter().map(|t| t.text).collect();

        let mut matches = Vec::new();
        self.match_range(&a, 0, a.len(), &b, 0, b.len(), 0, &mut matches);

        let mut changes = Vec::new();
        let (mut i, mut j) = (0, 0);
        for &(mi, mj) in matches.iter().chain(std::iter::once(&(a.len(), b.len()))) {
            if mi > i || mj > j {
                changes.extend(self.resolve_hunk(&before[i..mi], &after[j..mj]));
            }
            i = mi + 1;
            j = mj + 1;
        }

        changes.retain(WordChange::is_effective);
        changes
    }

    /// Collect matched index pairs for `a[a_lo..a_hi]` against `b[b_lo..b_hi]`
    #[allow(clippy::too_many_arguments)]
    fn match_range(
        &self,
        a: &[&str],
        mut a_lo: usize,
        mut a_hi: usize,
        b: &[&str],
        mut b_lo: usize,
        mut b_hi: usize,
        depth: usize,
        out: &mut Vec<(usize, usize)>,
    ) {
        while a_lo < a_hi && b_lo < b_hi && a[a_lo] == b[b_lo] {
            out.push((a_lo, b_lo));
            a_lo += 1;
            b_lo += 1;
        }

        let mut suffix = Vec::new();
        while a_lo < a_hi && b_lo < b_hi && a[a_hi - 1] == b[b_hi - 1] {
            a_hi -= 1;
            b_hi -= 1;
            suffix.push((a_hi, b_hi));
        }

        if a_lo < a_hi && b_lo < b_hi {
            let anchors = if depth < MAX_ANCHOR_DEPTH {
                unique_anchors(a, a_lo, a_hi, b, b_lo, b_hi)
            } else {
                Vec::new()
            };

            if !anchors.is_empty() {
                let (mut pa, mut pb) = (a_lo, b_lo);
                for (ai, bi) in anchors {
                    self.match_range(a, pa, ai, b, pb, bi, depth + 1, out);
                    out.push((ai, bi));
                    pa = ai + 1;
                    pb = bi + 1;
                }
                self.match_range(a, pa, a_hi, b, pb, b_hi, depth + 1, out);
            } else if (a_hi - a_lo).saturating_mul(b_hi - b_lo) <= self.lcs_cell_limit {
                lcs_matches(a, a_lo, a_hi, b, b_lo, b_hi, out);
            } else {
                self.scan_matches(a, a_lo, a_hi, b, b_lo, b_hi, out);
            }
        }

        out.extend(suffix.into_iter().rev());
    }

    /// Greedy scan: on mismatch, skip to the nearest point within the
    /// lookahead where both sides agree again.
    #[allow(clippy::too_many_arguments)]
    fn scan_matches(
        &self,
        a: &[&str],
        a_lo: usize,
        a_hi: usize,
        b: &[&str],
        b_lo: usize,
        b_hi: usize,
        out: &mut Vec<(usize, usize)>,
    ) {
        let (mut i, mut j) = (a_lo, b_lo);
        while i < a_hi && j < b_hi {
            if a[i] == b[j] {
                out.push((i, j));
                i += 1;
                j += 1;
                continue;
            }
            match self.resync(a, i, a_hi, b, j, b_hi) {
                Some((da, db)) => {
                    i += da;
                    j += db;
                }
                None => {
                    i += 1;
                    j += 1;
                }
            }
        }
    }

    /// Offsets skipping the fewest tokens in total after which `a` and `b`
    /// agree, confirmed by the next pair when both sides have one. Among equal
    /// totals, balanced skips (substitutions) come first.
    fn resync(
        &self,
        a: &[&str],
        i: usize,
        a_hi: usize,
        b: &[&str],
        j: usize,
        b_hi: usize,
    ) -> Option<(usize, usize)> {
        for distance in 1..=2 * self.lookahead {
            let lo = distance.saturating_sub(self.lookahead);
            let hi = distance.min(self.lookahead);
            let mut offsets: Vec<usize> = (lo..=hi).collect();
            offsets.sort_by_key(|&da| (2 * da).abs_diff(distance));

            for da in offsets {
                let db = distance - da;
                let (x, y) = (i + da, j + db);
                if x >= a_hi || y >= b_hi || a[x] != b[y] {
                    continue;
                }
                if x + 1 >= a_hi || y + 1 >= b_hi || a[x + 1] == b[y + 1] {
                    return Some((da, db));
                }
            }
        }
        None
    }

    /// Turn one unmatched region into word changes
    fn resolve_hunk(&self, orig: &[Token<'_>], corr: &[Token<'_>]) -> Vec<WordChange> {
        match (orig.len(), corr.len()) {
            (0, _) | (_, 0) => Vec::new(),
            (1, 1) => vec![WordChange::new(orig[0].text, corr[0].text, orig[0].ordinal)],
            (k, l) if k.saturating_mul(l) > self.pair_cell_limit => orig
                .iter()
                .zip(corr)
                .map(|(o, c)| WordChange::new(o.text, c.text, o.ordinal))
                .collect(),
            _ => pair_block(orig, corr),
        }
    }
}

/// Align with default limits
pub fn align(original: &str, corrected: &str) -> Vec<WordChange> {
    WordAligner::default().align(original, corrected)
}

/// Tokens occurring exactly once on each side, kept in an order increasing on
/// both sides (patience anchors).
fn unique_anchors(
    a: &[&str],
    a_lo: usize,
    a_hi: usize,
    b: &[&str],
    b_lo: usize,
    b_hi: usize,
) -> Vec<(usize, usize)> {
    #[derive(Default)]
    struct Seen {
        count_a: u32,
        count_b: u32,
        pos_a: usize,
        pos_b: usize,
    }

    let mut seen: HashMap<&str, Seen> = HashMap::new();
    for (i, tok) in a.iter().enumerate().take(a_hi).skip(a_lo) {
        let entry = seen.entry(tok).or_default();
        entry.count_a += 1;
        entry.pos_a = i;
    }
    for (j, tok) in b.iter().enumerate().take(b_hi).skip(b_lo) {
        if let Some(entry) = seen.get_mut(tok) {
            entry.count_b += 1;
            entry.pos_b = j;
        }
    }

    let mut candidates: Vec<(usize, usize)> = seen
        .values()
        .filter(|s| s.count_a == 1 && s.count_b == 1)
        .map(|s| (s.pos_a, s.pos_b))
        .collect();
    candidates.sort_unstable();

    longest_increasing(&candidates)
}

/// Longest subsequence of `pairs` (sorted by first element) increasing in the
/// second element.
fn longest_increasing(pairs: &[(usize, usize)]) -> Vec<(usize, usize)> {
    if pairs.is_empty() {
        return Vec::new();
    }

    // tails[k]: index into pairs of the smallest tail of an increasing run of length k + 1
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; pairs.len()];

    for (idx, &(_, pb)) in pairs.iter().enumerate() {
        let slot = tails.partition_point(|&t| pairs[t].1 < pb);
        if slot > 0 {
            prev[idx] = Some(tails[slot - 1]);
        }
        if slot == tails.len() {
            tails.push(idx);
        } else {
            tails[slot] = idx;
        }
    }

    let mut result = Vec::with_capacity(tails.len());
    let mut cursor = tails.last().copied();
    while let Some(idx) = cursor {
        result.push(pairs[idx]);
        cursor = prev[idx];
    }
    result.reverse();
    result
}

/// Exact LCS over a small region
fn lcs_matches(
    a: &[&str],
    a_lo: usize,
    a_hi: usize,
    b: &[&str],
    b_lo: usize,
    b_hi: usize,
    out: &mut Vec<(usize, usize)>,
) {
    let n = a_hi - a_lo;
    let m = b_hi - b_lo;
    let width = m + 1;
    // lengths[i * width + j]: LCS length of a[a_lo + i..a_hi] and b[b_lo + j..b_hi]
    let mut lengths = vec![0u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lengths[i * width + j] = if a[a_lo + i] == b[b_lo + j] {
                lengths[(i + 1) * width + j + 1] + 1
            } else {
                lengths[(i + 1) * width + j].max(lengths[i * width + j + 1])
            };
        }
    }

    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if a[a_lo + i] == b[b_lo + j] {
            out.push((a_lo + i, b_lo + j));
            i += 1;
            j += 1;
        } else if lengths[(i + 1) * width + j] >= lengths[i * width + j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Substitute,
    Split(usize),
    Merge(usize),
    Delete,
    Insert,
}

/// Pair a K:L hunk by word similarity.
///
/// Substitutions cost the normalized edit distance, splits and merges whose
/// fragments concatenate to the other side are free, and leftover tokens are
/// treated as insertions or deletions.
fn pair_block(orig: &[Token<'_>], corr: &[Token<'_>]) -> Vec<WordChange> {
    let n = orig.len();
    let m = corr.len();
    let width = m + 1;
    let mut cost = vec![u32::MAX; (n + 1) * width];
    cost[n * width + m] = 0;

    let step_target = |i: usize, j: usize, step: Step| -> Option<(usize, usize, u32)> {
        match step {
            Step::Substitute if i < n && j < m => Some((
                i + 1,
                j + 1,
                dissimilarity(orig[i].text, corr[j].text),
            )),
            Step::Split(k) if i < n && j + k <= m => {
                (tokenizer::concat(&corr[j..j + k]) == orig[i].text).then_some((i + 1, j + k, 0))
            }
            Step::Merge(k) if i + k <= n && j < m => {
                (tokenizer::concat(&orig[i..i + k]) == corr[j].text).then_some((i + k, j + 1, 0))
            }
            Step::Delete if i < n => Some((i + 1, j, UNIT_COST)),
            Step::Insert if j < m => Some((i, j + 1, UNIT_COST)),
            _ => None,
        }
    };

    let steps: Vec<Step> = std::iter::once(Step::Substitute)
        .chain((2..=MAX_GROUP).map(Step::Split))
        .chain((2..=MAX_GROUP).map(Step::Merge))
        .chain([Step::Delete, Step::Insert])
        .collect();

    for i in (0..=n).rev() {
        for j in (0..=m).rev() {
            if i == n && j == m {
                continue;
            }
            let best = steps
                .iter()
                .filter_map(|&s| step_target(i, j, s))
                .map(|(ni, nj, c)| cost[ni * width + nj].saturating_add(c))
                .min()
                .unwrap_or(u32::MAX);
            cost[i * width + j] = best;
        }
    }

    let mut changes = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < n || j < m {
        let here = cost[i * width + j];
        let Some((step, ni, nj)) = steps.iter().find_map(|&s| {
            step_target(i, j, s).and_then(|(ni, nj, c)| {
                (cost[ni * width + nj].saturating_add(c) == here).then_some((s, ni, nj))
            })
        }) else {
            break;
        };

        match step {
            Step::Substitute => {
                changes.push(WordChange::new(orig[i].text, corr[j].text, orig[i].ordinal))
            }
            Step::Split(_) => changes.push(WordChange::new(
                orig[i].text,
                tokenizer::join(&corr[j..nj]),
                orig[i].ordinal,
            )),
            Step::Merge(_) => changes.push(WordChange::new(
                tokenizer::join(&orig[i..ni]),
                corr[j].text,
                orig[i].ordinal,
            )),
            Step::Delete | Step::Insert => {}
        }
        i = ni;
        j = nj;
    }
    changes
}

/// Normalized character edit distance scaled to `0..=UNIT_COST`
fn dissimilarity(a: &str, b: &str) -> u32 {
    if a == b {
        return 0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let longest = a.len().max(b.len()).max(1);
    let distance = levenshtein(&a, &b);
    (distance * UNIT_COST as usize / longest) as u32
}

fn levenshtein(a: &[char], b: &[char]) -> usize {
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
