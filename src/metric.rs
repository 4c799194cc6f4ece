// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzzy match weights.
//!
//! All four fuzzy modes reduce to one shape: decode a candidate, score it
//! against the fixed reference query, and keep it if the weight is not the
//! rejection sentinel. Lower weights are better. Levenshtein and the LCS
//! lengths run on rolling DP rows reused across candidates; the Damerau
//! variant comes from `strsim`.

use crate::fsa::MAX_WORD_LEN;

/// Weight of a rejected candidate.
pub(crate) const WEIGHT_REJECTED: i32 = i32::MAX;

/// The metric behind a fuzzy match mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Edit distance: insertions, deletions, substitutions.
    Levenshtein,
    /// Edit distance with transpositions.
    Damerau,
    /// Longest common substring; weight is its negated length.
    CommonSubstring,
    /// Longest common subsequence, length-normalized.
    CommonSubsequence,
}

/// Scores candidates against one reference sequence.
pub(crate) struct Scorer<'a> {
    metric: Metric,
    query: &'a [char],
    max_dist: i32,
    rows: [Vec<u32>; 2],
}

impl<'a> Scorer<'a> {
    pub(crate) fn new(metric: Metric, query: &'a [char], max_dist: i32) -> Self {
        Scorer {
            metric,
            query,
            max_dist,
            rows: [
                Vec::with_capacity(MAX_WORD_LEN + 1),
                Vec::with_capacity(MAX_WORD_LEN + 1),
            ],
        }
    }

    /// Weight of `candidate`; [`WEIGHT_REJECTED`] when the candidate is
    /// out of reach of the metric's cap.
    pub(crate) fn weight(&mut self, candidate: &[char]) -> i32 {
        match self.metric {
            Metric::Levenshtein => {
                if self.beyond_length_bound(candidate) {
                    return WEIGHT_REJECTED;
                }
                self.levenshtein(candidate)
            }
            Metric::Damerau => {
                if self.beyond_length_bound(candidate) {
                    return WEIGHT_REJECTED;
                }
                let dist = strsim::generic_damerau_levenshtein(self.query, candidate) as i32;
                if dist > self.max_dist {
                    WEIGHT_REJECTED
                } else {
                    dist
                }
            }
            Metric::CommonSubstring => -(self.lc_substring(candidate) as i32),
            Metric::CommonSubsequence => {
                let lcs = self.lc_subsequence(candidate);
                let total = (self.query.len() + candidate.len()) as f64;
                (-2.0 * f64::from(lcs) / total * 1000.0) as i32
            }
        }
    }

    /// `|len(a) - len(b)|` is a lower bound on both edit distances, so a
    /// length gap beyond the cap rejects without running the DP.
    fn beyond_length_bound(&self, candidate: &[char]) -> bool {
        let gap = self.query.len().abs_diff(candidate.len());
        gap as i64 > i64::from(self.max_dist)
    }

    /// Bounded Levenshtein distance. A second early exit abandons the DP
    /// once a whole row exceeds the cap, since rows are non-decreasing in
    /// the minimum.
    fn levenshtein(&mut self, candidate: &[char]) -> i32 {
        let cap = i64::from(self.max_dist);
        let [prev, curr] = &mut self.rows;
        prev.clear();
        prev.extend(0..=candidate.len() as u32);
        curr.clear();
        curr.resize(candidate.len() + 1, 0);

        for (i, &qc) in self.query.iter().enumerate() {
            curr[0] = i as u32 + 1;
            let mut row_min = curr[0];
            for (j, &cc) in candidate.iter().enumerate() {
                let cost = u32::from(qc != cc);
                curr[j + 1] = (curr[j] + 1).min(prev[j + 1] + 1).min(prev[j] + cost);
                row_min = row_min.min(curr[j + 1]);
            }
            if i64::from(row_min) > cap {
                return WEIGHT_REJECTED;
            }
            std::mem::swap(prev, curr);
        }

        let dist = prev[candidate.len()];
        if i64::from(dist) > cap {
            WEIGHT_REJECTED
        } else {
            dist as i32
        }
    }

    /// Length of the longest common substring.
    fn lc_substring(&mut self, candidate: &[char]) -> u32 {
        let [prev, curr] = &mut self.rows;
        prev.clear();
        prev.resize(candidate.len() + 1, 0);
        curr.clear();
        curr.resize(candidate.len() + 1, 0);

        let mut best = 0;
        for &qc in self.query {
            for (j, &cc) in candidate.iter().enumerate() {
                curr[j + 1] = if qc == cc { prev[j] + 1 } else { 0 };
                best = best.max(curr[j + 1]);
            }
            std::mem::swap(prev, curr);
        }
        best
    }

    /// Length of the longest common subsequence.
    fn lc_subsequence(&mut self, candidate: &[char]) -> u32 {
        let [prev, curr] = &mut self.rows;
        prev.clear();
        prev.resize(candidate.len() + 1, 0);
        curr.clear();
        curr.resize(candidate.len() + 1, 0);

        for &qc in self.query {
            for (j, &cc) in candidate.iter().enumerate() {
                curr[j + 1] = if qc == cc {
                    prev[j] + 1
                } else {
                    prev[j + 1].max(curr[j])
                };
            }
            std::mem::swap(prev, curr);
        }
        prev[candidate.len()]
    }
}
