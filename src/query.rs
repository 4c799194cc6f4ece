// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Queries, cursors and match-mode resolution.
//!
//! A query travels with its own pagination cursor: zeroed on the first
//! call, rewritten by every search, and handed back verbatim to fetch the
//! next page. Callers should treat the cursor as opaque.

use serde::{Deserialize, Serialize};

use crate::fsa::MAX_WORD_LEN;
use crate::metric::Metric;

/// Maximum allowed number of words per page.
pub const MAX_PAGE_SIZE: usize = 30;

/// Matching modes.
///
/// Under [`MatchMode::Auto`], the mode is inferred from the query itself:
/// a leading `+` selects [`CommonSubstring`](MatchMode::CommonSubstring),
/// `@` selects [`Damerau`](MatchMode::Damerau), `#` selects
/// [`Substring`](MatchMode::Substring) (the magic byte is consumed), and
/// anything else is treated as a glob pattern, which the simplifier may
/// in turn reduce to exact, prefix, substring or suffix matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchMode {
    /// Select the matching mode automatically.
    #[default]
    Auto,
    /// Match a literal string, no magic character.
    Exact,
    /// Prefix matching.
    Prefix,
    /// Substring matching.
    Substring,
    /// Suffix matching.
    Suffix,
    /// Glob matching (`*`, `?`, `[...]`).
    Glob,
    /// Levenshtein distance.
    Levenshtein,
    /// Damerau-Levenshtein distance.
    Damerau,
    /// Longest common substring.
    CommonSubstring,
    /// Longest common subsequence.
    CommonSubsequence,
}

/// Pagination state, round-tripped through [`Query`].
///
/// Fill with `Cursor::default()` on the first call; a later call with the
/// updated value fetches the next page. `last_page` set means everything
/// has been returned and further calls are no-op successes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Whether the last returned page was the final one.
    pub last_page: bool,
    /// Position of the last seen word.
    pub last_pos: u32,
    /// Weight of the last returned word (fuzzy modes).
    pub last_weight: i32,
}

/// A search request.
#[derive(Debug, Clone)]
pub struct Query<'a> {
    /// The query string.
    pub query: &'a [u8],
    /// Matching mode to use.
    pub mode: MatchMode,
    /// Maximum number of words returned per page.
    pub page_size: usize,
    /// Maximum allowed edit distance, for [`MatchMode::Levenshtein`] and
    /// [`MatchMode::Damerau`].
    pub max_dist: i32,
    /// Length, in code points, of the prefix a lexicon word must share
    /// with the query to be considered by the fuzzy modes (except
    /// [`MatchMode::CommonSubstring`]). Raising it speeds fuzzy search up
    /// and costs recall; 1 or 2 is fine. When it exceeds the query length
    /// the search degrades to exact matching.
    pub prefix_len: usize,
    /// Pagination state; see [`Cursor`].
    pub cursor: Cursor,
}

impl<'a> Query<'a> {
    /// A query with the stock parameters: automatic mode, 10 words per
    /// page, edit distance up to 3, shared prefix of 1.
    pub fn new(query: &'a [u8]) -> Self {
        Query {
            query,
            mode: MatchMode::Auto,
            page_size: 10,
            max_dist: 3,
            prefix_len: 1,
            cursor: Cursor::default(),
        }
    }
}

/// A mode the drivers can act on: [`MatchMode`] with `Auto` resolved away
/// and the fuzzy modes folded into their metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResolvedMode {
    Exact,
    Prefix,
    Substring,
    Suffix,
    Glob,
    Fuzzy(Metric),
}

/// The query after mode resolution: a concrete mode plus the needle with
/// magic characters and redundant wildcards stripped.
pub(crate) struct Resolved<'b> {
    pub mode: ResolvedMode,
    pub needle: &'b [u8],
}

/// Resolves `mode` and `raw` to a concrete mode and needle. Glob
/// simplification writes into `buf`; the returned needle borrows either
/// from `raw` or from there.
pub(crate) fn resolve<'b>(
    mode: MatchMode,
    raw: &'b [u8],
    buf: &'b mut [u8; MAX_WORD_LEN + 1],
) -> Resolved<'b> {
    match mode {
        MatchMode::Auto => match raw.first() {
            Some(b'+') => fuzzy(Metric::CommonSubstring, &raw[1..]),
            Some(b'@') => fuzzy(Metric::Damerau, &raw[1..]),
            Some(b'#') => Resolved {
                mode: ResolvedMode::Substring,
                needle: &raw[1..],
            },
            _ => simplify_glob(raw, buf),
        },
        MatchMode::Exact => literal(ResolvedMode::Exact, raw),
        MatchMode::Prefix => literal(ResolvedMode::Prefix, raw),
        MatchMode::Substring => literal(ResolvedMode::Substring, raw),
        MatchMode::Suffix => literal(ResolvedMode::Suffix, raw),
        MatchMode::Glob => simplify_glob(raw, buf),
        MatchMode::Levenshtein => fuzzy(Metric::Levenshtein, raw),
        MatchMode::Damerau => fuzzy(Metric::Damerau, raw),
        MatchMode::CommonSubstring => fuzzy(Metric::CommonSubstring, raw),
        MatchMode::CommonSubsequence => fuzzy(Metric::CommonSubsequence, raw),
    }
}

fn literal(mode: ResolvedMode, needle: &[u8]) -> Resolved<'_> {
    Resolved { mode, needle }
}

fn fuzzy(metric: Metric, needle: &[u8]) -> Resolved<'_> {
    Resolved {
        mode: ResolvedMode::Fuzzy(metric),
        needle,
    }
}

/// Rewrites glob patterns that are simpler than they look:
///
/// - `X` with no wildcard at all is an exact match;
/// - `X*` is a prefix match on `X`;
/// - `*X` is a suffix match on `X`;
/// - `*X*` is a substring match on `X`;
/// - anything else stays a glob, with runs of `*` collapsed to one.
///
/// `?`, `[` or `]` anywhere keeps the pattern a glob, and a lone `*` is a
/// glob too (it has no literal to match on).
fn simplify_glob<'b>(pat: &[u8], buf: &'b mut [u8; MAX_WORD_LEN + 1]) -> Resolved<'b> {
    // Copy, collapsing runs of `*`.
    let mut len = 0;
    let mut prev_star = false;
    for &byte in pat {
        if byte == b'*' && prev_star {
            continue;
        }
        prev_star = byte == b'*';
        buf[len] = byte;
        len += 1;
    }

    let has_meta = buf[..len]
        .iter()
        .any(|&b| matches!(b, b'?' | b'[' | b']'));
    let stars = buf[..len].iter().filter(|&&b| b == b'*').count();
    let leading = len > 0 && buf[0] == b'*';
    let trailing = len > 1 && buf[len - 1] == b'*';

    let (mode, range) = if has_meta {
        (ResolvedMode::Glob, 0..len)
    } else {
        match stars {
            0 => (ResolvedMode::Exact, 0..len),
            1 if trailing => (ResolvedMode::Prefix, 0..len - 1),
            1 if leading && len > 1 => (ResolvedMode::Suffix, 1..len),
            2 if leading && trailing => (ResolvedMode::Substring, 1..len - 1),
            _ => (ResolvedMode::Glob, 0..len),
        }
    };
    Resolved {
        mode,
        needle: &buf[range],
    }
}
