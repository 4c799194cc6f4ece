// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The match engine: paginated search over a numbered automaton.
//!
//! Every driver shares one shape: open an iterator (fresh, or re-seeded
//! from the cursor), walk candidates, apply the mode's predicate, and
//! emit up to a page of results through the caller's sink. Lexicographic
//! modes paginate by storing the ordinal of the next candidate to
//! examine; fuzzy modes paginate by the `(weight, ordinal)` key of the
//! last emitted word.
//!
//! No heap allocation happens per candidate: words are decoded into
//! fixed stack buffers sized by the longest possible word.

use std::fmt;

use crate::fsa::{Automaton, WordIter, MAX_WORD_LEN};
use crate::glob::glob_match;
use crate::heap::BoundedHeap;
use crate::metric::{Metric, Scorer, WEIGHT_REJECTED};
use crate::query::{resolve, Cursor, Query, ResolvedMode, MAX_PAGE_SIZE};
use crate::utf8;

/// Errors reported by [`search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    /// Query string too long.
    QueryTooLong,
    /// Page size too large.
    PageTooLarge,
    /// Query string is not valid UTF-8.
    QueryNotUtf8,
    /// Lexicon contains an invalid UTF-8 string.
    LexiconNotUtf8,
    /// Lexicon is not a numbered automaton.
    NotNumbered,
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::QueryTooLong => write!(f, "query string too long"),
            SearchError::PageTooLarge => write!(f, "page size too large"),
            SearchError::QueryNotUtf8 => write!(f, "query string is not valid UTF-8"),
            SearchError::LexiconNotUtf8 => write!(f, "lexicon contains an invalid UTF-8 string"),
            SearchError::NotNumbered => write!(f, "lexicon is not a numbered automaton"),
        }
    }
}

impl std::error::Error for SearchError {}

/// One fuzzy candidate; the derived order is the pagination total order,
/// weight-major then ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Candidate {
    weight: i32,
    pos: u32,
}

/// Everything a driver needs: the resolved needle, the search parameters
/// and the cursor to rewrite.
struct MatchCtx<'c> {
    needle: &'c [u8],
    page_size: usize,
    max_dist: i32,
    prefix_len: usize,
    cursor: &'c mut Cursor,
    sink: &'c mut dyn FnMut(&[u8]),
}

/// Searches a lexicon.
///
/// The lexicon must be a numbered automaton. `sink` is invoked once per
/// matching word, in ascending match order: lexicographic for the literal
/// modes, `(weight, ordinal)` for the fuzzy ones. The query's cursor is
/// updated so that an identical call fetches the next page; once
/// `last_page` is set, further calls are no-op successes.
///
/// ```no_run
/// use minilex::{search, Automaton, Query};
///
/// let lexicon = Automaton::load_path("lexicon.mini")?;
/// let mut query = Query::new(b"ca*");
/// let mut page = Vec::new();
/// search(&lexicon, &mut query, |word| {
///     page.push(String::from_utf8_lossy(word).into_owned());
/// })?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn search(
    lexicon: &Automaton,
    query: &mut Query,
    mut sink: impl FnMut(&[u8]),
) -> Result<(), SearchError> {
    if !lexicon.is_numbered() {
        return Err(SearchError::NotNumbered);
    }
    if query.page_size > MAX_PAGE_SIZE {
        return Err(SearchError::PageTooLarge);
    }
    // There could be a match for a query longer than the longest storable
    // word, but the stack buffers below are sized by that limit.
    if query.query.len() > MAX_WORD_LEN {
        return Err(SearchError::QueryTooLong);
    }

    if query.page_size == 0 || query.cursor.last_pos == u32::MAX {
        query.cursor.last_page = true;
    }
    if query.cursor.last_page {
        return Ok(());
    }

    let mut buf = [0u8; MAX_WORD_LEN + 1];
    let resolved = resolve(query.mode, query.query, &mut buf);
    let mut ctx = MatchCtx {
        needle: resolved.needle,
        page_size: query.page_size,
        max_dist: query.max_dist,
        prefix_len: query.prefix_len,
        cursor: &mut query.cursor,
        sink: &mut sink,
    };

    let ret = match resolved.mode {
        ResolvedMode::Exact => match_exact(lexicon, &mut ctx),
        ResolvedMode::Prefix => match_prefix(lexicon, &mut ctx),
        ResolvedMode::Substring => match_substr(lexicon, &mut ctx),
        ResolvedMode::Suffix => match_suffix(lexicon, &mut ctx),
        ResolvedMode::Glob => match_glob(lexicon, &mut ctx),
        ResolvedMode::Fuzzy(metric) => match_fuzzy(lexicon, &mut ctx, metric),
    };

    if query.cursor.last_page {
        query.cursor.last_pos = u32::MAX;
    }
    ret
}

fn match_exact(lexicon: &Automaton, c: &mut MatchCtx) -> Result<(), SearchError> {
    if lexicon.contains(c.needle) {
        (c.sink)(c.needle);
    }
    c.cursor.last_page = true;
    Ok(())
}

fn match_prefix(lexicon: &Automaton, c: &mut MatchCtx) -> Result<(), SearchError> {
    let first_page = c.cursor.last_pos == 0;
    let mut it;
    let mut pos;
    if first_page {
        it = WordIter::prefixed(lexicon, c.needle);
        pos = it.first_pos();
    } else {
        pos = c.cursor.last_pos;
        it = WordIter::from_ordinal(lexicon, pos);
    }

    let mut page = c.page_size;
    while let Some(word) = it.next() {
        // A re-seeded iterator runs to the end of the lexicon; stop at
        // the first word that left the prefix.
        if !first_page && !word.starts_with(c.needle) {
            break;
        }
        if page == 0 {
            c.cursor.last_pos = pos;
            return Ok(());
        }
        page -= 1;
        (c.sink)(word);
        pos += 1;
    }
    c.cursor.last_page = true;
    Ok(())
}

fn match_substr(lexicon: &Automaton, c: &mut MatchCtx) -> Result<(), SearchError> {
    let mut it;
    let mut pos = c.cursor.last_pos;
    if pos != 0 {
        it = WordIter::from_ordinal(lexicon, pos);
    } else {
        it = WordIter::all(lexicon);
        pos = it.first_pos();
    }

    let mut page = c.page_size;
    while let Some(word) = it.next() {
        if contains_needle(word, c.needle) {
            if page == 0 {
                c.cursor.last_pos = pos;
                return Ok(());
            }
            page -= 1;
            (c.sink)(word);
        }
        pos += 1;
    }
    c.cursor.last_page = true;
    Ok(())
}

fn match_suffix(lexicon: &Automaton, c: &mut MatchCtx) -> Result<(), SearchError> {
    let mut it;
    let mut pos = c.cursor.last_pos;
    if pos != 0 {
        it = WordIter::from_ordinal(lexicon, pos);
    } else {
        it = WordIter::all(lexicon);
        pos = it.first_pos();
    }

    let mut page = c.page_size;
    while let Some(word) = it.next() {
        if word.len() >= c.needle.len() && word.ends_with(c.needle) {
            if page == 0 {
                c.cursor.last_pos = pos;
                return Ok(());
            }
            page -= 1;
            (c.sink)(word);
        }
        pos += 1;
    }
    c.cursor.last_page = true;
    Ok(())
}

fn match_glob(lexicon: &Automaton, c: &mut MatchCtx) -> Result<(), SearchError> {
    // The wildcard-free prefix of the pattern bounds the scan.
    let literal_len = c
        .needle
        .iter()
        .position(|&b| matches!(b, b'*' | b'?' | b'[' | b']'))
        .unwrap_or(c.needle.len());
    let literal = &c.needle[..literal_len];

    let mut it;
    let mut pos = c.cursor.last_pos;
    if pos != 0 {
        it = WordIter::from_ordinal(lexicon, pos);
    } else {
        it = WordIter::prefixed(lexicon, literal);
        pos = it.first_pos();
    }

    let mut pat = ['\0'; MAX_WORD_LEN + 1];
    let pat_len = match utf8::decode_into(&mut pat, &c.needle[literal_len..]) {
        Some(n) => n,
        None => {
            c.cursor.last_page = true;
            return Err(SearchError::QueryNotUtf8);
        }
    };

    let mut cand = ['\0'; MAX_WORD_LEN + 1];
    let mut page = c.page_size;
    while let Some(word) = it.next() {
        if literal_len > 0 && !word.starts_with(literal) {
            break;
        }
        let cand_len = match utf8::decode_into(&mut cand, &word[literal_len..]) {
            Some(n) => n,
            None => {
                c.cursor.last_page = true;
                return Err(SearchError::LexiconNotUtf8);
            }
        };
        if glob_match(&pat[..pat_len], &cand[..cand_len]) {
            if page == 0 {
                c.cursor.last_pos = pos;
                return Ok(());
            }
            page -= 1;
            (c.sink)(word);
        }
        pos += 1;
    }
    c.cursor.last_page = true;
    Ok(())
}

fn match_fuzzy(lexicon: &Automaton, c: &mut MatchCtx, metric: Metric) -> Result<(), SearchError> {
    let mut query_chars = ['\0'; MAX_WORD_LEN + 1];
    let query_len = match utf8::decode_into(&mut query_chars, c.needle) {
        Some(n) => n,
        None => {
            c.cursor.last_page = true;
            return Err(SearchError::QueryNotUtf8);
        }
    };

    let first_page = c.cursor.last_pos == 0;
    let mut it;
    let mut pos;
    if c.prefix_len > 0 && metric != Metric::CommonSubstring {
        // A candidate must share the query's first prefix_len code
        // points, which prunes the scan. Resumed pages re-seed with the
        // same prefix so the candidate set does not depend on the page
        // size; the cursor key then filters out everything at or before
        // the previous page. If the required prefix is longer than the
        // query itself, only an exact match could still qualify.
        if c.prefix_len > query_len {
            return match_exact(lexicon, c);
        }
        let nbytes = utf8::prefix_bytes(&query_chars[..query_len], c.prefix_len);
        it = WordIter::prefixed(lexicon, &c.needle[..nbytes]);
        pos = it.first_pos();
    } else {
        it = WordIter::all(lexicon);
        pos = it.first_pos();
    }

    let mut scorer = Scorer::new(metric, &query_chars[..query_len], c.max_dist);
    let mut heap: BoundedHeap<Candidate> = BoundedHeap::new(c.page_size);
    let last_min = Candidate {
        weight: c.cursor.last_weight,
        pos: c.cursor.last_pos,
    };

    let mut cand_chars = ['\0'; MAX_WORD_LEN + 1];
    let mut admissible: usize = 0;
    while let Some(word) = it.next() {
        let cand_len = match utf8::decode_into(&mut cand_chars, word) {
            Some(n) => n,
            None => {
                c.cursor.last_page = true;
                return Err(SearchError::LexiconNotUtf8);
            }
        };
        let candidate = Candidate {
            weight: scorer.weight(&cand_chars[..cand_len]),
            pos,
        };
        if candidate.weight != WEIGHT_REJECTED && (first_page || candidate > last_min) {
            admissible += 1;
            heap.push(candidate);
        }
        pos += 1;
    }

    let selected = heap.into_sorted_vec();
    let mut word_buf = [0u8; MAX_WORD_LEN + 1];
    for candidate in &selected {
        let len = lexicon.extract(candidate.pos, &mut word_buf);
        (c.sink)(&word_buf[..len]);
    }
    if let Some(last) = selected.last() {
        c.cursor.last_pos = last.pos;
        c.cursor.last_weight = last.weight;
    }
    if admissible <= selected.len() {
        c.cursor.last_page = true;
    }
    Ok(())
}

/// Naive substring scan; an empty needle matches everything.
fn contains_needle(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() {
        return true;
    }
    if haystack.len() < needle.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|w| w == needle)
}
