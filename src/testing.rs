// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Helpers the test suites and benches lean on: building a lexicon
//! straight from a word list without touching the filesystem, and
//! draining a paginated search one page at a time or to exhaustion.
//!
//! Compiled into the crate so integration tests can reach it, but kept
//! out of the rendered docs.

#![doc(hidden)]

use crate::{search, Automaton, Encoder, FsaType, Query, SearchError};

/// Builds a numbered automaton from words, in memory.
///
/// Words are sorted and deduplicated byte-wise first, so any order works.
pub fn lexicon_from_words(words: &[&str]) -> Automaton {
    lexicon_of_type(words, FsaType::Numbered)
}

/// Builds an automaton of either type from words, in memory.
pub fn lexicon_of_type(words: &[&str], fsa_type: FsaType) -> Automaton {
    let mut sorted: Vec<&[u8]> = words.iter().map(|w| w.as_bytes()).collect();
    sorted.sort();
    sorted.dedup();

    let mut enc = Encoder::new(fsa_type);
    for word in sorted {
        enc.add(word).expect("valid test word");
    }
    let mut bytes = Vec::new();
    enc.dump(&mut bytes).expect("dump to memory");
    Automaton::load(&mut bytes.as_slice()).expect("reload dumped automaton")
}

/// Runs one page of a search, collecting the emitted words.
pub fn collect_page(lexicon: &Automaton, query: &mut Query) -> Result<Vec<String>, SearchError> {
    let mut page = Vec::new();
    search(lexicon, query, |word| {
        page.push(String::from_utf8_lossy(word).into_owned());
    })?;
    Ok(page)
}

/// Runs a search to exhaustion, concatenating all pages.
///
/// Panics if the cursor fails to terminate within a generous bound; a
/// non-advancing cursor is exactly the kind of bug this helper exists to
/// expose.
pub fn collect_all_pages(
    lexicon: &Automaton,
    query: &mut Query,
) -> Result<Vec<String>, SearchError> {
    let mut all = Vec::new();
    let mut rounds = 0;
    while !query.cursor.last_page {
        all.extend(collect_page(lexicon, query)?);
        rounds += 1;
        assert!(rounds < 10_000, "pagination failed to terminate");
    }
    Ok(all)
}
