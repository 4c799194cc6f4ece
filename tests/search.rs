// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the match engine: the canonical scenarios, mode
//! inference, pagination behavior and the error taxonomy.

use minilex::testing::{collect_all_pages, collect_page, lexicon_from_words, lexicon_of_type};
use minilex::{search, Cursor, FsaType, MatchMode, Query, SearchError, MAX_WORD_LEN};

fn query(q: &str, mode: MatchMode, page_size: usize) -> Query<'_> {
    let mut query = Query::new(q.as_bytes());
    query.mode = mode;
    query.page_size = page_size;
    query
}

// =========================================================================
// CANONICAL SCENARIOS (lexicon = cat, cater, dog, door)
// =========================================================================

#[test]
fn prefix_scenario() {
    let lex = lexicon_from_words(&["cat", "cater", "dog", "door"]);
    let mut q = query("ca", MatchMode::Prefix, 10);
    assert_eq!(collect_page(&lex, &mut q).unwrap(), ["cat", "cater"]);
    assert!(q.cursor.last_page);
}

#[test]
fn suffix_scenario() {
    let lex = lexicon_from_words(&["cat", "cater", "dog", "door"]);
    let mut q = query("er", MatchMode::Suffix, 10);
    assert_eq!(collect_page(&lex, &mut q).unwrap(), ["cater"]);
    assert!(q.cursor.last_page);
}

#[test]
fn substring_scenario() {
    let lex = lexicon_from_words(&["cat", "cater", "dog", "door"]);
    let mut q = query("oo", MatchMode::Substring, 10);
    assert_eq!(collect_page(&lex, &mut q).unwrap(), ["door"]);
    assert!(q.cursor.last_page);
}

#[test]
fn glob_scenario() {
    let lex = lexicon_from_words(&["cat", "cater", "dog", "door"]);
    let mut q = query("c*r", MatchMode::Glob, 10);
    assert_eq!(collect_page(&lex, &mut q).unwrap(), ["cater"]);
    assert!(q.cursor.last_page);
}

#[test]
fn prefix_pagination_scenario() {
    let lex = lexicon_from_words(&["cat", "cater", "dog", "door"]);
    let mut q = query("d", MatchMode::Prefix, 1);

    assert_eq!(collect_page(&lex, &mut q).unwrap(), ["dog"]);
    assert!(!q.cursor.last_page);

    assert_eq!(collect_page(&lex, &mut q).unwrap(), ["door"]);
    assert!(q.cursor.last_page);
}

#[test]
fn levenshtein_scenario() {
    let lex = lexicon_from_words(&["cat", "cater", "dog", "door"]);
    let mut q = query("dor", MatchMode::Levenshtein, 10);
    q.max_dist = 1;
    q.prefix_len = 1;
    // Both at distance 1; tie broken by ordinal.
    assert_eq!(collect_page(&lex, &mut q).unwrap(), ["dog", "door"]);
    assert!(q.cursor.last_page);
}

// =========================================================================
// AUTO MODE INFERENCE
// =========================================================================

#[test]
fn auto_infers_modes_from_magic_characters() {
    let lex = lexicon_from_words(&["cat", "cater", "dog", "door"]);

    // '#' selects substring matching.
    let mut q = query("#oo", MatchMode::Auto, 10);
    assert_eq!(collect_page(&lex, &mut q).unwrap(), ["door"]);

    // '@' selects Damerau; "dgo" is one transposition from "dog".
    let mut q = query("@dgo", MatchMode::Auto, 10);
    q.max_dist = 1;
    assert_eq!(collect_page(&lex, &mut q).unwrap(), ["dog"]);

    // '+' selects longest common substring; "ate" scores best for cater.
    let mut q = query("+ate", MatchMode::Auto, 1);
    let first = collect_page(&lex, &mut q).unwrap();
    assert_eq!(first, ["cater"]);
}

#[test]
fn auto_simplifies_glob_patterns() {
    let lex = lexicon_from_words(&["cat", "cater", "dog", "door"]);

    let mut q = query("cat", MatchMode::Auto, 10);
    assert_eq!(collect_page(&lex, &mut q).unwrap(), ["cat"]);

    let mut q = query("ca*", MatchMode::Auto, 10);
    assert_eq!(collect_page(&lex, &mut q).unwrap(), ["cat", "cater"]);

    let mut q = query("*oo*", MatchMode::Auto, 10);
    assert_eq!(collect_page(&lex, &mut q).unwrap(), ["door"]);

    let mut q = query("*r", MatchMode::Auto, 10);
    assert_eq!(collect_page(&lex, &mut q).unwrap(), ["cater", "door"]);

    let mut q = query("d?g", MatchMode::Auto, 10);
    assert_eq!(collect_page(&lex, &mut q).unwrap(), ["dog"]);
}

#[test]
fn empty_auto_query_matches_nothing() {
    let lex = lexicon_from_words(&["cat"]);
    let mut q = query("", MatchMode::Auto, 10);
    assert!(collect_page(&lex, &mut q).unwrap().is_empty());
    assert!(q.cursor.last_page);
}

#[test]
fn exact_match_emits_at_most_one_word() {
    let lex = lexicon_from_words(&["cat", "cater"]);

    let mut q = query("cat", MatchMode::Exact, 10);
    assert_eq!(collect_page(&lex, &mut q).unwrap(), ["cat"]);
    assert!(q.cursor.last_page);

    let mut q = query("ca", MatchMode::Exact, 10);
    assert!(collect_page(&lex, &mut q).unwrap().is_empty());
    assert!(q.cursor.last_page);
}

// =========================================================================
// PAGINATION
// =========================================================================

#[test]
fn substring_pagination_covers_every_match_once() {
    let words = [
        "aorta", "boric", "chore", "decor", "fjord", "major", "minor", "oread", "tudor",
    ];
    let lex = lexicon_from_words(&words);

    let mut q = query("or", MatchMode::Substring, 2);
    let all = collect_all_pages(&lex, &mut q).unwrap();
    let expected: Vec<&str> = words.iter().filter(|w| w.contains("or")).copied().collect();
    assert_eq!(all, expected);
}

#[test]
fn glob_pages_concatenate_to_the_full_match_set() {
    let words = ["glad", "glade", "gland", "gleam", "glide", "globe", "glue"];
    let lex = lexicon_from_words(&words);

    let mut q = query("gl*e", MatchMode::Glob, 2);
    let all = collect_all_pages(&lex, &mut q).unwrap();
    assert_eq!(all, ["glade", "glide", "globe", "glue"]);
}

#[test]
fn fuzzy_pages_are_ordered_by_weight_then_ordinal() {
    let words = ["bake", "cake", "care", "core", "lake", "rake", "rare"];
    let lex = lexicon_from_words(&words);

    // With prefix_len 0 the whole lexicon competes.
    let mut q = query("cake", MatchMode::Levenshtein, 2);
    q.max_dist = 2;
    q.prefix_len = 0;
    let all = collect_all_pages(&lex, &mut q).unwrap();

    // cake: 0; bake/care/lake/rake: 1; core/rare: 2.
    assert_eq!(
        all,
        ["cake", "bake", "care", "lake", "rake", "core", "rare"]
    );
}

#[test]
fn fuzzy_prefix_pruning_limits_candidates() {
    let words = ["dank", "dark", "darn", "mark", "park"];
    let lex = lexicon_from_words(&words);

    let mut q = query("dark", MatchMode::Levenshtein, 10);
    q.max_dist = 1;
    q.prefix_len = 1;
    // mark/park are one edit away but do not share the 1-code-point prefix.
    assert_eq!(collect_page(&lex, &mut q).unwrap(), ["dark", "dank", "darn"]);
    assert!(q.cursor.last_page);
}

#[test]
fn fuzzy_prefix_longer_than_query_degrades_to_exact() {
    let lex = lexicon_from_words(&["do", "dog", "door"]);

    let mut q = query("do", MatchMode::Levenshtein, 10);
    q.max_dist = 2;
    q.prefix_len = 5;
    assert_eq!(collect_page(&lex, &mut q).unwrap(), ["do"]);
    assert!(q.cursor.last_page);

    let mut q = query("dop", MatchMode::Levenshtein, 10);
    q.max_dist = 2;
    q.prefix_len = 5;
    assert!(collect_page(&lex, &mut q).unwrap().is_empty());
    assert!(q.cursor.last_page);
}

#[test]
fn common_substring_mode_ignores_prefix_pruning() {
    let lex = lexicon_from_words(&["abcd", "xbcd", "zzzz"]);

    let mut q = query("+bcd", MatchMode::Auto, 10);
    q.prefix_len = 2;
    let page = collect_page(&lex, &mut q).unwrap();
    // Both words sharing "bcd" win over zzzz despite unrelated prefixes.
    assert_eq!(page[..2], ["abcd".to_string(), "xbcd".to_string()]);
}

#[test]
fn common_subsequence_prefers_longer_overlap() {
    let lex = lexicon_from_words(&["abcdef", "axcxex", "zzz"]);

    let mut q = query("abcdef", MatchMode::CommonSubsequence, 2);
    q.prefix_len = 0;
    let page = collect_page(&lex, &mut q).unwrap();
    assert_eq!(page[0], "abcdef");
    assert_eq!(page[1], "axcxex");
}

#[test]
fn page_size_zero_is_a_terminal_no_op() {
    let lex = lexicon_from_words(&["cat"]);
    let mut q = query("cat", MatchMode::Exact, 0);
    assert!(collect_page(&lex, &mut q).unwrap().is_empty());
    assert!(q.cursor.last_page);
}

#[test]
fn terminal_cursor_is_a_no_op_success() {
    let lex = lexicon_from_words(&["cat"]);
    let mut q = query("cat", MatchMode::Exact, 10);
    q.cursor = Cursor {
        last_page: true,
        last_pos: 17,
        last_weight: -3,
    };
    assert!(collect_page(&lex, &mut q).unwrap().is_empty());
    // The cursor is left terminal.
    assert!(q.cursor.last_page);
}

#[test]
fn cursor_round_trips_between_independent_queries() {
    // The cursor is plain data: carrying it to a fresh query struct, as a
    // remote caller would, resumes the same search.
    let words = ["ember", "emcee", "emery", "emira", "emits"];
    let lex = lexicon_from_words(&words);

    let mut first = query("em", MatchMode::Prefix, 2);
    let page1 = collect_page(&lex, &mut first).unwrap();
    assert_eq!(page1, ["ember", "emcee"]);

    let mut second = query("em", MatchMode::Prefix, 2);
    second.cursor = first.cursor;
    let page2 = collect_page(&lex, &mut second).unwrap();
    assert_eq!(page2, ["emery", "emira"]);
}

// =========================================================================
// ERROR TAXONOMY
// =========================================================================

#[test]
fn standard_lexicon_is_rejected() {
    let lex = lexicon_of_type(&["cat"], FsaType::Standard);
    let mut q = query("cat", MatchMode::Exact, 10);
    assert_eq!(search(&lex, &mut q, |_| {}), Err(SearchError::NotNumbered));
}

#[test]
fn oversized_page_is_rejected() {
    let lex = lexicon_from_words(&["cat"]);
    let mut q = query("cat", MatchMode::Exact, 31);
    assert_eq!(search(&lex, &mut q, |_| {}), Err(SearchError::PageTooLarge));
}

#[test]
fn overlong_query_is_rejected() {
    let lex = lexicon_from_words(&["cat"]);
    let long = "x".repeat(MAX_WORD_LEN + 1);
    let mut q = Query::new(long.as_bytes());
    assert_eq!(search(&lex, &mut q, |_| {}), Err(SearchError::QueryTooLong));
}

#[test]
fn non_utf8_query_is_rejected_by_decoding_modes() {
    let lex = lexicon_from_words(&["cat"]);

    // The invalid byte sits in the pattern tail, past the literal prefix.
    let raw = [b'c', b'*', 0xff];
    let mut q = Query::new(&raw);
    q.mode = MatchMode::Glob;
    assert_eq!(search(&lex, &mut q, |_| {}), Err(SearchError::QueryNotUtf8));
    assert!(q.cursor.last_page);

    let raw = [0xff, 0xfe];
    let mut q = Query::new(&raw);
    q.mode = MatchMode::Levenshtein;
    assert_eq!(search(&lex, &mut q, |_| {}), Err(SearchError::QueryNotUtf8));
}

#[test]
fn byte_modes_accept_non_utf8_queries() {
    // Exact/prefix/substring/suffix compare raw bytes; no decoding happens.
    let lex = lexicon_from_words(&["cat"]);
    let raw = [0xff, 0xfe];
    let mut q = Query::new(&raw);
    q.mode = MatchMode::Prefix;
    assert_eq!(search(&lex, &mut q, |_| {}), Ok(()));
    assert!(q.cursor.last_page);
}
