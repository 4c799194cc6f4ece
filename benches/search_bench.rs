// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Benchmarks for automaton construction and the match drivers.
//!
//! Lexicon sizes simulate realistic dictionaries:
//! - small:  ~1k words  (domain vocabulary)
//! - medium: ~10k words (pocket dictionary)
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use minilex::{search, Automaton, Encoder, FsaType, MatchMode, Query};

/// Lexicon size configurations.
struct LexiconSize {
    name: &'static str,
    words: usize,
}

const LEXICON_SIZES: &[LexiconSize] = &[
    LexiconSize {
        name: "small",
        words: 1_000,
    },
    LexiconSize {
        name: "medium",
        words: 10_000,
    },
];

/// Deterministic pseudo-words, pre-sorted for the encoder.
fn make_words(count: usize) -> Vec<String> {
    let syllables = [
        "ba", "co", "da", "fe", "gi", "ho", "ju", "ka", "li", "mo", "nu", "pe", "qua", "ri", "so",
        "tu", "ve", "wa", "xe", "zo",
    ];
    let mut words: Vec<String> = (0..count * 2)
        .map(|i| {
            let mut word = String::new();
            let mut n = i;
            for _ in 0..3 + (i % 3) {
                word.push_str(syllables[n % syllables.len()]);
                n /= syllables.len();
            }
            word
        })
        .collect();
    words.sort();
    words.dedup();
    words.truncate(count);
    words
}

fn build_lexicon(words: &[String]) -> Automaton {
    let mut enc = Encoder::new(FsaType::Numbered);
    for word in words {
        enc.add(word.as_bytes()).unwrap();
    }
    let mut bytes = Vec::new();
    enc.dump(&mut bytes).unwrap();
    Automaton::load(&mut bytes.as_slice()).unwrap()
}

fn run_query(lexicon: &Automaton, text: &str, mode: MatchMode) -> usize {
    let mut query = Query::new(text.as_bytes());
    query.mode = mode;
    query.page_size = 10;
    let mut hits = 0;
    search(lexicon, &mut query, |_| hits += 1).unwrap();
    hits
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for size in LEXICON_SIZES {
        let words = make_words(size.words);
        group.bench_with_input(BenchmarkId::from_parameter(size.name), &words, |b, words| {
            b.iter(|| black_box(build_lexicon(words)));
        });
    }
    group.finish();
}

fn bench_search_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    for size in LEXICON_SIZES {
        let words = make_words(size.words);
        let lexicon = build_lexicon(&words);

        group.bench_with_input(
            BenchmarkId::new("exact", size.name),
            &lexicon,
            |b, lexicon| {
                b.iter(|| black_box(run_query(lexicon, "bacoda", MatchMode::Exact)));
            },
        );
        group.bench_with_input(
            BenchmarkId::new("prefix", size.name),
            &lexicon,
            |b, lexicon| {
                b.iter(|| black_box(run_query(lexicon, "ba", MatchMode::Prefix)));
            },
        );
        group.bench_with_input(
            BenchmarkId::new("substring", size.name),
            &lexicon,
            |b, lexicon| {
                b.iter(|| black_box(run_query(lexicon, "coda", MatchMode::Substring)));
            },
        );
        group.bench_with_input(
            BenchmarkId::new("glob", size.name),
            &lexicon,
            |b, lexicon| {
                b.iter(|| black_box(run_query(lexicon, "ba*da", MatchMode::Glob)));
            },
        );
        group.bench_with_input(
            BenchmarkId::new("levenshtein", size.name),
            &lexicon,
            |b, lexicon| {
                b.iter(|| black_box(run_query(lexicon, "bacada", MatchMode::Levenshtein)));
            },
        );
    }
    group.finish();
}

fn bench_rank_select(c: &mut Criterion) {
    let words = make_words(10_000);
    let lexicon = build_lexicon(&words);
    let probe = &words[words.len() / 2];

    c.bench_function("locate", |b| {
        b.iter(|| black_box(lexicon.locate(black_box(probe.as_bytes()))));
    });

    let mut buf = [0u8; minilex::MAX_WORD_LEN + 1];
    let middle = lexicon.len() / 2;
    c.bench_function("extract", |b| {
        b.iter(|| black_box(lexicon.extract(black_box(middle), &mut buf)));
    });
}

criterion_group!(benches, bench_build, bench_search_modes, bench_rank_select);
criterion_main!(benches);
