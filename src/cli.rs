// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the minilex command-line interface.
//!
//! Three subcommands: `build` to compile a word list into an automaton
//! file, `search` to query one page at a time (with cursor flags to
//! resume where the previous page stopped), and `dump` to inspect the
//! automaton as words, a transition table, or Graphviz DOT.

use clap::{Parser, Subcommand, ValueEnum};

use minilex::{DumpFormat, MatchMode};

#[derive(Parser)]
#[command(
    name = "minilex",
    about = "Paginated exact, glob and fuzzy search over lexicon automata",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a word list into an automaton file
    Build {
        /// Input word list, one word per line ("-" for stdin)
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Output automaton file
        #[arg(short, long)]
        output: String,

        /// Build a standard automaton instead of a numbered one
        /// (smaller, but cannot be searched with pagination)
        #[arg(long)]
        standard: bool,
    },

    /// Search an automaton file and display one page of results
    Search {
        /// Path to the automaton file
        file: String,

        /// Search query; with the default automatic mode, a leading "+",
        /// "@" or "#" selects common-substring, Damerau or substring
        /// matching, and glob wildcards are honored
        query: String,

        /// Matching mode
        #[arg(short, long, value_enum, default_value_t = ModeArg::Auto)]
        mode: ModeArg,

        /// Maximum number of words per page
        #[arg(short, long, default_value = "10")]
        page_size: usize,

        /// Maximum edit distance for the fuzzy modes
        #[arg(long, default_value = "3")]
        max_dist: i32,

        /// Code points a fuzzy candidate must share with the query
        #[arg(long, default_value = "1")]
        prefix_len: usize,

        /// Resume position from the previous page's cursor
        #[arg(long, default_value = "0")]
        last_pos: u32,

        /// Resume weight from the previous page's cursor
        #[arg(long, default_value = "0")]
        last_weight: i32,

        /// Emit the page and cursor as JSON
        #[arg(long)]
        json: bool,
    },

    /// Dump an automaton file for inspection
    Dump {
        /// Path to the automaton file
        file: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = FormatArg::Words)]
        format: FormatArg,
    },
}

/// Matching mode, as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Auto,
    Exact,
    Prefix,
    Substring,
    Suffix,
    Glob,
    Levenshtein,
    Damerau,
    CommonSubstring,
    CommonSubsequence,
}

impl From<ModeArg> for MatchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Auto => MatchMode::Auto,
            ModeArg::Exact => MatchMode::Exact,
            ModeArg::Prefix => MatchMode::Prefix,
            ModeArg::Substring => MatchMode::Substring,
            ModeArg::Suffix => MatchMode::Suffix,
            ModeArg::Glob => MatchMode::Glob,
            ModeArg::Levenshtein => MatchMode::Levenshtein,
            ModeArg::Damerau => MatchMode::Damerau,
            ModeArg::CommonSubstring => MatchMode::CommonSubstring,
            ModeArg::CommonSubsequence => MatchMode::CommonSubsequence,
        }
    }
}

/// Dump format, as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// One word per line
    Words,
    /// TSV, one line per transition
    Tsv,
    /// Graphviz DOT
    Dot,
}

impl From<FormatArg> for DumpFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Words => DumpFormat::Words,
            FormatArg::Tsv => DumpFormat::Tsv,
            FormatArg::Dot => DumpFormat::Dot,
        }
    }
}
