// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Minilex CLI: build, search, and dump lexicon automata.
//!
//! ```bash
//! # Compile a sorted word list into a numbered automaton
//! minilex build --input words.txt --output lexicon.mini
//!
//! # First page of fuzzy matches (leading @ selects Damerau)
//! minilex search lexicon.mini "@wrod"
//!
//! # Resume from the cursor printed after a non-terminal page
//! minilex search lexicon.mini "@wrod" --last-pos 42 --last-weight 1
//!
//! # Inspect the transition table
//! minilex dump lexicon.mini --format tsv
//! ```

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};

use clap::Parser;
use serde::Serialize;

use minilex::{dump, search, Automaton, Cursor, Encoder, FsaType, Query};

mod cli;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build {
            input,
            output,
            standard,
        } => run_build(&input, &output, standard),
        Commands::Search {
            file,
            query,
            mode,
            page_size,
            max_dist,
            prefix_len,
            last_pos,
            last_weight,
            json,
        } => {
            let mut q = Query::new(query.as_bytes());
            q.mode = mode.into();
            q.page_size = page_size;
            q.max_dist = max_dist;
            q.prefix_len = prefix_len;
            q.cursor = Cursor {
                last_page: false,
                last_pos,
                last_weight,
            };
            run_search(&file, q, json)
        }
        Commands::Dump { file, format } => run_dump(&file, format.into()),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run_build(input: &str, output: &str, standard: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut words = read_words(input)?;
    // The encoder wants ascending unique byte strings.
    words.sort();
    words.dedup();

    let fsa_type = if standard {
        FsaType::Standard
    } else {
        FsaType::Numbered
    };
    let mut enc = Encoder::new(fsa_type);
    for word in &words {
        enc.add(word)?;
    }

    let mut out = BufWriter::new(File::create(output)?);
    enc.dump(&mut out)?;
    out.flush()?;

    eprintln!("{}: {} words", output, words.len());
    Ok(())
}

fn read_words(input: &str) -> Result<Vec<Vec<u8>>, io::Error> {
    let mut words = Vec::new();
    let mut push_lines = |reader: &mut dyn BufRead| -> io::Result<()> {
        for line in reader.lines() {
            let line = line?;
            if !line.is_empty() {
                words.push(line.into_bytes());
            }
        }
        Ok(())
    };

    if input == "-" {
        push_lines(&mut io::stdin().lock())?;
    } else {
        push_lines(&mut BufReader::new(File::open(input)?))?;
    }
    Ok(words)
}

/// One page of results plus the updated cursor, for `--json`.
#[derive(Serialize)]
struct SearchReport {
    matches: Vec<String>,
    cursor: Cursor,
}

fn run_search(file: &str, mut query: Query, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let lexicon = Automaton::load_path(file)?;

    let mut matches = Vec::new();
    search(&lexicon, &mut query, |word| {
        matches.push(String::from_utf8_lossy(word).into_owned());
    })?;

    if json {
        let report = SearchReport {
            matches,
            cursor: query.cursor,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let mut stdout = io::stdout().lock();
    for word in &matches {
        writeln!(stdout, "{}", word)?;
    }
    if !query.cursor.last_page {
        // The resume line carries exactly what the next invocation needs.
        let resume = format!(
            "=> [{} {}]",
            query.cursor.last_pos, query.cursor.last_weight
        );
        if atty::is(atty::Stream::Stdout) {
            writeln!(stdout, "\x1b[2m{}\x1b[0m", resume)?;
        } else {
            writeln!(stdout, "{}", resume)?;
        }
    }
    Ok(())
}

fn run_dump(file: &str, format: minilex::DumpFormat) -> Result<(), Box<dyn std::error::Error>> {
    let lexicon = Automaton::load_path(file)?;
    let stdout = io::stdout().lock();
    let mut out = BufWriter::new(stdout);
    dump(&lexicon, &mut out, format)?;
    out.flush()?;
    drop(out);

    if format == minilex::DumpFormat::Tsv {
        let size = fs::metadata(file)?.len();
        eprintln!(
            "{} transitions, {} words, {} bytes",
            lexicon.nr_transitions(),
            lexicon.len(),
            size
        );
    }
    Ok(())
}
