//! Paginated lexical search over minimal acyclic automata.
//!
//! A lexicon lives in a "numbered" DAFSA: a minimized automaton whose
//! packed transitions carry per-subtree word counts, giving constant-time
//! rank/select between words and their 1-based ordinals. On top of it,
//! one search call answers nine match modes (exact, prefix, substring,
//! suffix, glob, Levenshtein, Damerau-Levenshtein, longest common
//! substring, longest common subsequence) one page at a time, with an
//! opaque cursor that resumes exactly after the last returned word.
//!
//! # Architecture
//!
//! | Module     | Responsibility                                        |
//! |------------|-------------------------------------------------------|
//! | `fsa`      | Packed automaton storage: encoder, reader, iterator   |
//! | `utf8`     | Code-point buffers for the engine's fixed-size decoding |
//! | `glob`     | `*`/`?`/`[...]` matching over code points             |
//! | `metric`   | Fuzzy weights: edit distances and LCS lengths         |
//! | `heap`     | Bounded top-k selection with a total tie-break order  |
//! | `query`    | Query/cursor types, AUTO resolution, glob rewriting   |
//! | `search`   | The per-mode match drivers and the public entry point |
//!
//! # Usage
//!
//! ```
//! use minilex::{search, Encoder, Automaton, FsaType, Query};
//!
//! let mut enc = Encoder::new(FsaType::Numbered);
//! for word in ["cat", "cater", "dog", "door"] {
//!     enc.add(word.as_bytes())?;
//! }
//! let mut bytes = Vec::new();
//! enc.dump(&mut bytes)?;
//! let lexicon = Automaton::load(&mut bytes.as_slice())?;
//!
//! let mut query = Query::new(b"ca*");
//! let mut matches = Vec::new();
//! search(&lexicon, &mut query, |word| {
//!     matches.push(String::from_utf8_lossy(word).into_owned());
//! })?;
//! assert_eq!(matches, ["cat", "cater"]);
//! assert!(query.cursor.last_page);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Module declarations
mod fsa;
mod glob;
mod heap;
mod metric;
mod query;
mod search;
pub mod testing;
mod utf8;

// Re-exports for public API
pub use fsa::dump::{dump, DumpFormat};
pub use fsa::{Automaton, Encoder, FsaError, FsaType, WordIter, MAX_WORD_LEN};
pub use heap::BoundedHeap;
pub use metric::Metric;
pub use query::{Cursor, MatchMode, Query, MAX_PAGE_SIZE};
pub use search::{search, SearchError};
