// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Loaded automata.
//!
//! An [`Automaton`] is immutable for its whole lifetime and holds no
//! interior mutability, so it can be shared freely across threads.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::{FsaError, FsaType, Transition, FORMAT_VERSION, MAGIC, MAX_TRANSITIONS, MAX_WORD_LEN};

/// A loaded automaton.
///
/// Transitions come first in `data`; for numbered automata the counts
/// follow in the same allocation, mirroring the on-disk layout.
pub struct Automaton {
    data: Box<[u32]>,
    nr: u32,
    numbered: bool,
}

impl Automaton {
    /// Loads an automaton from a reader. A short read is an error.
    pub fn load<R: Read>(r: &mut R) -> Result<Self, FsaError> {
        let mut header = [0u8; 12];
        r.read_exact(&mut header).map_err(FsaError::Io)?;

        let magic = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
        let version = u32::from_be_bytes([header[4], header[5], header[6], header[7]]);
        let packed = u32::from_be_bytes([header[8], header[9], header[10], header[11]]);

        if magic != MAGIC {
            return Err(FsaError::BadMagic);
        }
        if version != FORMAT_VERSION {
            return Err(FsaError::BadVersion);
        }

        let nr = packed >> 8;
        if nr < 1 || nr as usize >= MAX_TRANSITIONS {
            return Err(FsaError::Corrupt);
        }
        let numbered = match packed & 0xff {
            0 => false,
            1 => true,
            _ => return Err(FsaError::Corrupt),
        };

        let words = if numbered { 2 * nr as usize } else { nr as usize };
        let mut body = vec![0u8; words * 4];
        r.read_exact(&mut body).map_err(FsaError::Io)?;

        let mut data = Vec::with_capacity(words);
        for chunk in body.chunks_exact(4) {
            data.push(u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
        }

        let fsa = Automaton {
            data: data.into_boxed_slice(),
            nr,
            numbered,
        };
        fsa.validate()?;
        Ok(fsa)
    }

    /// Loads an automaton from a file.
    pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Self, FsaError> {
        let file = File::open(path)?;
        Self::load(&mut BufReader::new(file))
    }

    /// Every `dest` must stay inside the transition array and the array
    /// must end on a `last` transition, so state scans cannot run off the
    /// end. The C ancestor of this format trusts its producers instead.
    fn validate(&self) -> Result<(), FsaError> {
        let transitions = self.transitions();
        for &raw in transitions {
            if Transition(raw).dest() >= self.nr {
                return Err(FsaError::Corrupt);
            }
        }
        match transitions.last() {
            Some(&raw) if Transition(raw).is_last() => Ok(()),
            _ => Err(FsaError::Corrupt),
        }
    }

    #[inline]
    pub(crate) fn transitions(&self) -> &[u32] {
        &self.data[..self.nr as usize]
    }

    /// Counts array of a numbered automaton; empty for standard ones.
    #[inline]
    pub(crate) fn counts(&self) -> &[u32] {
        if self.numbered {
            &self.data[self.nr as usize..]
        } else {
            &[]
        }
    }

    #[inline]
    pub(crate) fn tr(&self, pos: u32) -> Transition {
        Transition(self.transitions()[pos as usize])
    }

    /// The automaton's type tag.
    pub fn fsa_type(&self) -> FsaType {
        if self.numbered {
            FsaType::Numbered
        } else {
            FsaType::Standard
        }
    }

    pub fn is_numbered(&self) -> bool {
        self.numbered
    }

    /// Number of transitions in the automaton.
    pub fn nr_transitions(&self) -> u32 {
        self.nr
    }

    /// Number of words. Constant time for numbered automata, a full
    /// traversal otherwise.
    pub fn len(&self) -> u32 {
        if self.numbered {
            self.counts()[0]
        } else {
            count_words(self.transitions(), self.tr(0).dest())
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Membership test.
    pub fn contains(&self, word: &[u8]) -> bool {
        let mut pos = 0u32;
        for &byte in word {
            pos = self.tr(pos).dest();
            if pos == 0 {
                return false;
            }
            loop {
                let t = self.tr(pos);
                if t.symbol() == byte {
                    break;
                }
                if t.is_last() {
                    return false;
                }
                pos += 1;
            }
        }
        self.tr(pos).is_terminal()
    }

    /// Ordinal of a word, starting at 1.
    ///
    /// Returns 0 if the word is absent or the automaton is not numbered.
    pub fn locate(&self, word: &[u8]) -> u32 {
        if !self.numbered {
            return 0;
        }
        let counts = self.counts();
        let mut pos = 0u32;
        let mut index = 0u32;

        for &byte in word {
            pos = self.tr(pos).dest();
            if pos == 0 {
                return 0;
            }
            loop {
                let t = self.tr(pos);
                if t.symbol() == byte {
                    break;
                }
                if t.is_last() {
                    return 0;
                }
                index += counts[pos as usize];
                pos += 1;
            }
            if self.tr(pos).is_terminal() {
                index += 1;
            }
        }
        if self.tr(pos).is_terminal() {
            index
        } else {
            0
        }
    }

    /// Extracts the word with the given 1-based ordinal into `buf`,
    /// returning its length.
    ///
    /// Returns 0 if the ordinal is out of range or the automaton is not
    /// numbered.
    pub fn extract(&self, ordinal: u32, buf: &mut [u8; MAX_WORD_LEN + 1]) -> usize {
        if !self.numbered {
            return 0;
        }
        let counts = self.counts();
        if ordinal == 0 || counts[0] < ordinal {
            return 0;
        }

        let mut index = ordinal;
        let mut pos = 0u32;
        let mut len = 0usize;
        loop {
            pos = self.tr(pos).dest();
            loop {
                if pos as usize >= counts.len() || len >= MAX_WORD_LEN {
                    return 0; // corrupt counts
                }
                let cnt = counts[pos as usize];
                if index > cnt {
                    index -= cnt;
                    pos += 1;
                } else {
                    let t = self.tr(pos);
                    buf[len] = t.symbol();
                    len += 1;
                    if t.is_terminal() {
                        index -= 1;
                    }
                    break;
                }
            }
            if index == 0 {
                return len;
            }
        }
    }
}

fn count_words(transitions: &[u32], state: u32) -> u32 {
    let mut count = 0;
    if state == 0 {
        return 0;
    }
    let mut p = state as usize;
    loop {
        let t = Transition(transitions[p]);
        if t.is_terminal() {
            count += 1;
        }
        count += count_words(transitions, t.dest());
        if t.is_last() {
            break;
        }
        p += 1;
    }
    count
}
