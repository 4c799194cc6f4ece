// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Streaming automaton encoder.
//!
//! Words are added in strictly ascending byte-wise order. Each addition
//! freezes the states the new word no longer shares with the previous one,
//! hash-consing them against every state frozen so far, so the automaton
//! is minimized incrementally and never materialized as a trie.

use std::collections::HashMap;
use std::io::Write;

use super::{FsaError, FsaType, Transition, FORMAT_VERSION, MAGIC, MAX_TRANSITIONS, MAX_WORD_LEN};

/// A state still under construction: the outgoing transitions gathered so
/// far at one depth of the current word.
#[derive(Default)]
struct ScratchState {
    transitions: Vec<Transition>,
    terminal: bool,
}

/// Streaming encoder for minimal automata.
///
/// ```no_run
/// use minilex::{Encoder, FsaType};
///
/// let mut enc = Encoder::new(FsaType::Numbered);
/// enc.add(b"cat")?;
/// enc.add(b"cater")?;
/// let mut out = Vec::new();
/// enc.dump(&mut out)?;
/// # Ok::<(), minilex::FsaError>(())
/// ```
pub struct Encoder {
    /// Previous word added.
    prev: [u8; MAX_WORD_LEN + 1],
    prev_len: usize,

    /// Scratch states, indexed by depth.
    states: Vec<ScratchState>,

    /// State hash to addresses of frozen states with that hash. Keys are
    /// sequences of packed words; equality is a comparison against the
    /// canonical flat array, so only addresses are stored here.
    table: HashMap<u32, Vec<u32>>,

    /// Set once the automaton has been dumped; adding is then rejected
    /// until `clear()`.
    finished: bool,

    transitions: Vec<u32>,
    counts: Option<Vec<u32>>,
}

impl Encoder {
    /// Creates an encoder. `FsaType::Numbered` additionally records word
    /// counts, enabling `locate`/`extract` on the loaded automaton at the
    /// price of doubling its size.
    pub fn new(fsa_type: FsaType) -> Self {
        let mut states = Vec::with_capacity(MAX_WORD_LEN + 2);
        states.resize_with(MAX_WORD_LEN + 2, ScratchState::default);
        Encoder {
            prev: [0; MAX_WORD_LEN + 1],
            prev_len: 0,
            states,
            table: HashMap::new(),
            finished: false,
            transitions: Vec::new(),
            counts: match fsa_type {
                FsaType::Numbered => Some(Vec::new()),
                FsaType::Standard => None,
            },
        }
    }

    /// Resets the encoder so it can encode a new set of words.
    pub fn clear(&mut self) {
        self.prev_len = 0;
        for state in &mut self.states {
            state.transitions.clear();
            state.terminal = false;
        }
        self.table.clear();
        self.finished = false;
        self.transitions.clear();
        if let Some(counts) = &mut self.counts {
            counts.clear();
        }
    }

    /// Adds a word.
    ///
    /// Words must be unique, sorted byte-wise ascending, non-empty, and no
    /// longer than [`MAX_WORD_LEN`]. On error the encoder should not be fed
    /// further words; call `clear()` before reusing it.
    pub fn add(&mut self, word: &[u8]) -> Result<(), FsaError> {
        if self.finished {
            return Err(FsaError::Frozen);
        }
        if word.is_empty() || word.len() > MAX_WORD_LEN {
            return Err(FsaError::WordRejected);
        }
        if word <= &self.prev[..self.prev_len] {
            return Err(FsaError::OutOfOrder);
        }

        let shared = common_prefix(word, &self.prev[..self.prev_len]);
        self.minimize(shared)?;

        while self.prev_len < word.len() {
            self.prev[self.prev_len] = word[self.prev_len];
            self.prev_len += 1;
            let state = &mut self.states[self.prev_len];
            state.terminal = false;
            state.transitions.clear();
        }
        self.states[self.prev_len].terminal = true;
        Ok(())
    }

    /// Serializes the automaton.
    ///
    /// May be called several times; the first call freezes the encoder, so
    /// no further words can be added until `clear()`. A `TooBig` error
    /// poisons the encoder until it is cleared.
    pub fn dump<W: Write>(&mut self, w: &mut W) -> Result<(), FsaError> {
        if !self.finished {
            self.finish()?;
            self.finished = true;
        }

        let type_tag = match self.counts {
            Some(_) => FsaType::Numbered,
            None => FsaType::Standard,
        };
        let packed = ((self.transitions.len() as u32) << 8) | type_tag as u32;

        w.write_all(&MAGIC.to_be_bytes())?;
        w.write_all(&FORMAT_VERSION.to_be_bytes())?;
        w.write_all(&packed.to_be_bytes())?;

        write_words(w, &self.transitions)?;
        if let Some(counts) = &self.counts {
            write_words(w, counts)?;
        }
        Ok(())
    }

    /// Freezes the scratch states down to the root and numbers the result.
    fn finish(&mut self) -> Result<(), FsaError> {
        self.minimize(0)?;
        let start = self.freeze_state(0)?;
        self.transitions[0] |= start << 10;

        if let Some(mut counts) = self.counts.take() {
            let mut memo = HashMap::new();
            let total = number_states(&self.transitions, &mut counts, start, &mut memo);
            counts[0] = total;
            self.counts = Some(counts);
        }
        Ok(())
    }

    /// Freezes scratch states deeper than `lim`, bottom up, wiring each
    /// frozen state into its parent's scratch transitions.
    fn minimize(&mut self, lim: usize) -> Result<(), FsaError> {
        while self.prev_len > lim {
            let dest = self.freeze_state(self.prev_len)?;
            let symbol = self.prev[self.prev_len - 1];
            let terminal = self.states[self.prev_len].terminal;
            self.prev_len -= 1;
            self.states[self.prev_len]
                .transitions
                .push(Transition::new(symbol, terminal, dest));
        }
        Ok(())
    }

    /// Hash-conses the scratch state at `depth` into the flat array and
    /// returns its address.
    fn freeze_state(&mut self, depth: usize) -> Result<u32, FsaError> {
        let state = &mut self.states[depth];
        if state.transitions.is_empty() {
            state.transitions.push(Transition::default());
        }
        if let Some(last) = state.transitions.last_mut() {
            last.set_last();
        }

        let nr = state.transitions.len();
        let hash = hash_state(&state.transitions);

        if let Some(bucket) = self.table.get(&hash) {
            for &addr in bucket {
                let a = addr as usize;
                // A shorter stored state cannot false-match: its final
                // `last` bit would differ from the candidate's interior.
                if let Some(existing) = self.transitions.get(a..a + nr) {
                    if existing
                        .iter()
                        .zip(&state.transitions)
                        .all(|(&raw, t)| raw == t.0)
                    {
                        return Ok(addr);
                    }
                }
            }
        }

        if self.transitions.len() + nr >= MAX_TRANSITIONS {
            return Err(FsaError::TooBig);
        }

        let addr = self.transitions.len() as u32;
        self.transitions.extend(state.transitions.iter().map(|t| t.0));
        if let Some(counts) = &mut self.counts {
            counts.resize(self.transitions.len(), 0);
        }
        self.table.entry(hash).or_default().push(addr);
        Ok(addr)
    }
}

/// Sum-then-multiply mix over the packed transition words.
fn hash_state(transitions: &[Transition]) -> u32 {
    let mut hash: u32 = 0;
    for t in transitions {
        hash = hash.wrapping_add(t.0);
    }
    hash.wrapping_mul(324_027) >> 13
}

fn common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Post-order traversal assigning `counts[p]` = number of accepting paths
/// from transition `p`, inclusive. Totals are memoized per state address;
/// shared subtrees are numbered once.
fn number_states(
    transitions: &[u32],
    counts: &mut [u32],
    state: u32,
    memo: &mut HashMap<u32, u32>,
) -> u32 {
    if state == 0 {
        return 0;
    }
    if let Some(&total) = memo.get(&state) {
        return total;
    }

    let mut total = 0;
    let mut p = state as usize;
    loop {
        let t = Transition(transitions[p]);
        let mut below = number_states(transitions, counts, t.dest(), memo);
        if t.is_terminal() {
            below += 1;
        }
        counts[p] = below;
        total += below;
        if t.is_last() {
            break;
        }
        p += 1;
    }
    memo.insert(state, total);
    total
}

fn write_words<W: Write>(w: &mut W, words: &[u32]) -> Result<(), FsaError> {
    // Serialize in chunks so small automata cost one write and large ones
    // don't buffer the whole big-endian image.
    let mut buf = [0u8; 4096];
    for chunk in words.chunks(buf.len() / 4) {
        let mut n = 0;
        for &word in chunk {
            buf[n..n + 4].copy_from_slice(&word.to_be_bytes());
            n += 4;
        }
        w.write_all(&buf[..n])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(words: &[&str]) -> Vec<u8> {
        let mut enc = Encoder::new(FsaType::Numbered);
        for w in words {
            enc.add(w.as_bytes()).unwrap();
        }
        let mut out = Vec::new();
        enc.dump(&mut out).unwrap();
        out
    }

    #[test]
    fn rejects_empty_and_oversize_words() {
        let mut enc = Encoder::new(FsaType::Standard);
        assert!(matches!(enc.add(b""), Err(FsaError::WordRejected)));
        let long = vec![b'a'; MAX_WORD_LEN + 1];
        assert!(matches!(enc.add(&long), Err(FsaError::WordRejected)));
        let max = vec![b'a'; MAX_WORD_LEN];
        assert!(enc.add(&max).is_ok());
    }

    #[test]
    fn rejects_unsorted_and_duplicate_words() {
        let mut enc = Encoder::new(FsaType::Standard);
        enc.add(b"mango").unwrap();
        assert!(matches!(enc.add(b"mango"), Err(FsaError::OutOfOrder)));
        assert!(matches!(enc.add(b"apple"), Err(FsaError::OutOfOrder)));
        assert!(matches!(enc.add(b"mang"), Err(FsaError::OutOfOrder)));
        assert!(enc.add(b"mangos").is_ok());
    }

    #[test]
    fn freezes_after_dump_and_clears() {
        let mut enc = Encoder::new(FsaType::Numbered);
        enc.add(b"one").unwrap();
        let mut out = Vec::new();
        enc.dump(&mut out).unwrap();
        assert!(matches!(enc.add(b"two"), Err(FsaError::Frozen)));

        // A second dump of the frozen encoder produces identical bytes.
        let mut again = Vec::new();
        enc.dump(&mut again).unwrap();
        assert_eq!(out, again);

        enc.clear();
        enc.add(b"two").unwrap();
        let mut out2 = Vec::new();
        enc.dump(&mut out2).unwrap();
        assert_ne!(out, out2);
    }

    #[test]
    fn shared_suffixes_are_consed() {
        // "bats"/"cats" and "bat"/"cat" share their whole tails, so the
        // automaton should be much smaller than the trie (which would hold
        // 14 edges).
        let small = encode(&["bat", "bats", "cat", "cats"]);
        let distinct = encode(&["ax", "by", "cz", "dw"]);
        assert!(small.len() < distinct.len() + 8);
    }

    #[test]
    fn header_is_big_endian() {
        let out = encode(&["a"]);
        assert_eq!(&out[0..4], b"mini");
        assert_eq!(u32::from_be_bytes(out[4..8].try_into().unwrap()), 1);
        let packed = u32::from_be_bytes(out[8..12].try_into().unwrap());
        assert_eq!(packed & 0xff, FsaType::Numbered as u32);
        let nr = (packed >> 8) as usize;
        assert_eq!(out.len(), 12 + 2 * 4 * nr);
    }
}
