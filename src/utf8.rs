// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Decoding words into fixed code-point buffers.
//!
//! The match engine compares code points, not bytes, and reuses one
//! stack buffer per search, so decoding writes into a caller-provided
//! array instead of allocating.

use crate::fsa::MAX_WORD_LEN;

/// Decodes `bytes` into `dest`, returning the number of code points, or
/// `None` if the input is not valid UTF-8.
///
/// `bytes` must be no longer than `dest`; a valid UTF-8 string never
/// decodes to more code points than it has bytes.
pub(crate) fn decode_into(dest: &mut [char; MAX_WORD_LEN + 1], bytes: &[u8]) -> Option<usize> {
    debug_assert!(bytes.len() <= dest.len());
    let s = std::str::from_utf8(bytes).ok()?;
    let mut len = 0;
    for ch in s.chars() {
        dest[len] = ch;
        len += 1;
    }
    Some(len)
}

/// Length in bytes of the first `nr` code points of `chars`, if encoded
/// as UTF-8.
pub(crate) fn prefix_bytes(chars: &[char], nr: usize) -> usize {
    chars[..nr].iter().map(|c| c.len_utf8()).sum()
}
