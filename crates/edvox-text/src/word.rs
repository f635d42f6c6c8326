#![forbid(unsafe_code)]

//! Word-boundary scanning for native text controls.
//!
//! A word boundary is a run of non-word characters (anything outside
//! `[A-Za-z0-9_]`). Forward motion lands on the start of the next run,
//! skipping a run that begins exactly at the cursor; backward motion lands
//! on the end of the last run that finishes strictly before the cursor.
//!
//! ```
//! use edvox_text::word::{next_word_offset, previous_word_offset};
//!
//! assert_eq!(next_word_offset("foo bar baz", 0), 3);
//! assert_eq!(next_word_offset("foo bar baz", 3), 7);
//! assert_eq!(previous_word_offset("foo bar baz", 11), 8);
//! ```

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use crate::offsets::{byte_index, char_len, char_offset};

fn boundary_regex() -> &'static Regex {
    static BOUNDARY: OnceLock<Regex> = OnceLock::new();
    BOUNDARY.get_or_init(|| Regex::new(r"[^A-Za-z0-9_]+").expect("boundary regex"))
}

/// Boundary runs of `text` as char-offset ranges, in order.
pub fn boundary_runs(text: &str) -> impl Iterator<Item = Range<usize>> + '_ {
    boundary_regex()
        .find_iter(text)
        .map(move |m| char_offset(text, m.start())..char_offset(text, m.end()))
}

/// Offset the cursor lands on when moving to the next word from `cursor`.
///
/// Returns the end of `text` when no further boundary exists.
#[must_use]
pub fn next_word_offset(text: &str, cursor: usize) -> usize {
    let len = char_len(text);
    let cursor = cursor.min(len);
    let tail = &text[byte_index(text, cursor)..];
    let mut runs = boundary_runs(tail);
    let mut found = runs.next();
    if found.as_ref().is_some_and(|run| run.start == 0) {
        found = runs.next();
    }
    found.map_or(len, |run| cursor + run.start)
}

/// Offset the cursor lands on when moving to the previous word from `cursor`.
///
/// Returns 0 when no boundary ends strictly before the cursor.
#[must_use]
pub fn previous_word_offset(text: &str, cursor: usize) -> usize {
    let cursor = cursor.min(char_len(text));
    let head = &text[..byte_index(text, cursor)];
    boundary_runs(head)
        .map(|run| run.end)
        .filter(|&end| end < cursor)
        .last()
        .unwrap_or(0)
}

/// Offset just past the next `\n` at or after `cursor`, or the end of text.
#[must_use]
pub fn next_paragraph_offset(text: &str, cursor: usize) -> usize {
    let len = char_len(text);
    text.chars()
        .enumerate()
        .skip(cursor.min(len))
        .find(|(_, c)| *c == '\n')
        .map_or(len, |(idx, _)| idx + 1)
}

/// Offset just past the last `\n` that ends before the char preceding
/// `cursor`, or 0.
///
/// The char immediately before the cursor is ignored so that repeated calls
/// keep moving instead of sticking on the paragraph the cursor opens.
#[must_use]
pub fn previous_paragraph_offset(text: &str, cursor: usize) -> usize {
    let limit = cursor.min(char_len(text)).saturating_sub(1);
    text.chars()
        .take(limit)
        .enumerate()
        .filter(|(_, c)| *c == '\n')
        .last()
        .map_or(0, |(idx, _)| idx + 1)
}
