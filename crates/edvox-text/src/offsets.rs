#![forbid(unsafe_code)]

//! Character-offset helpers.
//!
//! Every offset in edvox counts Unicode scalar values (chars), never bytes.
//! These helpers convert between the two and slice strings safely, clamping
//! out-of-range offsets instead of panicking.

/// No-break space, produced by rich-text rendering for collapsed whitespace.
pub const NBSP: char = '\u{00A0}';

/// Number of chars in `text`.
#[inline]
#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte index of the char at `offset`, clamped to `text.len()`.
#[must_use]
pub fn byte_index(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map_or(text.len(), |(idx, _)| idx)
}

/// Char offset of the byte index `byte_idx`.
///
/// Byte indices inside a multi-byte char round up to the following char.
#[must_use]
pub fn char_offset(text: &str, byte_idx: usize) -> usize {
    text.char_indices()
        .take_while(|(idx, _)| *idx < byte_idx)
        .count()
}

/// Slice `text` between two char offsets. Both ends are clamped and
/// reordered if needed.
#[must_use]
pub fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let (start, end) = if start <= end {
        (start, end)
    } else {
        (end, start)
    };
    let from = byte_index(text, start);
    let to = byte_index(text, end);
    &text[from..to]
}

/// The char at `offset`, if any.
#[must_use]
pub fn char_at(text: &str, offset: usize) -> Option<char> {
    text.chars().nth(offset)
}

/// Replace every no-break space with a plain space.
#[must_use]
pub fn normalize_nbsp(text: &str) -> String {
    text.replace(NBSP, " ")
}

/// Length in chars of the longest common prefix of `a` and `b`.
#[must_use]
pub fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}

/// Length in chars of the longest common suffix of `a` and `b`, never
/// overlapping a prefix of length `prefix`.
#[must_use]
pub fn common_suffix_len(a: &str, b: &str, prefix: usize) -> usize {
    let max = char_len(a).min(char_len(b)).saturating_sub(prefix);
    a.chars()
        .rev()
        .zip(b.chars().rev())
        .take(max)
        .take_while(|(x, y)| x == y)
        .count()
}
