#![forbid(unsafe_code)]

//! Line tables: ordered, gap-free partitions of a text into lines.
//!
//! A [`LineTable`] stores the start offset of every line. Line `i` spans the
//! half-open char range `line_start(i)..line_end(i)`, and `line_end(i)` is
//! always `line_start(i + 1)`, so a trailing `\n` belongs to the line it
//! terminates. The last line ends at the text length. Every query clamps its
//! argument instead of failing.

use std::ops::Range;

use smallvec::SmallVec;

use crate::error::{Result, TextError};

/// Partition of `0..len` into consecutive lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTable {
    starts: SmallVec<[usize; 8]>,
    len: usize,
}

impl LineTable {
    /// A table with a single line covering `0..len`.
    #[must_use]
    pub fn single(len: usize) -> Self {
        Self {
            starts: SmallVec::from_slice(&[0]),
            len,
        }
    }

    /// Build a table from the start offsets of each line after the first.
    ///
    /// Breaks outside `1..len` and duplicates are dropped, so the result is
    /// always a valid partition.
    #[must_use]
    pub fn from_breaks(len: usize, breaks: impl IntoIterator<Item = usize>) -> Self {
        let mut starts: SmallVec<[usize; 8]> = SmallVec::from_slice(&[0]);
        let mut sorted: Vec<usize> = breaks
            .into_iter()
            .filter(|&b| b > 0 && b < len)
            .collect();
        sorted.sort_unstable();
        sorted.dedup();
        starts.extend(sorted);
        Self { starts, len }
    }

    /// Validate ranges reported by a layout engine and build a table.
    ///
    /// The ranges must be ordered, contiguous, and cover `0..len` exactly.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::LayoutUnavailable`] when the ranges leave a gap,
    /// overlap, or do not cover the text.
    pub fn from_ranges(len: usize, ranges: &[Range<usize>]) -> Result<Self> {
        let Some(first) = ranges.first() else {
            return Err(TextError::layout("layout reported no lines"));
        };
        if first.start != 0 {
            return Err(TextError::layout(format!(
                "first line starts at {} instead of 0",
                first.start
            )));
        }
        let mut starts: SmallVec<[usize; 8]> = SmallVec::with_capacity(ranges.len());
        let mut expected = 0;
        for range in ranges {
            if range.start != expected || range.end < range.start {
                return Err(TextError::layout(format!(
                    "line {}..{} does not continue from {expected}",
                    range.start, range.end
                )));
            }
            starts.push(range.start);
            expected = range.end;
        }
        if expected != len {
            return Err(TextError::layout(format!(
                "lines cover 0..{expected} but text has {len} chars"
            )));
        }
        // Zero-width lines in the middle carry no position; fold them away.
        starts.dedup();
        Ok(Self { starts, len })
    }

    /// Number of lines (always at least one).
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Length of the text the table partitions.
    #[inline]
    #[must_use]
    pub const fn text_len(&self) -> usize {
        self.len
    }

    /// Index of the line containing `offset`.
    ///
    /// Offsets at or beyond the end map to the last line.
    #[must_use]
    pub fn line_index(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        }
    }

    /// Start offset of line `index`, clamped to the last line.
    #[must_use]
    pub fn line_start(&self, index: usize) -> usize {
        let index = index.min(self.line_count() - 1);
        self.starts[index]
    }

    /// End offset (exclusive) of line `index`, clamped to the last line.
    #[must_use]
    pub fn line_end(&self, index: usize) -> usize {
        let next = index.saturating_add(1);
        if next >= self.line_count() {
            self.len
        } else {
            self.starts[next]
        }
    }

    /// Char range of line `index`, clamped to the last line.
    #[must_use]
    pub fn line_range(&self, index: usize) -> Range<usize> {
        let index = index.min(self.line_count() - 1);
        self.line_start(index)..self.line_end(index)
    }

    /// Iterate over the ranges of every line.
    pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.line_count()).map(|idx| self.line_range(idx))
    }
}

impl Default for LineTable {
    fn default() -> Self {
        Self::single(0)
    }
}
