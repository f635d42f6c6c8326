#![forbid(unsafe_code)]

//! Line access used by the describe policy.

use edvox_text::offsets::{char_len, char_slice};
use edvox_text::{LineTable, Result};

/// Maps offsets of the live text to lines.
///
/// Implementations clamp out-of-range arguments. An `Err` means no line
/// information is available at all; callers log and skip the step that
/// needed it.
pub trait LineLookup {
    /// Index of the line containing `offset`.
    fn line_index(&self, offset: usize) -> Result<usize>;

    /// Start offset of line `index`.
    fn line_start(&self, index: usize) -> Result<usize>;

    /// End offset (exclusive) of line `index`.
    fn line_end(&self, index: usize) -> Result<usize>;

    /// Presentable text of line `index` of `value`, without its trailing
    /// newline.
    fn line_text(&self, value: &str, index: usize) -> Result<String> {
        let start = self.line_start(index)?;
        let end = self.line_end(index)?;
        let raw = char_slice(value, start, end);
        Ok(raw.strip_suffix('\n').unwrap_or(raw).to_owned())
    }
}

/// A value treated as one line, as in a single-line input.
#[derive(Debug, Clone, Copy)]
pub struct SingleLine<'a> {
    value: &'a str,
}

impl<'a> SingleLine<'a> {
    #[must_use]
    pub const fn new(value: &'a str) -> Self {
        Self { value }
    }
}

impl LineLookup for SingleLine<'_> {
    fn line_index(&self, _offset: usize) -> Result<usize> {
        Ok(0)
    }

    fn line_start(&self, _index: usize) -> Result<usize> {
        Ok(0)
    }

    fn line_end(&self, _index: usize) -> Result<usize> {
        Ok(char_len(self.value))
    }

    fn line_text(&self, value: &str, _index: usize) -> Result<String> {
        Ok(value.to_owned())
    }
}

impl LineLookup for LineTable {
    fn line_index(&self, offset: usize) -> Result<usize> {
        Ok(LineTable::line_index(self, offset))
    }

    fn line_start(&self, index: usize) -> Result<usize> {
        Ok(LineTable::line_start(self, index))
    }

    fn line_end(&self, index: usize) -> Result<usize> {
        Ok(LineTable::line_end(self, index))
    }
}
