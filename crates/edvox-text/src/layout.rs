#![forbid(unsafe_code)]

//! Visual line layout for plain multi-line text.
//!
//! The shadow measurer treats layout as a black box: given the text and the
//! metrics of the live control, a [`LayoutEngine`] reports one half-open
//! char range per visual line, covering the whole string without gaps.
//!
//! [`WrapLayout`] is the built-in engine. It breaks at every `\n` (the
//! newline stays on the line it ends) and soft-wraps at word boundaries by
//! terminal cell width, falling back to grapheme breaks for words wider than
//! the control. Whitespace that triggers a soft wrap stays on the line before
//! the break so the ranges remain contiguous.

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::error::Result;

/// Metrics of the control being mirrored by a shadow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShadowMetrics {
    /// Content width in cells. Zero disables soft wrapping.
    pub columns: usize,
    /// Tab stop width in cells.
    pub tab_width: usize,
}

impl ShadowMetrics {
    /// Metrics for a control `columns` cells wide with 8-cell tab stops.
    #[must_use]
    pub const fn new(columns: usize) -> Self {
        Self {
            columns,
            tab_width: 8,
        }
    }

    /// Metrics with soft wrapping disabled.
    #[must_use]
    pub const fn unwrapped() -> Self {
        Self::new(0)
    }

    /// Set the tab stop width.
    #[must_use]
    pub const fn tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width;
        self
    }
}

/// Reports visual line ranges for a text blob.
pub trait LayoutEngine {
    /// Char ranges of each visual line of `text` laid out with `metrics`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TextError::LayoutUnavailable`] when no line break
    /// information can be produced.
    fn line_ranges(&self, text: &str, metrics: &ShadowMetrics) -> Result<Vec<Range<usize>>>;
}

/// Cell-width word wrapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct WrapLayout;

impl LayoutEngine for WrapLayout {
    fn line_ranges(&self, text: &str, metrics: &ShadowMetrics) -> Result<Vec<Range<usize>>> {
        let mut lines = Vec::new();
        let mut offset = 0;
        for paragraph in text.split_inclusive('\n') {
            let len = paragraph.chars().count();
            wrap_paragraph(paragraph, offset, metrics, &mut lines);
            offset += len;
        }
        // A trailing newline (or empty text) opens one more, empty line.
        if text.is_empty() || text.ends_with('\n') {
            lines.push(offset..offset);
        }
        Ok(lines)
    }
}

#[derive(Debug)]
struct Segment {
    start: usize,
    end: usize,
    width: usize,
    is_space: bool,
}

/// Width of a grapheme in cells, with tabs expanded from `col`.
fn grapheme_cells(g: &str, col: usize, metrics: &ShadowMetrics) -> usize {
    if g == "\t" {
        let tab = metrics.tab_width.max(1);
        return tab - (col % tab);
    }
    if g == "\n" || g == "\r\n" {
        return 0;
    }
    g.width()
}

/// Split into alternating word and whitespace segments (char offsets).
fn segments(paragraph: &str, base: usize) -> Vec<Segment> {
    let mut out: Vec<Segment> = Vec::new();
    let mut offset = base;
    for g in paragraph.graphemes(true) {
        let chars = g.chars().count();
        let is_space = g.chars().all(char::is_whitespace);
        match out.last_mut() {
            Some(seg) if seg.is_space == is_space => seg.end += chars,
            _ => out.push(Segment {
                start: offset,
                end: offset + chars,
                width: 0,
                is_space,
            }),
        }
        offset += chars;
    }
    out
}

fn wrap_paragraph(
    paragraph: &str,
    base: usize,
    metrics: &ShadowMetrics,
    lines: &mut Vec<Range<usize>>,
) {
    let total = paragraph.chars().count();
    if metrics.columns == 0 {
        lines.push(base..base + total);
        return;
    }

    let mut line_start = base;
    let mut col = 0usize;
    for mut seg in segments(paragraph, base) {
        let text = slice_chars(paragraph, seg.start - base, seg.end - base);
        seg.width = text
            .graphemes(true)
            .fold(0, |acc, g| acc + grapheme_cells(g, col + acc, metrics));

        if seg.is_space {
            // Trailing whitespace hangs past the edge instead of wrapping.
            col += seg.width;
            continue;
        }

        if col + seg.width <= metrics.columns {
            col += seg.width;
            continue;
        }

        if seg.start > line_start && col > 0 {
            lines.push(line_start..seg.start);
            line_start = seg.start;
            col = 0;
        }

        if seg.width <= metrics.columns {
            col = seg.width;
            continue;
        }

        // Word wider than the control: break between graphemes.
        let mut offset = seg.start;
        for g in text.graphemes(true) {
            let w = grapheme_cells(g, col, metrics);
            if col + w > metrics.columns && col > 0 {
                lines.push(line_start..offset);
                line_start = offset;
                col = 0;
            }
            col += w;
            offset += g.chars().count();
        }
    }
    lines.push(line_start..base + total);
}

fn slice_chars(text: &str, start: usize, end: usize) -> &str {
    crate::offsets::char_slice(text, start, end)
}
