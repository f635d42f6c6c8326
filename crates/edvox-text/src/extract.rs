#![forbid(unsafe_code)]

//! Text and line extraction for rich-text regions.
//!
//! One walk over a [`RichTree`] produces the flattened text, the line
//! table, and the flat offset of every node, so selection endpoints can be
//! mapped to offsets without walking again.
//!
//! Lines begin at `<br>` elements and at block element boundaries. Exactly
//! one `\n` separates consecutive lines; a `<br>` emits its own `\n`, and a
//! block boundary emits one only when the current line already has content.
//! A `<br>` that closes a block is therefore not doubled by the next block.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use crate::line_table::LineTable;
use crate::offsets::{char_len, char_slice, normalize_nbsp};
use crate::rich::{DomPoint, RichNodeId, RichTree};
use crate::NodeId;

/// Shared handle to the extractor used by every rich-text adapter.
pub type SharedExtractor = Rc<RefCell<Extractor>>;

/// Flat view of a rich-text tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    text: String,
    lines: LineTable,
    /// `(start, end)` flat offsets of each node's content, indexed by node.
    spans: Vec<(usize, usize)>,
}

impl Extraction {
    /// Walk `tree` and flatten it.
    #[must_use]
    pub fn from_tree(tree: &RichTree) -> Self {
        let mut walker = Walker {
            tree,
            text: String::new(),
            len: 0,
            breaks: Vec::new(),
            line_has_content: false,
            spans: vec![(0, 0); tree.len()],
        };
        walker.visit(tree.root());
        let lines = LineTable::from_breaks(walker.len, walker.breaks.iter().copied());
        Self {
            text: walker.text,
            lines,
            spans: walker.spans,
        }
    }

    /// Flattened text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Line partition of [`Self::text`].
    #[must_use]
    pub const fn lines(&self) -> &LineTable {
        &self.lines
    }

    /// Text of line `index` with no-break spaces normalised, without its
    /// trailing separator.
    #[must_use]
    pub fn line_text(&self, index: usize) -> String {
        let range = self.lines.line_range(index);
        let raw = char_slice(&self.text, range.start, range.end);
        normalize_nbsp(raw.strip_suffix('\n').unwrap_or(raw))
    }

    /// Flat offset of a selection endpoint.
    ///
    /// Returns `None` for points outside the tree. Offsets inside a node are
    /// clamped to its content.
    #[must_use]
    pub fn point_offset(&self, tree: &RichTree, point: DomPoint) -> Option<usize> {
        let &(start, end) = self.spans.get(point.node.0)?;
        if tree.text(point.node).is_some() {
            return Some((start + point.offset).min(end));
        }
        let children = tree.children(point.node);
        Some(match children.get(point.offset) {
            Some(child) => self.spans.get(child.0).map_or(end, |span| span.0),
            None => end,
        })
    }
}

struct Walker<'a> {
    tree: &'a RichTree,
    text: String,
    len: usize,
    breaks: Vec<usize>,
    line_has_content: bool,
    spans: Vec<(usize, usize)>,
}

impl Walker<'_> {
    fn newline(&mut self) {
        self.text.push('\n');
        self.len += 1;
        self.breaks.push(self.len);
        self.line_has_content = false;
    }

    fn visit(&mut self, node: RichNodeId) {
        if let Some(content) = self.tree.text(node) {
            let start = self.len;
            self.text.push_str(content);
            self.len += char_len(content);
            if !content.is_empty() {
                self.line_has_content = true;
            }
            self.spans[node.0] = (start, self.len);
            return;
        }

        if self.tree.is_line_break(node) {
            let start = self.len;
            self.newline();
            self.spans[node.0] = (start, self.len);
            return;
        }

        let is_block = self.tree.is_block(node) && node != self.tree.root();
        if is_block && self.line_has_content {
            self.newline();
        }
        let start = self.len;
        for &child in self.tree.children(node) {
            self.visit(child);
        }
        self.spans[node.0] = (start, self.len);
        if is_block && self.line_has_content {
            self.newline();
        }
    }
}

/// Cached extraction for the active rich-text region.
///
/// The cache is keyed by node identity and by the content it was built
/// from. Queries for a different node, for a tree that no longer matches,
/// or after [`Extractor::invalidate`], rebuild from the supplied tree.
#[derive(Debug, Default)]
pub struct Extractor {
    node: Option<NodeId>,
    source: RichTree,
    extraction: Extraction,
    current: bool,
    rebuilds: u64,
}

impl Extractor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap the extractor in a shared handle.
    #[must_use]
    pub fn shared(self) -> SharedExtractor {
        Rc::new(RefCell::new(self))
    }

    /// Mark the cached extraction stale.
    pub fn invalidate(&mut self) {
        self.current = false;
    }

    /// Number of extraction passes performed so far.
    #[must_use]
    pub const fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// True if the cache was built for `node` from content equal to `tree`
    /// and not invalidated since.
    #[must_use]
    pub fn is_current_for(&self, node: NodeId, tree: &RichTree) -> bool {
        self.current && self.node == Some(node) && self.source == *tree
    }

    /// Rebuild unconditionally from `tree`.
    pub fn rebuild(&mut self, node: NodeId, tree: &RichTree) -> &Extraction {
        self.extraction = Extraction::from_tree(tree);
        self.source = tree.clone();
        self.node = Some(node);
        self.current = true;
        self.rebuilds += 1;
        trace!(
            node = node.get(),
            lines = self.extraction.lines.line_count(),
            chars = self.extraction.lines.text_len(),
            "extractor rebuilt"
        );
        &self.extraction
    }

    /// Extraction for `node`, rebuilding from `tree` when stale.
    pub fn extraction(&mut self, node: NodeId, tree: &RichTree) -> &Extraction {
        if !self.is_current_for(node, tree) {
            return self.rebuild(node, tree);
        }
        &self.extraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraphs(parts: &[&str]) -> RichTree {
        let mut tree = RichTree::new("div");
        let root = tree.root();
        for part in parts {
            let p = tree.push_element(root, "p");
            if part.is_empty() {
                tree.push_element(p, "br");
            } else {
                tree.push_text(p, part);
            }
        }
        tree
    }

    #[test]
    fn blocks_become_lines() {
        let tree = paragraphs(&["one", "two"]);
        let ex = Extraction::from_tree(&tree);
        assert_eq!(ex.text(), "one\ntwo\n");
        assert_eq!(ex.lines().line_count(), 2);
        assert_eq!(ex.line_text(0), "one");
        assert_eq!(ex.line_text(1), "two");
    }

    #[test]
    fn blank_block_is_its_own_line() {
        let tree = paragraphs(&["a", "", "b"]);
        let ex = Extraction::from_tree(&tree);
        assert_eq!(ex.text(), "a\n\nb\n");
        assert_eq!(ex.lines().ranges().collect::<Vec<_>>(), vec![0..2, 2..3, 3..5]);
        assert_eq!(ex.line_text(1), "");
    }

    #[test]
    fn inline_breaks_split_lines() {
        let mut tree = RichTree::new("div");
        let root = tree.root();
        tree.push_text(root, "x");
        tree.push_element(root, "br");
        let b = tree.push_element(root, "b");
        tree.push_text(b, "y");
        let ex = Extraction::from_tree(&tree);
        assert_eq!(ex.text(), "x\ny");
        assert_eq!(ex.lines().line_range(1), 2..3);
    }

    #[test]
    fn trailing_break_in_block_is_not_doubled() {
        let mut tree = RichTree::new("div");
        let root = tree.root();
        let first = tree.push_element(root, "div");
        tree.push_text(first, "a");
        tree.push_element(first, "br");
        let second = tree.push_element(root, "div");
        tree.push_text(second, "b");
        let ex = Extraction::from_tree(&tree);
        assert_eq!(ex.text(), "a\nb\n");
        assert_eq!(ex.lines().line_count(), 2);
    }

    #[test]
    fn points_map_to_offsets() {
        let tree = paragraphs(&["a", "", "b"]);
        let ex = Extraction::from_tree(&tree);
        // Node 0 root, 1 p, 2 "a", 3 p, 4 br, 5 p, 6 "b".
        assert_eq!(ex.point_offset(&tree, DomPoint::new(RichNodeId(2), 1)), Some(1));
        assert_eq!(ex.point_offset(&tree, DomPoint::new(RichNodeId(3), 0)), Some(2));
        assert_eq!(ex.point_offset(&tree, DomPoint::new(RichNodeId(6), 0)), Some(3));
        assert_eq!(ex.point_offset(&tree, DomPoint::new(RichNodeId(6), 9)), Some(4));
        assert_eq!(ex.point_offset(&tree, DomPoint::new(RichNodeId(40), 0)), None);
    }

    #[test]
    fn nbsp_is_normalised_in_line_text() {
        let tree = paragraphs(&["a\u{a0}b"]);
        let ex = Extraction::from_tree(&tree);
        assert_eq!(ex.text(), "a\u{a0}b\n");
        assert_eq!(ex.line_text(0), "a b");
    }

    #[test]
    fn extractor_rebuilds_per_node() {
        let tree = paragraphs(&["a"]);
        let mut extractor = Extractor::new();
        extractor.extraction(NodeId::new(1), &tree);
        extractor.extraction(NodeId::new(1), &tree);
        assert_eq!(extractor.rebuilds(), 1);
        extractor.extraction(NodeId::new(2), &tree);
        assert_eq!(extractor.rebuilds(), 2);
        extractor.invalidate();
        extractor.extraction(NodeId::new(2), &tree);
        assert_eq!(extractor.rebuilds(), 3);
    }

    #[test]
    fn extractor_rebuilds_when_content_changes() {
        let mut tree = paragraphs(&["one"]);
        let node = NodeId::new(1);
        let mut extractor = Extractor::new();
        assert_eq!(extractor.extraction(node, &tree).lines().line_count(), 1);
        assert!(extractor.is_current_for(node, &tree));

        let p = tree.push_element(tree.root(), "p");
        tree.push_text(p, "two");
        assert!(!extractor.is_current_for(node, &tree));
        let ex = extractor.extraction(node, &tree);
        assert_eq!(ex.text(), "one\ntwo\n");
        assert_eq!(ex.lines().line_index(5), 1);
        assert_eq!(extractor.rebuilds(), 2);

        extractor.extraction(node, &tree);
        assert_eq!(extractor.rebuilds(), 2);
    }
}
