#![forbid(unsafe_code)]

//! Rich-text trees.
//!
//! A [`RichTree`] is an arena holding the subtree of an editable rich-text
//! region: element nodes with a tag name and ordered children, and text
//! leaves. Selection endpoints are [`DomPoint`]s: a node plus an offset that
//! counts chars inside a text node or children inside an element.

use crate::error::{Result, TextError};
use crate::offsets::char_len;

/// Index of a node inside a [`RichTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RichNodeId(pub usize);

/// Element or text content of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RichNodeKind {
    Element { tag: String },
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RichNode {
    kind: RichNodeKind,
    parent: Option<RichNodeId>,
    children: Vec<RichNodeId>,
}

/// Tags that start a new line of their own.
const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "dd",
    "div",
    "dl",
    "dt",
    "figure",
    "footer",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "tr",
    "ul",
];

/// An arena-allocated rich-text subtree rooted at node 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichTree {
    nodes: Vec<RichNode>,
}

/// A selection endpoint: a node and an offset within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomPoint {
    pub node: RichNodeId,
    pub offset: usize,
}

impl DomPoint {
    #[must_use]
    pub const fn new(node: RichNodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

impl RichTree {
    /// Create a tree whose root is an element with the given tag.
    #[must_use]
    pub fn new(root_tag: &str) -> Self {
        Self {
            nodes: vec![RichNode {
                kind: RichNodeKind::Element {
                    tag: root_tag.to_ascii_lowercase(),
                },
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The root element.
    #[must_use]
    pub const fn root(&self) -> RichNodeId {
        RichNodeId(0)
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree holds at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append an element child to `parent`.
    pub fn push_element(&mut self, parent: RichNodeId, tag: &str) -> RichNodeId {
        self.push(
            parent,
            RichNodeKind::Element {
                tag: tag.to_ascii_lowercase(),
            },
        )
    }

    /// Append a text child to `parent`.
    pub fn push_text(&mut self, parent: RichNodeId, text: &str) -> RichNodeId {
        self.push(parent, RichNodeKind::Text(text.to_owned()))
    }

    /// Replace the content of a text node. Elements are left untouched.
    pub fn set_text(&mut self, node: RichNodeId, text: &str) {
        if let Some(RichNode {
            kind: RichNodeKind::Text(content),
            ..
        }) = self.nodes.get_mut(node.0)
        {
            text.clone_into(content);
        }
    }

    fn push(&mut self, parent: RichNodeId, kind: RichNodeKind) -> RichNodeId {
        let id = RichNodeId(self.nodes.len());
        let parent = if parent.0 < self.nodes.len() {
            parent
        } else {
            self.root()
        };
        self.nodes.push(RichNode {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Node content, if the node exists.
    #[must_use]
    pub fn kind(&self, node: RichNodeId) -> Option<&RichNodeKind> {
        self.nodes.get(node.0).map(|n| &n.kind)
    }

    /// Children of a node (empty for text nodes and unknown ids).
    #[must_use]
    pub fn children(&self, node: RichNodeId) -> &[RichNodeId] {
        self.nodes.get(node.0).map_or(&[], |n| n.children.as_slice())
    }

    /// Parent of a node.
    #[must_use]
    pub fn parent(&self, node: RichNodeId) -> Option<RichNodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    /// Tag name of an element node.
    #[must_use]
    pub fn tag(&self, node: RichNodeId) -> Option<&str> {
        match self.kind(node)? {
            RichNodeKind::Element { tag } => Some(tag),
            RichNodeKind::Text(_) => None,
        }
    }

    /// Content of a text node.
    #[must_use]
    pub fn text(&self, node: RichNodeId) -> Option<&str> {
        match self.kind(node)? {
            RichNodeKind::Text(text) => Some(text),
            RichNodeKind::Element { .. } => None,
        }
    }

    /// True for element nodes.
    #[must_use]
    pub fn is_element(&self, node: RichNodeId) -> bool {
        self.tag(node).is_some()
    }

    /// True for `<br>` elements.
    #[must_use]
    pub fn is_line_break(&self, node: RichNodeId) -> bool {
        self.tag(node) == Some("br")
    }

    /// True for elements laid out as blocks.
    #[must_use]
    pub fn is_block(&self, node: RichNodeId) -> bool {
        self.tag(node).is_some_and(|tag| BLOCK_TAGS.contains(&tag))
    }

    /// True if any descendant of `node` is a `<br>` element.
    #[must_use]
    pub fn contains_line_break(&self, node: RichNodeId) -> bool {
        self.children(node)
            .iter()
            .any(|&child| self.is_line_break(child) || self.contains_line_break(child))
    }

    /// Maximum valid offset inside a node: chars for text, children for
    /// elements.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::UnknownNode`] if the node is not in the tree.
    pub fn node_length(&self, node: RichNodeId) -> Result<usize> {
        match self.kind(node) {
            Some(RichNodeKind::Text(text)) => Ok(char_len(text)),
            Some(RichNodeKind::Element { .. }) => Ok(self.children(node).len()),
            None => Err(TextError::UnknownNode { node: node.0 }),
        }
    }

    /// Check that a point names an existing node and an in-range offset.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::UnknownNode`] or [`TextError::OffsetOutOfRange`].
    pub fn validate_point(&self, point: DomPoint) -> Result<()> {
        let len = self.node_length(point.node)?;
        if point.offset > len {
            return Err(TextError::OffsetOutOfRange {
                node: point.node.0,
                offset: point.offset,
                len,
            });
        }
        Ok(())
    }

    /// Next node in document order after `node`'s subtree, within the tree.
    fn next_after_subtree(&self, mut node: RichNodeId) -> Option<RichNodeId> {
        loop {
            let parent = self.parent(node)?;
            let siblings = self.children(parent);
            let pos = siblings.iter().position(|&c| c == node)?;
            if let Some(&next) = siblings.get(pos + 1) {
                return Some(next);
            }
            node = parent;
        }
    }

    /// True if any text node at or after `node` (in document order,
    /// including its subtree) has content.
    fn has_text_from(&self, start: RichNodeId) -> bool {
        let mut cursor = Some(start);
        while let Some(node) = cursor {
            if self.text(node).is_some_and(|t| !t.is_empty()) {
                return true;
            }
            cursor = self
                .children(node)
                .first()
                .copied()
                .or_else(|| self.next_after_subtree(node));
        }
        false
    }

    /// Probe whether a character can be traversed forward from `point`.
    ///
    /// Walks the tree in document order from the point and reports whether
    /// any text follows it.
    ///
    /// # Errors
    ///
    /// Returns an error if `point` does not name a valid position.
    pub fn probe_forward_char(&self, point: DomPoint) -> Result<bool> {
        self.validate_point(point)?;
        if let Some(text) = self.text(point.node) {
            if point.offset < char_len(text) {
                return Ok(true);
            }
            return Ok(self
                .next_after_subtree(point.node)
                .is_some_and(|next| self.has_text_from(next)));
        }
        let children = self.children(point.node);
        if let Some(&child) = children.get(point.offset) {
            return Ok(self.has_text_from(child));
        }
        Ok(self
            .next_after_subtree(point.node)
            .is_some_and(|next| self.has_text_from(next)))
    }
}

impl Default for RichTree {
    fn default() -> Self {
        Self::new("div")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_line_tree() -> (RichTree, RichNodeId) {
        // <div><div>a</div><div><br></div><div>b</div></div>
        let mut tree = RichTree::new("div");
        let root = tree.root();
        let first = tree.push_element(root, "div");
        tree.push_text(first, "a");
        let blank = tree.push_element(root, "DIV");
        tree.push_element(blank, "br");
        let last = tree.push_element(root, "div");
        tree.push_text(last, "b");
        (tree, blank)
    }

    #[test]
    fn tags_are_lowercased() {
        let (tree, blank) = blank_line_tree();
        assert_eq!(tree.tag(blank), Some("div"));
        assert!(tree.is_block(blank));
        assert!(tree.contains_line_break(blank));
        assert!(tree.contains_line_break(tree.root()));
    }

    #[test]
    fn probe_finds_following_text() {
        let (tree, blank) = blank_line_tree();
        assert_eq!(tree.probe_forward_char(DomPoint::new(blank, 0)), Ok(true));
        assert_eq!(tree.probe_forward_char(DomPoint::new(blank, 1)), Ok(true));
    }

    #[test]
    fn probe_at_document_end_fails() {
        let (tree, _) = blank_line_tree();
        let last_text = RichNodeId(tree.len() - 1);
        assert_eq!(tree.probe_forward_char(DomPoint::new(last_text, 0)), Ok(true));
        assert_eq!(tree.probe_forward_char(DomPoint::new(last_text, 1)), Ok(false));
        let root = tree.root();
        assert_eq!(tree.probe_forward_char(DomPoint::new(root, 3)), Ok(false));
    }

    #[test]
    fn probe_rejects_malformed_points() {
        let (tree, blank) = blank_line_tree();
        assert_eq!(
            tree.probe_forward_char(DomPoint::new(RichNodeId(99), 0)),
            Err(TextError::UnknownNode { node: 99 })
        );
        assert!(matches!(
            tree.probe_forward_char(DomPoint::new(blank, 5)),
            Err(TextError::OffsetOutOfRange { .. })
        ));
    }

    #[test]
    fn set_text_only_touches_text_nodes() {
        let mut tree = RichTree::default();
        let root = tree.root();
        let text = tree.push_text(root, "old");
        tree.set_text(text, "new");
        tree.set_text(root, "ignored");
        assert_eq!(tree.text(text), Some("new"));
        assert_eq!(tree.tag(root), Some("div"));
    }
}
