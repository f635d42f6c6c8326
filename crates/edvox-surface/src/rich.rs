#![forbid(unsafe_code)]

//! Rich-text (`contenteditable`) adapter.
//!
//! Unlike the plain adapters, a [`ContentEditable`] seeds its snapshot at
//! construction and rebuilds the shared extractor on every `update()`.
//! Cursor motion is delegated to the host's "modify selection" primitive.
//!
//! # Blank lines
//!
//! A caret on a line made only of a `<br>` has no text of its own, so the
//! generic description would read a neighbouring line. When the caret sits
//! on such a structural blank line [`ContentEditable::should_describe_change`]
//! returns `false` and the adapter announces "blank" instead.

use edvox_core::{ChangeEvent, EditableConfig, EditableCore, LineLookup, Outputs};
use edvox_text::{NodeId, Result, RichTree, SharedExtractor, TextError};
use tracing::{debug, debug_span, trace};

use crate::control::{Direction, Granularity, RichTextHost};
use crate::handler::TextHandler;

const VARIANT: &str = "contenteditable";

/// Line lookup over the shared extractor for one region.
struct RichLines<'a> {
    extractor: &'a SharedExtractor,
    node: NodeId,
    tree: &'a RichTree,
}

impl LineLookup for RichLines<'_> {
    fn line_index(&self, offset: usize) -> Result<usize> {
        let mut extractor = self.extractor.borrow_mut();
        Ok(extractor.extraction(self.node, self.tree).lines().line_index(offset))
    }

    fn line_start(&self, index: usize) -> Result<usize> {
        let mut extractor = self.extractor.borrow_mut();
        Ok(extractor.extraction(self.node, self.tree).lines().line_start(index))
    }

    fn line_end(&self, index: usize) -> Result<usize> {
        let mut extractor = self.extractor.borrow_mut();
        Ok(extractor.extraction(self.node, self.tree).lines().line_end(index))
    }

    /// Line text with no-break spaces normalised to plain spaces.
    fn line_text(&self, _value: &str, index: usize) -> Result<String> {
        let mut extractor = self.extractor.borrow_mut();
        Ok(extractor.extraction(self.node, self.tree).line_text(index))
    }
}

/// Adapter for a rich-text region.
#[derive(Debug)]
pub struct ContentEditable<H: RichTextHost> {
    host: H,
    core: EditableCore,
    extractor: SharedExtractor,
}

impl<H: RichTextHost> ContentEditable<H> {
    /// Bind `host` and seed the snapshot from an extraction pass.
    #[must_use]
    pub fn new(
        host: H,
        extractor: SharedExtractor,
        outputs: Outputs,
        config: EditableConfig,
    ) -> Self {
        let core = EditableCore::new(host.node(), false, true, outputs, config);
        let mut adapter = Self {
            host,
            core,
            extractor,
        };
        if adapter.host.is_attached() {
            let evt = adapter.poll(false);
            adapter.core.seed(&evt);
        }
        adapter
    }

    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Rebuild the extraction and read the selection as flat offsets.
    fn poll(&self, triggered_by_user: bool) -> ChangeEvent {
        let mut extractor = self.extractor.borrow_mut();
        let tree = self.host.tree();
        let extraction = extractor.rebuild(self.host.node(), tree);
        let (start, end) = self.host.selection().map_or((0, 0), |sel| {
            (
                extraction.point_offset(tree, sel.anchor).unwrap_or(0),
                extraction.point_offset(tree, sel.focus).unwrap_or(0),
            )
        });
        ChangeEvent::new(extraction.text(), start, end, triggered_by_user)
    }

    /// Route an event through blank-line suppression and the base policy.
    ///
    /// Events not triggered by the user are dropped without touching the
    /// snapshot.
    pub fn changed(&mut self, evt: &ChangeEvent) {
        if !evt.triggered_by_user() {
            trace!(variant = VARIANT, "change dropped: not user triggered");
            return;
        }
        if !self.should_describe_change(evt) {
            debug!(variant = VARIANT, offset = evt.start(), "caret on blank line");
            self.core.announce_blank(evt.start());
            return;
        }
        let lines = RichLines {
            extractor: &self.extractor,
            node: self.host.node(),
            tree: self.host.tree(),
        };
        self.core.changed(evt, &lines);
    }

    /// False only when the caret rests on a structural blank line: the
    /// cursor did not move by exactly one char, both selections are
    /// collapsed, the live selection is a caret inside an element holding a
    /// `<br>`, and a char can be traversed forward from it.
    ///
    /// A probe that cannot run counts as "describe".
    #[must_use]
    pub fn should_describe_change(&self, evt: &ChangeEvent) -> bool {
        let snapshot = self.core.snapshot();
        if evt.start().abs_diff(snapshot.selection_start()) == 1 {
            return true;
        }
        if !snapshot.is_collapsed() || !evt.is_collapsed() {
            return true;
        }
        let Some(selection) = self.host.selection() else {
            return true;
        };
        if !selection.is_collapsed() {
            return true;
        }
        let tree = self.host.tree();
        let anchor = selection.anchor;
        if !tree.is_element(anchor.node) || !tree.contains_line_break(anchor.node) {
            return true;
        }
        match tree.probe_forward_char(anchor) {
            Ok(found) => !found,
            Err(err) => {
                debug!(variant = VARIANT, error = %err, "forward probe failed");
                true
            }
        }
    }

    fn modify(&mut self, direction: Direction, granularity: Granularity) -> bool {
        if !self.host.is_attached() {
            trace!(variant = VARIANT, ?direction, ?granularity, "move ignored: host detached");
            return false;
        }
        let _span = debug_span!(
            "editable.move",
            variant = VARIANT,
            operation = ?granularity,
            ?direction,
        )
        .entered();
        self.host.modify_selection(direction, granularity);
        self.core.request_recheck();
        true
    }

    fn lines(&self) -> Result<RichLines<'_>> {
        if !self.host.is_attached() {
            return Err(TextError::layout("host detached"));
        }
        Ok(RichLines {
            extractor: &self.extractor,
            node: self.host.node(),
            tree: self.host.tree(),
        })
    }
}

impl<H: RichTextHost> TextHandler for ContentEditable<H> {
    fn update(&mut self, triggered_by_user: bool) {
        if !self.host.is_attached() {
            trace!(variant = VARIANT, "update ignored: host detached");
            return;
        }
        let evt = self.poll(triggered_by_user);
        let _span = debug_span!(
            "editable.update",
            variant = VARIANT,
            triggered_by_user,
            start = evt.start(),
            end = evt.end(),
        )
        .entered();
        self.changed(&evt);
    }

    fn line_index(&self, offset: usize) -> Result<usize> {
        self.lines()?.line_index(offset)
    }

    fn line_start(&self, index: usize) -> Result<usize> {
        self.lines()?.line_start(index)
    }

    fn line_end(&self, index: usize) -> Result<usize> {
        self.lines()?.line_end(index)
    }

    fn move_cursor_to_next_character(&mut self) -> bool {
        self.modify(Direction::Forward, Granularity::Character)
    }

    fn move_cursor_to_previous_character(&mut self) -> bool {
        self.modify(Direction::Backward, Granularity::Character)
    }

    fn move_cursor_to_next_word(&mut self) -> bool {
        self.modify(Direction::Forward, Granularity::Word)
    }

    fn move_cursor_to_previous_word(&mut self) -> bool {
        self.modify(Direction::Backward, Granularity::Word)
    }

    fn move_cursor_to_next_line(&mut self) -> bool {
        self.modify(Direction::Forward, Granularity::Line)
    }

    fn move_cursor_to_previous_line(&mut self) -> bool {
        self.modify(Direction::Backward, Granularity::Line)
    }

    fn move_cursor_to_next_paragraph(&mut self) -> bool {
        self.modify(Direction::Forward, Granularity::Paragraph)
    }

    fn move_cursor_to_previous_paragraph(&mut self) -> bool {
        self.modify(Direction::Backward, Granularity::Paragraph)
    }

    fn core(&self) -> &EditableCore {
        &self.core
    }
}
