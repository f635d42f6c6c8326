#![forbid(unsafe_code)]

//! Multi-line plain text adapter.
//!
//! Line questions go to the shared shadow measurer. The measurer is keyed by
//! node, text, and metrics, so a [`TextArea`] never sees lines measured for
//! another control; `update()` additionally marks it stale whenever the
//! polled text differs from the snapshot.

use edvox_core::{ChangeEvent, EditableConfig, EditableCore, LineLookup, Outputs};
use edvox_text::{NodeId, Result, ShadowMetrics, SharedShadow, TextError};
use tracing::{debug_span, trace, warn};

use crate::control::TextControl;
use crate::handler::TextHandler;
use crate::plain::{self, Motion};

const VARIANT: &str = "textarea";

/// Line lookup over the shared shadow for one control's text.
struct ShadowLines<'a> {
    shadow: &'a SharedShadow,
    node: NodeId,
    text: &'a str,
    metrics: ShadowMetrics,
}

impl ShadowLines<'_> {
    fn line_count(&self) -> Result<usize> {
        let mut shadow = self.shadow.borrow_mut();
        Ok(shadow.lines(self.node, self.text, &self.metrics)?.line_count())
    }
}

impl LineLookup for ShadowLines<'_> {
    fn line_index(&self, offset: usize) -> Result<usize> {
        self.shadow
            .borrow_mut()
            .line_index(self.node, self.text, &self.metrics, offset)
    }

    fn line_start(&self, index: usize) -> Result<usize> {
        self.shadow
            .borrow_mut()
            .line_start(self.node, self.text, &self.metrics, index)
    }

    fn line_end(&self, index: usize) -> Result<usize> {
        self.shadow
            .borrow_mut()
            .line_end(self.node, self.text, &self.metrics, index)
    }
}

/// Adapter for a `<textarea>`-like control.
#[derive(Debug)]
pub struct TextArea<C: TextControl> {
    control: C,
    core: EditableCore,
    shadow: SharedShadow,
}

impl<C: TextControl> TextArea<C> {
    #[must_use]
    pub fn new(control: C, shadow: SharedShadow, outputs: Outputs, config: EditableConfig) -> Self {
        let core = EditableCore::new(control.node(), false, true, outputs, config);
        Self {
            control,
            core,
            shadow,
        }
    }

    #[must_use]
    pub const fn control(&self) -> &C {
        &self.control
    }

    pub fn control_mut(&mut self) -> &mut C {
        &mut self.control
    }

    /// Run `f` against the shadow lines of `text`.
    fn with_lines<T>(
        &self,
        text: &str,
        f: impl FnOnce(&ShadowLines<'_>) -> Result<T>,
    ) -> Result<T> {
        if !self.control.is_attached() {
            return Err(TextError::layout("control detached"));
        }
        let lines = ShadowLines {
            shadow: &self.shadow,
            node: self.control.node(),
            text,
            metrics: self.control.metrics(),
        };
        f(&lines)
    }

    /// Cursor target on the adjacent line with the column preserved, or
    /// `None` on the first/last line.
    fn line_target(&self, forward: bool) -> Result<Option<usize>> {
        let value = self.control.value();
        let cursor = if forward {
            self.control.selection_end()
        } else {
            self.control.selection_start()
        };
        self.with_lines(&value, |lines| {
            let line = lines.line_index(cursor)?;
            let count = lines.line_count()?;
            let target = match (forward, line) {
                (true, line) if line + 1 < count => line + 1,
                (false, line) if line > 0 => line - 1,
                _ => return Ok(None),
            };
            let column = cursor.saturating_sub(lines.line_start(line)?);
            let start = lines.line_start(target)?;
            let end = lines.line_end(target)?;
            // The end offset of a non-final line is the next line's start.
            let visible = if target + 1 < count {
                (end - start).saturating_sub(1)
            } else {
                end - start
            };
            Ok(Some(start + column.min(visible)))
        })
    }

    fn move_by_line(&mut self, forward: bool) -> bool {
        let operation = if forward { "next_line" } else { "previous_line" };
        if !self.control.is_attached() {
            trace!(variant = VARIANT, operation, "move ignored: control detached");
            return false;
        }
        match self.line_target(forward) {
            Ok(Some(target)) => {
                plain::collapse_to(&mut self.control, &self.core, VARIANT, operation, target);
                true
            }
            Ok(None) => false,
            Err(err) => {
                warn!(
                    variant = VARIANT,
                    operation,
                    error = %err,
                    "line move skipped: no line information"
                );
                false
            }
        }
    }
}

impl<C: TextControl> TextHandler for TextArea<C> {
    fn update(&mut self, triggered_by_user: bool) {
        if !self.control.is_attached() {
            trace!(variant = VARIANT, "update ignored: control detached");
            return;
        }
        let evt = ChangeEvent::new(
            self.control.value(),
            self.control.selection_start(),
            self.control.selection_end(),
            triggered_by_user,
        );
        let _span = debug_span!(
            "editable.update",
            variant = VARIANT,
            triggered_by_user,
            start = evt.start(),
            end = evt.end(),
        )
        .entered();
        if evt.value() != self.core.snapshot().text() {
            self.shadow.borrow_mut().invalidate();
        }
        let lines = ShadowLines {
            shadow: &self.shadow,
            node: self.control.node(),
            text: evt.value(),
            metrics: self.control.metrics(),
        };
        self.core.changed(&evt, &lines);
    }

    fn line_index(&self, offset: usize) -> Result<usize> {
        self.with_lines(&self.control.value(), |lines| lines.line_index(offset))
    }

    fn line_start(&self, index: usize) -> Result<usize> {
        self.with_lines(&self.control.value(), |lines| lines.line_start(index))
    }

    fn line_end(&self, index: usize) -> Result<usize> {
        self.with_lines(&self.control.value(), |lines| lines.line_end(index))
    }

    fn move_cursor_to_next_character(&mut self) -> bool {
        plain::apply(&mut self.control, &self.core, VARIANT, Motion::NextCharacter)
    }

    fn move_cursor_to_previous_character(&mut self) -> bool {
        plain::apply(&mut self.control, &self.core, VARIANT, Motion::PreviousCharacter)
    }

    fn move_cursor_to_next_word(&mut self) -> bool {
        plain::apply(&mut self.control, &self.core, VARIANT, Motion::NextWord)
    }

    fn move_cursor_to_previous_word(&mut self) -> bool {
        plain::apply(&mut self.control, &self.core, VARIANT, Motion::PreviousWord)
    }

    fn move_cursor_to_next_line(&mut self) -> bool {
        self.move_by_line(true)
    }

    fn move_cursor_to_previous_line(&mut self) -> bool {
        self.move_by_line(false)
    }

    fn move_cursor_to_next_paragraph(&mut self) -> bool {
        plain::apply(&mut self.control, &self.core, VARIANT, Motion::NextParagraph)
    }

    fn move_cursor_to_previous_paragraph(&mut self) -> bool {
        plain::apply(&mut self.control, &self.core, VARIANT, Motion::PreviousParagraph)
    }

    fn core(&self) -> &EditableCore {
        &self.core
    }
}
