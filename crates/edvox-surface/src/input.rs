#![forbid(unsafe_code)]

//! Single-line input adapter.
//!
//! Some input types (`email`, `number`, ...) hide their selection offsets.
//! While an [`HtmlInput`] is alive such a control is switched to `text`;
//! the original type comes back exactly once, on [`HtmlInput::teardown`] or
//! on drop, whichever happens first.

use edvox_core::{ChangeEvent, EditableConfig, EditableCore, LineLookup, Outputs, SingleLine};
use edvox_text::Result;
use tracing::{debug, debug_span, trace};

use crate::control::{InputType, TextControl};
use crate::handler::TextHandler;
use crate::plain::{self, Motion};

const VARIANT: &str = "input";

/// Adapter for a single-line (or password) input.
#[derive(Debug)]
pub struct HtmlInput<C: TextControl> {
    control: C,
    core: EditableCore,
    restore_type: Option<InputType>,
}

impl<C: TextControl> HtmlInput<C> {
    /// Bind `control`, coercing its type to `text` if needed.
    #[must_use]
    pub fn new(mut control: C, outputs: Outputs, config: EditableConfig) -> Self {
        let input_type = control.input_type();
        let is_password = input_type.is_password();
        let restore_type = if input_type.supports_selection() {
            None
        } else {
            debug!(
                node = control.node().get(),
                input_type = input_type.as_str(),
                "coercing input type to text"
            );
            control.set_input_type(InputType::Text);
            Some(input_type)
        };
        let core = EditableCore::new(
            control.node(),
            is_password,
            false,
            outputs,
            config,
        );
        Self {
            control,
            core,
            restore_type,
        }
    }

    #[must_use]
    pub const fn control(&self) -> &C {
        &self.control
    }

    pub fn control_mut(&mut self) -> &mut C {
        &mut self.control
    }

    /// Restore a coerced input type. Later calls do nothing.
    pub fn teardown(&mut self) {
        if let Some(input_type) = self.restore_type.take() {
            debug!(
                node = self.control.node().get(),
                input_type = input_type.as_str(),
                "restoring input type"
            );
            self.control.set_input_type(input_type);
        }
    }
}

impl<C: TextControl> Drop for HtmlInput<C> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<C: TextControl> TextHandler for HtmlInput<C> {
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
        self.core.changed(&evt, &SingleLine::new(evt.value()));
    }

    fn line_index(&self, offset: usize) -> Result<usize> {
        SingleLine::new(&self.control.value()).line_index(offset)
    }

    fn line_start(&self, index: usize) -> Result<usize> {
        SingleLine::new(&self.control.value()).line_start(index)
    }

    fn line_end(&self, index: usize) -> Result<usize> {
        SingleLine::new(&self.control.value()).line_end(index)
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

    /// A single-line input has one line; there is nowhere to go.
    fn move_cursor_to_next_line(&mut self) -> bool {
        false
    }

    fn move_cursor_to_previous_line(&mut self) -> bool {
        false
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
