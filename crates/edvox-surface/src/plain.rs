#![forbid(unsafe_code)]

//! Offset-based cursor motion shared by the input and text-area adapters.

use edvox_core::EditableCore;
use edvox_text::word;
use tracing::{debug_span, trace};

use crate::control::TextControl;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Motion {
    NextCharacter,
    PreviousCharacter,
    NextWord,
    PreviousWord,
    NextParagraph,
    PreviousParagraph,
}

impl Motion {
    pub(crate) const fn operation(self) -> &'static str {
        match self {
            Self::NextCharacter => "next_character",
            Self::PreviousCharacter => "previous_character",
            Self::NextWord => "next_word",
            Self::PreviousWord => "previous_word",
            Self::NextParagraph => "next_paragraph",
            Self::PreviousParagraph => "previous_paragraph",
        }
    }

    /// Collapsed cursor target. Forward motions start from the selection
    /// end, backward motions from its start.
    fn target(self, value: &str, start: usize, end: usize) -> usize {
        match self {
            Self::NextCharacter => end + 1,
            Self::PreviousCharacter => start.saturating_sub(1),
            Self::NextWord => word::next_word_offset(value, end),
            Self::PreviousWord => word::previous_word_offset(value, start),
            Self::NextParagraph => word::next_paragraph_offset(value, end),
            Self::PreviousParagraph => word::previous_paragraph_offset(value, start),
        }
    }
}

/// Collapse the selection at the motion's target and request a re-poll.
pub(crate) fn apply<C: TextControl>(
    control: &mut C,
    core: &EditableCore,
    variant: &'static str,
    motion: Motion,
) -> bool {
    if !control.is_attached() {
        trace!(variant, operation = motion.operation(), "move ignored: control detached");
        return false;
    }
    let value = control.value();
    let target = motion.target(&value, control.selection_start(), control.selection_end());
    collapse_to(control, core, variant, motion.operation(), target);
    true
}

/// Place a collapsed cursor at `target` and request a re-poll.
pub(crate) fn collapse_to<C: TextControl>(
    control: &mut C,
    core: &EditableCore,
    variant: &'static str,
    operation: &'static str,
    target: usize,
) {
    let _span = debug_span!(
        "editable.move",
        variant,
        operation,
        cursor_position = target,
    )
    .entered();
    control.set_selection(target, target);
    core.request_recheck();
}
