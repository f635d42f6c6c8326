#![forbid(unsafe_code)]

//! The capability set shared by every surface adapter.

use edvox_core::EditableCore;
use edvox_text::Result;

/// An editable surface as seen by the event watcher.
///
/// Cursor moves return `false` when the control is detached or the move
/// cannot happen (first/last line). Every successful move asks the watcher
/// to poll again through the core's re-check sink.
pub trait TextHandler {
    /// Poll the control and describe what changed since the last poll.
    fn update(&mut self, triggered_by_user: bool);

    /// Index of the line containing `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`edvox_text::TextError::LayoutUnavailable`] when no line
    /// information can be produced.
    fn line_index(&self, offset: usize) -> Result<usize>;

    /// Start offset of line `index`.
    ///
    /// # Errors
    ///
    /// As for [`Self::line_index`].
    fn line_start(&self, index: usize) -> Result<usize>;

    /// End offset (exclusive) of line `index`.
    ///
    /// # Errors
    ///
    /// As for [`Self::line_index`].
    fn line_end(&self, index: usize) -> Result<usize>;

    fn move_cursor_to_next_character(&mut self) -> bool;
    fn move_cursor_to_previous_character(&mut self) -> bool;
    fn move_cursor_to_next_word(&mut self) -> bool;
    fn move_cursor_to_previous_word(&mut self) -> bool;
    fn move_cursor_to_next_line(&mut self) -> bool;
    fn move_cursor_to_previous_line(&mut self) -> bool;
    fn move_cursor_to_next_paragraph(&mut self) -> bool;
    fn move_cursor_to_previous_paragraph(&mut self) -> bool;

    /// Snapshot and describe policy behind this surface.
    fn core(&self) -> &EditableCore;
}
