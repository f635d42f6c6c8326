#![forbid(unsafe_code)]

//! Outbound boundaries: speech, braille, focus, and re-poll.
//!
//! The core never talks to a synthesizer, a braille display, or the UI
//! directly. Adapters receive an [`Outputs`] bundle at construction and the
//! core routes every request through it.

use std::fmt;
use std::rc::Rc;

use edvox_text::NodeId;

/// Voice treatment for an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Personality {
    #[default]
    Normal,
    /// Text that was removed from the control.
    Deleted,
    /// Status phrases such as "selected" or "blank".
    Annotation,
}

/// Speech synthesis boundary.
pub trait SpeechOutput {
    fn speak(&self, text: &str, triggered_by_user: bool, personality: Personality);
}

/// One line handed to the braille display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrailleLine {
    /// Line text with no trailing newline.
    pub text: String,
    /// Selection start relative to the line.
    pub cursor_start: usize,
    /// Selection end relative to the line, at most the line length.
    pub cursor_end: usize,
    pub multiline: bool,
    /// Control the line came from, when known.
    pub source: Option<NodeId>,
    /// Flat offset of the first char of the line.
    pub line_start: usize,
}

/// Braille display boundary.
pub trait BrailleOutput {
    fn project(&self, line: &BrailleLine);
}

/// Answers whether a control currently holds focus.
pub trait FocusQuery {
    fn is_focused(&self, node: NodeId) -> bool;
}

/// Receives "the text may have changed, poll again" signals.
pub trait RecheckSink {
    fn request_recheck(&self, triggered_by_user: bool);
}

/// Output handles shared by a surface and its core.
#[derive(Clone)]
pub struct Outputs {
    pub speech: Rc<dyn SpeechOutput>,
    pub braille: Option<Rc<dyn BrailleOutput>>,
    pub focus: Rc<dyn FocusQuery>,
    pub recheck: Rc<dyn RecheckSink>,
}

impl Outputs {
    /// Bundle outputs without a braille display.
    #[must_use]
    pub fn new(
        speech: Rc<dyn SpeechOutput>,
        focus: Rc<dyn FocusQuery>,
        recheck: Rc<dyn RecheckSink>,
    ) -> Self {
        Self {
            speech,
            braille: None,
            focus,
            recheck,
        }
    }

    /// Attach a braille display.
    #[must_use]
    pub fn with_braille(mut self, braille: Rc<dyn BrailleOutput>) -> Self {
        self.braille = Some(braille);
        self
    }
}

impl fmt::Debug for Outputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Outputs")
            .field("braille", &self.braille.is_some())
            .finish_non_exhaustive()
    }
}
