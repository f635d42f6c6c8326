#![forbid(unsafe_code)]

//! Test doubles for adapters: fake controls and recording outputs.
//!
//! Available with the `test-helpers` feature.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use edvox_core::{
    BrailleLine, BrailleOutput, FocusQuery, Outputs, Personality, RecheckSink, SpeechOutput,
};
use edvox_text::offsets::{char_len, char_slice};
use edvox_text::{NodeId, RichTree, ShadowMetrics};

use crate::control::{Direction, Granularity, InputType, RichSelection, RichTextHost, TextControl};

#[derive(Debug)]
struct ControlState {
    node: NodeId,
    value: String,
    start: usize,
    end: usize,
    input_type: InputType,
    type_changes: Vec<InputType>,
    attached: bool,
    metrics: ShadowMetrics,
}

/// An in-memory input or text area.
///
/// Clones share state, so a test can keep a handle after moving the control
/// into an adapter. Selections are clamped the way browsers clamp them.
#[derive(Debug, Clone)]
pub struct FakeTextControl {
    state: Rc<RefCell<ControlState>>,
}

impl FakeTextControl {
    /// A text control holding `value` with the cursor at the end.
    #[must_use]
    pub fn new(node: u64, value: &str) -> Self {
        let len = char_len(value);
        Self {
            state: Rc::new(RefCell::new(ControlState {
                node: NodeId::new(node),
                value: value.to_owned(),
                start: len,
                end: len,
                input_type: InputType::Text,
                type_changes: Vec::new(),
                attached: true,
                metrics: ShadowMetrics::unwrapped(),
            })),
        }
    }

    #[must_use]
    pub fn with_type(self, input_type: InputType) -> Self {
        self.state.borrow_mut().input_type = input_type;
        self
    }

    #[must_use]
    pub fn with_metrics(self, metrics: ShadowMetrics) -> Self {
        self.state.borrow_mut().metrics = metrics;
        self
    }

    /// Replace the value, clamping the selection to it.
    pub fn set_value(&self, value: &str) {
        let mut state = self.state.borrow_mut();
        value.clone_into(&mut state.value);
        let (start, end) = (state.start, state.end);
        drop(state);
        self.select(start, end);
    }

    /// Set the selection as script would.
    pub fn select(&self, start: usize, end: usize) {
        let mut state = self.state.borrow_mut();
        let len = char_len(&state.value);
        let end = end.min(len);
        state.start = start.min(end);
        state.end = end;
    }

    /// Type the text as a user would, replacing the selection.
    pub fn type_text(&self, text: &str) {
        let (value, start, end) = {
            let state = self.state.borrow();
            (state.value.clone(), state.start, state.end)
        };
        let typed = format!(
            "{}{text}{}",
            char_slice(&value, 0, start),
            char_slice(&value, end, char_len(&value))
        );
        let cursor = start + char_len(text);
        self.set_value(&typed);
        self.select(cursor, cursor);
    }

    pub fn detach(&self) {
        self.state.borrow_mut().attached = false;
    }

    #[must_use]
    pub fn selection(&self) -> (usize, usize) {
        let state = self.state.borrow();
        (state.start, state.end)
    }

    #[must_use]
    pub fn current_type(&self) -> InputType {
        self.state.borrow().input_type.clone()
    }

    /// Every type written through [`TextControl::set_input_type`].
    #[must_use]
    pub fn type_changes(&self) -> Vec<InputType> {
        self.state.borrow().type_changes.clone()
    }
}

impl TextControl for FakeTextControl {
    fn node(&self) -> NodeId {
        self.state.borrow().node
    }

    fn is_attached(&self) -> bool {
        self.state.borrow().attached
    }

    fn value(&self) -> String {
        self.state.borrow().value.clone()
    }

    fn selection_start(&self) -> usize {
        self.state.borrow().start
    }

    fn selection_end(&self) -> usize {
        self.state.borrow().end
    }

    fn set_selection(&mut self, start: usize, end: usize) {
        self.select(start, end);
    }

    fn input_type(&self) -> InputType {
        self.state.borrow().input_type.clone()
    }

    fn set_input_type(&mut self, input_type: InputType) {
        let mut state = self.state.borrow_mut();
        state.type_changes.push(input_type.clone());
        state.input_type = input_type;
    }

    fn metrics(&self) -> ShadowMetrics {
        self.state.borrow().metrics
    }
}

/// An in-memory rich-text region.
///
/// `modify_selection` only records its arguments; tests move the caret
/// explicitly with [`FakeRichHost::set_selection`].
#[derive(Debug, Clone)]
pub struct FakeRichHost {
    node: NodeId,
    tree: RichTree,
    selection: Option<RichSelection>,
    attached: bool,
    modifications: Vec<(Direction, Granularity)>,
}

impl FakeRichHost {
    #[must_use]
    pub fn new(node: u64, tree: RichTree) -> Self {
        Self {
            node: NodeId::new(node),
            tree,
            selection: None,
            attached: true,
            modifications: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_selection(mut self, selection: RichSelection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn set_selection(&mut self, selection: Option<RichSelection>) {
        self.selection = selection;
    }

    pub fn tree_mut(&mut self) -> &mut RichTree {
        &mut self.tree
    }

    pub fn detach(&mut self) {
        self.attached = false;
    }

    #[must_use]
    pub fn modifications(&self) -> &[(Direction, Granularity)] {
        &self.modifications
    }
}

impl RichTextHost for FakeRichHost {
    fn node(&self) -> NodeId {
        self.node
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn tree(&self) -> &RichTree {
        &self.tree
    }

    fn selection(&self) -> Option<RichSelection> {
        self.selection
    }

    fn modify_selection(&mut self, direction: Direction, granularity: Granularity) {
        self.modifications.push((direction, granularity));
    }
}

/// One recorded speech request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub text: String,
    pub triggered_by_user: bool,
    pub personality: Personality,
}

/// Records everything the core sends outward.
#[derive(Debug, Default)]
pub struct RecordingOutputs {
    utterances: RefCell<Vec<Utterance>>,
    braille: RefCell<Vec<BrailleLine>>,
    rechecks: RefCell<Vec<bool>>,
    unfocused: Cell<bool>,
}

impl RecordingOutputs {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Output bundle with speech, braille, focus, and re-check all routed
    /// to `this`.
    #[must_use]
    pub fn outputs(this: &Rc<Self>) -> Outputs {
        Outputs::new(this.clone(), this.clone(), this.clone()).with_braille(this.clone())
    }

    /// Like [`Self::outputs`] but with no braille display.
    #[must_use]
    pub fn outputs_without_braille(this: &Rc<Self>) -> Outputs {
        Outputs::new(this.clone(), this.clone(), this.clone())
    }

    /// Make every focus query answer `focused`.
    pub fn set_focused(&self, focused: bool) {
        self.unfocused.set(!focused);
    }

    #[must_use]
    pub fn utterances(&self) -> Vec<Utterance> {
        self.utterances.borrow().clone()
    }

    #[must_use]
    pub fn spoken(&self) -> Vec<String> {
        self.utterances.borrow().iter().map(|u| u.text.clone()).collect()
    }

    #[must_use]
    pub fn braille_lines(&self) -> Vec<BrailleLine> {
        self.braille.borrow().clone()
    }

    #[must_use]
    pub fn last_braille(&self) -> Option<BrailleLine> {
        self.braille.borrow().last().cloned()
    }

    #[must_use]
    pub fn rechecks(&self) -> Vec<bool> {
        self.rechecks.borrow().clone()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.utterances.borrow_mut().clear();
        self.braille.borrow_mut().clear();
        self.rechecks.borrow_mut().clear();
    }
}

impl SpeechOutput for RecordingOutputs {
    fn speak(&self, text: &str, triggered_by_user: bool, personality: Personality) {
        self.utterances.borrow_mut().push(Utterance {
            text: text.to_owned(),
            triggered_by_user,
            personality,
        });
    }
}

impl BrailleOutput for RecordingOutputs {
    fn project(&self, line: &BrailleLine) {
        self.braille.borrow_mut().push(line.clone());
    }
}

impl FocusQuery for RecordingOutputs {
    fn is_focused(&self, _node: NodeId) -> bool {
        !self.unfocused.get()
    }
}

impl RecheckSink for RecordingOutputs {
    fn request_recheck(&self, triggered_by_user: bool) {
        self.rechecks.borrow_mut().push(triggered_by_user);
    }
}
