#![forbid(unsafe_code)]

//! The describe policy shared by every editable surface.
//!
//! [`EditableCore`] keeps the last known [`TextSnapshot`] of one control.
//! Each [`ChangeEvent`] is compared against it: a selection-only change is
//! described by what the cursor crossed or what the selection gained or
//! lost, a text change by what was inserted or deleted. Afterwards the
//! current line is projected to braille.
//!
//! Password snapshots never reach an output verbatim. Speech receives "dot"
//! phrases and braille receives the configured mask.

use edvox_text::NodeId;
use edvox_text::offsets::{char_at, char_len, char_slice, common_prefix_len, common_suffix_len};
use tracing::{debug_span, trace, warn};

use crate::config::EditableConfig;
use crate::event::{ChangeEvent, TextSnapshot};
use crate::lines::LineLookup;
use crate::output::{BrailleLine, Outputs, Personality};

/// Snapshot plus describe policy for one control.
#[derive(Debug)]
pub struct EditableCore {
    node: NodeId,
    snapshot: TextSnapshot,
    outputs: Outputs,
    config: EditableConfig,
    last_change_described: bool,
}

impl EditableCore {
    #[must_use]
    pub fn new(
        node: NodeId,
        is_password: bool,
        multiline: bool,
        outputs: Outputs,
        config: EditableConfig,
    ) -> Self {
        Self {
            node,
            snapshot: TextSnapshot::new(is_password, multiline),
            outputs,
            config,
            last_change_described: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn node(&self) -> NodeId {
        self.node
    }

    #[inline]
    #[must_use]
    pub const fn snapshot(&self) -> &TextSnapshot {
        &self.snapshot
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &EditableConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub const fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    /// True if the most recent [`Self::changed`] call produced a description.
    #[must_use]
    pub const fn last_change_described(&self) -> bool {
        self.last_change_described
    }

    /// Adopt a state without describing it.
    pub fn seed(&mut self, evt: &ChangeEvent) {
        self.snapshot.apply(evt);
    }

    /// Describe how `evt` differs from the snapshot, then adopt it.
    pub fn changed(&mut self, evt: &ChangeEvent, lines: &dyn LineLookup) {
        let _span = debug_span!(
            "editable.changed",
            node = self.node.get(),
            triggered_by_user = evt.triggered_by_user(),
            start = evt.start(),
            end = evt.end(),
        )
        .entered();

        if self.snapshot.matches(evt) {
            self.last_change_described = false;
            return;
        }

        if evt.value() == self.snapshot.text() {
            self.describe_selection_changed(evt, lines);
        } else {
            self.describe_text_changed(evt);
        }

        self.snapshot.apply(evt);
        self.last_change_described = true;
        self.braille_current_line(lines);
    }

    /// Speak `text` if the control holds focus.
    pub fn speak(&self, text: &str, triggered_by_user: bool, personality: Personality) {
        if text.is_empty() {
            return;
        }
        if !self.outputs.focus.is_focused(self.node) {
            trace!(node = self.node.get(), "speech dropped: control not focused");
            return;
        }
        let limit = self.config.max_echo_chars;
        let utterance = if char_len(text) > limit {
            char_slice(text, 0, limit)
        } else {
            text
        };
        self.outputs
            .speech
            .speak(utterance, triggered_by_user, personality);
    }

    /// Forward a line to the braille display, if one is attached.
    pub fn braille(&self, line: &BrailleLine) {
        if let Some(braille) = &self.outputs.braille {
            braille.project(line);
        }
    }

    /// Announce a structurally blank line: the canned phrase plus an empty
    /// braille line anchored at `offset`.
    pub fn announce_blank(&self, offset: usize) {
        self.speak(&self.config.phrases.blank, true, Personality::Annotation);
        self.braille(&BrailleLine {
            text: String::new(),
            cursor_start: 0,
            cursor_end: 0,
            multiline: true,
            source: None,
            line_start: offset,
        });
    }

    /// Ask the event watcher to poll the control again.
    pub fn request_recheck(&self) {
        self.outputs.recheck.request_recheck(true);
    }

    /// Project the snapshot's current line to braille.
    pub fn braille_current_line(&self, lines: &dyn LineLookup) {
        if self.outputs.braille.is_none() {
            return;
        }
        let snap = &self.snapshot;
        let located = lines.line_index(snap.selection_start()).and_then(|index| {
            let start = lines.line_start(index)?;
            let text = lines.line_text(snap.text(), index)?;
            Ok((start, text))
        });
        let (line_start, text) = match located {
            Ok(found) => found,
            Err(err) => {
                warn!(node = self.node.get(), error = %err, "braille skipped: no line information");
                return;
            }
        };

        let len = char_len(&text);
        let cursor_start = snap.selection_start().saturating_sub(line_start).min(len);
        let cursor_end = snap
            .selection_end()
            .saturating_sub(line_start)
            .clamp(cursor_start, len);
        let text = if snap.is_password() {
            std::iter::repeat_n(self.config.password_mask, len).collect()
        } else {
            text
        };
        self.braille(&BrailleLine {
            text,
            cursor_start,
            cursor_end,
            multiline: snap.multiline(),
            source: Some(self.node),
            line_start,
        });
    }

    /// Text as it may be spoken: verbatim, or a dot phrase for passwords.
    fn speakable(&self, text: &str) -> String {
        if self.snapshot.is_password() {
            self.config.phrases.dots_for(char_len(text))
        } else {
            text.to_owned()
        }
    }

    fn describe_selection_changed(&self, evt: &ChangeEvent, lines: &dyn LineLookup) {
        let user = evt.triggered_by_user();
        let old_start = self.snapshot.selection_start();
        let old_end = self.snapshot.selection_end();
        let value = evt.value();

        if self.snapshot.is_collapsed() && evt.is_collapsed() {
            if self.snapshot.multiline() && self.describe_line_change(evt, lines) {
                return;
            }
            let (from, to) = (old_start.min(evt.start()), old_start.max(evt.start()));
            if to - from == 1 {
                match char_at(value, evt.start()) {
                    Some(c) => {
                        let mut buf = [0u8; 4];
                        let spoken = self.speakable(c.encode_utf8(&mut buf));
                        self.speak(&spoken, user, Personality::Normal);
                    }
                    None => {
                        let phrase = &self.config.phrases.end_of_text;
                        self.speak(phrase, user, Personality::Annotation);
                    }
                }
            } else {
                let crossed = self.speakable(char_slice(value, from, to));
                self.speak(&crossed, user, Personality::Normal);
            }
            return;
        }

        let (new_start, new_end) = (evt.start(), evt.end());
        let phrases = &self.config.phrases;
        let (span, phrase) = if new_start == old_start && new_end > old_end {
            ((old_end, new_end), &phrases.selected)
        } else if new_end == old_end && new_start < old_start {
            ((new_start, old_start), &phrases.selected)
        } else if new_start == old_start && new_end < old_end {
            ((new_end, old_end), &phrases.unselected)
        } else if new_end == old_end && new_start > old_start {
            ((old_start, new_start), &phrases.unselected)
        } else if evt.is_collapsed() {
            ((old_start, old_end), &phrases.unselected)
        } else {
            ((new_start, new_end), &phrases.selected)
        };
        let text = self.speakable(char_slice(value, span.0, span.1));
        self.speak(&text, user, Personality::Normal);
        self.speak(phrase, user, Personality::Annotation);
    }

    /// Speak the destination line if the cursor changed lines. Returns true
    /// if it did.
    fn describe_line_change(&self, evt: &ChangeEvent, lines: &dyn LineLookup) -> bool {
        let old_line = lines.line_index(self.snapshot.selection_start());
        let new_line = lines.line_index(evt.start());
        let (old_line, new_line) = match (old_line, new_line) {
            (Ok(old), Ok(new)) => (old, new),
            (Err(err), _) | (_, Err(err)) => {
                warn!(node = self.node.get(), error = %err, "line change undetectable");
                return false;
            }
        };
        if old_line == new_line {
            return false;
        }
        let text = match lines.line_text(evt.value(), new_line) {
            Ok(text) => text,
            Err(err) => {
                warn!(node = self.node.get(), error = %err, "line text unavailable");
                return false;
            }
        };
        let user = evt.triggered_by_user();
        if text.trim().is_empty() {
            self.speak(&self.config.phrases.blank, user, Personality::Annotation);
        } else {
            self.speak(&self.speakable(&text), user, Personality::Normal);
        }
        true
    }

    fn describe_text_changed(&self, evt: &ChangeEvent) {
        let old = self.snapshot.text();
        let new = evt.value();
        let prefix = common_prefix_len(old, new);
        let suffix = common_suffix_len(old, new, prefix);
        let inserted = char_slice(new, prefix, char_len(new) - suffix);
        let deleted = char_slice(old, prefix, char_len(old) - suffix);
        let user = evt.triggered_by_user();

        if !inserted.is_empty() {
            self.speak(&self.speakable(inserted), user, Personality::Normal);
        } else if !deleted.is_empty() && self.config.speak_deletions {
            self.speak(&self.speakable(deleted), user, Personality::Deleted);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::SingleLine;
    use crate::output::{BrailleOutput, FocusQuery, RecheckSink, SpeechOutput};
    use edvox_text::{LineTable, TextError};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::sync::{Arc, Mutex};
    use tracing::Subscriber;
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_test::traced_test;

    #[derive(Default)]
    struct Recorder {
        spoken: RefCell<Vec<(String, Personality)>>,
        brailled: RefCell<Vec<BrailleLine>>,
        unfocused: Cell<bool>,
        rechecks: Cell<usize>,
    }

    impl Recorder {
        fn spoken_text(&self) -> Vec<String> {
            self.spoken.borrow().iter().map(|(t, _)| t.clone()).collect()
        }
    }

    impl SpeechOutput for Recorder {
        fn speak(&self, text: &str, _triggered_by_user: bool, personality: Personality) {
            self.spoken.borrow_mut().push((text.to_owned(), personality));
        }
    }

    impl BrailleOutput for Recorder {
        fn project(&self, line: &BrailleLine) {
            self.brailled.borrow_mut().push(line.clone());
        }
    }

    impl FocusQuery for Recorder {
        fn is_focused(&self, _node: NodeId) -> bool {
            !self.unfocused.get()
        }
    }

    impl RecheckSink for Recorder {
        fn request_recheck(&self, _triggered_by_user: bool) {
            self.rechecks.set(self.rechecks.get() + 1);
        }
    }

    struct NoLines;

    impl LineLookup for NoLines {
        fn line_index(&self, _offset: usize) -> edvox_text::Result<usize> {
            Err(TextError::layout("detached"))
        }
        fn line_start(&self, _index: usize) -> edvox_text::Result<usize> {
            Err(TextError::layout("detached"))
        }
        fn line_end(&self, _index: usize) -> edvox_text::Result<usize> {
            Err(TextError::layout("detached"))
        }
    }

    fn core_with(
        is_password: bool,
        multiline: bool,
        config: EditableConfig,
    ) -> (EditableCore, Rc<Recorder>) {
        let rec = Rc::new(Recorder::default());
        let outputs = Outputs::new(rec.clone(), rec.clone(), rec.clone()).with_braille(rec.clone());
        let core = EditableCore::new(NodeId::new(7), is_password, multiline, outputs, config);
        (core, rec)
    }

    fn single(value: &str, start: usize, end: usize) -> (ChangeEvent, SingleLine<'_>) {
        (ChangeEvent::new(value, start, end, true), SingleLine::new(value))
    }

    #[test]
    fn unchanged_event_is_not_described() {
        let (mut core, rec) = core_with(false, false, EditableConfig::default());
        let (evt, lines) = single("abc", 1, 1);
        core.seed(&evt);
        core.changed(&evt, &lines);
        assert!(!core.last_change_described());
        assert!(rec.spoken.borrow().is_empty());
        assert!(rec.brailled.borrow().is_empty());
    }

    #[test]
    fn insertion_speaks_inserted_text_and_brailles_line() {
        let (mut core, rec) = core_with(false, false, EditableConfig::default());
        core.seed(&ChangeEvent::new("ab", 2, 2, true));
        let (evt, lines) = single("abc", 3, 3);
        core.changed(&evt, &lines);
        assert!(core.last_change_described());
        assert_eq!(rec.spoken_text(), vec!["c"]);
        let braille = rec.brailled.borrow();
        assert_eq!(braille.len(), 1);
        assert_eq!(braille[0].text, "abc");
        assert_eq!((braille[0].cursor_start, braille[0].cursor_end), (3, 3));
        assert_eq!(braille[0].source, Some(NodeId::new(7)));
        assert_eq!(core.snapshot().text(), "abc");
    }

    #[test]
    fn deletion_uses_deleted_personality() {
        let (mut core, rec) = core_with(false, false, EditableConfig::default());
        core.seed(&ChangeEvent::new("hello", 5, 5, true));
        let (evt, lines) = single("hel", 3, 3);
        core.changed(&evt, &lines);
        assert_eq!(
            rec.spoken.borrow().as_slice(),
            &[("lo".to_owned(), Personality::Deleted)]
        );
    }

    #[test]
    fn deletions_can_be_silenced() {
        let config = EditableConfig {
            speak_deletions: false,
            ..EditableConfig::default()
        };
        let (mut core, rec) = core_with(false, false, config);
        core.seed(&ChangeEvent::new("hello", 5, 5, true));
        let (evt, lines) = single("hell", 4, 4);
        core.changed(&evt, &lines);
        assert!(rec.spoken.borrow().is_empty());
        assert_eq!(rec.brailled.borrow().len(), 1);
    }

    #[test]
    fn single_char_moves_speak_char_at_cursor() {
        let (mut core, rec) = core_with(false, false, EditableConfig::default());
        core.seed(&ChangeEvent::new("hello", 0, 0, true));
        let (evt, lines) = single("hello", 1, 1);
        core.changed(&evt, &lines);
        let (evt, lines) = single("hello", 4, 4);
        core.changed(&evt, &lines);
        let (evt, lines) = single("hello", 5, 5);
        core.changed(&evt, &lines);
        assert_eq!(
            rec.spoken.borrow().as_slice(),
            &[
                ("e".to_owned(), Personality::Normal),
                ("ell".to_owned(), Personality::Normal),
                ("end of text".to_owned(), Personality::Annotation),
            ]
        );
    }

    #[test]
    fn selection_growth_and_shrink_are_announced() {
        let (mut core, rec) = core_with(false, false, EditableConfig::default());
        core.seed(&ChangeEvent::new("hello", 0, 0, true));
        let (evt, lines) = single("hello", 0, 3);
        core.changed(&evt, &lines);
        let (evt, lines) = single("hello", 0, 1);
        core.changed(&evt, &lines);
        let (evt, lines) = single("hello", 2, 4);
        core.changed(&evt, &lines);
        assert_eq!(
            rec.spoken_text(),
            vec!["hel", "selected", "el", "unselected", "ll", "selected"]
        );
    }

    #[test]
    fn collapsing_a_selection_unselects_it() {
        let (mut core, rec) = core_with(false, false, EditableConfig::default());
        core.seed(&ChangeEvent::new("hello", 1, 4, true));
        let (evt, lines) = single("hello", 5, 5);
        core.changed(&evt, &lines);
        assert_eq!(rec.spoken_text(), vec!["ell", "unselected"]);
    }

    #[test]
    fn line_change_speaks_destination_line() {
        let (mut core, rec) = core_with(false, true, EditableConfig::default());
        let value = "ab\n\ncd";
        let table = LineTable::from_breaks(6, [3, 4]);
        core.seed(&ChangeEvent::new(value, 1, 1, true));
        core.changed(&ChangeEvent::new(value, 5, 5, true), &table);
        core.changed(&ChangeEvent::new(value, 3, 3, true), &table);
        assert_eq!(
            rec.spoken.borrow().as_slice(),
            &[
                ("cd".to_owned(), Personality::Normal),
                ("blank".to_owned(), Personality::Annotation),
            ]
        );
        let braille = rec.brailled.borrow();
        assert_eq!(braille[0].text, "cd");
        assert_eq!(braille[0].line_start, 4);
        assert_eq!((braille[0].cursor_start, braille[0].cursor_end), (1, 1));
        assert!(braille[0].multiline);
        assert_eq!(braille[1].text, "");
        assert_eq!(braille[1].line_start, 3);
    }

    #[test]
    fn password_text_never_reaches_outputs() {
        let (mut core, rec) = core_with(true, false, EditableConfig::default());
        let (evt, lines) = single("s", 1, 1);
        core.changed(&evt, &lines);
        let (evt, lines) = single("sec", 3, 3);
        core.changed(&evt, &lines);
        let (evt, lines) = single("sec", 0, 3);
        core.changed(&evt, &lines);
        let (evt, lines) = single("sec", 3, 3);
        core.changed(&evt, &lines);

        let spoken = rec.spoken_text();
        assert_eq!(spoken, vec!["dot", "2 dots", "3 dots", "selected", "3 dots", "unselected"]);
        for line in rec.brailled.borrow().iter() {
            assert!(line.text.chars().all(|c| c == '*'), "leaked {:?}", line.text);
        }
        assert_eq!(rec.brailled.borrow().last().map(|l| l.text.as_str()), Some("***"));
    }

    #[test]
    fn unfocused_control_is_silent_but_still_brailled() {
        let (mut core, rec) = core_with(false, false, EditableConfig::default());
        rec.unfocused.set(true);
        let (evt, lines) = single("a", 1, 1);
        core.changed(&evt, &lines);
        assert!(rec.spoken.borrow().is_empty());
        assert_eq!(rec.brailled.borrow().len(), 1);
    }

    #[test]
    fn long_utterances_are_truncated() {
        let config = EditableConfig {
            max_echo_chars: 3,
            ..EditableConfig::default()
        };
        let (mut core, rec) = core_with(false, false, config);
        let (evt, lines) = single("\u{e9}bcdef", 6, 6);
        core.changed(&evt, &lines);
        assert_eq!(rec.spoken_text(), vec!["\u{e9}bc"]);
    }

    #[test]
    fn announce_blank_projects_empty_line() {
        let (core, rec) = core_with(false, true, EditableConfig::default());
        core.announce_blank(9);
        assert_eq!(
            rec.spoken.borrow().as_slice(),
            &[("blank".to_owned(), Personality::Annotation)]
        );
        let braille = rec.brailled.borrow();
        assert_eq!(
            braille.as_slice(),
            &[BrailleLine {
                text: String::new(),
                cursor_start: 0,
                cursor_end: 0,
                multiline: true,
                source: None,
                line_start: 9,
            }]
        );
    }

    #[test]
    fn recheck_is_forwarded() {
        let (core, rec) = core_with(false, false, EditableConfig::default());
        core.request_recheck();
        core.request_recheck();
        assert_eq!(rec.rechecks.get(), 2);
    }

    #[traced_test]
    #[test]
    fn missing_line_information_skips_braille() {
        let (mut core, rec) = core_with(false, true, EditableConfig::default());
        core.seed(&ChangeEvent::new("ab", 2, 2, true));
        core.changed(&ChangeEvent::new("abc", 3, 3, true), &NoLines);
        assert_eq!(rec.spoken_text(), vec!["c"]);
        assert!(rec.brailled.borrow().is_empty());
        assert_eq!(core.snapshot().text(), "abc");
        assert!(logs_contain("braille skipped"));
    }

    #[derive(Debug, Default)]
    struct SpanState {
        names: Vec<String>,
        starts: Vec<u64>,
    }

    struct SpanCapture {
        state: Arc<Mutex<SpanState>>,
    }

    impl<S> Layer<S> for SpanCapture
    where
        S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
    {
        fn on_new_span(
            &self,
            attrs: &tracing::span::Attributes<'_>,
            _id: &tracing::Id,
            _ctx: Context<'_, S>,
        ) {
            struct StartVisitor(Option<u64>);

            impl tracing::field::Visit for StartVisitor {
                fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
                    if field.name() == "start" {
                        self.0 = Some(value);
                    }
                }

                fn record_debug(
                    &mut self,
                    _field: &tracing::field::Field,
                    _value: &dyn std::fmt::Debug,
                ) {
                }
            }

            let mut visitor = StartVisitor(None);
            attrs.record(&mut visitor);
            let mut state = self.state.lock().expect("span state lock");
            state.names.push(attrs.metadata().name().to_owned());
            if let Some(start) = visitor.0 {
                state.starts.push(start);
            }
        }
    }

    #[test]
    fn changed_enters_span_with_selection_fields() {
        let state = Arc::new(Mutex::new(SpanState::default()));
        let subscriber = tracing_subscriber::registry().with(SpanCapture {
            state: Arc::clone(&state),
        });
        let _guard = tracing::subscriber::set_default(subscriber);
        tracing::callsite::rebuild_interest_cache();

        let (mut core, _rec) = core_with(false, false, EditableConfig::default());
        let (evt, lines) = single("ab", 1, 1);
        core.changed(&evt, &lines);
        let (evt, lines) = single("ab", 2, 2);
        core.changed(&evt, &lines);

        tracing::callsite::rebuild_interest_cache();
        let snapshot = state.lock().expect("span state lock");
        let changed = snapshot
            .names
            .iter()
            .filter(|name| *name == "editable.changed")
            .count();
        assert_eq!(changed, 2);
        assert_eq!(snapshot.starts, vec![1, 2]);
    }
}
