#![forbid(unsafe_code)]

//! Change events and text snapshots.

use edvox_text::offsets::char_len;

/// Immutable record of one poll of an editable surface.
///
/// Offsets are clamped and ordered on construction so that
/// `start <= end <= len(value)` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    value: String,
    start: usize,
    end: usize,
    triggered_by_user: bool,
}

impl ChangeEvent {
    #[must_use]
    pub fn new(
        value: impl Into<String>,
        start: usize,
        end: usize,
        triggered_by_user: bool,
    ) -> Self {
        let value = value.into();
        let (start, end) = clamp_selection(&value, start, end);
        Self {
            value,
            start,
            end,
            triggered_by_user,
        }
    }

    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[inline]
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    #[inline]
    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    #[inline]
    #[must_use]
    pub const fn triggered_by_user(&self) -> bool {
        self.triggered_by_user
    }

    /// True when the selection is a bare cursor.
    #[inline]
    #[must_use]
    pub const fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// Last known state of a surface, as seen by the describe policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSnapshot {
    text: String,
    selection_start: usize,
    selection_end: usize,
    is_password: bool,
    multiline: bool,
}

impl TextSnapshot {
    /// An empty snapshot with the cursor at 0.
    #[must_use]
    pub const fn new(is_password: bool, multiline: bool) -> Self {
        Self {
            text: String::new(),
            selection_start: 0,
            selection_end: 0,
            is_password,
            multiline,
        }
    }

    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    #[must_use]
    pub const fn selection_start(&self) -> usize {
        self.selection_start
    }

    #[inline]
    #[must_use]
    pub const fn selection_end(&self) -> usize {
        self.selection_end
    }

    #[inline]
    #[must_use]
    pub const fn is_password(&self) -> bool {
        self.is_password
    }

    #[inline]
    #[must_use]
    pub const fn multiline(&self) -> bool {
        self.multiline
    }

    #[inline]
    #[must_use]
    pub const fn is_collapsed(&self) -> bool {
        self.selection_start == self.selection_end
    }

    /// True if `evt` carries exactly this text and selection.
    #[must_use]
    pub fn matches(&self, evt: &ChangeEvent) -> bool {
        self.text == evt.value
            && self.selection_start == evt.start
            && self.selection_end == evt.end
    }

    /// Take text and selection from `evt`.
    pub fn apply(&mut self, evt: &ChangeEvent) {
        evt.value.clone_into(&mut self.text);
        self.selection_start = evt.start;
        self.selection_end = evt.end;
    }
}

fn clamp_selection(value: &str, start: usize, end: usize) -> (usize, usize) {
    let len = char_len(value);
    let (start, end) = if start <= end {
        (start, end)
    } else {
        (end, start)
    };
    (start.min(len), end.min(len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_clamps_and_orders_selection() {
        let evt = ChangeEvent::new("abc", 9, 1, true);
        assert_eq!((evt.start(), evt.end()), (1, 3));
        assert!(!evt.is_collapsed());
        let evt = ChangeEvent::new("", 4, 4, false);
        assert_eq!((evt.start(), evt.end()), (0, 0));
        assert!(evt.is_collapsed());
    }

    #[test]
    fn offsets_count_chars() {
        let evt = ChangeEvent::new("\u{e9}t\u{e9}", 3, 3, true);
        assert_eq!(evt.end(), 3);
    }

    #[test]
    fn snapshot_applies_events() {
        let mut snap = TextSnapshot::new(false, true);
        let evt = ChangeEvent::new("hello", 2, 4, true);
        assert!(!snap.matches(&evt));
        snap.apply(&evt);
        assert!(snap.matches(&evt));
        assert_eq!(snap.text(), "hello");
        assert_eq!((snap.selection_start(), snap.selection_end()), (2, 4));
        assert!(snap.multiline());
        assert!(!snap.is_password());
    }
}
