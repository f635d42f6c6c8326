#![forbid(unsafe_code)]

//! Inbound boundaries: the live controls an adapter binds to.
//!
//! A [`TextControl`] is a native input or text area exposing a value and a
//! selection. A [`RichTextHost`] is a rich-text region exposing its subtree,
//! the document selection, and the platform "modify selection" primitive.
//! Implementations clamp out-of-range selections the way the platform does.

use edvox_text::{DomPoint, NodeId, RichTree, ShadowMetrics};

/// The `type` of a native input control.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputType {
    #[default]
    Text,
    Password,
    Search,
    Url,
    Tel,
    Email,
    Number,
    Other(String),
}

impl InputType {
    /// Parse an attribute value, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "text" => Self::Text,
            "password" => Self::Password,
            "search" => Self::Search,
            "url" => Self::Url,
            "tel" => Self::Tel,
            "email" => Self::Email,
            "number" => Self::Number,
            other => Self::Other(other.to_owned()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Password => "password",
            Self::Search => "search",
            Self::Url => "url",
            Self::Tel => "tel",
            Self::Email => "email",
            Self::Number => "number",
            Self::Other(other) => other,
        }
    }

    /// True if the platform exposes selection offsets for this type.
    #[must_use]
    pub const fn supports_selection(&self) -> bool {
        matches!(
            self,
            Self::Text | Self::Password | Self::Search | Self::Url | Self::Tel
        )
    }

    #[must_use]
    pub const fn is_password(&self) -> bool {
        matches!(self, Self::Password)
    }
}

/// A native single-line input or multi-line text area.
pub trait TextControl {
    /// Identity of the control.
    fn node(&self) -> NodeId;

    /// False once the control has left the document.
    fn is_attached(&self) -> bool {
        true
    }

    fn value(&self) -> String;

    fn selection_start(&self) -> usize;

    fn selection_end(&self) -> usize;

    /// Set the selection. The control clamps both ends to its value.
    fn set_selection(&mut self, start: usize, end: usize);

    fn input_type(&self) -> InputType {
        InputType::Text
    }

    fn set_input_type(&mut self, _input_type: InputType) {}

    /// Layout metrics of the rendered control.
    fn metrics(&self) -> ShadowMetrics {
        ShadowMetrics::unwrapped()
    }
}

/// Direction argument of the "modify selection" primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Granularity argument of the "modify selection" primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Character,
    Word,
    Line,
    Paragraph,
}

/// Document selection inside a rich-text region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RichSelection {
    pub anchor: DomPoint,
    pub focus: DomPoint,
}

impl RichSelection {
    /// A collapsed selection at `point`.
    #[must_use]
    pub const fn caret(point: DomPoint) -> Self {
        Self {
            anchor: point,
            focus: point,
        }
    }

    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

/// A rich-text (`contenteditable`) region.
pub trait RichTextHost {
    fn node(&self) -> NodeId;

    fn is_attached(&self) -> bool {
        true
    }

    /// The region's current subtree.
    fn tree(&self) -> &RichTree;

    /// The document selection, if it lies inside the region.
    fn selection(&self) -> Option<RichSelection>;

    /// Extend or move the selection the way the platform primitive does.
    fn modify_selection(&mut self, direction: Direction, granularity: Granularity);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_types_parse_case_insensitively() {
        assert_eq!(InputType::parse("PassWord"), InputType::Password);
        assert_eq!(InputType::parse(""), InputType::Text);
        assert_eq!(InputType::parse("date"), InputType::Other("date".to_owned()));
        assert_eq!(InputType::parse("date").as_str(), "date");
    }

    #[test]
    fn only_text_like_types_support_selection() {
        assert!(InputType::Text.supports_selection());
        assert!(InputType::Password.supports_selection());
        assert!(!InputType::Email.supports_selection());
        assert!(!InputType::Number.supports_selection());
        assert!(!InputType::Other("date".to_owned()).supports_selection());
    }
}
