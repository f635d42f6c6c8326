use thiserror::Error;

pub type Result<T> = std::result::Result<T, TextError>;

/// Failures surfaced by line measurement and tree traversal.
///
/// Out-of-range offsets are never errors; queries clamp them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    #[error("line layout unavailable: {reason}")]
    LayoutUnavailable { reason: String },

    #[error("node {node} is not part of the rich-text tree")]
    UnknownNode { node: usize },

    #[error("offset {offset} exceeds length {len} of node {node}")]
    OffsetOutOfRange {
        node: usize,
        offset: usize,
        len: usize,
    },
}

impl TextError {
    #[must_use]
    pub fn layout(reason: impl Into<String>) -> Self {
        Self::LayoutUnavailable {
            reason: reason.into(),
        }
    }
}
