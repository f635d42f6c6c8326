#![forbid(unsafe_code)]

//! Text plumbing for edvox: offsets, word scanning, and line indexing.
//!
//! # Role in edvox
//! `edvox-text` answers positional questions about the text of an editable
//! surface without knowing anything about speech or braille. The surface
//! adapters in `edvox-surface` call into it to move the cursor by word or
//! paragraph and to map flat offsets to lines.
//!
//! # Primary responsibilities
//! - **offsets**: char-offset slicing and diff helpers.
//! - **word**: `\W+` boundary scanning for word and paragraph motion.
//! - **line_table**: gap-free line partitions with clamping queries.
//! - **layout** / **shadow**: visual line measurement for plain text areas.
//! - **rich** / **extract**: rich-text trees, flattening, and the forward
//!   character probe.

pub mod error;
pub mod extract;
pub mod layout;
pub mod line_table;
pub mod offsets;
pub mod rich;
pub mod shadow;
pub mod word;

pub use error::{Result, TextError};
pub use extract::{Extraction, Extractor, SharedExtractor};
pub use layout::{LayoutEngine, ShadowMetrics, WrapLayout};
pub use line_table::LineTable;
pub use rich::{DomPoint, RichNodeId, RichNodeKind, RichTree};
pub use shadow::{ShadowMeasurer, SharedShadow};

/// Identity of a live control or region.
///
/// Caches key on this value, so two distinct controls must never share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node#{}", self.0)
    }
}
