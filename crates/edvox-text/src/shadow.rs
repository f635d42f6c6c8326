#![forbid(unsafe_code)]

//! Shadow measurement for multi-line plain-text controls.
//!
//! A [`ShadowMeasurer`] mirrors one control at a time. Its line table is
//! valid only for the node, text, and metrics it was built from; every query
//! checks all three and rebuilds when any differs, so switching focus between
//! two controls can never serve stale lines. Adapters share one measurer
//! through a [`SharedShadow`] handle.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::{trace, warn};

use crate::error::Result;
use crate::layout::{LayoutEngine, ShadowMetrics, WrapLayout};
use crate::line_table::LineTable;
use crate::offsets::char_len;
use crate::NodeId;

/// Shared handle to the measurer used by every text-area adapter.
pub type SharedShadow = Rc<RefCell<ShadowMeasurer>>;

#[derive(Debug, Clone)]
struct Measurement {
    node: NodeId,
    text: String,
    metrics: ShadowMetrics,
    table: LineTable,
}

/// Cached line measurement for a plain multi-line control.
pub struct ShadowMeasurer {
    engine: Box<dyn LayoutEngine>,
    measurement: Option<Measurement>,
    current: bool,
    rebuilds: u64,
}

impl fmt::Debug for ShadowMeasurer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShadowMeasurer")
            .field("measurement", &self.measurement)
            .field("current", &self.current)
            .field("rebuilds", &self.rebuilds)
            .finish_non_exhaustive()
    }
}

impl Default for ShadowMeasurer {
    fn default() -> Self {
        Self::new(WrapLayout)
    }
}

impl ShadowMeasurer {
    /// Create a measurer backed by `engine`.
    #[must_use]
    pub fn new(engine: impl LayoutEngine + 'static) -> Self {
        Self {
            engine: Box::new(engine),
            measurement: None,
            current: false,
            rebuilds: 0,
        }
    }

    /// Wrap the measurer in a shared handle.
    #[must_use]
    pub fn shared(self) -> SharedShadow {
        Rc::new(RefCell::new(self))
    }

    /// Mark the cached measurement stale. The next query rebuilds it.
    pub fn invalidate(&mut self) {
        self.current = false;
    }

    /// True if the cache was built for exactly this node, text, and metrics
    /// and has not been invalidated since.
    #[must_use]
    pub fn is_current_for(&self, node: NodeId, text: &str, metrics: &ShadowMetrics) -> bool {
        self.current
            && self
                .measurement
                .as_ref()
                .is_some_and(|m| m.node == node && m.text == text && m.metrics == *metrics)
    }

    /// Number of layout passes performed so far.
    #[must_use]
    pub const fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Line table for `text` in `node`, rebuilding if needed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TextError::LayoutUnavailable`] when the engine fails
    /// or reports ranges that do not partition the text.
    pub fn lines(
        &mut self,
        node: NodeId,
        text: &str,
        metrics: &ShadowMetrics,
    ) -> Result<&LineTable> {
        if !self.is_current_for(node, text, metrics) {
            self.rebuild(node, text, metrics)?;
        }
        match &self.measurement {
            Some(m) => Ok(&m.table),
            None => Err(crate::TextError::layout("shadow has no measurement")),
        }
    }

    /// Index of the line containing `offset`.
    ///
    /// # Errors
    ///
    /// Propagates layout failures from [`Self::lines`].
    pub fn line_index(
        &mut self,
        node: NodeId,
        text: &str,
        metrics: &ShadowMetrics,
        offset: usize,
    ) -> Result<usize> {
        Ok(self.lines(node, text, metrics)?.line_index(offset))
    }

    /// Start offset of line `index`.
    ///
    /// # Errors
    ///
    /// Propagates layout failures from [`Self::lines`].
    pub fn line_start(
        &mut self,
        node: NodeId,
        text: &str,
        metrics: &ShadowMetrics,
        index: usize,
    ) -> Result<usize> {
        Ok(self.lines(node, text, metrics)?.line_start(index))
    }

    /// End offset (exclusive) of line `index`.
    ///
    /// # Errors
    ///
    /// Propagates layout failures from [`Self::lines`].
    pub fn line_end(
        &mut self,
        node: NodeId,
        text: &str,
        metrics: &ShadowMetrics,
        index: usize,
    ) -> Result<usize> {
        Ok(self.lines(node, text, metrics)?.line_end(index))
    }

    fn rebuild(&mut self, node: NodeId, text: &str, metrics: &ShadowMetrics) -> Result<()> {
        self.current = false;
        self.measurement = None;
        self.rebuilds += 1;

        let ranges = self.engine.line_ranges(text, metrics).inspect_err(|err| {
            warn!(node = node.get(), error = %err, "shadow layout failed");
        })?;
        let table = LineTable::from_ranges(char_len(text), &ranges).inspect_err(|err| {
            warn!(node = node.get(), error = %err, "shadow layout reported invalid lines");
        })?;

        trace!(
            node = node.get(),
            lines = table.line_count(),
            columns = metrics.columns,
            "shadow rebuilt"
        );
        self.measurement = Some(Measurement {
            node,
            text: text.to_owned(),
            metrics: *metrics,
            table,
        });
        self.current = true;
        Ok(())
    }
}
