#![forbid(unsafe_code)]

//! Surface adapters for edvox.
//!
//! # Role in edvox
//! Each adapter binds one live control to an
//! [`EditableCore`](edvox_core::EditableCore) and exposes the
//! [`TextHandler`] capability set to the event watcher:
//!
//! - [`HtmlInput`]: single-line and password inputs.
//! - [`TextArea`]: multi-line plain text, measured by a shared shadow.
//! - [`ContentEditable`]: rich-text regions, measured by a shared extractor.
//!
//! Shared measurers are injected as handles, so two adapters of the same
//! variant can coexist and a test can substitute its own layout engine.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use edvox_core::{EditableConfig, Outputs, Personality, SpeechOutput};
//! use edvox_core::{FocusQuery, RecheckSink};
//! use edvox_surface::{HtmlInput, TextControl, TextHandler};
//! use edvox_text::NodeId;
//!
//! struct Field { value: String, cursor: usize }
//!
//! impl TextControl for Field {
//!     fn node(&self) -> NodeId { NodeId::new(1) }
//!     fn value(&self) -> String { self.value.clone() }
//!     fn selection_start(&self) -> usize { self.cursor }
//!     fn selection_end(&self) -> usize { self.cursor }
//!     fn set_selection(&mut self, _start: usize, end: usize) {
//!         self.cursor = end.min(self.value.chars().count());
//!     }
//! }
//!
//! struct Console;
//! impl SpeechOutput for Console {
//!     fn speak(&self, text: &str, _user: bool, _p: Personality) { println!("{text}"); }
//! }
//! impl FocusQuery for Console {
//!     fn is_focused(&self, _node: NodeId) -> bool { true }
//! }
//! impl RecheckSink for Console {
//!     fn request_recheck(&self, _user: bool) {}
//! }
//!
//! let console = Rc::new(Console);
//! let outputs = Outputs::new(console.clone(), console.clone(), console);
//! let field = Field { value: "foo bar baz".to_owned(), cursor: 0 };
//! let mut input = HtmlInput::new(field, outputs, EditableConfig::default());
//! input.update(false);
//! assert!(input.move_cursor_to_next_word());
//! assert_eq!(input.control().cursor, 3);
//! ```

pub mod control;
pub mod handler;
pub mod input;
mod plain;
pub mod rich;
pub mod textarea;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use control::{Direction, Granularity, InputType, RichSelection, RichTextHost, TextControl};
pub use handler::TextHandler;
pub use input::HtmlInput;
pub use rich::ContentEditable;
pub use textarea::TextArea;
