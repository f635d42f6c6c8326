#![forbid(unsafe_code)]

//! Describe policy and output boundaries for edvox.
//!
//! # Role in edvox
//! `edvox-core` decides what an editable surface says and shows. A surface
//! adapter polls its control, wraps the result in a [`ChangeEvent`], and
//! hands it to an [`EditableCore`] together with a [`LineLookup`]. The core
//! diffs against its [`TextSnapshot`] and talks to speech and braille only
//! through the traits in [`output`].
//!
//! # Primary responsibilities
//! - **event**: change events and snapshots.
//! - **editable**: the diff/describe policy.
//! - **lines**: the line lookup seam.
//! - **output**: speech, braille, focus, and re-poll boundaries.
//! - **config**: phrases and tunables, loadable from the environment.

pub mod config;
pub mod editable;
pub mod error;
pub mod event;
pub mod lines;
pub mod output;

pub use config::{EditableConfig, Phrases};
pub use editable::EditableCore;
pub use error::{CoreError, Result};
pub use event::{ChangeEvent, TextSnapshot};
pub use lines::{LineLookup, SingleLine};
pub use output::{
    BrailleLine, BrailleOutput, FocusQuery, Outputs, Personality, RecheckSink, SpeechOutput,
};
