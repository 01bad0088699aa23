//! # Workflow Module
//!
//! Stage status derivation, the per-stage field table and the assembled
//! workflow view.
//!
//! Everything here is a pure function of the batch record. Stage advancement
//! (writing a new `currentStage`) happens upstream, never in this module.

mod fields;
mod stage;
mod summary;

pub use fields::*;
pub use stage::*;
pub use summary::*;
