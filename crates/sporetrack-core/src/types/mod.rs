//! # Core Type Definitions
//!
//! Error types shared by every Sporetrack module.
//!
//! The workflow engine itself never fails on a well-formed batch record:
//! unknown stages degrade to "pending" and missing fields render placeholders.
//! Errors only arise at the edges: decoding input, validating records, gating
//! edits and loading configuration.

use crate::workflow::{Stage, StageStatus};
use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in Sporetrack operations.
#[derive(Debug, Error)]
pub enum SporetrackError {
    /// The stage key is not one of the six known production stages.
    #[error("Unknown stage: {0:?}")]
    UnknownStage(String),

    /// An edit was requested for a stage that is not the batch's current stage.
    #[error("Stage {stage} is {status}; only the current stage can be edited")]
    StageNotEditable { stage: Stage, status: StageStatus },

    /// The batch record failed validation.
    #[error("Invalid batch: {0}")]
    InvalidBatch(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

// =============================================================================
// TESTS
// =============================================================================
