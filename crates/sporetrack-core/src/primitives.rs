//! # Workflow Primitives
//!
//! Fixed constants for the Sporetrack CORE.
//!
//! These values are compiled into the binary and are immutable at runtime.

/// Number of production stages a batch moves through.
///
/// The stage order is fixed; see [`crate::Stage::ALL`].
pub const STAGE_COUNT: usize = 6;

/// Stage key assumed when a batch record carries no `currentStage`.
pub const DEFAULT_STAGE_KEY: &str = "batch_creation";

/// Ordinal reported for a stage key that is not part of the fixed order.
///
/// Every real stage sits at a higher position, so nothing compares as
/// "before" an unknown stage.
pub const UNKNOWN_STAGE_POSITION: i32 = -1;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for a batch number.
///
/// Batch numbers are assigned upstream; anything longer is treated as
/// malformed input.
pub const MAX_BATCH_NUMBER_LENGTH: usize = 64;

/// Maximum length for free-text fields (supplier, assessor names, notes).
pub const MAX_TEXT_FIELD_LENGTH: usize = 512;

/// Maximum number of batches accepted in a single analytics request.
pub const MAX_BATCHES_PER_REQUEST: usize = 10_000;

/// Decimal places kept for yield percentages.
pub const PERCENT_SCALE: u32 = 1;

/// Decimal places kept for break-even weights.
pub const WEIGHT_SCALE: u32 = 2;
