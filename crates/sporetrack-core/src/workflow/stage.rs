//! # Production Stages
//!
//! The fixed six-stage lifecycle of a mushroom production batch and the
//! status derivation built on top of it.
//!
//! ## Stage Order
//!
//! | Ordinal | Key | Label |
//! |---------|-----|-------|
//! | 0 | `batch_creation` | Batch Creation |
//! | 1 | `inoculation` | Inoculation |
//! | 2 | `incubation` | Incubation |
//! | 3 | `fruiting` | Fruiting |
//! | 4 | `harvesting` | Harvesting |
//! | 5 | `post_harvest` | Post-Harvest |
//!
//! A batch stores only a pointer to its current stage. Everything before the
//! pointer is `completed`, the pointer itself is `current`, and everything after
//! it is `pending`. There is no stage history: completion is implied by position.
//!
//! ## Unknown Stage Keys
//!
//! A `currentStage` outside the six keys is not an error here. It resolves to
//! position −1 and every stage reports `pending`. Callers that need to surface
//! the condition check [`Stage::from_key`] themselves.

use crate::primitives::{DEFAULT_STAGE_KEY, STAGE_COUNT, UNKNOWN_STAGE_POSITION};
use crate::SporetrackError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

// =============================================================================
// STAGE ENUM
// =============================================================================

/// Production stages, in lifecycle order.
///
/// The derived `Ord` follows the discriminants, so `Stage::Inoculation <
/// Stage::Fruiting` holds and comparisons never need a lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Batch registered, substrate sourced.
    BatchCreation = 0,
    /// Spawn introduced into the substrate.
    Inoculation = 1,
    /// Mycelium colonising the substrate.
    Incubation = 2,
    /// Pinning and fruit body development.
    Fruiting = 3,
    /// Fruit bodies picked and weighed.
    Harvesting = 4,
    /// Collection, grading and substrate reuse decisions.
    PostHarvest = 5,
}

impl Stage {
    /// Every stage in lifecycle order.
    pub const ALL: [Stage; STAGE_COUNT] = [
        Stage::BatchCreation,
        Stage::Inoculation,
        Stage::Incubation,
        Stage::Fruiting,
        Stage::Harvesting,
        Stage::PostHarvest,
    ];

    /// Get the stage key as stored on batch records.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Stage::BatchCreation => "batch_creation",
            Stage::Inoculation => "inoculation",
            Stage::Incubation => "incubation",
            Stage::Fruiting => "fruiting",
            Stage::Harvesting => "harvesting",
            Stage::PostHarvest => "post_harvest",
        }
    }

    /// Get the human-readable stage name.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Stage::BatchCreation => "Batch Creation",
            Stage::Inoculation => "Inoculation",
            Stage::Incubation => "Incubation",
            Stage::Fruiting => "Fruiting",
            Stage::Harvesting => "Harvesting",
            Stage::PostHarvest => "Post-Harvest",
        }
    }

    /// Zero-based position in the lifecycle.
    #[must_use]
    pub const fn ordinal(&self) -> usize {
        *self as usize
    }

    /// Look up a stage by its stored key. Matching is exact.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Stage> {
        Stage::ALL.into_iter().find(|stage| stage.key() == key)
    }

    /// Position of a key in the fixed order, or −1 if it is not a stage key.
    #[must_use]
    pub fn position(key: &str) -> i32 {
        Stage::from_key(key)
            .map(|stage| stage.ordinal() as i32)
            .unwrap_or(UNKNOWN_STAGE_POSITION)
    }

    /// Get the next stage, if any.
    #[must_use]
    pub fn next(&self) -> Option<Stage> {
        Stage::ALL.get(self.ordinal().saturating_add(1)).copied()
    }

    /// Get the previous stage, if any.
    #[must_use]
    pub fn previous(&self) -> Option<Stage> {
        self.ordinal()
            .checked_sub(1)
            .and_then(|i| Stage::ALL.get(i))
            .copied()
    }

    /// Check if this stage is terminal (post-harvest).
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::PostHarvest)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Stage {
    type Err = SporetrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::from_key(s).ok_or_else(|| SporetrackError::UnknownStage(s.to_string()))
    }
}

/// Resolve the stored `currentStage` of a batch.
///
/// An absent value means the batch was just created. A present but unknown
/// value resolves to `None`.
#[must_use]
pub fn resolve_current_stage(raw: Option<&str>) -> Option<Stage> {
    Stage::from_key(raw.unwrap_or(DEFAULT_STAGE_KEY))
}

// =============================================================================
// STAGE STATUS
// =============================================================================

/// Derived status of one stage relative to a batch's current stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Completed,
    Current,
    Pending,
}

impl StageStatus {
    /// Get the status as a lowercase string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            StageStatus::Completed => "completed",
            StageStatus::Current => "current",
            StageStatus::Pending => "pending",
        }
    }

    /// Only the in-progress stage may be edited.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, StageStatus::Current)
    }

    /// Progression rank: completed (2) > current (1) > pending (0).
    #[must_use]
    pub fn rank(&self) -> u8 {
        match self {
            StageStatus::Completed => 2,
            StageStatus::Current => 1,
            StageStatus::Pending => 0,
        }
    }
}

impl std::fmt::Display for StageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// STATUS DERIVATION
// =============================================================================

/// Derive the status of `stage` for a batch whose current stage is `current`.
///
/// `None` stands for an unrecognized current stage; every stage is then pending.
#[must_use]
pub fn derive_stage_status(current: Option<Stage>, stage: Stage) -> StageStatus {
    let Some(current) = current else {
        return StageStatus::Pending;
    };

    match stage.cmp(&current) {
        Ordering::Less => StageStatus::Completed,
        Ordering::Equal => StageStatus::Current,
        Ordering::Greater => StageStatus::Pending,
    }
}

/// Derive a status from raw stage keys.
///
/// If either key is not a known stage the result is `pending`. Never fails.
#[must_use]
pub fn derive_stage_status_by_key(current_key: &str, stage_key: &str) -> StageStatus {
    let current = Stage::position(current_key);
    let stage = Stage::position(stage_key);

    if current == UNKNOWN_STAGE_POSITION || stage == UNKNOWN_STAGE_POSITION {
        return StageStatus::Pending;
    }

    match stage.cmp(&current) {
        Ordering::Less => StageStatus::Completed,
        Ordering::Equal => StageStatus::Current,
        Ordering::Greater => StageStatus::Pending,
    }
}

// =============================================================================
// WORKFLOW PROGRESS
// =============================================================================

/// How far a batch has moved through the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowProgress {
    /// Current stage, or `None` if the stored key is unknown.
    pub current: Option<Stage>,
    /// Stage that follows the current one.
    pub next: Option<Stage>,
    /// Number of stages before the current one.
    pub completed: usize,
    /// Total number of stages.
    pub total: usize,
    /// `completed * 100 / total`, integer division.
    pub percent: u8,
}

impl WorkflowProgress {
    /// Compute progress from a resolved current stage.
    #[must_use]
    pub fn from_current(current: Option<Stage>) -> Self {
        let completed = current.map(|stage| stage.ordinal()).unwrap_or(0);
        let percent = (completed.saturating_mul(100) / STAGE_COUNT).min(100) as u8;

        Self {
            current,
            next: current.and_then(|stage| stage.next()),
            completed,
            total: STAGE_COUNT,
            percent,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
