//! # sporetrack-core
//!
//! The production batch workflow engine for Sporetrack - THE LOGIC.
//!
//! A mushroom production batch moves through six fixed stages:
//!
//! ```text
//! batch_creation → inoculation → incubation → fruiting → harvesting → post_harvest
//! ```
//!
//! The batch record stores only a pointer to its current stage. This crate
//! derives everything else from that pointer: the status of each stage, the
//! fields each stage displays, which stage may be edited, progress through
//! the lifecycle, and dashboard analytics over many batches.
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Never performs I/O; batch records are fetched and stored upstream
//! - Never writes `currentStage`; stage advancement belongs to the farm API
//! - Is referentially transparent: same record in, same view out
//! - Has NO async, NO network dependencies, NO floats

// =============================================================================
// MODULES
// =============================================================================

pub mod analytics;
pub mod batch;
pub mod format;
pub mod primitives;
pub mod types;
pub mod workflow;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::SporetrackError;

pub use batch::{AttributeValue, BatchAttribute, ProductionBatch, parse_date};
pub use format::{DateStyle, Placeholder, Unit, format_date, format_measure};

// =============================================================================
// RE-EXPORTS: Workflow Engine
// =============================================================================

pub use workflow::{
    EditAction, EditStageHandler, FieldSpec, STAGE_FIELDS, Stage, StageField, StageStatus,
    StageSummary, Workflow, WorkflowProgress, derive_stage_status, derive_stage_status_by_key,
    field_specs, project_stage_fields, resolve_current_stage,
};

// =============================================================================
// RE-EXPORTS: Analytics
// =============================================================================

pub use analytics::{BreakEven, StageCount, StageDistribution, YieldSummary};
