//! # Workflow View
//!
//! Assembles the six stage summaries shown for a batch and gates the edit
//! action.
//!
//! The view is derived, never stored. Only the summary whose status is
//! `current` carries an [`EditAction`]; every other summary has none, so the
//! edit pathway for a completed or pending stage cannot be reached through
//! the view at all.

use super::fields::{StageField, project_stage_fields};
use super::stage::{Stage, StageStatus, WorkflowProgress, derive_stage_status};
use crate::batch::ProductionBatch;
use crate::format::DateStyle;
use crate::SporetrackError;
use serde::Serialize;

// =============================================================================
// EDIT CALLBACK
// =============================================================================

/// Receives edit requests for the in-progress stage.
///
/// The host owns the actual edit form and the API mutation. Any
/// `FnMut(Stage)` closure is a handler.
pub trait EditStageHandler {
    fn on_edit_stage(&mut self, stage: Stage);
}

impl<F> EditStageHandler for F
where
    F: FnMut(Stage),
{
    fn on_edit_stage(&mut self, stage: Stage) {
        self(stage);
    }
}

/// An enabled edit action. Only constructed for the current stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EditAction {
    stage: Stage,
}

impl EditAction {
    /// The stage this action edits.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Ask the host to edit this stage.
    pub fn trigger<H>(&self, handler: &mut H)
    where
        H: EditStageHandler + ?Sized,
    {
        handler.on_edit_stage(self.stage);
    }
}

// =============================================================================
// STAGE SUMMARY
// =============================================================================

/// Display view of one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageSummary {
    pub stage: Stage,
    pub label: &'static str,
    pub status: StageStatus,
    pub fields: Vec<StageField>,
    /// Present only when `status` is `current`.
    pub edit: Option<EditAction>,
}

impl StageSummary {
    fn build(batch: &ProductionBatch, current: Option<Stage>, stage: Stage, style: DateStyle) -> Self {
        let status = derive_stage_status(current, stage);

        Self {
            stage,
            label: stage.label(),
            status,
            fields: project_stage_fields(batch, stage, style),
            edit: status.is_editable().then_some(EditAction { stage }),
        }
    }
}

// =============================================================================
// WORKFLOW
// =============================================================================

/// The full derived view of a batch: six summaries in lifecycle order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Workflow {
    pub batch_number: String,
    /// Stage key as stored, after defaulting an absent value.
    pub current_stage_key: String,
    /// `false` when the stored key is not one of the six stages.
    pub recognized: bool,
    pub progress: WorkflowProgress,
    pub stages: Vec<StageSummary>,
}

impl Workflow {
    /// Derive the workflow view of a batch.
    #[must_use]
    pub fn for_batch(batch: &ProductionBatch, style: DateStyle) -> Self {
        let current = batch.current_stage();

        Self {
            batch_number: batch.batch_number.clone(),
            current_stage_key: batch.current_stage_key().to_string(),
            recognized: current.is_some(),
            progress: WorkflowProgress::from_current(current),
            stages: Stage::ALL
                .into_iter()
                .map(|stage| StageSummary::build(batch, current, stage, style))
                .collect(),
        }
    }

    /// Fail if the stored stage key is not a known stage.
    pub fn require_recognized(&self) -> Result<&Self, SporetrackError> {
        if self.recognized {
            Ok(self)
        } else {
            Err(SporetrackError::UnknownStage(self.current_stage_key.clone()))
        }
    }

    /// Summary for one stage.
    #[must_use]
    pub fn summary(&self, stage: Stage) -> Option<&StageSummary> {
        self.stages.get(stage.ordinal())
    }

    /// The single stage that may be edited, if the current stage is known.
    #[must_use]
    pub fn editable_stage(&self) -> Option<Stage> {
        self.stages
            .iter()
            .find_map(|summary| summary.edit.map(|action| action.stage()))
    }

    /// Request an edit of `stage`.
    ///
    /// The handler is invoked only if `stage` is the current stage. Otherwise
    /// nothing is called and `StageNotEditable` is returned.
    pub fn on_edit_stage<H>(&self, stage: Stage, handler: &mut H) -> Result<(), SporetrackError>
    where
        H: EditStageHandler + ?Sized,
    {
        let summary = self
            .summary(stage)
            .ok_or_else(|| SporetrackError::UnknownStage(stage.key().to_string()))?;

        match summary.edit {
            Some(action) => {
                action.trigger(handler);
                Ok(())
            }
            None => Err(SporetrackError::StageNotEditable {
                stage,
                status: summary.status,
            }),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
