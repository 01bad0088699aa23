//! # Workflow Tier Tests (T0-T3)
//!
//! If ANY tier fails, the workflow view is INVALID.
//!
//! ## Tiers
//! - T0: Stage Resolution
//! - T1: Status Derivation
//! - T2: Field Projection
//! - T3: Edit Gating

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sporetrack_core::{
    DateStyle, ProductionBatch, Stage, StageStatus, SporetrackError, Workflow,
    project_stage_fields,
};

fn field<'a>(workflow: &'a Workflow, stage: Stage, label: &str) -> &'a str {
    workflow
        .summary(stage)
        .and_then(|s| s.fields.iter().find(|f| f.label == label))
        .map(|f| f.value.as_str())
        .unwrap_or("<missing field>")
}

// =============================================================================
// TIER T0: STAGE RESOLUTION
// =============================================================================

mod t0_stage_resolution {
    use super::*;

    /// T0.1: Absent currentStage means batch creation.
    #[test]
    fn absent_stage_is_batch_creation() {
        let workflow = Workflow::for_batch(&ProductionBatch::new("B-1"), DateStyle::Iso);

        assert!(workflow.recognized);
        assert_eq!(workflow.current_stage_key, "batch_creation");
        assert_eq!(
            workflow.summary(Stage::BatchCreation).map(|s| s.status),
            Some(StageStatus::Current)
        );
    }

    /// T0.2: Stage keys decode from the API's JSON.
    #[test]
    fn stage_key_from_json() {
        let batch: ProductionBatch =
            serde_json::from_str(r#"{"batchNumber":"B-2","currentStage":"post_harvest"}"#)
                .expect("decode");

        assert_eq!(batch.current_stage(), Some(Stage::PostHarvest));
    }

    /// T0.3: Unknown stage keys are kept verbatim and flagged.
    #[test]
    fn unknown_stage_flagged() {
        let batch = ProductionBatch::new("B-3").with_stage("unknown_stage");
        let workflow = Workflow::for_batch(&batch, DateStyle::Iso);

        assert!(!workflow.recognized);
        assert_eq!(workflow.current_stage_key, "unknown_stage");
        assert!(workflow.progress.current.is_none());
    }
}

// =============================================================================
// TIER T1: STATUS DERIVATION
// =============================================================================

mod t1_status_derivation {
    use super::*;

    /// T1.1: Statuses around a mid-lifecycle stage.
    #[test]
    fn mid_lifecycle_statuses() {
        let batch = ProductionBatch::new("B-1").with_stage("fruiting");
        let workflow = Workflow::for_batch(&batch, DateStyle::Iso);

        let statuses: Vec<StageStatus> = workflow.stages.iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            vec![
                StageStatus::Completed,
                StageStatus::Completed,
                StageStatus::Completed,
                StageStatus::Current,
                StageStatus::Pending,
                StageStatus::Pending,
            ]
        );
    }

    /// T1.2: Unrecognized stage renders all six stages pending.
    #[test]
    fn unrecognized_stage_all_pending() {
        let batch = ProductionBatch::new("B-1").with_stage("unknown_stage");
        let workflow = Workflow::for_batch(&batch, DateStyle::Iso);

        assert_eq!(workflow.stages.len(), 6);
        for summary in &workflow.stages {
            assert_eq!(summary.status, StageStatus::Pending, "{}", summary.stage);
        }
    }

    /// T1.3: Completion is implied by position, even with no stage data.
    #[test]
    fn completion_implied_by_position() {
        let batch = ProductionBatch::new("B-1").with_stage("harvesting");
        let workflow = Workflow::for_batch(&batch, DateStyle::Iso);

        let incubation = workflow.summary(Stage::Incubation).expect("summary");
        assert_eq!(incubation.status, StageStatus::Completed);
        assert!(incubation.fields.iter().all(|f| !f.recorded));
    }
}

// =============================================================================
// TIER T2: FIELD PROJECTION
// =============================================================================

mod t2_field_projection {
    use super::*;

    /// T2.1: Missing inoculation date on the current stage reads "Not started".
    #[test]
    fn missing_inoculation_date_not_started() {
        let batch = ProductionBatch::new("B-1").with_stage("inoculation");
        let workflow = Workflow::for_batch(&batch, DateStyle::Us);

        assert_eq!(
            workflow.summary(Stage::Inoculation).map(|s| s.status),
            Some(StageStatus::Current)
        );
        assert_eq!(field(&workflow, Stage::Inoculation, "Inoculation Date"), "Not started");
        assert_eq!(field(&workflow, Stage::Inoculation, "Spawn Quantity"), "Not recorded");
    }

    /// T2.2: Placeholders depend on field meaning.
    #[test]
    fn placeholders_follow_field_semantics() {
        let workflow = Workflow::for_batch(&ProductionBatch::new(""), DateStyle::Us);

        assert_eq!(field(&workflow, Stage::BatchCreation, "Batch Number"), "Not set");
        assert_eq!(field(&workflow, Stage::BatchCreation, "Supplier"), "Not set");
        assert_eq!(field(&workflow, Stage::BatchCreation, "Added By"), "Not recorded");
        assert_eq!(field(&workflow, Stage::Incubation, "Substrate Condition"), "Not assessed");
        assert_eq!(field(&workflow, Stage::Fruiting, "Light Exposure"), "Not set");
        assert_eq!(field(&workflow, Stage::PostHarvest, "Reuse Status"), "Not assessed");
    }

    /// T2.3: Recorded values are formatted with dates and units.
    #[test]
    fn recorded_values_formatted() {
        let mut batch = ProductionBatch::new("LM-2024-03").with_stage("post_harvest");
        batch.start_date = NaiveDate::from_ymd_opt(2024, 3, 5);
        batch.supplier = Some("Hillside Spawn Co.".to_string());
        batch.spawn_quantity = Some(Decimal::new(500, 0));
        batch.temperature = Some(Decimal::new(235, 1));
        batch.humidity = Some(Decimal::new(90, 0));
        batch.collected_weight = Some(Decimal::new(875, 2));

        let workflow = Workflow::for_batch(&batch, DateStyle::Long);

        assert_eq!(field(&workflow, Stage::BatchCreation, "Batch Number"), "LM-2024-03");
        assert_eq!(field(&workflow, Stage::BatchCreation, "Start Date"), "Mar 5, 2024");
        assert_eq!(field(&workflow, Stage::BatchCreation, "Supplier"), "Hillside Spawn Co.");
        assert_eq!(field(&workflow, Stage::Inoculation, "Spawn Quantity"), "500 g");
        assert_eq!(field(&workflow, Stage::Incubation, "Temperature"), "23.5°C");
        assert_eq!(field(&workflow, Stage::Fruiting, "Humidity"), "90%");
        assert_eq!(field(&workflow, Stage::PostHarvest, "Collected Weight"), "8.75 kg");
    }

    /// T2.4: Projection is the same whether called directly or via the view.
    #[test]
    fn projection_matches_view() {
        let mut batch = ProductionBatch::new("B-1").with_stage("incubation");
        batch.incubation_start_date = NaiveDate::from_ymd_opt(2024, 1, 9);

        let workflow = Workflow::for_batch(&batch, DateStyle::Eu);
        let direct = project_stage_fields(&batch, Stage::Incubation, DateStyle::Eu);

        assert_eq!(
            workflow.summary(Stage::Incubation).map(|s| s.fields.clone()),
            Some(direct)
        );
        assert_eq!(field(&workflow, Stage::Incubation, "Incubation Start"), "09/01/2024");
    }
}

// =============================================================================
// TIER T3: EDIT GATING
// =============================================================================

mod t3_edit_gating {
    use super::*;

    /// T3.1: Only the fruiting summary exposes an edit action, and it passes "fruiting".
    #[test]
    fn fruiting_is_the_only_edit_target() {
        let batch = ProductionBatch::new("B-1").with_stage("fruiting");
        let workflow = Workflow::for_batch(&batch, DateStyle::Iso);

        let actions: Vec<Stage> = workflow
            .stages
            .iter()
            .filter_map(|s| s.edit.map(|a| a.stage()))
            .collect();
        assert_eq!(actions, vec![Stage::Fruiting]);

        let mut received: Vec<&'static str> = Vec::new();
        let mut handler = |stage: Stage| received.push(stage.key());
        if let Some(action) = workflow.summary(Stage::Fruiting).and_then(|s| s.edit) {
            action.trigger(&mut handler);
        }
        assert_eq!(received, vec!["fruiting"]);
    }

    /// T3.2: Gated entry point refuses every non-current stage.
    #[test]
    fn gated_entry_refuses_other_stages() {
        let batch = ProductionBatch::new("B-1").with_stage("fruiting");
        let workflow = Workflow::for_batch(&batch, DateStyle::Iso);

        let mut calls: Vec<Stage> = Vec::new();
        for stage in Stage::ALL {
            let result = workflow.on_edit_stage(stage, &mut |s: Stage| calls.push(s));
            if stage == Stage::Fruiting {
                assert!(result.is_ok());
            } else {
                assert!(matches!(
                    result,
                    Err(SporetrackError::StageNotEditable { .. })
                ));
            }
        }
        assert_eq!(calls, vec![Stage::Fruiting]);
    }

    /// T3.3: Unknown stage leaves nothing editable.
    #[test]
    fn unknown_stage_nothing_editable() {
        let batch = ProductionBatch::new("B-1").with_stage("unknown_stage");
        let workflow = Workflow::for_batch(&batch, DateStyle::Iso);

        for stage in Stage::ALL {
            assert!(workflow.on_edit_stage(stage, &mut |_: Stage| {}).is_err());
        }
    }
}
