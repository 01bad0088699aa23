//! Unit tests for API types serialization/deserialization.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use rust_decimal::Decimal;
use sporetrack::api::{
    BreakEvenRequest, BreakEvenResponse, EditRequest, EditResponse, ErrorResponse,
    HealthResponse, StagesResponse, WorkflowResponse,
};
use sporetrack_core::{DateStyle, ProductionBatch, Stage, Workflow};

// =============================================================================
// HEALTH RESPONSE TESTS
// =============================================================================

#[test]
fn test_health_response_default() {
    let health = HealthResponse::default();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

#[test]
fn test_health_response_serialization() {
    let health = HealthResponse {
        status: "ok".to_string(),
        version: "0.4.2".to_string(),
    };

    let json = serde_json::to_string(&health).unwrap();
    assert!(json.contains("\"status\":\"ok\""));
    assert!(json.contains("\"version\":\"0.4.2\""));
}

// =============================================================================
// ERROR RESPONSE TESTS
// =============================================================================

#[test]
fn test_error_response_serialization() {
    let error = ErrorResponse::new("Unknown stage: \"drying\"");
    let json = serde_json::to_string(&error).unwrap();
    assert_eq!(json, r#"{"error":"Unknown stage: \"drying\""}"#);
}

// =============================================================================
// STAGES RESPONSE TESTS
// =============================================================================

#[test]
fn test_stages_response_default_lists_all_stages() {
    let stages = StagesResponse::default();

    assert_eq!(stages.stages.len(), 6);
    for (i, info) in stages.stages.iter().enumerate() {
        assert_eq!(info.ordinal, i);
    }
    assert_eq!(stages.stages[0].key, "batch_creation");
    assert_eq!(stages.stages[0].label, "Batch Creation");
}

// =============================================================================
// WORKFLOW RESPONSE TESTS
// =============================================================================

#[test]
fn test_workflow_response_from_workflow() {
    let batch = ProductionBatch::new("B-9").with_stage("harvesting");
    let workflow = Workflow::for_batch(&batch, DateStyle::Us);
    let response = WorkflowResponse::from(&workflow);

    assert_eq!(response.batch_number, "B-9");
    assert_eq!(response.current_stage, "harvesting");
    assert_eq!(response.completed_stages, 4);
    assert_eq!(response.next_stage.as_deref(), Some("post_harvest"));
    assert_eq!(response.stages.len(), 6);
    assert!(response.stages[4].editable);
    assert_eq!(response.stages.iter().filter(|s| s.editable).count(), 1);
}

#[test]
fn test_workflow_response_terminal_stage() {
    let batch = ProductionBatch::new("B-10").with_stage("post_harvest");
    let response = WorkflowResponse::from(&Workflow::for_batch(&batch, DateStyle::Us));

    assert!(response.next_stage.is_none());
    assert_eq!(response.stages[5].status, "current");
}

#[test]
fn test_workflow_response_serialization() {
    let batch = ProductionBatch::new("B-11").with_stage("fruiting");
    let response = WorkflowResponse::from(&Workflow::for_batch(&batch, DateStyle::Us));

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"current_stage\":\"fruiting\""));
    assert!(json.contains("\"status\":\"current\""));
    assert!(json.contains("\"editable\":true"));
}

// =============================================================================
// EDIT REQUEST/RESPONSE TESTS
// =============================================================================

#[test]
fn test_edit_request_deserialization() {
    let json = r#"{"batch":{"batchNumber":"B-1","currentStage":"incubation"},"stage":"incubation"}"#;
    let request: EditRequest = serde_json::from_str(json).unwrap();

    assert_eq!(request.batch.batch_number, "B-1");
    assert_eq!(request.batch.current_stage(), Some(Stage::Incubation));
    assert_eq!(request.stage, "incubation");
}

#[test]
fn test_edit_response_success() {
    let response = EditResponse::success("B-1", Stage::Fruiting);

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"success\":true"));
    assert!(json.contains("\"stage\":\"fruiting\""));
    assert!(!json.contains("error"));
}

#[test]
fn test_edit_response_error() {
    let response = EditResponse::error("Stage incubation is completed");

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"success\":false"));
    assert!(!json.contains("batch_number"));
    assert!(!json.contains("\"stage\""));
}

// =============================================================================
// BREAK-EVEN TESTS
// =============================================================================

#[test]
fn test_break_even_request_numbers_or_strings() {
    let json = r#"{"fixed_costs":"1500.50","price_per_kg":10,"variable_cost_per_kg":"2.5"}"#;
    let request: BreakEvenRequest = serde_json::from_str(json).unwrap();

    assert_eq!(request.fixed_costs, Decimal::new(150050, 2));
    assert_eq!(request.price_per_kg, Decimal::new(10, 0));
    assert!(request.projected_kg.is_none());
}

#[test]
fn test_break_even_response_rounds_up() {
    let request = BreakEvenRequest {
        fixed_costs: Decimal::new(100, 0),
        price_per_kg: Decimal::new(3, 0),
        variable_cost_per_kg: Decimal::ZERO,
        projected_kg: None,
    };

    let response = BreakEvenResponse::evaluate(&request);
    assert_eq!(response.break_even_kg, Some(Decimal::new(3334, 2)));
}
