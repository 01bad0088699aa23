//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Every handler is a pure derivation over the request body; the only
//! shared state is the read-only render configuration.

use super::{
    AppState,
    types::{
        BreakEvenRequest, BreakEvenResponse, EditRequest, EditResponse, ErrorResponse,
        HealthResponse, StagesResponse, WorkflowResponse,
    },
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sporetrack_core::{
    ProductionBatch, SporetrackError, Stage, StageDistribution, Workflow, YieldSummary,
    primitives::MAX_BATCHES_PER_REQUEST,
};

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// HTTP status for a core error.
fn error_status(error: &SporetrackError) -> StatusCode {
    match error {
        SporetrackError::UnknownStage(_) | SporetrackError::InvalidBatch(_) => {
            StatusCode::BAD_REQUEST
        }
        SporetrackError::StageNotEditable { .. } => StatusCode::CONFLICT,
        SporetrackError::SerializationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SporetrackError::IoError(_) | SporetrackError::ConfigError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(error: &SporetrackError) -> Response {
    (error_status(error), Json(ErrorResponse::new(error.to_string()))).into_response()
}

/// Derive the workflow view, applying the unknown-stage policy.
///
/// Lenient mode logs and renders all stages pending. Strict mode rejects
/// the record with 422.
fn derive_workflow(state: &AppState, batch: &ProductionBatch) -> Result<Workflow, Response> {
    batch.validate().map_err(|e| error_response(&e))?;

    let render = state.config.render;
    let workflow = Workflow::for_batch(batch, render.date_style);

    if !workflow.recognized {
        tracing::warn!(
            batch = %workflow.batch_number,
            stage = %workflow.current_stage_key,
            strict = render.strict_stages,
            "Unrecognized currentStage"
        );
        if render.strict_stages {
            let error = SporetrackError::UnknownStage(workflow.current_stage_key.clone());
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::new(error.to_string())),
            )
                .into_response());
        }
    }

    Ok(workflow)
}

/// Enforce the list size limit and validate every record.
fn check_batches(batches: &[ProductionBatch]) -> Result<(), Response> {
    if batches.len() > MAX_BATCHES_PER_REQUEST {
        return Err((
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(ErrorResponse::new(format!(
                "{} batches exceeds maximum of {}",
                batches.len(),
                MAX_BATCHES_PER_REQUEST
            ))),
        )
            .into_response());
    }

    for batch in batches {
        batch.validate().map_err(|e| {
            error_response(&SporetrackError::InvalidBatch(format!(
                "batch {:?}: {}",
                batch.batch_number, e
            )))
        })?;
    }
    Ok(())
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// STAGES HANDLER
// =============================================================================

/// List the fixed stage order.
pub async fn stages_handler() -> impl IntoResponse {
    Json(StagesResponse::default())
}

// =============================================================================
// WORKFLOW HANDLERS
// =============================================================================

/// Derive the six stage summaries for a batch.
pub async fn workflow_handler(
    State(state): State<AppState>,
    Json(batch): Json<ProductionBatch>,
) -> Response {
    match derive_workflow(&state, &batch) {
        Ok(workflow) => (StatusCode::OK, Json(WorkflowResponse::from(&workflow))).into_response(),
        Err(response) => response,
    }
}

/// Gate an edit request: only the current stage may be edited.
pub async fn edit_handler(
    State(state): State<AppState>,
    Json(request): Json<EditRequest>,
) -> Response {
    let stage = match request.stage.parse::<Stage>() {
        Ok(stage) => stage,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(EditResponse::error(e.to_string())))
                .into_response();
        }
    };

    let workflow = match derive_workflow(&state, &request.batch) {
        Ok(workflow) => workflow,
        Err(response) => return response,
    };

    let mut granted = None;
    let outcome = workflow.on_edit_stage(stage, &mut |s: Stage| granted = Some(s));
    match outcome {
        Ok(()) => {
            let stage = granted.unwrap_or(stage);
            tracing::info!(batch = %workflow.batch_number, %stage, "Stage edit granted");
            (
                StatusCode::OK,
                Json(EditResponse::success(workflow.batch_number.clone(), stage)),
            )
                .into_response()
        }
        Err(e) => {
            tracing::debug!(batch = %workflow.batch_number, %stage, "Stage edit refused: {}", e);
            (error_status(&e), Json(EditResponse::error(e.to_string()))).into_response()
        }
    }
}

// =============================================================================
// ANALYTICS HANDLERS
// =============================================================================

/// Aggregate yield over a batch list.
pub async fn yield_handler(Json(batches): Json<Vec<ProductionBatch>>) -> Response {
    if let Err(response) = check_batches(&batches) {
        return response;
    }
    (StatusCode::OK, Json(YieldSummary::from_batches(&batches))).into_response()
}

/// Count batches per stage.
pub async fn distribution_handler(Json(batches): Json<Vec<ProductionBatch>>) -> Response {
    if let Err(response) = check_batches(&batches) {
        return response;
    }

    let distribution = StageDistribution::from_batches(&batches);
    if distribution.unrecognized > 0 {
        tracing::warn!(
            count = distribution.unrecognized,
            "Batches with unrecognized currentStage"
        );
    }
    (StatusCode::OK, Json(distribution)).into_response()
}

/// Evaluate a break-even plan.
pub async fn break_even_handler(Json(request): Json<BreakEvenRequest>) -> Response {
    (StatusCode::OK, Json(BreakEvenResponse::evaluate(&request))).into_response()
}
