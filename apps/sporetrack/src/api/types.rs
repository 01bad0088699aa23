//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sporetrack_core::{BreakEven, ProductionBatch, Stage, StageField, StageSummary, Workflow};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Error body shared by all endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

// =============================================================================
// STAGES RESPONSE
// =============================================================================

/// One entry of the fixed stage order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageInfo {
    pub key: String,
    pub label: String,
    pub ordinal: usize,
}

/// The fixed stage order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagesResponse {
    pub stages: Vec<StageInfo>,
}

impl Default for StagesResponse {
    fn default() -> Self {
        Self {
            stages: Stage::ALL
                .into_iter()
                .map(|stage| StageInfo {
                    key: stage.key().to_string(),
                    label: stage.label().to_string(),
                    ordinal: stage.ordinal(),
                })
                .collect(),
        }
    }
}

// =============================================================================
// WORKFLOW RESPONSE
// =============================================================================

/// One stage summary as sent to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageSummaryJson {
    pub stage: String,
    pub label: String,
    pub status: String,
    pub fields: Vec<StageField>,
    /// `true` only for the current stage.
    pub editable: bool,
}

impl From<&StageSummary> for StageSummaryJson {
    fn from(summary: &StageSummary) -> Self {
        Self {
            stage: summary.stage.key().to_string(),
            label: summary.label.to_string(),
            status: summary.status.as_str().to_string(),
            fields: summary.fields.clone(),
            editable: summary.edit.is_some(),
        }
    }
}

/// Workflow view of one batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowResponse {
    pub batch_number: String,
    pub current_stage: String,
    pub recognized: bool,
    pub completed_stages: usize,
    pub progress_percent: u8,
    pub next_stage: Option<String>,
    pub stages: Vec<StageSummaryJson>,
}

impl From<&Workflow> for WorkflowResponse {
    fn from(workflow: &Workflow) -> Self {
        Self {
            batch_number: workflow.batch_number.clone(),
            current_stage: workflow.current_stage_key.clone(),
            recognized: workflow.recognized,
            completed_stages: workflow.progress.completed,
            progress_percent: workflow.progress.percent,
            next_stage: workflow.progress.next.map(|s| s.key().to_string()),
            stages: workflow.stages.iter().map(StageSummaryJson::from).collect(),
        }
    }
}

// =============================================================================
// EDIT REQUEST/RESPONSE
// =============================================================================

/// Request to open the edit pathway for one stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditRequest {
    pub batch: ProductionBatch,
    pub stage: String,
}

/// Edit gate outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EditResponse {
    /// Create a success response naming the stage to edit.
    pub fn success(batch_number: impl Into<String>, stage: Stage) -> Self {
        Self {
            success: true,
            batch_number: Some(batch_number.into()),
            stage: Some(stage.key().to_string()),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            batch_number: None,
            stage: None,
            error: Some(message.into()),
        }
    }
}

// =============================================================================
// BREAK-EVEN REQUEST/RESPONSE
// =============================================================================

/// Cost structure to evaluate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakEvenRequest {
    pub fixed_costs: Decimal,
    pub price_per_kg: Decimal,
    pub variable_cost_per_kg: Decimal,
    /// Optional sales volume to project profit for.
    #[serde(default)]
    pub projected_kg: Option<Decimal>,
}

impl BreakEvenRequest {
    pub fn to_plan(&self) -> BreakEven {
        BreakEven::new(self.fixed_costs, self.price_per_kg, self.variable_cost_per_kg)
    }
}

/// Break-even evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakEvenResponse {
    pub unit_margin: Decimal,
    /// `None` when the unit margin is not positive.
    pub break_even_kg: Option<Decimal>,
    pub projected_profit: Option<Decimal>,
}

impl BreakEvenResponse {
    pub fn evaluate(request: &BreakEvenRequest) -> Self {
        let plan = request.to_plan();
        Self {
            unit_margin: plan.unit_margin(),
            break_even_kg: plan.break_even_kg(),
            projected_profit: request.projected_kg.map(|kg| plan.projected_profit(kg)),
        }
    }
}
