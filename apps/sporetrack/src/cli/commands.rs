//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use rust_decimal::Decimal;
use sporetrack::{
    api,
    config::Config,
    input::{load_batch, load_batches},
};
use sporetrack_core::{
    BreakEven, ProductionBatch, SporetrackError, Stage, StageDistribution, StageStatus, Workflow,
    YieldSummary,
};
use std::path::Path;

/// Derive a workflow view, applying the unknown-stage policy.
fn derive_workflow(config: &Config, batch: &ProductionBatch) -> Result<Workflow, SporetrackError> {
    let workflow = Workflow::for_batch(batch, config.render.date_style);

    if !workflow.recognized {
        if config.render.strict_stages {
            workflow.require_recognized()?;
        }
        tracing::warn!(
            "Batch {:?} has unrecognized stage {:?}; all stages shown as pending",
            workflow.batch_number,
            workflow.current_stage_key
        );
    }

    Ok(workflow)
}

fn print_json(value: &impl serde::Serialize) -> Result<(), SporetrackError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| SporetrackError::SerializationError(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(config: Config) -> Result<(), SporetrackError> {
    println!("Sporetrack Workflow Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Address:       {}", config.bind_address());
    println!("  Date style:    {}", config.render.date_style);
    println!("  Strict stages: {}", config.render.strict_stages);
    println!("  Rate limit:    {} req/s", config.server.rate_limit);
    println!();
    println!("Endpoints:");
    println!("  GET  /health                 - Health check");
    println!("  GET  /stages                 - Stage order");
    println!("  POST /workflow               - Stage summaries for a batch");
    println!("  POST /workflow/edit          - Request a stage edit");
    println!("  POST /analytics/yield        - Yield totals");
    println!("  POST /analytics/distribution - Batches per stage");
    println!("  POST /analytics/break-even   - Break-even volume");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(config).await
}

// =============================================================================
// STAGES COMMAND
// =============================================================================

/// List the fixed stage order.
pub fn cmd_stages(json_mode: bool) -> Result<(), SporetrackError> {
    if json_mode {
        return print_json(&api::StagesResponse::default());
    }

    println!("Production Stages");
    println!("=================");
    for stage in Stage::ALL {
        println!("  {}. {:<16} ({})", stage.ordinal() + 1, stage.label(), stage.key());
    }
    Ok(())
}

// =============================================================================
// WORKFLOW COMMAND
// =============================================================================

/// Show the six stage summaries of a batch.
pub fn cmd_workflow(config: &Config, file: &Path, json_mode: bool) -> Result<(), SporetrackError> {
    let batch = load_batch(file)?;
    let workflow = derive_workflow(config, &batch)?;

    if json_mode {
        return print_json(&api::WorkflowResponse::from(&workflow));
    }

    println!("Batch {}", workflow.batch_number);
    println!("==========={}", "=".repeat(workflow.batch_number.chars().count()));
    match workflow.progress.current {
        Some(stage) => println!(
            "Current stage: {} ({}% complete)",
            stage.label(),
            workflow.progress.percent
        ),
        None => println!(
            "Current stage: {:?} (unrecognized)",
            workflow.current_stage_key
        ),
    }
    println!();

    for summary in &workflow.stages {
        let marker = match summary.status {
            StageStatus::Completed => "✓",
            StageStatus::Current => "▶",
            StageStatus::Pending => "·",
        };
        let edit = if summary.edit.is_some() { "  [editable]" } else { "" };
        println!("{} {:<16} {}{}", marker, summary.label, summary.status, edit);

        for field in &summary.fields {
            println!("    {:<20} {}", format!("{}:", field.label), field.value);
        }
    }

    Ok(())
}

// =============================================================================
// EDIT COMMAND
// =============================================================================

/// Request an edit of one stage. Only the current stage is accepted.
pub fn cmd_edit(
    config: &Config,
    file: &Path,
    stage: &str,
    json_mode: bool,
) -> Result<(), SporetrackError> {
    let stage: Stage = stage.parse()?;
    let batch = load_batch(file)?;
    let workflow = derive_workflow(config, &batch)?;

    let mut granted = None;
    let outcome = workflow.on_edit_stage(stage, &mut |s: Stage| granted = Some(s));
    let outcome = outcome.map(|()| granted.unwrap_or(stage));

    if json_mode {
        print_json(&edit_response(&workflow.batch_number, &outcome))?;
    }

    let stage = outcome?;
    tracing::info!("Edit granted for {} on batch {}", stage, workflow.batch_number);
    if !json_mode {
        println!("Edit request: batch {} stage {}", workflow.batch_number, stage.key());
    }
    Ok(())
}

/// JSON body for an edit outcome, refused or granted.
fn edit_response(batch_number: &str, outcome: &Result<Stage, SporetrackError>) -> api::EditResponse {
    match outcome {
        Ok(stage) => api::EditResponse::success(batch_number, *stage),
        Err(e) => api::EditResponse::error(e.to_string()),
    }
}

// =============================================================================
// SUMMARY COMMAND
// =============================================================================

/// Stage distribution and yield totals of a batch list.
pub fn cmd_summary(file: &Path, json_mode: bool) -> Result<(), SporetrackError> {
    let batches = load_batches(file)?;
    let distribution = StageDistribution::from_batches(&batches);
    let yields = YieldSummary::from_batches(&batches);

    if distribution.unrecognized > 0 {
        tracing::warn!(
            "{} batch(es) have an unrecognized stage",
            distribution.unrecognized
        );
    }

    if json_mode {
        return print_json(&serde_json::json!({
            "distribution": distribution,
            "yield": yields,
        }));
    }

    println!("Batch Summary");
    println!("=============");
    println!("Batches: {}", distribution.total);
    println!();
    println!("By stage:");
    for entry in &distribution.stages {
        println!("  {:<16} {}", entry.stage.label(), entry.count);
    }
    if distribution.unrecognized > 0 {
        println!("  {:<16} {}", "Unrecognized", distribution.unrecognized);
    }
    println!();
    println!("Yield:");
    println!("  Harvested batches: {}", yields.harvested_batches);
    println!("  Harvested:         {} kg", yields.harvested_kg.normalize());
    println!("  Damaged:           {} kg", yields.damaged_kg.normalize());
    println!("  Marketable:        {} kg", yields.marketable_kg.normalize());
    println!("  Collected:         {} kg", yields.collected_kg.normalize());
    match yields.damage_rate_percent {
        Some(rate) => println!("  Damage rate:       {}%", rate),
        None => println!("  Damage rate:       n/a"),
    }

    Ok(())
}

// =============================================================================
// BREAK-EVEN COMMAND
// =============================================================================

/// Break-even volume for a cost structure.
pub fn cmd_break_even(
    fixed_costs: Decimal,
    price: Decimal,
    variable_cost: Decimal,
    json_mode: bool,
) -> Result<(), SporetrackError> {
    let plan = BreakEven::new(fixed_costs, price, variable_cost);

    if json_mode {
        return print_json(&serde_json::json!({
            "unit_margin": plan.unit_margin(),
            "break_even_kg": plan.break_even_kg(),
        }));
    }

    println!("Unit margin:   {} per kg", plan.unit_margin().normalize());
    match plan.break_even_kg() {
        Some(kg) => println!("Break-even at: {} kg", kg),
        None => println!("Break-even at: never (price does not cover variable cost)"),
    }
    Ok(())
}

// =============================================================================
// CONFIG COMMAND
// =============================================================================

/// Show the effective configuration.
pub fn cmd_config(config: &Config) -> Result<(), SporetrackError> {
    print_json(config)
}

// =============================================================================
// TESTS
// =============================================================================
