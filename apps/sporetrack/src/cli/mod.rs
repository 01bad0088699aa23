//! # Sporetrack CLI Module
//!
//! This module implements the CLI interface for Sporetrack.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `stages` - List the fixed stage order
//! - `workflow` - Show the six stage summaries of a batch
//! - `edit` - Request an edit of one stage (current stage only)
//! - `summary` - Stage distribution and yield totals of a batch list
//! - `break-even` - Break-even volume for a cost structure
//! - `config` - Show the effective configuration

mod commands;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use sporetrack_core::{DateStyle, SporetrackError};
use sporetrack::config::Config;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Sporetrack - production batch workflow tracker
///
/// Derives stage status, stage fields and edit eligibility for mushroom
/// production batches, plus yield and break-even figures.
#[derive(Parser, Debug)]
#[command(name = "sporetrack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the TOML configuration file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Date style override: us, eu, iso or long
    #[arg(long, global = true)]
    pub date_style: Option<DateStyle>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides config)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List the fixed stage order
    Stages,

    /// Show the workflow view of a batch
    Workflow {
        /// Path to a batch JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Request an edit of one stage
    Edit {
        /// Path to a batch JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Stage key to edit (e.g. fruiting)
        #[arg(short, long)]
        stage: String,
    },

    /// Stage distribution and yield totals of a batch list
    Summary {
        /// Path to a JSON array of batches
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Break-even volume for a cost structure
    BreakEven {
        /// Fixed costs of the production cycle
        #[arg(long)]
        fixed_costs: Decimal,

        /// Selling price per kilogram
        #[arg(long)]
        price: Decimal,

        /// Variable cost per kilogram
        #[arg(long, default_value = "0")]
        variable_cost: Decimal,
    },

    /// Show the effective configuration
    Config,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), SporetrackError> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(style) = cli.date_style {
        config.render.date_style = style;
    }
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            cmd_server(config).await
        }
        Some(Commands::Stages) | None => cmd_stages(json_mode),
        Some(Commands::Workflow { file }) => cmd_workflow(&config, &file, json_mode),
        Some(Commands::Edit { file, stage }) => cmd_edit(&config, &file, &stage, json_mode),
        Some(Commands::Summary { file }) => cmd_summary(&file, json_mode),
        Some(Commands::BreakEven {
            fixed_costs,
            price,
            variable_cost,
        }) => cmd_break_even(fixed_costs, price, variable_cost, json_mode),
        Some(Commands::Config) => cmd_config(&config),
    }
}
