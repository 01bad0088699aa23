//! # Sporetrack - Production Batch Workflow Server
//!
//! The main binary for the Sporetrack batch workflow engine.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface over batch JSON files exported from the farm API
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │              apps/sporetrack (THE BINARY)            │
//! │                                                      │
//! │   ┌─────────────┐        ┌─────────────┐             │
//! │   │    CLI      │        │  HTTP API   │             │
//! │   │   (clap)    │        │   (axum)    │             │
//! │   └──────┬──────┘        └──────┬──────┘             │
//! │          └───────────┬──────────┘                    │
//! │                      ▼                               │
//! │             ┌─────────────────┐                      │
//! │             │ sporetrack-core │                      │
//! │             │   (THE LOGIC)   │                      │
//! │             └─────────────────┘                      │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! sporetrack server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! sporetrack workflow -f batch.json
//! sporetrack edit -f batch.json -s fruiting
//! sporetrack summary -f batches.json
//! ```

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // SPORETRACK_LOG_FORMAT=json enables machine-parseable output.
    let log_format =
        std::env::var("SPORETRACK_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "sporetrack=debug,sporetrack_core=debug,tower_http=debug"
    } else {
        "sporetrack=info,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Sporetrack startup banner.
fn print_banner() {
    println!(
        r#"
  ___ _ __   ___  _ __ ___| |_ _ __ __ _  ___| | __
 / __| '_ \ / _ \| '__/ _ \ __| '__/ _` |/ __| |/ /
 \__ \ |_) | (_) | | |  __/ |_| | | (_| | (__|   <
 |___/ .__/ \___/|_|  \___|\__|_|  \__,_|\___|_|\_\
     |_|

  Production Batch Workflow v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
