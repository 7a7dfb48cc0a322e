//! # Keystone - Network Metrics CLI
//!
//! The main binary for the Keystone network metrics engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │            apps/keystone (THE BINARY)         │
//! │                                               │
//! │   ┌─────────────┐      ┌──────────────────┐   │
//! │   │    CLI      │      │  JSON / TOML IO  │   │
//! │   │   (clap)    │      │  (serde)         │   │
//! │   └──────┬──────┘      └────────┬─────────┘   │
//! │          └──────────┬───────────┘             │
//! │                     ▼                         │
//! │             ┌───────────────┐                 │
//! │             │ keystone-core │                 │
//! │             │ (THE LOGIC)   │                 │
//! │             └───────────────┘                 │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! keystone metrics --nodes nodes.json --edges edges.json -o out.json
//! keystone project --pairs pairs.json --rows rows.json --strategy jaccard
//! keystone strategies
//! ```

use clap::Parser;
use keystone::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = cli::Cli::parse();

    // KEYSTONE_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("KEYSTONE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "keystone=debug"
    } else {
        "keystone=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // Logs go to stderr; stdout carries results.
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

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Keystone startup banner.
fn print_banner() {
    eprintln!(
        r#"
  keystone v{}
  Reach . Leverage . Trophic level . Projection
"#,
        env!("CARGO_PKG_VERSION")
    );
}
