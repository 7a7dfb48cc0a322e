//! # Keystone CLI Module
//!
//! This module implements the CLI interface for Keystone.
//!
//! ## Available Commands
//!
//! - `metrics` - Compute node metrics over node and edge tables
//! - `project` - Project a bipartite incidence onto its rows
//! - `strategies` - List the projection strategies
//!
//! Tables are JSON arrays of objects. An optional TOML file (`--config`)
//! supplies the engine configuration; command flags override it.

mod commands;

use clap::{Parser, Subcommand};
use keystone_core::KeystoneError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Keystone - network metrics for relationship graphs
///
/// Degree, reach, leverage, trophic level and keystone index per node, plus
/// unipartite projection of bipartite data.
#[derive(Parser, Debug)]
#[command(name = "keystone")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Engine configuration file (TOML)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

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
    /// Compute node metrics and append them to the node table
    Metrics {
        /// Node table (JSON array of objects)
        #[arg(short, long)]
        nodes: PathBuf,

        /// Edge table (JSON array of objects)
        #[arg(short, long)]
        edges: PathBuf,

        /// Write the augmented node table here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Treat edges as undirected
        #[arg(long)]
        undirected: bool,

        /// Also assign clusters and layout coordinates
        #[arg(long)]
        layout: bool,
    },

    /// Project a bipartite incidence onto its rows
    Project {
        /// Incidence pairs (JSON array of objects)
        #[arg(short, long)]
        pairs: PathBuf,

        /// Row order (JSON array of ids)
        #[arg(short, long)]
        rows: PathBuf,

        /// Projection strategy; `hybrid:<lambda>` sets lambda inline
        #[arg(short, long)]
        strategy: Option<String>,

        /// Keep the asymmetric result
        #[arg(short, long)]
        directed: bool,

        /// Hybrid interpolation parameter in [0, 1]
        #[arg(short, long)]
        lambda: Option<f64>,

        /// Column of the pairs table naming the row
        #[arg(long, default_value = "row")]
        row_column: String,

        /// Column of the pairs table naming the column
        #[arg(long, default_value = "column")]
        column_column: String,

        /// Optional weight column of the pairs table
        #[arg(short, long)]
        weight_column: Option<String>,

        /// Write the projection here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the projection strategies
    Strategies,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI command.
pub fn execute(cli: Cli) -> Result<(), KeystoneError> {
    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Metrics {
            nodes,
            edges,
            output,
            undirected,
            layout,
        }) => {
            if undirected {
                config.graph.directed = false;
            }
            cmd_metrics(&config, &nodes, &edges, output.as_deref(), layout, cli.json_mode)
        }
        Some(Commands::Project {
            pairs,
            rows,
            strategy,
            directed,
            lambda,
            row_column,
            column_column,
            weight_column,
            output,
        }) => {
            if let Some(lambda) = lambda {
                config.projection.lambda = lambda;
            }
            if let Some(strategy) = strategy {
                apply_strategy_flag(&mut config.projection, &strategy)?;
            }
            if directed {
                config.projection.directed = true;
            }
            config.validate()?;
            let columns = PairColumns {
                row: row_column,
                column: column_column,
                weight: weight_column,
            };
            cmd_project(&config, &pairs, &rows, &columns, output.as_deref(), cli.json_mode)
        }
        Some(Commands::Strategies) | None => cmd_strategies(cli.json_mode),
    }
}
