//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands, plus the
//! file plumbing they share: size and path validation, JSON table reading,
//! TOML configuration loading and result writing.

use keystone_core::{
    BipartiteIncidence, Cell, ClusterLayoutAdapter, EngineConfig, Graph, KeystoneError,
    NetworkAnalyzer, NodeId, ProjectionConfig, ProjectionOptions, Record, Strategy, Table,
    Warning, project,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum size of a node, edge, pair or row file (100 MB).
///
/// This prevents memory exhaustion from malicious or accidental large files.
const MAX_TABLE_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Maximum size of a configuration file (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), KeystoneError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| KeystoneError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(KeystoneError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Resolve an input path and ensure it names a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, KeystoneError> {
    let canonical = path.canonicalize().map_err(|e| {
        KeystoneError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(KeystoneError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Resolve an output path: the parent directory must already exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, KeystoneError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        KeystoneError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(KeystoneError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| KeystoneError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

/// Validate and read a whole input file.
fn read_input(path: &Path, max_size: u64) -> Result<String, KeystoneError> {
    let path = validate_file_path(path)?;
    validate_file_size(&path, max_size)?;
    std::fs::read_to_string(&path)
        .map_err(|e| KeystoneError::IoError(format!("Cannot read '{}': {}", path.display(), e)))
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Load the engine configuration, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, KeystoneError> {
    let config = match path {
        Some(path) => {
            let text = read_input(path, MAX_CONFIG_FILE_SIZE)?;
            let config: EngineConfig = toml::from_str(&text).map_err(|e| {
                KeystoneError::ConfigError(format!("{}: {}", path.display(), e))
            })?;
            tracing::debug!("Loaded configuration from {}", path.display());
            config
        }
        None => EngineConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Apply a `--strategy` flag. `hybrid:0.3` also sets lambda.
pub fn apply_strategy_flag(
    config: &mut ProjectionConfig,
    flag: &str,
) -> Result<(), KeystoneError> {
    match flag.split_once(':') {
        Some((name, lambda)) => {
            config.lambda = lambda.trim().parse().map_err(|_| {
                KeystoneError::InvalidParameter(format!("lambda '{}' is not a number", lambda))
            })?;
            config.strategy = name.trim().to_string();
        }
        None => config.strategy = flag.trim().to_string(),
    }
    Ok(())
}

// =============================================================================
// TABLE IO
// =============================================================================

/// Read a JSON array of objects as a table.
pub fn read_table(path: &Path) -> Result<Table, KeystoneError> {
    let text = read_input(path, MAX_TABLE_FILE_SIZE)?;
    let rows: Vec<Record> = serde_json::from_str(&text).map_err(|e| {
        KeystoneError::SerializationError(format!("{}: {}", path.display(), e))
    })?;
    Ok(Table::from_rows(rows))
}

/// Read a JSON array of ids as the projection row order.
pub fn read_row_order(path: &Path) -> Result<Vec<NodeId>, KeystoneError> {
    let text = read_input(path, MAX_TABLE_FILE_SIZE)?;
    let cells: Vec<Cell> = serde_json::from_str(&text).map_err(|e| {
        KeystoneError::SerializationError(format!("{}: {}", path.display(), e))
    })?;
    cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            cell.as_id().ok_or_else(|| {
                KeystoneError::InvalidParameter(format!("row order entry {} is not an id", i))
            })
        })
        .collect()
}

/// A table as a JSON array of objects, keys in column order.
#[must_use]
pub fn table_to_json(table: &Table) -> serde_json::Value {
    let rows = table
        .rows
        .iter()
        .map(|row| {
            let object: serde_json::Map<String, serde_json::Value> = table
                .columns
                .iter()
                .filter_map(|column| {
                    let cell = row.get(column)?;
                    let value = serde_json::to_value(cell).unwrap_or_default();
                    Some((column.clone(), value))
                })
                .collect();
            serde_json::Value::Object(object)
        })
        .collect();
    serde_json::Value::Array(rows)
}

/// Write JSON to a file, or to stdout when no path is given.
fn write_json<T: Serialize>(output: Option<&Path>, value: &T) -> Result<(), KeystoneError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| KeystoneError::SerializationError(e.to_string()))?;
    match output {
        Some(path) => {
            let path = validate_output_path(path)?;
            std::fs::write(&path, text).map_err(|e| {
                KeystoneError::IoError(format!("Cannot write '{}': {}", path.display(), e))
            })?;
            tracing::info!("Wrote {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

fn warning_strings(warnings: &[Warning]) -> Vec<String> {
    warnings.iter().map(ToString::to_string).collect()
}

// =============================================================================
// METRICS COMMAND
// =============================================================================

/// Compute node metrics and write the augmented node table.
///
/// With `layout`, cluster and coordinate columns are appended as well.
pub fn cmd_metrics(
    config: &EngineConfig,
    nodes_path: &Path,
    edges_path: &Path,
    output: Option<&Path>,
    layout: bool,
    json_mode: bool,
) -> Result<(), KeystoneError> {
    let nodes = read_table(nodes_path)?;
    let edges = read_table(edges_path)?;
    tracing::info!("Read {} nodes and {} edges", nodes.len(), edges.len());

    let analyzer = NetworkAnalyzer::new(config.clone());
    let (mut table, report) = analyzer.run(&nodes, &edges)?;

    if layout {
        let (graph, _) = Graph::from_tables(&nodes, &edges, &config.graph)?;
        table = ClusterLayoutAdapter::default().apply(&graph, &table, &config.graph.id)?;
    }

    let rows = table_to_json(&table);

    write_json(output, &rows)?;
    if output.is_none() {
        return Ok(());
    }

    if json_mode {
        let summary = serde_json::json!({
            "nodes": report.nodes.len(),
            "stats": report.stats,
            "warnings": warning_strings(&report.warnings),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).unwrap_or_default()
        );
    } else {
        println!("Network Metrics:");
        println!("  Nodes:        {}", report.stats.node_count);
        println!("  Edges:        {}", report.stats.edge_count);
        println!("  Connectance:  {:.4}", report.stats.connectance);
        println!("  Isolated:     {:.1}%", report.stats.frac_isolated * 100.0);
        let keystones: Vec<&str> = report
            .nodes
            .iter()
            .filter(|r| r.top_keystone)
            .map(|r| r.id.as_str())
            .collect();
        println!("  Keystones:    {}", keystones.join(", "));
        for warning in &report.warnings {
            println!("  warning: {}", warning);
        }
    }
    Ok(())
}

// =============================================================================
// PROJECT COMMAND
// =============================================================================

/// Column names of the incidence pair table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairColumns {
    pub row: String,
    pub column: String,
    pub weight: Option<String>,
}

/// Project a bipartite incidence and write the weighted edge list.
pub fn cmd_project(
    config: &EngineConfig,
    pairs_path: &Path,
    rows_path: &Path,
    columns: &PairColumns,
    output: Option<&Path>,
    json_mode: bool,
) -> Result<(), KeystoneError> {
    let pairs = read_table(pairs_path)?;
    let rows = read_row_order(rows_path)?;
    let incidence = BipartiteIncidence::from_table(
        &pairs,
        &columns.row,
        &columns.column,
        columns.weight.as_deref(),
        rows,
    )?;

    let strategy = config.projection.strategy()?;
    let options = ProjectionOptions::from(&config.projection);
    let result = project(&incidence, strategy, &options)?;
    tracing::info!(
        "Projected {} rows with {}: {} edges",
        result.nodes.len(),
        strategy,
        result.edges.len()
    );

    let document = serde_json::json!({
        "strategy": strategy.to_string(),
        "directed": result.directed,
        "nodes": result.nodes,
        "edges": result.edges,
        "warnings": warning_strings(&result.warnings),
    });

    write_json(output, &document)?;
    if output.is_none() {
        return Ok(());
    }

    if json_mode {
        let summary = serde_json::json!({
            "strategy": strategy.to_string(),
            "nodes": result.nodes.len(),
            "edges": result.edges.len(),
            "warnings": warning_strings(&result.warnings),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).unwrap_or_default()
        );
    } else {
        println!("Projection:");
        println!("  Strategy:  {}", strategy);
        println!("  Directed:  {}", result.directed);
        println!("  Nodes:     {}", result.nodes.len());
        println!("  Edges:     {}", result.edges.len());
        for warning in &result.warnings {
            println!("  warning: {}", warning);
        }
    }
    Ok(())
}

// =============================================================================
// STRATEGIES COMMAND
// =============================================================================

/// One-line description of a strategy.
#[must_use]
pub fn describe_strategy(strategy: Strategy) -> &'static str {
    match strategy {
        Strategy::Simple => "shared-column count T·Tᵗ",
        Strategy::Jaccard => "intersection over union of column sets",
        Strategy::Cosine => "cosine similarity of rows",
        Strategy::Euclidean => "inverse euclidean distance of rows",
        Strategy::Pearson => "row correlation, thresholded at 0.5",
        Strategy::Hyperbolic => "shared columns discounted by column degree",
        Strategy::Ycn => "mass diffusion rescaled by the stationary distribution",
        Strategy::Probs => "mass diffusion (random walk row to column to row)",
        Strategy::Heats => "heat conduction (transpose of probs)",
        Strategy::Hybrid { .. } => "interpolation between probs and heats",
    }
}

/// List the available projection strategies.
pub fn cmd_strategies(json_mode: bool) -> Result<(), KeystoneError> {
    let strategies = Strategy::NAMES
        .iter()
        .map(|name| name.parse::<Strategy>())
        .collect::<Result<Vec<_>, _>>()?;

    if json_mode {
        let listing: Vec<serde_json::Value> = strategies
            .iter()
            .map(|s| serde_json::json!({ "name": s.name(), "description": describe_strategy(*s) }))
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&listing).unwrap_or_default()
        );
    } else {
        println!("Projection strategies:");
        for strategy in &strategies {
            println!("  {:<11} {}", strategy.name(), describe_strategy(*strategy));
        }
    }
    Ok(())
}
