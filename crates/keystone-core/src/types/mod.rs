//! # Core Type Definitions
//!
//! This module contains the value types shared by every component:
//! - Node identifiers and edge signs (`NodeId`, `Sign`)
//! - Tabular input/output (`Cell`, `Record`, `Table`)
//! - Non-fatal diagnostics (`Warning`)
//! - Error types (`KeystoneError`)
//!
//! ## Value Semantics
//!
//! Tables are never mutated in place by the engine. Components take a table
//! by reference and return a new one, so the same input can be analyzed any
//! number of times with identical results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Stable external identifier of a node.
///
/// Identifiers are compared as strings; numeric ids from a table are
/// rendered without a trailing `.0` so `7` and `7.0` name the same node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    /// Create a new node id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Polarity of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sign {
    /// Reinforcing / positive influence.
    Positive,
    /// Inhibiting / negative influence.
    Negative,
}

impl Sign {
    /// Parse a textual sign marker.
    ///
    /// Recognized markers are case-insensitive. Unrecognized text is
    /// "unsigned" and yields `None`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "+" | "pos" | "positive" | "true" | "1" => Some(Sign::Positive),
            "-" | "neg" | "negative" | "false" | "-1" => Some(Sign::Negative),
            _ => None,
        }
    }
}

// =============================================================================
// TABLES
// =============================================================================

/// A single table cell.
///
/// Deserializes from plain JSON scalars; `null` becomes `Missing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Cell {
    /// Boolean flag.
    Bool(bool),
    /// Any numeric value.
    Number(f64),
    /// Free text.
    Text(String),
    /// Absent value.
    #[default]
    Missing,
}

impl Cell {
    /// Render the cell as a node identifier.
    ///
    /// Empty text and missing cells have no identifier.
    #[must_use]
    pub fn as_id(&self) -> Option<NodeId> {
        match self {
            Cell::Text(s) if !s.trim().is_empty() => Some(NodeId::new(s.trim())),
            Cell::Number(n) if n.is_finite() => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    Some(NodeId::new(format!("{}", *n as i64)))
                } else {
                    Some(NodeId::new(format!("{}", n)))
                }
            }
            Cell::Bool(b) => Some(NodeId::new(b.to_string())),
            _ => None,
        }
    }

    /// Read the cell as a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(*n),
            Cell::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Read the cell as an edge sign.
    #[must_use]
    pub fn as_sign(&self) -> Option<Sign> {
        match self {
            Cell::Bool(true) => Some(Sign::Positive),
            Cell::Bool(false) => Some(Sign::Negative),
            Cell::Number(n) if *n > 0.0 => Some(Sign::Positive),
            Cell::Number(n) if *n < 0.0 => Some(Sign::Negative),
            Cell::Text(s) => Sign::parse(s),
            _ => None,
        }
    }

    /// Check if the cell is missing.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<usize> for Cell {
    fn from(n: usize) -> Self {
        Cell::Number(n as f64)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<Option<f64>> for Cell {
    fn from(n: Option<f64>) -> Self {
        n.map_or(Cell::Missing, Cell::Number)
    }
}

/// One table row: column name -> cell.
pub type Record = BTreeMap<String, Cell>;

/// A column-named table of records.
///
/// `columns` preserves declaration order; a row may omit a column, in which
/// case the cell reads as `Missing`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    /// Declared columns in order.
    pub columns: Vec<String>,
    /// Rows of the table.
    pub rows: Vec<Record>,
}

impl Table {
    /// Create an empty table with the given columns.
    #[must_use]
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a table from rows, declaring every column seen (first-seen order).
    #[must_use]
    pub fn from_rows(rows: Vec<Record>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
        Self { columns, rows }
    }

    /// Append a row.
    pub fn push(&mut self, row: Record) {
        for key in row.keys() {
            if !self.columns.contains(key) {
                self.columns.push(key.clone());
            }
        }
        self.rows.push(row);
    }

    /// Check if a column is declared.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a cell, `Missing` if the row omits the column.
    #[must_use]
    pub fn cell(&self, row: usize, column: &str) -> &Cell {
        static MISSING: Cell = Cell::Missing;
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&MISSING)
    }

    /// Return a copy of this table with `column` set from `values`.
    ///
    /// `values` is matched to rows by position; rows beyond its length get
    /// `Missing`. An existing column of the same name is overwritten.
    #[must_use]
    pub fn with_column(&self, column: &str, values: Vec<Cell>) -> Self {
        let mut out = self.clone();
        if !out.has_column(column) {
            out.columns.push(column.to_string());
        }
        let mut values = values.into_iter();
        for row in &mut out.rows {
            row.insert(column.to_string(), values.next().unwrap_or_default());
        }
        out
    }
}

// =============================================================================
// WARNINGS
// =============================================================================

/// Non-fatal diagnostics raised while recovering from degenerate input.
///
/// Numerically degenerate cases are always recovered locally with a
/// documented fallback value; the warning records that it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Warning {
    /// A node has no incident edges; its degree metrics are 0.
    IsolatedNode(NodeId),
    /// An edge referenced a node outside the node set and was dropped.
    SkippedEdge {
        /// Row of the edge table.
        row: usize,
        /// The unknown node id.
        id: NodeId,
    },
    /// A bipartite row has no incidences; every strategy gives it zero
    /// weight to all other rows.
    ZeroIncidenceRow(String),
    /// A bipartite column has no incidences; it is left unnormalized.
    ZeroIncidenceColumn(String),
    /// A bipartite row has zero variance; its correlation is taken as 0.
    ConstantRow(String),
    /// Min-max normalization of a constant series; all values set to 0.
    DegenerateNormalization(String),
    /// The trophic solve failed; trophic level is unavailable.
    TrophicUnavailable(String),
    /// The stationary distribution did not converge or summed to zero.
    StationaryFallback,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::IsolatedNode(id) => write!(f, "isolated node {}", id),
            Warning::SkippedEdge { row, id } => {
                write!(f, "edge at row {} references unknown node {}", row, id)
            }
            Warning::ZeroIncidenceRow(r) => write!(f, "incidence row {} is empty", r),
            Warning::ZeroIncidenceColumn(c) => write!(f, "incidence column {} is empty", c),
            Warning::ConstantRow(r) => write!(f, "incidence row {} has zero variance", r),
            Warning::DegenerateNormalization(m) => {
                write!(f, "{} is constant; normalized to 0", m)
            }
            Warning::TrophicUnavailable(why) => write!(f, "trophic level unavailable: {}", why),
            Warning::StationaryFallback => {
                write!(f, "stationary distribution fell back to uniform")
            }
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in Keystone.
///
/// Only malformed structural input propagates to the caller. Singular
/// matrices are raised by the solver and caught by the pipeline.
#[derive(Debug, Error)]
pub enum KeystoneError {
    /// A declared column is absent from the table.
    #[error("Malformed edge table: missing column '{0}'")]
    MissingColumn(String),

    /// An edge row cannot be turned into an edge.
    #[error("Malformed edge at row {row}: {reason}")]
    MalformedEdge { row: usize, reason: String },

    /// A linear system could not be solved.
    #[error("Singular matrix: {0}")]
    SingularMatrix(String),

    /// The requested projection strategy does not exist.
    #[error("Unknown projection strategy: {0}")]
    UnknownStrategy(String),

    /// A parameter is outside its domain.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// An external community-detection or layout routine failed.
    #[error("External routine failed: {0}")]
    ExternalRoutine(String),

    /// A configuration file could not be interpreted.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl KeystoneError {
    /// Check if the error reports a malformed edge table.
    ///
    /// An absent endpoint column (`MissingColumn`) and an unusable edge row
    /// (`MalformedEdge`) are the same family to a caller: the edge input has
    /// to be fixed before anything can be computed.
    #[must_use]
    pub fn is_malformed_edge(&self) -> bool {
        matches!(
            self,
            KeystoneError::MissingColumn(_) | KeystoneError::MalformedEdge { .. }
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
