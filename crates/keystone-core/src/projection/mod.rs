//! # Bipartite Projection
//!
//! Turns an incidence between ordered rows R and columns C into a weighted
//! graph over R. Ten strategies are available:
//!
//! | Name | Result before symmetrization |
//! |------|------------------------------|
//! | `simple` | `T·Tᵗ` co-occurrence counts |
//! | `jaccard` | set similarity of the nonzero patterns |
//! | `cosine` | cosine similarity |
//! | `euclidean` | inverse euclidean distance |
//! | `pearson` | rescaled correlation, negative correlation cut |
//! | `hyperbolic` | `S·Sᵗ` with `S = T/colsum(T)` |
//! | `ycn` | transition matrix rescaled by its stationary distribution |
//! | `probs` | mass diffusion `P = rownorm(T)·rownorm(Tᵗ)` |
//! | `heats` | heat diffusion `Pᵗ` |
//! | `hybrid` | `P^l ∘ (Pᵗ)^(1−l)` |
//!
//! The diagonal is always zero. Undirected projections are symmetrized as
//! `(R + Rᵗ)/2`.

mod diffusion;
mod incidence;
mod similarity;

pub use diffusion::{Stationary, stationary_distribution, transition};
pub use incidence::{BipartiteIncidence, column_normalize, row_normalize};

use crate::config::ProjectionConfig;
use crate::primitives::{DEFAULT_EIGEN_MAX_ITERATIONS, DEFAULT_EIGEN_TOLERANCE};
use crate::{KeystoneError, NodeId, Record, Table, Warning};
use ndarray::Array2;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// STRATEGY
// =============================================================================

/// A projection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Simple,
    Jaccard,
    Cosine,
    Euclidean,
    Pearson,
    Hyperbolic,
    Ycn,
    Probs,
    Heats,
    /// Interpolation between `probs` (`lambda = 1`) and `heats` (`lambda = 0`).
    Hybrid {
        lambda: f64,
    },
}

impl Strategy {
    /// Every strategy name, in documentation order.
    pub const NAMES: [&'static str; 10] = [
        "simple",
        "jaccard",
        "cosine",
        "euclidean",
        "pearson",
        "hyperbolic",
        "ycn",
        "probs",
        "heats",
        "hybrid",
    ];

    /// Hybrid strategy with a validated interpolation parameter.
    pub fn hybrid(lambda: f64) -> Result<Self, KeystoneError> {
        if !(0.0..=1.0).contains(&lambda) {
            return Err(KeystoneError::InvalidParameter(format!(
                "hybrid lambda must be within [0, 1], got {}",
                lambda
            )));
        }
        Ok(Strategy::Hybrid { lambda })
    }

    /// Resolve a strategy by name. `lambda` is only read by `hybrid`.
    pub fn from_name(name: &str, lambda: f64) -> Result<Self, KeystoneError> {
        let strategy = match name.trim().to_ascii_lowercase().as_str() {
            "simple" => Strategy::Simple,
            "jaccard" => Strategy::Jaccard,
            "cosine" => Strategy::Cosine,
            "euclidean" => Strategy::Euclidean,
            "pearson" => Strategy::Pearson,
            "hyperbolic" => Strategy::Hyperbolic,
            "ycn" => Strategy::Ycn,
            "probs" => Strategy::Probs,
            "heats" => Strategy::Heats,
            "hybrid" => Strategy::hybrid(lambda)?,
            _ => return Err(KeystoneError::UnknownStrategy(name.to_string())),
        };
        Ok(strategy)
    }

    /// Canonical name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Simple => "simple",
            Strategy::Jaccard => "jaccard",
            Strategy::Cosine => "cosine",
            Strategy::Euclidean => "euclidean",
            Strategy::Pearson => "pearson",
            Strategy::Hyperbolic => "hyperbolic",
            Strategy::Ycn => "ycn",
            Strategy::Probs => "probs",
            Strategy::Heats => "heats",
            Strategy::Hybrid { .. } => "hybrid",
        }
    }

    /// Whether the strategy normalizes by column sums (and so reports
    /// empty columns).
    fn normalizes_columns(&self) -> bool {
        matches!(
            self,
            Strategy::Hyperbolic
                | Strategy::Ycn
                | Strategy::Probs
                | Strategy::Heats
                | Strategy::Hybrid { .. }
        )
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Hybrid { lambda } => write!(f, "hybrid:{}", lambda),
            other => f.write_str(other.name()),
        }
    }
}

/// Parses `name` or `hybrid:<lambda>`; bare `hybrid` uses lambda 0.5.
impl FromStr for Strategy {
    type Err = KeystoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((name, lambda)) if name.trim().eq_ignore_ascii_case("hybrid") => {
                let lambda: f64 = lambda.trim().parse().map_err(|_| {
                    KeystoneError::InvalidParameter(format!("bad hybrid lambda '{}'", lambda))
                })?;
                Strategy::hybrid(lambda)
            }
            Some(_) => Err(KeystoneError::UnknownStrategy(s.to_string())),
            None => Strategy::from_name(s, 0.5),
        }
    }
}

// =============================================================================
// OPTIONS AND RESULT
// =============================================================================

/// Knobs shared by all strategies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionOptions {
    /// Keep the raw asymmetric matrix instead of `(R + Rᵗ)/2`.
    pub directed: bool,
    /// L1 tolerance of the `ycn` stationary iteration.
    pub eigen_tolerance: f64,
    /// Iteration cap of the `ycn` stationary iteration.
    pub eigen_max_iterations: usize,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            directed: false,
            eigen_tolerance: DEFAULT_EIGEN_TOLERANCE,
            eigen_max_iterations: DEFAULT_EIGEN_MAX_ITERATIONS,
        }
    }
}

impl ProjectionOptions {
    /// Options with the given directedness and default iteration settings.
    #[must_use]
    pub fn directed(directed: bool) -> Self {
        Self {
            directed,
            ..Self::default()
        }
    }
}

impl From<&ProjectionConfig> for ProjectionOptions {
    fn from(config: &ProjectionConfig) -> Self {
        Self {
            directed: config.directed,
            eigen_tolerance: config.eigen_tolerance,
            eigen_max_iterations: config.eigen_max_iterations,
        }
    }
}

/// One edge of the projected graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: f64,
}

/// A weighted graph over the incidence rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionResult {
    /// Nodes in row order.
    pub nodes: Vec<NodeId>,
    /// Strategy that produced the weights.
    pub strategy: Strategy,
    /// Whether `matrix` was left asymmetric.
    pub directed: bool,
    /// Dense `|R| × |R|` weights with a zero diagonal.
    #[serde(skip)]
    pub matrix: Array2<f64>,
    /// Nonzero entries; one per unordered pair when undirected.
    pub edges: Vec<WeightedEdge>,
    /// Degenerate input recovered along the way.
    pub warnings: Vec<Warning>,
}

impl ProjectionResult {
    /// Weight between two nodes, 0 when either is unknown.
    #[must_use]
    pub fn weight(&self, source: &str, target: &str) -> f64 {
        let position = |id: &str| self.nodes.iter().position(|n| n.as_str() == id);
        match (position(source), position(target)) {
            (Some(i), Some(j)) => self.matrix[[i, j]],
            _ => 0.0,
        }
    }

    /// The edge list as a `source, target, weight` table.
    #[must_use]
    pub fn to_table(&self) -> Table {
        let mut table = Table::new(["source", "target", "weight"]);
        for edge in &self.edges {
            let mut row = Record::new();
            row.insert("source".into(), edge.source.as_str().into());
            row.insert("target".into(), edge.target.as_str().into());
            row.insert("weight".into(), edge.weight.into());
            table.push(row);
        }
        table
    }
}

// =============================================================================
// PROJECTION
// =============================================================================

fn raw_projection(
    incidence: &BipartiteIncidence,
    strategy: Strategy,
    options: &ProjectionOptions,
    warnings: &mut Vec<Warning>,
) -> Array2<f64> {
    let t = incidence.matrix();
    match strategy {
        Strategy::Simple => t.dot(&t.t()),
        Strategy::Jaccard => similarity::jaccard(t),
        Strategy::Cosine => similarity::cosine(t),
        Strategy::Euclidean => similarity::euclidean(t),
        Strategy::Pearson => {
            let (matrix, constant) = similarity::pearson(t);
            for row in constant {
                let id = incidence.rows()[row].to_string();
                tracing::warn!(row = %id, "zero-variance incidence row; correlation taken as 0");
                warnings.push(Warning::ConstantRow(id));
            }
            matrix
        }
        Strategy::Hyperbolic => {
            let scaled = column_normalize(t);
            scaled.dot(&scaled.t())
        }
        Strategy::Probs => diffusion::transition(t),
        Strategy::Heats => diffusion::transition(t).reversed_axes(),
        Strategy::Hybrid { lambda } => diffusion::hybrid(&diffusion::transition(t), lambda),
        Strategy::Ycn => {
            let p = diffusion::transition(t);
            let stationary = diffusion::stationary_distribution(
                &p,
                options.eigen_tolerance,
                options.eigen_max_iterations,
            );
            if !stationary.converged {
                tracing::warn!("stationary distribution did not converge; using uniform");
                warnings.push(Warning::StationaryFallback);
            }
            diffusion::rescale_columns(&p, &stationary.distribution)
        }
    }
}

/// Project `incidence` onto its rows.
///
/// Degenerate rows and columns never fail the call: they contribute zeros
/// and are reported in [`ProjectionResult::warnings`].
pub fn project(
    incidence: &BipartiteIncidence,
    strategy: Strategy,
    options: &ProjectionOptions,
) -> Result<ProjectionResult, KeystoneError> {
    if let Strategy::Hybrid { lambda } = strategy {
        Strategy::hybrid(lambda)?;
    }
    tracing::debug!(
        strategy = %strategy,
        rows = incidence.rows().len(),
        columns = incidence.columns().len(),
        directed = options.directed,
        "projecting bipartite incidence"
    );

    let mut warnings = Vec::new();
    for row in incidence.empty_rows() {
        let id = incidence.rows()[row].to_string();
        tracing::warn!(row = %id, "incidence row is empty");
        warnings.push(Warning::ZeroIncidenceRow(id));
    }
    if strategy.normalizes_columns() {
        for column in incidence.empty_columns() {
            let id = incidence.columns()[column].to_string();
            tracing::warn!(column = %id, "incidence column is empty");
            warnings.push(Warning::ZeroIncidenceColumn(id));
        }
    }

    let raw = raw_projection(incidence, strategy, options, &mut warnings);
    let mut matrix = if options.directed {
        raw
    } else {
        (&raw + &raw.t()) / 2.0
    };
    matrix.diag_mut().fill(0.0);

    let nodes = incidence.rows().to_vec();
    let n = nodes.len();
    let mut edges = Vec::new();
    for i in 0..n {
        let start = if options.directed { 0 } else { i + 1 };
        for j in start..n {
            let weight = matrix[[i, j]];
            if i != j && weight != 0.0 {
                edges.push(WeightedEdge {
                    source: nodes[i].clone(),
                    target: nodes[j].clone(),
                    weight,
                });
            }
        }
    }

    Ok(ProjectionResult {
        nodes,
        strategy,
        directed: options.directed,
        matrix,
        edges,
        warnings,
    })
}

// =============================================================================
// TESTS
// =============================================================================
