//! # Engine Configuration
//!
//! Serde-deserializable knobs for every component. All sections default, so
//! a partial configuration file only needs the keys it changes.
//!
//! ```toml
//! [graph]
//! source = "from"
//! target = "to"
//! missing_nodes = "adopt"
//!
//! [metrics]
//! keystone_basis = "leverage"
//!
//! [projection]
//! strategy = "hybrid"
//! lambda = 0.3
//! ```

use crate::KeystoneError;
use crate::primitives::{
    DEFAULT_EIGEN_MAX_ITERATIONS, DEFAULT_EIGEN_TOLERANCE, DEFAULT_ID_COLUMN,
    DEFAULT_SIGN_COLUMN, DEFAULT_SOURCE_COLUMN, DEFAULT_TARGET_COLUMN, DEFAULT_TOP_PERCENTILE,
    DEFAULT_WEIGHT_COLUMN,
};
use crate::projection::Strategy;
use serde::{Deserialize, Serialize};

// =============================================================================
// GRAPH SPEC
// =============================================================================

/// What to do with an edge whose endpoint is not in the node set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingNodePolicy {
    /// Fail with `MalformedEdge`.
    Reject,
    /// Drop the edge and record a `SkippedEdge` warning.
    #[default]
    Skip,
    /// Add the unknown endpoint to the node set.
    Adopt,
}

/// How to read a graph out of node/edge tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSpec {
    /// Source column of the edge table.
    pub source: String,
    /// Target column of the edge table.
    pub target: String,
    /// Identifier column of the node table.
    pub id: String,
    /// Optional sign column of the edge table.
    pub sign: Option<String>,
    /// Optional weight/vote column of the edge table.
    pub weight: Option<String>,
    /// Whether edges are directed.
    pub directed: bool,
    /// Handling of edges that name unknown nodes.
    pub missing_nodes: MissingNodePolicy,
}

impl Default for GraphSpec {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE_COLUMN.to_string(),
            target: DEFAULT_TARGET_COLUMN.to_string(),
            id: DEFAULT_ID_COLUMN.to_string(),
            sign: Some(DEFAULT_SIGN_COLUMN.to_string()),
            weight: Some(DEFAULT_WEIGHT_COLUMN.to_string()),
            directed: true,
            missing_nodes: MissingNodePolicy::default(),
        }
    }
}

impl GraphSpec {
    /// Spec for a plain edge list with the given endpoint columns.
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>, directed: bool) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            sign: None,
            weight: None,
            directed,
            ..Self::default()
        }
    }

    /// Set the sign column.
    #[must_use]
    pub fn with_sign(mut self, column: impl Into<String>) -> Self {
        self.sign = Some(column.into());
        self
    }

    /// Set the weight column.
    #[must_use]
    pub fn with_weight(mut self, column: impl Into<String>) -> Self {
        self.weight = Some(column.into());
        self
    }

    /// Set the missing-node policy.
    #[must_use]
    pub fn with_missing_nodes(mut self, policy: MissingNodePolicy) -> Self {
        self.missing_nodes = policy;
        self
    }
}

// =============================================================================
// METRICS
// =============================================================================

/// Which second factor drives the reported keystone percentile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeystoneBasis {
    /// Reach × two-degree asymmetry.
    #[default]
    Asymmetry,
    /// Reach × two-degree leverage.
    Leverage,
}

/// Node-metric pipeline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Compute sign aggregates (fractions and average weight).
    pub signed: bool,
    /// Compute betweenness centrality.
    pub betweenness: bool,
    /// Compute the rooted trophic level.
    pub trophic: bool,
    /// Basis of the reported keystone percentile.
    pub keystone_basis: KeystoneBasis,
    /// Percentile threshold for the top-keystone flag.
    pub top_percentile: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            signed: true,
            betweenness: true,
            trophic: true,
            keystone_basis: KeystoneBasis::default(),
            top_percentile: DEFAULT_TOP_PERCENTILE,
        }
    }
}

// =============================================================================
// PROJECTION
// =============================================================================

/// Bipartite projection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Strategy name (see [`Strategy`]).
    pub strategy: String,
    /// Keep the raw asymmetric result instead of symmetrizing.
    pub directed: bool,
    /// Interpolation parameter of the `hybrid` strategy.
    pub lambda: f64,
    /// L1 tolerance of the stationary-distribution iteration.
    pub eigen_tolerance: f64,
    /// Iteration cap of the stationary-distribution iteration.
    pub eigen_max_iterations: usize,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            strategy: "probs".to_string(),
            directed: false,
            lambda: 0.5,
            eigen_tolerance: DEFAULT_EIGEN_TOLERANCE,
            eigen_max_iterations: DEFAULT_EIGEN_MAX_ITERATIONS,
        }
    }
}

impl ProjectionConfig {
    /// Resolve the configured strategy name.
    pub fn strategy(&self) -> Result<Strategy, KeystoneError> {
        Strategy::from_name(&self.strategy, self.lambda)
    }
}

// =============================================================================
// ENGINE CONFIG
// =============================================================================

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Graph construction.
    pub graph: GraphSpec,
    /// Node-metric pipeline.
    pub metrics: MetricsConfig,
    /// Bipartite projection.
    pub projection: ProjectionConfig,
}

impl EngineConfig {
    /// Check value domains that serde cannot express.
    pub fn validate(&self) -> Result<(), KeystoneError> {
        if !(0.0..=100.0).contains(&self.metrics.top_percentile) {
            return Err(KeystoneError::ConfigError(format!(
                "metrics.top_percentile must be within [0, 100], got {}",
                self.metrics.top_percentile
            )));
        }
        if !(self.projection.eigen_tolerance > 0.0) {
            return Err(KeystoneError::ConfigError(
                "projection.eigen_tolerance must be positive".to_string(),
            ));
        }
        if self.projection.eigen_max_iterations == 0 {
            return Err(KeystoneError::ConfigError(
                "projection.eigen_max_iterations must be at least 1".to_string(),
            ));
        }
        if self.graph.source.is_empty() || self.graph.target.is_empty() {
            return Err(KeystoneError::ConfigError(
                "graph.source and graph.target must name columns".to_string(),
            ));
        }
        self.projection.strategy().map(|_| ())
    }
}

// =============================================================================
// TESTS
// =============================================================================
