//! # keystone-core
//!
//! The deterministic network metrics engine for Keystone.
//!
//! Two independent halves share the value types in [`types`]:
//!
//! - **Node metrics** over a directed, signed relationship graph: degree and
//!   two-hop reach, leverage and asymmetry, betweenness, rooted trophic
//!   level, the keystone index and sign aggregates. [`NetworkAnalyzer`] runs
//!   them all and writes the results back onto a node table.
//! - **Bipartite projection**: [`project`] turns a row/column incidence into
//!   a weighted graph over the rows with one of ten [`Strategy`] variants.
//!
//! ## Architectural Constraints
//!
//! - Pure Rust: no async, no I/O, no network dependencies
//! - Deterministic: `BTreeMap`/`BTreeSet` ordering, no randomness, so every
//!   call is bit-identical on repeat
//! - Value semantics: inputs are borrowed, results freshly allocated, nothing
//!   retained between calls
//! - Degenerate input is recovered locally and reported as a [`Warning`];
//!   only structurally malformed input is a [`KeystoneError`]

// =============================================================================
// MODULES
// =============================================================================

pub mod centrality;
pub mod config;
pub mod degree;
pub mod graph;
pub mod keystone;
pub mod layout;
pub mod network;
pub mod pipeline;
pub mod primitives;
pub mod projection;
pub mod sign;
pub mod trophic;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Cell, KeystoneError, NodeId, Record, Sign, Table, Warning};

// =============================================================================
// RE-EXPORTS: Graph and Node Metrics
// =============================================================================

pub use centrality::betweenness_centrality;
pub use config::{
    EngineConfig, GraphSpec, KeystoneBasis, MetricsConfig, MissingNodePolicy, ProjectionConfig,
};
pub use degree::{DegreeMetrics, DegreeReport, degree_metrics};
pub use graph::{Edge, Graph};
pub use keystone::{
    flag_top_fraction, flag_top_percentile, keystone_index, min_max_normalize, percentile_rank,
};
pub use network::NetworkStats;
pub use pipeline::{NetworkAnalyzer, NetworkReport, NodeMetricsRecord};
pub use sign::{SignMetrics, sign_metrics};
pub use trophic::{TrophicLevels, rooted_trophic_levels};

// =============================================================================
// RE-EXPORTS: Bipartite Projection
// =============================================================================

pub use projection::{
    BipartiteIncidence, ProjectionOptions, ProjectionResult, Strategy, WeightedEdge, project,
};

// =============================================================================
// RE-EXPORTS: Cluster Layout
// =============================================================================

pub use layout::{ClusterLayoutAdapter, ClusterRing, CommunityDetector, LabelPropagation, LayoutEngine};
