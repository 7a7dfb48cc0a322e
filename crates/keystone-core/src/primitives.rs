//! # Engine Primitives
//!
//! Hardcoded constants for the Keystone engine.
//!
//! These values are compiled into the binary and fixed at runtime; anything a
//! caller is expected to tune lives in [`crate::config`] instead.

/// Default source column of an edge table.
pub const DEFAULT_SOURCE_COLUMN: &str = "Source";

/// Default target column of an edge table.
pub const DEFAULT_TARGET_COLUMN: &str = "Target";

/// Default identifier column of a node table.
pub const DEFAULT_ID_COLUMN: &str = "id";

/// Default sign column of an edge table.
pub const DEFAULT_SIGN_COLUMN: &str = "sign";

/// Default weight (vote count) column of an edge table.
pub const DEFAULT_WEIGHT_COLUMN: &str = "votes";

/// Pivot magnitude below which a matrix is treated as singular.
pub const SINGULAR_PIVOT_EPSILON: f64 = 1e-12;

/// Pearson similarities below this value are dropped from the projection.
pub const PEARSON_THRESHOLD: f64 = 0.5;

/// Similarity assigned to identical rows by the euclidean projection.
///
/// `1 / 0` is infinite; it is capped to this value.
pub const EUCLIDEAN_IDENTICAL_SIMILARITY: f64 = 1.0;

/// Default convergence tolerance (L1) for the stationary-distribution
/// power iteration.
pub const DEFAULT_EIGEN_TOLERANCE: f64 = 1e-12;

/// Default iteration cap for the stationary-distribution power iteration.
pub const DEFAULT_EIGEN_MAX_ITERATIONS: usize = 10_000;

/// Percentile at or above which a node is flagged as a top keystone.
pub const DEFAULT_TOP_PERCENTILE: f64 = 75.0;

/// Maximum number of label-propagation sweeps.
pub const MAX_LABEL_PROPAGATION_ITERATIONS: usize = 100;

// =============================================================================
// COLUMN NAMES OF THE AUGMENTED NODE TABLE
// =============================================================================

/// Total incident edges.
pub const COL_TOTAL_LINKS: &str = "total_links";
/// Incoming edges.
pub const COL_IN_DEGREE: &str = "in_degree";
/// Outgoing edges.
pub const COL_OUT_DEGREE: &str = "out_degree";
/// Distinct two-hop successors.
pub const COL_OUTOUT_DEGREE: &str = "outout_degree";
/// Distinct two-hop predecessors.
pub const COL_ININ_DEGREE: &str = "inin_degree";
/// Normalized betweenness centrality.
pub const COL_BETWEENNESS: &str = "betweenness";
/// Two-degree leverage.
pub const COL_LEVERAGE: &str = "2_Degree_Leverage";
/// Two-degree asymmetry.
pub const COL_ASYMMETRY_2: &str = "2_Degree_Asymmetry";
/// One-degree asymmetry.
pub const COL_ASYMMETRY_1: &str = "1_Degree_Asymmetry";
/// Percentage of the network reached in two hops.
pub const COL_REACH: &str = "2_Degree_Reach";
/// Keystone index built on leverage.
pub const COL_KEYSTONE_LEVERAGE: &str = "Keystone_Index_1";
/// Keystone index built on two-degree asymmetry.
pub const COL_KEYSTONE: &str = "Keystone_Index";
/// Percentile of the keystone index.
pub const COL_KEYSTONE_PCTL: &str = "Keystone_Pctl";
/// Top-keystone flag.
pub const COL_TOP_KEYSTONE: &str = "Top_Keystone";
/// Normalized rooted trophic level.
pub const COL_TROPHIC: &str = "Trophic_Level";
/// Fraction of positive outgoing edges.
pub const COL_FRAC_POS_OUT: &str = "frac_positive_out";
/// Fraction of positive incoming edges.
pub const COL_FRAC_POS_IN: &str = "frac_positive_in";
/// Fraction of negative outgoing edges.
pub const COL_FRAC_NEG_OUT: &str = "frac_negative_out";
/// Fraction of negative incoming edges.
pub const COL_FRAC_NEG_IN: &str = "frac_negative_in";
/// Mean edge weight over incident edges.
pub const COL_AVG_WEIGHT: &str = "avg_LinkVotes";
/// Community label.
pub const COL_CLUSTER: &str = "Cluster";
/// Layout x coordinate.
pub const COL_X: &str = "x";
/// Layout y coordinate.
pub const COL_Y: &str = "y";
