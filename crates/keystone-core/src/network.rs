//! # Network-Level Statistics
//!
//! Whole-graph summaries reported alongside the per-node metrics.

use crate::graph::Graph;
use serde::{Deserialize, Serialize};

/// Summary statistics of a graph.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NetworkStats {
    /// Number of nodes.
    pub node_count: usize,
    /// Number of edges (multi-edges counted individually).
    pub edge_count: usize,
    /// Realized edges over possible ordered pairs `n(n - 1)`.
    pub connectance: f64,
    /// Fraction of nodes without any incident edge.
    pub frac_isolated: f64,
}

impl NetworkStats {
    /// Compute statistics for a graph.
    #[must_use]
    pub fn from_graph(graph: &Graph) -> Self {
        let n = graph.node_count();
        let edge_count = graph.edge_count();
        let isolated = (0..n).filter(|&i| graph.degree(i) == 0).count();

        let possible = n.saturating_mul(n.saturating_sub(1));
        Self {
            node_count: n,
            edge_count,
            connectance: if possible == 0 {
                0.0
            } else {
                edge_count as f64 / possible as f64
            },
            frac_isolated: if n == 0 {
                0.0
            } else {
                isolated as f64 / n as f64
            },
        }
    }
}
