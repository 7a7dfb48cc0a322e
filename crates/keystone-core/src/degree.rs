//! # Degree and Reach Metrics
//!
//! First- and second-order degree statistics per node:
//! - `out_degree` / `in_degree`: edge counts
//! - `outout_degree` / `inin_degree`: distinct nodes two hops away
//! - leverage, asymmetry (one and two degree), two-hop reach
//!
//! Every ratio is a normalized difference `(a - b) / (a + b)` whose zero
//! denominator yields 0, so all of them lie in [-1, 1].

use crate::graph::Graph;
use crate::{NodeId, Warning};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Degree and reach metrics of one node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DegreeMetrics {
    /// All incident edges.
    pub total_degree: usize,
    /// Incoming edges.
    pub in_degree: usize,
    /// Outgoing edges.
    pub out_degree: usize,
    /// Distinct successors of successors.
    pub outout_degree: usize,
    /// Distinct predecessors of predecessors.
    pub inin_degree: usize,
    /// `(outout - in) / (outout + in)`.
    pub leverage: f64,
    /// `(outout - inin) / (outout + inin)`.
    pub asymmetry_2deg: f64,
    /// `(out - in) / (out + in)`.
    pub asymmetry_1deg: f64,
    /// Percentage of all nodes reached in two outward hops.
    pub reach_pct: f64,
}

/// Degree metrics for a whole graph, in node index order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DegreeReport {
    /// One entry per node.
    pub metrics: Vec<DegreeMetrics>,
    /// Isolated nodes.
    pub warnings: Vec<Warning>,
}

/// `(a - b) / (a + b)`, or 0 when `a + b` is 0.
#[must_use]
pub fn normalized_difference(a: f64, b: f64) -> f64 {
    let denom = a + b;
    if denom == 0.0 { 0.0 } else { (a - b) / denom }
}

fn second_degree<F>(graph: &Graph, step: F) -> Vec<usize>
where
    F: Fn(usize) -> BTreeSet<usize>,
{
    (0..graph.node_count())
        .map(|n| {
            let mut reached = BTreeSet::new();
            for hop in step(n) {
                reached.extend(step(hop));
            }
            reached.len()
        })
        .collect()
}

/// Number of distinct nodes reachable in exactly two outward hops.
///
/// The node itself counts when a two-cycle leads back to it.
#[must_use]
pub fn outout_degree(graph: &Graph) -> Vec<usize> {
    second_degree(graph, |n| graph.successors(n))
}

/// Number of distinct nodes reaching this one in exactly two hops.
#[must_use]
pub fn inin_degree(graph: &Graph) -> Vec<usize> {
    second_degree(graph, |n| graph.predecessors(n))
}

/// Compute degree and reach metrics for every node.
#[must_use]
pub fn degree_metrics(graph: &Graph) -> DegreeReport {
    let n = graph.node_count();
    let outout = outout_degree(graph);
    let inin = inin_degree(graph);

    let mut warnings = Vec::new();
    let metrics = (0..n)
        .map(|i| {
            let total_degree = graph.degree(i);
            if total_degree == 0 {
                let id = graph.node_id(i).cloned().unwrap_or_else(|| NodeId::new(""));
                warnings.push(Warning::IsolatedNode(id));
            }

            let out_degree = graph.out_degree(i);
            let in_degree = graph.in_degree(i);
            let (oo, ii) = (outout[i] as f64, inin[i] as f64);

            DegreeMetrics {
                total_degree,
                in_degree,
                out_degree,
                outout_degree: outout[i],
                inin_degree: inin[i],
                leverage: normalized_difference(oo, in_degree as f64),
                asymmetry_2deg: normalized_difference(oo, ii),
                asymmetry_1deg: normalized_difference(out_degree as f64, in_degree as f64),
                reach_pct: 100.0 * oo / n as f64,
            }
        })
        .collect();

    if !warnings.is_empty() {
        tracing::debug!("{} isolated node(s) report zero degree metrics", warnings.len());
    }

    DegreeReport { metrics, warnings }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// a -> b -> c -> d, plus b -> d
    fn chain() -> Graph {
        let mut graph = Graph::new(true);
        graph.add_edge("a", "b");
        graph.add_edge("b", "c");
        graph.add_edge("c", "d");
        graph.add_edge("b", "d");
        graph
    }

    #[test]
    fn second_degree_is_a_set_union() {
        let graph = chain();
        // a reaches {c, d} through b; b reaches {d} through c
        assert_eq!(outout_degree(&graph), vec![2, 1, 0, 0]);
        // d is reached from {b, a} through c and b
        assert_eq!(inin_degree(&graph), vec![0, 0, 1, 2]);
    }

    #[test]
    fn ratios_follow_definitions() {
        let report = degree_metrics(&chain());
        let a = &report.metrics[0];
        // outout 2, in 0
        assert_eq!(a.leverage, 1.0);
        assert_eq!(a.asymmetry_2deg, 1.0);
        assert_eq!(a.asymmetry_1deg, 1.0);
        assert_eq!(a.reach_pct, 50.0);

        let d = &report.metrics[3];
        // outout 0, in 2, inin 2
        assert_eq!(d.leverage, -1.0);
        assert_eq!(d.asymmetry_2deg, -1.0);
        assert_eq!(d.asymmetry_1deg, -1.0);
        assert_eq!(d.total_degree, 2);
    }

    #[test]
    fn isolated_node_is_all_zero() {
        let mut graph = chain();
        graph.add_node("e");
        let report = degree_metrics(&graph);

        assert_eq!(report.metrics[4], DegreeMetrics::default());
        assert_eq!(report.warnings, vec![Warning::IsolatedNode(NodeId::new("e"))]);
    }

    #[test]
    fn two_cycle_reaches_itself() {
        let mut graph = Graph::new(true);
        graph.add_edge("a", "b");
        graph.add_edge("b", "a");
        assert_eq!(outout_degree(&graph), vec![1, 1]);
    }

    #[test]
    fn normalized_difference_guards_zero() {
        assert_eq!(normalized_difference(0.0, 0.0), 0.0);
        assert_eq!(normalized_difference(3.0, 1.0), 0.5);
    }
}
