//! # Sign Aggregates
//!
//! Per-node summaries of edge polarity and weight. Unsigned edges count in
//! the denominators but towards neither fraction.

use crate::graph::{Edge, Graph};
use crate::Sign;
use serde::{Deserialize, Serialize};

/// Sign and weight summary of one node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SignMetrics {
    /// Positive outgoing / all outgoing.
    pub frac_positive_out: f64,
    /// Negative outgoing / all outgoing.
    pub frac_negative_out: f64,
    /// Positive incoming / all incoming.
    pub frac_positive_in: f64,
    /// Negative incoming / all incoming.
    pub frac_negative_in: f64,
    /// Mean weight over weighted incident edges.
    pub avg_edge_weight: f64,
}

fn fraction<'a>(edges: impl Iterator<Item = &'a Edge>, sign: Sign) -> f64 {
    let (mut matching, mut total) = (0usize, 0usize);
    for edge in edges {
        total += 1;
        if edge.sign == Some(sign) {
            matching += 1;
        }
    }
    if total == 0 {
        0.0
    } else {
        matching as f64 / total as f64
    }
}

/// Compute sign aggregates for every node, in node index order.
#[must_use]
pub fn sign_metrics(graph: &Graph) -> Vec<SignMetrics> {
    (0..graph.node_count())
        .map(|n| {
            let (sum, count) = graph
                .incident_edges(n)
                .filter_map(|e| e.weight)
                .fold((0.0, 0usize), |(s, c), w| (s + w, c + 1));

            SignMetrics {
                frac_positive_out: fraction(graph.out_edges(n), Sign::Positive),
                frac_negative_out: fraction(graph.out_edges(n), Sign::Negative),
                frac_positive_in: fraction(graph.in_edges(n), Sign::Positive),
                frac_negative_in: fraction(graph.in_edges(n), Sign::Negative),
                avg_edge_weight: if count == 0 { 0.0 } else { sum / count as f64 },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractions_per_direction() {
        let mut graph = Graph::new(true);
        graph.add_attributed_edge("a", "b", Some(Sign::Positive), Some(3.0));
        graph.add_attributed_edge("a", "c", Some(Sign::Negative), Some(1.0));
        graph.add_attributed_edge("a", "c", None, None);
        graph.add_attributed_edge("c", "a", Some(Sign::Positive), Some(5.0));

        let metrics = sign_metrics(&graph);
        let a = &metrics[0];
        assert!((a.frac_positive_out - 1.0 / 3.0).abs() < 1e-12);
        assert!((a.frac_negative_out - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(a.frac_positive_in, 1.0);
        assert_eq!(a.frac_negative_in, 0.0);
        // weights 3, 1 and 5 over incident edges; the unweighted edge is skipped
        assert_eq!(a.avg_edge_weight, 3.0);

        let c = &metrics[2];
        assert_eq!(c.frac_negative_in, 0.5);
        assert_eq!(c.frac_positive_out, 1.0);
    }

    #[test]
    fn no_edges_means_zero() {
        let mut graph = Graph::new(true);
        graph.add_node("alone");
        assert_eq!(sign_metrics(&graph), vec![SignMetrics::default()]);
    }
}
