//! Betweenness centrality (Brandes).

use crate::graph::Graph;
use std::collections::VecDeque;

/// Normalized betweenness centrality of every node, in node index order.
///
/// Shortest paths run over distinct successors, so multi-edges do not
/// multiply path counts. Scores are scaled by `1 / ((n - 1)(n - 2))`; with
/// fewer than three nodes every score is 0.
#[must_use]
pub fn betweenness_centrality(graph: &Graph) -> Vec<f64> {
    let n = graph.node_count();
    let mut bc = vec![0.0_f64; n];
    if n < 3 {
        return bc;
    }

    let successors: Vec<Vec<usize>> = (0..n)
        .map(|v| graph.successors(v).into_iter().filter(|&w| w != v).collect())
        .collect();

    for s in 0..n {
        let mut stack: Vec<usize> = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0_f64; n];
        let mut dist = vec![-1i64; n];
        let mut delta = vec![0.0_f64; n];

        sigma[s] = 1.0;
        dist[s] = 0;

        let mut queue = VecDeque::new();
        queue.push_back(s);

        while let Some(v) = queue.pop_front() {
            stack.push(v);
            for &w in &successors[v] {
                if dist[w] < 0 {
                    queue.push_back(w);
                    dist[w] = dist[v] + 1;
                }
                if dist[w] == dist[v] + 1 {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        // Back-propagation
        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                delta[v] += (sigma[v] / sigma[w]) * (1.0 + delta[w]);
            }
            if w != s {
                bc[w] += delta[w];
            }
        }
    }

    let scale = 1.0 / ((n as f64 - 1.0) * (n as f64 - 2.0));
    for b in &mut bc {
        *b *= scale;
    }
    bc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directed_path_centre() {
        let mut graph = Graph::new(true);
        graph.add_edge("a", "b");
        graph.add_edge("b", "c");

        let bc = betweenness_centrality(&graph);
        // one pair (a, c) routes through b; scale 1 / (2 * 1)
        assert_eq!(bc, vec![0.0, 0.5, 0.0]);
    }

    #[test]
    fn undirected_star_hub() {
        let mut graph = Graph::new(false);
        graph.add_edge("hub", "x");
        graph.add_edge("hub", "y");
        graph.add_edge("hub", "z");

        let bc = betweenness_centrality(&graph);
        // every ordered leaf pair passes the hub: 6 / (3 * 2)
        assert_eq!(bc[0], 1.0);
        assert_eq!(bc[1], 0.0);
    }

    #[test]
    fn tiny_graphs_score_zero() {
        let mut graph = Graph::new(true);
        graph.add_edge("a", "b");
        assert_eq!(betweenness_centrality(&graph), vec![0.0, 0.0]);
    }
}
