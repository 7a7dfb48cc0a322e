//! # Property-Based Tests
//!
//! Bounds, symmetry and determinism invariants over random graphs and
//! incidences.

use keystone_core::{
    BipartiteIncidence, Graph, NetworkAnalyzer, NodeId, ProjectionOptions, Strategy,
    degree_metrics, keystone_index, percentile_rank, project, rooted_trophic_levels,
};
use proptest::collection::vec;
use proptest::prelude::*;

fn random_graph(edges: &[(u8, u8)], directed: bool) -> Graph {
    let mut graph = Graph::new(directed);
    for (s, t) in edges {
        graph.add_edge(format!("n{}", s), format!("n{}", t));
    }
    graph
}

fn random_incidence(cells: &[Vec<u8>]) -> Option<BipartiteIncidence> {
    let rows: Vec<NodeId> = (0..cells.len()).map(|i| NodeId::new(format!("r{}", i))).collect();
    let pairs = cells.iter().enumerate().flat_map(|(i, row)| {
        row.iter()
            .enumerate()
            .filter(|(_, w)| **w > 0)
            .map(move |(j, w)| (format!("r{}", i), format!("c{}", j), f64::from(*w)))
    });
    BipartiteIncidence::from_pairs(rows, pairs).ok()
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Every normalized difference lies in [-1, 1].
    #[test]
    fn ratios_are_bounded(edges in vec((0u8..12, 0u8..12), 0..40), directed in any::<bool>()) {
        let graph = random_graph(&edges, directed);
        for m in degree_metrics(&graph).metrics {
            prop_assert!((-1.0..=1.0).contains(&m.leverage));
            prop_assert!((-1.0..=1.0).contains(&m.asymmetry_2deg));
            prop_assert!((-1.0..=1.0).contains(&m.asymmetry_1deg));
            prop_assert!((0.0..=100.0).contains(&m.reach_pct));
        }
    }

    /// Keystone indices lie in [0, 1] and percentiles in [0, 100].
    #[test]
    fn keystone_is_bounded(reach in vec(0.0f64..100.0, 1..30), factor in vec(-1.0f64..1.0, 30)) {
        let k = keystone_index(&reach, &factor[..reach.len()]);
        prop_assert_eq!(k.len(), reach.len());
        prop_assert!(k.iter().all(|v| (0.0..=1.0).contains(v)));
        prop_assert!(percentile_rank(&k).iter().all(|p| (0.0..=100.0).contains(p)));
    }

    /// Percentile rank preserves order.
    #[test]
    fn percentile_is_monotone(values in vec(-50.0f64..50.0, 2..30)) {
        let p = percentile_rank(&values);
        for i in 0..values.len() {
            for j in 0..values.len() {
                if values[i] < values[j] {
                    prop_assert!(p[i] < p[j]);
                }
            }
        }
    }

    /// Normalized trophic levels lie in [0, 1].
    #[test]
    fn trophic_is_bounded(edges in vec((0u8..10, 0u8..10), 1..30)) {
        let graph = random_graph(&edges, true);
        let levels = rooted_trophic_levels(&graph).expect("rooted systems are solvable");
        prop_assert!(levels.normalized.iter().all(|v| (0.0..=1.0).contains(v)));
        prop_assert!(levels.raw.iter().all(|v| *v >= 1.0 - 1e-9));
    }

    /// The whole pipeline is deterministic.
    #[test]
    fn analysis_is_deterministic(edges in vec((0u8..10, 0u8..10), 0..30)) {
        let graph = random_graph(&edges, true);
        let analyzer = NetworkAnalyzer::default();
        prop_assert_eq!(analyzer.analyze(&graph), analyzer.analyze(&graph));
    }

    /// Undirected projections are symmetric, finite and zero on the diagonal.
    #[test]
    fn projections_are_symmetric(
        cells in vec(vec(0u8..3, 4), 2..7),
        name in prop::sample::select(Strategy::NAMES.to_vec()),
    ) {
        let incidence = random_incidence(&cells).expect("incidence");
        let strategy: Strategy = name.parse().expect("strategy");
        let result = project(&incidence, strategy, &ProjectionOptions::default()).expect("project");
        let m = &result.matrix;
        for i in 0..m.nrows() {
            prop_assert_eq!(m[[i, i]], 0.0);
            for j in 0..m.ncols() {
                prop_assert!(m[[i, j]].is_finite());
                prop_assert_eq!(m[[i, j]], m[[j, i]]);
            }
        }
        prop_assert!(result.edges.iter().all(|e| e.weight != 0.0));
    }

    /// Hybrid reduces to probs at 1 and heats at 0.
    #[test]
    fn hybrid_endpoints(cells in vec(vec(0u8..3, 3), 2..6)) {
        let incidence = random_incidence(&cells).expect("incidence");
        let options = ProjectionOptions::directed(true);
        let probs = project(&incidence, Strategy::Probs, &options).expect("probs");
        let heats = project(&incidence, Strategy::Heats, &options).expect("heats");
        let one = project(&incidence, Strategy::Hybrid { lambda: 1.0 }, &options).expect("one");
        let zero = project(&incidence, Strategy::Hybrid { lambda: 0.0 }, &options).expect("zero");
        prop_assert_eq!(one.matrix, probs.matrix);
        prop_assert_eq!(zero.matrix, heats.matrix);
    }
}
