//! # Acceptance Tier Tests (T0-T5)
//!
//! Each tier exercises one component through the public API only.
//!
//! ## Tiers
//! - T0: Graph Construction
//! - T1: Degree and Reach
//! - T2: Trophic Level
//! - T3: Keystone Index
//! - T4: Bipartite Projection
//! - T5: Pipeline and Cluster Layout

use keystone_core::{
    Cell, EngineConfig, Graph, GraphSpec, KeystoneError, MissingNodePolicy, NodeId, Record, Table,
    Warning,
};

fn row(pairs: &[(&str, &str)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), Cell::from(*v)))
        .collect()
}

fn edge_table(edges: &[(&str, &str)]) -> Table {
    Table::from_rows(
        edges
            .iter()
            .map(|&(s, t)| row(&[("Source", s), ("Target", t)]))
            .collect(),
    )
}

fn node_table(ids: &[&str]) -> Table {
    Table::from_rows(ids.iter().map(|&id| row(&[("id", id)])).collect())
}

// =============================================================================
// TIER T0: GRAPH CONSTRUCTION
// =============================================================================

mod t0_graph_construction {
    use super::*;

    /// T0.1: Missing endpoint column is a structural error.
    #[test]
    fn missing_column_rejected() {
        let table = Table::from_rows(vec![row(&[("Source", "a"), ("To", "b")])]);
        let result = Graph::from_edge_table(&table, &GraphSpec::default());
        assert!(matches!(result, Err(KeystoneError::MissingColumn(c)) if c == "Target"));
    }

    /// T0.2: Empty endpoint cell is a malformed edge.
    #[test]
    fn empty_endpoint_rejected() {
        let table = edge_table(&[("a", "b"), ("", "c")]);
        let result = Graph::from_edge_table(&table, &GraphSpec::default());
        assert!(matches!(result, Err(KeystoneError::MalformedEdge { row: 1, .. })));
    }

    /// T0.3: Multi-edges and self-loops survive construction.
    #[test]
    fn multi_edges_and_loops_preserved() {
        let table = edge_table(&[("a", "b"), ("a", "b"), ("a", "a")]);
        let graph = Graph::from_edge_table(&table, &GraphSpec::default()).expect("graph");
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.successors(0).len(), 2);
    }

    /// T0.4: Unknown endpoints follow the missing-node policy.
    #[test]
    fn missing_node_policies() {
        let nodes = node_table(&["a", "b"]);
        let edges = edge_table(&[("a", "b"), ("a", "z")]);

        let reject = GraphSpec::default().with_missing_nodes(MissingNodePolicy::Reject);
        assert!(matches!(
            Graph::from_tables(&nodes, &edges, &reject),
            Err(KeystoneError::MalformedEdge { row: 1, .. })
        ));

        let (graph, warnings) =
            Graph::from_tables(&nodes, &edges, &GraphSpec::default()).expect("skip");
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(
            warnings,
            vec![Warning::SkippedEdge {
                row: 1,
                id: NodeId::new("z")
            }]
        );

        let adopt = GraphSpec::default().with_missing_nodes(MissingNodePolicy::Adopt);
        let (graph, warnings) = Graph::from_tables(&nodes, &edges, &adopt).expect("adopt");
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert!(warnings.is_empty());
    }

    /// T0.5: Sign and weight columns are read when declared.
    #[test]
    fn signs_and_weights_read() {
        let mut r = row(&[("Source", "a"), ("Target", "b"), ("sign", "negative")]);
        r.insert("votes".into(), Cell::Number(4.0));
        let graph =
            Graph::from_edge_table(&Table::from_rows(vec![r]), &GraphSpec::default()).expect("graph");
        let edge = &graph.edges()[0];
        assert_eq!(edge.sign, Some(keystone_core::Sign::Negative));
        assert_eq!(edge.weight, Some(4.0));
    }
}

// =============================================================================
// TIER T1: DEGREE AND REACH
// =============================================================================

mod t1_degree_and_reach {
    use super::*;
    use keystone_core::degree_metrics;

    /// T1.1: Second-degree counts and the ratios built on them.
    #[test]
    fn path_metrics() {
        let graph = Graph::from_edge_table(&edge_table(&[("a", "b"), ("b", "c")]), &GraphSpec::default())
            .expect("graph");
        let report = degree_metrics(&graph);

        let a = &report.metrics[0];
        assert_eq!(a.outout_degree, 1);
        assert_eq!(a.leverage, 1.0);
        assert!((a.reach_pct - 100.0 / 3.0).abs() < 1e-12);

        let c = &report.metrics[2];
        assert_eq!(c.inin_degree, 1);
        assert_eq!(c.asymmetry_2deg, -1.0);
        assert_eq!(c.reach_pct, 0.0);

        let b = &report.metrics[1];
        assert_eq!(b.asymmetry_1deg, 0.0);
        assert_eq!(b.total_degree, 2);
    }

    /// T1.2: Undirected graphs have equal in and out views.
    #[test]
    fn undirected_is_balanced() {
        let spec = GraphSpec::new("Source", "Target", false);
        let graph = Graph::from_edge_table(&edge_table(&[("a", "b"), ("b", "c")]), &spec).expect("graph");
        let report = degree_metrics(&graph);
        for m in &report.metrics {
            assert_eq!(m.in_degree, m.out_degree);
            assert_eq!(m.asymmetry_1deg, 0.0);
            assert_eq!(m.asymmetry_2deg, 0.0);
        }
    }

    /// T1.3: Isolated nodes get zeros and a warning, never NaN.
    #[test]
    fn isolated_node_is_zero() {
        let (graph, _) = Graph::from_tables(
            &node_table(&["a", "b", "lonely"]),
            &edge_table(&[("a", "b")]),
            &GraphSpec::default(),
        )
        .expect("graph");
        let report = degree_metrics(&graph);
        let lonely = &report.metrics[2];
        assert_eq!(lonely.total_degree, 0);
        assert_eq!(lonely.leverage, 0.0);
        assert_eq!(lonely.asymmetry_2deg, 0.0);
        assert!(report.warnings.contains(&Warning::IsolatedNode(NodeId::new("lonely"))));
    }
}

// =============================================================================
// TIER T2: TROPHIC LEVEL
// =============================================================================

mod t2_trophic_level {
    use super::*;
    use keystone_core::rooted_trophic_levels;

    /// T2.1: A chain orders nodes strictly.
    #[test]
    fn chain_is_ordered() {
        let graph =
            Graph::from_edge_table(&edge_table(&[("a", "b"), ("b", "c"), ("c", "d")]), &GraphSpec::default())
                .expect("graph");
        let levels = rooted_trophic_levels(&graph).expect("solve");
        assert_eq!(levels.normalized[0], 0.0);
        assert_eq!(levels.normalized[3], 1.0);
        for pair in levels.normalized.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert!((levels.raw[0] - 1.0).abs() < 1e-9);
    }

    /// T2.2: Normalized levels lie in [0, 1] and repeat exactly.
    #[test]
    fn bounded_and_repeatable() {
        let graph = Graph::from_edge_table(
            &edge_table(&[("a", "b"), ("a", "c"), ("c", "b"), ("b", "d"), ("d", "a")]),
            &GraphSpec::default(),
        )
        .expect("graph");
        let first = rooted_trophic_levels(&graph).expect("first");
        let second = rooted_trophic_levels(&graph).expect("second");
        assert_eq!(first, second);
        assert!(first.normalized.iter().all(|v| (0.0..=1.0).contains(v)));
    }
}

// =============================================================================
// TIER T3: KEYSTONE INDEX
// =============================================================================

mod t3_keystone_index {
    use keystone_core::{flag_top_fraction, keystone_index, min_max_normalize, percentile_rank};

    /// T3.1: Keystone is the product of two min-max normalized series.
    #[test]
    fn product_of_normalized_factors() {
        let k = keystone_index(&[10.0, 20.0, 30.0], &[1.0, -1.0, 1.0]);
        assert_eq!(k, vec![0.0, 0.0, 1.0]);
        assert!(k.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    /// T3.2: Constant series normalize to zero.
    #[test]
    fn constant_series() {
        assert_eq!(min_max_normalize(&[4.0, 4.0, 4.0]), vec![0.0; 3]);
    }

    /// T3.3: Percentiles rank with ties at the maximum rank.
    #[test]
    fn percentile_ties() {
        let p = percentile_rank(&[3.0, 1.0, 3.0]);
        assert_eq!(p, vec![100.0, 0.0, 100.0]);
        assert_eq!(percentile_rank(&[9.0]), vec![0.0]);
    }

    /// T3.4: Top-fraction flags need both percentiles.
    #[test]
    fn top_fraction() {
        let flags = flag_top_fraction(&[100.0, 50.0], &[100.0, 100.0], 75.0);
        assert_eq!(flags, vec![true, false]);
    }
}

// =============================================================================
// TIER T4: BIPARTITE PROJECTION
// =============================================================================

mod t4_bipartite_projection {
    use super::*;
    use keystone_core::{BipartiteIncidence, ProjectionOptions, Strategy, project};

    fn ids(names: &[&str]) -> Vec<NodeId> {
        names.iter().map(|n| NodeId::new(*n)).collect()
    }

    fn three_by_two() -> BipartiteIncidence {
        BipartiteIncidence::from_pairs(
            ids(&["row0", "row1", "row2"]),
            vec![
                ("row0", "c0", 1.0),
                ("row1", "c1", 1.0),
                ("row2", "c0", 1.0),
                ("row2", "c1", 1.0),
            ],
        )
        .expect("incidence")
    }

    /// T4.1: `simple` links rows that share a column.
    #[test]
    fn simple_projection_example() {
        let result =
            project(&three_by_two(), Strategy::Simple, &ProjectionOptions::default()).expect("project");
        assert_eq!(result.weight("row0", "row2"), 1.0);
        assert_eq!(result.weight("row1", "row2"), 1.0);
        assert_eq!(result.weight("row0", "row1"), 0.0);

        let pairs: Vec<(&str, &str)> = result
            .edges
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect();
        assert_eq!(pairs, vec![("row0", "row2"), ("row1", "row2")]);
    }

    /// T4.2: Identical rows have jaccard similarity 1.
    #[test]
    fn jaccard_identical_rows() {
        let incidence = BipartiteIncidence::from_pairs(
            ids(&["x", "y"]),
            vec![("x", "t1", 1.0), ("x", "t2", 1.0), ("y", "t1", 1.0), ("y", "t2", 1.0)],
        )
        .expect("incidence");
        let result = project(&incidence, Strategy::Jaccard, &ProjectionOptions::default()).expect("project");
        assert_eq!(result.weight("x", "y"), 1.0);
        assert_eq!(result.weight("x", "x"), 0.0);
    }

    /// T4.3: Every undirected strategy is symmetric with a zero diagonal.
    #[test]
    fn symmetric_zero_diagonal() {
        let incidence = three_by_two();
        for name in Strategy::NAMES {
            let strategy: Strategy = name.parse().expect("strategy");
            let result = project(&incidence, strategy, &ProjectionOptions::default()).expect("project");
            let m = &result.matrix;
            for i in 0..3 {
                assert_eq!(m[[i, i]], 0.0, "{}", name);
                for j in 0..3 {
                    assert_eq!(m[[i, j]], m[[j, i]], "{}", name);
                }
            }
        }
    }

    /// T4.4: Running `probs` twice gives identical weights.
    #[test]
    fn probs_idempotent() {
        let incidence = three_by_two();
        let a = project(&incidence, Strategy::Probs, &ProjectionOptions::default()).expect("a");
        let b = project(&incidence, Strategy::Probs, &ProjectionOptions::default()).expect("b");
        assert_eq!(a.edges, b.edges);
    }

    /// T4.5: `hybrid` reduces to `probs` at 1 and `heats` at 0.
    #[test]
    fn hybrid_reduces_to_diffusions() {
        let incidence = three_by_two();
        let options = ProjectionOptions::directed(true);
        let probs = project(&incidence, Strategy::Probs, &options).expect("probs");
        let heats = project(&incidence, Strategy::Heats, &options).expect("heats");
        let one = project(&incidence, Strategy::hybrid(1.0).expect("l"), &options).expect("one");
        let zero = project(&incidence, Strategy::hybrid(0.0).expect("l"), &options).expect("zero");
        assert_eq!(one.matrix, probs.matrix);
        assert_eq!(zero.matrix, heats.matrix);
    }

    /// T4.6: Unknown names and out-of-range lambdas fail.
    #[test]
    fn bad_strategies_fail() {
        assert!(matches!(
            Strategy::from_name("mystery", 0.5),
            Err(KeystoneError::UnknownStrategy(_))
        ));
        assert!(matches!(
            Strategy::from_name("hybrid", 1.01),
            Err(KeystoneError::InvalidParameter(_))
        ));
    }

    /// T4.7: Pairs outside the declared row order are malformed.
    #[test]
    fn unknown_row_rejected() {
        let result = BipartiteIncidence::from_pairs(ids(&["a"]), vec![("a", "c", 1.0), ("b", "c", 1.0)]);
        assert!(matches!(result, Err(KeystoneError::MalformedEdge { row: 1, .. })));
        assert!(matches!(
            BipartiteIncidence::from_pairs(Vec::new(), Vec::<(&str, &str, f64)>::new()),
            Err(KeystoneError::InvalidParameter(_))
        ));
    }

    /// T4.8: `hyperbolic` weighs each shared column by the inverse square of
    /// its sum.
    #[test]
    fn hyperbolic_projection_example() {
        let result = project(&three_by_two(), Strategy::Hyperbolic, &ProjectionOptions::default())
            .expect("project");
        assert_eq!(result.weight("row0", "row2"), 0.25);
        assert_eq!(result.weight("row1", "row2"), 0.25);
        assert_eq!(result.weight("row0", "row1"), 0.0);
    }

    /// T4.9: `ycn` rescales the transition matrix by the stationary
    /// distribution `[1/4, 1/4, 1/2]`.
    #[test]
    fn ycn_projection_example() {
        let result = project(&three_by_two(), Strategy::Ycn, &ProjectionOptions::directed(true))
            .expect("project");
        assert!((result.weight("row0", "row2") - 0.25).abs() < 1e-9);
        assert!((result.weight("row2", "row0") - 0.0625).abs() < 1e-9);
        assert_eq!(result.weight("row0", "row1"), 0.0);
    }
}

// =============================================================================
// TIER T5: PIPELINE AND CLUSTER LAYOUT
// =============================================================================

mod t5_pipeline_and_layout {
    use super::*;
    use keystone_core::primitives::{COL_CLUSTER, COL_KEYSTONE, COL_REACH, COL_TROPHIC, COL_X};
    use keystone_core::{ClusterLayoutAdapter, NetworkAnalyzer};

    /// T5.1: The augmented table keeps input columns and adds metrics.
    #[test]
    fn augmented_table() {
        let nodes = Table::from_rows(vec![
            row(&[("id", "a"), ("label", "Alpha")]),
            row(&[("id", "b"), ("label", "Beta")]),
            row(&[("id", "c"), ("label", "Gamma")]),
        ]);
        let edges = edge_table(&[("a", "b"), ("b", "c")]);
        let (table, report) = NetworkAnalyzer::new(EngineConfig::default())
            .run(&nodes, &edges)
            .expect("run");

        assert_eq!(table.cell(2, "label"), &Cell::from("Gamma"));
        assert_eq!(table.cell(0, COL_REACH), &Cell::Number(100.0 / 3.0));
        assert_eq!(table.cell(0, COL_KEYSTONE), &Cell::Number(1.0));
        assert!(matches!(table.cell(1, COL_TROPHIC), Cell::Number(_)));
        assert_eq!(report.stats.node_count, 3);
        assert_eq!(report.stats.connectance, 2.0 / 6.0);
    }

    /// T5.2: Cluster and coordinates merge onto the analyzed table.
    #[test]
    fn layout_after_metrics() {
        let nodes = node_table(&["a", "b", "c", "d"]);
        let edges = edge_table(&[("a", "b"), ("c", "d")]);
        let config = EngineConfig::default();
        let (table, _) = NetworkAnalyzer::new(config.clone()).run(&nodes, &edges).expect("run");
        let (graph, _) = Graph::from_tables(&nodes, &edges, &config.graph).expect("graph");

        let laid_out = ClusterLayoutAdapter::default()
            .apply(&graph, &table, "id")
            .expect("layout");
        assert!(laid_out.has_column(COL_KEYSTONE));
        assert_eq!(laid_out.cell(0, COL_CLUSTER), laid_out.cell(1, COL_CLUSTER));
        assert_ne!(laid_out.cell(0, COL_CLUSTER), laid_out.cell(2, COL_CLUSTER));
        assert!(matches!(laid_out.cell(3, COL_X), Cell::Number(_)));
    }

    /// T5.3: Analysis is repeatable.
    #[test]
    fn repeatable_report() {
        let edges = edge_table(&[("a", "b"), ("b", "c"), ("c", "a"), ("c", "d")]);
        let graph = Graph::from_edge_table(&edges, &GraphSpec::default()).expect("graph");
        let analyzer = NetworkAnalyzer::default();
        assert_eq!(analyzer.analyze(&graph), analyzer.analyze(&graph));
    }
}
