//! # Metrics Pipeline
//!
//! Runs every node metric over one graph and collects the results:
//!
//! ```text
//! Graph → degree/reach → betweenness → keystone → trophic → sign → stats
//! ```
//!
//! Degenerate input never aborts the run. Isolated nodes, constant series
//! and a singular trophic system each become a [`Warning`] on the report;
//! only malformed tables fail (while building the graph).

use crate::centrality::betweenness_centrality;
use crate::config::{EngineConfig, KeystoneBasis};
use crate::degree::{DegreeMetrics, degree_metrics};
use crate::graph::Graph;
use crate::keystone::{flag_top_percentile, is_constant, keystone_index, percentile_rank};
use crate::network::NetworkStats;
use crate::primitives::{
    COL_ASYMMETRY_1, COL_ASYMMETRY_2, COL_AVG_WEIGHT, COL_BETWEENNESS, COL_FRAC_NEG_IN,
    COL_FRAC_NEG_OUT, COL_FRAC_POS_IN, COL_FRAC_POS_OUT, COL_IN_DEGREE, COL_ININ_DEGREE,
    COL_KEYSTONE, COL_KEYSTONE_LEVERAGE, COL_KEYSTONE_PCTL, COL_LEVERAGE, COL_OUT_DEGREE,
    COL_OUTOUT_DEGREE, COL_REACH, COL_TOP_KEYSTONE, COL_TOTAL_LINKS, COL_TROPHIC,
};
use crate::sign::{SignMetrics, sign_metrics};
use crate::trophic::rooted_trophic_levels;
use crate::{Cell, KeystoneError, NodeId, Table, Warning};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// REPORT TYPES
// =============================================================================

/// Every metric of one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeMetricsRecord {
    /// Node identifier.
    pub id: NodeId,
    /// Degree, leverage, asymmetry and reach.
    #[serde(flatten)]
    pub degree: DegreeMetrics,
    /// Normalized betweenness; `None` when disabled.
    pub betweenness: Option<f64>,
    /// Reach × two-degree leverage.
    pub keystone_leverage: f64,
    /// Reach × two-degree asymmetry.
    pub keystone_index: f64,
    /// Percentile of the configured keystone basis.
    pub keystone_pctl: f64,
    /// Percentile at or above the configured threshold.
    pub top_keystone: bool,
    /// Normalized trophic level; `None` when disabled or unsolvable.
    pub trophic_level: Option<f64>,
    /// Sign aggregates; `None` when sign handling is disabled.
    pub sign: Option<SignMetrics>,
}

/// Output of [`NetworkAnalyzer::analyze`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NetworkReport {
    /// One record per node, in node order.
    pub nodes: Vec<NodeMetricsRecord>,
    /// Whole-graph statistics.
    pub stats: NetworkStats,
    /// Degenerate input recovered along the way.
    pub warnings: Vec<Warning>,
}

impl NetworkReport {
    /// Look up a node's record.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&NodeMetricsRecord> {
        self.nodes.iter().find(|r| r.id.as_str() == id)
    }

    /// Return a copy of `nodes` with one column per metric.
    ///
    /// Rows are matched by `id_column`; rows naming no analyzed node get
    /// missing cells. Optional metrics only produce columns when computed.
    pub fn augment(&self, nodes: &Table, id_column: &str) -> Result<Table, KeystoneError> {
        if !nodes.has_column(id_column) {
            return Err(KeystoneError::MissingColumn(id_column.to_string()));
        }

        let index: BTreeMap<&NodeId, &NodeMetricsRecord> =
            self.nodes.iter().map(|r| (&r.id, r)).collect();
        let records: Vec<Option<&NodeMetricsRecord>> = (0..nodes.len())
            .map(|row| {
                nodes
                    .cell(row, id_column)
                    .as_id()
                    .and_then(|id| index.get(&id).copied())
            })
            .collect();

        let column = |f: &dyn Fn(&NodeMetricsRecord) -> Cell| -> Vec<Cell> {
            records
                .iter()
                .map(|r| r.map(f).unwrap_or_default())
                .collect()
        };

        let mut out = nodes
            .with_column(COL_TOTAL_LINKS, column(&|r| r.degree.total_degree.into()))
            .with_column(COL_IN_DEGREE, column(&|r| r.degree.in_degree.into()))
            .with_column(COL_OUT_DEGREE, column(&|r| r.degree.out_degree.into()))
            .with_column(COL_OUTOUT_DEGREE, column(&|r| r.degree.outout_degree.into()))
            .with_column(COL_ININ_DEGREE, column(&|r| r.degree.inin_degree.into()));

        if self.nodes.iter().any(|r| r.betweenness.is_some()) {
            out = out.with_column(COL_BETWEENNESS, column(&|r| r.betweenness.into()));
        }

        out = out
            .with_column(COL_LEVERAGE, column(&|r| r.degree.leverage.into()))
            .with_column(COL_ASYMMETRY_2, column(&|r| r.degree.asymmetry_2deg.into()))
            .with_column(COL_ASYMMETRY_1, column(&|r| r.degree.asymmetry_1deg.into()))
            .with_column(COL_REACH, column(&|r| r.degree.reach_pct.into()))
            .with_column(COL_KEYSTONE_LEVERAGE, column(&|r| r.keystone_leverage.into()))
            .with_column(COL_KEYSTONE, column(&|r| r.keystone_index.into()))
            .with_column(COL_KEYSTONE_PCTL, column(&|r| r.keystone_pctl.into()))
            .with_column(COL_TOP_KEYSTONE, column(&|r| r.top_keystone.into()))
            .with_column(COL_TROPHIC, column(&|r| r.trophic_level.into()));

        if self.nodes.iter().any(|r| r.sign.is_some()) {
            let sign = |f: fn(&SignMetrics) -> f64| {
                column(&move |r: &NodeMetricsRecord| r.sign.as_ref().map(f).into())
            };
            out = out
                .with_column(COL_FRAC_POS_OUT, sign(|s| s.frac_positive_out))
                .with_column(COL_FRAC_NEG_OUT, sign(|s| s.frac_negative_out))
                .with_column(COL_FRAC_POS_IN, sign(|s| s.frac_positive_in))
                .with_column(COL_FRAC_NEG_IN, sign(|s| s.frac_negative_in))
                .with_column(COL_AVG_WEIGHT, sign(|s| s.avg_edge_weight));
        }

        Ok(out)
    }
}

// =============================================================================
// ANALYZER
// =============================================================================

/// Runs the node-metric pipeline with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct NetworkAnalyzer {
    config: EngineConfig,
}

fn warn_if_constant(values: &[f64], metric: &str, warnings: &mut Vec<Warning>) {
    if values.len() > 1 && is_constant(values) {
        tracing::warn!("{} is constant across nodes; normalized to 0", metric);
        warnings.push(Warning::DegenerateNormalization(metric.to_string()));
    }
}

impl NetworkAnalyzer {
    /// Create an analyzer.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The analyzer's configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute every configured metric for every node of `graph`.
    #[must_use]
    pub fn analyze(&self, graph: &Graph) -> NetworkReport {
        let metrics = &self.config.metrics;
        let n = graph.node_count();
        tracing::debug!(
            "Analyzing {} nodes, {} edges (directed: {})",
            n,
            graph.edge_count(),
            graph.is_directed()
        );

        let degree = degree_metrics(graph);
        let mut warnings = degree.warnings;
        for warning in &warnings {
            tracing::warn!("{}", warning);
        }
        let degree = degree.metrics;

        let betweenness = metrics.betweenness.then(|| betweenness_centrality(graph));

        let reach: Vec<f64> = degree.iter().map(|d| d.reach_pct).collect();
        let leverage: Vec<f64> = degree.iter().map(|d| d.leverage).collect();
        let asymmetry: Vec<f64> = degree.iter().map(|d| d.asymmetry_2deg).collect();
        warn_if_constant(&reach, COL_REACH, &mut warnings);
        warn_if_constant(&leverage, COL_LEVERAGE, &mut warnings);
        warn_if_constant(&asymmetry, COL_ASYMMETRY_2, &mut warnings);

        let keystone_leverage = keystone_index(&reach, &leverage);
        let keystone = keystone_index(&reach, &asymmetry);
        let pctl = percentile_rank(match metrics.keystone_basis {
            KeystoneBasis::Asymmetry => &keystone,
            KeystoneBasis::Leverage => &keystone_leverage,
        });
        let top = flag_top_percentile(&pctl, metrics.top_percentile);

        let trophic = if metrics.trophic {
            match rooted_trophic_levels(graph) {
                Ok(levels) => {
                    warn_if_constant(&levels.raw, COL_TROPHIC, &mut warnings);
                    Some(levels.normalized)
                }
                Err(e) => {
                    tracing::warn!("Trophic level unavailable: {}", e);
                    warnings.push(Warning::TrophicUnavailable(e.to_string()));
                    None
                }
            }
        } else {
            None
        };

        let signs = metrics.signed.then(|| sign_metrics(graph));

        let nodes = graph
            .node_ids()
            .iter()
            .zip(degree)
            .enumerate()
            .map(|(i, (id, degree))| NodeMetricsRecord {
                id: id.clone(),
                degree,
                betweenness: betweenness.as_ref().map(|b| b[i]),
                keystone_leverage: keystone_leverage[i],
                keystone_index: keystone[i],
                keystone_pctl: pctl[i],
                top_keystone: top[i],
                trophic_level: trophic.as_ref().map(|t| t[i]),
                sign: signs.as_ref().map(|s| s[i].clone()),
            })
            .collect();

        NetworkReport {
            nodes,
            stats: NetworkStats::from_graph(graph),
            warnings,
        }
    }

    /// Build the graph from tables, analyze it and augment the node table.
    ///
    /// Warnings from graph construction (skipped edges) come first in the
    /// report.
    pub fn run(&self, nodes: &Table, edges: &Table) -> Result<(Table, NetworkReport), KeystoneError> {
        let (graph, mut warnings) = Graph::from_tables(nodes, edges, &self.config.graph)?;
        let mut report = self.analyze(&graph);
        warnings.append(&mut report.warnings);
        report.warnings = warnings;

        let table = report.augment(nodes, &self.config.graph.id)?;
        tracing::info!(
            "Computed metrics for {} nodes ({} warnings)",
            report.nodes.len(),
            report.warnings.len()
        );
        Ok((table, report))
    }
}

// =============================================================================
// TESTS
// =============================================================================
