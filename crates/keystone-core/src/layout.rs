//! # Cluster Layout Adapter
//!
//! The seam to community detection and layout routines. The adapter owns no
//! algorithm: it hands the graph to a [`CommunityDetector`] and a
//! [`LayoutEngine`], then merges `Cluster`, `x` and `y` onto a node table.
//!
//! Two small deterministic implementations ship with the crate so the
//! adapter works out of the box: [`LabelPropagation`] and [`ClusterRing`].

use crate::graph::Graph;
use crate::primitives::{COL_CLUSTER, COL_X, COL_Y, MAX_LABEL_PROPAGATION_ITERATIONS};
use crate::{Cell, KeystoneError, NodeId, Table};
use std::collections::BTreeMap;
use std::f64::consts::TAU;

// =============================================================================
// TRAITS
// =============================================================================

/// Assigns a categorical cluster label to every node.
pub trait CommunityDetector {
    /// One label per node, in node index order.
    fn detect(&self, graph: &Graph) -> Result<Vec<String>, KeystoneError>;
}

/// Places nodes in the plane.
pub trait LayoutEngine {
    /// Coordinates per node id. Nodes left out are placed at the origin.
    fn layout(
        &self,
        graph: &Graph,
        clusters: &[String],
    ) -> Result<BTreeMap<NodeId, (f64, f64)>, KeystoneError>;
}

// =============================================================================
// LABEL PROPAGATION
// =============================================================================

/// Label propagation over the undirected view of the graph.
///
/// Nodes start with their own index as label and, in node order, adopt the
/// label most frequent among their neighbors (edge multiplicity counts,
/// self-loops do not). Ties go to the lowest label. Labels are renumbered
/// `0, 1, ...` in order of first appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelPropagation {
    pub max_iterations: usize,
}

impl Default for LabelPropagation {
    fn default() -> Self {
        Self {
            max_iterations: MAX_LABEL_PROPAGATION_ITERATIONS,
        }
    }
}

impl CommunityDetector for LabelPropagation {
    fn detect(&self, graph: &Graph) -> Result<Vec<String>, KeystoneError> {
        let n = graph.node_count();
        let mut labels: Vec<usize> = (0..n).collect();

        let mut iterations = 0;
        for _ in 0..self.max_iterations {
            iterations += 1;
            let mut changed = false;
            for node in 0..n {
                let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
                for edge in graph.incident_edges(node).filter(|e| !e.is_loop()) {
                    *counts.entry(labels[edge.other(node)]).or_default() += 1;
                }
                // BTreeMap iterates labels ascending; keep the first maximum
                let mut best: Option<(usize, usize)> = None;
                for (label, count) in counts {
                    if best.is_none_or(|(_, c)| count > c) {
                        best = Some((label, count));
                    }
                }
                if let Some((label, _)) = best {
                    if labels[node] != label {
                        labels[node] = label;
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }

        let mut renumbered: BTreeMap<usize, usize> = BTreeMap::new();
        let out: Vec<String> = labels
            .into_iter()
            .map(|l| {
                let next = renumbered.len();
                renumbered.entry(l).or_insert(next).to_string()
            })
            .collect();
        tracing::debug!(
            communities = renumbered.len(),
            iterations, "label propagation finished"
        );
        Ok(out)
    }
}

// =============================================================================
// CLUSTER RING
// =============================================================================

/// Cluster centres evenly spaced on a circle, members on a small circle
/// around their centre. Clusters are placed in label order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterRing {
    /// Radius of the ring of cluster centres.
    pub radius: f64,
    /// Radius of each cluster's member ring.
    pub member_radius: f64,
}

impl Default for ClusterRing {
    fn default() -> Self {
        Self {
            radius: 1.0,
            member_radius: 0.25,
        }
    }
}

impl LayoutEngine for ClusterRing {
    fn layout(
        &self,
        graph: &Graph,
        clusters: &[String],
    ) -> Result<BTreeMap<NodeId, (f64, f64)>, KeystoneError> {
        let mut members: BTreeMap<&str, Vec<&NodeId>> = BTreeMap::new();
        for (id, label) in graph.node_ids().iter().zip(clusters) {
            members.entry(label.as_str()).or_default().push(id);
        }

        let k = members.len();
        let mut positions = BTreeMap::new();
        for (ci, nodes) in members.values().enumerate() {
            let (cx, cy) = if k > 1 {
                let angle = TAU * ci as f64 / k as f64;
                (self.radius * angle.cos(), self.radius * angle.sin())
            } else {
                (0.0, 0.0)
            };
            let m = nodes.len();
            for (mi, id) in nodes.iter().enumerate() {
                let position = if m > 1 {
                    let angle = TAU * mi as f64 / m as f64;
                    (
                        cx + self.member_radius * angle.cos(),
                        cy + self.member_radius * angle.sin(),
                    )
                } else {
                    (cx, cy)
                };
                positions.insert((*id).clone(), position);
            }
        }
        Ok(positions)
    }
}

// =============================================================================
// ADAPTER
// =============================================================================

/// Runs a detector and a layout engine and writes their output onto a node
/// table.
#[derive(Debug, Clone)]
pub struct ClusterLayoutAdapter<D, L> {
    detector: D,
    engine: L,
    cluster_column: String,
    x_column: String,
    y_column: String,
}

impl Default for ClusterLayoutAdapter<LabelPropagation, ClusterRing> {
    fn default() -> Self {
        Self::new(LabelPropagation::default(), ClusterRing::default())
    }
}

impl<D: CommunityDetector, L: LayoutEngine> ClusterLayoutAdapter<D, L> {
    /// Adapter writing the `Cluster`, `x` and `y` columns.
    pub fn new(detector: D, engine: L) -> Self {
        Self {
            detector,
            engine,
            cluster_column: COL_CLUSTER.to_string(),
            x_column: COL_X.to_string(),
            y_column: COL_Y.to_string(),
        }
    }

    /// Write coordinates to differently named columns.
    #[must_use]
    pub fn with_coordinate_columns(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_column = x.into();
        self.y_column = y.into();
        self
    }

    /// Return a copy of `nodes` with cluster labels and coordinates added.
    ///
    /// Rows whose id is not a graph node get a missing cluster label; rows
    /// the layout omits get `(0.0, 0.0)`.
    pub fn apply(&self, graph: &Graph, nodes: &Table, id_column: &str) -> Result<Table, KeystoneError> {
        if !nodes.has_column(id_column) {
            return Err(KeystoneError::MissingColumn(id_column.to_string()));
        }

        let clusters = self.detector.detect(graph)?;
        if clusters.len() != graph.node_count() {
            return Err(KeystoneError::ExternalRoutine(format!(
                "community detection returned {} labels for {} nodes",
                clusters.len(),
                graph.node_count()
            )));
        }
        let positions = self.engine.layout(graph, &clusters)?;

        let mut cluster_cells = Vec::with_capacity(nodes.len());
        let mut xs = Vec::with_capacity(nodes.len());
        let mut ys = Vec::with_capacity(nodes.len());
        for row in 0..nodes.len() {
            let id = nodes.cell(row, id_column).as_id();
            let cluster = id
                .as_ref()
                .and_then(|id| graph.index_of(id))
                .map(|idx| Cell::Text(clusters[idx].clone()))
                .unwrap_or_default();
            let (x, y) = id
                .as_ref()
                .and_then(|id| positions.get(id))
                .copied()
                .unwrap_or((0.0, 0.0));
            cluster_cells.push(cluster);
            xs.push(Cell::Number(x));
            ys.push(Cell::Number(y));
        }

        Ok(nodes
            .with_column(&self.cluster_column, cluster_cells)
            .with_column(&self.x_column, xs)
            .with_column(&self.y_column, ys))
    }
}

// =============================================================================
// TESTS
// =============================================================================
