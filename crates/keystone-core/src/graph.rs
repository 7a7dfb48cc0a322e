//! # Graph Model
//!
//! Arena-indexed relationship graph built from an edge table.
//!
//! Nodes live in a `Vec<NodeId>` with a `BTreeMap` reverse index, so every
//! algorithm works on dense `usize` indices and reports results in node
//! insertion order. Edges are stored once and referenced from per-node
//! incidence lists. Multi-edges and self-loops are preserved.

use crate::config::{GraphSpec, MissingNodePolicy};
use crate::{Cell, KeystoneError, NodeId, Sign, Table, Warning};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// EDGE
// =============================================================================

/// A single relationship between two node indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Source node index.
    pub source: usize,
    /// Target node index.
    pub target: usize,
    /// Optional polarity.
    pub sign: Option<Sign>,
    /// Optional numeric weight (vote count).
    pub weight: Option<f64>,
}

impl Edge {
    /// Create an unsigned, unweighted edge.
    #[must_use]
    pub fn new(source: usize, target: usize) -> Self {
        Self {
            source,
            target,
            sign: None,
            weight: None,
        }
    }

    /// The endpoint opposite to `node` (the target for a self-loop).
    #[must_use]
    pub fn other(&self, node: usize) -> usize {
        if self.source == node {
            self.target
        } else {
            self.source
        }
    }

    /// Check if the edge is a self-loop.
    #[must_use]
    pub fn is_loop(&self) -> bool {
        self.source == self.target
    }
}

// =============================================================================
// GRAPH
// =============================================================================

/// Directed or undirected multigraph over string identifiers.
///
/// For an undirected graph every incident edge is both "outgoing" and
/// "incoming", so successors and predecessors coincide.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Node arena: index -> id.
    ids: Vec<NodeId>,

    /// Reverse lookup: id -> index.
    index: BTreeMap<NodeId, usize>,

    /// Edge storage in insertion order.
    edges: Vec<Edge>,

    /// Outgoing edge indices per node.
    out_edges: Vec<Vec<usize>>,

    /// Incoming edge indices per node.
    in_edges: Vec<Vec<usize>>,

    directed: bool,
}

impl Graph {
    /// Create a new empty graph.
    #[must_use]
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            ..Self::default()
        }
    }

    /// Build a graph from an edge table alone.
    ///
    /// The node set is whatever the edges reference, in first-seen order.
    ///
    /// An absent endpoint column is `MissingColumn` and an empty endpoint
    /// cell is `MalformedEdge`; both satisfy
    /// [`KeystoneError::is_malformed_edge`].
    pub fn from_edge_table(edges: &Table, spec: &GraphSpec) -> Result<Self, KeystoneError> {
        let mut graph = Self::new(spec.directed);
        let adopt = GraphSpec {
            missing_nodes: MissingNodePolicy::Adopt,
            ..spec.clone()
        };
        let warnings = graph.load_edges(edges, &adopt)?;
        debug_assert!(warnings.is_empty());
        Ok(graph)
    }

    /// Build a graph from a node table and an edge table.
    ///
    /// The node table seeds the node set (so isolated nodes exist) in row
    /// order. Edges naming nodes outside that set follow
    /// `spec.missing_nodes`; skipped edges are reported as warnings.
    /// Malformed edge input fails as in [`Graph::from_edge_table`]; a node
    /// table without the id column is `MissingColumn`.
    pub fn from_tables(
        nodes: &Table,
        edges: &Table,
        spec: &GraphSpec,
    ) -> Result<(Self, Vec<Warning>), KeystoneError> {
        if !nodes.has_column(&spec.id) {
            return Err(KeystoneError::MissingColumn(spec.id.clone()));
        }

        let mut graph = Self::new(spec.directed);
        for (row, record) in nodes.rows.iter().enumerate() {
            match record.get(&spec.id).and_then(Cell::as_id) {
                Some(id) => {
                    graph.add_node(id);
                }
                None => tracing::debug!("Node row {} has no id; ignored", row),
            }
        }

        let warnings = graph.load_edges(edges, spec)?;
        Ok((graph, warnings))
    }

    fn load_edges(&mut self, edges: &Table, spec: &GraphSpec) -> Result<Vec<Warning>, KeystoneError> {
        for column in [&spec.source, &spec.target] {
            if !edges.has_column(column) {
                return Err(KeystoneError::MissingColumn(column.clone()));
            }
        }
        let sign_column = spec.sign.as_deref().filter(|c| edges.has_column(c));
        let weight_column = spec.weight.as_deref().filter(|c| edges.has_column(c));

        let mut warnings = Vec::new();
        for row in 0..edges.len() {
            let source = Self::endpoint(edges, row, &spec.source)?;
            let target = Self::endpoint(edges, row, &spec.target)?;

            let mut resolved = [0usize; 2];
            let mut skip = false;
            for (slot, id) in resolved.iter_mut().zip([source, target]) {
                if let Some(idx) = self.index_of(&id) {
                    *slot = idx;
                    continue;
                }
                match spec.missing_nodes {
                    MissingNodePolicy::Adopt => *slot = self.add_node(id),
                    MissingNodePolicy::Skip => {
                        tracing::warn!("Edge at row {} references unknown node {}", row, id);
                        warnings.push(Warning::SkippedEdge { row, id });
                        skip = true;
                        break;
                    }
                    MissingNodePolicy::Reject => {
                        return Err(KeystoneError::MalformedEdge {
                            row,
                            reason: format!("unknown node '{}'", id),
                        });
                    }
                }
            }
            if skip {
                continue;
            }

            let sign = sign_column.and_then(|c| edges.cell(row, c).as_sign());
            let weight = weight_column.and_then(|c| edges.cell(row, c).as_f64());
            self.push_edge(Edge {
                source: resolved[0],
                target: resolved[1],
                sign,
                weight,
            });
        }

        Ok(warnings)
    }

    fn endpoint(edges: &Table, row: usize, column: &str) -> Result<NodeId, KeystoneError> {
        edges
            .cell(row, column)
            .as_id()
            .ok_or_else(|| KeystoneError::MalformedEdge {
                row,
                reason: format!("empty '{}' cell", column),
            })
    }

    /// Insert a node if absent. Returns its index.
    pub fn add_node(&mut self, id: impl Into<NodeId>) -> usize {
        let id = id.into();
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        let idx = self.ids.len();
        self.index.insert(id.clone(), idx);
        self.ids.push(id);
        self.out_edges.push(Vec::new());
        self.in_edges.push(Vec::new());
        idx
    }

    /// Insert an unsigned, unweighted edge, adding missing endpoints.
    /// Returns the edge index.
    pub fn add_edge(&mut self, source: impl Into<NodeId>, target: impl Into<NodeId>) -> usize {
        self.add_attributed_edge(source, target, None, None)
    }

    /// Insert an edge with optional sign and weight, adding missing endpoints.
    /// Returns the edge index.
    pub fn add_attributed_edge(
        &mut self,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        sign: Option<Sign>,
        weight: Option<f64>,
    ) -> usize {
        let source = self.add_node(source);
        let target = self.add_node(target);
        self.push_edge(Edge {
            source,
            target,
            sign,
            weight,
        })
    }

    fn push_edge(&mut self, edge: Edge) -> usize {
        let e = self.edges.len();
        let (s, t) = (edge.source, edge.target);
        if self.directed {
            self.out_edges[s].push(e);
            self.in_edges[t].push(e);
        } else {
            self.out_edges[s].push(e);
            self.in_edges[s].push(e);
            if s != t {
                self.out_edges[t].push(e);
                self.in_edges[t].push(e);
            }
        }
        self.edges.push(edge);
        e
    }

    /// Check if edges are directed.
    #[must_use]
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    /// Number of edges (multi-edges counted individually).
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All node ids in index order.
    #[must_use]
    pub fn node_ids(&self) -> &[NodeId] {
        &self.ids
    }

    /// Id of the node at `idx`.
    #[must_use]
    pub fn node_id(&self, idx: usize) -> Option<&NodeId> {
        self.ids.get(idx)
    }

    /// Index of the node with the given id.
    #[must_use]
    pub fn index_of(&self, id: &NodeId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// All edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Outgoing edges of a node (incident edges when undirected).
    pub fn out_edges(&self, node: usize) -> impl Iterator<Item = &Edge> + '_ {
        self.out_edges
            .get(node)
            .into_iter()
            .flat_map(|list| list.iter().map(|&e| &self.edges[e]))
    }

    /// Incoming edges of a node (incident edges when undirected).
    pub fn in_edges(&self, node: usize) -> impl Iterator<Item = &Edge> + '_ {
        self.in_edges
            .get(node)
            .into_iter()
            .flat_map(|list| list.iter().map(|&e| &self.edges[e]))
    }

    /// Edges touching a node, each listed once (self-loops once).
    pub fn incident_edges(&self, node: usize) -> impl Iterator<Item = &Edge> + '_ {
        let incoming = self
            .in_edges(node)
            .filter(move |e| self.directed && !e.is_loop());
        self.out_edges(node).chain(incoming)
    }

    /// Distinct successor indices.
    #[must_use]
    pub fn successors(&self, node: usize) -> BTreeSet<usize> {
        if self.directed {
            self.out_edges(node).map(|e| e.target).collect()
        } else {
            self.out_edges(node).map(|e| e.other(node)).collect()
        }
    }

    /// Distinct predecessor indices.
    #[must_use]
    pub fn predecessors(&self, node: usize) -> BTreeSet<usize> {
        if self.directed {
            self.in_edges(node).map(|e| e.source).collect()
        } else {
            self.in_edges(node).map(|e| e.other(node)).collect()
        }
    }

    /// Number of outgoing edges.
    #[must_use]
    pub fn out_degree(&self, node: usize) -> usize {
        self.out_edges.get(node).map_or(0, Vec::len)
    }

    /// Number of incoming edges.
    #[must_use]
    pub fn in_degree(&self, node: usize) -> usize {
        self.in_edges.get(node).map_or(0, Vec::len)
    }

    /// Total degree; a self-loop contributes 2.
    #[must_use]
    pub fn degree(&self, node: usize) -> usize {
        if self.directed {
            self.out_degree(node) + self.in_degree(node)
        } else {
            let loops = self.out_edges(node).filter(|e| e.is_loop()).count();
            self.out_degree(node) + loops
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
