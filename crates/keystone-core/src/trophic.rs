//! # Rooted Trophic Level
//!
//! Trophic level places each node in the influence hierarchy: nodes that only
//! drive others sit at 0, nodes at the end of long causal chains approach 1.
//!
//! ## Algorithm
//!
//! 1. Reverse every edge.
//! 2. Add a synthetic root with an edge from every node to it. This grounds
//!    cycles and disconnected components.
//! 3. Row-normalize the adjacency matrix `A` into `B` (zero rows keep
//!    factor 1).
//! 4. Solve `(I - B) x = 1`.
//! 5. Drop the root, shift so the minimum is 1, min-max normalize.
//!
//! The rooted matrix is built over node indices `0..n` with the root at `n`;
//! the input graph is never touched.

use crate::graph::Graph;
use crate::keystone::min_max_normalize;
use crate::primitives::SINGULAR_PIVOT_EPSILON;
use crate::KeystoneError;
use ndarray::{Array1, Array2};

/// Rooted trophic levels of every node, in node index order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrophicLevels {
    /// Levels shifted so the minimum is 1.
    pub raw: Vec<f64>,
    /// Levels min-max normalized to [0, 1].
    pub normalized: Vec<f64>,
}

/// Build the row-normalized adjacency of the reversed, rooted graph.
///
/// Edge multiplicity counts. Undirected edges contribute in both directions.
fn rooted_transition_matrix(graph: &Graph) -> Array2<f64> {
    let n = graph.node_count();
    let root = n;
    let mut a = Array2::<f64>::zeros((n + 1, n + 1));

    for edge in graph.edges() {
        a[[edge.target, edge.source]] += 1.0;
        if !graph.is_directed() && !edge.is_loop() {
            a[[edge.source, edge.target]] += 1.0;
        }
    }
    for i in 0..n {
        a[[i, root]] += 1.0;
    }

    for mut row in a.rows_mut() {
        let sum: f64 = row.sum();
        if sum != 0.0 {
            row.mapv_inplace(|v| v / sum);
        }
    }
    a
}

/// Solve `m x = b` by Gaussian elimination with partial pivoting.
fn solve(mut m: Array2<f64>, mut b: Array1<f64>) -> Result<Array1<f64>, KeystoneError> {
    let n = b.len();

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| m[[i, col]].abs().total_cmp(&m[[j, col]].abs()))
            .unwrap_or(col);
        if m[[pivot, col]].abs() < SINGULAR_PIVOT_EPSILON {
            return Err(KeystoneError::SingularMatrix(format!(
                "(I - B) has no usable pivot in column {} of {}",
                col, n
            )));
        }
        if pivot != col {
            for k in 0..n {
                m.swap([pivot, k], [col, k]);
            }
            b.swap(pivot, col);
        }

        for row in (col + 1)..n {
            let factor = m[[row, col]] / m[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                m[[row, k]] -= factor * m[[col, k]];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = Array1::<f64>::zeros(n);
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| m[[row, k]] * x[k]).sum();
        x[row] = (b[row] - tail) / m[[row, row]];
    }
    Ok(x)
}

/// Compute rooted trophic levels.
///
/// Returns `SingularMatrix` when `(I - B)` cannot be solved; callers are
/// expected to treat that as "trophic level unavailable".
pub fn rooted_trophic_levels(graph: &Graph) -> Result<TrophicLevels, KeystoneError> {
    let n = graph.node_count();
    if n == 0 {
        return Ok(TrophicLevels::default());
    }

    let b = rooted_transition_matrix(graph);
    let m = Array2::<f64>::eye(n + 1) - &b;
    let x = solve(m, Array1::<f64>::ones(n + 1))?;

    let levels: Vec<f64> = x.iter().take(n).copied().collect();
    let shift = levels.iter().copied().fold(f64::INFINITY, f64::min) - 1.0;
    let raw: Vec<f64> = levels.iter().map(|v| v - shift).collect();
    let normalized = min_max_normalize(&raw);

    tracing::debug!("Solved rooted trophic levels for {} nodes", n);
    Ok(TrophicLevels { raw, normalized })
}

// =============================================================================
// TESTS
// =============================================================================
