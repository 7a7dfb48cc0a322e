//! Mass and heat diffusion over the bipartite structure.
//!
//! `P = rownorm(T) · rownorm(Tᵗ)` is the two-step transition matrix
//! R → C → R. Heat diffusion is its transpose; `hybrid` interpolates the
//! two elementwise and `ycn` rescales `P` by its stationary distribution.

use super::incidence::row_normalize;
use ndarray::{Array1, Array2, Zip};

/// Two-step transition matrix `rownorm(T) · rownorm(Tᵗ)`.
#[must_use]
pub fn transition(t: &Array2<f64>) -> Array2<f64> {
    let forward = row_normalize(t);
    let backward = row_normalize(&t.t().to_owned());
    forward.dot(&backward)
}

/// `P^l ∘ (Pᵗ)^(1−l)` over entries where both factors are nonzero.
///
/// At `l = 1` this is exactly `P`, at `l = 0` exactly `Pᵗ`.
#[must_use]
pub fn hybrid(p: &Array2<f64>, lambda: f64) -> Array2<f64> {
    let heats = p.t();
    let mut out = Array2::<f64>::zeros(p.raw_dim());
    Zip::from(&mut out)
        .and(p)
        .and(&heats)
        .for_each(|o, &pv, &hv| {
            if pv == 0.0 || hv == 0.0 {
                return;
            }
            *o = if lambda == 1.0 {
                pv
            } else if lambda == 0.0 {
                hv
            } else {
                pv.powf(lambda) * hv.powf(1.0 - lambda)
            };
        });
    out
}

/// Outcome of the stationary-distribution iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct Stationary {
    /// L1-normalized distribution over rows.
    pub distribution: Array1<f64>,
    /// False when the iteration fell back to the uniform distribution.
    pub converged: bool,
}

/// Leading left eigenvector of `P` (right eigenvector of `Pᵗ`) by power
/// iteration from the uniform vector, L1-normalized after every step.
///
/// Falls back to uniform when the iterate vanishes or does not settle within
/// `max_iterations` steps of L1 change below `tolerance`.
#[must_use]
pub fn stationary_distribution(p: &Array2<f64>, tolerance: f64, max_iterations: usize) -> Stationary {
    let n = p.nrows();
    let uniform = Array1::from_elem(n, if n == 0 { 0.0 } else { 1.0 / n as f64 });
    let fallback = Stationary {
        distribution: uniform.clone(),
        converged: false,
    };

    let pt = p.t();
    let mut s = uniform;
    for _ in 0..max_iterations {
        let mut next = pt.dot(&s);
        let total: f64 = next.iter().map(|v| v.abs()).sum();
        if total == 0.0 || !total.is_finite() {
            return fallback;
        }
        next.mapv_inplace(|v| v / total);
        let change: f64 = next.iter().zip(s.iter()).map(|(a, b)| (a - b).abs()).sum();
        s = next;
        if change < tolerance {
            return Stationary {
                distribution: s,
                converged: true,
            };
        }
    }
    fallback
}

/// `U_ij = P_ij · s_j`.
#[must_use]
pub fn rescale_columns(p: &Array2<f64>, s: &Array1<f64>) -> Array2<f64> {
    let mut out = p.clone();
    for mut row in out.rows_mut() {
        row *= s;
    }
    out
}
