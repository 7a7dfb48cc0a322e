//! Pairwise row similarities: jaccard, cosine, euclidean and pearson.
//!
//! Each function returns a full `|R| × |R|` matrix with the diagonal left as
//! computed; the projector zeroes it afterwards.

use crate::primitives::{EUCLIDEAN_IDENTICAL_SIMILARITY, PEARSON_THRESHOLD};
use ndarray::{Array2, ArrayView1};

fn pairwise(t: &Array2<f64>, f: impl Fn(ArrayView1<'_, f64>, ArrayView1<'_, f64>) -> f64) -> Array2<f64> {
    let n = t.nrows();
    let mut out = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in i..n {
            let s = f(t.row(i), t.row(j));
            out[[i, j]] = s;
            out[[j, i]] = s;
        }
    }
    out
}

/// `1 − jaccard_distance` over the boolean (nonzero) pattern.
///
/// Two empty rows share nothing and score 0.
#[must_use]
pub fn jaccard(t: &Array2<f64>) -> Array2<f64> {
    pairwise(t, |a, b| {
        let (mut both, mut either) = (0usize, 0usize);
        for (x, y) in a.iter().zip(b.iter()) {
            let (x, y) = (*x != 0.0, *y != 0.0);
            if x && y {
                both += 1;
            }
            if x || y {
                either += 1;
            }
        }
        if either == 0 {
            0.0
        } else {
            both as f64 / either as f64
        }
    })
}

/// `1 − cosine_distance`, distance clipped to [0, 2]. Zero rows score 0.
#[must_use]
pub fn cosine(t: &Array2<f64>) -> Array2<f64> {
    pairwise(t, |a, b| {
        let norms = a.dot(&a).sqrt() * b.dot(&b).sqrt();
        if norms == 0.0 {
            return 0.0;
        }
        let distance = (1.0 - a.dot(&b) / norms).clamp(0.0, 2.0);
        1.0 - distance
    })
}

/// Inverse euclidean distance; identical rows score
/// [`EUCLIDEAN_IDENTICAL_SIMILARITY`] instead of infinity. A row without
/// incidences scores 0 against every row.
#[must_use]
pub fn euclidean(t: &Array2<f64>) -> Array2<f64> {
    pairwise(t, |a, b| {
        if a.iter().all(|v| *v == 0.0) || b.iter().all(|v| *v == 0.0) {
            return 0.0;
        }
        let d = a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt();
        if d == 0.0 {
            EUCLIDEAN_IDENTICAL_SIMILARITY
        } else {
            1.0 / d
        }
    })
}

/// Rescaled correlation `(2 − (1 − r)) / 2`; values below
/// [`PEARSON_THRESHOLD`] (negative correlation) are zeroed.
///
/// Returns the matrix plus the indices of zero-variance rows, whose
/// correlations are undefined and taken as 0.
#[must_use]
pub fn pearson(t: &Array2<f64>) -> (Array2<f64>, Vec<usize>) {
    let centered: Vec<Vec<f64>> = t
        .rows()
        .into_iter()
        .map(|row| {
            let mean = row.mean().unwrap_or(0.0);
            row.iter().map(|v| v - mean).collect()
        })
        .collect();
    let norms: Vec<f64> = centered
        .iter()
        .map(|c| c.iter().map(|v| v * v).sum::<f64>().sqrt())
        .collect();
    let constant: Vec<usize> = norms
        .iter()
        .enumerate()
        .filter(|(_, n)| **n == 0.0)
        .map(|(i, _)| i)
        .collect();

    let n = t.nrows();
    let mut out = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in i..n {
            if norms[i] == 0.0 || norms[j] == 0.0 {
                continue;
            }
            let cov: f64 = centered[i].iter().zip(&centered[j]).map(|(x, y)| x * y).sum();
            let r = (cov / (norms[i] * norms[j])).clamp(-1.0, 1.0);
            let s = (2.0 - (1.0 - r)) / 2.0;
            let s = if s < PEARSON_THRESHOLD { 0.0 } else { s };
            out[[i, j]] = s;
            out[[j, i]] = s;
        }
    }
    (out, constant)
}
