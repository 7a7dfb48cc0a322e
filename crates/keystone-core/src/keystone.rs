//! # Keystone Index
//!
//! `keystone(n) = minmax(reach)(n) × minmax(leverage_or_asymmetry)(n)`
//!
//! Both factors are rescaled to [0, 1] independently, so the product is in
//! [0, 1] as well. A percentile transform ranks the result for threshold
//! flagging. Averaging percentiles over repeated thinned graphs is left to
//! the caller; the flags here work on whatever series they are given.

/// Rescale values to [0, 1].
///
/// A constant (or empty) series has no range and maps to all zeros.
#[must_use]
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if !(range > 0.0) {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - min) / range).collect()
}

/// Check if a series has no range (min-max normalization degenerates).
#[must_use]
pub fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Product of the min-max normalized reach and second factor.
///
/// Mismatched lengths are truncated to the shorter series.
#[must_use]
pub fn keystone_index(reach: &[f64], factor: &[f64]) -> Vec<f64> {
    min_max_normalize(reach)
        .into_iter()
        .zip(min_max_normalize(factor))
        .map(|(r, f)| r * f)
        .collect()
}

/// Percentile rank in [0, 100].
///
/// Ranks use the "max" method (ties share the highest rank) and map
/// linearly: `100 × (rank − 1) / (n − 1)`. A single value maps to 0.
#[must_use]
pub fn percentile_rank(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n < 2 {
        return vec![0.0; n];
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    values
        .iter()
        .map(|v| {
            let rank = sorted.partition_point(|x| x.total_cmp(v).is_le());
            100.0 * (rank as f64 - 1.0) / (n as f64 - 1.0)
        })
        .collect()
}

/// Flag nodes whose leverage and reach percentiles both reach `threshold`.
#[must_use]
pub fn flag_top_fraction(leverage_pctl: &[f64], reach_pctl: &[f64], threshold: f64) -> Vec<bool> {
    leverage_pctl
        .iter()
        .zip(reach_pctl)
        .map(|(l, r)| *l >= threshold && *r >= threshold)
        .collect()
}

/// Flag nodes whose (typically trial-averaged) percentile reaches `threshold`.
#[must_use]
pub fn flag_top_percentile(percentiles: &[f64], threshold: f64) -> Vec<bool> {
    percentiles.iter().map(|p| *p >= threshold).collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_max_bounds() {
        assert_eq!(min_max_normalize(&[2.0, 4.0, 3.0]), vec![0.0, 1.0, 0.5]);
        assert_eq!(min_max_normalize(&[5.0, 5.0]), vec![0.0, 0.0]);
        assert!(min_max_normalize(&[]).is_empty());
        assert!(is_constant(&[1.0, 1.0, 1.0]));
        assert!(!is_constant(&[1.0, 2.0]));
    }

    #[test]
    fn keystone_is_a_product() {
        let reach = [0.0, 50.0, 100.0];
        let leverage = [-1.0, 1.0, 0.0];
        assert_eq!(keystone_index(&reach, &leverage), vec![0.0, 0.5, 0.5]);
    }

    #[test]
    fn percentile_uses_max_rank() {
        // ranks (max): 1, 3, 3, 4
        let pct = percentile_rank(&[1.0, 2.0, 2.0, 7.0]);
        assert_eq!(pct[0], 0.0);
        assert!((pct[1] - 200.0 / 3.0).abs() < 1e-12);
        assert_eq!(pct[1], pct[2]);
        assert_eq!(pct[3], 100.0);
    }

    #[test]
    fn single_value_percentile_is_zero() {
        assert_eq!(percentile_rank(&[3.0]), vec![0.0]);
    }

    #[test]
    fn flags() {
        assert_eq!(
            flag_top_fraction(&[80.0, 90.0, 10.0], &[75.0, 10.0, 99.0], 75.0),
            vec![true, false, false]
        );
        assert_eq!(flag_top_percentile(&[74.9, 75.0], 75.0), vec![false, true]);
    }
}
