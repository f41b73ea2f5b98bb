//! Tukey interquartile-range bounds, used to flag anomalous scores.

/// Linear-interpolated percentile of a sample, following the same convention as `numpy.percentile`.
///
/// `sorted` must already be sorted ascending. `q` is in `[0, 100]`.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.len() == 1 { return sorted[0]; }
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi { return sorted[lo]; }
    let frac = rank - lo as f64;
    sorted[lo] * (1.0 - frac) + sorted[hi] * frac
}

/// Computes Tukey's interquartile-range bounds `[Q1 - k*IQR, Q3 + k*IQR]` for a sample of scores.
///
/// A value outside these bounds is considered anomalous. `k` controls how aggressive the cutoff
/// is; the recruiters use different `k` per model (see the one-class recruiters).
///
/// # Examples
/// ```
/// use binner_stats::iqr_bounds;
/// let scores = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
/// let (lower, upper) = iqr_bounds(&scores, 1.5);
/// assert!(lower < 1.0);
/// assert!(upper > 10.0);
/// ```
pub fn iqr_bounds(scores: &[f64], k: f64) -> (f64, f64) {
    let mut sorted: Vec<f64> = scores.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let q1 = percentile(&sorted, 25.0);
    let q3 = percentile(&sorted, 75.0);
    let iqr = q3 - q1;
    (q1 - k * iqr, q3 + k * iqr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_matches_median() {
        let v = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&v, 50.0), 3.0);
    }

    #[test]
    fn test_iqr_bounds_symmetric_for_uniform_sample() {
        let v: Vec<f64> = (0..=100).map(|i| i as f64).collect();
        let (lower, upper) = iqr_bounds(&v, 1.5);
        assert!((lower + upper - 100.0).abs() < 1e-9);
    }
}
