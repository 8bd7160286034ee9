//! Descriptive statistics over numeric columns.

use serde::Serialize;

/// Summary statistics for a set of values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
}

/// Compute statistics for a set of values.
/// Calculates mean, median, population std dev, min, max, and sum.
pub fn compute_stats(values: &[f64]) -> DescriptiveStats {
    if values.is_empty() {
        return DescriptiveStats {
            count: 0,
            mean: 0.0,
            median: 0.0,
            std_dev: 0.0,
            min: 0.0,
            max: 0.0,
            sum: 0.0,
        };
    }

    let count = values.len();
    let sum: f64 = values.iter().sum();
    let mean = sum / count as f64;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median = quantile_sorted(&sorted, 0.5).unwrap_or(0.0);

    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / count as f64;
    let std_dev = variance.sqrt();

    let min = sorted.first().copied().unwrap_or(0.0);
    let max = sorted.last().copied().unwrap_or(0.0);

    DescriptiveStats {
        count,
        mean,
        median,
        std_dev,
        min,
        max,
        sum,
    }
}

/// Linear-interpolation quantile over an already sorted slice.
///
/// The position is `q * (n - 1)`; when it falls between two order statistics
/// the result interpolates linearly between them. Returns `None` for an empty
/// slice or a `q` outside `[0, 1]`.
///
/// # Examples
///
/// ```
/// use telco_cleanse::services::stats::quantile_sorted;
///
/// let sorted = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(quantile_sorted(&sorted, 0.5), Some(2.5));
/// assert_eq!(quantile_sorted(&sorted, 0.25), Some(1.75));
/// ```
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let frac = pos - lo as f64;
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

/// Median of an unsorted slice, `None` when empty.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    quantile_sorted(&sorted, 0.5)
}
