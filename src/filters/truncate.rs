use ndarray::{Array2, ArrayView2};
use tracing::debug;

use super::{FilterError, HistogramTruncator};
use crate::error::BoxError;

/// Clip a field to the values found at the `low` and `100 - high` percentiles.
///
/// Percentiles are exact: values are sorted and each sample `i` of `N` sits at
/// `100 * (i + 0.5) / N`, with the minimum pinned at 0 and the maximum at 100;
/// requests in between are interpolated linearly. NaN cells are ignored for the
/// statistics and left as NaN.
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentileTruncator;

impl PercentileTruncator {
    pub fn truncate_field(
        &self,
        field: ArrayView2<f64>,
        low: f64,
        high: f64,
    ) -> Result<Array2<f64>, FilterError> {
        if !(0.0..=100.0).contains(&low) || !(0.0..=100.0).contains(&high) || low + high >= 100.0
        {
            return Err(FilterError::InvalidPercentile { low, high });
        }

        let mut sorted: Vec<f64> = field.iter().copied().filter(|v| !v.is_nan()).collect();
        if sorted.is_empty() {
            return Ok(field.to_owned());
        }
        sorted.sort_by(|a, b| a.total_cmp(b));

        let low_clip = percentile(&sorted, low);
        let high_clip = percentile(&sorted, 100.0 - high);
        debug!(
            "Histogram truncation: clipping to [{:.6}, {:.6}] ({}%/{}%)",
            low_clip, high_clip, low, high
        );

        Ok(field.mapv(|v| {
            if v.is_nan() {
                v
            } else {
                v.max(low_clip).min(high_clip)
            }
        }))
    }
}

impl HistogramTruncator for PercentileTruncator {
    fn truncate(
        &self,
        field: ArrayView2<f64>,
        low_pct: f64,
        high_pct: f64,
    ) -> Result<Array2<f64>, BoxError> {
        Ok(self.truncate_field(field, low_pct, high_pct)?)
    }
}

/// Value at percentile `p` (0..=100) of an ascending, NaN-free, non-empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    let first = sorted[0];
    let last = sorted[n - 1];

    // sample positions run from 50/n to 100 - 50/n
    let pos = p * n as f64 / 100.0 - 0.5;
    if pos <= 0.0 {
        return first;
    }
    if pos >= (n - 1) as f64 {
        return last;
    }
    let lo = pos.floor() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
}
