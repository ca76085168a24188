use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ndarray::{Array2, ArrayView2};
use tracing::debug;

use super::{FilterError, NoDataFiller};
use crate::error::BoxError;

const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Fill each NaN cell with the value of the nearest valid cell.
///
/// Sources are propagated outward from every valid cell in order of squared
/// Euclidean distance, so each hole takes the value of the source that reaches it
/// first. This is a crude inpainting scheme, but it keeps artifacts at the edges of
/// no-data regions small once the field is highpass filtered.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestFill;

impl NearestFill {
    pub fn fill_nearest(&self, field: ArrayView2<f64>) -> Result<Array2<f64>, FilterError> {
        let (rows, cols) = field.dim();
        let mut out = field.to_owned();
        let mut best = vec![u64::MAX; rows * cols];
        let mut done = vec![false; rows * cols];
        let mut heap = BinaryHeap::new();

        for ((i, j), &v) in field.indexed_iter() {
            if !v.is_nan() {
                best[i * cols + j] = 0;
                heap.push(Reverse((0u64, i, j, i, j)));
            }
        }

        if heap.is_empty() {
            return Err(FilterError::NoValidData);
        }
        let holes = rows * cols - heap.len();
        if holes == 0 {
            return Ok(out);
        }
        debug!("Nearest fill: {} no-data cells", holes);

        while let Some(Reverse((_, i, j, si, sj))) = heap.pop() {
            let k = i * cols + j;
            if done[k] {
                continue;
            }
            done[k] = true;
            out[[i, j]] = field[[si, sj]];

            for (di, dj) in NEIGHBOURS {
                let ni = i as isize + di;
                let nj = j as isize + dj;
                if ni < 0 || nj < 0 || ni >= rows as isize || nj >= cols as isize {
                    continue;
                }
                let (ni, nj) = (ni as usize, nj as usize);
                let nk = ni * cols + nj;
                if done[nk] {
                    continue;
                }
                let dr = ni.abs_diff(si) as u64;
                let dc = nj.abs_diff(sj) as u64;
                let d2 = dr * dr + dc * dc;
                if d2 < best[nk] {
                    best[nk] = d2;
                    heap.push(Reverse((d2, ni, nj, si, sj)));
                }
            }
        }
        Ok(out)
    }
}

impl NoDataFiller for NearestFill {
    fn fill(&self, field: ArrayView2<f64>) -> Result<Array2<f64>, BoxError> {
        Ok(self.fill_nearest(field)?)
    }
}

/// Fill each NaN cell with the mean of all valid cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanFill;

impl NoDataFiller for MeanFill {
    fn fill(&self, field: ArrayView2<f64>) -> Result<Array2<f64>, BoxError> {
        let (sum, count) = field
            .iter()
            .filter(|v| !v.is_nan())
            .fold((0.0_f64, 0usize), |(s, c), &v| (s + v, c + 1));
        if count == 0 {
            return Err(FilterError::NoValidData.into());
        }
        let mean = sum / count as f64;
        Ok(field.mapv(|v| if v.is_nan() { mean } else { v }))
    }
}
