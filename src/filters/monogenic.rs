use std::sync::Arc;

use ndarray::{Array2, ArrayView2, Zip};
use num_complex::Complex64;
use rayon::prelude::*;
use rustfft::{Fft, FftPlanner};
use tracing::debug;

use super::{FilterError, MonogenicSignalProvider};
use crate::error::BoxError;
use crate::types::{FilterResponse, MonogenicResponse, ScaleSignal};

/// Monogenic signal of a Butterworth highpassed field.
///
/// For each cut-in wavelength the field is highpass filtered in the frequency
/// domain and paired with its two Riesz transforms; local phase, orientation and
/// energy follow pointwise from the three responses. Wavelengths are analyzed on
/// the rayon pool unless `parallel` is off.
#[derive(Debug, Clone, Copy)]
pub struct ButterworthMonogenic {
    pub parallel: bool,
}

impl Default for ButterworthMonogenic {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Planned forward and inverse transforms for one field shape.
struct Fft2 {
    rows: usize,
    cols: usize,
    row_fwd: Arc<dyn Fft<f64>>,
    col_fwd: Arc<dyn Fft<f64>>,
    row_inv: Arc<dyn Fft<f64>>,
    col_inv: Arc<dyn Fft<f64>>,
}

impl Fft2 {
    fn new(rows: usize, cols: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            rows,
            cols,
            row_fwd: planner.plan_fft_forward(cols),
            col_fwd: planner.plan_fft_forward(rows),
            row_inv: planner.plan_fft_inverse(cols),
            col_inv: planner.plan_fft_inverse(rows),
        }
    }

    fn forward(&self, data: &mut Array2<Complex64>) {
        Self::apply(data, &self.row_fwd, &self.col_fwd);
    }

    /// Inverse transform, normalized so that `inverse(forward(x)) == x`.
    fn inverse(&self, data: &mut Array2<Complex64>) {
        Self::apply(data, &self.row_inv, &self.col_inv);
        let scale = 1.0 / (self.rows * self.cols) as f64;
        data.mapv_inplace(|c| c * scale);
    }

    fn apply(data: &mut Array2<Complex64>, row_fft: &Arc<dyn Fft<f64>>, col_fft: &Arc<dyn Fft<f64>>) {
        let mut buf = Vec::with_capacity(data.nrows().max(data.ncols()));
        for mut row in data.rows_mut() {
            buf.clear();
            buf.extend(row.iter().copied());
            row_fft.process(&mut buf);
            row.iter_mut().zip(&buf).for_each(|(dst, &src)| *dst = src);
        }
        for mut col in data.columns_mut() {
            buf.clear();
            buf.extend(col.iter().copied());
            col_fft.process(&mut buf);
            col.iter_mut().zip(&buf).for_each(|(dst, &src)| *dst = src);
        }
    }
}

/// Unshifted frequencies (cycles/pixel) along one axis of length `n`.
///
/// Even lengths span `[-1/2, 1/2)`, odd lengths `[-1/2, 1/2]`, with zero at index 0.
pub fn axis_frequencies(n: usize) -> Vec<f64> {
    let d = (if n % 2 == 0 { n } else { (n - 1).max(1) }) as f64;
    let half = n.div_ceil(2);
    (0..n)
        .map(|k| {
            let k = if k < half { k as f64 } else { k as f64 - n as f64 };
            k / d
        })
        .collect()
}

/// Frequency grid `(u1, u2, radius)`; `u1` varies along columns, `u2` along rows.
pub fn filter_grid(rows: usize, cols: usize) -> (Array2<f64>, Array2<f64>, Array2<f64>) {
    let ucols = axis_frequencies(cols);
    let urows = axis_frequencies(rows);
    let u1 = Array2::from_shape_fn((rows, cols), |(_, j)| ucols[j]);
    let u2 = Array2::from_shape_fn((rows, cols), |(i, _)| urows[i]);
    let radius = Array2::from_shape_fn((rows, cols), |(i, j)| ucols[j].hypot(urows[i]));
    (u1, u2, radius)
}

/// Butterworth highpass with cut-in frequency `1 / wavelength`, zero at DC.
pub fn butterworth_highpass(radius: &Array2<f64>, wavelength: f64, order: u32) -> Array2<f64> {
    let exponent = 2.0 * f64::from(order);
    radius.mapv(|r| 1.0 - 1.0 / (1.0 + (r * wavelength).powf(exponent)))
}

impl ButterworthMonogenic {
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn compute(
        &self,
        field: ArrayView2<f64>,
        wavelengths: &[f64],
        order: u32,
    ) -> Result<MonogenicResponse, FilterError> {
        if order == 0 {
            return Err(FilterError::InvalidOrder(order));
        }
        if let Some(&w) = wavelengths.iter().find(|w| !(w.is_finite() && **w > 0.0)) {
            return Err(FilterError::InvalidWavelength(w));
        }
        let (rows, cols) = field.dim();
        if rows == 0 || cols == 0 || field.iter().any(|v| v.is_nan()) {
            return Err(FilterError::NoValidData);
        }

        debug!(
            "Monogenic analysis: {}x{} field, {} wavelengths, order {}",
            rows,
            cols,
            wavelengths.len(),
            order
        );

        let fft = Fft2::new(rows, cols);
        let mut spectrum = field.mapv(|v| Complex64::new(v, 0.0));
        fft.forward(&mut spectrum);

        // Packed Riesz pair: H1 + iH2 with H1 = i u1 / r and H2 = i u2 / r
        let (u1, u2, radius) = filter_grid(rows, cols);
        let mut riesz = Array2::<Complex64>::zeros((rows, cols));
        Zip::from(&mut riesz)
            .and(&u1)
            .and(&u2)
            .and(&radius)
            .for_each(|h, &x, &y, &r| {
                let r = if r == 0.0 { 1.0 } else { r };
                *h = Complex64::new(-y / r, x / r);
            });

        let analyze_scale = |&w: &f64| -> (ScaleSignal, FilterResponse) {
            let highpass = butterworth_highpass(&radius, w, order);

            let mut even = Array2::<Complex64>::zeros((rows, cols));
            Zip::from(&mut even)
                .and(&spectrum)
                .and(&highpass)
                .for_each(|e, &s, &h| *e = s * h);
            let mut odd = &even * &riesz;

            fft.inverse(&mut even);
            fft.inverse(&mut odd);

            let even = even.mapv(|c| c.re);
            let odd1 = odd.mapv(|c| c.re);
            let odd2 = odd.mapv(|c| c.im);

            let mut phase = Array2::<f64>::zeros((rows, cols));
            let mut orientation = Array2::<f64>::zeros((rows, cols));
            let mut energy = Array2::<f64>::zeros((rows, cols));
            Zip::from(&mut phase)
                .and(&mut orientation)
                .and(&mut energy)
                .and(&even)
                .and(&odd1)
                .and(&odd2)
                .for_each(|p, o, e, &f, &h1, &h2| {
                    let odd_mag = h1.hypot(h2);
                    *p = f.atan2(odd_mag);
                    *o = (-h2).atan2(h1);
                    *e = f.hypot(odd_mag);
                });

            (
                ScaleSignal {
                    phase,
                    orientation,
                    energy,
                },
                FilterResponse {
                    highpass,
                    even,
                    odd1,
                    odd2,
                },
            )
        };

        let (scales, responses): (Vec<ScaleSignal>, Vec<FilterResponse>) = if self.parallel {
            wavelengths.par_iter().map(&analyze_scale).unzip()
        } else {
            wavelengths.iter().map(&analyze_scale).unzip()
        };

        Ok(MonogenicResponse { scales, responses })
    }
}

impl MonogenicSignalProvider for ButterworthMonogenic {
    fn analyze(
        &self,
        field: ArrayView2<f64>,
        wavelengths: &[f64],
        order: u32,
    ) -> Result<MonogenicResponse, BoxError> {
        Ok(self.compute(field, wavelengths, order)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn axis_frequencies_even_and_odd() {
        assert_eq!(axis_frequencies(4), vec![0.0, 0.25, -0.5, -0.25]);
        assert_eq!(axis_frequencies(5), vec![0.0, 0.25, 0.5, -0.5, -0.25]);
        assert_eq!(axis_frequencies(1), vec![0.0]);
    }

    #[test]
    fn highpass_blocks_dc() {
        let (_, _, radius) = filter_grid(8, 6);
        let h = butterworth_highpass(&radius, 4.0, 2);
        assert_eq!(h[[0, 0]], 0.0);
        assert!(h.iter().all(|&v| (0.0..=1.0).contains(&v)));
        // at the cut-in frequency the response is one half
        let r = Array2::from_elem((1, 1), 0.25);
        assert!((butterworth_highpass(&r, 4.0, 3)[[0, 0]] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn huge_order_approaches_ideal_highpass() {
        let r = ndarray::array![[0.0, 0.1, 0.25, 0.5]];
        for order in [1 << 30, u32::MAX] {
            let h = butterworth_highpass(&r, 4.0, order);
            assert_eq!(h[[0, 0]], 0.0);
            assert_eq!(h[[0, 1]], 0.0);
            assert!((h[[0, 2]] - 0.5).abs() < 1e-12);
            assert_eq!(h[[0, 3]], 1.0);
        }
    }

    #[test]
    fn serial_matches_parallel() {
        let field = Array2::from_shape_fn((12, 10), |(i, j)| ((i * j) as f64 * 0.37).cos() * 50.0);
        let wavelengths = [3.0, 6.0, 9.0];
        let par = ButterworthMonogenic::default().compute(field.view(), &wavelengths, 2).unwrap();
        let ser = ButterworthMonogenic::default()
            .with_parallel(false)
            .compute(field.view(), &wavelengths, 2)
            .unwrap();
        for (a, b) in par.scales.iter().zip(&ser.scales) {
            assert_eq!(a.energy, b.energy);
            assert_eq!(a.phase, b.phase);
        }
    }

    #[test]
    fn fft_round_trip() {
        let field = Array2::from_shape_fn((6, 5), |(i, j)| (i as f64 * 1.3 - j as f64).sin());
        let fft = Fft2::new(6, 5);
        let mut data = field.mapv(|v| Complex64::new(v, 0.0));
        fft.forward(&mut data);
        fft.inverse(&mut data);
        for (a, b) in data.iter().zip(field.iter()) {
            assert!((a.re - b).abs() < 1e-12);
            assert!(a.im.abs() < 1e-12);
        }
    }

    #[test]
    fn constant_field_has_no_energy() {
        let field = Array2::from_elem((16, 16), 10.0);
        let out = ButterworthMonogenic::default().compute(field.view(), &[4.0, 8.0], 2).unwrap();
        assert_eq!(out.scales.len(), 2);
        assert_eq!(out.responses.len(), 2);
        for s in &out.scales {
            assert!(s.energy.iter().all(|&e| e.abs() < 1e-9));
        }
    }

    #[test]
    fn cosine_wave_has_flat_energy_and_tracks_phase() {
        let (rows, cols, period, amplitude) = (64, 64, 8.0, 3.0);
        let field = Array2::from_shape_fn((rows, cols), |(_, j)| {
            amplitude * (2.0 * PI * j as f64 / period).cos()
        });
        let wavelength = 32.0;
        let out = ButterworthMonogenic::default().compute(field.view(), &[wavelength], 2).unwrap();
        let s = &out.scales[0];

        let gain = 1.0 - 1.0 / (1.0 + (wavelength / period).powi(4));
        for ((i, j), &e) in s.energy.indexed_iter() {
            assert!((e - amplitude * gain).abs() < 1e-9, "energy at ({}, {})", i, j);
            let expected = (2.0 * PI * j as f64 / period).cos();
            assert!((s.phase[[i, j]].sin() - expected).abs() < 1e-9);
            assert!(s.phase[[i, j]].abs() <= PI / 2.0 + 1e-12);
        }
    }

    #[test]
    fn rejects_bad_arguments() {
        let field = Array2::from_elem((4, 4), 1.0);
        assert!(matches!(
            ButterworthMonogenic::default().compute(field.view(), &[0.0], 2),
            Err(FilterError::InvalidWavelength(_))
        ));
        assert!(matches!(
            ButterworthMonogenic::default().compute(field.view(), &[5.0], 0),
            Err(FilterError::InvalidOrder(0))
        ));
        let mut holes = field.clone();
        holes[[0, 0]] = f64::NAN;
        assert!(matches!(
            ButterworthMonogenic::default().compute(holes.view(), &[5.0], 2),
            Err(FilterError::NoValidData)
        ));
    }
}
