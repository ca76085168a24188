#![allow(dead_code)]

//! Deterministic stand-ins for the pipeline collaborators.

use std::f64::consts::FRAC_PI_2;
use std::sync::Mutex;

use ndarray::{Array2, ArrayView2};
use ppdrc::filters::{HistogramTruncator, MonogenicSignalProvider, NoDataFiller};
use ppdrc::{BoxError, MonogenicResponse, ScaleSignal};
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, thiserror::Error)]
#[error("stub failure: {0}")]
pub struct StubError(pub &'static str);

/// Replaces NaN with a constant and remembers what it was given.
pub struct ConstantFill {
    pub value: f64,
    pub seen: Mutex<Vec<Array2<f64>>>,
    pub shape_override: Option<(usize, usize)>,
}

impl ConstantFill {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            seen: Mutex::new(Vec::new()),
            shape_override: None,
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl NoDataFiller for ConstantFill {
    fn fill(&self, field: ArrayView2<f64>) -> Result<Array2<f64>, BoxError> {
        self.seen.lock().unwrap().push(field.to_owned());
        if let Some(shape) = self.shape_override {
            return Ok(Array2::zeros(shape));
        }
        Ok(field.mapv(|v| if v.is_nan() { self.value } else { v }))
    }
}

pub struct FailingFill;

impl NoDataFiller for FailingFill {
    fn fill(&self, _field: ArrayView2<f64>) -> Result<Array2<f64>, BoxError> {
        Err(Box::new(StubError("fill")))
    }
}

/// Phase alternates between +pi/2 and -pi/2 in a checkerboard, so
/// `sin(phase) = +-1`; energy is `|value| * wavelength / 10`.
pub struct CheckerProvider {
    pub seen: Mutex<Vec<(Array2<f64>, Vec<f64>, u32)>>,
    pub drop_last_scale: bool,
    pub energy_shape: Option<(usize, usize)>,
    pub fail: bool,
}

impl CheckerProvider {
    pub fn new() -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
            drop_last_scale: false,
            energy_shape: None,
            fail: false,
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

pub fn checker_phase(i: usize, j: usize) -> f64 {
    if (i + j) % 2 == 0 { FRAC_PI_2 } else { -FRAC_PI_2 }
}

/// What the pipeline should produce for one cell before clipping and masking.
pub fn expected_cell(value: f64, wavelength: f64, i: usize, j: usize) -> f64 {
    checker_phase(i, j).sin() * (value.abs() * wavelength / 10.0).ln_1p()
}

impl MonogenicSignalProvider for CheckerProvider {
    fn analyze(
        &self,
        field: ArrayView2<f64>,
        wavelengths: &[f64],
        order: u32,
    ) -> Result<MonogenicResponse, BoxError> {
        self.seen
            .lock()
            .unwrap()
            .push((field.to_owned(), wavelengths.to_vec(), order));
        if self.fail {
            return Err(Box::new(StubError("analyze")));
        }

        let dim = field.dim();
        let mut scales: Vec<ScaleSignal> = wavelengths
            .iter()
            .map(|&w| ScaleSignal {
                phase: Array2::from_shape_fn(dim, |(i, j)| checker_phase(i, j)),
                orientation: Array2::zeros(dim),
                energy: match self.energy_shape {
                    Some(shape) => Array2::ones(shape),
                    None => field.mapv(|v| v.abs() * w / 10.0),
                },
            })
            .collect();
        if self.drop_last_scale {
            scales.pop();
        }
        Ok(MonogenicResponse {
            scales,
            responses: Vec::new(),
        })
    }
}

/// Leaves values untouched.
pub struct PassThrough;

impl HistogramTruncator for PassThrough {
    fn truncate(
        &self,
        field: ArrayView2<f64>,
        _low_pct: f64,
        _high_pct: f64,
    ) -> Result<Array2<f64>, BoxError> {
        Ok(field.to_owned())
    }
}

/// Clamps every value into `[lo, hi]`, even when that moves zeros.
pub struct FixedClamp {
    pub lo: f64,
    pub hi: f64,
    pub seen_pct: Mutex<Vec<(f64, f64)>>,
}

impl FixedClamp {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self {
            lo,
            hi,
            seen_pct: Mutex::new(Vec::new()),
        }
    }
}

impl HistogramTruncator for FixedClamp {
    fn truncate(
        &self,
        field: ArrayView2<f64>,
        low_pct: f64,
        high_pct: f64,
    ) -> Result<Array2<f64>, BoxError> {
        self.seen_pct.lock().unwrap().push((low_pct, high_pct));
        Ok(field.mapv(|v| v.clamp(self.lo, self.hi)))
    }
}

/// Returns a field of the wrong shape.
pub struct Reshaping;

impl HistogramTruncator for Reshaping {
    fn truncate(
        &self,
        field: ArrayView2<f64>,
        _low_pct: f64,
        _high_pct: f64,
    ) -> Result<Array2<f64>, BoxError> {
        let (r, c) = field.dim();
        Ok(Array2::zeros((c + 1, r)))
    }
}

pub struct FailingTruncator;

impl HistogramTruncator for FailingTruncator {
    fn truncate(
        &self,
        _field: ArrayView2<f64>,
        _low_pct: f64,
        _high_pct: f64,
    ) -> Result<Array2<f64>, BoxError> {
        Err(Box::new(StubError("truncate")))
    }
}
