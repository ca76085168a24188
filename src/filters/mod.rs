//! Collaborators the compression pipeline delegates to, and their default
//! implementations.
//!
//! The pipeline only sees the three traits below, so any of them can be swapped
//! for a different inpainting scheme, filter bank, or contrast clip (or for a
//! deterministic stub in tests).
use ndarray::{Array2, ArrayView2};
use thiserror::Error;

use crate::error::BoxError;
use crate::types::MonogenicResponse;

pub mod fill;
pub mod monogenic;
pub mod truncate;

pub use fill::{MeanFill, NearestFill};
pub use monogenic::ButterworthMonogenic;
pub use truncate::PercentileTruncator;

/// Errors raised by the default collaborators
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Field contains no valid (non-NaN) data")]
    NoValidData,

    #[error("Invalid percentile clip: low={low}, high={high}")]
    InvalidPercentile { low: f64, high: f64 },

    #[error("Invalid wavelength: {0}")]
    InvalidWavelength(f64),

    #[error("Invalid filter order: {0}")]
    InvalidOrder(u32),
}

/// Replaces NaN (no-data) cells with plausible values so the field can be transformed.
pub trait NoDataFiller: Send + Sync {
    fn fill(&self, field: ArrayView2<f64>) -> Result<Array2<f64>, BoxError>;
}

/// Computes local phase, orientation and energy for each wavelength.
pub trait MonogenicSignalProvider: Send + Sync {
    fn analyze(
        &self,
        field: ArrayView2<f64>,
        wavelengths: &[f64],
        order: u32,
    ) -> Result<MonogenicResponse, BoxError>;
}

/// Clips the low and high tails of a field's value distribution, given as percentages.
pub trait HistogramTruncator: Send + Sync {
    fn truncate(
        &self,
        field: ArrayView2<f64>,
        low_pct: f64,
        high_pct: f64,
    ) -> Result<Array2<f64>, BoxError>;
}

impl<T: NoDataFiller + ?Sized> NoDataFiller for &T {
    fn fill(&self, field: ArrayView2<f64>) -> Result<Array2<f64>, BoxError> {
        (**self).fill(field)
    }
}

impl<T: MonogenicSignalProvider + ?Sized> MonogenicSignalProvider for &T {
    fn analyze(
        &self,
        field: ArrayView2<f64>,
        wavelengths: &[f64],
        order: u32,
    ) -> Result<MonogenicResponse, BoxError> {
        (**self).analyze(field, wavelengths, order)
    }
}

impl<T: HistogramTruncator + ?Sized> HistogramTruncator for &T {
    fn truncate(
        &self,
        field: ArrayView2<f64>,
        low_pct: f64,
        high_pct: f64,
    ) -> Result<Array2<f64>, BoxError> {
        (**self).truncate(field, low_pct, high_pct)
    }
}

impl<T: NoDataFiller + ?Sized> NoDataFiller for Box<T> {
    fn fill(&self, field: ArrayView2<f64>) -> Result<Array2<f64>, BoxError> {
        (**self).fill(field)
    }
}

impl<T: MonogenicSignalProvider + ?Sized> MonogenicSignalProvider for Box<T> {
    fn analyze(
        &self,
        field: ArrayView2<f64>,
        wavelengths: &[f64],
        order: u32,
    ) -> Result<MonogenicResponse, BoxError> {
        (**self).analyze(field, wavelengths, order)
    }
}

impl<T: HistogramTruncator + ?Sized> HistogramTruncator for Box<T> {
    fn truncate(
        &self,
        field: ArrayView2<f64>,
        low_pct: f64,
        high_pct: f64,
    ) -> Result<Array2<f64>, BoxError> {
        (**self).truncate(field, low_pct, high_pct)
    }
}
