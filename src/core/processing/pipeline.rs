use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::core::params::CompressionParams;
use crate::core::processing::compress::compress_scale;
use crate::core::processing::harmonize::{harmonize_ranges, max_abs};
use crate::core::processing::mask::{apply_mask, nodata_mask};
use crate::error::{Error, Result};
use crate::filters::{
    ButterworthMonogenic, HistogramTruncator, MonogenicSignalProvider, NearestFill, NoDataFiller,
    PercentileTruncator,
};
use crate::types::{MonogenicResponse, ResultSet, ScaleSignal, Stage};

/// Multi-scale phase preserving dynamic range compression.
///
/// Runs three phases per call: mask and fill no-data, analyze every wavelength in
/// one batched call to the signal provider, then compress, mask and clip each scale
/// before stamping the shared calibration range into all of them.
#[derive(Debug, Clone)]
pub struct Pipeline<F = NearestFill, S = ButterworthMonogenic, T = PercentileTruncator> {
    filler: F,
    provider: S,
    truncator: T,
    params: CompressionParams,
}

impl Pipeline {
    /// Pipeline with the default nearest-neighbour filler, Butterworth monogenic
    /// provider and percentile truncator. The provider follows `params.parallel`.
    pub fn new(params: CompressionParams) -> Self {
        Self::with_collaborators(
            NearestFill,
            ButterworthMonogenic::default().with_parallel(params.parallel),
            PercentileTruncator,
            params,
        )
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(CompressionParams::default())
    }
}

impl<F, S, T> Pipeline<F, S, T>
where
    F: NoDataFiller,
    S: MonogenicSignalProvider,
    T: HistogramTruncator,
{
    pub fn with_collaborators(filler: F, provider: S, truncator: T, params: CompressionParams) -> Self {
        Self {
            filler,
            provider,
            truncator,
            params,
        }
    }

    pub fn params(&self) -> &CompressionParams {
        &self.params
    }

    /// Compress `field` at every wavelength (pixels) in `wavelengths`.
    ///
    /// Returns `ResultSet::Single` for one wavelength, otherwise one image per
    /// wavelength in input order. Cells that are NaN in `field` are 0 in every
    /// image, except where they coincide with the two calibration pixels.
    pub fn run(&self, field: ArrayView2<f64>, wavelengths: &[f64]) -> Result<ResultSet> {
        validate_inputs(field, wavelengths, &self.params)?;
        let shape = field.dim();
        let clip = self.params.clip;

        info!(
            "Compressing {}x{} field at {} scales (clip={}%, order={})",
            shape.0,
            shape.1,
            wavelengths.len(),
            clip,
            self.params.order
        );

        // Phase 1: mask is taken from the raw field, before any filling
        let mask = nodata_mask(field);
        let filled = self
            .filler
            .fill(field)
            .map_err(|e| Error::collaborator(Stage::Fill, e))?;
        check_shape(Stage::Fill, shape, filled.dim())?;

        // Phase 2
        let MonogenicResponse { scales, .. } = self
            .provider
            .analyze(filled.view(), wavelengths, self.params.order)
            .map_err(|e| Error::collaborator(Stage::Analyze, e))?;
        if scales.len() != wavelengths.len() {
            return Err(Error::ScaleCountMismatch {
                expected: wavelengths.len(),
                found: scales.len(),
            });
        }
        for signal in &scales {
            check_shape(Stage::Analyze, shape, signal.phase.dim())?;
            check_shape(Stage::Analyze, shape, signal.orientation.dim())?;
            check_shape(Stage::Analyze, shape, signal.energy.dim())?;
        }

        // Phase 3a: scales are independent until harmonization
        let process = |signal: ScaleSignal| -> Result<Array2<f64>> {
            let mut image = compress_scale(&signal);
            apply_mask(&mut image, &mask);
            let mut clipped = self
                .truncator
                .truncate(image.view(), clip, clip)
                .map_err(|e| Error::collaborator(Stage::Truncate, e))?;
            check_shape(Stage::Truncate, shape, clipped.dim())?;
            // the truncator may have pulled masked zeros up to its lower bound
            apply_mask(&mut clipped, &mask);
            Ok(clipped)
        };
        let mut images = if self.params.parallel {
            scales.into_par_iter().map(&process).collect::<Result<Vec<_>>>()?
        } else {
            scales.into_iter().map(&process).collect::<Result<Vec<_>>>()?
        };

        for (image, wavelength) in images.iter().zip(wavelengths) {
            debug!("Scale wavelength={}: range={:.6}", wavelength, max_abs(image));
        }

        // Phase 3b
        let maxrange = harmonize_ranges(&mut images);
        info!("Compression done: maxrange={:.6}", maxrange);

        Ok(ResultSet::from_images(images))
    }
}

fn validate_inputs(
    field: ArrayView2<f64>,
    wavelengths: &[f64],
    params: &CompressionParams,
) -> Result<()> {
    params.validate()?;

    if wavelengths.is_empty() {
        return Err(Error::invalid("wavelengths", "empty list"));
    }
    if let Some(w) = wavelengths.iter().find(|w| !(w.is_finite() && **w > 0.0)) {
        return Err(Error::invalid("wavelengths", w));
    }

    let (rows, cols) = field.dim();
    if rows * cols < 2 {
        return Err(Error::invalid(
            "field",
            format!("{}x{} has no room for calibration pixels", rows, cols),
        ));
    }
    if field.iter().any(|v| v.is_infinite()) {
        return Err(Error::invalid("field", "contains infinite values"));
    }
    if field.iter().all(|v| v.is_nan()) {
        return Err(Error::invalid("field", "all values are NaN"));
    }
    Ok(())
}

fn check_shape(stage: Stage, expected: (usize, usize), found: (usize, usize)) -> Result<()> {
    if expected != found {
        return Err(Error::ShapeMismatch {
            stage,
            expected,
            found,
        });
    }
    Ok(())
}
