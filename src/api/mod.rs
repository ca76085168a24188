//! High-level entry points. Prefer these over assembling the processing modules by
//! hand unless a custom filler, signal provider, or truncator is needed, in which
//! case build a [`Pipeline`](crate::Pipeline) with `with_collaborators`.
use ndarray::Array2;

use crate::core::params::CompressionParams;
use crate::core::processing::Pipeline;
use crate::error::Result;
use crate::types::ResultSet;

/// Compress `field` at each wavelength with the default collaborators.
pub fn compress_dynamic_range(
    field: &Array2<f64>,
    wavelengths: &[f64],
    params: &CompressionParams,
) -> Result<ResultSet> {
    Pipeline::new(*params).run(field.view(), wavelengths)
}

/// Single-wavelength convenience wrapper returning the bare image.
pub fn compress_single_scale(
    field: &Array2<f64>,
    wavelength: f64,
    params: &CompressionParams,
) -> Result<Array2<f64>> {
    let set = compress_dynamic_range(field, &[wavelength], params)?;
    // one wavelength always collapses to a single image
    Ok(set.into_vec().remove(0))
}
