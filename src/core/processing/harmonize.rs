use ndarray::Array2;
use tracing::debug;

/// Largest absolute value in an image, ignoring NaN.
pub fn max_abs(image: &Array2<f64>) -> f64 {
    image
        .iter()
        .filter(|v| !v.is_nan())
        .fold(0.0_f64, |acc, &v| acc.max(v.abs()))
}

/// Stamp the first two pixels (row-major) of every image with `+maxrange` and
/// `-maxrange`, where `maxrange` is the largest absolute value over all images.
///
/// Per-image auto-contrast then maps every image in the sequence to the same
/// range, so they can be viewed together without brightness jumps. The statistic
/// is taken before any pixel is overwritten. Returns `maxrange`.
pub fn harmonize_ranges(images: &mut [Array2<f64>]) -> f64 {
    let maxrange = images.iter().map(max_abs).fold(0.0_f64, f64::max);
    debug!("Harmonizing {} scales to maxrange={:.6}", images.len(), maxrange);

    for image in images.iter_mut() {
        let mut cells = image.iter_mut();
        if let Some(first) = cells.next() {
            *first = maxrange;
        }
        if let Some(second) = cells.next() {
            *second = -maxrange;
        }
    }
    maxrange
}
