use ndarray::{Array2, Zip};

use crate::types::ScaleSignal;

/// Reconstruct a scale from its local phase with the energy attenuated by `ln(1 + E)`.
///
/// Contrast now depends only on local amplitude while the sign and shape carried by
/// the phase are kept.
pub fn compress_scale(signal: &ScaleSignal) -> Array2<f64> {
    let mut out = Array2::<f64>::zeros(signal.phase.dim());
    Zip::from(&mut out)
        .and(&signal.phase)
        .and(&signal.energy)
        .for_each(|o, &phase, &energy| {
            *o = phase.sin() * energy.ln_1p();
        });
    out
}
