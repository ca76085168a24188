use ndarray::{Array2, ArrayView2, Zip};

/// Binary validity mask: 0.0 where the input is NaN, 1.0 elsewhere.
pub fn nodata_mask(field: ArrayView2<f64>) -> Array2<f64> {
    field.mapv(|v| if v.is_nan() { 0.0 } else { 1.0 })
}

/// Zero `image` wherever `mask` is 0, in place. Masked cells end up exactly 0 even
/// when they held NaN or inf.
pub fn apply_mask(image: &mut Array2<f64>, mask: &Array2<f64>) {
    Zip::from(image).and(mask).for_each(|v, &m| {
        if m == 0.0 {
            *v = 0.0;
        }
    });
}
