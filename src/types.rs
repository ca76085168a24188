//! Shared types used across the crate.
//! Includes the per-scale signal produced by a monogenic analysis, the raw filter
//! responses, the `ResultSet` returned by the pipeline, and the `Stage` tag carried
//! by errors.
use ndarray::Array2;

/// Pipeline phase, used to tag errors with where they happened.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Stage {
    Fill,
    Analyze,
    Truncate,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Fill => "no-data fill",
            Stage::Analyze => "monogenic analysis",
            Stage::Truncate => "histogram truncation",
        };
        write!(f, "{}", s)
    }
}

/// Local phase, orientation and energy of a field at one analysis scale.
#[derive(Debug, Clone)]
pub struct ScaleSignal {
    /// Local phase in radians
    pub phase: Array2<f64>,
    /// Local orientation in radians
    pub orientation: Array2<f64>,
    /// Local energy (amplitude), non-negative
    pub energy: Array2<f64>,
}

/// Raw filter outputs at one scale.
#[derive(Debug, Clone)]
pub struct FilterResponse {
    /// Frequency domain highpass filter, unshifted (DC at `[0, 0]`)
    pub highpass: Array2<f64>,
    /// Highpass filtered field
    pub even: Array2<f64>,
    /// First Riesz (odd) response
    pub odd1: Array2<f64>,
    /// Second Riesz (odd) response
    pub odd2: Array2<f64>,
}

/// Everything a monogenic signal provider returns for a list of wavelengths.
#[derive(Debug, Clone, Default)]
pub struct MonogenicResponse {
    /// One entry per wavelength, in input order
    pub scales: Vec<ScaleSignal>,
    /// Raw responses, either empty or one per wavelength
    pub responses: Vec<FilterResponse>,
}

/// Output of a compression run.
///
/// A single wavelength yields `Single`; more than one yields `Sequence` with one
/// image per wavelength in input order.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultSet {
    Single(Array2<f64>),
    Sequence(Vec<Array2<f64>>),
}

impl ResultSet {
    /// Collapse a list of per-scale images, tagging by count alone.
    pub(crate) fn from_images(mut images: Vec<Array2<f64>>) -> Self {
        if images.len() == 1 {
            ResultSet::Single(images.remove(0))
        } else {
            ResultSet::Sequence(images)
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ResultSet::Single(_) => 1,
            ResultSet::Sequence(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_single(&self) -> bool {
        matches!(self, ResultSet::Single(_))
    }

    pub fn as_single(&self) -> Option<&Array2<f64>> {
        match self {
            ResultSet::Single(img) => Some(img),
            ResultSet::Sequence(_) => None,
        }
    }

    /// All images as a slice regardless of the tag.
    pub fn as_slice(&self) -> &[Array2<f64>] {
        match self {
            ResultSet::Single(img) => std::slice::from_ref(img),
            ResultSet::Sequence(v) => v.as_slice(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Array2<f64>> {
        self.as_slice().iter()
    }

    pub fn into_vec(self) -> Vec<Array2<f64>> {
        match self {
            ResultSet::Single(img) => vec![img],
            ResultSet::Sequence(v) => v,
        }
    }
}
