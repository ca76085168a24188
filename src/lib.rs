#![doc = r#"
PPDRC — phase preserving dynamic range compression for high dynamic range grids.

Aeromagnetic and other potential field grids often span many orders of magnitude.
Histogram equalisation makes the contrast of a feature depend on how common its
value is rather than on its amplitude. This crate instead highpass filters the
field at one or more scales, computes the monogenic (2-D analytic) signal to get
local phase and energy, attenuates the energy with `ln(1 + E)`, and rebuilds the
field from the original phase: `sin(phase) * ln(1 + E)`. Shape information carried
by the phase is kept exactly while contrast depends only on local amplitude.

Each output is histogram-clipped, no-data (NaN) cells are forced to zero, and the
first two pixels of every image are set to `+maxrange` and `-maxrange` (the largest
absolute value over all scales) so a sequence of images can be shown together
without brightness jumps.

Reference: P. Kovesi, "Phase Preserving Tone Mapping of Non-Photographic High
Dynamic Range Images", DICTA 2012.

Quick start
-----------
```rust
use ndarray::Array2;
use ppdrc::{compress_dynamic_range, CompressionParams, ResultSet};

fn main() -> ppdrc::Result<()> {
    let mut grid = Array2::from_shape_fn((64, 64), |(i, j)| {
        ((i as f64 / 5.0).sin() * (j as f64 / 9.0).cos()).exp() * 1e4
    });
    grid[[10, 10]] = f64::NAN; // no-data

    let params = CompressionParams::default(); // clip = 0.01 %, order = 2
    match compress_dynamic_range(&grid, &[16.0, 32.0], &params)? {
        ResultSet::Sequence(images) => assert_eq!(images.len(), 2),
        ResultSet::Single(_) => unreachable!(),
    }
    Ok(())
}
```

Custom collaborators
--------------------
The pipeline delegates no-data filling, monogenic analysis and histogram clipping
to the traits in [`filters`]; plug in your own implementations with
[`Pipeline::with_collaborators`].

```rust
use ndarray::Array2;
use ppdrc::filters::{ButterworthMonogenic, MeanFill, PercentileTruncator};
use ppdrc::{CompressionParams, Pipeline};

let pipeline = Pipeline::with_collaborators(
    MeanFill,
    ButterworthMonogenic::default(),
    PercentileTruncator,
    CompressionParams::default().with_clip(0.02),
);
let grid = Array2::from_shape_fn((32, 32), |(i, j)| (i * j) as f64);
let image = pipeline.run(grid.view(), &[8.0]).unwrap();
assert!(image.is_single());
```

Error handling
--------------
All public functions return `ppdrc::Result<T>`. Invalid parameters are rejected
before any collaborator runs; collaborator failures arrive as
`Error::Collaborator` with the failing [`Stage`] and the original error as source.
"#]

pub mod api;
pub mod core;
pub mod error;
pub mod filters;
pub mod types;

// Re-exports for ergonomic public API
pub use api::{compress_dynamic_range, compress_single_scale};
pub use crate::core::params::CompressionParams;
pub use crate::core::processing::Pipeline;
pub use error::{BoxError, Error, Result};
pub use types::{FilterResponse, MonogenicResponse, ResultSet, ScaleSignal, Stage};
