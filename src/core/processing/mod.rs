//! The compression pipeline and its per-scale building blocks.
pub mod compress;
pub mod harmonize;
pub mod mask;
pub mod pipeline;

pub use pipeline::Pipeline;
