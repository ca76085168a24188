pub mod params;
pub mod processing;

pub use params::CompressionParams;
