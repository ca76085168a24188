use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Compression parameters suitable for config files and presets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionParams {
    /// Percentage of the histogram clipped from each tail, in [0, 50)
    pub clip: f64,
    /// Order of the Butterworth highpass filter, at least 1
    pub order: u32,
    /// Compress and clip scales on the rayon pool; `Pipeline::new` also passes it
    /// to the default monogenic provider. Custom providers schedule their own work.
    pub parallel: bool,
}

impl Default for CompressionParams {
    fn default() -> Self {
        Self {
            clip: 0.01,
            order: 2,
            parallel: true,
        }
    }
}

impl CompressionParams {
    pub fn with_clip(mut self, clip: f64) -> Self {
        self.clip = clip;
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Parse a JSON preset; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let params: Self =
            serde_json::from_str(json).map_err(|e| Error::invalid("params", e))?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..50.0).contains(&self.clip) {
            return Err(Error::invalid("clip", self.clip));
        }
        if self.order == 0 {
            return Err(Error::invalid("order", self.order));
        }
        Ok(())
    }
}
