//! Resampling presets: which method to use for which band, and how to tile.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::aggregate::AggregationMethod;
use crate::error::{ResampleError, Result};
use crate::resample::{InterpolationMethod, ResamplingMethod};

/// Configuration for a resampling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResampleConfig {
    /// Method used when the reference grid is at least as fine as the source.
    pub upsampling: InterpolationMethod,

    /// Method used for ordinary bands on a coarser reference grid.
    pub downsampling: AggregationMethod,

    /// Method used for flag (bitmask) bands on a coarser reference grid.
    pub flag_downsampling: AggregationMethod,

    /// Destination tile size as (rows, cols).
    pub tile_size: (usize, usize),

    /// Evaluate tiles of a level on the rayon pool.
    pub parallel: bool,

    /// Per-band overrides, keyed by band name.
    pub band_methods: HashMap<String, ResamplingMethod>,
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self {
            upsampling: InterpolationMethod::Nearest,
            downsampling: AggregationMethod::First,
            flag_downsampling: AggregationMethod::First,
            tile_size: (512, 512),
            parallel: true,
            band_methods: HashMap::new(),
        }
    }
}

impl ResampleConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// [`from_env`](Self::from_env) with an arbitrary variable source.
    /// Unparseable values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(val) = lookup("RESAMPLE_UPSAMPLING") {
            match val.parse() {
                Ok(m) => config.upsampling = m,
                Err(e) => warn!(value = %val, error = %e, "ignoring RESAMPLE_UPSAMPLING"),
            }
        }

        if let Some(val) = lookup("RESAMPLE_DOWNSAMPLING") {
            match val.parse() {
                Ok(m) => config.downsampling = m,
                Err(e) => warn!(value = %val, error = %e, "ignoring RESAMPLE_DOWNSAMPLING"),
            }
        }

        if let Some(val) = lookup("RESAMPLE_FLAG_DOWNSAMPLING") {
            match val.parse() {
                Ok(m) => config.flag_downsampling = m,
                Err(e) => warn!(value = %val, error = %e, "ignoring RESAMPLE_FLAG_DOWNSAMPLING"),
            }
        }

        if let Some(val) = lookup("RESAMPLE_TILE_SIZE") {
            match parse_tile_size(&val) {
                Some(size) => config.tile_size = size,
                None => warn!(value = %val, "ignoring RESAMPLE_TILE_SIZE"),
            }
        }

        if let Some(val) = lookup("RESAMPLE_PARALLEL") {
            config.parallel = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.tile_size.0 == 0 || self.tile_size.1 == 0 {
            return Err(ResampleError::Config("tile_size must be > 0".to_string()));
        }

        if self.downsampling.is_flag() {
            return Err(ResampleError::Config(format!(
                "downsampling method {} is reserved for flag bands",
                self.downsampling
            )));
        }

        if !self.flag_downsampling.is_flag() && self.flag_downsampling != AggregationMethod::First {
            return Err(ResampleError::Config(format!(
                "flag_downsampling must be first or a flag method, got {}",
                self.flag_downsampling
            )));
        }

        if self.band_methods.keys().any(|k| k.is_empty()) {
            return Err(ResampleError::Config("band name must not be empty".to_string()));
        }

        Ok(())
    }

    /// Method for a band given the level-0 pixel sizes of its source and of
    /// the reference grid. An explicit band override always wins.
    pub fn method_for(
        &self,
        band: &str,
        is_flag: bool,
        source_pixel_size: f64,
        reference_pixel_size: f64,
    ) -> ResamplingMethod {
        if let Some(m) = self.band_methods.get(band) {
            return *m;
        }
        if reference_pixel_size <= source_pixel_size {
            ResamplingMethod::Interpolate(self.upsampling)
        } else if is_flag {
            ResamplingMethod::Aggregate(self.flag_downsampling)
        } else {
            ResamplingMethod::Aggregate(self.downsampling)
        }
    }
}

/// `"256"` or `"256x512"` (rows x cols).
fn parse_tile_size(s: &str) -> Option<(usize, usize)> {
    let s = s.trim().to_lowercase();
    let size = match s.split_once('x') {
        Some((rows, cols)) => (rows.trim().parse().ok()?, cols.trim().parse().ok()?),
        None => {
            let n = s.parse().ok()?;
            (n, n)
        }
    };
    (size.0 > 0 && size.1 > 0).then_some(size)
}
