pub mod affine;
pub mod aggregate;
pub mod chunk;
pub mod config;
pub mod error;
pub mod geometry;
pub mod level;
pub mod raster;
pub mod resample;
pub mod validity;
pub mod warp;
#[cfg(feature = "python")]
mod py;

pub use aggregate::AggregationMethod;
pub use config::ResampleConfig;
pub use error::{ResampleError, Result};
pub use raster::{RasterLevel, RasterPyramid, Rect, Tile};
pub use resample::{InterpolationMethod, ResamplingMethod};
pub use warp::{resample, resample_with_config, ReferenceGrid, ResampledRaster};

/// A Python module implemented in Rust.
#[cfg(feature = "python")]
#[pyo3::pymodule]
fn _rust(m: &pyo3::Bound<'_, pyo3::types::PyModule>) -> pyo3::PyResult<()> {
    py::register(m)?;
    Ok(())
}
