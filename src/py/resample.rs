//! PyO3 binding for resample_array.

use ndarray::Array2;
use numpy::{PyArray2, PyReadonlyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::affine::Affine;
use crate::aggregate::AggregationMethod;
use crate::raster::{RasterLevel, RasterPyramid};
use crate::resample::ResamplingMethod;
use crate::warp::{resample, ReferenceGrid};

/// Resample a 2D f64 array onto another axis-aligned grid in the same CRS.
///
/// Args:
///     src: Input 2D array (f64). For other dtypes, cast on the Python side.
///     src_transform: Source affine transform as 6-element tuple (a, b, c, d, e, f)
///         in rasterio convention.
///     dst_transform: Reference affine transform (same convention).
///     dst_shape: Output shape as (rows, cols) tuple.
///     resampling: Method name, an interpolation ("nearest", "bilinear",
///         "cubic_convolution") or aggregation ("mean", "flag_or", ...) method.
///     nodata: Optional no-data value. Defaults to NaN.
///     src_levels: Number of source pyramid levels to build before resampling.
///     pyramid_method: Aggregation used to build the source pyramid.
///     tile_size: Optional tile size as (rows, cols).
///
/// Returns:
///     Resampled 2D array (f64) at level 0 of the reference grid.
#[pyfunction]
#[pyo3(signature = (src, src_transform, dst_transform, dst_shape, resampling="nearest", nodata=None, src_levels=1, pyramid_method="mean", tile_size=None))]
#[allow(clippy::too_many_arguments)]
pub fn resample_array<'py>(
    py: Python<'py>,
    src: PyReadonlyArray2<'py, f64>,
    src_transform: [f64; 6],
    dst_transform: [f64; 6],
    dst_shape: (usize, usize),
    resampling: &str,
    nodata: Option<f64>,
    src_levels: usize,
    pyramid_method: &str,
    tile_size: Option<(usize, usize)>,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let to_py = |e: crate::error::ResampleError| PyValueError::new_err(e.to_string());

    let method: ResamplingMethod = resampling.parse().map_err(to_py)?;
    let pyramid_method: AggregationMethod = pyramid_method.parse().map_err(to_py)?;
    let no_data = nodata.unwrap_or(f64::NAN);

    // Copy array to owned ndarray before releasing the GIL
    let src_array: Array2<f64> = src.as_array().to_owned();

    let result: Array2<f64> = py.allow_threads(move || {
        let level0 = RasterLevel::new(src_array, Affine::from(src_transform)).map_err(to_py)?;
        let pyramid = RasterPyramid::build(level0, src_levels.max(1), pyramid_method, no_data).map_err(to_py)?;
        let reference =
            ReferenceGrid::new(dst_shape.1, dst_shape.0, Affine::from(dst_transform), 1).map_err(to_py)?;

        let mut raster = resample(&pyramid, &reference, method).map_err(to_py)?;
        if let Some(size) = tile_size {
            raster = raster.with_tile_size(size).map_err(to_py)?;
        }
        raster
            .compute_level(0)
            .map(RasterLevel::into_array)
            .map_err(to_py)
    })?;

    Ok(PyArray2::from_owned_array(py, result))
}
