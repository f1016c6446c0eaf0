//! PyO3 binding for plan_resample: chunk planner for dask integration.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::affine::Affine;
use crate::chunk::planner;
use crate::geometry;
use crate::resample::ResamplingMethod;

/// Plan the chunk-level resampling tasks for a raster.
///
/// Args:
///     src_transform: Source affine transform as 6-element tuple.
///     src_shape: Source raster shape as (rows, cols).
///     dst_transform: Reference affine transform as 6-element tuple.
///     dst_shape: Reference raster shape as (rows, cols).
///     dst_chunks: Optional chunk size as (rows, cols). Defaults to full image.
///     resampling: Method name, used for the halo. Defaults to "bilinear".
///
/// Returns:
///     List of tile plan dicts, each with keys:
///     - dst_slice: (row_start, row_end, col_start, col_end)
///     - compute_slice: part of dst_slice covered by the source, same layout
///     - src_slice: (row_start, row_end, col_start, col_end)
///     - dst_tile_shape: (rows, cols)
///     - has_data: bool
#[pyfunction]
#[pyo3(signature = (src_transform, src_shape, dst_transform, dst_shape, dst_chunks=None, resampling="bilinear"))]
pub fn plan_resample(
    py: Python<'_>,
    src_transform: [f64; 6],
    src_shape: (usize, usize),
    dst_transform: [f64; 6],
    dst_shape: (usize, usize),
    dst_chunks: Option<(usize, usize)>,
    resampling: &str,
) -> PyResult<Vec<PyObject>> {
    let method: ResamplingMethod = resampling
        .parse()
        .map_err(|e: crate::error::ResampleError| PyValueError::new_err(e.to_string()))?;
    let tile_size = dst_chunks.unwrap_or(dst_shape);

    let plans = py
        .allow_threads(move || {
            let mapping = geometry::compose(&Affine::from(src_transform), &Affine::from(dst_transform))?;
            planner::plan_tiles(dst_shape, tile_size, &mapping, src_shape, method.halo())
        })
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

    let slice = |r: &crate::raster::Rect| {
        if r.is_empty() {
            (0, 0, 0, 0)
        } else {
            (r.y as usize, r.y_end() as usize, r.x as usize, r.x_end() as usize)
        }
    };

    let result: Vec<PyObject> = plans
        .iter()
        .map(|plan| -> PyResult<PyObject> {
            let dict = PyDict::new(py);
            dict.set_item("dst_slice", slice(&plan.dst))?;
            dict.set_item("compute_slice", slice(&plan.compute))?;
            dict.set_item("src_slice", slice(&plan.src))?;
            dict.set_item("dst_tile_shape", plan.dst_tile_shape())?;
            dict.set_item("has_data", plan.has_data)?;
            Ok(dict.into_any().unbind())
        })
        .collect::<PyResult<Vec<_>>>()?;

    Ok(result)
}
