use pyo3::prelude::*;

mod plan;
mod resample;

/// Register all Python-visible functions.
pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(resample::resample_array, m)?)?;
    m.add_function(wrap_pyfunction!(plan::plan_resample, m)?)?;
    Ok(())
}
