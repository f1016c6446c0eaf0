pub mod engine;

pub use engine::{resample, resample_with_config, ReferenceGrid, ResampledRaster};
