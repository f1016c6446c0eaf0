//! Multi-resolution source raster.

use tracing::debug;

use crate::aggregate::{aggregate, AggregationMethod};
use crate::error::{ResampleError, Result};
use crate::geometry;
use crate::level;
use crate::raster::buffer::SampleBufferMut;
use crate::raster::level::RasterLevel;
use crate::raster::rect::Rect;
use crate::validity::{sentinel, Sample};

/// Levels ordered from finest (0) to coarsest, sharing one no-data sentinel.
#[derive(Clone, Debug)]
pub struct RasterPyramid<T> {
    levels: Vec<RasterLevel<T>>,
    no_data: f64,
}

impl<T: Sample> RasterPyramid<T> {
    /// Wrap existing levels. Pixel sizes must not shrink from one level to
    /// the next.
    pub fn new(levels: Vec<RasterLevel<T>>, no_data: f64) -> Result<Self> {
        if levels.is_empty() {
            return Err(ResampleError::Shape("pyramid must have at least one level".into()));
        }
        for level in &levels {
            level.transform().validate_axis_aligned()?;
        }
        for (i, pair) in levels.windows(2).enumerate() {
            let (fine, coarse) = (pair[0].transform(), pair[1].transform());
            if coarse.pixel_size_x() < fine.pixel_size_x() || coarse.pixel_size_y() < fine.pixel_size_y() {
                return Err(ResampleError::Shape(format!(
                    "level {} is finer than level {i}",
                    i + 1
                )));
            }
        }
        Ok(Self { levels, no_data })
    }

    pub fn single(level: RasterLevel<T>, no_data: f64) -> Result<Self> {
        Self::new(vec![level], no_data)
    }

    /// Build `num_levels` levels from `level0` by repeated 2× aggregation.
    ///
    /// Each level is `ceil(w / 2) × ceil(h / 2)` of the previous one. Building
    /// stops early once a level is a single pixel.
    pub fn build(level0: RasterLevel<T>, num_levels: usize, method: AggregationMethod, no_data: f64) -> Result<Self> {
        if num_levels == 0 {
            return Err(ResampleError::Shape("pyramid must have at least one level".into()));
        }
        let fill = sentinel::<T>(no_data).ok_or_else(|| {
            ResampleError::Config(format!("no-data value {no_data} is not representable in the sample type"))
        })?;
        let base = *level0.transform();
        let mut levels = vec![level0];

        for i in 1..num_levels {
            let prev = &levels[i - 1];
            if prev.width() == 1 && prev.height() == 1 {
                break;
            }
            let (w, h) = (prev.width().div_ceil(2), prev.height().div_ceil(2));
            let factor = 2f64.powi(i as i32);
            let transform = base.scaled(factor, factor);
            let mapping = geometry::compose(prev.transform(), &transform)?;

            let mut samples = vec![fill; w * h];
            {
                let mut dst = SampleBufferMut::new(&mut samples, w, h, 0, 0)?;
                let src = prev.buffer()?;
                aggregate(method, &src, &mut dst, &Rect::from_size(w, h), &mapping, no_data, fill);
            }
            debug!(level = i, width = w, height = h, %method, "built pyramid level");
            levels.push(RasterLevel::from_vec(w, h, samples, transform)?);
        }
        Self::new(levels, no_data)
    }

    pub fn level(&self, index: usize) -> Result<&RasterLevel<T>> {
        self.levels.get(index).ok_or(ResampleError::Level {
            level: index,
            levels: self.levels.len(),
        })
    }

    pub fn levels(&self) -> &[RasterLevel<T>] {
        &self.levels
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn no_data(&self) -> f64 {
        self.no_data
    }

    /// Pixel size of level `index` relative to level 0 (x axis).
    pub fn scale(&self, index: usize) -> Result<f64> {
        let base = self.levels[0].transform().pixel_size_x();
        Ok(self.level(index)?.transform().pixel_size_x() / base)
    }

    pub fn scales(&self) -> Vec<f64> {
        let base = self.levels[0].transform().pixel_size_x();
        self.levels
            .iter()
            .map(|l| l.transform().pixel_size_x() / base)
            .collect()
    }

    /// Level best suited for a target whose pixels are `target_scale` times
    /// the reference level-0 pixel size.
    pub fn select_level(&self, target_scale: f64, native_scaling: f64) -> usize {
        level::select_level(target_scale, &self.scales(), native_scaling)
    }
}
