//! Tiled resampling engine.
//!
//! A [`ResampledRaster`] is a lazy pyramid on the reference grid: nothing is
//! computed until a tile or level is requested, and every tile is a pure
//! function of the source pyramid, so tiles can be evaluated in any order and
//! on any thread.

use ndarray::{s, Array2};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::affine::Affine;
use crate::aggregate::aggregate;
use crate::chunk::planner::{self, TilePlan};
use crate::config::ResampleConfig;
use crate::error::{ResampleError, Result};
use crate::geometry::{self, GeometryMapping};
use crate::raster::{RasterLevel, RasterPyramid, Rect, SampleBufferMut, Tile};
use crate::resample::{interpolate, ResamplingMethod};
use crate::validity::{sentinel, Sample};

/// Deepest pyramid a reference grid may declare; level `n` is `2^n` coarser.
pub const MAX_LEVELS: usize = usize::BITS as usize - 1;

/// Target grid: level-0 size and transform plus the number of levels.
/// Level `n` has pixels `2^n` times larger, with dimensions rounded up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReferenceGrid {
    pub width: usize,
    pub height: usize,
    pub transform: Affine,
    pub levels: usize,
}

impl ReferenceGrid {
    pub fn new(width: usize, height: usize, transform: Affine, levels: usize) -> Result<Self> {
        let grid = Self {
            width,
            height,
            transform,
            levels,
        };
        grid.validate()?;
        Ok(grid)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ResampleError::Shape(format!(
                "reference grid must not be empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.levels == 0 {
            return Err(ResampleError::Shape("reference grid needs at least one level".into()));
        }
        if self.levels > MAX_LEVELS {
            return Err(ResampleError::Shape(format!(
                "reference grid has {} levels, at most {MAX_LEVELS} are supported",
                self.levels
            )));
        }
        self.transform.validate_axis_aligned()
    }

    fn check_level(&self, level: usize) -> Result<()> {
        if level >= self.levels {
            return Err(ResampleError::Level {
                level,
                levels: self.levels,
            });
        }
        Ok(())
    }

    /// (width, height) of `level`.
    pub fn level_size(&self, level: usize) -> Result<(usize, usize)> {
        self.check_level(level)?;
        let factor = 1usize << level;
        Ok((self.width.div_ceil(factor), self.height.div_ceil(factor)))
    }

    pub fn level_transform(&self, level: usize) -> Result<Affine> {
        self.check_level(level)?;
        let factor = 2f64.powi(level as i32);
        Ok(self.transform.scaled(factor, factor))
    }
}

/// Per reference level: which source level feeds it and how.
#[derive(Clone, Copy, Debug)]
struct LevelSetup {
    source_level: usize,
    mapping: GeometryMapping,
    width: usize,
    height: usize,
    transform: Affine,
}

/// Lazily resampled view of a source pyramid on a reference grid.
#[derive(Debug)]
pub struct ResampledRaster<'a, T> {
    source: &'a RasterPyramid<T>,
    method: ResamplingMethod,
    fill: T,
    tile_size: (usize, usize),
    parallel: bool,
    levels: Vec<LevelSetup>,
}

/// Resample `source` onto every level of `reference` with `method`.
///
/// All validation happens here; computing tiles afterwards only fails on
/// out-of-range level requests.
pub fn resample<'a, T: Sample>(
    source: &'a RasterPyramid<T>,
    reference: &ReferenceGrid,
    method: ResamplingMethod,
) -> Result<ResampledRaster<'a, T>> {
    reference.validate()?;
    let no_data = source.no_data();
    let fill = sentinel::<T>(no_data).ok_or_else(|| {
        ResampleError::Config(format!("no-data value {no_data} is not representable in the sample type"))
    })?;

    let native_scaling = source.level(0)?.transform().pixel_size_x() / reference.transform.pixel_size_x();
    let mut levels = Vec::with_capacity(reference.levels);
    for level in 0..reference.levels {
        let target_scale = 2f64.powi(level as i32);
        let source_level = source.select_level(target_scale, native_scaling);
        let (width, height) = reference.level_size(level)?;
        let transform = reference.level_transform(level)?;
        let mapping = geometry::compose(source.level(source_level)?.transform(), &transform)?;
        debug!(
            level,
            source_level,
            width,
            height,
            scale_x = mapping.scale_x,
            scale_y = mapping.scale_y,
            offset_x = mapping.offset_x,
            offset_y = mapping.offset_y,
            %method,
            "resampling level"
        );
        levels.push(LevelSetup {
            source_level,
            mapping,
            width,
            height,
            transform,
        });
    }

    Ok(ResampledRaster {
        source,
        method,
        fill,
        tile_size: (512, 512),
        parallel: true,
        levels,
    })
}

/// [`resample`] with the method, tiling and threading taken from `config`.
pub fn resample_with_config<'a, T: Sample>(
    source: &'a RasterPyramid<T>,
    reference: &ReferenceGrid,
    config: &ResampleConfig,
    band: &str,
    is_flag: bool,
) -> Result<ResampledRaster<'a, T>> {
    config.validate()?;
    let method = config.method_for(
        band,
        is_flag,
        source.level(0)?.transform().pixel_size_x(),
        reference.transform.pixel_size_x(),
    );
    resample(source, reference, method)?
        .with_tile_size(config.tile_size)
        .map(|r| r.with_parallel(config.parallel))
}

impl<'a, T: Sample> ResampledRaster<'a, T> {
    /// Tile size (rows, cols) used by [`compute_level`](Self::compute_level).
    pub fn with_tile_size(mut self, tile_size: (usize, usize)) -> Result<Self> {
        if tile_size.0 == 0 || tile_size.1 == 0 {
            return Err(ResampleError::Shape("Tile size must be > 0".into()));
        }
        self.tile_size = tile_size;
        Ok(self)
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn method(&self) -> ResamplingMethod {
        self.method
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn no_data(&self) -> f64 {
        self.source.no_data()
    }

    fn setup(&self, level: usize) -> Result<&LevelSetup> {
        self.levels.get(level).ok_or(ResampleError::Level {
            level,
            levels: self.levels.len(),
        })
    }

    /// Source level feeding reference level `level`.
    pub fn source_level(&self, level: usize) -> Result<usize> {
        Ok(self.setup(level)?.source_level)
    }

    /// (width, height) of reference level `level`.
    pub fn level_size(&self, level: usize) -> Result<(usize, usize)> {
        let s = self.setup(level)?;
        Ok((s.width, s.height))
    }

    /// Plans for every tile of `level`, row by row.
    pub fn plan_level(&self, level: usize) -> Result<Vec<TilePlan>> {
        let setup = self.setup(level)?;
        let src = self.source.level(setup.source_level)?;
        planner::plan_tiles(
            (setup.height, setup.width),
            self.tile_size,
            &setup.mapping,
            (src.height(), src.width()),
            self.method.halo(),
        )
    }

    /// Compute the pixels of `dst_rect` on reference level `level`.
    ///
    /// Pixels outside the level or not covered by the source are no-data.
    pub fn compute_tile(&self, level: usize, dst_rect: &Rect) -> Result<Tile<T>> {
        let setup = self.setup(level)?;
        let src_level = self.source.level(setup.source_level)?;
        let level_bounds = Rect::from_size(setup.width, setup.height);
        let plan = planner::plan_tile(
            dst_rect.intersect(&level_bounds),
            &setup.mapping,
            &src_level.bounds(),
            self.method.halo(),
        );
        self.evaluate(setup, src_level, dst_rect, &plan)
    }

    fn evaluate(&self, setup: &LevelSetup, src_level: &RasterLevel<T>, dst_rect: &Rect, plan: &TilePlan) -> Result<Tile<T>> {
        let mut samples = vec![self.fill; dst_rect.area()];
        trace!(
            dst = ?dst_rect,
            compute = ?plan.compute,
            src = ?plan.src,
            has_data = plan.has_data,
            "computing tile"
        );
        if plan.has_data {
            let src = src_level.window(&plan.src)?;
            let mut dst = SampleBufferMut::new(&mut samples, dst_rect.width, dst_rect.height, dst_rect.x, dst_rect.y)?;
            let no_data = self.source.no_data();
            match self.method {
                ResamplingMethod::Interpolate(m) => {
                    interpolate(m, &src, &mut dst, &plan.compute, &setup.mapping, no_data, self.fill)
                }
                ResamplingMethod::Aggregate(m) => {
                    aggregate(m, &src, &mut dst, &plan.compute, &setup.mapping, no_data, self.fill)
                }
            }
        }
        let data = Array2::from_shape_vec((dst_rect.height, dst_rect.width), samples)
            .map_err(|e| ResampleError::Shape(e.to_string()))?;
        Ok(Tile { rect: *dst_rect, data })
    }

    /// Materialise reference level `level`, tile by tile.
    pub fn compute_level(&self, level: usize) -> Result<RasterLevel<T>> {
        let setup = self.setup(level)?;
        let src_level = self.source.level(setup.source_level)?;
        let plans = self.plan_level(level)?;

        let tiles: Vec<Tile<T>> = if self.parallel {
            plans
                .par_iter()
                .map(|plan| self.evaluate(setup, src_level, &plan.dst, plan))
                .collect::<Result<_>>()?
        } else {
            plans
                .iter()
                .map(|plan| self.evaluate(setup, src_level, &plan.dst, plan))
                .collect::<Result<_>>()?
        };

        let mut out = Array2::from_elem((setup.height, setup.width), self.fill);
        for tile in tiles {
            let r = tile.rect;
            out.slice_mut(s![r.y..r.y_end(), r.x..r.x_end()]).assign(&tile.data);
        }
        RasterLevel::new(out, setup.transform)
    }

    /// Materialise every level into a new pyramid.
    pub fn to_pyramid(&self) -> Result<RasterPyramid<T>> {
        let levels = (0..self.levels.len())
            .map(|level| self.compute_level(level))
            .collect::<Result<Vec<_>>>()?;
        RasterPyramid::new(levels, self.source.no_data())
    }
}
