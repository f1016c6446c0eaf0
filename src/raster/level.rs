use ndarray::{Array2, ArrayView2};

use crate::affine::Affine;
use crate::error::{ResampleError, Result};
use crate::raster::buffer::SampleBuffer;
use crate::raster::rect::Rect;
use crate::validity::{Sample, SampleKind};

/// One resolution of a raster: a row-major sample grid plus its
/// pixel-to-model transform. Immutable once built.
#[derive(Clone, Debug)]
pub struct RasterLevel<T> {
    data: Array2<T>,
    transform: Affine,
}

impl<T: Sample> RasterLevel<T> {
    /// `data` is indexed `(row, col)`. Non-standard layouts are copied into
    /// row-major order so the scanline stride always equals the width.
    pub fn new(data: Array2<T>, transform: Affine) -> Result<Self> {
        if data.nrows() == 0 || data.ncols() == 0 {
            return Err(ResampleError::Shape(format!(
                "raster level must not be empty, got {:?}",
                data.dim()
            )));
        }
        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().into_owned()
        };
        Ok(Self { data, transform })
    }

    pub fn from_vec(width: usize, height: usize, samples: Vec<T>, transform: Affine) -> Result<Self> {
        let data = Array2::from_shape_vec((height, width), samples)
            .map_err(|e| ResampleError::Shape(e.to_string()))?;
        Self::new(data, transform)
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// Samples between the starts of consecutive scanlines.
    pub fn stride(&self) -> usize {
        self.width()
    }

    pub fn kind(&self) -> SampleKind {
        T::KIND
    }

    pub fn transform(&self) -> &Affine {
        &self.transform
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width(), self.height())
    }

    pub fn view(&self) -> ArrayView2<'_, T> {
        self.data.view()
    }

    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        self.data.get((y, x)).copied()
    }

    pub fn into_array(self) -> Array2<T> {
        self.data
    }

    /// Accessor over the whole level.
    pub fn buffer(&self) -> Result<SampleBuffer<'_, T>> {
        let samples = self.data.as_slice().ok_or_else(|| {
            ResampleError::Shape("raster level is not stored in row-major order".into())
        })?;
        SampleBuffer::new(samples, self.width(), self.height(), 0, 0)
    }

    /// Accessor over `rect ∩ bounds()`.
    pub fn window(&self, rect: &Rect) -> Result<SampleBuffer<'_, T>> {
        Ok(self.buffer()?.window(rect))
    }
}

/// A computed destination tile: `data` covers exactly `rect`.
#[derive(Clone, Debug)]
pub struct Tile<T> {
    pub rect: Rect,
    pub data: Array2<T>,
}
