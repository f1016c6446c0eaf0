//! Typed accessors over raw, row-major sample storage.
//!
//! Both accessors address samples in level coordinates: `origin_x`/`origin_y`
//! is the level pixel stored at linear index `offset`, and rows are `stride`
//! samples apart.

use crate::error::{ResampleError, Result};
use crate::raster::rect::Rect;
use crate::validity::{Sample, SampleKind};

/// Read-only view of a rectangular window of samples.
#[derive(Clone, Copy, Debug)]
pub struct SampleBuffer<'a, T> {
    data: &'a [T],
    offset: usize,
    stride: usize,
    origin_x: isize,
    origin_y: isize,
    width: usize,
    height: usize,
}

impl<'a, T: Sample> SampleBuffer<'a, T> {
    /// Wrap a full row-major buffer whose pixel (0, 0) sits at `(origin_x, origin_y)`.
    pub fn new(data: &'a [T], width: usize, height: usize, origin_x: isize, origin_y: isize) -> Result<Self> {
        if data.len() != width * height {
            return Err(ResampleError::Shape(format!(
                "buffer of {} samples cannot hold {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            data,
            offset: 0,
            stride: width,
            origin_x,
            origin_y,
            width,
            height,
        })
    }

    /// Sub-window in level coordinates, clipped to this buffer.
    pub fn window(&self, rect: &Rect) -> SampleBuffer<'a, T> {
        let clipped = rect.intersect(&self.bounds());
        if clipped.is_empty() {
            return SampleBuffer {
                width: 0,
                height: 0,
                ..*self
            };
        }
        SampleBuffer {
            data: self.data,
            offset: self.index(clipped.x, clipped.y),
            stride: self.stride,
            origin_x: clipped.x,
            origin_y: clipped.y,
            width: clipped.width,
            height: clipped.height,
        }
    }

    pub fn kind(&self) -> SampleKind {
        T::KIND
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Covered area in level coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.origin_x, self.origin_y, self.width, self.height)
    }

    /// Linear index of level pixel `(x, y)`; the pixel must lie in `bounds()`.
    #[inline]
    pub fn index(&self, x: isize, y: isize) -> usize {
        self.offset + (y - self.origin_y) as usize * self.stride + (x - self.origin_x) as usize
    }

    #[inline]
    pub fn get(&self, index: usize) -> T {
        self.data[index]
    }

    #[inline]
    pub fn at(&self, x: isize, y: isize) -> T {
        self.data[self.index(x, y)]
    }

    /// Sample at `(x, y)` with coordinates clamped into the window
    /// (border replication). The window must not be empty.
    #[inline]
    pub fn at_clamped(&self, x: isize, y: isize) -> T {
        self.at(self.clamp_x(x), self.clamp_y(y))
    }

    #[inline]
    pub fn clamp_x(&self, x: isize) -> isize {
        x.clamp(self.origin_x, self.origin_x + self.width as isize - 1)
    }

    #[inline]
    pub fn clamp_y(&self, y: isize) -> isize {
        y.clamp(self.origin_y, self.origin_y + self.height as isize - 1)
    }
}

/// Writable counterpart of [`SampleBuffer`], used for destination tiles.
#[derive(Debug)]
pub struct SampleBufferMut<'a, T> {
    data: &'a mut [T],
    stride: usize,
    origin_x: isize,
    origin_y: isize,
    width: usize,
    height: usize,
}

impl<'a, T: Sample> SampleBufferMut<'a, T> {
    pub fn new(data: &'a mut [T], width: usize, height: usize, origin_x: isize, origin_y: isize) -> Result<Self> {
        if data.len() != width * height {
            return Err(ResampleError::Shape(format!(
                "buffer of {} samples cannot hold {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            data,
            stride: width,
            origin_x,
            origin_y,
            width,
            height,
        })
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.origin_x, self.origin_y, self.width, self.height)
    }

    #[inline]
    pub fn index(&self, x: isize, y: isize) -> usize {
        (y - self.origin_y) as usize * self.stride + (x - self.origin_x) as usize
    }

    #[inline]
    pub fn set(&mut self, index: usize, value: T) {
        self.data[index] = value;
    }

    #[inline]
    pub fn set_at(&mut self, x: isize, y: isize, value: T) {
        let i = self.index(x, y);
        self.data[i] = value;
    }
}
