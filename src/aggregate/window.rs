//! Source windows covered by one destination pixel when downsampling.

/// Fractional remainders below this are treated as an empty edge strip.
pub const EDGE_EPSILON: f64 = 1e-10;

/// Inclusive source range along one axis with fractional edge weights.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisSpan {
    pub start: isize,
    pub end: isize,
    pub w_start: f64,
    pub w_end: f64,
}

/// Span of destination pixel `dst` along one axis, clipped to `[lo, hi)`.
///
/// The pixel covers source edge coordinates `[offset + scale*dst,
/// offset + scale*(dst+1))`. The first and last source pixels are weighted by
/// how much of them is covered; an end strip thinner than [`EDGE_EPSILON`]
/// is dropped and the new last pixel counts fully. Clipped edges get weight
/// 1. Returns `None` when the span misses `[lo, hi)` entirely.
pub fn axis_span(offset: f64, scale: f64, dst: isize, lo: isize, hi: isize) -> Option<AxisSpan> {
    let f0 = offset + scale * dst as f64;
    let f1 = f0 + scale;
    let mut start = f0.floor() as isize;
    let mut end = f1.floor() as isize;
    let mut w_start = 1.0 - (f0 - start as f64);
    let mut w_end = f1 - end as f64;
    if w_end < EDGE_EPSILON {
        w_end = 1.0;
        end -= 1;
    }
    if end < start {
        end = start;
    }

    if end < lo || start >= hi {
        return None;
    }
    if start < lo {
        start = lo;
        w_start = 1.0;
    }
    if end >= hi {
        end = hi - 1;
        w_end = 1.0;
    }
    Some(AxisSpan {
        start,
        end,
        w_start,
        w_end,
    })
}

/// Inclusive source window `[y0..=y1] × [x0..=x1]` with edge weights.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Window {
    pub x0: isize,
    pub x1: isize,
    pub y0: isize,
    pub y1: isize,
    pub wx0: f64,
    pub wx1: f64,
    pub wy0: f64,
    pub wy1: f64,
}

impl Window {
    pub fn from_spans(x: &AxisSpan, y: &AxisSpan) -> Self {
        Self {
            x0: x.start,
            x1: x.end,
            y0: y.start,
            y1: y.end,
            wx0: x.w_start,
            wx1: x.w_end,
            wy0: y.w_start,
            wy1: y.w_end,
        }
    }

    /// Weight of source column `x`. A single-column window uses `wx0`.
    #[inline]
    pub fn weight_x(&self, x: isize) -> f64 {
        if x == self.x0 {
            self.wx0
        } else if x == self.x1 {
            self.wx1
        } else {
            1.0
        }
    }

    #[inline]
    pub fn weight_y(&self, y: isize) -> f64 {
        if y == self.y0 {
            self.wy0
        } else if y == self.y1 {
            self.wy1
        } else {
            1.0
        }
    }

    pub fn width(&self) -> usize {
        (self.x1 - self.x0 + 1) as usize
    }

    pub fn height(&self) -> usize {
        (self.y1 - self.y0 + 1) as usize
    }

    pub fn len(&self) -> usize {
        self.width() * self.height()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
