//! Mapping between reference-grid pixels and source-grid pixels.
//!
//! Both grids live in the same model space, so the mapping is the source
//! transform's inverse composed with the reference transform. Only scale and
//! translation survive; sheared grids are rejected up front.

use crate::affine::Affine;
use crate::error::{ResampleError, Result};
use crate::raster::Rect;

/// Slack applied before rounding mapped rectangle edges, so that edges which
/// land on a pixel boundary up to float noise do not grow by a pixel.
const ROUNDING_SLACK: f64 = 1e-9;

/// Reference pixel → source pixel: `src = offset + scale * dst`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometryMapping {
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// Compose the mapping from `reference` pixel coordinates to `source` pixel
/// coordinates.
pub fn compose(source: &Affine, reference: &Affine) -> Result<GeometryMapping> {
    source.validate_axis_aligned()?;
    reference.validate_axis_aligned()?;

    let t = source.inverse()?.compose(reference);
    if t.a <= 0.0 || t.e <= 0.0 {
        return Err(ResampleError::Affine(format!(
            "source and reference grids have opposite axis orientation (scale {}, {})",
            t.a, t.e
        )));
    }
    Ok(GeometryMapping {
        scale_x: t.a,
        scale_y: t.e,
        offset_x: t.c,
        offset_y: t.f,
    })
}

impl GeometryMapping {
    pub fn identity() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    pub fn is_identity(&self) -> bool {
        self == &Self::identity()
    }

    /// Reference pixel edge coordinate → source pixel edge coordinate.
    #[inline]
    pub fn to_source(&self, dst_x: f64, dst_y: f64) -> (f64, f64) {
        (
            self.offset_x + self.scale_x * dst_x,
            self.offset_y + self.scale_y * dst_y,
        )
    }

    /// Source pixel edge coordinate → reference pixel edge coordinate.
    #[inline]
    pub fn to_destination(&self, src_x: f64, src_y: f64) -> (f64, f64) {
        (
            (src_x - self.offset_x) / self.scale_x,
            (src_y - self.offset_y) / self.scale_y,
        )
    }

    /// Source rectangle needed to compute `dst`, grown by one pixel on each
    /// side so interpolation neighbourhoods are covered.
    pub fn backward_map(&self, dst: &Rect) -> Rect {
        if dst.is_empty() {
            return Rect::default();
        }
        let (x0, y0) = self.to_source(dst.x as f64, dst.y as f64);
        let (x1, y1) = self.to_source(dst.x_end() as f64, dst.y_end() as f64);
        Rect::from_bounds(
            (x0 + ROUNDING_SLACK).floor() as isize,
            (y0 + ROUNDING_SLACK).floor() as isize,
            (x1 - ROUNDING_SLACK).ceil() as isize,
            (y1 - ROUNDING_SLACK).ceil() as isize,
        )
        .expand(1)
    }

    /// Destination rectangle touched by `src`; extents are rounded up.
    pub fn forward_map(&self, src: &Rect) -> Rect {
        if src.is_empty() {
            return Rect::default();
        }
        let (x0, y0) = self.to_destination(src.x as f64, src.y as f64);
        let (x1, y1) = self.to_destination(src.x_end() as f64, src.y_end() as f64);
        Rect::from_bounds(
            (x0 + ROUNDING_SLACK).floor() as isize,
            (y0 + ROUNDING_SLACK).floor() as isize,
            (x1 - ROUNDING_SLACK).ceil() as isize,
            (y1 - ROUNDING_SLACK).ceil() as isize,
        )
    }
}
