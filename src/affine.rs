//! Pixel-to-model affine transforms.

use crate::error::{ResampleError, Result};

/// Shear coefficients below this magnitude are treated as zero.
const SHEAR_EPSILON: f64 = 1e-12;

/// A 2D affine transform mapping pixel coordinates to model coordinates.
///
/// Maps pixel coordinates (col, row) to model coordinates (x, y):
///   x = a * col + b * row + c
///   y = d * col + e * row + f
///
/// `a`/`e` are the scale terms, `b`/`d` the shear terms and `c`/`f` the
/// translation of the upper-left corner of pixel (0, 0).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0)
    }

    /// Axis-aligned transform from pixel size and upper-left origin.
    pub fn scale_translate(scale_x: f64, scale_y: f64, translate_x: f64, translate_y: f64) -> Self {
        Self::new(scale_x, 0.0, translate_x, 0.0, scale_y, translate_y)
    }

    pub fn to_tuple(&self) -> (f64, f64, f64, f64, f64, f64) {
        (self.a, self.b, self.c, self.d, self.e, self.f)
    }

    /// Apply the forward transform: (col, row) -> (x, y).
    pub fn forward(&self, col: f64, row: f64) -> (f64, f64) {
        let x = self.a * col + self.b * row + self.c;
        let y = self.d * col + self.e * row + self.f;
        (x, y)
    }

    /// Transform that applies `other` first and then `self`.
    pub fn compose(&self, other: &Affine) -> Affine {
        Affine {
            a: self.a * other.a + self.b * other.d,
            b: self.a * other.b + self.b * other.e,
            c: self.a * other.c + self.b * other.f + self.c,
            d: self.d * other.a + self.e * other.d,
            e: self.d * other.b + self.e * other.e,
            f: self.d * other.c + self.e * other.f + self.f,
        }
    }

    /// Transform of a pyramid level whose pixels cover `factor_x` × `factor_y`
    /// pixels of this one. The origin is unchanged.
    pub fn scaled(&self, factor_x: f64, factor_y: f64) -> Affine {
        Affine {
            a: self.a * factor_x,
            b: self.b * factor_y,
            c: self.c,
            d: self.d * factor_x,
            e: self.e * factor_y,
            f: self.f,
        }
    }

    /// Pixel size along x in model units.
    pub fn pixel_size_x(&self) -> f64 {
        self.a.hypot(self.d)
    }

    /// Pixel size along y in model units.
    pub fn pixel_size_y(&self) -> f64 {
        self.b.hypot(self.e)
    }

    pub fn is_axis_aligned(&self) -> bool {
        self.b.abs() <= SHEAR_EPSILON && self.d.abs() <= SHEAR_EPSILON
    }

    /// Reject transforms the engine cannot handle: non-finite, singular or sheared.
    pub fn validate_axis_aligned(&self) -> Result<()> {
        let (a, b, c, d, e, f) = self.to_tuple();
        if ![a, b, c, d, e, f].iter().all(|v| v.is_finite()) {
            return Err(ResampleError::Affine(format!(
                "non-finite coefficient in {self:?}"
            )));
        }
        if !self.is_axis_aligned() {
            return Err(ResampleError::Sheared { b: self.b, d: self.d });
        }
        if self.a == 0.0 || self.e == 0.0 {
            return Err(ResampleError::Affine(
                "Singular affine transform (zero pixel size)".into(),
            ));
        }
        Ok(())
    }

    /// Compute the inverse affine transform.
    pub fn inverse(&self) -> Result<Affine> {
        let det = self.a * self.e - self.b * self.d;
        if det.abs() < f64::EPSILON {
            return Err(ResampleError::Affine(
                "Singular affine transform (determinant is zero)".into(),
            ));
        }
        let inv_det = 1.0 / det;
        Ok(Affine {
            a: self.e * inv_det,
            b: -self.b * inv_det,
            c: (self.b * self.f - self.e * self.c) * inv_det,
            d: -self.d * inv_det,
            e: self.a * inv_det,
            f: (self.d * self.c - self.a * self.f) * inv_det,
        })
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<[f64; 6]> for Affine {
    fn from(c: [f64; 6]) -> Self {
        Self::new(c[0], c[1], c[2], c[3], c[4], c[5])
    }
}
