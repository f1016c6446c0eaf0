//! Bilinear interpolation with partial no-data handling.
//!
//! The 2×2 neighbourhood is clamped into the source (border replication).
//! When some neighbours are no-data the remaining ones are blended with
//! redistributed weights, so a single missing pixel does not punch a hole
//! four output pixels wide.

use crate::geometry::GeometryMapping;
use crate::raster::SampleBuffer;
use crate::validity::{is_valid_sample, narrow, Sample};

/// Interpolate at centre-based source coordinates `(x, y)`.
///
/// Returns `None` only when all four neighbours are no-data.
pub fn sample<T: Sample>(src: &SampleBuffer<'_, T>, x: f64, y: f64, no_data: f64) -> Option<f64> {
    let ix = x.floor() as isize;
    let iy = y.floor() as isize;
    let wx = x - ix as f64;
    let wy = y - iy as f64;

    let (x0, x1) = (src.clamp_x(ix), src.clamp_x(ix + 1));
    let (y0, y1) = (src.clamp_y(iy), src.clamp_y(iy + 1));

    // row-major: 00 upper-left, 01 upper-right, 10 lower-left, 11 lower-right
    let v = [src.at(x0, y0), src.at(x1, y0), src.at(x0, y1), src.at(x1, y1)];
    let ok = v.map(|s| is_valid_sample(s, no_data));
    let [v00, v01, v10, v11] = v.map(Sample::as_f64);

    let w00 = (1.0 - wx) * (1.0 - wy);
    let w01 = wx * (1.0 - wy);
    let w10 = (1.0 - wx) * wy;
    let w11 = wx * wy;

    let value = match ok {
        [true, true, true, true] => v00 * w00 + v01 * w01 + v10 * w10 + v11 * w11,
        [false, false, false, false] => return None,

        // Three valid: the missing corner's weight goes half to each of its
        // edge neighbours.
        [false, true, true, true] => {
            v01 * (w01 + w00 / 2.0) + v10 * (w10 + w00 / 2.0) + v11 * w11
        }
        [true, false, true, true] => {
            v00 * (w00 + w01 / 2.0) + v10 * w10 + v11 * (w11 + w01 / 2.0)
        }
        [true, true, false, true] => {
            v00 * (w00 + w10 / 2.0) + v01 * w01 + v11 * (w11 + w10 / 2.0)
        }
        [true, true, true, false] => {
            v00 * w00 + v01 * (w01 + w11 / 2.0) + v10 * (w10 + w11 / 2.0)
        }

        // Two valid on a shared edge: linear along that edge.
        [true, true, false, false] => v00 * (1.0 - wx) + v01 * wx,
        [false, false, true, true] => v10 * (1.0 - wx) + v11 * wx,
        [true, false, true, false] => v00 * (1.0 - wy) + v10 * wy,
        [false, true, false, true] => v01 * (1.0 - wy) + v11 * wy,

        // Two valid on a diagonal: renormalised bilinear weights.
        [true, false, false, true] => diagonal(v00, w00, v11, w11),
        [false, true, true, false] => diagonal(v01, w01, v10, w10),

        [true, false, false, false] => v00,
        [false, true, false, false] => v01,
        [false, false, true, false] => v10,
        [false, false, false, true] => v11,
    };
    Some(value)
}

#[inline]
fn diagonal(a: f64, wa: f64, b: f64, wb: f64) -> f64 {
    let total = wa + wb;
    if total > 0.0 {
        (a * wa + b * wb) / total
    } else {
        (a + b) / 2.0
    }
}

#[inline]
pub fn interpolate_pixel<T: Sample>(
    src: &SampleBuffer<'_, T>,
    mapping: &GeometryMapping,
    dst_x: isize,
    dst_y: isize,
    no_data: f64,
) -> Option<T> {
    let (x, y) = mapping.to_source(dst_x as f64 + 0.5, dst_y as f64 + 0.5);
    narrow(sample(src, x - 0.5, y - 0.5, no_data)?, no_data)
}
