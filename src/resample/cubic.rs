//! Cubic convolution interpolation (Keys 1981, a = -0.5, i.e. Catmull-Rom).
//!
//! Uses a 4×4 neighbourhood. Neighbours outside the source are replaced by the
//! nearest row/column inside it, so edge pixels are always computable.

use crate::geometry::GeometryMapping;
use crate::raster::SampleBuffer;
use crate::validity::{narrow, Sample};

/// Cubic convolution weight function (Keys 1981, a = -0.5).
///
/// ```text
/// W(t) = (a+2)|t|³ - (a+3)|t|² + 1       for 0 ≤ |t| ≤ 1
/// W(t) = a|t|³ - 5a|t|² + 8a|t| - 4a     for 1 < |t| ≤ 2
/// W(t) = 0                                 for |t| > 2
/// ```
fn cubic_weight(t: f64) -> f64 {
    const A: f64 = -0.5;
    let t = t.abs();
    if t <= 1.0 {
        (A + 2.0) * t * t * t - (A + 3.0) * t * t + 1.0
    } else if t <= 2.0 {
        A * t * t * t - 5.0 * A * t * t + 8.0 * A * t - 4.0 * A
    } else {
        0.0
    }
}

/// 1-D convolution of four equally spaced values at fractional offset `w`
/// past the second one.
#[inline]
fn convolve(v: [f64; 4], w: f64) -> f64 {
    v[0] * cubic_weight(w + 1.0)
        + v[1] * cubic_weight(w)
        + v[2] * cubic_weight(w - 1.0)
        + v[3] * cubic_weight(w - 2.0)
}

/// Interpolate at centre-based source coordinates `(x, y)`: pixel `(i, j)`
/// has its centre at `(i, j)`. Rows are convolved first, then the column of
/// row results. No-data neighbours take part in the sum; the caller rejects
/// a result that comes out NaN or equal to the sentinel.
pub fn sample<T: Sample>(src: &SampleBuffer<'_, T>, x: f64, y: f64) -> f64 {
    let ix = x.floor() as isize;
    let iy = y.floor() as isize;
    let wx = x - ix as f64;
    let wy = y - iy as f64;

    let cols = [-1, 0, 1, 2].map(|i| src.clamp_x(ix + i));
    let mut rows = [0.0; 4];
    for (r, j) in rows.iter_mut().zip(-1..=2) {
        let yy = src.clamp_y(iy + j);
        let v = cols.map(|xx| src.at(xx, yy).as_f64());
        *r = convolve(v, wx);
    }
    convolve(rows, wy)
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
    narrow(sample(src, x - 0.5, y - 0.5), no_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_weight_at_knots() {
        assert_relative_eq!(cubic_weight(0.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(cubic_weight(1.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(cubic_weight(2.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(cubic_weight(-1.5), cubic_weight(1.5), epsilon = 1e-12);
    }

    #[test]
    fn test_weights_sum_to_one() {
        for &w in &[0.0, 0.1, 0.5, 0.9] {
            let sum = convolve([1.0; 4], w);
            assert_relative_eq!(sum, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_exact_at_pixel_centres() {
        let data: Vec<f64> = (0..25).map(|v| (v * v) as f64).collect();
        let buf = SampleBuffer::new(&data, 5, 5, 0, 0).unwrap();
        for (x, y) in [(0, 0), (2, 3), (4, 4), (4, 0)] {
            let expected = data[y * 5 + x];
            assert_relative_eq!(sample(&buf, x as f64, y as f64), expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_linear_ramp_reproduced_inside() {
        let data: Vec<f64> = (0..8).flat_map(|_| (0..8).map(|c| 2.0 * c as f64)).collect();
        let buf = SampleBuffer::new(&data, 8, 8, 0, 0).unwrap();
        assert_relative_eq!(sample(&buf, 3.25, 4.0), 6.5, epsilon = 1e-10);
        assert_relative_eq!(sample(&buf, 4.5, 1.5), 9.0, epsilon = 1e-10);
    }

    #[test]
    fn test_constant_including_borders() {
        let data = [7.0f32; 9];
        let buf = SampleBuffer::new(&data, 3, 3, 0, 0).unwrap();
        for &(x, y) in &[(-0.5, -0.5), (0.0, 0.0), (1.3, 0.7), (2.4, 2.4)] {
            assert_relative_eq!(sample(&buf, x, y), 7.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_nan_neighbour_yields_none() {
        let mut data = vec![1.0f64; 36];
        data[3 * 6 + 3] = f64::NAN;
        let buf = SampleBuffer::new(&data, 6, 6, 0, 0).unwrap();
        let m = GeometryMapping::identity();
        assert_eq!(interpolate_pixel(&buf, &m, 2, 2, -9999.0), None);
        // far enough away, the NaN is outside the 4x4 neighbourhood
        assert_eq!(interpolate_pixel(&buf, &m, 0, 0, -9999.0), Some(1.0));
    }

    #[test]
    fn test_result_equal_to_sentinel_rejected() {
        let data = [5i16; 16];
        let buf = SampleBuffer::new(&data, 4, 4, 0, 0).unwrap();
        let m = GeometryMapping::identity();
        assert_eq!(interpolate_pixel(&buf, &m, 1, 1, 5.0), None);
        assert_eq!(interpolate_pixel(&buf, &m, 1, 1, 0.0), Some(5));
    }
}
