//! Nearest-neighbour interpolation.

use crate::geometry::GeometryMapping;
use crate::raster::SampleBuffer;
use crate::validity::Sample;

/// Sample the source pixel containing `(x, y)` (source pixel edge coordinates).
///
/// Returns `None` outside the source window. The sample is copied as is, so
/// a no-data source pixel stays no-data.
pub fn sample<T: Sample>(src: &SampleBuffer<'_, T>, x: f64, y: f64) -> Option<T> {
    let col = x.floor() as isize;
    let row = y.floor() as isize;
    if src.bounds().contains(col, row) {
        Some(src.at(col, row))
    } else {
        None
    }
}

/// Nearest-neighbour value for destination pixel `(dst_x, dst_y)`.
///
/// Maps the pixel's upper-left edge, not its centre.
#[inline]
pub fn interpolate_pixel<T: Sample>(
    src: &SampleBuffer<'_, T>,
    mapping: &GeometryMapping,
    dst_x: isize,
    dst_y: isize,
    _no_data: f64,
) -> Option<T> {
    let (x, y) = mapping.to_source(dst_x as f64, dst_y as f64);
    sample(src, x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inside_pixel() {
        let data = [1.0, 2.0, 3.0, 4.0];
        let buf = SampleBuffer::new(&data, 2, 2, 0, 0).unwrap();
        assert_eq!(sample(&buf, 0.0, 0.0), Some(1.0));
        assert_eq!(sample(&buf, 1.99, 0.5), Some(2.0));
        assert_eq!(sample(&buf, 0.5, 1.0), Some(3.0));
        assert_eq!(sample(&buf, 1.5, 1.5), Some(4.0));
    }

    #[test]
    fn test_out_of_bounds() {
        let data = [1u8, 2, 3, 4];
        let buf = SampleBuffer::new(&data, 2, 2, 0, 0).unwrap();
        assert_eq!(sample(&buf, -0.01, 0.5), None);
        assert_eq!(sample(&buf, 0.5, -0.01), None);
        assert_eq!(sample(&buf, 2.0, 0.5), None);
        assert_eq!(sample(&buf, 0.5, 2.0), None);
    }

    #[test]
    fn test_upsampling_uses_edge_mapping() {
        // reference pixels 2/3 of a source pixel, shifted by 1/3
        let data = [3i32, 4, 5, 6];
        let buf = SampleBuffer::new(&data, 2, 2, 0, 0).unwrap();
        let m = GeometryMapping {
            scale_x: 2.0 / 3.0,
            scale_y: 2.0 / 3.0,
            offset_x: 1.0 / 3.0,
            offset_y: 1.0 / 3.0,
        };
        let row0: Vec<_> = (0..3)
            .map(|x| interpolate_pixel(&buf, &m, x, 0, 0.0).unwrap())
            .collect();
        assert_eq!(row0, vec![3, 4, 4]);
        assert_eq!(interpolate_pixel(&buf, &m, 1, 2, 0.0), Some(6));
    }

    #[test]
    fn test_window_origin_respected() {
        let data: Vec<u16> = (0..16).collect();
        let full = SampleBuffer::new(&data, 4, 4, 0, 0).unwrap();
        let win = full.window(&crate::raster::Rect::new(2, 2, 2, 2));
        assert_eq!(sample(&win, 3.5, 2.5), Some(11));
        assert_eq!(sample(&win, 1.5, 2.5), None);
    }
}
