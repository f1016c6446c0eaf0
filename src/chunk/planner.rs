//! Chunk planner: maps destination tiles to the source windows they read.

use crate::error::{ResampleError, Result};
use crate::geometry::GeometryMapping;
use crate::raster::Rect;

/// Plan for computing a single destination tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TilePlan {
    /// Destination tile, in reference-level pixels.
    pub dst: Rect,
    /// Part of `dst` covered by the source level; everything else is no-data.
    pub compute: Rect,
    /// Source window (with halo) read for `compute`, clipped to the source level.
    pub src: Rect,
    /// Whether any destination pixel of the tile is evaluated.
    pub has_data: bool,
}

impl TilePlan {
    /// Destination tile shape as (rows, cols).
    pub fn dst_tile_shape(&self) -> (usize, usize) {
        (self.dst.height, self.dst.width)
    }
}

/// Plan one destination tile against a source level covering `src_bounds`.
pub fn plan_tile(dst: Rect, mapping: &GeometryMapping, src_bounds: &Rect, halo: usize) -> TilePlan {
    let compute = dst.intersect(&mapping.forward_map(src_bounds));
    let src = if compute.is_empty() {
        Rect::default()
    } else {
        mapping.backward_map(&compute).expand(halo).intersect(src_bounds)
    };
    TilePlan {
        dst,
        compute,
        src,
        has_data: !compute.is_empty() && !src.is_empty(),
    }
}

/// Divide a `dst_shape` (rows, cols) grid into tiles of at most `tile_size`
/// (rows, cols), row by row, and plan each against a source of `src_shape`.
pub fn plan_tiles(
    dst_shape: (usize, usize),
    tile_size: (usize, usize),
    mapping: &GeometryMapping,
    src_shape: (usize, usize),
    halo: usize,
) -> Result<Vec<TilePlan>> {
    let (dst_rows, dst_cols) = dst_shape;
    let (tile_h, tile_w) = tile_size;

    if tile_h == 0 || tile_w == 0 {
        return Err(ResampleError::Shape("Tile size must be > 0".into()));
    }

    let src_bounds = Rect::from_size(src_shape.1, src_shape.0);
    let mut plans = Vec::with_capacity(dst_rows.div_ceil(tile_h) * dst_cols.div_ceil(tile_w));

    let mut row0 = 0;
    while row0 < dst_rows {
        let row1 = (row0 + tile_h).min(dst_rows);

        let mut col0 = 0;
        while col0 < dst_cols {
            let col1 = (col0 + tile_w).min(dst_cols);
            let dst = Rect::new(col0 as isize, row0 as isize, col1 - col0, row1 - row0);
            plans.push(plan_tile(dst, mapping, &src_bounds, halo));
            col0 = col1;
        }
        row0 = row1;
    }

    Ok(plans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scaled(scale: f64, offset: f64) -> GeometryMapping {
        GeometryMapping {
            scale_x: scale,
            scale_y: scale,
            offset_x: offset,
            offset_y: offset,
        }
    }

    #[test]
    fn test_identity_4_tiles_cover_full_extent() {
        let plans = plan_tiles((64, 64), (32, 32), &GeometryMapping::identity(), (64, 64), 1).unwrap();

        assert_eq!(plans.len(), 4);

        // Verify tiles cover the full extent without gaps
        let mut covered = vec![vec![false; 64]; 64];
        for plan in &plans {
            for row in &mut covered[plan.dst.y as usize..plan.dst.y_end() as usize] {
                for cell in &mut row[plan.dst.x as usize..plan.dst.x_end() as usize] {
                    assert!(!*cell, "Overlapping tiles");
                    *cell = true;
                }
            }
            assert!(plan.has_data);
            assert_eq!(plan.compute, plan.dst);
        }
        for row in &covered {
            for &cell in row {
                assert!(cell, "Gap in coverage");
            }
        }
    }

    #[test]
    fn test_src_window_within_source() {
        let plans = plan_tiles((50, 50), (16, 16), &scaled(0.37, 1.3), (20, 20), 2).unwrap();
        for plan in plans.iter().filter(|p| p.has_data) {
            assert!(plan.src.x >= 0 && plan.src.y >= 0);
            assert!(plan.src.x_end() <= 20, "src col end {}", plan.src.x_end());
            assert!(plan.src.y_end() <= 20, "src row end {}", plan.src.y_end());
        }
    }

    #[test]
    fn test_halo_padding() {
        let no_halo = plan_tiles((64, 64), (32, 32), &GeometryMapping::identity(), (64, 64), 0).unwrap();
        let halo = plan_tiles((64, 64), (32, 32), &GeometryMapping::identity(), (64, 64), 2).unwrap();

        // Interior tile edge at col 32: its source should start further left with a halo
        let (tile_no_halo, tile_halo) = (&no_halo[1], &halo[1]);
        assert_eq!(tile_no_halo.src.x, 31);
        assert_eq!(tile_halo.src.x, 29);
        // ...but never past the source edge
        assert_eq!(tile_halo.src.x_end(), 64);
    }

    #[test]
    fn test_edge_tile_clipping() {
        // Uneven: 100x100 with 64x64 tiles → last tile is partial
        let plans = plan_tiles((100, 100), (64, 64), &GeometryMapping::identity(), (100, 100), 1).unwrap();

        assert_eq!(plans.len(), 4);
        let last = &plans[3];
        assert_eq!(last.dst, Rect::new(64, 64, 36, 36));
        assert_eq!(last.dst_tile_shape(), (36, 36));
    }

    #[test]
    fn test_partial_coverage_limits_compute() {
        // Source covers reference pixels 0..5 only (scale 2, 10 source pixels)
        let plans = plan_tiles((8, 8), (8, 8), &scaled(2.0, 0.0), (10, 10), 0).unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].compute, Rect::new(0, 0, 5, 5));
        assert!(plans[0].has_data);
    }

    #[test]
    fn test_has_data_false_for_out_of_bounds() {
        // Reference starts 100 source pixels to the right of a 4x4 source
        let plans = plan_tiles((4, 4), (4, 4), &scaled(1.0, 100.0), (4, 4), 1).unwrap();
        assert_eq!(plans.len(), 1);
        assert!(!plans[0].has_data);
        assert!(plans[0].compute.is_empty());
    }

    #[test]
    fn test_no_chunks_single_tile() {
        let plans = plan_tiles((64, 64), (64, 64), &GeometryMapping::identity(), (64, 64), 1).unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].dst, Rect::from_size(64, 64));
    }

    #[test]
    fn test_zero_tile_size_error() {
        let result = plan_tiles((64, 64), (0, 32), &GeometryMapping::identity(), (64, 64), 1);
        assert!(matches!(result, Err(ResampleError::Shape(_))));
    }
}
