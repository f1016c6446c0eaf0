//! Choice of the source pyramid level used for a given reference level.

/// Index of the source level whose resolution, after the remaining scale step,
/// lands closest to 1:1 with the target.
///
/// `scales[i]` is the pixel size of source level `i` relative to source level 0,
/// `target_scale` the same quantity for the requested reference level and
/// `native_scaling` the ratio of the level-0 pixel sizes (source / reference).
/// Ties go to the lowest index; an empty slice selects level 0.
pub fn select_level(target_scale: f64, scales: &[f64], native_scaling: f64) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (i, &scale) in scales.iter().enumerate() {
        let ratio = native_scaling * (scale / target_scale);
        let distance = (1.0 - ratio).abs();
        if distance < best_distance {
            best = i;
            best_distance = distance;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picks_closest_ratio() {
        // ratios 0.256, 0.513, 1.026, 2.05
        assert_eq!(select_level(3.9, &[1.0, 2.0, 4.0, 8.0], 1.0), 2);
    }

    #[test]
    fn test_native_scaling_shifts_choice() {
        // source pixels are already 4x coarser than the reference pixels
        assert_eq!(select_level(4.0, &[1.0, 2.0, 4.0, 8.0], 4.0), 0);
        // source pixels 2x finer: source level 1 matches reference level 0
        assert_eq!(select_level(1.0, &[1.0, 2.0, 4.0], 0.5), 1);
    }

    #[test]
    fn test_tie_prefers_lowest_index() {
        // ratios 0.5 and 1.5 are equally far from 1
        assert_eq!(select_level(2.0, &[1.0, 3.0], 1.0), 0);
    }

    #[test]
    fn test_single_and_empty() {
        assert_eq!(select_level(16.0, &[1.0], 1.0), 0);
        assert_eq!(select_level(16.0, &[], 1.0), 0);
    }
}
