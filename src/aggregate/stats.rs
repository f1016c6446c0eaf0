//! Numeric aggregators. Invalid samples never contribute; a window without
//! valid samples yields `None` (the caller writes the sentinel).

use crate::aggregate::window::Window;
use crate::raster::SampleBuffer;
use crate::validity::{is_valid, narrow, Sample};

/// Upper-left sample of the window, valid or not.
pub fn first<T: Sample>(src: &SampleBuffer<'_, T>, w: &Window, _no_data: f64) -> Option<T> {
    Some(src.at(w.x0, w.y0))
}

pub fn min<T: Sample>(src: &SampleBuffer<'_, T>, w: &Window, no_data: f64) -> Option<T> {
    extreme(src, w, no_data, |candidate, best| candidate < best)
}

pub fn max<T: Sample>(src: &SampleBuffer<'_, T>, w: &Window, no_data: f64) -> Option<T> {
    extreme(src, w, no_data, |candidate, best| candidate > best)
}

fn extreme<T, F>(src: &SampleBuffer<'_, T>, w: &Window, no_data: f64, better: F) -> Option<T>
where
    T: Sample,
    F: Fn(f64, f64) -> bool,
{
    let mut best: Option<(T, f64)> = None;
    for y in w.y0..=w.y1 {
        let row = src.index(w.x0, y);
        for i in 0..w.width() {
            let v = src.get(row + i);
            let f = v.as_f64();
            if !is_valid(f, no_data, T::KIND) {
                continue;
            }
            match best {
                Some((_, bf)) if !better(f, bf) => {}
                _ => best = Some((v, f)),
            }
        }
    }
    best.map(|(v, _)| v)
}

/// Area-weighted mean; partially covered edge rows/columns count with their
/// coverage fraction.
pub fn mean<T: Sample>(src: &SampleBuffer<'_, T>, w: &Window, no_data: f64) -> Option<T> {
    let mut weighted_sum = 0.0_f64;
    let mut total_weight = 0.0_f64;
    for y in w.y0..=w.y1 {
        let wy = w.weight_y(y);
        let row = src.index(w.x0, y);
        for (i, x) in (w.x0..=w.x1).enumerate() {
            let f = src.get(row + i).as_f64();
            if !is_valid(f, no_data, T::KIND) {
                continue;
            }
            let weight = w.weight_x(x) * wy;
            weighted_sum += weight * f;
            total_weight += weight;
        }
    }
    if total_weight == 0.0 {
        return None;
    }
    narrow(weighted_sum / total_weight, no_data)
}

/// Median of the valid samples; weights are ignored. An even count averages
/// the two central values.
pub fn median<T: Sample>(src: &SampleBuffer<'_, T>, w: &Window, no_data: f64) -> Option<T> {
    let mut values = Vec::with_capacity(w.len());
    for y in w.y0..=w.y1 {
        let row = src.index(w.x0, y);
        for i in 0..w.width() {
            let f = src.get(row + i).as_f64();
            if is_valid(f, no_data, T::KIND) {
                values.push(f);
            }
        }
    }
    if values.is_empty() {
        return None;
    }
    values.sort_unstable_by(f64::total_cmp);
    let mid = values.len() / 2;
    let m = if values.len() % 2 == 0 {
        0.5 * (values[mid - 1] + values[mid])
    } else {
        values[mid]
    };
    narrow(m, no_data)
}
