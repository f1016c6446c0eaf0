//! Bitmask aggregators for flag/quality bands.
//!
//! Integer samples are handled as bit patterns of their own width, so the
//! sign bit of a signed flag band is an ordinary flag. Float samples are
//! truncated to `i64` first. Unlike the numeric aggregators, a window without
//! valid samples yields 0, not the sentinel.

use num_traits::NumCast as Cast;

use crate::aggregate::window::Window;
use crate::raster::SampleBuffer;
use crate::validity::{is_valid, Sample, SampleKind};

/// Highest number of bit positions taking part in majority voting.
const VOTING_BITS: u32 = 63;

/// Width in bits of the pattern a sample of `T` carries.
#[inline]
fn width<T: Sample>() -> u32 {
    match T::KIND {
        SampleKind::Integer => (std::mem::size_of::<T>() * 8) as u32,
        SampleKind::Float => 64,
    }
}

#[inline]
fn is_signed<T: Sample>() -> bool {
    <T as Cast>::from(-1i64).is_some()
}

#[inline]
fn mask(pattern: u64, width: u32) -> u64 {
    if width >= 64 {
        pattern
    } else {
        pattern & ((1u64 << width) - 1)
    }
}

/// Bit pattern of `v`, zero-extended from `T`'s width.
#[inline]
fn bits<T: Sample>(v: T) -> u64 {
    let raw = match <i64 as Cast>::from(v) {
        Some(i) => i as u64,
        None => <u64 as Cast>::from(v).unwrap_or(v.as_f64() as u64),
    };
    mask(raw, width::<T>())
}

/// Inverse of [`bits`]: sign-extends from `T`'s top bit for signed types.
#[inline]
fn from_bits<T: Sample>(pattern: u64) -> Option<T> {
    let w = width::<T>();
    let pattern = mask(pattern, w);
    if is_signed::<T>() {
        let shift = 64 - w;
        <T as Cast>::from(((pattern << shift) as i64) >> shift)
    } else {
        <T as Cast>::from(pattern)
    }
}

/// Visit the bit pattern of every valid sample in the window.
fn for_each_valid<T, F>(src: &SampleBuffer<'_, T>, w: &Window, no_data: f64, mut f: F)
where
    T: Sample,
    F: FnMut(u64),
{
    for y in w.y0..=w.y1 {
        let row = src.index(w.x0, y);
        for i in 0..w.width() {
            let v = src.get(row + i);
            if is_valid(v.as_f64(), no_data, T::KIND) {
                f(bits(v));
            }
        }
    }
}

pub fn flag_and<T: Sample>(src: &SampleBuffer<'_, T>, w: &Window, no_data: f64) -> Option<T> {
    let mut acc = !0u64;
    let mut any = false;
    for_each_valid(src, w, no_data, |b| {
        acc &= b;
        any = true;
    });
    from_bits(if any { acc } else { 0 })
}

pub fn flag_or<T: Sample>(src: &SampleBuffer<'_, T>, w: &Window, no_data: f64) -> Option<T> {
    let mut acc = 0u64;
    for_each_valid(src, w, no_data, |b| acc |= b);
    from_bits(acc)
}

/// Per-bit vote: a bit is set when strictly more than half of the valid
/// samples have it.
pub fn flag_median_and<T: Sample>(src: &SampleBuffer<'_, T>, w: &Window, no_data: f64) -> Option<T> {
    majority(src, w, no_data, |count, half| count > half)
}

/// Per-bit vote: a bit is set when at least half of the valid samples have it.
pub fn flag_median_or<T: Sample>(src: &SampleBuffer<'_, T>, w: &Window, no_data: f64) -> Option<T> {
    majority(src, w, no_data, |count, half| count >= half)
}

fn majority<T, F>(src: &SampleBuffer<'_, T>, w: &Window, no_data: f64, keep: F) -> Option<T>
where
    T: Sample,
    F: Fn(f64, f64) -> bool,
{
    let voting = width::<T>().min(VOTING_BITS) as usize;
    let mut counts = [0u32; VOTING_BITS as usize];
    let mut n = 0u32;
    for_each_valid(src, w, no_data, |b| {
        n += 1;
        for (bit, count) in counts[..voting].iter_mut().enumerate() {
            if b & (1u64 << bit) != 0 {
                *count += 1;
            }
        }
    });
    if n == 0 {
        return from_bits(0);
    }

    let half = n as f64 / 2.0;
    let mut result = 0u64;
    for (bit, &count) in counts[..voting].iter().enumerate() {
        if keep(count as f64, half) {
            result |= 1u64 << bit;
        }
    }
    from_bits(result)
}
