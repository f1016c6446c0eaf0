//! No-data semantics shared by every interpolator and aggregator.
//!
//! Floating-point samples compare against the sentinel with an absolute
//! tolerance and are always invalid when NaN; integer samples compare exactly.

use std::fmt::Debug;

use num_traits::NumCast;

/// Absolute tolerance for float no-data comparison.
pub const NO_DATA_EPSILON: f64 = 1e-8;

/// Numeric kind of a raster's samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleKind {
    Integer,
    Float,
}

/// Element type of a raster level.
pub trait Sample: Copy + NumCast + PartialEq + Debug + Send + Sync + 'static {
    const KIND: SampleKind;

    /// Widen to f64. Integers beyond 2^53 lose precision.
    fn as_f64(self) -> f64;

    /// Narrow from f64, truncating toward zero for integer types.
    /// `None` when the value (or NaN) is not representable.
    fn cast_from_f64(v: f64) -> Option<Self> {
        <Self as NumCast>::from(v)
    }
}

macro_rules! impl_sample {
    ($kind:expr => $($t:ty),*) => {
        $(
            impl Sample for $t {
                const KIND: SampleKind = $kind;

                #[inline]
                fn as_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_sample!(SampleKind::Integer => u8, i8, u16, i16, u32, i32, u64, i64);
impl_sample!(SampleKind::Float => f32, f64);

/// Whether `sample` is a real measurement under the no-data rule for `kind`.
#[inline]
pub fn is_valid(sample: f64, no_data: f64, kind: SampleKind) -> bool {
    match kind {
        SampleKind::Float => {
            if sample.is_nan() {
                return false;
            }
            no_data.is_nan() || (sample - no_data).abs() > NO_DATA_EPSILON
        }
        SampleKind::Integer => sample != no_data,
    }
}

/// Typed shorthand for [`is_valid`].
#[inline]
pub fn is_valid_sample<T: Sample>(sample: T, no_data: f64) -> bool {
    is_valid(sample.as_f64(), no_data, T::KIND)
}

/// The sentinel as a value of `T`, if representable.
pub fn sentinel<T: Sample>(no_data: f64) -> Option<T> {
    T::cast_from_f64(no_data)
}

/// Narrow an interpolated/aggregated value into `T`. `None` when the value is
/// NaN, equal to the sentinel or out of range for `T`.
#[inline]
pub fn narrow<T: Sample>(value: f64, no_data: f64) -> Option<T> {
    if !is_valid(value, no_data, SampleKind::Float) {
        return None;
    }
    T::cast_from_f64(value)
}

/// [`narrow`], substituting `fill` for rejected values.
#[inline]
pub fn to_sample_or<T: Sample>(value: f64, no_data: f64, fill: T) -> T {
    narrow(value, no_data).unwrap_or(fill)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_epsilon_comparison() {
        assert!(!is_valid(-9999.0, -9999.0, SampleKind::Float));
        assert!(!is_valid(-9999.0 + 1e-9, -9999.0, SampleKind::Float));
        assert!(is_valid(-9999.0 + 1e-6, -9999.0, SampleKind::Float));
    }

    #[test]
    fn test_float_nan_always_invalid() {
        assert!(!is_valid(f64::NAN, -9999.0, SampleKind::Float));
        assert!(!is_valid(f64::NAN, f64::NAN, SampleKind::Float));
        // A NaN sentinel only rejects NaN samples
        assert!(is_valid(0.0, f64::NAN, SampleKind::Float));
    }

    #[test]
    fn test_integer_exact_comparison() {
        assert!(!is_valid(0.0, 0.0, SampleKind::Integer));
        assert!(is_valid(1.0, 0.0, SampleKind::Integer));
        assert!(is_valid(255.0, 254.0, SampleKind::Integer));
    }

    #[test]
    fn test_typed_helpers() {
        assert!(!is_valid_sample(0u16, 0.0));
        assert!(is_valid_sample(7u16, 0.0));
        assert!(!is_valid_sample(f32::NAN, -1.0));
        assert_eq!(sentinel::<u8>(255.0), Some(255u8));
        assert_eq!(sentinel::<u8>(-1.0), None);
        assert_eq!(sentinel::<i16>(f64::NAN), None);
        assert!(sentinel::<f32>(f64::NAN).unwrap().is_nan());
    }

    #[test]
    fn test_to_sample_truncates_integers() {
        assert_eq!(to_sample_or::<u16>(4.83, 0.0, 0), 4);
        assert_eq!(to_sample_or::<i32>(-2.7, 0.0, 0), -2);
        // out of range for u8
        assert_eq!(to_sample_or::<u8>(300.0, 0.0, 0), 0);
        // equal to sentinel
        assert_eq!(to_sample_or::<f64>(-9999.0, -9999.0, -9999.0), -9999.0);
        assert_eq!(to_sample_or::<f64>(f64::NAN, -1.0, -1.0), -1.0);
    }
}
