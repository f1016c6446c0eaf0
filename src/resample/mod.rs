//! Upsampling: interpolate the source at each destination pixel.

pub mod bilinear;
pub mod cubic;
pub mod nearest;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::aggregate::AggregationMethod;
use crate::error::ResampleError;
use crate::geometry::GeometryMapping;
use crate::raster::{Rect, SampleBuffer, SampleBufferMut};
use crate::validity::Sample;

/// Interpolation kernel evaluated at one destination pixel.
pub type Interpolator<T> = fn(&SampleBuffer<'_, T>, &GeometryMapping, isize, isize, f64) -> Option<T>;

/// Lowercase and drop everything but ASCII letters and digits, so
/// `"Flag-Median_AND"` and `"flagmedianand"` compare equal.
pub(crate) fn normalize_name(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Available upsampling methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum InterpolationMethod {
    Nearest,
    Bilinear,
    CubicConvolution,
}

impl InterpolationMethod {
    pub const ALL: [InterpolationMethod; 3] = [Self::Nearest, Self::Bilinear, Self::CubicConvolution];

    /// Parse from a string name.
    pub fn from_name(s: &str) -> Option<Self> {
        match normalize_name(s).as_str() {
            "nearest" | "nearestneighbour" | "nearestneighbor" => Some(Self::Nearest),
            "bilinear" => Some(Self::Bilinear),
            "cubicconvolution" | "cubic" | "bicubic" => Some(Self::CubicConvolution),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Bilinear => "bilinear",
            Self::CubicConvolution => "cubic_convolution",
        }
    }

    /// Source pixels needed beyond the backward-mapped rectangle on each side.
    pub fn halo(&self) -> usize {
        match self {
            Self::Nearest => 0,
            Self::Bilinear => 1,
            Self::CubicConvolution => 2,
        }
    }

    pub fn kernel<T: Sample>(self) -> Interpolator<T> {
        match self {
            Self::Nearest => nearest::interpolate_pixel::<T>,
            Self::Bilinear => bilinear::interpolate_pixel::<T>,
            Self::CubicConvolution => cubic::interpolate_pixel::<T>,
        }
    }
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InterpolationMethod {
    type Err = ResampleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ResampleError::UnknownMethod(s.to_string()))
    }
}

impl TryFrom<String> for InterpolationMethod {
    type Error = ResampleError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<InterpolationMethod> for String {
    fn from(m: InterpolationMethod) -> Self {
        m.name().to_string()
    }
}

/// Either family of method, as chosen by the caller for one resampling call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ResamplingMethod {
    Interpolate(InterpolationMethod),
    Aggregate(AggregationMethod),
}

impl ResamplingMethod {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Interpolate(m) => m.name(),
            Self::Aggregate(m) => m.name(),
        }
    }

    pub fn halo(&self) -> usize {
        match self {
            Self::Interpolate(m) => m.halo(),
            Self::Aggregate(_) => 0,
        }
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, Self::Aggregate(m) if m.is_flag())
    }
}

impl From<InterpolationMethod> for ResamplingMethod {
    fn from(m: InterpolationMethod) -> Self {
        Self::Interpolate(m)
    }
}

impl From<AggregationMethod> for ResamplingMethod {
    fn from(m: AggregationMethod) -> Self {
        Self::Aggregate(m)
    }
}

impl fmt::Display for ResamplingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResamplingMethod {
    type Err = ResampleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(m) = InterpolationMethod::from_name(s) {
            return Ok(Self::Interpolate(m));
        }
        if let Some(m) = AggregationMethod::from_name(s) {
            return Ok(Self::Aggregate(m));
        }
        Err(ResampleError::UnknownMethod(s.to_string()))
    }
}

impl TryFrom<String> for ResamplingMethod {
    type Error = ResampleError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ResamplingMethod> for String {
    fn from(m: ResamplingMethod) -> Self {
        m.name().to_string()
    }
}

/// Fill `dst_rect` of `dst` by interpolating `src` with `method`.
///
/// `src` must cover the backward-mapped `dst_rect` grown by the method's
/// halo, clipped to the source level. Pixels the kernel rejects get `fill`.
/// An identity mapping copies samples through untouched, no-data included.
pub fn interpolate<T: Sample>(
    method: InterpolationMethod,
    src: &SampleBuffer<'_, T>,
    dst: &mut SampleBufferMut<'_, T>,
    dst_rect: &Rect,
    mapping: &GeometryMapping,
    no_data: f64,
    fill: T,
) {
    if dst_rect.is_empty() {
        return;
    }
    let kernel = method.kernel::<T>();
    let identity = mapping.is_identity();
    let bounds = src.bounds();
    for y in dst_rect.y..dst_rect.y_end() {
        let mut index = dst.index(dst_rect.x, y);
        for x in dst_rect.x..dst_rect.x_end() {
            let value = if src.is_empty() {
                fill
            } else if identity {
                if bounds.contains(x, y) {
                    src.at(x, y)
                } else {
                    fill
                }
            } else {
                kernel(src, mapping, x, y, no_data).unwrap_or(fill)
            };
            dst.set(index, value);
            index += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!(InterpolationMethod::from_name("NEAREST"), Some(InterpolationMethod::Nearest));
        assert_eq!(
            InterpolationMethod::from_name("Nearest_Neighbour"),
            Some(InterpolationMethod::Nearest)
        );
        assert_eq!(
            InterpolationMethod::from_name("Cubic Convolution"),
            Some(InterpolationMethod::CubicConvolution)
        );
        assert_eq!(InterpolationMethod::from_name("bicubic"), Some(InterpolationMethod::CubicConvolution));
        assert_eq!(InterpolationMethod::from_name("lanczos"), None);
        for m in InterpolationMethod::ALL {
            assert_eq!(m.name().parse::<InterpolationMethod>().unwrap(), m);
        }
    }

    #[test]
    fn test_resampling_method_from_either_family() {
        assert_eq!(
            "bilinear".parse::<ResamplingMethod>().unwrap(),
            ResamplingMethod::Interpolate(InterpolationMethod::Bilinear)
        );
        assert_eq!(
            "Flag_Median_Or".parse::<ResamplingMethod>().unwrap(),
            ResamplingMethod::Aggregate(AggregationMethod::FlagMedianOr)
        );
        let err = "sinc".parse::<ResamplingMethod>().unwrap_err();
        assert!(matches!(err, ResampleError::UnknownMethod(ref s) if s == "sinc"));
    }

    #[test]
    fn test_serde_as_names() {
        let m = ResamplingMethod::Interpolate(InterpolationMethod::CubicConvolution);
        assert_eq!(serde_json::to_string(&m).unwrap(), "\"cubic_convolution\"");
        let back: ResamplingMethod = serde_json::from_str("\"MEAN\"").unwrap();
        assert_eq!(back, ResamplingMethod::Aggregate(AggregationMethod::Mean));
        assert!(serde_json::from_str::<InterpolationMethod>("\"mean\"").is_err());
    }

    #[test]
    fn test_halo() {
        assert_eq!(ResamplingMethod::from(InterpolationMethod::Nearest).halo(), 0);
        assert_eq!(ResamplingMethod::from(InterpolationMethod::Bilinear).halo(), 1);
        assert_eq!(ResamplingMethod::from(InterpolationMethod::CubicConvolution).halo(), 2);
        assert_eq!(ResamplingMethod::from(AggregationMethod::Median).halo(), 0);
    }

    #[test]
    fn test_identity_mapping_copies_source() {
        let data: Vec<i16> = vec![1, -1, 3, 4, 5, 6, 7, -1, 9];
        let src = SampleBuffer::new(&data, 3, 3, 0, 0).unwrap();
        for method in InterpolationMethod::ALL {
            let mut out = vec![0i16; 9];
            let mut dst = SampleBufferMut::new(&mut out, 3, 3, 0, 0).unwrap();
            interpolate(
                method,
                &src,
                &mut dst,
                &Rect::from_size(3, 3),
                &GeometryMapping::identity(),
                -1.0,
                -1,
            );
            assert_eq!(out, data, "{method}");
        }
    }

    #[test]
    fn test_cubic_identity_on_float() {
        let data: Vec<f64> = (0..16).map(|v| (v as f64).sin()).collect();
        let src = SampleBuffer::new(&data, 4, 4, 0, 0).unwrap();
        let mut out = vec![0.0; 16];
        let mut dst = SampleBufferMut::new(&mut out, 4, 4, 0, 0).unwrap();
        interpolate(
            InterpolationMethod::CubicConvolution,
            &src,
            &mut dst,
            &Rect::from_size(4, 4),
            &GeometryMapping::identity(),
            f64::NAN,
            f64::NAN,
        );
        for (a, b) in out.iter().zip(&data) {
            approx::assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_partial_rect_leaves_rest_untouched() {
        let data = [2u8; 4];
        let src = SampleBuffer::new(&data, 2, 2, 0, 0).unwrap();
        let mut out = vec![0u8; 4];
        let mut dst = SampleBufferMut::new(&mut out, 2, 2, 0, 0).unwrap();
        interpolate(
            InterpolationMethod::Nearest,
            &src,
            &mut dst,
            &Rect::new(1, 0, 1, 2),
            &GeometryMapping::identity(),
            255.0,
            255,
        );
        assert_eq!(out, vec![0, 2, 0, 2]);
    }
}
