//! Downsampling: aggregate the source window under each destination pixel.

pub mod flags;
pub mod stats;
pub mod window;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ResampleError;
use crate::geometry::GeometryMapping;
use crate::raster::{Rect, SampleBuffer, SampleBufferMut};
use crate::resample::normalize_name;
use crate::validity::Sample;
use window::{axis_span, AxisSpan, Window};

/// Aggregation kernel: `None` means "write the sentinel".
pub type Aggregator<T> = fn(&SampleBuffer<'_, T>, &Window, f64) -> Option<T>;

/// Available downsampling methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AggregationMethod {
    First,
    Min,
    Max,
    Mean,
    Median,
    FlagAnd,
    FlagOr,
    FlagMedianAnd,
    FlagMedianOr,
}

impl AggregationMethod {
    pub const ALL: [AggregationMethod; 9] = [
        Self::First,
        Self::Min,
        Self::Max,
        Self::Mean,
        Self::Median,
        Self::FlagAnd,
        Self::FlagOr,
        Self::FlagMedianAnd,
        Self::FlagMedianOr,
    ];

    /// Parse from a string name. Case, `_`, `-` and spaces are ignored.
    pub fn from_name(s: &str) -> Option<Self> {
        match normalize_name(s).as_str() {
            "first" => Some(Self::First),
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            "mean" => Some(Self::Mean),
            "median" => Some(Self::Median),
            "flagand" => Some(Self::FlagAnd),
            "flagor" => Some(Self::FlagOr),
            "flagmedianand" => Some(Self::FlagMedianAnd),
            "flagmedianor" => Some(Self::FlagMedianOr),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Min => "min",
            Self::Max => "max",
            Self::Mean => "mean",
            Self::Median => "median",
            Self::FlagAnd => "flag_and",
            Self::FlagOr => "flag_or",
            Self::FlagMedianAnd => "flag_median_and",
            Self::FlagMedianOr => "flag_median_or",
        }
    }

    /// Whether the method treats samples as bitmasks.
    pub fn is_flag(&self) -> bool {
        matches!(
            self,
            Self::FlagAnd | Self::FlagOr | Self::FlagMedianAnd | Self::FlagMedianOr
        )
    }

    pub fn kernel<T: Sample>(self) -> Aggregator<T> {
        match self {
            Self::First => stats::first::<T>,
            Self::Min => stats::min::<T>,
            Self::Max => stats::max::<T>,
            Self::Mean => stats::mean::<T>,
            Self::Median => stats::median::<T>,
            Self::FlagAnd => flags::flag_and::<T>,
            Self::FlagOr => flags::flag_or::<T>,
            Self::FlagMedianAnd => flags::flag_median_and::<T>,
            Self::FlagMedianOr => flags::flag_median_or::<T>,
        }
    }
}

impl fmt::Display for AggregationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AggregationMethod {
    type Err = ResampleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ResampleError::UnknownMethod(s.to_string()))
    }
}

impl TryFrom<String> for AggregationMethod {
    type Error = ResampleError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AggregationMethod> for String {
    fn from(m: AggregationMethod) -> Self {
        m.name().to_string()
    }
}

/// Fill `dst_rect` of `dst` by aggregating `src` with `method`.
///
/// `src` must cover every source window under `dst_rect` that intersects the
/// source level (see [`GeometryMapping::backward_map`]). Windows entirely
/// outside `src` get `fill`.
pub fn aggregate<T: Sample>(
    method: AggregationMethod,
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
    let bounds = src.bounds();

    // Column spans are shared by every row.
    let x_spans: Vec<Option<AxisSpan>> = (dst_rect.x..dst_rect.x_end())
        .map(|x| axis_span(mapping.offset_x, mapping.scale_x, x, bounds.x, bounds.x_end()))
        .collect();

    for y in dst_rect.y..dst_rect.y_end() {
        let y_span = if src.is_empty() {
            None
        } else {
            axis_span(mapping.offset_y, mapping.scale_y, y, bounds.y, bounds.y_end())
        };
        let mut index = dst.index(dst_rect.x, y);
        for x_span in &x_spans {
            let value = match (x_span, &y_span) {
                (Some(xs), Some(ys)) => {
                    kernel(src, &Window::from_spans(xs, ys), no_data).unwrap_or(fill)
                }
                _ => fill,
            };
            dst.set(index, value);
            index += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(scale: f64) -> GeometryMapping {
        GeometryMapping {
            scale_x: scale,
            scale_y: scale,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn run<T: Sample>(
        method: AggregationMethod,
        src: &[T],
        src_w: usize,
        src_h: usize,
        scale: f64,
        dst_w: usize,
        dst_h: usize,
        no_data: f64,
        fill: T,
    ) -> Vec<T> {
        let src = SampleBuffer::new(src, src_w, src_h, 0, 0).unwrap();
        let mut out = vec![fill; dst_w * dst_h];
        let mut dst = SampleBufferMut::new(&mut out, dst_w, dst_h, 0, 0).unwrap();
        aggregate(
            method,
            &src,
            &mut dst,
            &Rect::from_size(dst_w, dst_h),
            &mapping(scale),
            no_data,
            fill,
        );
        out
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(AggregationMethod::from_name("Mean"), Some(AggregationMethod::Mean));
        assert_eq!(
            AggregationMethod::from_name("FlagMedianAnd"),
            Some(AggregationMethod::FlagMedianAnd)
        );
        assert_eq!(
            "flag_or".parse::<AggregationMethod>().unwrap(),
            AggregationMethod::FlagOr
        );
        assert!("mode".parse::<AggregationMethod>().is_err());
        for m in AggregationMethod::ALL {
            assert_eq!(AggregationMethod::from_name(m.name()), Some(m));
        }
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&AggregationMethod::FlagMedianOr).unwrap();
        assert_eq!(json, "\"flag_median_or\"");
        let m: AggregationMethod = serde_json::from_str("\"FlagAnd\"").unwrap();
        assert_eq!(m, AggregationMethod::FlagAnd);
        assert!(serde_json::from_str::<AggregationMethod>("\"sum\"").is_err());
    }

    #[test]
    fn test_mean_2x_with_sentinel() {
        let src = [1u16, 2, 0, 4];
        let out = run(AggregationMethod::Mean, &src, 2, 2, 2.0, 1, 1, 0.0, 0);
        assert_eq!(out, vec![2]);
    }

    #[test]
    fn test_block_reduction_all_methods() {
        #[rustfmt::skip]
        let src = [
            1.0f64, 2.0, 5.0, 5.0,
            3.0, 4.0, 5.0, -1.0,
            -1.0, -1.0, 8.0, 6.0,
            -1.0, -1.0, 2.0, 4.0,
        ];
        let first = run(AggregationMethod::First, &src, 4, 4, 2.0, 2, 2, -1.0, -1.0);
        assert_eq!(first, vec![1.0, 5.0, -1.0, 8.0]);
        let min = run(AggregationMethod::Min, &src, 4, 4, 2.0, 2, 2, -1.0, -1.0);
        assert_eq!(min, vec![1.0, 5.0, -1.0, 2.0]);
        let max = run(AggregationMethod::Max, &src, 4, 4, 2.0, 2, 2, -1.0, -1.0);
        assert_eq!(max, vec![4.0, 5.0, -1.0, 8.0]);
        let mean = run(AggregationMethod::Mean, &src, 4, 4, 2.0, 2, 2, -1.0, -1.0);
        assert_eq!(mean, vec![2.5, 5.0, -1.0, 5.0]);
        let median = run(AggregationMethod::Median, &src, 4, 4, 2.0, 2, 2, -1.0, -1.0);
        assert_eq!(median, vec![2.5, 5.0, -1.0, 5.0]);
    }

    #[test]
    fn test_flag_empty_window_is_zero_not_sentinel() {
        let src = [255u8; 4];
        for m in [
            AggregationMethod::FlagAnd,
            AggregationMethod::FlagOr,
            AggregationMethod::FlagMedianAnd,
            AggregationMethod::FlagMedianOr,
        ] {
            assert_eq!(run(m, &src, 2, 2, 2.0, 1, 1, 255.0, 255), vec![0], "{m}");
        }
        assert_eq!(
            run(AggregationMethod::Mean, &src, 2, 2, 2.0, 1, 1, 255.0, 255),
            vec![255]
        );
    }

    #[test]
    fn test_unit_window_is_identity() {
        let src: Vec<i16> = vec![3, -7, 0, 12, 9, 0];
        for m in AggregationMethod::ALL {
            if m.is_flag() {
                continue;
            }
            let out = run(m, &src, 3, 2, 1.0, 3, 2, 0.0, 0);
            assert_eq!(out, src, "{m}");
        }
    }

    #[test]
    fn test_second_pass_with_unit_window_keeps_result() {
        let src: Vec<f32> = (0..36).map(|v| (v % 7) as f32).collect();
        let once = run(AggregationMethod::Mean, &src, 6, 6, 3.0, 2, 2, -9999.0, -9999.0);
        let twice = run(AggregationMethod::Mean, &once, 2, 2, 1.0, 2, 2, -9999.0, -9999.0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_destination_beyond_source_is_filled() {
        let src = [1.0f64, 2.0, 3.0, 4.0];
        // 2 destination pixels of 2 source pixels each, but source is only 2 wide
        let out = run(AggregationMethod::Mean, &src, 2, 2, 2.0, 2, 1, f64::NAN, -5.0);
        assert_eq!(out, vec![2.5, -5.0]);
    }
}
