//! Raster data model: pixel rectangles, typed sample accessors, pyramid levels.

pub mod buffer;
pub mod level;
pub mod pyramid;
pub mod rect;

pub use buffer::{SampleBuffer, SampleBufferMut};
pub use level::{RasterLevel, Tile};
pub use pyramid::RasterPyramid;
pub use rect::Rect;
