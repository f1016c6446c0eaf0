/// Axis-aligned pixel rectangle in the coordinates of one raster level.
///
/// The origin may be negative (backward-mapped rectangles before clipping).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: isize,
    pub y: isize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub fn new(x: isize, y: isize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a whole `width` × `height` raster.
    pub fn from_size(width: usize, height: usize) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Build from end-exclusive bounds; inverted bounds give an empty rectangle.
    pub fn from_bounds(x0: isize, y0: isize, x1: isize, y1: isize) -> Self {
        let width = (x1 - x0).max(0) as usize;
        let height = (y1 - y0).max(0) as usize;
        Self::new(x0, y0, width, height)
    }

    pub fn x_end(&self) -> isize {
        self.x + self.width as isize
    }

    pub fn y_end(&self) -> isize {
        self.y + self.height as isize
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn contains(&self, x: isize, y: isize) -> bool {
        x >= self.x && x < self.x_end() && y >= self.y && y < self.y_end()
    }

    pub fn intersect(&self, other: &Rect) -> Rect {
        Rect::from_bounds(
            self.x.max(other.x),
            self.y.max(other.y),
            self.x_end().min(other.x_end()),
            self.y_end().min(other.y_end()),
        )
    }

    /// Grow by `n` pixels on every side.
    pub fn expand(&self, n: usize) -> Rect {
        let n_i = n as isize;
        Rect::new(self.x - n_i, self.y - n_i, self.width + 2 * n, self.height + 2 * n)
    }
}
