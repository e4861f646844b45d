use serde::{Deserialize, Serialize};

/// Pixel size of the drawing surfaces as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned box with `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Bounds {
    #[must_use]
    pub const fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Builds a box from two arbitrary corners, normalizing the order.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x0: a.x.min(b.x),
            y0: a.y.min(b.y),
            x1: a.x.max(b.x),
            y1: a.y.max(b.y),
        }
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.x1 - self.x0
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.y1 - self.y0
    }

    #[must_use]
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.x0 && point.x <= self.x1 && point.y >= self.y0 && point.y <= self.y1
    }

    /// Inclusive overlap: touching edges count as overlapping.
    #[must_use]
    pub fn overlaps(self, other: Self) -> bool {
        !(self.x1 < other.x0 || self.y1 < other.y0 || self.x0 > other.x1 || self.y0 > other.y1)
    }

    #[must_use]
    pub fn corners(self) -> [Point; 4] {
        [
            Point::new(self.x0, self.y0),
            Point::new(self.x0, self.y1),
            Point::new(self.x1, self.y0),
            Point::new(self.x1, self.y1),
        ]
    }

    #[must_use]
    pub fn expand(self, amount: f64) -> Self {
        Self {
            x0: self.x0 - amount,
            y0: self.y0 - amount,
            x1: self.x1 + amount,
            y1: self.y1 + amount,
        }
    }
}

/// Inclusive `[min, max]` range along one axis in data-domain units.
pub type MinMax = (f64, f64);

/// Visible data-domain range of the plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub x_min_max: MinMax,
    pub y_min_max: MinMax,
}

impl Window {
    #[must_use]
    pub const fn new(x_min_max: MinMax, y_min_max: MinMax) -> Self {
        Self {
            x_min_max,
            y_min_max,
        }
    }
}

/// Space reserved around the plot area for axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left: 48.0,
            top: 10.0,
            right: 10.0,
            bottom: 32.0,
        }
    }
}

/// Stable handle of a record inside the data set it was assigned with.
///
/// Ids are positions in the record slice and are invalidated by `set_data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(usize);

impl RecordId {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::{Bounds, Point};

    #[test]
    fn touching_boxes_overlap() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(10.0, 10.0, 20.0, 20.0);
        assert!(a.overlaps(b));
        assert!(!a.overlaps(Bounds::new(10.5, 0.0, 20.0, 5.0)));
    }

    #[test]
    fn from_corners_normalizes_order() {
        let bounds = Bounds::from_corners(Point::new(5.0, 1.0), Point::new(-1.0, 3.0));
        assert_eq!(bounds, Bounds::new(-1.0, 1.0, 5.0, 3.0));
    }
}
