use crate::core::types::{Bounds, Point};

/// Region predicate used by spatial queries.
///
/// `test` decides membership of a single point; `test_area` is a conservative
/// box check used to prune whole subtrees (it may report overlap for boxes that
/// hold no matching point, never the reverse).
pub trait Tester {
    fn test(&self, point: Point) -> bool;
    fn test_area(&self, bounds: Bounds) -> bool;
}

impl<T: Tester + ?Sized> Tester for &T {
    fn test(&self, point: Point) -> bool {
        (**self).test(point)
    }

    fn test_area(&self, bounds: Bounds) -> bool {
        (**self).test_area(bounds)
    }
}

/// Axis-aligned ellipse, typically a click radius converted per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseTester {
    center: Point,
    radius_x: f64,
    radius_y: f64,
    area: Bounds,
}

impl EllipseTester {
    #[must_use]
    pub fn new(center: Point, radius_x: f64, radius_y: f64) -> Self {
        debug_assert!(
            radius_x >= 0.0 && radius_y >= 0.0,
            "ellipse radii must be non-negative"
        );
        Self {
            center,
            radius_x,
            radius_y,
            area: Bounds::new(
                center.x - radius_x,
                center.y - radius_y,
                center.x + radius_x,
                center.y + radius_y,
            ),
        }
    }
}

/// `d² / r²`, treating a zero radius as "only exact coincidence matches".
fn axis_term(delta: f64, radius: f64) -> f64 {
    if radius == 0.0 {
        if delta == 0.0 { 0.0 } else { f64::INFINITY }
    } else {
        (delta * delta) / (radius * radius)
    }
}

impl Tester for EllipseTester {
    fn test(&self, point: Point) -> bool {
        axis_term(point.x - self.center.x, self.radius_x)
            + axis_term(point.y - self.center.y, self.radius_y)
            <= 1.0
    }

    fn test_area(&self, bounds: Bounds) -> bool {
        self.area.overlaps(bounds)
    }
}

/// Closed polygon tester, e.g. a lasso converted into normalized space.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonTester {
    vertices: Vec<Point>,
    area: Bounds,
}

impl PolygonTester {
    /// Returns `None` for fewer than three vertices.
    #[must_use]
    pub fn new(vertices: Vec<Point>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let first = vertices[0];
        let area = vertices.iter().fold(
            Bounds::new(first.x, first.y, first.x, first.y),
            |acc, p| Bounds::new(acc.x0.min(p.x), acc.y0.min(p.y), acc.x1.max(p.x), acc.y1.max(p.y)),
        );
        Some(Self { vertices, area })
    }

    #[must_use]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }
}

impl Tester for PolygonTester {
    fn test(&self, point: Point) -> bool {
        point_in_polygon(point, &self.vertices)
    }

    fn test_area(&self, bounds: Bounds) -> bool {
        self.area.overlaps(bounds)
    }
}

/// Tester assembled from two caller supplied closures.
pub struct FnTester<F, G> {
    test: F,
    area: G,
}

impl<F, G> FnTester<F, G>
where
    F: Fn(Point) -> bool,
    G: Fn(Bounds) -> bool,
{
    pub fn new(test: F, area: G) -> Self {
        Self { test, area }
    }
}

impl<F, G> std::fmt::Debug for FnTester<F, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTester").finish_non_exhaustive()
    }
}

impl<F, G> Tester for FnTester<F, G>
where
    F: Fn(Point) -> bool,
    G: Fn(Bounds) -> bool,
{
    fn test(&self, point: Point) -> bool {
        (self.test)(point)
    }

    fn test_area(&self, bounds: Bounds) -> bool {
        (self.area)(bounds)
    }
}

/// Point-in-polygon using ray casting.
#[must_use]
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    let mut inside = false;
    let n = polygon.len();

    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];

        if ((a.y > point.y) != (b.y > point.y))
            && (point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x)
        {
            inside = !inside;
        }
    }

    inside
}

#[cfg(test)]
mod tests {
    use super::{EllipseTester, PolygonTester, Tester, point_in_polygon};
    use crate::core::types::{Bounds, Point};

    #[test]
    fn zero_radius_ellipse_matches_only_its_center() {
        let tester = EllipseTester::new(Point::new(3.0, 4.0), 0.0, 0.0);
        assert!(tester.test(Point::new(3.0, 4.0)));
        assert!(!tester.test(Point::new(3.0, 4.000_001)));
    }

    #[test]
    fn ellipse_uses_independent_radii() {
        let tester = EllipseTester::new(Point::new(0.0, 0.0), 2.0, 1.0);
        assert!(tester.test(Point::new(1.9, 0.0)));
        assert!(!tester.test(Point::new(0.0, 1.1)));
        assert!(tester.test_area(Bounds::new(1.5, 0.5, 3.0, 3.0)));
        assert!(!tester.test_area(Bounds::new(2.5, 0.0, 3.0, 3.0)));
    }

    #[test]
    fn polygon_needs_three_vertices() {
        assert!(PolygonTester::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]).is_none());
    }

    #[test]
    fn concave_polygon_excludes_notch() {
        let polygon = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(5.0, 5.0),
            Point::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(Point::new(5.0, 2.0), &polygon));
        assert!(!point_in_polygon(Point::new(5.0, 8.0), &polygon));
    }
}
