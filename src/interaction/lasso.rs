use serde::{Deserialize, Serialize};

use crate::core::{Point, PolygonTester};
use crate::render::{Color, LineStrokeStyle, PolylinePrimitive, Surface};

/// Lasso throttling and styling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LassoConfig {
    /// Period of the commit-and-query tick while dragging.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: f64,
    /// Minimum pixel distance between committed points.
    #[serde(default = "default_min_distance_px")]
    pub min_distance_px: f64,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    #[serde(default = "default_stroke")]
    pub stroke: Color,
    #[serde(default = "default_fill")]
    pub fill: Option<Color>,
}

impl Default for LassoConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            min_distance_px: default_min_distance_px(),
            line_width: default_line_width(),
            stroke: default_stroke(),
            fill: default_fill(),
        }
    }
}

fn default_interval_ms() -> f64 {
    100.0
}

fn default_min_distance_px() -> f64 {
    3.0
}

fn default_line_width() -> f64 {
    2.0
}

fn default_stroke() -> Color {
    Color::rgb(0.4, 0.4, 0.4)
}

fn default_fill() -> Option<Color> {
    Some(Color::rgba(0.4, 0.4, 0.4, 0.1))
}

/// Freeform selection path in surface pixels.
///
/// The committed path only grows through `push_current`/`end`, which keeps
/// the polygon small on long, slow drags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lasso {
    config: LassoConfig,
    committed: Vec<Point>,
    current: Option<Point>,
}

impl Lasso {
    #[must_use]
    pub fn new(config: LassoConfig) -> Self {
        Self {
            config,
            committed: Vec::new(),
            current: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> LassoConfig {
        self.config
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.committed.is_empty()
    }

    #[must_use]
    pub fn committed(&self) -> &[Point] {
        &self.committed
    }

    #[must_use]
    pub fn current(&self) -> Option<Point> {
        self.current
    }

    pub fn start(&mut self, x: f64, y: f64) {
        let point = Point::new(x, y);
        self.committed.clear();
        self.committed.push(point);
        self.current = Some(point);
    }

    pub fn set_current(&mut self, x: f64, y: f64) {
        self.current = Some(Point::new(x, y));
    }

    /// Commits the current point when it is far enough from the last one.
    pub fn push_current(&mut self) -> bool {
        let Some(current) = self.current else {
            return false;
        };
        let far_enough = self
            .committed
            .last()
            .is_none_or(|last| last.distance(current) > self.config.min_distance_px);
        if far_enough {
            self.committed.push(current);
        }
        far_enough
    }

    /// Final commit of the gesture end point, ignoring the distance throttle.
    pub fn end(&mut self, x: f64, y: f64) {
        let point = Point::new(x, y);
        self.current = Some(point);
        if self.committed.last() != Some(&point) {
            self.committed.push(point);
        }
    }

    pub fn clear(&mut self) {
        self.committed.clear();
        self.current = None;
    }

    /// Polygon over the committed path mapped through `to_index_space`.
    ///
    /// Returns `None` below three committed points.
    pub fn tester<F>(&self, to_index_space: F) -> Option<PolygonTester>
    where
        F: Fn(Point) -> Point,
    {
        if self.committed.len() < 3 {
            return None;
        }
        PolygonTester::new(self.committed.iter().copied().map(to_index_space).collect())
    }

    /// Draws the committed path closed over the current point.
    pub fn render(&self, surface: &mut Surface) {
        let mut points = self.committed.clone();
        if let Some(current) = self.current.filter(|current| points.last() != Some(current)) {
            points.push(current);
        }
        if points.len() < 2 {
            return;
        }
        surface.push(
            PolylinePrimitive::new(points, self.config.line_width, self.config.stroke)
                .closed(self.config.fill)
                .with_stroke_style(LineStrokeStyle::Dashed {
                    dash: 4.0,
                    gap: 4.0,
                }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{Lasso, LassoConfig};
    use crate::core::{Point, Tester};
    use crate::render::Surface;

    #[test]
    fn push_current_coalesces_nearby_points() {
        let mut lasso = Lasso::new(LassoConfig::default());
        lasso.start(10.0, 10.0);
        lasso.set_current(11.0, 11.0);
        assert!(!lasso.push_current());
        lasso.set_current(20.0, 10.0);
        assert!(lasso.push_current());
        assert_eq!(lasso.committed().len(), 2);
    }

    #[test]
    fn tester_requires_three_points() {
        let mut lasso = Lasso::new(LassoConfig::default());
        lasso.start(0.0, 0.0);
        lasso.set_current(50.0, 0.0);
        lasso.push_current();
        assert!(lasso.tester(|p| p).is_none());
        lasso.end(50.0, 50.0);
        let tester = lasso.tester(|p| p).expect("three points");
        assert!(tester.test(Point::new(40.0, 10.0)));
        assert!(!tester.test(Point::new(10.0, 40.0)));
    }

    #[test]
    fn render_draws_closed_path_and_clear_resets() {
        let mut lasso = Lasso::new(LassoConfig::default());
        lasso.start(0.0, 0.0);
        lasso.set_current(5.0, 5.0);
        let mut surface = Surface::new();
        lasso.render(&mut surface);
        assert_eq!(surface.len(), 1);
        lasso.clear();
        assert!(!lasso.is_active());
        surface.clear();
        lasso.render(&mut surface);
        assert!(surface.is_empty());
    }
}
