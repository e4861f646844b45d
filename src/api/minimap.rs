use tracing::debug;

use crate::core::{Bounds, Point, Scale, ScaleAxes, SurfaceSize, Window};
use crate::error::{PlotError, PlotResult};
use crate::render::{Color, RectPrimitive, Renderer, Surface};

use super::Scatterplot;

const BRUSH_FILL: Color = Color::rgba(0.47, 0.47, 0.47, 0.3);
const BRUSH_BORDER: Color = Color::WHITE;

/// Overview of the full data domain with a brush marking the visible window.
///
/// Both scales map the domain onto `[0, size]` without flipping y, so the
/// brush rectangle lives in the minimap's own pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct MiniMap {
    axes: ScaleAxes,
    size: SurfaceSize,
    x: Scale,
    y: Scale,
    brush: Bounds,
}

impl MiniMap {
    pub fn new(domain: Window, size: SurfaceSize, axes: ScaleAxes) -> PlotResult<Self> {
        if !size.is_valid() {
            return Err(PlotError::InvalidSurface {
                width: size.width,
                height: size.height,
            });
        }
        let (width, height) = (f64::from(size.width), f64::from(size.height));
        let x = Scale::linear(domain.x_min_max.0, domain.x_min_max.1)?.with_range(0.0, width);
        let y = Scale::linear(domain.y_min_max.0, domain.y_min_max.1)?.with_range(0.0, height);
        Ok(Self {
            axes,
            size,
            x,
            y,
            brush: Bounds::new(0.0, 0.0, width, height),
        })
    }

    #[must_use]
    pub fn brush(&self) -> Bounds {
        self.brush
    }

    #[must_use]
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Moves the brush onto `window`; axes that do not zoom keep the full
    /// extent.
    pub fn update(&mut self, window: Window) {
        let (width, height) = (f64::from(self.size.width), f64::from(self.size.height));
        let (x0, x1) = if self.axes.includes_x() {
            (self.x.map(window.x_min_max.0), self.x.map(window.x_min_max.1))
        } else {
            (0.0, width)
        };
        let (y0, y1) = if self.axes.includes_y() {
            (self.y.map(window.y_min_max.0), self.y.map(window.y_min_max.1))
        } else {
            (0.0, height)
        };
        self.brush = Bounds::from_corners(Point::new(x0, y0), Point::new(x1, y1));
    }

    /// Window selected by a brush drawn by the user.
    #[must_use]
    pub fn brushed(&mut self, selection: Bounds) -> Window {
        self.brush = selection;
        let invert = |scale: Scale, a: f64, b: f64| {
            let (u, v) = (scale.invert(a), scale.invert(b));
            (u.min(v), u.max(v))
        };
        let window = Window::new(
            if self.axes.includes_x() {
                invert(self.x, selection.x0, selection.x1)
            } else {
                self.x.domain()
            },
            if self.axes.includes_y() {
                invert(self.y, selection.y0, selection.y1)
            } else {
                self.y.domain()
            },
        );
        debug!(?window, "minimap brushed");
        window
    }

    /// Keeps the brush proportional when the minimap is resized.
    pub fn resize(&mut self, size: SurfaceSize) -> PlotResult<()> {
        if !size.is_valid() {
            return Err(PlotError::InvalidSurface {
                width: size.width,
                height: size.height,
            });
        }
        let window = Window::new(
            (self.x.invert(self.brush.x0), self.x.invert(self.brush.x1)),
            (self.y.invert(self.brush.y0), self.y.invert(self.brush.y1)),
        );
        self.size = size;
        self.x = self.x.with_range(0.0, f64::from(size.width));
        self.y = self.y.with_range(0.0, f64::from(size.height));
        self.update(window);
        Ok(())
    }

    pub fn render(&self, surface: &mut Surface) {
        let brush = self.brush;
        surface.push(RectPrimitive {
            border_color: BRUSH_BORDER,
            border_width: 1.0,
            ..RectPrimitive::filled(brush.x0, brush.y0, brush.width(), brush.height(), BRUSH_FILL)
        });
    }
}

impl<T, R: Renderer, U> Scatterplot<T, R, U> {
    /// Minimap over this plot's domain, with the brush on the current window.
    ///
    /// Keep it in sync by forwarding `WindowChanged` events to `update`.
    pub fn minimap(&self, size: SurfaceSize) -> PlotResult<MiniMap> {
        let axes = self.space.axes().unwrap_or(ScaleAxes::XY);
        let mut minimap = MiniMap::new(self.domain(), size, axes)?;
        minimap.update(self.window());
        Ok(minimap)
    }
}

#[cfg(test)]
mod tests {
    use super::MiniMap;
    use crate::core::{Bounds, ScaleAxes, SurfaceSize, Window};
    use approx::assert_relative_eq;

    fn minimap(axes: ScaleAxes) -> MiniMap {
        MiniMap::new(
            Window::new((0.0, 100.0), (0.0, 50.0)),
            SurfaceSize::new(200, 100),
            axes,
        )
        .expect("minimap")
    }

    #[test]
    fn update_tracks_the_window() {
        let mut map = minimap(ScaleAxes::XY);
        map.update(Window::new((25.0, 75.0), (10.0, 20.0)));
        assert_eq!(map.brush(), Bounds::new(50.0, 20.0, 150.0, 40.0));
    }

    #[test]
    fn non_zooming_axis_keeps_full_extent() {
        let mut map = minimap(ScaleAxes::X);
        map.update(Window::new((25.0, 75.0), (10.0, 20.0)));
        assert_eq!(map.brush(), Bounds::new(50.0, 0.0, 150.0, 100.0));
        let window = map.brushed(Bounds::new(0.0, 30.0, 100.0, 60.0));
        assert_eq!(window.x_min_max, (0.0, 50.0));
        assert_eq!(window.y_min_max, (0.0, 50.0));
    }

    #[test]
    fn brushed_inverts_the_selection() {
        let mut map = minimap(ScaleAxes::XY);
        let window = map.brushed(Bounds::new(20.0, 10.0, 60.0, 30.0));
        assert_relative_eq!(window.x_min_max.0, 10.0);
        assert_relative_eq!(window.x_min_max.1, 30.0);
        assert_relative_eq!(window.y_min_max.0, 5.0);
        assert_relative_eq!(window.y_min_max.1, 15.0);
    }

    #[test]
    fn resize_keeps_brush_proportions() {
        let mut map = minimap(ScaleAxes::XY);
        map.update(Window::new((25.0, 75.0), (10.0, 20.0)));
        map.resize(SurfaceSize::new(400, 200)).expect("resize");
        assert_eq!(map.brush(), Bounds::new(100.0, 40.0, 300.0, 80.0));
    }
}
