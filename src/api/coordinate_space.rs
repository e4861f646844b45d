use tracing::debug;

use crate::core::{
    Bounds, Margins, MinMax, Point, Scale, ScaleAxes, SurfaceSize, Window, ZoomTransform,
};
use crate::error::{PlotError, PlotResult};

use super::AxisConfig;

/// Height of the normalized index space; its width is this times the
/// aspect ratio.
pub const NORMALIZED_EXTENT: f64 = 100.0;

/// Domain scales with the zoom transform applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformedScales {
    pub x: Scale,
    pub y: Scale,
    pub y2: Option<Scale>,
}

/// Normalized-to-pixel scales, in plot-area pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedScales {
    pub x: Scale,
    pub y: Scale,
    pub y2: Option<Scale>,
}

impl NormalizedScales {
    /// Plot-area pixel of a normalized position on the primary axes.
    #[must_use]
    pub fn to_pixel(&self, point: Point) -> Point {
        Point::new(self.x.map(point.x), self.y.map(point.y))
    }

    /// Normalized position of a plot-area pixel on the primary axes.
    #[must_use]
    pub fn to_normalized(&self, pixel: Point) -> Point {
        Point::new(self.x.invert(pixel.x), self.y.invert(pixel.y))
    }
}

/// Picks a domain from explicit scale, limits, data extent, then `fallback`.
pub(crate) fn resolve_scale(
    axis: &AxisConfig,
    data_extent: Option<MinMax>,
    fallback: MinMax,
) -> PlotResult<Scale> {
    let (start, end) = axis
        .domain
        .or(axis.limits)
        .or_else(|| data_extent.map(widen_degenerate))
        .unwrap_or(fallback);
    Scale::new(axis.kind, start, end)
}

fn widen_degenerate((min, max): MinMax) -> MinMax {
    if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    }
}

/// Scales and zoom state shared by rendering and interaction.
///
/// Three coordinate systems meet here: the data domain, the normalized
/// index space (`[0, 100 * aspect] x [0, 100]`, y up) and plot-area pixels
/// (origin at the top-left corner inside the margins).
#[derive(Debug, Clone)]
pub struct CoordinateSpace {
    axes: Option<ScaleAxes>,
    margins: Margins,
    scale_extent: (f64, f64),
    x: Scale,
    y: Scale,
    y2: Option<Scale>,
    n2p_x: Scale,
    n2p_y: Scale,
    transform: ZoomTransform,
    layout: Option<SurfaceSize>,
    pending_window: Option<Window>,
}

impl CoordinateSpace {
    pub fn new(
        x: Scale,
        y: Scale,
        y2: Option<Scale>,
        axes: Option<ScaleAxes>,
        aspect_ratio: f64,
        margins: Margins,
        scale_extent: (f64, f64),
    ) -> PlotResult<Self> {
        Ok(Self {
            axes,
            margins,
            scale_extent,
            x,
            y,
            y2,
            n2p_x: Scale::linear(0.0, NORMALIZED_EXTENT * aspect_ratio)?,
            n2p_y: Scale::linear(0.0, NORMALIZED_EXTENT)?,
            transform: ZoomTransform::IDENTITY,
            layout: None,
            pending_window: None,
        })
    }

    #[must_use]
    pub fn axes(&self) -> Option<ScaleAxes> {
        self.axes
    }

    #[must_use]
    pub fn margins(&self) -> Margins {
        self.margins
    }

    #[must_use]
    pub fn transform(&self) -> ZoomTransform {
        self.transform
    }

    #[must_use]
    pub fn scale_extent(&self) -> (f64, f64) {
        self.scale_extent
    }

    /// Size the pixel ranges were last laid out for.
    #[must_use]
    pub fn layout_size(&self) -> Option<SurfaceSize> {
        self.layout
    }

    /// Untransformed domain scales.
    #[must_use]
    pub fn domain_scales(&self) -> TransformedScales {
        TransformedScales {
            x: self.x,
            y: self.y,
            y2: self.y2,
        }
    }

    /// Full data domain as a window.
    #[must_use]
    pub fn domain(&self) -> Window {
        Window::new(self.x.domain(), self.y.domain())
    }

    /// Available plot-area size for a surface.
    #[must_use]
    pub fn plot_size(&self, size: SurfaceSize) -> (f64, f64) {
        let margins = self.margins;
        (
            (f64::from(size.width) - margins.left - margins.right).max(0.0),
            (f64::from(size.height) - margins.top - margins.bottom).max(0.0),
        )
    }

    /// Plot area in surface pixels.
    #[must_use]
    pub fn plot_area(&self, size: SurfaceSize) -> Bounds {
        let (width, height) = self.plot_size(size);
        Bounds::new(
            self.margins.left,
            self.margins.top,
            self.margins.left + width,
            self.margins.top + height,
        )
    }

    fn laid_out_plot_size(&self) -> Option<(f64, f64)> {
        self.layout
            .map(|size| self.plot_size(size))
            .filter(|(width, height)| *width > 0.0 && *height > 0.0)
    }

    /// Points every pixel range at the plot area of `size`.
    pub fn layout(&mut self, size: SurfaceSize) {
        let (width, height) = self.plot_size(size);
        self.x = self.x.with_range(0.0, width);
        self.y = self.y.with_range(height, 0.0);
        self.y2 = self.y2.map(|scale| scale.with_range(height, 0.0));
        self.n2p_x = self.n2p_x.with_range(0.0, width);
        self.n2p_y = self.n2p_y.with_range(height, 0.0);
        self.layout = Some(size);

        if let Some(window) = self.pending_window.take() {
            if let Err(err) = self.set_window(window) {
                debug!(error = %err, "dropping deferred zoom window");
            }
        } else {
            self.set_transform(self.transform);
        }
    }

    /// Scales the translation by the change in available size, then lays
    /// out for `size`, so the visible window survives the resize.
    pub fn resize(&mut self, size: SurfaceSize) {
        let previous = self.laid_out_plot_size();
        let (width, height) = self.plot_size(size);
        let adapted = match (previous, self.axes) {
            (Some((old_width, old_height)), Some(_)) => {
                let current = self.transform;
                ZoomTransform::new(
                    current.k(),
                    current.x() * (width / old_width),
                    current.y() * (height / old_height),
                )
            }
            _ => self.transform,
        };
        self.transform = adapted;
        self.layout(size);
        debug!(
            width,
            height,
            k = self.transform.k(),
            "adapted zoom translation to resize"
        );
    }

    /// Stores `transform` with its scale clamped and its translation kept
    /// inside the plot area. Returns the stored transform.
    pub fn set_transform(&mut self, transform: ZoomTransform) -> ZoomTransform {
        let mut next = transform.with_scale_clamped(self.scale_extent);
        if let Some((width, height)) = self.laid_out_plot_size() {
            let extent = Bounds::new(0.0, 0.0, width, height);
            next = next.constrain(extent, extent);
        }
        self.transform = next;
        next
    }

    /// Applies a view-space scale and translation to the identity transform.
    pub fn set_initial_zoom(&mut self, scale_to: f64, translate_by: (f64, f64)) -> ZoomTransform {
        self.set_transform(
            ZoomTransform::IDENTITY
                .scale(scale_to)
                .translate(translate_by.0, translate_by.1),
        )
    }

    fn rescale_x(&self, scale: Scale) -> Scale {
        match self.axes {
            Some(axes) if axes.includes_x() => self.transform.rescale_x(scale),
            _ => scale,
        }
    }

    fn rescale_y(&self, scale: Scale) -> Scale {
        match self.axes {
            Some(axes) if axes.includes_y() => self.transform.rescale_y(scale),
            _ => scale,
        }
    }

    /// Domain scales as currently shown.
    #[must_use]
    pub fn transformed_scales(&self) -> TransformedScales {
        TransformedScales {
            x: self.rescale_x(self.x),
            y: self.rescale_y(self.y),
            y2: self.y2.map(|scale| self.rescale_y(scale)),
        }
    }

    /// Normalized-to-pixel scales as currently shown.
    #[must_use]
    pub fn transformed_normalized(&self) -> NormalizedScales {
        let y = self.rescale_y(self.n2p_y);
        NormalizedScales {
            x: self.rescale_x(self.n2p_x),
            y,
            y2: self.y2.map(|_| y),
        }
    }

    /// Copies of the domain scales mapping onto normalized space, used to
    /// position records in the spatial index.
    #[must_use]
    pub fn domain_to_normalized(&self) -> (Scale, Scale) {
        let (x0, x1) = self.n2p_x.domain();
        let (y0, y1) = self.n2p_y.domain();
        (self.x.with_range(x0, x1), self.y.with_range(y0, y1))
    }

    /// Secondary counterpart of `domain_to_normalized`.
    #[must_use]
    pub fn domain_to_normalized_y2(&self) -> Option<(Scale, Scale)> {
        let (y0, y1) = self.n2p_y.domain();
        let (to_x, _) = self.domain_to_normalized();
        self.y2.map(|scale| (to_x, scale.with_range(y0, y1)))
    }

    /// Part of normalized space currently inside the plot area.
    #[must_use]
    pub fn visible_normalized(&self) -> Bounds {
        let scales = self.transformed_normalized();
        let (width, height) = self.layout.map_or((0.0, 0.0), |size| self.plot_size(size));
        Bounds::from_corners(
            scales.to_normalized(Point::new(0.0, height)),
            scales.to_normalized(Point::new(width, 0.0)),
        )
    }

    /// Visible data-domain range.
    #[must_use]
    pub fn window(&self) -> Window {
        let scales = self.transformed_scales();
        let invert_range = |scale: Scale| {
            let (r0, r1) = scale.range();
            (scale.invert(r0), scale.invert(r1))
        };
        Window::new(invert_range(scales.x), invert_range(scales.y))
    }

    /// Transform showing `window`; axes that do not zoom are ignored.
    ///
    /// When both axes zoom, the smaller scale factor wins so the whole
    /// window stays visible.
    pub fn window_to_transform(&self, window: Window) -> PlotResult<ZoomTransform> {
        let Some(axes) = self.axes else {
            return Ok(self.transform);
        };
        let x = if axes.includes_x() {
            Some(axis_transform(self.x, window.x_min_max, self.x.range().0)?)
        } else {
            None
        };
        let y = if axes.includes_y() {
            Some(axis_transform(self.y, window.y_min_max, self.y.range().1)?)
        } else {
            None
        };
        let k = match (x, y) {
            (Some((kx, _)), Some((ky, _))) => kx.min(ky),
            (Some((k, _)), None) | (None, Some((k, _))) => k,
            (None, None) => 1.0,
        };
        let tx = x.map_or(0.0, |(_, t)| t);
        let ty = y.map_or(0.0, |(_, t)| t);
        Ok(ZoomTransform::IDENTITY.scale(k).translate(tx, ty))
    }

    /// Moves the view onto `window`. Before the first layout the window is
    /// kept and applied once pixel ranges exist.
    ///
    /// Returns whether the transform changed now.
    pub fn set_window(&mut self, window: Window) -> PlotResult<bool> {
        if self.axes.is_none() {
            return Ok(false);
        }
        if self.laid_out_plot_size().is_none() {
            self.pending_window = Some(window);
            return Ok(false);
        }
        let target = self.window_to_transform(window)?;
        let previous = self.transform;
        Ok(self.set_transform(target) != previous)
    }

    /// Click radius in normalized units per axis, shrinking as the view
    /// zooms in on that axis.
    #[must_use]
    pub fn normalized_click_radius(&self, radius_px: f64) -> (f64, f64) {
        let k = self.transform.k();
        let axes = self.axes;
        let per_axis = |scale: Scale, zooms: bool| {
            let view = if zooms { k } else { 1.0 } * scale.range_extent();
            if view > 0.0 {
                let (d0, d1) = scale.domain();
                radius_px / view * (d1 - d0).abs()
            } else {
                0.0
            }
        };
        (
            per_axis(self.n2p_x, axes.is_some_and(ScaleAxes::includes_x)),
            per_axis(self.n2p_y, axes.is_some_and(ScaleAxes::includes_y)),
        )
    }

    /// Surface pixel to plot-area pixel.
    #[must_use]
    pub fn surface_to_plot(&self, point: Point) -> Point {
        Point::new(point.x - self.margins.left, point.y - self.margins.top)
    }

    /// Surface pixel to normalized index space.
    #[must_use]
    pub fn surface_to_normalized(&self, point: Point) -> Point {
        self.transformed_normalized()
            .to_normalized(self.surface_to_plot(point))
    }
}

fn axis_transform(scale: Scale, (min, max): MinMax, origin: f64) -> PlotResult<(f64, f64)> {
    let a = scale.map(min);
    let b = scale.map(max);
    let (pmin, pmax) = (a.min(b), a.max(b));
    let span = pmax - pmin;
    let k = scale.range_extent() / span;
    if !(span > 0.0 && k.is_finite() && k > 0.0) {
        return Err(PlotError::InvalidData(format!(
            "window [{min}, {max}] does not span a visible range"
        )));
    }
    Ok((k, origin - pmin))
}
