use serde::{Deserialize, Serialize};

use crate::core::{Margins, MinMax, ScaleAxes, ScaleKind, SurfaceSize, Window};
use crate::error::{PlotError, PlotResult};
use crate::interaction::LassoConfig;

/// Lower and optional upper bound of the zoom factor.
///
/// A missing upper bound means zooming in is unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomScaleExtent {
    pub min: f64,
    #[serde(default)]
    pub max: Option<f64>,
}

impl Default for ZoomScaleExtent {
    fn default() -> Self {
        Self { min: 1.0, max: None }
    }
}

impl ZoomScaleExtent {
    #[must_use]
    pub const fn new(min: f64, max: Option<f64>) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn bounds(self) -> (f64, f64) {
        (self.min, self.max.unwrap_or(f64::INFINITY))
    }
}

/// Per-axis scale, label and tick settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisConfig {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub kind: ScaleKind,
    /// Explicit scale domain; wins over `limits` and the data extent.
    #[serde(default)]
    pub domain: Option<MinMax>,
    #[serde(default)]
    pub limits: Option<MinMax>,
    #[serde(default)]
    pub tick_values: Option<Vec<f64>>,
    #[serde(default = "default_tick_count")]
    pub tick_count: usize,
    /// Fixed number of decimals for tick labels.
    #[serde(default)]
    pub precision: Option<usize>,
}

impl AxisConfig {
    #[must_use]
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            tick_count: default_tick_count(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: ScaleKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_domain(mut self, start: f64, end: f64) -> Self {
        self.domain = Some((start, end));
        self
    }

    #[must_use]
    pub fn with_limits(mut self, min: f64, max: f64) -> Self {
        self.limits = Some((min, max));
        self
    }

    #[must_use]
    pub fn with_tick_values(mut self, values: Vec<f64>) -> Self {
        self.tick_values = Some(values);
        self
    }

    #[must_use]
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Label shown next to the axis, `fallback` when unset.
    #[must_use]
    pub fn label_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.label.as_deref().unwrap_or(fallback)
    }

    fn validate(&self, axis: &str) -> PlotResult<()> {
        for (name, range) in [("domain", self.domain), ("limits", self.limits)] {
            if let Some((start, end)) = range {
                if !start.is_finite() || !end.is_finite() || start == end {
                    return Err(PlotError::InvalidConfig(format!(
                        "{axis} axis {name} must be finite and non-empty"
                    )));
                }
            }
        }
        if self.tick_count == 0 {
            return Err(PlotError::InvalidConfig(format!(
                "{axis} axis tick count must be > 0"
            )));
        }
        if self
            .tick_values
            .as_ref()
            .is_some_and(|values| values.iter().any(|value| !value.is_finite()))
        {
            return Err(PlotError::InvalidConfig(format!(
                "{axis} axis tick values must be finite"
            )));
        }
        Ok(())
    }
}

/// Public plot bootstrap configuration.
///
/// Serializable so hosts can persist plot setup; callbacks (tooltips,
/// formatters, symbols) are attached on the plot itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterplotConfig {
    pub surface_size: SurfaceSize,
    #[serde(default)]
    pub margins: Margins,
    /// Extra pixels drawn outside the plot area before clipping.
    #[serde(default)]
    pub canvas_border: f64,
    #[serde(default = "default_click_radius_px")]
    pub click_radius_px: f64,
    /// Axes that pan and zoom; `None` disables zooming.
    #[serde(default = "default_scale_axes")]
    pub scale: Option<ScaleAxes>,
    #[serde(default = "default_zoom_delay_ms")]
    pub zoom_delay_ms: f64,
    #[serde(default)]
    pub zoom_scale_extent: ZoomScaleExtent,
    #[serde(default)]
    pub zoom_window: Option<Window>,
    #[serde(default = "default_zoom_scale_to")]
    pub zoom_scale_to: f64,
    #[serde(default)]
    pub zoom_translate_by: (f64, f64),
    #[serde(default = "default_tooltip_delay_ms")]
    pub tooltip_delay_ms: f64,
    #[serde(default = "default_wheel_idle_ms")]
    pub wheel_idle_ms: f64,
    /// Width to height ratio of the normalized index space.
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: f64,
    /// Nodes smaller than this on screen draw one representative point.
    #[serde(default = "default_aggregation_threshold_px")]
    pub aggregation_threshold_px: f64,
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default = "default_symbol")]
    pub secondary_symbol: String,
    #[serde(default = "default_axis_config")]
    pub x_axis: AxisConfig,
    #[serde(default = "default_axis_config")]
    pub y_axis: AxisConfig,
    #[serde(default = "default_axis_config")]
    pub y2_axis: AxisConfig,
    #[serde(default)]
    pub lasso: LassoConfig,
    /// Counts hidden and aggregated records during traversal.
    #[serde(default)]
    pub debug_stats: bool,
}

impl ScatterplotConfig {
    #[must_use]
    pub fn new(surface_size: SurfaceSize) -> Self {
        Self {
            surface_size,
            margins: Margins::default(),
            canvas_border: 0.0,
            click_radius_px: default_click_radius_px(),
            scale: default_scale_axes(),
            zoom_delay_ms: default_zoom_delay_ms(),
            zoom_scale_extent: ZoomScaleExtent::default(),
            zoom_window: None,
            zoom_scale_to: default_zoom_scale_to(),
            zoom_translate_by: (0.0, 0.0),
            tooltip_delay_ms: default_tooltip_delay_ms(),
            wheel_idle_ms: default_wheel_idle_ms(),
            aspect_ratio: default_aspect_ratio(),
            aggregation_threshold_px: default_aggregation_threshold_px(),
            symbol: default_symbol(),
            secondary_symbol: default_symbol(),
            x_axis: default_axis_config(),
            y_axis: default_axis_config(),
            y2_axis: default_axis_config(),
            lasso: LassoConfig::default(),
            debug_stats: false,
        }
    }

    #[must_use]
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    #[must_use]
    pub fn with_canvas_border(mut self, border: f64) -> Self {
        self.canvas_border = border;
        self
    }

    #[must_use]
    pub fn with_click_radius_px(mut self, radius: f64) -> Self {
        self.click_radius_px = radius;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: Option<ScaleAxes>) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn with_zoom_delay_ms(mut self, delay: f64) -> Self {
        self.zoom_delay_ms = delay;
        self
    }

    #[must_use]
    pub fn with_zoom_scale_extent(mut self, min: f64, max: Option<f64>) -> Self {
        self.zoom_scale_extent = ZoomScaleExtent::new(min, max);
        self
    }

    /// Initial visible window; wins over `zoom_scale_to`/`zoom_translate_by`.
    #[must_use]
    pub fn with_zoom_window(mut self, window: Window) -> Self {
        self.zoom_window = Some(window);
        self
    }

    #[must_use]
    pub fn with_initial_zoom(mut self, scale_to: f64, translate_by: (f64, f64)) -> Self {
        self.zoom_scale_to = scale_to;
        self.zoom_translate_by = translate_by;
        self
    }

    #[must_use]
    pub fn with_tooltip_delay_ms(mut self, delay: f64) -> Self {
        self.tooltip_delay_ms = delay;
        self
    }

    #[must_use]
    pub fn with_aspect_ratio(mut self, aspect_ratio: f64) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    #[must_use]
    pub fn with_aggregation_threshold_px(mut self, threshold: f64) -> Self {
        self.aggregation_threshold_px = threshold;
        self
    }

    #[must_use]
    pub fn with_symbol(mut self, code: impl Into<String>) -> Self {
        self.symbol = code.into();
        self
    }

    #[must_use]
    pub fn with_secondary_symbol(mut self, code: impl Into<String>) -> Self {
        self.secondary_symbol = code.into();
        self
    }

    #[must_use]
    pub fn with_x_axis(mut self, axis: AxisConfig) -> Self {
        self.x_axis = axis;
        self
    }

    #[must_use]
    pub fn with_y_axis(mut self, axis: AxisConfig) -> Self {
        self.y_axis = axis;
        self
    }

    #[must_use]
    pub fn with_y2_axis(mut self, axis: AxisConfig) -> Self {
        self.y2_axis = axis;
        self
    }

    #[must_use]
    pub fn with_lasso(mut self, lasso: LassoConfig) -> Self {
        self.lasso = lasso;
        self
    }

    #[must_use]
    pub fn with_debug_stats(mut self, enabled: bool) -> Self {
        self.debug_stats = enabled;
        self
    }

    /// Rejects settings the plot cannot operate with.
    ///
    /// A zero surface size is accepted; rendering is deferred until the host
    /// reports a usable size.
    pub fn validate(&self) -> PlotResult<()> {
        let margins = self.margins;
        if [margins.left, margins.top, margins.right, margins.bottom]
            .iter()
            .any(|value| !value.is_finite() || *value < 0.0)
        {
            return Err(PlotError::InvalidConfig(
                "margins must be finite and >= 0".to_owned(),
            ));
        }
        require_non_negative("canvas border", self.canvas_border)?;
        require_positive("click radius", self.click_radius_px)?;
        require_non_negative("zoom delay", self.zoom_delay_ms)?;
        require_non_negative("tooltip delay", self.tooltip_delay_ms)?;
        require_positive("wheel idle delay", self.wheel_idle_ms)?;
        require_positive("aspect ratio", self.aspect_ratio)?;
        require_non_negative("aggregation threshold", self.aggregation_threshold_px)?;
        require_positive("initial zoom", self.zoom_scale_to)?;

        let ZoomScaleExtent { min, max } = self.zoom_scale_extent;
        require_positive("minimum zoom", min)?;
        if let Some(max) = max {
            if !max.is_finite() || max < min {
                return Err(PlotError::InvalidConfig(
                    "maximum zoom must be finite and >= minimum zoom".to_owned(),
                ));
            }
        }
        let (tx, ty) = self.zoom_translate_by;
        if !tx.is_finite() || !ty.is_finite() {
            return Err(PlotError::InvalidConfig(
                "initial translation must be finite".to_owned(),
            ));
        }
        if let Some(window) = self.zoom_window {
            let values = [
                window.x_min_max.0,
                window.x_min_max.1,
                window.y_min_max.0,
                window.y_min_max.1,
            ];
            if values.iter().any(|value| !value.is_finite()) {
                return Err(PlotError::InvalidConfig(
                    "zoom window must be finite".to_owned(),
                ));
            }
        }

        require_positive("lasso interval", self.lasso.interval_ms)?;
        require_non_negative("lasso min distance", self.lasso.min_distance_px)?;
        self.lasso.stroke.validate()?;

        self.x_axis.validate("x")?;
        self.y_axis.validate("y")?;
        self.y2_axis.validate("y2")
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> PlotResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(input: &str) -> PlotResult<Self> {
        Ok(serde_json::from_str(input)?)
    }
}

fn require_positive(name: &str, value: f64) -> PlotResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PlotError::InvalidConfig(format!(
            "{name} must be finite and > 0"
        )))
    }
}

fn require_non_negative(name: &str, value: f64) -> PlotResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PlotError::InvalidConfig(format!(
            "{name} must be finite and >= 0"
        )))
    }
}

fn default_click_radius_px() -> f64 {
    10.0
}

fn default_scale_axes() -> Option<ScaleAxes> {
    Some(ScaleAxes::XY)
}

fn default_zoom_delay_ms() -> f64 {
    300.0
}

fn default_zoom_scale_to() -> f64 {
    1.0
}

fn default_tooltip_delay_ms() -> f64 {
    500.0
}

fn default_wheel_idle_ms() -> f64 {
    150.0
}

fn default_aspect_ratio() -> f64 {
    1.0
}

fn default_aggregation_threshold_px() -> f64 {
    5.0
}

fn default_symbol() -> String {
    "o".to_owned()
}

fn default_tick_count() -> usize {
    crate::core::DEFAULT_TICK_COUNT
}

fn default_axis_config() -> AxisConfig {
    AxisConfig {
        tick_count: default_tick_count(),
        ..AxisConfig::default()
    }
}
