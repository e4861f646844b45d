use serde::{Deserialize, Serialize};

use crate::core::Point;
use crate::error::{PlotError, PlotResult};

/// Straight-alpha RGBA color, channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const STEEL_BLUE: Self = Self::rgb(70.0 / 255.0, 130.0 / 255.0, 180.0 / 255.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const ORANGE: Self = Self::rgb(1.0, 165.0 / 255.0, 0.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    #[must_use]
    pub const fn with_alpha(self, alpha: f64) -> Self {
        Self::rgba(self.red, self.green, self.blue, alpha)
    }

    pub fn validate(self) -> PlotResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(PlotError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

fn ensure_finite(values: &[f64], what: &str) -> PlotResult<()> {
    if values.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(PlotError::InvalidData(format!("{what} must be finite")))
    }
}

fn ensure_positive(value: f64, what: &str) -> PlotResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PlotError::InvalidData(format!("{what} must be finite and > 0")))
    }
}

/// Dash pattern of stroked geometry.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum LineStrokeStyle {
    #[default]
    Solid,
    Dashed {
        dash: f64,
        gap: f64,
    },
}

/// Segment between two surface pixels (axis lines, ticks, grid).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
    pub stroke_style: LineStrokeStyle,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
            color,
            stroke_style: LineStrokeStyle::Solid,
        }
    }

    #[must_use]
    pub const fn with_stroke_style(mut self, stroke_style: LineStrokeStyle) -> Self {
        self.stroke_style = stroke_style;
        self
    }

    pub fn validate(self) -> PlotResult<()> {
        ensure_finite(&[self.x1, self.y1, self.x2, self.y2], "line coordinates")?;
        ensure_positive(self.stroke_width, "line stroke width")?;
        self.color.validate()
    }
}

/// Outline of a single point mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkShape {
    Circle,
    Square,
    Diamond,
}

/// Draw command for one point mark centred on `(x, y)`.
///
/// `radius` is the half extent of the mark in pixels for every shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkPrimitive {
    pub x: f64,
    pub y: f64,
    pub shape: MarkShape,
    pub radius: f64,
    pub fill: Color,
}

impl MarkPrimitive {
    #[must_use]
    pub const fn new(x: f64, y: f64, shape: MarkShape, radius: f64, fill: Color) -> Self {
        Self {
            x,
            y,
            shape,
            radius,
            fill,
        }
    }

    pub fn validate(self) -> PlotResult<()> {
        ensure_finite(&[self.x, self.y], "mark position")?;
        ensure_positive(self.radius, "mark radius")?;
        self.fill.validate()
    }
}

/// Open or closed path through pixel-space points (lasso, line symbol).
#[derive(Debug, Clone, PartialEq)]
pub struct PolylinePrimitive {
    pub points: Vec<Point>,
    pub closed: bool,
    pub stroke_width: f64,
    pub stroke: Color,
    pub fill: Option<Color>,
    pub stroke_style: LineStrokeStyle,
}

impl PolylinePrimitive {
    #[must_use]
    pub fn new(points: Vec<Point>, stroke_width: f64, stroke: Color) -> Self {
        Self {
            points,
            closed: false,
            stroke_width,
            stroke,
            fill: None,
            stroke_style: LineStrokeStyle::Solid,
        }
    }

    #[must_use]
    pub fn closed(mut self, fill: Option<Color>) -> Self {
        self.closed = true;
        self.fill = fill;
        self
    }

    #[must_use]
    pub fn with_stroke_style(mut self, stroke_style: LineStrokeStyle) -> Self {
        self.stroke_style = stroke_style;
        self
    }

    pub fn validate(&self) -> PlotResult<()> {
        if self.points.len() < 2 {
            return Err(PlotError::InvalidData(
                "polyline needs at least two points".to_owned(),
            ));
        }
        if !self.points.iter().all(|point| point.is_finite()) {
            return Err(PlotError::InvalidData(
                "polyline points must be finite".to_owned(),
            ));
        }
        ensure_positive(self.stroke_width, "polyline stroke width")?;
        self.stroke.validate()?;
        self.fill.map_or(Ok(()), Color::validate)
    }
}

/// Draw command for an axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Option<Color>,
    pub border_color: Color,
    pub border_width: f64,
}

impl RectPrimitive {
    #[must_use]
    pub const fn filled(x: f64, y: f64, width: f64, height: f64, fill: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill: Some(fill),
            border_color: fill,
            border_width: 0.0,
        }
    }

    #[must_use]
    pub const fn outlined(
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        border_color: Color,
        border_width: f64,
    ) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill: None,
            border_color,
            border_width,
        }
    }

    pub fn validate(self) -> PlotResult<()> {
        ensure_finite(&[self.x, self.y, self.width, self.height], "rect geometry")?;
        if self.width < 0.0 || self.height < 0.0 {
            return Err(PlotError::InvalidData(
                "rect size must be >= 0".to_owned(),
            ));
        }
        if !self.border_width.is_finite() || self.border_width < 0.0 {
            return Err(PlotError::InvalidData(
                "rect border width must be finite and >= 0".to_owned(),
            ));
        }
        self.border_color.validate()?;
        self.fill.map_or(Ok(()), Color::validate)
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Single-line label anchored at its baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
    /// Clockwise rotation around `(x, y)` in radians.
    pub rotation: f64,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            color,
            h_align,
            rotation: 0.0,
        }
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn validate(&self) -> PlotResult<()> {
        if self.text.is_empty() {
            return Err(PlotError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        ensure_finite(&[self.x, self.y, self.rotation], "text placement")?;
        ensure_positive(self.font_size_px, "font size")?;
        self.color.validate()
    }
}

/// Any retained draw command.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Mark(MarkPrimitive),
    Line(LinePrimitive),
    Polyline(PolylinePrimitive),
    Rect(RectPrimitive),
    Text(TextPrimitive),
}

impl Primitive {
    pub fn validate(&self) -> PlotResult<()> {
        match self {
            Self::Mark(mark) => mark.validate(),
            Self::Line(line) => line.validate(),
            Self::Polyline(polyline) => polyline.validate(),
            Self::Rect(rect) => rect.validate(),
            Self::Text(text) => text.validate(),
        }
    }

    /// Same primitive moved by `(dx, dy)` pixels.
    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        match self {
            Self::Mark(mark) => Self::Mark(MarkPrimitive {
                x: mark.x + dx,
                y: mark.y + dy,
                ..*mark
            }),
            Self::Line(line) => Self::Line(LinePrimitive {
                x1: line.x1 + dx,
                y1: line.y1 + dy,
                x2: line.x2 + dx,
                y2: line.y2 + dy,
                ..*line
            }),
            Self::Polyline(polyline) => Self::Polyline(PolylinePrimitive {
                points: polyline
                    .points
                    .iter()
                    .map(|point| Point::new(point.x + dx, point.y + dy))
                    .collect(),
                ..polyline.clone()
            }),
            Self::Rect(rect) => Self::Rect(RectPrimitive {
                x: rect.x + dx,
                y: rect.y + dy,
                ..*rect
            }),
            Self::Text(text) => Self::Text(TextPrimitive {
                x: text.x + dx,
                y: text.y + dy,
                ..text.clone()
            }),
        }
    }
}

impl From<MarkPrimitive> for Primitive {
    fn from(value: MarkPrimitive) -> Self {
        Self::Mark(value)
    }
}

impl From<LinePrimitive> for Primitive {
    fn from(value: LinePrimitive) -> Self {
        Self::Line(value)
    }
}

impl From<PolylinePrimitive> for Primitive {
    fn from(value: PolylinePrimitive) -> Self {
        Self::Polyline(value)
    }
}

impl From<RectPrimitive> for Primitive {
    fn from(value: RectPrimitive) -> Self {
        Self::Rect(value)
    }
}

impl From<TextPrimitive> for Primitive {
    fn from(value: TextPrimitive) -> Self {
        Self::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, LinePrimitive, MarkPrimitive, MarkShape, PolylinePrimitive, Primitive};
    use crate::core::Point;

    #[test]
    fn color_rejects_out_of_range_channels() {
        assert!(Color::rgba(1.2, 0.0, 0.0, 1.0).validate().is_err());
        assert!(Color::STEEL_BLUE.validate().is_ok());
    }

    #[test]
    fn translated_moves_every_vertex() {
        let polyline = PolylinePrimitive::new(
            vec![Point::new(0.0, 0.0), Point::new(10.0, 5.0)],
            1.0,
            Color::BLACK,
        );
        let Primitive::Polyline(moved) = Primitive::from(polyline).translated(3.0, -2.0) else {
            panic!("expected polyline");
        };
        assert_eq!(moved.points, vec![Point::new(3.0, -2.0), Point::new(13.0, 3.0)]);
    }

    #[test]
    fn degenerate_geometry_is_rejected() {
        let mark = MarkPrimitive::new(f64::NAN, 0.0, MarkShape::Circle, 2.0, Color::RED);
        assert!(mark.validate().is_err());
        let line = LinePrimitive::new(0.0, 0.0, 1.0, 1.0, 0.0, Color::BLACK);
        assert!(line.validate().is_err());
        let single = PolylinePrimitive::new(vec![Point::new(0.0, 0.0)], 1.0, Color::BLACK);
        assert!(single.validate().is_err());
    }
}
