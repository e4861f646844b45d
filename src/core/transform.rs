use serde::{Deserialize, Serialize};

use crate::core::scale::Scale;
use crate::core::types::{Bounds, Point};

/// Axes that participate in zooming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleAxes {
    X,
    Y,
    XY,
}

impl ScaleAxes {
    #[must_use]
    pub const fn includes_x(self) -> bool {
        matches!(self, Self::X | Self::XY)
    }

    #[must_use]
    pub const fn includes_y(self) -> bool {
        matches!(self, Self::Y | Self::XY)
    }

    #[must_use]
    pub const fn includes(self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.includes_x(),
            Axis::Y => self.includes_y(),
        }
    }
}

/// A single plot axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

/// Scale + translate describing the current zoom/pan state.
///
/// Values are immutable; every update produces a new transform so callers can
/// diff the previous and the next state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomTransform {
    k: f64,
    x: f64,
    y: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    pub const IDENTITY: Self = Self {
        k: 1.0,
        x: 0.0,
        y: 0.0,
    };

    #[must_use]
    pub fn new(k: f64, x: f64, y: f64) -> Self {
        debug_assert!(k.is_finite() && k > 0.0, "zoom factor must be finite and > 0");
        Self { k, x, y }
    }

    #[must_use]
    pub const fn k(self) -> f64 {
        self.k
    }

    #[must_use]
    pub const fn x(self) -> f64 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> f64 {
        self.y
    }

    /// Multiplies the scale factor, keeping the translation.
    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.k * factor, self.x, self.y)
    }

    /// Translates by an amount expressed in untransformed units.
    #[must_use]
    pub fn translate(self, tx: f64, ty: f64) -> Self {
        Self::new(self.k, self.x + self.k * tx, self.y + self.k * ty)
    }

    /// Translates by an amount expressed in pixels.
    #[must_use]
    pub fn translate_pixels(self, dx: f64, dy: f64) -> Self {
        Self::new(self.k, self.x + dx, self.y + dy)
    }

    #[must_use]
    pub fn apply(self, point: Point) -> Point {
        Point::new(point.x * self.k + self.x, point.y * self.k + self.y)
    }

    #[must_use]
    pub fn invert(self, point: Point) -> Point {
        Point::new(self.invert_x(point.x), self.invert_y(point.y))
    }

    #[must_use]
    pub fn invert_x(self, x: f64) -> f64 {
        (x - self.x) / self.k
    }

    #[must_use]
    pub fn invert_y(self, y: f64) -> f64 {
        (y - self.y) / self.k
    }

    /// Returns a copy of `scale` whose domain is what the transformed view shows.
    #[must_use]
    pub fn rescale_x(self, scale: Scale) -> Scale {
        let (r0, r1) = scale.range();
        scale.with_domain_unchecked(
            scale.invert(self.invert_x(r0)),
            scale.invert(self.invert_x(r1)),
        )
    }

    #[must_use]
    pub fn rescale_y(self, scale: Scale) -> Scale {
        let (r0, r1) = scale.range();
        scale.with_domain_unchecked(
            scale.invert(self.invert_y(r0)),
            scale.invert(self.invert_y(r1)),
        )
    }

    /// Zooms to `k * factor` (clamped) while keeping `anchor` fixed on screen.
    #[must_use]
    pub fn scale_about(self, factor: f64, anchor: Point, scale_extent: (f64, f64)) -> Self {
        let k = clamp_scale(self.k * factor, scale_extent);
        let fixed = self.invert(anchor);
        Self::new(k, anchor.x - fixed.x * k, anchor.y - fixed.y * k)
    }

    /// Keeps the viewport `extent` inside `translate_extent` once transformed,
    /// centring the content when it is smaller than the viewport.
    #[must_use]
    pub fn constrain(self, extent: Bounds, translate_extent: Bounds) -> Self {
        let dx0 = self.invert_x(extent.x0) - translate_extent.x0;
        let dx1 = self.invert_x(extent.x1) - translate_extent.x1;
        let dy0 = self.invert_y(extent.y0) - translate_extent.y0;
        let dy1 = self.invert_y(extent.y1) - translate_extent.y1;
        self.translate(constrain_offset(dx0, dx1), constrain_offset(dy0, dy1))
    }

    #[must_use]
    pub fn with_scale_clamped(self, scale_extent: (f64, f64)) -> Self {
        Self::new(clamp_scale(self.k, scale_extent), self.x, self.y)
    }
}

fn constrain_offset(d0: f64, d1: f64) -> f64 {
    if d1 > d0 {
        (d0 + d1) / 2.0
    } else {
        let low = d0.min(0.0);
        if low != 0.0 { low } else { d1.max(0.0) }
    }
}

fn clamp_scale(k: f64, (min, max): (f64, f64)) -> f64 {
    k.max(min).min(max)
}

/// Incremental change between two transforms, per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformDelta {
    pub x: f64,
    pub y: f64,
    pub kx: f64,
    pub ky: f64,
}

impl TransformDelta {
    pub const NONE: Self = Self {
        x: 0.0,
        y: 0.0,
        kx: 1.0,
        ky: 1.0,
    };

    /// Delta from `old` to `new` restricted to the zoomable axes.
    #[must_use]
    pub fn between(old: ZoomTransform, new: ZoomTransform, axes: ScaleAxes) -> Self {
        let ratio = new.k / old.k;
        Self {
            x: if axes.includes_x() { new.x - old.x } else { 0.0 },
            y: if axes.includes_y() { new.y - old.y } else { 0.0 },
            kx: if axes.includes_x() { ratio } else { 1.0 },
            ky: if axes.includes_y() { ratio } else { 1.0 },
        }
    }
}

impl Default for TransformDelta {
    fn default() -> Self {
        Self::NONE
    }
}

/// Classification of a transform update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformChange {
    pub translated: bool,
    pub scaled: bool,
}

impl TransformChange {
    /// Translation only counts on axes that participate in zooming.
    #[must_use]
    pub fn classify(old: ZoomTransform, new: ZoomTransform, axes: ScaleAxes) -> Self {
        let translated = (axes != ScaleAxes::Y && old.x != new.x)
            || (axes != ScaleAxes::X && old.y != new.y);
        Self {
            translated,
            scaled: old.k != new.k,
        }
    }

    /// Compares a whole gesture, regardless of zoom axes.
    #[must_use]
    pub fn gesture(start: ZoomTransform, end: ZoomTransform) -> Self {
        Self {
            translated: start.x != end.x || start.y != end.y,
            scaled: start.k != end.k,
        }
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        !self.translated && !self.scaled
    }
}

#[cfg(test)]
mod tests {
    use super::{ScaleAxes, TransformChange, ZoomTransform};
    use crate::core::scale::Scale;
    use crate::core::types::{Bounds, Point};
    use approx::assert_relative_eq;

    #[test]
    fn translate_is_expressed_in_untransformed_units() {
        let transform = ZoomTransform::IDENTITY.scale(2.0).translate(-100.0, -50.0);
        assert_relative_eq!(transform.x(), -200.0);
        assert_relative_eq!(transform.y(), -100.0);
    }

    #[test]
    fn rescale_x_reports_visible_domain() {
        let scale = Scale::linear(0.0, 100.0).expect("scale").with_range(0.0, 400.0);
        let transform = ZoomTransform::new(2.0, -200.0, 0.0);
        let visible = transform.rescale_x(scale);
        assert_relative_eq!(visible.domain().0, 25.0, epsilon = 1e-9);
        assert_relative_eq!(visible.domain().1, 75.0, epsilon = 1e-9);
    }

    #[test]
    fn scale_about_keeps_anchor_fixed_and_clamps() {
        let anchor = Point::new(120.0, 80.0);
        let zoomed = ZoomTransform::IDENTITY.scale_about(4.0, anchor, (1.0, 3.0));
        assert_relative_eq!(zoomed.k(), 3.0);
        let fixed = zoomed.apply(ZoomTransform::IDENTITY.invert(anchor));
        assert_relative_eq!(fixed.x, anchor.x, epsilon = 1e-9);
        assert_relative_eq!(fixed.y, anchor.y, epsilon = 1e-9);
    }

    #[test]
    fn constrain_prevents_panning_outside_extent() {
        let extent = Bounds::new(0.0, 0.0, 400.0, 300.0);
        let panned = ZoomTransform::new(2.0, 50.0, -900.0).constrain(extent, extent);
        assert_relative_eq!(panned.x(), 0.0);
        assert_relative_eq!(panned.y(), -300.0);
    }

    #[test]
    fn classify_ignores_translation_on_frozen_axis() {
        let old = ZoomTransform::IDENTITY;
        let new = ZoomTransform::new(1.0, 0.0, 25.0);
        assert!(TransformChange::classify(old, new, ScaleAxes::X).is_none());
        assert!(TransformChange::classify(old, new, ScaleAxes::XY).translated);
    }
}
