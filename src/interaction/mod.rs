mod lasso;
mod timers;

pub use lasso::{Lasso, LassoConfig};
pub use timers::{TimerHandle, TimerKind, TimerQueue};

use serde::{Deserialize, Serialize};

use crate::core::{Point, ZoomTransform};

/// Mouse button of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    #[default]
    Primary,
    Middle,
    Secondary,
}

impl PointerButton {
    #[must_use]
    pub const fn is_primary(self) -> bool {
        matches!(self, Self::Primary)
    }
}

/// Keyboard modifiers held during a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };
}

/// Pointer event in surface pixel coordinates (margins included).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerInput {
    pub x: f64,
    pub y: f64,
    pub button: PointerButton,
    pub modifiers: Modifiers,
}

impl PointerInput {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        }
    }

    #[must_use]
    pub const fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub const fn position(self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.position().is_finite()
    }
}

/// Pointer gesture currently in progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// Primary-button drag moving the view.
    Panning {
        start: ZoomTransform,
        last: Point,
        moved: bool,
    },
    /// Primary-button drag with the selection modifier drawing a lasso.
    Lassoing { moved: bool },
    /// Wheel events closed by an idle timer.
    WheelZooming { start: ZoomTransform },
}

impl GestureState {
    #[must_use]
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Transform at the start of a zoom gesture, if one is running.
    #[must_use]
    pub const fn zoom_start(self) -> Option<ZoomTransform> {
        match self {
            Self::Panning { start, .. } | Self::WheelZooming { start } => Some(start),
            Self::Idle | Self::Lassoing { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GestureState, Modifiers, PointerButton, PointerInput};
    use crate::core::{Point, ZoomTransform};

    #[test]
    fn pointer_defaults_to_unmodified_primary_button() {
        let input = PointerInput::new(3.0, 4.0);
        assert!(input.button.is_primary());
        assert_eq!(input.modifiers, Modifiers::NONE);
        assert_eq!(input.position(), Point::new(3.0, 4.0));
        let secondary = input.with_button(PointerButton::Secondary);
        assert!(!secondary.button.is_primary());
    }

    #[test]
    fn only_zoom_gestures_report_a_start_transform() {
        let start = ZoomTransform::new(2.0, 1.0, 1.0);
        assert_eq!(GestureState::WheelZooming { start }.zoom_start(), Some(start));
        assert_eq!(GestureState::Lassoing { moved: true }.zoom_start(), None);
        assert!(GestureState::default().is_idle());
    }
}
