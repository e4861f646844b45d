use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{Bounds, SurfaceSize, TransformDelta};
use crate::error::{PlotError, PlotResult};

use super::Surface;

/// Why a render pass was requested; selects the cheapest correct repaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RenderReason {
    Dirty,
    SelectionChanged,
    Zoomed,
    PerformScaleAndTranslate,
    AfterScaleAndTranslate,
    PerformTranslate,
    AfterTranslate,
    PerformScale,
    AfterScale,
}

impl RenderReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dirty => "DIRTY",
            Self::SelectionChanged => "SELECTION_CHANGED",
            Self::Zoomed => "ZOOMED",
            Self::PerformScaleAndTranslate => "PERFORM_SCALE_AND_TRANSLATE",
            Self::AfterScaleAndTranslate => "AFTER_SCALE_AND_TRANSLATE",
            Self::PerformTranslate => "PERFORM_TRANSLATE",
            Self::AfterTranslate => "AFTER_TRANSLATE",
            Self::PerformScale => "PERFORM_SCALE",
            Self::AfterScale => "AFTER_SCALE",
        }
    }
}

impl fmt::Display for RenderReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layers whose content changed during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RepaintedLayers {
    pub data: bool,
    pub selection: bool,
    pub axes: bool,
}

impl RepaintedLayers {
    pub const ALL: Self = Self {
        data: true,
        selection: true,
        axes: true,
    };

    #[must_use]
    pub const fn any(self) -> bool {
        self.data || self.selection || self.axes
    }
}

/// Backend-agnostic snapshot of the three plot layers after one pass.
///
/// Layers are painted bottom to top: `data`, `selection`, `axes`.
#[derive(Debug, Clone, Copy)]
pub struct ScatterFrame<'a> {
    pub size: SurfaceSize,
    pub plot_area: Bounds,
    pub reason: RenderReason,
    pub delta: TransformDelta,
    pub repainted: RepaintedLayers,
    pub data: &'a Surface,
    pub selection: &'a Surface,
    pub axes: &'a Surface,
}

impl ScatterFrame<'_> {
    pub fn validate(&self) -> PlotResult<()> {
        if !self.size.is_valid() {
            return Err(PlotError::InvalidSurface {
                width: self.size.width,
                height: self.size.height,
            });
        }
        self.data.validate()?;
        self.selection.validate()?;
        self.axes.validate()
    }

    /// Layers in paint order.
    #[must_use]
    pub fn layers(&self) -> [&Surface; 3] {
        [self.data, self.selection, self.axes]
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers().iter().all(|layer| layer.is_empty())
    }
}
