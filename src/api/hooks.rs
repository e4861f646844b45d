use std::fmt;

use crate::core::{Point, RecordId, Scale};
use crate::interaction::PointerInput;
use crate::render::{Renderer, Surface, Symbol};

use super::{Scatterplot, TransformedScales};

/// Decides whether a pointer event starts a selection instead of a pan.
pub type SelectPredicate = Box<dyn Fn(&PointerInput) -> bool>;

/// Paints custom content onto a layer with the current scales.
pub type LayerPainter = Box<dyn Fn(&mut Surface, &TransformedScales)>;

pub type TickFormatter = Box<dyn Fn(f64) -> String>;

/// Produces tick values for a transformed scale.
pub type TickProvider = Box<dyn Fn(&Scale) -> Vec<f64>>;

/// Tooltip show/hide request; an empty item list hides the tooltip.
#[derive(Debug)]
pub struct TooltipRequest<'a, T> {
    pub ids: &'a [RecordId],
    pub records: Vec<&'a T>,
    /// Surface pixel the tooltip is anchored at.
    pub position: Point,
}

impl<T> TooltipRequest<'_, T> {
    #[must_use]
    pub fn is_hide(&self) -> bool {
        self.ids.is_empty()
    }
}

pub type TooltipHandler<T> = Box<dyn FnMut(&TooltipRequest<'_, T>)>;

/// Selection starts on Ctrl or Alt.
#[must_use]
pub fn default_select_predicate() -> SelectPredicate {
    Box::new(|input: &PointerInput| input.modifiers.ctrl || input.modifiers.alt)
}

#[derive(Default)]
pub struct AxisHooks {
    pub(super) format: Option<TickFormatter>,
    pub(super) ticks: Option<TickProvider>,
}

impl fmt::Debug for AxisHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxisHooks")
            .field("format", &self.format.is_some())
            .field("ticks", &self.ticks.is_some())
            .finish()
    }
}

/// Host callbacks attached to a plot.
pub struct PlotHooks<T> {
    pub(super) select_predicate: Option<SelectPredicate>,
    pub(super) tooltip: Option<TooltipHandler<T>>,
    pub(super) extras: Option<LayerPainter>,
    pub(super) background: Option<LayerPainter>,
    pub(super) x_axis: AxisHooks,
    pub(super) y_axis: AxisHooks,
    pub(super) y2_axis: AxisHooks,
}

impl<T> Default for PlotHooks<T> {
    fn default() -> Self {
        Self {
            select_predicate: Some(default_select_predicate()),
            tooltip: None,
            extras: None,
            background: None,
            x_axis: AxisHooks::default(),
            y_axis: AxisHooks::default(),
            y2_axis: AxisHooks::default(),
        }
    }
}

impl<T> fmt::Debug for PlotHooks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlotHooks")
            .field("selection", &self.select_predicate.is_some())
            .field("tooltip", &self.tooltip.is_some())
            .field("extras", &self.extras.is_some())
            .field("background", &self.background.is_some())
            .finish_non_exhaustive()
    }
}

impl<T, R: Renderer, U> Scatterplot<T, R, U> {
    /// Replaces the predicate that turns a drag into a lasso.
    #[must_use]
    pub fn with_select_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&PointerInput) -> bool + 'static,
    {
        self.hooks.select_predicate = Some(Box::new(predicate));
        self
    }

    /// Disables selection: no lasso, no click selection, no selection layer.
    #[must_use]
    pub fn without_selection(mut self) -> Self {
        self.hooks.select_predicate = None;
        self
    }

    /// Enables delayed tooltips.
    #[must_use]
    pub fn with_tooltip<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&TooltipRequest<'_, T>) + 'static,
    {
        self.hooks.tooltip = Some(Box::new(handler));
        self
    }

    /// Paints on the selection layer after the selected records.
    #[must_use]
    pub fn with_extras<F>(mut self, painter: F) -> Self
    where
        F: Fn(&mut Surface, &TransformedScales) + 'static,
    {
        self.hooks.extras = Some(Box::new(painter));
        self
    }

    /// Paints on the data layer before any record.
    #[must_use]
    pub fn with_background<F>(mut self, painter: F) -> Self
    where
        F: Fn(&mut Surface, &TransformedScales) + 'static,
    {
        self.hooks.background = Some(Box::new(painter));
        self
    }

    #[must_use]
    pub fn with_symbol(mut self, symbol: Box<dyn Symbol<T>>) -> Self {
        self.primary.set_symbol(symbol);
        self
    }

    /// Symbol of the secondary series; ignored on single-axis plots.
    #[must_use]
    pub fn with_secondary_symbol(mut self, symbol: Box<dyn Symbol<U>>) -> Self {
        if let Some(secondary) = self.secondary.as_mut() {
            secondary.set_symbol(symbol);
        }
        self
    }

    #[must_use]
    pub fn with_x_tick_format<F>(mut self, format: F) -> Self
    where
        F: Fn(f64) -> String + 'static,
    {
        self.hooks.x_axis.format = Some(Box::new(format));
        self
    }

    #[must_use]
    pub fn with_y_tick_format<F>(mut self, format: F) -> Self
    where
        F: Fn(f64) -> String + 'static,
    {
        self.hooks.y_axis.format = Some(Box::new(format));
        self
    }

    #[must_use]
    pub fn with_y2_tick_format<F>(mut self, format: F) -> Self
    where
        F: Fn(f64) -> String + 'static,
    {
        self.hooks.y2_axis.format = Some(Box::new(format));
        self
    }

    #[must_use]
    pub fn with_x_ticks<F>(mut self, ticks: F) -> Self
    where
        F: Fn(&Scale) -> Vec<f64> + 'static,
    {
        self.hooks.x_axis.ticks = Some(Box::new(ticks));
        self
    }

    #[must_use]
    pub fn with_y_ticks<F>(mut self, ticks: F) -> Self
    where
        F: Fn(&Scale) -> Vec<f64> + 'static,
    {
        self.hooks.y_axis.ticks = Some(Box::new(ticks));
        self
    }

    #[must_use]
    pub fn with_y2_ticks<F>(mut self, ticks: F) -> Self
    where
        F: Fn(&Scale) -> Vec<f64> + 'static,
    {
        self.hooks.y2_axis.ticks = Some(Box::new(ticks));
        self
    }

    #[must_use]
    pub fn selection_enabled(&self) -> bool {
        self.hooks.select_predicate.is_some()
    }

    #[must_use]
    pub fn tooltips_enabled(&self) -> bool {
        self.hooks.tooltip.is_some()
    }

    pub(super) fn is_select_event(&self, input: &PointerInput) -> bool {
        self.hooks
            .select_predicate
            .as_ref()
            .is_some_and(|predicate| predicate(input))
    }
}

#[cfg(test)]
mod tests {
    use super::default_select_predicate;
    use crate::interaction::{Modifiers, PointerInput};

    #[test]
    fn default_predicate_requires_ctrl_or_alt() {
        let predicate = default_select_predicate();
        let input = PointerInput::new(1.0, 1.0);
        assert!(!predicate(&input));
        assert!(predicate(&input.with_modifiers(Modifiers::CTRL)));
        assert!(predicate(&input.with_modifiers(Modifiers::ALT)));
    }
}
