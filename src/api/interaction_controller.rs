use tracing::{trace, warn};

use crate::core::{Point, ScaleAxes, TransformChange, TransformDelta, ZoomTransform};
use crate::error::{PlotError, PlotResult};
use crate::interaction::{GestureState, PointerInput, TimerKind};
use crate::render::{RenderReason, Renderer};

use super::{Scatterplot, ScatterplotEvent, TooltipRequest};

/// Wheel delta to zoom exponent, as in browser pixel-mode wheel zooming.
const WHEEL_DELTA_FACTOR: f64 = 0.002;

impl<T, R: Renderer, U> Scatterplot<T, R, U> {
    /// Primary press starts a lasso when the select predicate accepts the
    /// event, otherwise a pan inside the plot area.
    pub fn pointer_down(&mut self, input: PointerInput) -> PlotResult<()> {
        if !input.is_finite() {
            warn!(?input, "ignoring non-finite pointer down");
            return Ok(());
        }
        self.finish_wheel_gesture()?;
        if !self.gesture.is_idle() || !input.button.is_primary() {
            return Ok(());
        }
        self.suppress_click = false;

        if self.is_select_event(&input) {
            self.lasso.start(input.x, input.y);
            self.gesture = GestureState::Lassoing { moved: false };
            if !self.clear_selection_impl(true)? {
                self.render_with(RenderReason::SelectionChanged, TransformDelta::NONE)?;
            }
            return Ok(());
        }

        if self.is_zoom_enabled() && self.space.plot_area(self.size).contains(input.position()) {
            self.gesture = GestureState::Panning {
                start: self.space.transform(),
                last: input.position(),
                moved: false,
            };
        }
        Ok(())
    }

    pub fn pointer_move(&mut self, input: PointerInput) -> PlotResult<()> {
        if !input.is_finite() {
            warn!(?input, "ignoring non-finite pointer move");
            return Ok(());
        }
        let position = input.position();
        self.emit(ScatterplotEvent::MouseMoved { position });

        match self.gesture {
            GestureState::Panning { start, last, .. } => {
                let (dx, dy) = self.pan_delta(position, last);
                self.gesture = GestureState::Panning {
                    start,
                    last: position,
                    moved: true,
                };
                if dx != 0.0 || dy != 0.0 {
                    let next = self.space.transform().translate_pixels(dx, dy);
                    self.apply_zoom(next)?;
                }
            }
            GestureState::Lassoing { .. } => {
                if self.pending.lasso_tick.is_none() {
                    self.pending.lasso_tick = Some(
                        self.timers
                            .arm_repeating(TimerKind::LassoTick, self.lasso.config().interval_ms),
                    );
                }
                self.gesture = GestureState::Lassoing { moved: true };
                self.lasso.set_current(input.x, input.y);
                self.render_with(RenderReason::SelectionChanged, TransformDelta::NONE)?;
                self.emit(ScatterplotEvent::Dragged { position });
            }
            GestureState::Idle | GestureState::WheelZooming { .. } => {}
        }

        if self.tooltips_enabled() {
            if self.pending.tooltip.is_some() {
                self.pointer_leave();
            }
            self.pending.tooltip = Some(self.timers.arm(
                TimerKind::Tooltip { position },
                self.config.tooltip_delay_ms,
            ));
        }
        Ok(())
    }

    /// Ends a pan or lasso gesture.
    pub fn pointer_up(&mut self, input: PointerInput) -> PlotResult<()> {
        match self.gesture {
            GestureState::Panning { start, moved, .. } => {
                self.gesture = GestureState::Idle;
                self.suppress_click = moved;
                self.end_zoom(start)?;
            }
            GestureState::Lassoing { moved } => {
                self.gesture = GestureState::Idle;
                self.suppress_click = moved;
                if let Some(handle) = self.pending.lasso_tick.take() {
                    self.timers.cancel(handle);
                }
                let end = if input.is_finite() {
                    input.position()
                } else {
                    self.lasso.current().unwrap_or_default()
                };
                self.lasso.end(end.x, end.y);
                self.retest_lasso()?;
                self.lasso.clear();
                self.render_with(RenderReason::SelectionChanged, TransformDelta::NONE)?;
                let selection = self.selection();
                self.emit(ScatterplotEvent::SelectionChanged { selection });
            }
            GestureState::Idle | GestureState::WheelZooming { .. } => {}
        }
        Ok(())
    }

    /// Click selection: secondary buttons clear, the primary button selects
    /// the records within the click radius. Clicks ending a drag are dropped.
    pub fn click(&mut self, input: PointerInput) -> PlotResult<()> {
        if !self.selection_enabled() {
            return Ok(());
        }
        if std::mem::take(&mut self.suppress_click) || !input.is_finite() {
            return Ok(());
        }
        if !input.button.is_primary() {
            self.clear_selection_impl(false)?;
            return Ok(());
        }
        let position = input.position();
        let ids = self.find_items(position);
        self.set_selection_impl(&ids, false)?;
        self.emit(ScatterplotEvent::MouseClicked { position });
        Ok(())
    }

    /// Zooms about the pointer; positive `delta_y` zooms out.
    pub fn wheel(&mut self, input: PointerInput, delta_y: f64) -> PlotResult<()> {
        if !self.is_zoom_enabled() || !input.is_finite() || !delta_y.is_finite() {
            return Ok(());
        }
        if !self.space.plot_area(self.size).contains(input.position()) {
            return Ok(());
        }
        match self.gesture {
            GestureState::Idle => {
                self.gesture = GestureState::WheelZooming {
                    start: self.space.transform(),
                };
            }
            GestureState::WheelZooming { .. } => {}
            GestureState::Panning { .. } | GestureState::Lassoing { .. } => return Ok(()),
        }

        if let Some(handle) = self.pending.wheel_idle.take() {
            self.timers.cancel(handle);
        }
        self.pending.wheel_idle = Some(
            self.timers
                .arm(TimerKind::WheelIdle, self.config.wheel_idle_ms),
        );

        let factor = 2f64.powf(-delta_y * WHEEL_DELTA_FACTOR);
        let anchor = self.space.surface_to_plot(input.position());
        let next = self
            .space
            .transform()
            .scale_about(factor, anchor, self.space.scale_extent());
        self.apply_zoom(next)
    }

    /// Cancels a pending tooltip and asks the host to hide a visible one.
    pub fn pointer_leave(&mut self) {
        if let Some(handle) = self.pending.tooltip.take() {
            self.timers.cancel(handle);
        }
        if let Some(tooltip) = self.hooks.tooltip.as_mut() {
            tooltip(&TooltipRequest {
                ids: &[],
                records: Vec::new(),
                position: Point::default(),
            });
        }
    }

    /// Advances the virtual clock, firing due timers in order.
    pub fn advance_time(&mut self, elapsed_ms: f64) -> PlotResult<()> {
        if !elapsed_ms.is_finite() || elapsed_ms < 0.0 {
            return Err(PlotError::InvalidData(
                "elapsed time must be finite and >= 0".to_owned(),
            ));
        }
        let deadline = self.timers.now_ms() + elapsed_ms;
        while let Some((handle, kind)) = self.timers.pop_due(deadline) {
            match kind {
                TimerKind::AutoRedraw => {
                    if self.pending.auto_redraw == Some(handle) {
                        self.pending.auto_redraw = None;
                        self.render_with(RenderReason::AfterTranslate, TransformDelta::NONE)?;
                    }
                }
                TimerKind::Tooltip { position } => {
                    if self.pending.tooltip == Some(handle) {
                        self.pending.tooltip = None;
                        self.show_tooltip(position);
                    }
                }
                TimerKind::LassoTick => {
                    if self.lasso.push_current() {
                        self.retest_lasso()?;
                    }
                }
                TimerKind::WheelIdle => {
                    if self.pending.wheel_idle == Some(handle) {
                        self.pending.wheel_idle = None;
                        self.finish_wheel_gesture()?;
                    }
                }
            }
        }
        self.timers.advance_clock_to(deadline);
        Ok(())
    }

    /// Applies a user zoom step, repainting through the fast path matching
    /// what changed. `ZoomChanged` is emitted even without a change.
    fn apply_zoom(&mut self, next: ZoomTransform) -> PlotResult<()> {
        let Some(axes) = self.space.axes() else {
            return Ok(());
        };
        let previous = self.space.transform();
        let current = self.space.set_transform(next);
        let change = TransformChange::classify(previous, current, axes);
        if !change.is_none() {
            let delta = TransformDelta::between(previous, current, axes);
            self.emit(ScatterplotEvent::WindowChanged {
                window: self.window(),
                scales: self.transformed_scales(),
            });
            let reason = match (change.translated, change.scaled) {
                (true, true) => RenderReason::PerformScaleAndTranslate,
                (false, true) => RenderReason::PerformScale,
                _ => RenderReason::PerformTranslate,
            };
            self.render_with(reason, delta)?;
        }
        self.emit(ScatterplotEvent::ZoomChanged { transform: current });
        Ok(())
    }

    /// Settles a finished zoom gesture. A pure pan only repaints if its
    /// settle timer has not fired yet.
    fn end_zoom(&mut self, start: ZoomTransform) -> PlotResult<()> {
        let change = TransformChange::gesture(start, self.space.transform());
        trace!(?change, "zoom gesture ended");
        match (change.translated, change.scaled) {
            (true, true) => {
                self.render_with(RenderReason::AfterScaleAndTranslate, TransformDelta::NONE)
            }
            (false, true) => self.render_with(RenderReason::AfterScale, TransformDelta::NONE),
            (true, false) if self.pending.auto_redraw.is_some() => {
                self.render_with(RenderReason::AfterTranslate, TransformDelta::NONE)
            }
            _ => Ok(()),
        }
    }

    fn finish_wheel_gesture(&mut self) -> PlotResult<()> {
        let GestureState::WheelZooming { start } = self.gesture else {
            return Ok(());
        };
        self.gesture = GestureState::Idle;
        if let Some(handle) = self.pending.wheel_idle.take() {
            self.timers.cancel(handle);
        }
        self.end_zoom(start)
    }

    /// Drag delta restricted to the axes that zoom.
    fn pan_delta(&self, position: Point, last: Point) -> (f64, f64) {
        let axes = self.space.axes().unwrap_or(ScaleAxes::XY);
        (
            if axes.includes_x() { position.x - last.x } else { 0.0 },
            if axes.includes_y() { position.y - last.y } else { 0.0 },
        )
    }

    /// Re-runs the lasso query over the committed path.
    fn retest_lasso(&mut self) -> PlotResult<bool> {
        let space = &self.space;
        let Some(tester) = self
            .lasso
            .tester(|point| space.surface_to_normalized(point))
        else {
            return Ok(false);
        };
        self.select_with_tester_impl(&tester, true)
    }

    fn show_tooltip(&mut self, position: Point) {
        let ids = self.find_items(position);
        let Some(tooltip) = self.hooks.tooltip.as_mut() else {
            return;
        };
        let records = ids
            .iter()
            .filter_map(|id| self.primary.record(*id))
            .collect();
        tooltip(&TooltipRequest {
            ids: &ids,
            records,
            position,
        });
    }
}
