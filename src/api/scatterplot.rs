use crate::core::{RecordId, SurfaceSize, Window, ZoomTransform};
use crate::error::PlotResult;
use crate::interaction::{GestureState, Lasso, TimerHandle, TimerQueue};
use crate::render::{Renderer, Surface, SurfacePair};

use super::{
    CoordinateSpace, EventEmitter, ListenerId, PlotHooks, ScatterplotConfig, ScatterplotEvent,
    ScatterplotEventKind, SelectionModel, Series, TransformedScales, TraversalStats,
};

/// Timers the plot currently has armed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct PendingTimers {
    pub(super) auto_redraw: Option<TimerHandle>,
    pub(super) tooltip: Option<TimerHandle>,
    pub(super) lasso_tick: Option<TimerHandle>,
    pub(super) wheel_idle: Option<TimerHandle>,
}

/// Main orchestration facade consumed by host applications.
///
/// `Scatterplot` owns the record sets and their spatial indexes, the scales
/// and zoom transform, the selection, and the retained layers handed to the
/// renderer. Hosts forward pointer input and elapsed time; everything else
/// happens synchronously inside those calls.
///
/// `U` is the record type of the secondary (right y axis) series and stays
/// `()` on single-axis plots.
pub struct Scatterplot<T, R, U = ()> {
    pub(super) renderer: R,
    pub(super) config: ScatterplotConfig,
    pub(super) size: SurfaceSize,
    pub(super) space: CoordinateSpace,
    pub(super) primary: Series<T>,
    pub(super) secondary: Option<Series<U>>,
    pub(super) selection: SelectionModel,
    pub(super) hooks: PlotHooks<T>,
    pub(super) layers: SurfacePair,
    pub(super) axes_layer: Surface,
    pub(super) timers: TimerQueue,
    pub(super) pending: PendingTimers,
    pub(super) gesture: GestureState,
    pub(super) lasso: Lasso,
    pub(super) suppress_click: bool,
    pub(super) events: EventEmitter,
    pub(super) stats: TraversalStats,
}

/// Plot with a second series drawn against a right-hand y axis.
pub type DualAxisScatterplot<T, U, R> = Scatterplot<T, R, U>;

impl<T, R: Renderer, U> Scatterplot<T, R, U> {
    #[must_use]
    pub fn config(&self) -> &ScatterplotConfig {
        &self.config
    }

    #[must_use]
    pub fn surface_size(&self) -> SurfaceSize {
        self.size
    }

    /// Records a new surface size and repaints; the visible window is kept.
    ///
    /// A zero size defers painting until a usable size is reported.
    pub fn set_surface_size(&mut self, size: SurfaceSize) -> PlotResult<()> {
        self.size = size;
        self.render()
    }

    #[must_use]
    pub fn coordinate_space(&self) -> &CoordinateSpace {
        &self.space
    }

    #[must_use]
    pub fn transform(&self) -> ZoomTransform {
        self.space.transform()
    }

    #[must_use]
    pub fn transformed_scales(&self) -> TransformedScales {
        self.space.transformed_scales()
    }

    #[must_use]
    pub fn is_zoom_enabled(&self) -> bool {
        self.space.axes().is_some()
    }

    #[must_use]
    pub fn is_zoomed(&self) -> bool {
        self.space.transform().k() != 1.0
    }

    /// Visible data-domain range.
    #[must_use]
    pub fn window(&self) -> Window {
        self.space.window()
    }

    /// Full data domain of the primary axes.
    #[must_use]
    pub fn domain(&self) -> Window {
        self.space.domain()
    }

    /// Moves the view onto `window` and repaints. No-op when zoom is off.
    pub fn set_window(&mut self, window: Window) -> PlotResult<()> {
        if !self.is_zoom_enabled() {
            return Ok(());
        }
        self.space.set_window(window)?;
        self.render()
    }

    #[must_use]
    pub fn records(&self) -> &[T] {
        self.primary.records()
    }

    #[must_use]
    pub fn record(&self, id: RecordId) -> Option<&T> {
        self.primary.record(id)
    }

    #[must_use]
    pub fn series(&self) -> &Series<T> {
        &self.primary
    }

    #[must_use]
    pub fn secondary_series(&self) -> Option<&Series<U>> {
        self.secondary.as_ref()
    }

    #[must_use]
    pub fn is_dual_axis(&self) -> bool {
        self.secondary.is_some()
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Retained data, selection and axes layers of the last pass.
    #[must_use]
    pub fn layers(&self) -> [&Surface; 3] {
        [&self.layers.committed, &self.layers.working, &self.axes_layer]
    }

    #[must_use]
    pub fn gesture(&self) -> GestureState {
        self.gesture
    }

    #[must_use]
    pub fn lasso(&self) -> &Lasso {
        &self.lasso
    }

    /// Milliseconds of virtual time seen so far.
    #[must_use]
    pub fn now_ms(&self) -> f64 {
        self.timers.now_ms()
    }

    /// Whether the settle repaint after a pan is still pending.
    #[must_use]
    pub fn auto_redraw_pending(&self) -> bool {
        self.pending.auto_redraw.is_some()
    }

    pub fn on<F>(&mut self, kind: ScatterplotEventKind, listener: F) -> ListenerId
    where
        F: FnMut(&ScatterplotEvent) + 'static,
    {
        self.events.on(kind, listener)
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        self.events.off(id)
    }

    pub(super) fn emit(&mut self, event: ScatterplotEvent) {
        self.events.emit(&event);
    }
}
