use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{
    Bounds, Point, RecordId, Scale, SpatialIndex, TransformDelta, VisitControl,
};
use crate::error::PlotResult;
use crate::interaction::TimerKind;
use crate::render::{
    RenderInfo, RenderMode, RenderReason, Renderer, RepaintedLayers, ScatterFrame, Surface,
    SymbolPass,
};

use super::{Scatterplot, ScatterplotEvent};

/// Counters of the last data-layer traversal.
///
/// `aggregated` and `hidden` are only counted with `debug_stats` enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TraversalStats {
    pub rendered: usize,
    pub aggregated: usize,
    pub hidden: usize,
}

impl std::ops::AddAssign for TraversalStats {
    fn add_assign(&mut self, other: Self) {
        self.rendered += other.rendered;
        self.aggregated += other.aggregated;
        self.hidden += other.hidden;
    }
}

/// How one traversal maps normalized space onto the surface.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TraversalView {
    pub(crate) x: Scale,
    pub(crate) y: Scale,
    /// Plot-area origin in surface pixels.
    pub(crate) offset: Point,
    /// Normalized region inside the plot area.
    pub(crate) visible: Bounds,
    pub(crate) threshold_px: f64,
    pub(crate) count_hidden: bool,
}

impl TraversalView {
    fn to_surface(&self, point: Point) -> Point {
        Point::new(
            self.offset.x + self.x.map(point.x),
            self.offset.y + self.y.map(point.y),
        )
    }
}

/// Paints the visible part of `index`, drawing one representative record
/// for every node smaller than the aggregation threshold on screen.
pub(crate) fn traverse_index<X>(
    index: &SpatialIndex<RecordId>,
    records: &[X],
    pass: &mut dyn SymbolPass<X>,
    surface: &mut Surface,
    view: &TraversalView,
) -> TraversalStats {
    let mut stats = TraversalStats::default();
    let mut draw = |surface: &mut Surface, id: RecordId, point: Point| -> bool {
        let Some(record) = records.get(id.index()) else {
            return false;
        };
        let pixel = view.to_surface(point);
        pass.render(surface, pixel.x, pixel.y, record);
        true
    };

    index.visit(|node, bounds| {
        if !view.visible.overlaps(bounds) {
            if view.count_hidden {
                stats.hidden += node.subtree_size();
            }
            return VisitControl::SkipSubtree;
        }

        let width = (view.x.map(bounds.x1) - view.x.map(bounds.x0)).abs();
        let height = (view.y.map(bounds.y1) - view.y.map(bounds.y0)).abs();
        if width.max(height) < view.threshold_px {
            if let Some(id) = node.first_leaf() {
                if draw(surface, *id, index.project(id)) {
                    stats.rendered += 1;
                }
                if view.count_hidden {
                    stats.aggregated += node.subtree_size().saturating_sub(1);
                }
            }
            return VisitControl::SkipSubtree;
        }

        if node.is_leaf() {
            for (point, id) in node.leaf_entries() {
                if draw(surface, *id, point) {
                    stats.rendered += 1;
                }
            }
        }
        VisitControl::Continue
    });
    stats
}

impl<T, R: Renderer, U> Scatterplot<T, R, U> {
    /// Full repaint of every layer.
    pub fn render(&mut self) -> PlotResult<()> {
        self.render_with(RenderReason::Dirty, TransformDelta::NONE)
    }

    /// Repaints the layers `reason` requires and hands the frame to the
    /// renderer.
    ///
    /// A size change since the last layout turns any reason into a full
    /// repaint. Without a usable plot area the pass is skipped.
    pub fn render_with(&mut self, reason: RenderReason, delta: TransformDelta) -> PlotResult<()> {
        let (width, height) = self.space.plot_size(self.size);
        if !self.size.is_valid() || width <= 0.0 || height <= 0.0 {
            warn!(
                width = self.size.width,
                height = self.size.height,
                %reason,
                "plot area is empty, deferring render"
            );
            return Ok(());
        }

        let mut reason = reason;
        if self.space.layout_size() != Some(self.size) {
            debug!(width, height, "surface resized");
            self.space.resize(self.size);
            reason = RenderReason::Dirty;
        }
        self.emit(ScatterplotEvent::Render { reason, delta });
        if reason == RenderReason::Dirty {
            self.space.layout(self.size);
        }

        let repainted = match reason {
            RenderReason::PerformTranslate => {
                self.cancel_auto_redraw();
                self.shift_data_layer(delta);
                self.paint_axes();
                self.paint_selection();
                self.pending.auto_redraw = Some(
                    self.timers
                        .arm(TimerKind::AutoRedraw, self.config.zoom_delay_ms),
                );
                RepaintedLayers::ALL
            }
            RenderReason::SelectionChanged => {
                self.paint_selection();
                RepaintedLayers {
                    selection: true,
                    ..RepaintedLayers::default()
                }
            }
            RenderReason::AfterTranslate => {
                self.cancel_auto_redraw();
                self.paint_data();
                self.paint_selection();
                RepaintedLayers {
                    data: true,
                    selection: true,
                    axes: false,
                }
            }
            _ => {
                self.cancel_auto_redraw();
                self.paint_data();
                self.paint_axes();
                self.paint_selection();
                RepaintedLayers::ALL
            }
        };

        let frame = ScatterFrame {
            size: self.size,
            plot_area: self.space.plot_area(self.size),
            reason,
            delta,
            repainted,
            data: &self.layers.committed,
            selection: &self.layers.working,
            axes: &self.axes_layer,
        };
        self.renderer.render(&frame)
    }

    /// Counters of the last data-layer paint.
    #[must_use]
    pub fn last_traversal_stats(&self) -> TraversalStats {
        self.stats
    }

    pub(super) fn cancel_auto_redraw(&mut self) {
        if let Some(handle) = self.pending.auto_redraw.take() {
            self.timers.cancel(handle);
        }
    }

    fn layer_clip(&self) -> Bounds {
        self.space
            .plot_area(self.size)
            .expand(self.config.canvas_border)
    }

    fn traversal_view(&self, y: Scale) -> TraversalView {
        let scales = self.space.transformed_normalized();
        let margins = self.space.margins();
        TraversalView {
            x: scales.x,
            y,
            offset: Point::new(margins.left, margins.top),
            visible: self.space.visible_normalized(),
            threshold_px: self.config.aggregation_threshold_px,
            count_hidden: self.config.debug_stats,
        }
    }

    fn render_info(&self) -> RenderInfo {
        RenderInfo {
            zoom_level: self.space.transform().k(),
        }
    }

    /// Pan fast path: the previous point cloud is copied shifted by the
    /// translation delta instead of traversing the index again.
    fn shift_data_layer(&mut self, delta: TransformDelta) {
        let clip = Some(self.layer_clip());
        let layers = &mut self.layers;
        layers.working.clear();
        layers.working.blit_from(&layers.committed, delta.x, delta.y);
        layers.swap();
        layers.set_clip(clip);
    }

    fn paint_data(&mut self) {
        let clip = Some(self.layer_clip());
        let scales = self.space.transformed_scales();
        let normalized = self.space.transformed_normalized();
        let view = self.traversal_view(normalized.y);
        let info = self.render_info();

        let data = &mut self.layers.committed;
        data.clear();
        data.set_clip(clip);
        if let Some(background) = &self.hooks.background {
            background(data, &scales);
        }

        let mut pass = self.primary.symbol().begin(RenderMode::Normal, info);
        let mut stats = traverse_index(
            self.primary.index(),
            self.primary.records(),
            pass.as_mut(),
            data,
            &view,
        );
        pass.done(data);
        drop(pass);

        if let (Some(secondary), Some(y2)) = (&self.secondary, normalized.y2) {
            let view = TraversalView { y: y2, ..view };
            let mut pass = secondary.symbol().begin(RenderMode::Normal, info);
            stats += traverse_index(
                secondary.index(),
                secondary.records(),
                pass.as_mut(),
                data,
                &view,
            );
            pass.done(data);
        }

        trace!(
            rendered = stats.rendered,
            aggregated = stats.aggregated,
            hidden = stats.hidden,
            "painted data layer"
        );
        self.stats = stats;
    }

    fn paint_selection(&mut self) {
        let clip = Some(self.layer_clip());
        let normalized = self.space.transformed_normalized();
        let view = TraversalView {
            count_hidden: false,
            ..self.traversal_view(normalized.y)
        };
        let info = self.render_info();

        let selection = &mut self.layers.working;
        selection.clear();
        selection.set_clip(clip);
        if self.hooks.select_predicate.is_none() && self.hooks.extras.is_none() {
            return;
        }

        let mut pass = self.primary.symbol().begin(RenderMode::Selected, info);
        traverse_index(
            self.selection.index(),
            self.primary.records(),
            pass.as_mut(),
            selection,
            &view,
        );
        pass.done(selection);
        drop(pass);

        if let Some(extras) = &self.hooks.extras {
            extras(selection, &self.space.transformed_scales());
        }
        self.lasso.render(selection);
    }
}
