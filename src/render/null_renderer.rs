use crate::error::PlotResult;
use crate::render::{Primitive, RenderReason, RepaintedLayers, Renderer, ScatterFrame};

/// No-op renderer used by tests and headless usage.
///
/// It still validates frame content so tests can catch invalid geometry
/// without a rasterising backend.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_reason: Option<RenderReason>,
    pub last_repainted: RepaintedLayers,
    pub last_data_mark_count: usize,
    pub last_selection_mark_count: usize,
    pub last_line_count: usize,
    pub last_polyline_count: usize,
    pub last_text_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &ScatterFrame<'_>) -> PlotResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_reason = Some(frame.reason);
        self.last_repainted = frame.repainted;
        self.last_data_mark_count = frame.data.mark_count();
        self.last_selection_mark_count = frame.selection.mark_count();

        let all = || frame.layers().into_iter().flat_map(|layer| layer.primitives());
        self.last_line_count = all().filter(|p| matches!(p, Primitive::Line(_))).count();
        self.last_polyline_count = all()
            .filter(|p| matches!(p, Primitive::Polyline(_)))
            .count();
        self.last_text_count = all().filter(|p| matches!(p, Primitive::Text(_))).count();
        Ok(())
    }
}
