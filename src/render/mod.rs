mod frame;
mod null_renderer;
mod primitives;
mod surface;
mod symbol;

pub use frame::{RenderReason, RepaintedLayers, ScatterFrame};
pub use null_renderer::NullRenderer;
pub use primitives::{
    Color, LinePrimitive, LineStrokeStyle, MarkPrimitive, MarkShape, PolylinePrimitive, Primitive,
    RectPrimitive, TextHAlign, TextPrimitive,
};
pub use surface::{Surface, SurfacePair};
pub use symbol::{
    DEFAULT_SYMBOL_SIZE, LineSymbol, LollipopSymbol, RenderInfo, RenderMode, ShapeSymbol, Symbol,
    SymbolPass, SymbolStyle, symbol_from_code,
};

use crate::error::PlotResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive the retained layers of a finished pass so drawing code
/// stays isolated from index traversal and interaction logic.
pub trait Renderer {
    fn render(&mut self, frame: &ScatterFrame<'_>) -> PlotResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextRenderer, CairoRenderStats, CairoRenderer};
