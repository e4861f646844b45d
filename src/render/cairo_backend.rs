use std::f64::consts::TAU;
use std::io::Write;

use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;
use tracing::trace;

use crate::error::{PlotError, PlotResult};
use crate::render::{
    Color, LinePrimitive, LineStrokeStyle, MarkPrimitive, MarkShape, PolylinePrimitive, Primitive,
    RectPrimitive, Renderer, ScatterFrame, Surface, TextHAlign, TextPrimitive,
};

/// Primitive counts of the last painted frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub layers_painted: usize,
    pub marks_drawn: usize,
    pub lines_drawn: usize,
    pub polylines_drawn: usize,
    pub rects_drawn: usize,
    pub texts_drawn: usize,
}

impl CairoRenderStats {
    fn count(&mut self, primitive: &Primitive) {
        let slot = match primitive {
            Primitive::Mark(_) => &mut self.marks_drawn,
            Primitive::Line(_) => &mut self.lines_drawn,
            Primitive::Polyline(_) => &mut self.polylines_drawn,
            Primitive::Rect(_) => &mut self.rects_drawn,
            Primitive::Text(_) => &mut self.texts_drawn,
        };
        *slot += 1;
    }
}

/// Paints frames onto a Cairo context owned by the host toolkit, e.g. from a
/// GTK `DrawingArea` draw callback.
pub trait CairoContextRenderer {
    fn paint_on(&mut self, context: &Context, frame: &ScatterFrame<'_>) -> PlotResult<()>;
}

/// Cairo/Pango backend painting into an offscreen ARGB image.
#[derive(Debug)]
pub struct CairoRenderer {
    image: ImageSurface,
    background: Color,
    stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> PlotResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(PlotError::InvalidSurface {
                width: width.max(0).unsigned_abs(),
                height: height.max(0).unsigned_abs(),
            });
        }
        let image = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| cairo_error("create image surface", err))?;
        Ok(Self {
            image,
            background: Color::WHITE,
            stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn image(&self) -> &ImageSurface {
        &self.image
    }

    pub fn set_background(&mut self, color: Color) -> PlotResult<()> {
        color.validate()?;
        self.background = color;
        Ok(())
    }

    #[must_use]
    pub fn stats(&self) -> CairoRenderStats {
        self.stats
    }

    /// Encodes the last painted frame as PNG.
    pub fn write_png<W: Write>(&self, writer: &mut W) -> PlotResult<()> {
        self.image
            .write_to_png(writer)
            .map_err(|err| PlotError::Backend(format!("write png: {err}")))
    }

    fn paint_frame(&mut self, context: &Context, frame: &ScatterFrame<'_>) -> PlotResult<()> {
        frame.validate()?;
        set_color(context, self.background);
        context
            .paint()
            .map_err(|err| cairo_error("paint background", err))?;

        let mut stats = CairoRenderStats::default();
        for layer in frame.layers() {
            paint_layer(context, layer, &mut stats)?;
            stats.layers_painted += 1;
        }
        trace!(?stats, "cairo frame painted");
        self.stats = stats;
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &ScatterFrame<'_>) -> PlotResult<()> {
        let context =
            Context::new(&self.image).map_err(|err| cairo_error("create context", err))?;
        self.paint_frame(&context, frame)
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn paint_on(&mut self, context: &Context, frame: &ScatterFrame<'_>) -> PlotResult<()> {
        self.paint_frame(context, frame)
    }
}

/// Runs `paint` between a save/restore pair.
fn isolated(
    context: &Context,
    paint: impl FnOnce(&Context) -> PlotResult<()>,
) -> PlotResult<()> {
    context.save().map_err(|err| cairo_error("save", err))?;
    let result = paint(context);
    context.restore().map_err(|err| cairo_error("restore", err))?;
    result
}

fn paint_layer(context: &Context, layer: &Surface, stats: &mut CairoRenderStats) -> PlotResult<()> {
    isolated(context, |context| {
        if let Some(clip) = layer.clip() {
            context.rectangle(clip.x0, clip.y0, clip.width(), clip.height());
            context.clip();
        }
        for primitive in layer.primitives() {
            match primitive {
                Primitive::Mark(mark) => paint_mark(context, mark)?,
                Primitive::Line(line) => paint_segment(context, line)?,
                Primitive::Polyline(polyline) => paint_polyline(context, polyline)?,
                Primitive::Rect(rect) => paint_rect(context, rect)?,
                Primitive::Text(text) => paint_text(context, text)?,
            }
            stats.count(primitive);
        }
        Ok(())
    })
}

fn paint_mark(context: &Context, mark: &MarkPrimitive) -> PlotResult<()> {
    let (x, y, r) = (mark.x, mark.y, mark.radius);
    match mark.shape {
        MarkShape::Circle => {
            context.new_sub_path();
            context.arc(x, y, r, 0.0, TAU);
        }
        MarkShape::Square => context.rectangle(x - r, y - r, 2.0 * r, 2.0 * r),
        MarkShape::Diamond => {
            // Narrow diamond: width is 1/sqrt(3) of the height.
            let half = r / 3f64.sqrt();
            for (px, py) in [(x, y - r), (x - half, y), (x, y + r), (x + half, y)] {
                context.line_to(px, py);
            }
            context.close_path();
        }
    }
    set_color(context, mark.fill);
    context.fill().map_err(|err| cairo_error("fill mark", err))
}

fn paint_segment(context: &Context, line: &LinePrimitive) -> PlotResult<()> {
    context.move_to(line.x1, line.y1);
    context.line_to(line.x2, line.y2);
    stroke(context, line.color, line.stroke_width, line.stroke_style)
}

fn paint_polyline(context: &Context, polyline: &PolylinePrimitive) -> PlotResult<()> {
    context.new_path();
    for point in &polyline.points {
        context.line_to(point.x, point.y);
    }
    if polyline.closed {
        context.close_path();
    }
    if let Some(fill) = polyline.fill {
        set_color(context, fill);
        context
            .fill_preserve()
            .map_err(|err| cairo_error("fill polyline", err))?;
    }
    stroke(
        context,
        polyline.stroke,
        polyline.stroke_width,
        polyline.stroke_style,
    )
}

fn paint_rect(context: &Context, rect: &RectPrimitive) -> PlotResult<()> {
    context.rectangle(rect.x, rect.y, rect.width, rect.height);
    if let Some(fill) = rect.fill {
        set_color(context, fill);
        context
            .fill_preserve()
            .map_err(|err| cairo_error("fill rect", err))?;
    }
    if rect.border_width <= 0.0 {
        context.new_path();
        return Ok(());
    }
    stroke(
        context,
        rect.border_color,
        rect.border_width,
        LineStrokeStyle::Solid,
    )
}

fn paint_text(context: &Context, text: &TextPrimitive) -> PlotResult<()> {
    let layout = pangocairo::functions::create_layout(context);
    let font = FontDescription::from_string(&format!("Sans {}", text.font_size_px));
    layout.set_font_description(Some(&font));
    layout.set_text(&text.text);
    let width = f64::from(layout.pixel_size().0);
    let dx = match text.h_align {
        TextHAlign::Left => 0.0,
        TextHAlign::Center => -width / 2.0,
        TextHAlign::Right => -width,
    };
    isolated(context, |context| {
        set_color(context, text.color);
        context.translate(text.x, text.y);
        context.rotate(text.rotation);
        context.move_to(dx, 0.0);
        pangocairo::functions::show_layout(context, &layout);
        Ok(())
    })
}

fn stroke(context: &Context, color: Color, width: f64, style: LineStrokeStyle) -> PlotResult<()> {
    set_color(context, color);
    context.set_line_width(width);
    match style {
        LineStrokeStyle::Solid => context.set_dash(&[], 0.0),
        LineStrokeStyle::Dashed { dash, gap } => context.set_dash(&[dash, gap], 0.0),
    }
    context.stroke().map_err(|err| cairo_error("stroke", err))
}

fn set_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn cairo_error(operation: &str, err: cairo::Error) -> PlotError {
    PlotError::Backend(format!("cairo {operation}: {err}"))
}
