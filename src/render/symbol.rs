//! Point symbols: a `Symbol` hands out one `SymbolPass` per layer paint.

use std::f64::consts::PI;
use std::rc::Rc;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::Point;

use super::{
    Color, LinePrimitive, MarkPrimitive, MarkShape, PolylinePrimitive, Primitive, Surface,
};

/// Which set of records a pass paints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    Normal,
    Selected,
    Hover,
}

/// View information handed to symbols at the start of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderInfo {
    pub zoom_level: f64,
}

/// Paints records of one pass onto a surface.
pub trait SymbolPass<T> {
    fn render(&mut self, surface: &mut Surface, x: f64, y: f64, item: &T);

    /// Called once after the last record of the pass.
    fn done(&mut self, _surface: &mut Surface) {}
}

/// Factory of symbol passes.
pub trait Symbol<T> {
    fn begin(&self, mode: RenderMode, info: RenderInfo) -> Box<dyn SymbolPass<T> + '_>;
}

/// Colors of a symbol per render mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymbolStyle {
    pub fill: Color,
    pub selected: Color,
    pub hover: Color,
}

impl Default for SymbolStyle {
    fn default() -> Self {
        Self {
            fill: Color::STEEL_BLUE,
            selected: Color::RED,
            hover: Color::ORANGE,
        }
    }
}

impl SymbolStyle {
    #[must_use]
    pub fn color_for(self, mode: RenderMode) -> Color {
        match mode {
            RenderMode::Normal => self.fill,
            RenderMode::Selected => self.selected,
            RenderMode::Hover => self.hover,
        }
    }
}

/// Default symbol area in square pixels.
pub const DEFAULT_SYMBOL_SIZE: f64 = 20.0;

/// Filled circle, square or diamond whose area is `size` square pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeSymbol {
    shape: MarkShape,
    size: f64,
    style: SymbolStyle,
}

impl ShapeSymbol {
    #[must_use]
    pub fn new(shape: MarkShape) -> Self {
        Self {
            shape,
            size: DEFAULT_SYMBOL_SIZE,
            style: SymbolStyle::default(),
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: SymbolStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn shape(&self) -> MarkShape {
        self.shape
    }

    /// Half extent of the mark in pixels.
    #[must_use]
    pub fn radius(&self) -> f64 {
        match self.shape {
            MarkShape::Circle => (self.size / PI).sqrt(),
            MarkShape::Square => self.size.sqrt() / 2.0,
            MarkShape::Diamond => {
                let tan30 = (1.0_f64 / 3.0).sqrt();
                (self.size / (2.0 * tan30)).sqrt()
            }
        }
    }
}

struct ShapePass {
    shape: MarkShape,
    radius: f64,
    fill: Color,
}

impl<T> SymbolPass<T> for ShapePass {
    fn render(&mut self, surface: &mut Surface, x: f64, y: f64, _item: &T) {
        surface.push(MarkPrimitive::new(x, y, self.shape, self.radius, self.fill));
    }
}

impl<T> Symbol<T> for ShapeSymbol {
    fn begin(&self, mode: RenderMode, _info: RenderInfo) -> Box<dyn SymbolPass<T> + '_> {
        Box::new(ShapePass {
            shape: self.shape,
            radius: self.radius(),
            fill: self.style.color_for(mode),
        })
    }
}

/// Connects the records of a pass, ordered by x, with one stroked line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSymbol {
    line_width: f64,
    style: SymbolStyle,
}

impl Default for LineSymbol {
    fn default() -> Self {
        Self {
            line_width: 1.0,
            style: SymbolStyle::default(),
        }
    }
}

impl LineSymbol {
    #[must_use]
    pub fn with_line_width(mut self, line_width: f64) -> Self {
        self.line_width = line_width;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: SymbolStyle) -> Self {
        self.style = style;
        self
    }
}

struct LinePass {
    points: Vec<Point>,
    line_width: f64,
    stroke: Color,
}

impl<T> SymbolPass<T> for LinePass {
    fn render(&mut self, _surface: &mut Surface, x: f64, y: f64, _item: &T) {
        self.points.push(Point::new(x, y));
    }

    fn done(&mut self, surface: &mut Surface) {
        if self.points.len() < 2 {
            self.points.clear();
            return;
        }
        let mut points = std::mem::take(&mut self.points);
        points.sort_by_key(|point| OrderedFloat(point.x));
        surface.push(PolylinePrimitive::new(points, self.line_width, self.stroke));
    }
}

impl<T> Symbol<T> for LineSymbol {
    fn begin(&self, mode: RenderMode, _info: RenderInfo) -> Box<dyn SymbolPass<T> + '_> {
        Box::new(LinePass {
            points: Vec::new(),
            line_width: self.line_width,
            stroke: self.style.color_for(mode),
        })
    }
}

/// Dot on a vertical stem rising from the bottom of the layer clip.
///
/// The dot color comes from the mode style, or per record from `fill_by`
/// in normal mode. Without a clip only the dots are drawn.
pub struct LollipopSymbol<T> {
    size: f64,
    stem: Color,
    style: SymbolStyle,
    fill_by: Option<Rc<dyn Fn(&T) -> Color>>,
}

impl<T> Default for LollipopSymbol<T> {
    fn default() -> Self {
        Self {
            size: DEFAULT_SYMBOL_SIZE,
            stem: Color::rgb(0.667, 0.667, 0.667),
            style: SymbolStyle {
                fill: Color::BLACK,
                selected: Color::rgb(0.667, 0.0, 0.0),
                hover: Color::rgb(0.0, 0.667, 0.0),
            },
            fill_by: None,
        }
    }
}

impl<T> LollipopSymbol<T> {
    #[must_use]
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_stem_color(mut self, stem: Color) -> Self {
        self.stem = stem;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: SymbolStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_fill_by<F>(mut self, fill_by: F) -> Self
    where
        F: Fn(&T) -> Color + 'static,
    {
        self.fill_by = Some(Rc::new(fill_by));
        self
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        (self.size / PI).sqrt()
    }
}

struct LollipopPass<T> {
    radius: f64,
    stem: Color,
    fill: Color,
    fill_by: Option<Rc<dyn Fn(&T) -> Color>>,
    dots: Vec<MarkPrimitive>,
}

impl<T> SymbolPass<T> for LollipopPass<T> {
    fn render(&mut self, surface: &mut Surface, x: f64, y: f64, item: &T) {
        let top = y + self.radius;
        let base = surface
            .clip()
            .map(|clip| clip.y1 - self.radius)
            .filter(|base| *base > top);
        if let Some(base) = base {
            surface.push(LinePrimitive::new(x, top, x, base, 1.0, self.stem));
        }
        let fill = self.fill_by.as_ref().map_or(self.fill, |fill_by| fill_by(item));
        self.dots
            .push(MarkPrimitive::new(x, y, MarkShape::Circle, self.radius, fill));
    }

    // Dots go on top of every stem.
    fn done(&mut self, surface: &mut Surface) {
        surface.extend(self.dots.drain(..).map(Primitive::from));
    }
}

impl<T: 'static> Symbol<T> for LollipopSymbol<T> {
    fn begin(&self, mode: RenderMode, _info: RenderInfo) -> Box<dyn SymbolPass<T> + '_> {
        Box::new(LollipopPass {
            radius: self.radius(),
            stem: self.stem,
            fill: self.style.color_for(mode),
            fill_by: match mode {
                RenderMode::Normal => self.fill_by.clone(),
                RenderMode::Selected | RenderMode::Hover => None,
            },
            dots: Vec::new(),
        })
    }
}

/// Resolves a symbol from its short code, dispatching on the first character:
/// `.` square, `b` diamond, `l` line, anything else circle.
#[must_use]
pub fn symbol_from_code<T>(code: &str) -> Box<dyn Symbol<T>> {
    match code.chars().next() {
        Some('.') => Box::new(ShapeSymbol::new(MarkShape::Square)),
        Some('b') => Box::new(ShapeSymbol::new(MarkShape::Diamond)),
        Some('l') => Box::new(LineSymbol::default()),
        _ => Box::new(ShapeSymbol::new(MarkShape::Circle)),
    }
}

#[cfg(test)]
mod tests {
    use super::{LollipopSymbol, RenderInfo, RenderMode, ShapeSymbol, Symbol, symbol_from_code};
    use crate::core::Bounds;
    use crate::render::{Color, MarkShape, Primitive, Surface};
    use approx::assert_relative_eq;

    const INFO: RenderInfo = RenderInfo { zoom_level: 1.0 };

    #[test]
    fn circle_radius_follows_area() {
        let symbol = ShapeSymbol::new(MarkShape::Circle).with_size(std::f64::consts::PI * 9.0);
        assert_relative_eq!(symbol.radius(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn selected_pass_uses_selected_color() {
        let symbol = symbol_from_code::<()>(".");
        let mut surface = Surface::new();
        let mut pass = symbol.begin(RenderMode::Selected, INFO);
        pass.render(&mut surface, 4.0, 5.0, &());
        pass.done(&mut surface);
        let Primitive::Mark(mark) = &surface.primitives()[0] else {
            panic!("expected mark");
        };
        assert_eq!(mark.shape, MarkShape::Square);
        assert_eq!(mark.fill, Color::RED);
    }

    #[test]
    fn line_symbol_sorts_points_by_x() {
        let symbol = symbol_from_code::<u8>("line");
        let mut surface = Surface::new();
        let mut pass = symbol.begin(RenderMode::Normal, INFO);
        for (x, y) in [(3.0, 1.0), (1.0, 2.0), (2.0, 3.0)] {
            pass.render(&mut surface, x, y, &0);
        }
        assert!(surface.is_empty());
        pass.done(&mut surface);
        let Primitive::Polyline(line) = &surface.primitives()[0] else {
            panic!("expected polyline");
        };
        let xs: Vec<f64> = line.points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn lollipop_draws_stems_below_dots_colored_per_record() {
        let symbol = LollipopSymbol::<f64>::default().with_fill_by(|value| {
            if *value > 0.5 { Color::RED } else { Color::BLACK }
        });
        let mut surface = Surface::new();
        surface.set_clip(Some(Bounds::new(0.0, 0.0, 100.0, 100.0)));
        let mut pass = symbol.begin(RenderMode::Normal, INFO);
        pass.render(&mut surface, 10.0, 20.0, &0.9);
        pass.render(&mut surface, 30.0, 40.0, &0.1);
        pass.done(&mut surface);

        let primitives = surface.primitives();
        assert_eq!(primitives.len(), 4);
        let Primitive::Line(stem) = &primitives[0] else {
            panic!("expected stem");
        };
        assert_relative_eq!(stem.y1, 20.0 + symbol.radius());
        assert_relative_eq!(stem.y2, 100.0 - symbol.radius());
        let fills: Vec<Color> = primitives[2..]
            .iter()
            .filter_map(|primitive| match primitive {
                Primitive::Mark(mark) => Some(mark.fill),
                _ => None,
            })
            .collect();
        assert_eq!(fills, vec![Color::RED, Color::BLACK]);
    }

    #[test]
    fn selected_lollipop_ignores_record_colors() {
        let symbol = LollipopSymbol::<f64>::default().with_fill_by(|_| Color::WHITE);
        let mut surface = Surface::new();
        let mut pass = symbol.begin(RenderMode::Selected, INFO);
        pass.render(&mut surface, 10.0, 20.0, &1.0);
        pass.done(&mut surface);
        let Primitive::Mark(mark) = &surface.primitives()[0] else {
            panic!("expected dot");
        };
        assert_eq!(surface.len(), 1);
        assert_eq!(mark.fill, Color::rgb(0.667, 0.0, 0.0));
    }
}
