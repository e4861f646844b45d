use std::f64::consts::FRAC_PI_2;

use crate::core::{Bounds, Scale, nice_ticks, precision_for_step, tick_step};
use crate::render::{Color, LinePrimitive, Renderer, Surface, TextHAlign, TextPrimitive};

use super::{AxisConfig, AxisHooks, Scatterplot};

const AXIS_COLOR: Color = Color::BLACK;
const AXIS_LINE_WIDTH: f64 = 1.0;
const TICK_SIZE_PX: f64 = 6.0;
const TICK_PADDING_PX: f64 = 3.0;
const FONT_SIZE_PX: f64 = 10.0;

/// Edge of the plot area an axis is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AxisSide {
    Left,
    Bottom,
    Right,
}

/// One axis to paint: `scale` maps domain values onto plot-area pixels.
pub(crate) struct AxisPaint<'a> {
    pub(crate) side: AxisSide,
    pub(crate) scale: Scale,
    pub(crate) config: &'a AxisConfig,
    pub(crate) hooks: &'a AxisHooks,
    pub(crate) fallback_label: &'a str,
}

/// Tick values from the tick hook, the configured values, or nice ticks
/// over the visible domain.
pub(crate) fn axis_ticks(scale: Scale, config: &AxisConfig, hooks: &AxisHooks) -> Vec<f64> {
    if let Some(provider) = &hooks.ticks {
        return provider(&scale);
    }
    if let Some(values) = &config.tick_values {
        return values.clone();
    }
    let (start, end) = scale.domain();
    nice_ticks(start.min(end), start.max(end), config.tick_count)
}

/// Label formatter: hook, fixed precision, or just enough decimals to tell
/// neighbouring ticks apart.
pub(crate) fn tick_formatter<'a>(
    scale: Scale,
    config: &'a AxisConfig,
    hooks: &'a AxisHooks,
) -> Box<dyn Fn(f64) -> String + 'a> {
    if let Some(format) = &hooks.format {
        return Box::new(move |value| format(value));
    }
    let precision = config.precision.unwrap_or_else(|| {
        let (start, end) = scale.domain();
        precision_for_step(tick_step(start, end, config.tick_count))
    });
    Box::new(move |value| {
        // Avoid printing "-0".
        let value = if value == 0.0 { 0.0 } else { value };
        format!("{value:.precision$}")
    })
}

/// Appends baseline, tick marks, tick labels and title of one axis.
pub(crate) fn paint_axis(surface: &mut Surface, plot_area: Bounds, axis: &AxisPaint<'_>) {
    let ticks = axis_ticks(axis.scale, axis.config, axis.hooks);
    let format = tick_formatter(axis.scale, axis.config, axis.hooks);
    let label = axis.config.label_or(axis.fallback_label);

    match axis.side {
        AxisSide::Bottom => {
            let y = plot_area.y1;
            surface.push(LinePrimitive::new(
                plot_area.x0,
                y,
                plot_area.x1,
                y,
                AXIS_LINE_WIDTH,
                AXIS_COLOR,
            ));
            for value in ticks {
                let x = plot_area.x0 + axis.scale.map(value);
                if !within(x, plot_area.x0, plot_area.x1) {
                    continue;
                }
                surface.push(LinePrimitive::new(
                    x,
                    y,
                    x,
                    y + TICK_SIZE_PX,
                    AXIS_LINE_WIDTH,
                    AXIS_COLOR,
                ));
                surface.push(TextPrimitive::new(
                    format(value),
                    x,
                    y + TICK_SIZE_PX + TICK_PADDING_PX + FONT_SIZE_PX,
                    FONT_SIZE_PX,
                    AXIS_COLOR,
                    TextHAlign::Center,
                ));
            }
            if !label.is_empty() {
                surface.push(TextPrimitive::new(
                    label,
                    (plot_area.x0 + plot_area.x1) / 2.0,
                    y + TICK_SIZE_PX + TICK_PADDING_PX + 2.0 * FONT_SIZE_PX + TICK_PADDING_PX,
                    FONT_SIZE_PX,
                    AXIS_COLOR,
                    TextHAlign::Center,
                ));
            }
        }
        AxisSide::Left | AxisSide::Right => {
            let left = axis.side == AxisSide::Left;
            let (x, direction, align) = if left {
                (plot_area.x0, -1.0, TextHAlign::Right)
            } else {
                (plot_area.x1, 1.0, TextHAlign::Left)
            };
            surface.push(LinePrimitive::new(
                x,
                plot_area.y0,
                x,
                plot_area.y1,
                AXIS_LINE_WIDTH,
                AXIS_COLOR,
            ));
            let mut widest = 0usize;
            for value in ticks {
                let y = plot_area.y0 + axis.scale.map(value);
                if !within(y, plot_area.y0, plot_area.y1) {
                    continue;
                }
                let text = format(value);
                widest = widest.max(text.chars().count());
                surface.push(LinePrimitive::new(
                    x,
                    y,
                    x + direction * TICK_SIZE_PX,
                    y,
                    AXIS_LINE_WIDTH,
                    AXIS_COLOR,
                ));
                surface.push(TextPrimitive::new(
                    text,
                    x + direction * (TICK_SIZE_PX + TICK_PADDING_PX),
                    y + FONT_SIZE_PX * 0.35,
                    FONT_SIZE_PX,
                    AXIS_COLOR,
                    align,
                ));
            }
            if !label.is_empty() {
                // Rough glyph width keeps the title clear of the tick labels.
                let offset = TICK_SIZE_PX
                    + 2.0 * TICK_PADDING_PX
                    + widest as f64 * FONT_SIZE_PX * 0.6
                    + FONT_SIZE_PX / 2.0;
                let rotation = if left { -FRAC_PI_2 } else { FRAC_PI_2 };
                surface.push(
                    TextPrimitive::new(
                        label,
                        x + direction * offset,
                        (plot_area.y0 + plot_area.y1) / 2.0,
                        FONT_SIZE_PX,
                        AXIS_COLOR,
                        TextHAlign::Center,
                    )
                    .with_rotation(rotation),
                );
            }
        }
    }
}

fn within(value: f64, a: f64, b: f64) -> bool {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    value.is_finite() && value >= lo - 0.5 && value <= hi + 0.5
}

impl<T, R: Renderer, U> Scatterplot<T, R, U> {
    pub(super) fn paint_axes(&mut self) {
        let plot_area = self.space.plot_area(self.size);
        let scales = self.space.transformed_scales();
        let surface = &mut self.axes_layer;
        surface.clear();

        paint_axis(
            surface,
            plot_area,
            &AxisPaint {
                side: AxisSide::Bottom,
                scale: scales.x,
                config: &self.config.x_axis,
                hooks: &self.hooks.x_axis,
                fallback_label: "x",
            },
        );
        paint_axis(
            surface,
            plot_area,
            &AxisPaint {
                side: AxisSide::Left,
                scale: scales.y,
                config: &self.config.y_axis,
                hooks: &self.hooks.y_axis,
                fallback_label: "y",
            },
        );
        if let Some(y2) = scales.y2 {
            paint_axis(
                surface,
                plot_area,
                &AxisPaint {
                    side: AxisSide::Right,
                    scale: y2,
                    config: &self.config.y2_axis,
                    hooks: &self.hooks.y2_axis,
                    fallback_label: "y2",
                },
            );
        }
    }
}
