use scatter_rs::api::{Accessors, AxisConfig, Scatterplot, ScatterplotConfig};
use scatter_rs::core::{Point, ScaleAxes, SurfaceSize, Window};
use scatter_rs::render::NullRenderer;
use proptest::prelude::*;

fn build_plot(axes: ScaleAxes) -> Scatterplot<Point, NullRenderer> {
    let config = ScatterplotConfig::new(SurfaceSize::new(458, 342))
        .with_scale(Some(axes))
        .with_x_axis(AxisConfig::labelled("x").with_domain(0.0, 100.0))
        .with_y_axis(AxisConfig::labelled("y").with_domain(0.0, 100.0));
    let records = vec![Point::new(10.0, 10.0), Point::new(90.0, 90.0)];
    Scatterplot::new(NullRenderer::default(), config, records, Accessors::xy())
        .expect("scatterplot init")
}

proptest! {
    #[test]
    fn x_window_round_trip_property(
        span in 12.5f64..100.0,
        offset_factor in 0.0f64..1.0
    ) {
        let start = offset_factor * (100.0 - span);
        let window = Window::new((start, start + span), (0.0, 100.0));

        let mut plot = build_plot(ScaleAxes::X);
        plot.set_window(window).expect("set window");
        let recovered = plot.window();

        prop_assert!((recovered.x_min_max.0 - start).abs() <= 1e-7);
        prop_assert!((recovered.x_min_max.1 - (start + span)).abs() <= 1e-7);
    }

    #[test]
    fn proportional_xy_window_round_trip_property(
        span in 12.5f64..100.0,
        x_factor in 0.0f64..1.0,
        y_factor in 0.0f64..1.0
    ) {
        let x0 = x_factor * (100.0 - span);
        let y0 = y_factor * (100.0 - span);
        let window = Window::new((x0, x0 + span), (y0, y0 + span));

        let mut plot = build_plot(ScaleAxes::XY);
        plot.set_window(window).expect("set window");
        let recovered = plot.window();

        prop_assert!((plot.transform().k() - 100.0 / span).abs() <= 1e-9);
        prop_assert!((recovered.x_min_max.0 - x0).abs() <= 1e-7);
        prop_assert!((recovered.x_min_max.1 - (x0 + span)).abs() <= 1e-7);
        prop_assert!((recovered.y_min_max.0 - y0).abs() <= 1e-7);
        prop_assert!((recovered.y_min_max.1 - (y0 + span)).abs() <= 1e-7);
    }
}
