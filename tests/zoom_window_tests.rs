use approx::assert_relative_eq;
use scatter_rs::api::{Accessors, AxisConfig, Scatterplot, ScatterplotConfig};
use scatter_rs::core::{Point, ScaleAxes, SurfaceSize, Window};
use scatter_rs::render::{NullRenderer, RenderReason};

/// 100 x 100 grid centred in the unit cells of `[0, 100]^2`.
fn dense_grid() -> Vec<Point> {
    (0..10_000)
        .map(|i| Point::new(f64::from(i % 100) + 0.5, f64::from(i / 100) + 0.5))
        .collect()
}

fn config() -> ScatterplotConfig {
    // Plot area of 400 x 300 pixels.
    ScatterplotConfig::new(SurfaceSize::new(458, 342))
        .with_x_axis(AxisConfig::labelled("x").with_domain(0.0, 100.0))
        .with_y_axis(AxisConfig::labelled("y").with_domain(0.0, 100.0))
}

fn build_plot(config: ScatterplotConfig) -> Scatterplot<Point, NullRenderer> {
    Scatterplot::new(NullRenderer::default(), config, dense_grid(), Accessors::xy())
        .expect("scatterplot init")
}

fn assert_window_eq(actual: Window, expected: Window) {
    assert_relative_eq!(actual.x_min_max.0, expected.x_min_max.0, epsilon = 1e-9);
    assert_relative_eq!(actual.x_min_max.1, expected.x_min_max.1, epsilon = 1e-9);
    assert_relative_eq!(actual.y_min_max.0, expected.y_min_max.0, epsilon = 1e-9);
    assert_relative_eq!(actual.y_min_max.1, expected.y_min_max.1, epsilon = 1e-9);
}

#[test]
fn centred_window_doubles_the_zoom() {
    let mut plot = build_plot(config());
    assert!(!plot.is_zoomed());
    let window = Window::new((25.0, 75.0), (25.0, 75.0));
    plot.set_window(window).expect("set window");

    assert!(plot.is_zoomed());
    assert_relative_eq!(plot.transform().k(), 2.0, epsilon = 1e-12);
    assert_window_eq(plot.window(), window);
    assert_eq!(plot.renderer().last_reason, Some(RenderReason::Dirty));
}

#[test]
fn click_query_at_window_centre_stays_inside_the_window() {
    let mut plot = build_plot(config());
    plot.set_window(Window::new((25.0, 75.0), (25.0, 75.0)))
        .expect("set window");

    // Data (50, 50) sits at plot pixel (200, 150).
    let ids = plot.find_items(Point::new(248.0, 160.0));
    assert!(!ids.is_empty());
    for id in ids {
        let record = plot.record(id).expect("record exists");
        assert!((25.0..=75.0).contains(&record.x));
        assert!((25.0..=75.0).contains(&record.y));
        assert!((record.x - 50.0).abs() <= 1.25);
        assert!((record.y - 50.0).abs() <= 1.25);
    }
}

#[test]
fn click_radius_shrinks_in_data_units_as_zoom_grows() {
    let mut plot = build_plot(config());
    let centre = Point::new(248.0, 160.0);
    let wide = plot.find_items(centre).len();
    plot.set_window(Window::new((40.0, 60.0), (40.0, 60.0)))
        .expect("set window");
    let narrow = plot
        .find_items(plot_pixel_of(&plot, Point::new(50.0, 50.0)))
        .len();
    assert!(narrow < wide, "narrow={narrow} wide={wide}");
}

fn plot_pixel_of(plot: &Scatterplot<Point, NullRenderer>, data: Point) -> Point {
    let scales = plot.transformed_scales();
    let margins = plot.coordinate_space().margins();
    Point::new(
        margins.left + scales.x.map(data.x),
        margins.top + scales.y.map(data.y),
    )
}

#[test]
fn scale_extent_clamps_zoom() {
    let config = config().with_zoom_scale_extent(1.0, Some(4.0));
    let mut plot = build_plot(config);
    plot.set_window(Window::new((49.0, 51.0), (49.0, 51.0)))
        .expect("set window");
    assert_relative_eq!(plot.transform().k(), 4.0);
}

#[test]
fn window_outside_domain_is_pulled_back_inside() {
    let mut plot = build_plot(config());
    plot.set_window(Window::new((80.0, 130.0), (80.0, 130.0)))
        .expect("set window");
    let window = plot.window();
    assert_relative_eq!(window.x_min_max.1, 100.0, epsilon = 1e-9);
    assert_relative_eq!(window.x_min_max.0, 50.0, epsilon = 1e-9);
}

#[test]
fn x_only_zoom_leaves_y_untouched() {
    let config = config().with_scale(Some(ScaleAxes::X));
    let mut plot = build_plot(config);
    plot.set_window(Window::new((20.0, 40.0), (40.0, 60.0)))
        .expect("set window");
    let window = plot.window();
    assert_relative_eq!(window.x_min_max.0, 20.0, epsilon = 1e-9);
    assert_relative_eq!(window.x_min_max.1, 40.0, epsilon = 1e-9);
    assert_relative_eq!(window.y_min_max.0, 0.0, epsilon = 1e-9);
    assert_relative_eq!(window.y_min_max.1, 100.0, epsilon = 1e-9);
}

#[test]
fn empty_window_is_rejected() {
    let mut plot = build_plot(config());
    assert!(plot.set_window(Window::new((30.0, 30.0), (10.0, 20.0))).is_err());
}

#[test]
fn configured_zoom_window_applies_at_init() {
    let config = config().with_zoom_window(Window::new((25.0, 75.0), (25.0, 75.0)));
    let plot = build_plot(config);
    assert_relative_eq!(plot.transform().k(), 2.0, epsilon = 1e-12);
}

#[test]
fn window_set_before_layout_is_applied_once_sized() {
    let config = ScatterplotConfig {
        surface_size: SurfaceSize::new(0, 0),
        ..config()
    };
    let mut plot = build_plot(config);
    let window = Window::new((25.0, 75.0), (25.0, 75.0));
    plot.set_window(window).expect("deferred window");
    assert_eq!(plot.renderer().frames_rendered, 0);

    plot.set_surface_size(SurfaceSize::new(458, 342))
        .expect("resize");
    assert_relative_eq!(plot.transform().k(), 2.0, epsilon = 1e-12);
    assert_window_eq(plot.window(), window);
}

#[test]
fn resize_keeps_the_visible_window() {
    let mut plot = build_plot(config());
    let window = Window::new((25.0, 75.0), (25.0, 75.0));
    plot.set_window(window).expect("set window");

    plot.set_surface_size(SurfaceSize::new(858, 642))
        .expect("resize");
    assert_eq!(plot.renderer().last_reason, Some(RenderReason::Dirty));
    assert_relative_eq!(plot.transform().k(), 2.0, epsilon = 1e-12);
    assert_relative_eq!(plot.transform().x(), -400.0, epsilon = 1e-9);
    assert_window_eq(plot.window(), window);
}

#[test]
fn initial_zoom_config_scales_and_translates() {
    let config = config().with_initial_zoom(2.0, (-50.0, -40.0));
    let plot = build_plot(config);
    let transform = plot.transform();
    assert_relative_eq!(transform.k(), 2.0);
    assert_relative_eq!(transform.x(), -100.0);
    assert_relative_eq!(transform.y(), -80.0);
}
