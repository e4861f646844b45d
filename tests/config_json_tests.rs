use scatter_rs::api::{AxisConfig, ScatterplotConfig, ZoomScaleExtent};
use scatter_rs::core::{Margins, ScaleAxes, ScaleKind, SurfaceSize, Window};
use scatter_rs::error::PlotError;
use scatter_rs::interaction::LassoConfig;

#[test]
fn minimal_json_fills_in_defaults() {
    let config = ScatterplotConfig::from_json_str(r#"{"surface_size":{"width":640,"height":480}}"#)
        .expect("parse minimal config");

    assert_eq!(config, ScatterplotConfig::new(SurfaceSize::new(640, 480)));
    assert_eq!(config.margins, Margins::default());
    assert_eq!(config.click_radius_px, 10.0);
    assert_eq!(config.scale, Some(ScaleAxes::XY));
    assert_eq!(config.zoom_delay_ms, 300.0);
    assert_eq!(config.zoom_scale_extent, ZoomScaleExtent::new(1.0, None));
    assert_eq!(config.tooltip_delay_ms, 500.0);
    assert_eq!(config.aggregation_threshold_px, 5.0);
    assert_eq!(config.symbol, "o");
    assert_eq!(config.lasso, LassoConfig::default());
    assert!(config.validate().is_ok());
}

#[test]
fn full_config_round_trips_through_json() {
    let config = ScatterplotConfig::new(SurfaceSize::new(800, 600))
        .with_margins(Margins {
            left: 60.0,
            top: 20.0,
            right: 60.0,
            bottom: 40.0,
        })
        .with_scale(Some(ScaleAxes::X))
        .with_zoom_scale_extent(1.0, Some(64.0))
        .with_zoom_window(Window::new((10.0, 20.0), (0.0, 1.0)))
        .with_aspect_ratio(1.5)
        .with_symbol("b")
        .with_x_axis(
            AxisConfig::labelled("dose")
                .with_kind(ScaleKind::Log { base: 10.0 })
                .with_domain(1.0, 1_000.0),
        )
        .with_y_axis(AxisConfig::labelled("response").with_precision(2))
        .with_debug_stats(true);

    let json = config.to_json_pretty().expect("serialize");
    assert!(json.contains("\"dose\""));
    let restored = ScatterplotConfig::from_json_str(&json).expect("parse");
    assert_eq!(restored, config);
}

#[test]
fn disabled_zoom_is_serialized_as_null() {
    let config = ScatterplotConfig::new(SurfaceSize::new(640, 480)).with_scale(None);
    let json = config.to_json_pretty().expect("serialize");
    assert!(json.contains("\"scale\": null"));
    let restored = ScatterplotConfig::from_json_str(&json).expect("parse");
    assert_eq!(restored.scale, None);
}

#[test]
fn malformed_json_is_a_parse_error() {
    let result = ScatterplotConfig::from_json_str("{\"surface_size\": 3");
    assert!(matches!(result, Err(PlotError::ConfigParse(_))));
}

#[test]
fn validation_catches_inconsistent_settings() {
    let base = ScatterplotConfig::new(SurfaceSize::new(640, 480));
    assert!(matches!(
        base.clone().with_zoom_scale_extent(4.0, Some(2.0)).validate(),
        Err(PlotError::InvalidConfig(_))
    ));
    assert!(matches!(
        base.clone()
            .with_x_axis(AxisConfig::labelled("x").with_domain(5.0, 5.0))
            .validate(),
        Err(PlotError::InvalidConfig(_))
    ));
    assert!(matches!(
        base.with_zoom_delay_ms(-1.0).validate(),
        Err(PlotError::InvalidConfig(_))
    ));
}
