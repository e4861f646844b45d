use std::cell::RefCell;
use std::rc::Rc;

use scatter_rs::api::{Accessors, AxisConfig, Scatterplot, ScatterplotConfig, ScatterplotEventKind};
use scatter_rs::core::{Point, RecordId, SurfaceSize};
use scatter_rs::interaction::PointerInput;
use scatter_rs::render::NullRenderer;

#[derive(Debug, Clone, PartialEq)]
struct Shown {
    ids: Vec<RecordId>,
    records: Vec<Point>,
    position: Point,
}

fn grid() -> Vec<Point> {
    (0..10)
        .flat_map(|j| (0..10).map(move |i| Point::new(5.0 + 10.0 * f64::from(i), 5.0 + 10.0 * f64::from(j))))
        .collect()
}

fn build_plot_with_tooltips() -> (Scatterplot<Point, NullRenderer>, Rc<RefCell<Vec<Shown>>>) {
    let config = ScatterplotConfig::new(SurfaceSize::new(458, 342))
        .with_tooltip_delay_ms(500.0)
        .with_x_axis(AxisConfig::labelled("x").with_domain(0.0, 100.0))
        .with_y_axis(AxisConfig::labelled("y").with_domain(0.0, 100.0));
    let shown = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&shown);
    let plot = Scatterplot::new(NullRenderer::default(), config, grid(), Accessors::xy())
        .expect("scatterplot init")
        .with_tooltip(move |request| {
            sink.borrow_mut().push(Shown {
                ids: request.ids.to_vec(),
                records: request.records.iter().map(|record| **record).collect(),
                position: request.position,
            });
        });
    (plot, shown)
}

// Record (45, 45) sits at surface pixel (228, 175).
const OVER_RECORD: PointerInput = PointerInput::new(228.0, 175.0);

#[test]
fn tooltip_shows_after_the_delay() {
    let (mut plot, shown) = build_plot_with_tooltips();
    plot.pointer_move(OVER_RECORD).expect("move");

    plot.advance_time(499.0).expect("advance");
    assert!(shown.borrow().is_empty());

    plot.advance_time(1.0).expect("advance");
    let shown = shown.borrow();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].ids, vec![RecordId::new(44)]);
    assert_eq!(shown[0].records, vec![Point::new(45.0, 45.0)]);
    assert_eq!(shown[0].position, Point::new(228.0, 175.0));
}

#[test]
fn moving_again_hides_and_restarts_the_delay() {
    let (mut plot, shown) = build_plot_with_tooltips();
    plot.pointer_move(OVER_RECORD).expect("move");
    plot.advance_time(300.0).expect("advance");
    plot.pointer_move(PointerInput::new(229.0, 175.0)).expect("move");

    // The pending tooltip was cancelled with a hide request.
    assert_eq!(shown.borrow().len(), 1);
    assert!(shown.borrow()[0].ids.is_empty());

    plot.advance_time(300.0).expect("advance");
    assert_eq!(shown.borrow().len(), 1);
    plot.advance_time(200.0).expect("advance");
    assert_eq!(shown.borrow().len(), 2);
    assert_eq!(shown.borrow()[1].ids, vec![RecordId::new(44)]);
}

#[test]
fn moving_after_the_tooltip_shows_does_not_hide_it() {
    let (mut plot, shown) = build_plot_with_tooltips();
    plot.pointer_move(OVER_RECORD).expect("move");
    plot.advance_time(500.0).expect("advance");
    assert_eq!(shown.borrow().len(), 1);

    plot.pointer_move(PointerInput::new(229.0, 175.0)).expect("move");
    assert_eq!(shown.borrow().len(), 1);

    plot.advance_time(500.0).expect("advance");
    let shown = shown.borrow();
    assert_eq!(shown.len(), 2);
    assert_eq!(shown[1].ids, vec![RecordId::new(44)]);
}

#[test]
fn leaving_the_plot_cancels_and_hides() {
    let (mut plot, shown) = build_plot_with_tooltips();
    plot.pointer_move(OVER_RECORD).expect("move");
    plot.pointer_leave();
    plot.advance_time(1_000.0).expect("advance");

    let shown = shown.borrow();
    assert_eq!(shown.len(), 1);
    assert!(shown[0].ids.is_empty());
}

#[test]
fn tooltip_over_empty_space_reports_no_records() {
    let (mut plot, shown) = build_plot_with_tooltips();
    plot.pointer_move(PointerInput::new(48.0, 310.0)).expect("move");
    plot.advance_time(500.0).expect("advance");
    let shown = shown.borrow();
    assert_eq!(shown.len(), 1);
    assert!(shown[0].ids.is_empty());
    assert!(shown[0].records.is_empty());
}

#[test]
fn tooltips_are_off_by_default() {
    let config = ScatterplotConfig::new(SurfaceSize::new(458, 342));
    let mut plot = Scatterplot::new(NullRenderer::default(), config, grid(), Accessors::xy())
        .expect("scatterplot init");
    assert!(!plot.tooltips_enabled());

    let moves = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&moves);
    plot.on(ScatterplotEventKind::MouseMoved, move |event| {
        sink.borrow_mut().push(event.kind());
    });
    plot.pointer_move(OVER_RECORD).expect("move");
    plot.advance_time(1_000.0).expect("advance");
    assert_eq!(moves.borrow().len(), 1);
}
