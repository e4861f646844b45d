use std::rc::Rc;

use scatter_rs::core::{EllipseTester, Point, Projector, SpatialIndex, Tester, ZoomTransform};
use proptest::prelude::*;

fn index_over(points: &[Point]) -> SpatialIndex<usize> {
    let positions: Rc<[Point]> = points.into();
    let projector: Projector<usize> = Rc::new(move |key| positions[*key]);
    SpatialIndex::build(0..points.len(), projector)
}

fn point() -> impl Strategy<Value = Point> {
    (0.0f64..100.0, 0.0f64..100.0).prop_map(|(x, y)| Point::new(x, y))
}

proptest! {
    #[test]
    fn ellipse_query_matches_linear_scan_property(
        points in prop::collection::vec(point(), 0..400),
        center in point(),
        rx in 0.1f64..30.0,
        ry in 0.1f64..30.0
    ) {
        let index = index_over(&points);
        let tester = EllipseTester::new(center, rx, ry);

        let mut found = index.query_ellipse(center.x, center.y, rx, ry);
        found.sort_unstable();
        let expected: Vec<usize> = (0..points.len())
            .filter(|key| tester.test(points[*key]))
            .collect();

        prop_assert_eq!(found, expected);
    }

    #[test]
    fn index_holds_every_finite_point_property(
        points in prop::collection::vec(point(), 1..400)
    ) {
        let index = index_over(&points);
        prop_assert_eq!(index.len(), points.len());
        prop_assert_eq!(index.root().map(|root| root.subtree_size()), Some(points.len()));
        let extent = index.extent().expect("non-empty index has an extent");
        for point in &points {
            prop_assert!(extent.contains(*point));
        }
    }

    #[test]
    fn constrained_transform_keeps_the_view_inside_property(
        k in 1.0f64..50.0,
        x in -5_000.0f64..5_000.0,
        y in -5_000.0f64..5_000.0
    ) {
        let extent = scatter_rs::core::Bounds::new(0.0, 0.0, 400.0, 300.0);
        let constrained = ZoomTransform::new(k, x, y).constrain(extent, extent);

        prop_assert!(constrained.invert_x(0.0) >= -1e-9);
        prop_assert!(constrained.invert_x(400.0) <= 400.0 + 1e-9);
        prop_assert!(constrained.invert_y(0.0) >= -1e-9);
        prop_assert!(constrained.invert_y(300.0) <= 300.0 + 1e-9);
        prop_assert!((constrained.k() - k).abs() <= f64::EPSILON);
    }
}
