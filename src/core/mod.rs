pub mod quadtree;
pub mod scale;
pub mod tester;
pub mod ticks;
pub mod transform;
pub mod types;

pub use quadtree::{Projector, QuadNode, SpatialIndex, VisitControl};
pub use scale::{Scale, ScaleKind};
pub use tester::{EllipseTester, FnTester, PolygonTester, Tester, point_in_polygon};
pub use ticks::{DEFAULT_TICK_COUNT, nice_ticks, precision_for_step, tick_step};
pub use transform::{Axis, ScaleAxes, TransformChange, TransformDelta, ZoomTransform};
pub use types::{Bounds, Margins, MinMax, Point, RecordId, SurfaceSize, Window};
