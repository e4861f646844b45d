use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::core::{MinMax, Point, Projector, RecordId, Scale, SpatialIndex};
use crate::render::Symbol;

/// Reads one coordinate of a record.
pub type Accessor<T> = Rc<dyn Fn(&T) -> f64>;

/// Records exposing their own coordinates.
pub trait XyRecord {
    fn x(&self) -> f64;
    fn y(&self) -> f64;
}

impl XyRecord for Point {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }
}

impl XyRecord for (f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }

    fn y(&self) -> f64 {
        self.1
    }
}

impl XyRecord for [f64; 2] {
    fn x(&self) -> f64 {
        self[0]
    }

    fn y(&self) -> f64 {
        self[1]
    }
}

/// Pair of coordinate accessors for one record type.
pub struct Accessors<T> {
    x: Accessor<T>,
    y: Accessor<T>,
}

impl<T> Clone for Accessors<T> {
    fn clone(&self) -> Self {
        Self {
            x: Rc::clone(&self.x),
            y: Rc::clone(&self.y),
        }
    }
}

impl<T> fmt::Debug for Accessors<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessors").finish_non_exhaustive()
    }
}

impl<T> Accessors<T> {
    pub fn new<X, Y>(x: X, y: Y) -> Self
    where
        X: Fn(&T) -> f64 + 'static,
        Y: Fn(&T) -> f64 + 'static,
    {
        Self {
            x: Rc::new(x),
            y: Rc::new(y),
        }
    }

    #[must_use]
    pub fn x(&self, record: &T) -> f64 {
        (self.x)(record)
    }

    #[must_use]
    pub fn y(&self, record: &T) -> f64 {
        (self.y)(record)
    }
}

impl<T: XyRecord + 'static> Accessors<T> {
    /// Accessors reading `XyRecord::x` and `XyRecord::y`.
    #[must_use]
    pub fn xy() -> Self {
        Self::new(T::x, T::y)
    }
}

/// Finite `[min, max]` of `values`, `None` when there is none.
pub(crate) fn finite_extent<I>(values: I) -> Option<MinMax>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|value| value.is_finite())
        .fold(None, |acc, value| match acc {
            None => Some((value, value)),
            Some((min, max)) => Some((min.min(value), max.max(value))),
        })
}

/// Maps raw coordinates through the domain to normalized scales.
fn project(raw: Vec<(f64, f64)>, to_x: Scale, to_y: Scale) -> Vec<Point> {
    #[cfg(feature = "parallel-projection")]
    {
        use rayon::prelude::*;
        raw.into_par_iter()
            .map(|(x, y)| Point::new(to_x.map(x), to_y.map(y)))
            .collect()
    }

    #[cfg(not(feature = "parallel-projection"))]
    {
        raw.into_iter()
            .map(|(x, y)| Point::new(to_x.map(x), to_y.map(y)))
            .collect()
    }
}

/// One record set with its accessors, symbol and spatial index.
///
/// The index stores `RecordId`s positioned in normalized space, so its
/// geometry does not depend on the current surface size.
pub struct Series<X> {
    records: Vec<X>,
    accessors: Accessors<X>,
    index: SpatialIndex<RecordId>,
    symbol: Box<dyn Symbol<X>>,
}

impl<X> fmt::Debug for Series<X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Series")
            .field("len", &self.records.len())
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl<X> Series<X> {
    pub(crate) fn build(
        records: Vec<X>,
        accessors: Accessors<X>,
        symbol: Box<dyn Symbol<X>>,
        to_normalized: (Scale, Scale),
    ) -> Self {
        let index = build_index(&records, &accessors, to_normalized);
        Self {
            records,
            accessors,
            index,
            symbol,
        }
    }

    /// Replaces the records and rebuilds the index from scratch.
    pub(crate) fn replace(&mut self, records: Vec<X>, to_normalized: (Scale, Scale)) {
        self.index = build_index(&records, &self.accessors, to_normalized);
        self.records = records;
    }

    pub(crate) fn set_symbol(&mut self, symbol: Box<dyn Symbol<X>>) {
        self.symbol = symbol;
    }

    #[must_use]
    pub fn records(&self) -> &[X] {
        &self.records
    }

    #[must_use]
    pub fn record(&self, id: RecordId) -> Option<&X> {
        self.records.get(id.index())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn accessors(&self) -> &Accessors<X> {
        &self.accessors
    }

    #[must_use]
    pub fn index(&self) -> &SpatialIndex<RecordId> {
        &self.index
    }

    #[must_use]
    pub fn symbol(&self) -> &dyn Symbol<X> {
        self.symbol.as_ref()
    }
}

fn build_index<X>(
    records: &[X],
    accessors: &Accessors<X>,
    (to_x, to_y): (Scale, Scale),
) -> SpatialIndex<RecordId> {
    let raw: Vec<(f64, f64)> = records
        .iter()
        .map(|record| (accessors.x(record), accessors.y(record)))
        .collect();
    let positions: Rc<[Point]> = project(raw, to_x, to_y).into();
    trace!(count = positions.len(), "projected records into index space");

    let lookup = Rc::clone(&positions);
    let projector: Projector<RecordId> = Rc::new(move |id: &RecordId| {
        lookup
            .get(id.index())
            .copied()
            .unwrap_or(Point::new(f64::NAN, f64::NAN))
    });
    let index = SpatialIndex::build((0..positions.len()).map(RecordId::new), projector);
    debug!(
        records = records.len(),
        indexed = index.len(),
        "rebuilt spatial index"
    );
    index
}

#[cfg(test)]
mod tests {
    use super::{Accessors, Series, finite_extent};
    use crate::core::{Point, RecordId, Scale};
    use crate::render::symbol_from_code;

    fn normalizers() -> (Scale, Scale) {
        (
            Scale::linear(0.0, 10.0).expect("x").with_range(0.0, 100.0),
            Scale::linear(0.0, 10.0).expect("y").with_range(0.0, 100.0),
        )
    }

    #[test]
    fn index_positions_are_normalized() {
        let records = vec![Point::new(1.0, 2.0), Point::new(5.0, 5.0)];
        let series = Series::build(records, Accessors::xy(), symbol_from_code("o"), normalizers());
        assert_eq!(series.index().project(&RecordId::new(1)), Point::new(50.0, 50.0));
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn records_with_missing_coordinates_are_not_indexed() {
        let records = vec![(1.0, 1.0), (f64::NAN, 3.0), (2.0, 2.0)];
        let series = Series::build(
            records,
            Accessors::new(|r: &(f64, f64)| r.0, |r: &(f64, f64)| r.1),
            symbol_from_code("o"),
            normalizers(),
        );
        assert_eq!(series.len(), 3);
        assert_eq!(series.index().len(), 2);
    }

    #[test]
    fn finite_extent_skips_non_finite_values() {
        assert_eq!(finite_extent([f64::NAN, 3.0, -1.0]), Some((-1.0, 3.0)));
        assert_eq!(finite_extent(std::iter::empty()), None);
    }
}
