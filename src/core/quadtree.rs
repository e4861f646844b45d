//! Point quadtree backing hit-testing and aggregated rendering.
//!
//! Leaves hold one position (coincident points share a leaf); internal nodes
//! split their box into four equal quadrants indexed as
//! `(y >= mid_y) << 1 | (x >= mid_x)`. The root box is square and grows by
//! doubling when points outside of it are added.

use std::fmt;
use std::rc::Rc;

use smallvec::{SmallVec, smallvec};
use tracing::warn;

use crate::core::tester::{EllipseTester, Tester};
use crate::core::types::{Bounds, Point};

/// Depth at which leaves stop splitting and start collecting distinct points.
const MAX_DEPTH: usize = 64;

/// Maps a key to its position in index space.
pub type Projector<K> = Rc<dyn Fn(&K) -> Point>;

/// Visitor verdict for one node of a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitControl {
    /// Descend into the children of this node.
    Continue,
    /// Skip everything below this node.
    SkipSubtree,
}

#[derive(Debug, Clone, Copy)]
struct Entry<K> {
    point: Point,
    key: K,
}

#[derive(Debug, Clone)]
enum Node<K> {
    Leaf(SmallVec<[Entry<K>; 1]>),
    Internal(Box<[Option<Node<K>>; 4]>),
}

fn empty_children<K>() -> Box<[Option<Node<K>>; 4]> {
    Box::new([None, None, None, None])
}

fn quadrant_index(bounds: Bounds, point: Point) -> usize {
    let mid_x = (bounds.x0 + bounds.x1) * 0.5;
    let mid_y = (bounds.y0 + bounds.y1) * 0.5;
    (usize::from(point.y >= mid_y) << 1) | usize::from(point.x >= mid_x)
}

/// Half-open root containment: upper edges are outside, matching the
/// `>= mid` rule of `quadrant_index` once the root doubles.
fn covers(bounds: Bounds, point: Point) -> bool {
    point.x >= bounds.x0 && point.x < bounds.x1 && point.y >= bounds.y0 && point.y < bounds.y1
}

fn quadrant_bounds(bounds: Bounds, index: usize) -> Bounds {
    let mid_x = (bounds.x0 + bounds.x1) * 0.5;
    let mid_y = (bounds.y0 + bounds.y1) * 0.5;
    let (x0, x1) = if index & 1 == 0 {
        (bounds.x0, mid_x)
    } else {
        (mid_x, bounds.x1)
    };
    let (y0, y1) = if index & 2 == 0 {
        (bounds.y0, mid_y)
    } else {
        (mid_y, bounds.y1)
    };
    Bounds::new(x0, y0, x1, y1)
}

/// Borrowed view of one quadtree node handed to visitors.
#[derive(Debug)]
pub struct QuadNode<'a, K> {
    node: &'a Node<K>,
}

impl<K> Clone for QuadNode<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for QuadNode<'_, K> {}

impl<'a, K> QuadNode<'a, K> {
    #[must_use]
    pub fn is_leaf(self) -> bool {
        matches!(self.node, Node::Leaf(_))
    }

    /// Keys and positions stored directly in this node; empty for internal nodes.
    pub fn leaf_entries(self) -> impl Iterator<Item = (Point, &'a K)> {
        let entries: &'a [Entry<K>] = match self.node {
            Node::Leaf(entries) => entries,
            Node::Internal(_) => &[],
        };
        entries.iter().map(|entry| (entry.point, &entry.key))
    }

    /// First key found in a depth-first walk of the subtree.
    #[must_use]
    pub fn first_leaf(self) -> Option<&'a K> {
        match self.node {
            Node::Leaf(entries) => entries.first().map(|entry| &entry.key),
            Node::Internal(children) => children
                .iter()
                .flatten()
                .find_map(|child| QuadNode { node: child }.first_leaf()),
        }
    }

    #[must_use]
    pub fn subtree_size(self) -> usize {
        let mut count = 0;
        self.for_each(|_| count += 1);
        count
    }

    pub fn for_each<F>(self, mut callback: F)
    where
        F: FnMut(&'a K),
    {
        fn walk<'a, K, F: FnMut(&'a K)>(node: &'a Node<K>, callback: &mut F) {
            match node {
                Node::Leaf(entries) => entries.iter().for_each(|entry| callback(&entry.key)),
                Node::Internal(children) => {
                    for child in children.iter().flatten() {
                        walk(child, callback);
                    }
                }
            }
        }
        walk(self.node, &mut callback);
    }
}

/// Quadtree over keys projected into a stable 2D space.
pub struct SpatialIndex<K> {
    root: Option<Node<K>>,
    extent: Option<Bounds>,
    len: usize,
    projector: Projector<K>,
}

impl<K> fmt::Debug for SpatialIndex<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("len", &self.len)
            .field("extent", &self.extent)
            .finish_non_exhaustive()
    }
}

impl<K: Copy + PartialEq> SpatialIndex<K> {
    /// Creates an empty index using `projector` to position keys.
    #[must_use]
    pub fn new(projector: Projector<K>) -> Self {
        Self {
            root: None,
            extent: None,
            len: 0,
            projector,
        }
    }

    /// Builds an index from separate x/y accessors.
    pub fn from_accessors<I, X, Y>(items: I, x: X, y: Y) -> Self
    where
        I: IntoIterator<Item = K>,
        X: Fn(&K) -> f64 + 'static,
        Y: Fn(&K) -> f64 + 'static,
    {
        let projector: Projector<K> = Rc::new(move |key| Point::new(x(key), y(key)));
        Self::build(items, projector)
    }

    /// Builds an index over `items`, sizing the root box to their extent.
    pub fn build<I>(items: I, projector: Projector<K>) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let mut index = Self::new(projector);
        index.rebuild(items);
        index
    }

    /// Discards the current structure and indexes `items` from scratch.
    pub fn rebuild<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = K>,
    {
        let projector = Rc::clone(&self.projector);
        let entries: Vec<Entry<K>> = items
            .into_iter()
            .map(|key| Entry {
                point: projector(&key),
                key,
            })
            .collect();

        self.root = None;
        self.len = 0;
        self.extent = bounding_square(entries.iter().map(|entry| entry.point));
        for entry in entries {
            self.add_entry(entry);
        }
    }

    /// Empty index sharing this index's projector and root box.
    #[must_use]
    pub fn empty_like(&self) -> Self {
        Self {
            root: None,
            extent: self.extent,
            len: 0,
            projector: Rc::clone(&self.projector),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Root box of the index, `None` until the first point is added.
    #[must_use]
    pub fn extent(&self) -> Option<Bounds> {
        self.extent
    }

    #[must_use]
    pub fn root(&self) -> Option<QuadNode<'_, K>> {
        self.root.as_ref().map(|node| QuadNode { node })
    }

    #[must_use]
    pub fn project(&self, key: &K) -> Point {
        (self.projector)(key)
    }

    /// All keys in traversal order.
    #[must_use]
    pub fn data(&self) -> Vec<K> {
        let mut out = Vec::with_capacity(self.len);
        if let Some(root) = self.root() {
            root.for_each(|key| out.push(*key));
        }
        out
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        let point = self.project(key);
        let (Some(mut node), Some(mut bounds)) = (self.root.as_ref(), self.extent) else {
            return false;
        };
        loop {
            match node {
                Node::Leaf(entries) => return entries.iter().any(|entry| entry.key == *key),
                Node::Internal(children) => {
                    let index = quadrant_index(bounds, point);
                    let Some(child) = children[index].as_ref() else {
                        return false;
                    };
                    bounds = quadrant_bounds(bounds, index);
                    node = child;
                }
            }
        }
    }

    /// Adds one key; keys that project to a non-finite point are skipped.
    pub fn add(&mut self, key: K) -> bool {
        let point = self.project(&key);
        self.add_entry(Entry { point, key })
    }

    pub fn add_all<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = K>,
    {
        items.into_iter().filter(|key| self.add(*key)).count()
    }

    pub fn remove(&mut self, key: &K) -> bool {
        let Some(extent) = self.extent else {
            return false;
        };
        let point = self.project(key);
        let removed = remove_from(&mut self.root, extent, point, key);
        if removed {
            self.len -= 1;
        }
        removed
    }

    pub fn remove_all<'k, I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = &'k K>,
        K: 'k,
    {
        items.into_iter().filter(|key| self.remove(key)).count()
    }

    /// Removes every key but keeps the root box.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    fn add_entry(&mut self, entry: Entry<K>) -> bool {
        if !entry.point.is_finite() {
            warn!(x = entry.point.x, y = entry.point.y, "skip non-finite point");
            return false;
        }
        let extent = match self.extent {
            Some(extent) => self.cover(extent, entry.point),
            None => {
                let extent = Bounds::new(
                    entry.point.x,
                    entry.point.y,
                    entry.point.x + 1.0,
                    entry.point.y + 1.0,
                );
                self.extent = Some(extent);
                extent
            }
        };
        insert_into(&mut self.root, extent, entry, 0);
        self.len += 1;
        true
    }

    /// Doubles the root box towards `point` until it is covered.
    fn cover(&mut self, mut extent: Bounds, point: Point) -> Bounds {
        let mut side = extent.width();
        if side <= 0.0 {
            side = 1.0;
            extent = Bounds::new(extent.x0, extent.y0, extent.x0 + side, extent.y0 + side);
        }
        while !covers(extent, point) {
            let index = (usize::from(point.y < extent.y0) << 1) | usize::from(point.x < extent.x0);
            if let Some(root) = self.root.take() {
                let mut children = empty_children();
                children[index] = Some(root);
                self.root = Some(Node::Internal(children));
            }
            side *= 2.0;
            extent = match index {
                0 => Bounds::new(extent.x0, extent.y0, extent.x0 + side, extent.y0 + side),
                1 => Bounds::new(extent.x1 - side, extent.y0, extent.x1, extent.y0 + side),
                2 => Bounds::new(extent.x0, extent.y1 - side, extent.x0 + side, extent.y1),
                _ => Bounds::new(extent.x1 - side, extent.y1 - side, extent.x1, extent.y1),
            };
        }
        self.extent = Some(extent);
        extent
    }

    /// Pre-order traversal; children are visited in quadrant order.
    pub fn visit<'a, F>(&'a self, mut visitor: F)
    where
        F: FnMut(QuadNode<'a, K>, Bounds) -> VisitControl,
    {
        let (Some(root), Some(extent)) = (self.root.as_ref(), self.extent) else {
            return;
        };
        let mut stack: Vec<(&'a Node<K>, Bounds)> = vec![(root, extent)];
        while let Some((node, bounds)) = stack.pop() {
            if visitor(QuadNode { node }, bounds) == VisitControl::SkipSubtree {
                continue;
            }
            if let Node::Internal(children) = node {
                for index in (0..4).rev() {
                    if let Some(child) = children[index].as_ref() {
                        stack.push((child, quadrant_bounds(bounds, index)));
                    }
                }
            }
        }
    }

    /// Collects every key accepted by `tester`.
    ///
    /// Boxes whose four corners pass `test` are taken whole without testing
    /// their points; boxes failing `test_area` are pruned.
    pub fn find_by_tester<T>(&self, tester: &T) -> Vec<K>
    where
        T: Tester + ?Sized,
    {
        let mut found = Vec::new();
        self.visit(|node, bounds| {
            if bounds.corners().iter().all(|corner| tester.test(*corner)) {
                node.for_each(|key| found.push(*key));
                return VisitControl::SkipSubtree;
            }
            if tester.test_area(bounds) {
                found.extend(
                    node.leaf_entries()
                        .filter(|(point, _)| tester.test(*point))
                        .map(|(_, key)| *key),
                );
                return VisitControl::Continue;
            }
            VisitControl::SkipSubtree
        });
        found
    }

    /// Keys whose position lies inside the axis-aligned ellipse.
    #[must_use]
    pub fn query_ellipse(&self, cx: f64, cy: f64, rx: f64, ry: f64) -> Vec<K> {
        self.find_by_tester(&EllipseTester::new(Point::new(cx, cy), rx, ry))
    }

    /// Keys accepted by a polygon (or any other) point test plus box overlap test.
    pub fn query_polygon<F, G>(&self, test: F, test_area: G) -> Vec<K>
    where
        F: Fn(Point) -> bool,
        G: Fn(Bounds) -> bool,
    {
        self.find_by_tester(&crate::core::tester::FnTester::new(test, test_area))
    }
}

fn bounding_square<I>(points: I) -> Option<Bounds>
where
    I: IntoIterator<Item = Point>,
{
    let mut acc: Option<Bounds> = None;
    for point in points.into_iter().filter(|point| point.is_finite()) {
        acc = Some(match acc {
            None => Bounds::new(point.x, point.y, point.x, point.y),
            Some(b) => Bounds::new(
                b.x0.min(point.x),
                b.y0.min(point.y),
                b.x1.max(point.x),
                b.y1.max(point.y),
            ),
        });
    }
    acc.map(|b| {
        let side = b.width().max(b.height());
        let side = if side > 0.0 { side } else { 1.0 };
        Bounds::new(b.x0, b.y0, b.x0 + side, b.y0 + side)
    })
}

fn insert_into<K: Copy + PartialEq>(
    slot: &mut Option<Node<K>>,
    bounds: Bounds,
    entry: Entry<K>,
    depth: usize,
) {
    match slot {
        None => *slot = Some(Node::Leaf(smallvec![entry])),
        Some(Node::Internal(children)) => {
            let index = quadrant_index(bounds, entry.point);
            insert_into(
                &mut children[index],
                quadrant_bounds(bounds, index),
                entry,
                depth + 1,
            );
        }
        Some(Node::Leaf(entries)) => {
            let coincident = entries
                .first()
                .is_some_and(|first| first.point == entry.point);
            if coincident || depth >= MAX_DEPTH {
                entries.push(entry);
                return;
            }
            let existing = std::mem::take(entries);
            let mut split = Some(Node::Internal(empty_children()));
            for old in existing {
                insert_into(&mut split, bounds, old, depth);
            }
            insert_into(&mut split, bounds, entry, depth);
            *slot = split;
        }
    }
}

enum Collapse {
    Keep,
    Empty,
    Promote(usize),
}

fn remove_from<K: Copy + PartialEq>(
    slot: &mut Option<Node<K>>,
    bounds: Bounds,
    point: Point,
    key: &K,
) -> bool {
    let collapse = match slot.as_mut() {
        None => return false,
        Some(Node::Leaf(entries)) => {
            let Some(position) = entries.iter().position(|entry| entry.key == *key) else {
                return false;
            };
            entries.remove(position);
            if entries.is_empty() {
                Collapse::Empty
            } else {
                Collapse::Keep
            }
        }
        Some(Node::Internal(children)) => {
            let index = quadrant_index(bounds, point);
            if !remove_from(
                &mut children[index],
                quadrant_bounds(bounds, index),
                point,
                key,
            ) {
                return false;
            }
            let occupied: SmallVec<[usize; 4]> = (0..4).filter(|i| children[*i].is_some()).collect();
            match occupied.as_slice() {
                [] => Collapse::Empty,
                [only] if matches!(children[*only], Some(Node::Leaf(_))) => Collapse::Promote(*only),
                _ => Collapse::Keep,
            }
        }
    };

    match collapse {
        Collapse::Keep => {}
        Collapse::Empty => *slot = None,
        Collapse::Promote(index) => {
            let promoted = match slot.as_mut() {
                Some(Node::Internal(children)) => children[index].take(),
                _ => None,
            };
            *slot = promoted;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::{Projector, SpatialIndex, VisitControl};
    use crate::core::types::Point;

    fn grid_index(n: usize) -> (Vec<Point>, SpatialIndex<usize>) {
        let points: Vec<Point> = (0..n * n)
            .map(|i| Point::new((i % n) as f64, (i / n) as f64))
            .collect();
        let lookup = Rc::new(points.clone());
        let projector: Projector<usize> = Rc::new(move |i| lookup[*i]);
        let index = SpatialIndex::build(0..n * n, projector);
        (points, index)
    }

    #[test]
    fn empty_index_queries_return_nothing() {
        let projector: Projector<usize> = Rc::new(|_| Point::new(0.0, 0.0));
        let index = SpatialIndex::new(projector);
        assert!(index.query_ellipse(0.0, 0.0, 10.0, 10.0).is_empty());
        assert!(index.root().is_none());
        assert!(index.data().is_empty());
    }

    #[test]
    fn ellipse_query_matches_brute_force() {
        let (points, index) = grid_index(20);
        let mut found = index.query_ellipse(7.5, 9.0, 3.2, 2.1);
        found.sort_unstable();
        let expected: Vec<usize> = points
            .iter()
            .enumerate()
            .filter(|(_, p)| {
                ((p.x - 7.5) / 3.2).powi(2) + ((p.y - 9.0) / 2.1).powi(2) <= 1.0
            })
            .map(|(i, _)| i)
            .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn remove_collapses_and_keeps_other_keys() {
        let (_, mut index) = grid_index(4);
        assert_eq!(index.len(), 16);
        assert!(index.remove(&5));
        assert!(!index.remove(&5));
        assert!(!index.contains(&5));
        assert!(index.contains(&6));
        assert_eq!(index.len(), 15);
        let removed = index.remove_all(&[0, 1, 2, 3]);
        assert_eq!(removed, 4);
        assert_eq!(index.data().len(), 11);
    }

    #[test]
    fn add_outside_extent_grows_root() {
        let projector: Projector<usize> = Rc::new(|i| Point::new(-10.0 * *i as f64, 50.0));
        let mut index = SpatialIndex::new(projector);
        assert!(index.add(1));
        let before = index.extent().expect("extent");
        assert!(index.add(2));
        let after = index.extent().expect("extent");
        assert!(after.width() > before.width());
        assert!(after.contains(Point::new(-20.0, 50.0)));
        assert!(after.contains(Point::new(-10.0, 50.0)));
        assert_eq!(index.len(), 2);
        assert!(index.contains(&1));
        assert!(index.contains(&2));
    }

    #[test]
    fn point_on_upper_edge_stays_removable_after_growth() {
        let points = [Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 0.5)];
        let projector: Projector<usize> = Rc::new(move |i| points[*i]);
        let mut index = SpatialIndex::new(projector);
        assert_eq!(index.add_all(0..3), 3);

        assert!(index.contains(&1));
        assert_eq!(index.remove_all(&[1]), 1);
        assert!(!index.contains(&1));
        let mut rest = index.data();
        rest.sort_unstable();
        assert_eq!(rest, vec![0, 2]);
    }

    #[test]
    fn built_index_keeps_extent_maximum_removable_after_growth() {
        let points = [Point::new(0.0, 0.0), Point::new(4.0, 4.0), Point::new(9.0, 1.0)];
        let projector: Projector<usize> = Rc::new(move |i| points[*i]);
        let mut index = SpatialIndex::build(0..2, projector);
        assert!(index.add(2));
        for key in 0..3 {
            assert!(index.contains(&key), "key {key} lost after growth");
        }
        assert_eq!(index.remove_all(&[1, 2, 0]), 3);
        assert!(index.is_empty());
    }

    #[test]
    fn non_finite_points_are_skipped() {
        let projector: Projector<usize> =
            Rc::new(|i| if *i == 1 { Point::new(f64::NAN, 0.0) } else { Point::new(*i as f64, 0.0) });
        let index = SpatialIndex::build(0..3, projector);
        assert_eq!(index.len(), 2);
        assert!(!index.contains(&1));
    }

    #[test]
    fn coincident_points_share_a_leaf() {
        let projector: Projector<usize> = Rc::new(|_| Point::new(1.0, 1.0));
        let index = SpatialIndex::build(0..5, projector);
        let root = index.root().expect("root");
        assert!(root.is_leaf());
        assert_eq!(root.subtree_size(), 5);
        assert_eq!(root.first_leaf().copied(), Some(0));
    }

    #[test]
    fn visit_skip_prunes_subtree() {
        let (_, index) = grid_index(8);
        let mut visited = 0;
        index.visit(|_, _| {
            visited += 1;
            VisitControl::SkipSubtree
        });
        assert_eq!(visited, 1);
    }
}
