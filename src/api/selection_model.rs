use indexmap::IndexSet;

use crate::core::{RecordId, SpatialIndex};

/// Committed selection: a secondary spatial index over a subset of the
/// primary records plus an ordered membership set for O(1) lookups.
#[derive(Debug)]
pub struct SelectionModel {
    index: SpatialIndex<RecordId>,
    members: IndexSet<RecordId>,
}

impl SelectionModel {
    /// Empty selection sharing the projector of `primary`.
    #[must_use]
    pub fn for_index(primary: &SpatialIndex<RecordId>) -> Self {
        Self {
            index: primary.empty_like(),
            members: IndexSet::new(),
        }
    }

    #[must_use]
    pub fn index(&self) -> &SpatialIndex<RecordId> {
        &self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: RecordId) -> bool {
        self.members.contains(&id)
    }

    /// Members in the order they were added.
    #[must_use]
    pub fn ids(&self) -> Vec<RecordId> {
        self.members.iter().copied().collect()
    }

    /// Makes the membership equal to `ids`, touching only the difference.
    ///
    /// Returns whether membership changed.
    pub fn apply(&mut self, ids: &[RecordId]) -> bool {
        let target: IndexSet<RecordId> = ids.iter().copied().collect();
        let stale: Vec<RecordId> = self
            .members
            .iter()
            .filter(|id| !target.contains(*id))
            .copied()
            .collect();

        let mut changed = false;
        for id in target.iter().copied() {
            if !self.members.contains(&id) && self.insert(id) {
                changed = true;
            }
        }
        for id in &stale {
            self.index.remove(id);
            self.members.shift_remove(id);
        }
        changed || !stale.is_empty()
    }

    /// Adds every id not yet selected. Returns how many were added.
    pub fn add_all(&mut self, ids: &[RecordId]) -> usize {
        ids.iter().filter(|id| self.insert(**id)).count()
    }

    /// Removes every selected id in `ids`. Returns how many were removed.
    pub fn remove_all(&mut self, ids: &[RecordId]) -> usize {
        ids.iter()
            .filter(|id| {
                if self.members.shift_remove(*id) {
                    self.index.remove(id);
                    true
                } else {
                    false
                }
            })
            .count()
    }

    /// Empties the selection; returns whether anything was selected.
    pub fn clear(&mut self) -> bool {
        let changed = !self.members.is_empty();
        self.index.clear();
        self.members.clear();
        changed
    }

    /// Drops the selection and rebinds it to a rebuilt primary index.
    pub fn reset(&mut self, primary: &SpatialIndex<RecordId>) {
        *self = Self::for_index(primary);
    }

    fn insert(&mut self, id: RecordId) -> bool {
        if self.members.contains(&id) || !self.index.add(id) {
            return false;
        }
        self.members.insert(id);
        true
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::SelectionModel;
    use crate::core::{Point, Projector, RecordId, SpatialIndex};

    fn primary(n: usize) -> SpatialIndex<RecordId> {
        let projector: Projector<RecordId> = Rc::new(move |id| {
            if id.index() < n {
                Point::new(id.index() as f64, 0.0)
            } else {
                Point::new(f64::NAN, f64::NAN)
            }
        });
        SpatialIndex::build((0..n).map(RecordId::new), projector)
    }

    fn ids(raw: &[usize]) -> Vec<RecordId> {
        raw.iter().copied().map(RecordId::new).collect()
    }

    #[test]
    fn apply_reports_change_only_once() {
        let mut model = SelectionModel::for_index(&primary(10));
        assert!(model.apply(&ids(&[1, 2, 3])));
        assert!(!model.apply(&ids(&[3, 2, 1])));
        assert_eq!(model.len(), 3);
    }

    #[test]
    fn apply_touches_only_the_difference() {
        let mut model = SelectionModel::for_index(&primary(10));
        model.apply(&ids(&[1, 2, 3]));
        assert!(model.apply(&ids(&[2, 3, 4])));
        assert_eq!(model.ids(), ids(&[2, 3, 4]));
        assert!(!model.index().contains(&RecordId::new(1)));
        assert!(model.index().contains(&RecordId::new(4)));
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut model = SelectionModel::for_index(&primary(3));
        assert_eq!(model.add_all(&ids(&[0, 7])), 1);
        assert!(model.contains(RecordId::new(0)));
        assert!(!model.contains(RecordId::new(7)));
    }

    #[test]
    fn remove_all_and_clear() {
        let mut model = SelectionModel::for_index(&primary(5));
        model.add_all(&ids(&[0, 1, 2]));
        assert_eq!(model.remove_all(&ids(&[1, 4])), 1);
        assert_eq!(model.index().len(), 2);
        assert!(model.clear());
        assert!(!model.clear());
        assert!(model.index().is_empty());
    }
}
