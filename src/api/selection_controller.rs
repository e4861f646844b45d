use tracing::debug;

use crate::core::{RecordId, Tester};
use crate::error::PlotResult;
use crate::render::{RenderReason, Renderer};

use super::{Scatterplot, ScatterplotEvent};

impl<T, R: Renderer, U> Scatterplot<T, R, U> {
    /// Selected ids in selection order; empty when selection is disabled.
    #[must_use]
    pub fn selection(&self) -> Vec<RecordId> {
        if !self.selection_enabled() {
            return Vec::new();
        }
        self.selection.ids()
    }

    #[must_use]
    pub fn selected_records(&self) -> Vec<&T> {
        self.selection()
            .into_iter()
            .filter_map(|id| self.primary.record(id))
            .collect()
    }

    #[must_use]
    pub fn is_selected(&self, id: RecordId) -> bool {
        self.selection.contains(id)
    }

    /// Replaces the selection. Returns whether it changed; listeners and
    /// the selection layer are only touched on change.
    pub fn set_selection(&mut self, ids: &[RecordId]) -> PlotResult<bool> {
        self.set_selection_impl(ids, false)
    }

    pub fn clear_selection(&mut self) -> PlotResult<bool> {
        self.clear_selection_impl(false)
    }

    /// Adds `ids`; returns `false` for an empty request or disabled selection.
    pub fn add_to_selection(&mut self, ids: &[RecordId]) -> PlotResult<bool> {
        if ids.is_empty() || !self.selection_enabled() {
            return Ok(false);
        }
        self.selection.add_all(ids);
        self.selection_changed(false)?;
        Ok(true)
    }

    /// Removes `ids`; returns `false` for an empty request or disabled selection.
    pub fn remove_from_selection(&mut self, ids: &[RecordId]) -> PlotResult<bool> {
        if ids.is_empty() || !self.selection_enabled() {
            return Ok(false);
        }
        self.selection.remove_all(ids);
        self.selection_changed(false)?;
        Ok(true)
    }

    /// Selects every primary record accepted by `tester` (in index space).
    pub fn select_with_tester<S>(&mut self, tester: &S) -> PlotResult<bool>
    where
        S: Tester + ?Sized,
    {
        self.select_with_tester_impl(tester, false)
    }

    pub(super) fn select_with_tester_impl<S>(
        &mut self,
        tester: &S,
        in_progress: bool,
    ) -> PlotResult<bool>
    where
        S: Tester + ?Sized,
    {
        let ids = self.primary.index().find_by_tester(tester);
        debug!(matched = ids.len(), in_progress, "tester selection");
        self.set_selection_impl(&ids, in_progress)
    }

    pub(super) fn set_selection_impl(
        &mut self,
        ids: &[RecordId],
        in_progress: bool,
    ) -> PlotResult<bool> {
        if !self.selection_enabled() {
            return Ok(false);
        }
        if ids.is_empty() {
            return self.clear_selection_impl(in_progress);
        }
        if !self.selection.apply(ids) {
            return Ok(false);
        }
        self.selection_changed(in_progress)?;
        Ok(true)
    }

    pub(super) fn clear_selection_impl(&mut self, in_progress: bool) -> PlotResult<bool> {
        if !self.selection_enabled() || !self.selection.clear() {
            return Ok(false);
        }
        self.selection_changed(in_progress)?;
        Ok(true)
    }

    fn selection_changed(&mut self, in_progress: bool) -> PlotResult<()> {
        let selection = self.selection.ids();
        self.emit(if in_progress {
            ScatterplotEvent::SelectionInProgress { selection }
        } else {
            ScatterplotEvent::SelectionChanged { selection }
        });
        self.render_with(RenderReason::SelectionChanged, Default::default())
    }
}
