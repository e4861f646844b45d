use tracing::debug;

use crate::core::{Point, RecordId};
use crate::error::{PlotError, PlotResult};
use crate::render::Renderer;

use super::Scatterplot;

impl<T, R: Renderer, U> Scatterplot<T, R, U> {
    /// Replaces the primary records and repaints.
    ///
    /// Scale domains and the zoom transform are kept; the selection is
    /// dropped because record ids refer to the previous data.
    pub fn set_data(&mut self, records: Vec<T>) -> PlotResult<()> {
        self.primary
            .replace(records, self.space.domain_to_normalized());
        self.selection.reset(self.primary.index());
        debug!(records = self.primary.len(), "replaced primary data");
        self.render()
    }

    /// Replaces the secondary records of a dual-axis plot and repaints.
    pub fn set_secondary_data(&mut self, records: Vec<U>) -> PlotResult<()> {
        let to_normalized = self.space.domain_to_normalized_y2();
        let (Some(secondary), Some(to_normalized)) = (self.secondary.as_mut(), to_normalized)
        else {
            return Err(PlotError::InvalidData(
                "plot has no secondary axis".to_owned(),
            ));
        };
        secondary.replace(records, to_normalized);
        debug!(records = secondary.len(), "replaced secondary data");
        self.render()
    }

    #[must_use]
    pub fn secondary_records(&self) -> &[U] {
        self.secondary
            .as_ref()
            .map(|series| series.records())
            .unwrap_or_default()
    }

    /// Primary records under a surface pixel, within the click radius.
    #[must_use]
    pub fn find_items(&self, position: Point) -> Vec<RecordId> {
        let center = self.space.surface_to_normalized(position);
        let (rx, ry) = self.space.normalized_click_radius(self.config.click_radius_px);
        self.primary
            .index()
            .query_ellipse(center.x, center.y, rx, ry)
    }
}
