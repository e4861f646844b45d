use crate::core::Bounds;
use crate::error::PlotResult;

use super::Primitive;

/// Retained drawing surface: an ordered list of primitives in pixel space.
///
/// A render pass clears the surface and refills it; backends replay the list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Surface {
    primitives: Vec<Primitive>,
    clip: Option<Bounds>,
}

impl Surface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.primitives.clear();
    }

    pub fn push(&mut self, primitive: impl Into<Primitive>) {
        self.primitives.push(primitive.into());
    }

    pub fn extend<I>(&mut self, primitives: I)
    where
        I: IntoIterator<Item = Primitive>,
    {
        self.primitives.extend(primitives);
    }

    #[must_use]
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Pixel rectangle backends clip this surface to, if any.
    #[must_use]
    pub fn clip(&self) -> Option<Bounds> {
        self.clip
    }

    pub fn set_clip(&mut self, clip: Option<Bounds>) {
        self.clip = clip;
    }

    /// Copies the content of `source` shifted by `(dx, dy)` on top of this surface.
    pub fn blit_from(&mut self, source: &Surface, dx: f64, dy: f64) {
        self.primitives
            .extend(source.primitives.iter().map(|p| p.translated(dx, dy)));
    }

    #[must_use]
    pub fn mark_count(&self) -> usize {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Mark(_)))
            .count()
    }

    pub fn validate(&self) -> PlotResult<()> {
        self.primitives.iter().try_for_each(Primitive::validate)
    }
}

/// The two stacked plot surfaces.
///
/// `committed` holds the point cloud, `working` the selection overlay. The
/// pan fast path paints the shifted point cloud into `working` and swaps, so
/// the roles of the two buffers change hands explicitly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfacePair {
    pub committed: Surface,
    pub working: Surface,
}

impl SurfacePair {
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.committed, &mut self.working);
    }

    pub fn set_clip(&mut self, clip: Option<Bounds>) {
        self.committed.set_clip(clip);
        self.working.set_clip(clip);
    }
}

#[cfg(test)]
mod tests {
    use super::{Surface, SurfacePair};
    use crate::render::{Color, MarkPrimitive, MarkShape, Primitive};

    fn mark(x: f64) -> MarkPrimitive {
        MarkPrimitive::new(x, 5.0, MarkShape::Circle, 2.0, Color::STEEL_BLUE)
    }

    #[test]
    fn blit_shifts_source_primitives() {
        let mut source = Surface::new();
        source.push(mark(10.0));
        let mut target = Surface::new();
        target.blit_from(&source, 4.0, -1.0);
        let Primitive::Mark(moved) = &target.primitives()[0] else {
            panic!("expected mark");
        };
        assert_eq!((moved.x, moved.y), (14.0, 4.0));
        assert_eq!(source.mark_count(), 1);
    }

    #[test]
    fn swap_exchanges_roles() {
        let mut pair = SurfacePair::default();
        pair.committed.push(mark(1.0));
        pair.swap();
        assert!(pair.committed.is_empty());
        assert_eq!(pair.working.len(), 1);
    }
}
