//! Whole-stroke eraser.

use crate::entities::Stroke;
use crate::store::EntityStore;
use kurbo::Point;

/// Index of the topmost stroke with any point strictly within `radius` of
/// `point`. Strokes are searched newest first.
pub fn hit_test(strokes: &[Stroke], point: Point, radius: f64) -> Option<usize> {
    strokes
        .iter()
        .enumerate()
        .rev()
        .find(|(_, stroke)| stroke.touches(point, radius))
        .map(|(index, _)| index)
}

/// Eraser gesture state: whether the current drag has removed anything.
#[derive(Debug, Clone, Default)]
pub struct EraserEngine {
    active: bool,
    erased: usize,
}

impl EraserEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Start an erase gesture.
    pub fn begin(&mut self) {
        self.active = true;
        self.erased = 0;
    }

    /// Remove the topmost stroke under `point`. A miss is a no-op.
    pub fn erase_at(
        &mut self,
        store: &mut EntityStore,
        point: Point,
        radius: f64,
    ) -> Option<Stroke> {
        if !self.active {
            return None;
        }
        let index = hit_test(store.strokes(), point, radius)?;
        let removed = store.remove_stroke_at(index)?;
        self.erased += 1;
        log::debug!("eraser removed stroke {}", removed.id());
        Some(removed)
    }

    /// End the gesture. Returns true if anything was erased, which makes the
    /// gesture a history step.
    pub fn finish(&mut self) -> bool {
        let erased = self.active && self.erased > 0;
        self.active = false;
        self.erased = 0;
        erased
    }
}
