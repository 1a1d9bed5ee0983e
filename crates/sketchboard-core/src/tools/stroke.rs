//! Pointer-drag to stroke capture.

use crate::entities::{EntityId, RgbaColor, Stroke};
use crate::store::EntityStore;
use kurbo::Point;

/// Capture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeState {
    #[default]
    Idle,
    /// A stroke is being drawn; it is the last stroke in the store.
    Capturing { stroke: EntityId },
}

/// Turns pencil gestures into strokes.
///
/// The stroke lives in the store while it is captured so it can be painted
/// live. Thickness is given in screen pixels and divided by the current
/// scale on every sample.
#[derive(Debug, Clone, Default)]
pub struct StrokeEngine {
    state: StrokeState,
}

impl StrokeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.state, StrokeState::Capturing { .. })
    }

    /// Start a stroke at `point` (world space).
    pub fn begin(
        &mut self,
        store: &mut EntityStore,
        point: Point,
        thickness_px: f64,
        scale: f64,
        color: RgbaColor,
    ) -> EntityId {
        let id = store.add_stroke(Stroke::new(point, thickness_px / scale, color));
        self.state = StrokeState::Capturing { stroke: id };
        log::debug!("stroke begun at ({:.1}, {:.1})", point.x, point.y);
        id
    }

    /// Append a sample. Returns false when idle or the stroke has vanished.
    pub fn extend(
        &mut self,
        store: &mut EntityStore,
        point: Point,
        thickness_px: f64,
        scale: f64,
    ) -> bool {
        let StrokeState::Capturing { stroke } = self.state else {
            return false;
        };
        match store.last_stroke_mut() {
            Some(last) if last.id() == stroke => {
                last.push_point(point);
                last.thickness = thickness_px / scale;
                true
            }
            _ => {
                log::warn!("captured stroke {} is no longer in the store", stroke);
                self.state = StrokeState::Idle;
                false
            }
        }
    }

    /// Freeze the stroke. Returns its id when a capture was in progress;
    /// that is the history commit point.
    pub fn finish(&mut self) -> Option<EntityId> {
        let StrokeState::Capturing { stroke } = std::mem::take(&mut self.state) else {
            return None;
        };
        log::debug!("stroke {} committed", stroke);
        Some(stroke)
    }
}
