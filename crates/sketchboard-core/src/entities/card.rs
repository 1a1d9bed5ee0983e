//! Response card entity: a resizable panel holding generated analysis text.

use super::{BoxEntity, EntityId, new_entity_id};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// A movable, resizable card displaying analysis output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseCard {
    pub(crate) id: EntityId,
    pub position: Point,
    pub size: Size,
    pub content: String,
    pub is_visible: bool,
    /// True while a resize gesture owns this card.
    pub is_resizing: bool,
}

/// Partial update applied by [`ResponseCard::apply`]. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardPatch {
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub content: Option<String>,
    pub is_visible: Option<bool>,
}

impl ResponseCard {
    pub const DEFAULT_SIZE: Size = Size::new(400.0, 300.0);
    pub const MIN_SIZE: Size = Size::new(200.0, 150.0);
    /// Side length of the bottom-right resize handle, in screen pixels.
    pub const RESIZE_HANDLE: f64 = 16.0;

    pub fn new(position: Point, size: Size, content: impl Into<String>) -> Self {
        Self {
            id: new_entity_id(),
            position,
            size,
            content: content.into(),
            is_visible: true,
            is_resizing: false,
        }
    }

    /// Apply a partial update, keeping the size at least `min`.
    /// Returns true if anything changed.
    pub fn apply(&mut self, patch: CardPatch, min: Size) -> bool {
        let before = self.clone();
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(size) = patch.size {
            self.size = Size::new(size.width.max(min.width), size.height.max(min.height));
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(visible) = patch.is_visible {
            self.is_visible = visible;
        }
        *self != before
    }

    /// Grow or shrink by a world-space delta, never below `min`.
    pub fn resize_by(&mut self, delta: Vec2, min: Size) {
        self.size = Size::new(
            (self.size.width + delta.x).max(min.width),
            (self.size.height + delta.y).max(min.height),
        );
    }

    /// True if `point` lies on the bottom-right resize handle.
    ///
    /// `handle` is the handle's side length in world units.
    pub fn hit_resize_handle(&self, point: Point, handle: f64) -> bool {
        if !self.is_visible {
            return false;
        }
        let bounds = self.bounds();
        point.x >= bounds.x1 - handle
            && point.x <= bounds.x1
            && point.y >= bounds.y1 - handle
            && point.y <= bounds.y1
    }
}

impl BoxEntity for ResponseCard {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    fn size(&self) -> Size {
        self.size
    }

    fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    fn hit_test(&self, point: Point) -> bool {
        self.is_visible && self.bounds().contains(point)
    }
}
