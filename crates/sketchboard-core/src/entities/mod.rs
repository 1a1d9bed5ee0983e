//! Entity definitions for the canvas.

mod card;
mod note;
mod stroke;
mod text;

pub use card::{CardPatch, ResponseCard};
pub use note::{NOTE_STYLES, NoteEntity, NoteStyle};
pub use stroke::Stroke;
pub use text::{FontFamily, TextEntity, TextStyle};

use kurbo::{Point, Rect, Size, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for entities.
pub type EntityId = Uuid;

/// Generate a fresh, time-ordered entity id.
pub fn new_entity_id() -> EntityId {
    Uuid::now_v7()
}

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RgbaColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl RgbaColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        match hex.len() {
            3 => Some(Self::new(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
                255,
            )),
            6 => Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 => Some(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        }
    }

    /// Parse a hex color or one of the palette's named colors.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.starts_with('#') {
            return Self::from_hex(value);
        }
        let color = match value.to_ascii_lowercase().as_str() {
            "black" => Self::black(),
            "white" => Self::white(),
            "transparent" => Self::transparent(),
            "red" => Self::new(255, 0, 0, 255),
            "green" => Self::new(0, 128, 0, 255),
            "blue" => Self::new(0, 0, 255, 255),
            "yellow" => Self::new(255, 255, 0, 255),
            "orange" => Self::new(255, 165, 0, 255),
            "purple" => Self::new(128, 0, 128, 255),
            "gray" | "grey" => Self::new(128, 128, 128, 255),
            _ => return None,
        };
        Some(color)
    }
}

impl Default for RgbaColor {
    fn default() -> Self {
        Self::black()
    }
}

impl From<Color> for RgbaColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<RgbaColor> for Color {
    fn from(color: RgbaColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Which collection a box entity lives in, plus its id.
///
/// Used wherever the engine needs to point at an entity without owning it
/// (edit target, drag target). Lookups through a stale ref simply fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityRef {
    Text(EntityId),
    Note(EntityId),
    Card(EntityId),
}

impl EntityRef {
    pub fn id(&self) -> EntityId {
        match self {
            EntityRef::Text(id) | EntityRef::Note(id) | EntityRef::Card(id) => *id,
        }
    }

    /// Whether this entity supports text editing.
    pub fn is_editable(&self) -> bool {
        matches!(self, EntityRef::Text(_) | EntityRef::Note(_))
    }
}

/// Common behavior of rectangular, positioned entities.
pub trait BoxEntity {
    /// Get the unique identifier.
    fn id(&self) -> EntityId;

    /// Top-left corner in world coordinates.
    fn position(&self) -> Point;

    fn set_position(&mut self, position: Point);

    /// Box size in world units.
    fn size(&self) -> Size;

    fn set_size(&mut self, size: Size);

    /// Bounding box in world coordinates.
    fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position(), self.size())
    }

    /// Check if a world point falls inside the box.
    fn hit_test(&self, point: Point) -> bool {
        self.bounds().contains(point)
    }

    /// Move the box by a world-space delta.
    fn translate(&mut self, delta: Vec2) {
        let position = self.position() + delta;
        self.set_position(position);
    }
}

/// Entities whose content the user edits in place.
pub trait EditableEntity: BoxEntity {
    fn content(&self) -> &str;

    fn set_content(&mut self, content: String);

    fn is_editing(&self) -> bool;

    fn set_editing(&mut self, editing: bool);
}
