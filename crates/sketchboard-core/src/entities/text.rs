//! Rich text box entity.

use super::{BoxEntity, EditableEntity, EntityId, new_entity_id};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Font family options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontFamily {
    #[default]
    Sans,
    Serif,
    Mono,
    Handwritten,
}

impl FontFamily {
    /// Get the font family name as used by the renderer.
    pub fn name(&self) -> &'static str {
        match self {
            FontFamily::Sans => "sans-serif",
            FontFamily::Serif => "serif",
            FontFamily::Mono => "monospace",
            FontFamily::Handwritten => "cursive",
        }
    }

    /// Get all available font families.
    pub fn all() -> &'static [FontFamily] {
        &[
            FontFamily::Sans,
            FontFamily::Serif,
            FontFamily::Mono,
            FontFamily::Handwritten,
        ]
    }
}

/// Text styling shared by text boxes and notes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in world units.
    pub font_size: f64,
    pub font_family: FontFamily,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: TextEntity::DEFAULT_FONT_SIZE,
            font_family: FontFamily::default(),
            bold: false,
            italic: false,
            underline: false,
        }
    }
}

/// A fixed-size box of text placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEntity {
    pub(crate) id: EntityId,
    /// Top-left corner in world coordinates.
    pub position: Point,
    /// Box size in world units.
    pub size: Size,
    pub content: String,
    pub style: TextStyle,
    pub is_editing: bool,
}

impl TextEntity {
    /// Default font size in world units at scale 1.
    pub const DEFAULT_FONT_SIZE: f64 = 16.0;

    /// Create an empty text box. New boxes start in edit mode.
    pub fn new(position: Point, size: Size, style: TextStyle) -> Self {
        Self {
            id: new_entity_id(),
            position,
            size,
            content: String::new(),
            style,
            is_editing: true,
        }
    }
}

impl BoxEntity for TextEntity {
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
}

impl EditableEntity for TextEntity {
    fn content(&self) -> &str {
        &self.content
    }

    fn set_content(&mut self, content: String) {
        self.content = content;
    }

    fn is_editing(&self) -> bool {
        self.is_editing
    }

    fn set_editing(&mut self, editing: bool) {
        self.is_editing = editing;
    }
}
