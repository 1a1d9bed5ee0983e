//! Sticky note entity.

use super::{BoxEntity, EditableEntity, EntityId, RgbaColor, TextStyle, new_entity_id};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// A named visual preset for notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteStyle {
    pub id: &'static str,
    pub name: &'static str,
    pub background: RgbaColor,
    pub border: RgbaColor,
    pub accent: RgbaColor,
}

/// Available note presets. The first entry is the default.
pub const NOTE_STYLES: &[NoteStyle] = &[
    NoteStyle {
        id: "yellow-note",
        name: "Yellow Note",
        background: RgbaColor::new(0xff, 0xf9, 0xc4, 0xff),
        border: RgbaColor::new(0xff, 0xeb, 0x3b, 0xff),
        accent: RgbaColor::new(0xff, 0xd6, 0x00, 0xff),
    },
    NoteStyle {
        id: "blue-note",
        name: "Blue Note",
        background: RgbaColor::new(0xe3, 0xf2, 0xfd, 0xff),
        border: RgbaColor::new(0x90, 0xca, 0xf9, 0xff),
        accent: RgbaColor::new(0x21, 0x96, 0xf3, 0xff),
    },
];

impl NoteStyle {
    /// Look up a preset by id, falling back to the default preset.
    pub fn lookup(id: &str) -> &'static NoteStyle {
        NOTE_STYLES
            .iter()
            .find(|style| style.id == id)
            .unwrap_or(&NOTE_STYLES[0])
    }

    /// Id of the default preset.
    pub fn default_id() -> &'static str {
        NOTE_STYLES[0].id
    }
}

/// A sticky note: a text box with a colored preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEntity {
    pub(crate) id: EntityId,
    pub position: Point,
    pub size: Size,
    pub content: String,
    pub style: TextStyle,
    /// Id of a preset in [`NOTE_STYLES`].
    pub style_id: String,
    pub is_editing: bool,
}

impl NoteEntity {
    /// Create an empty note. New notes start in edit mode.
    pub fn new(position: Point, size: Size, style: TextStyle, style_id: impl Into<String>) -> Self {
        Self {
            id: new_entity_id(),
            position,
            size,
            content: String::new(),
            style,
            style_id: style_id.into(),
            is_editing: true,
        }
    }

    /// Resolved visual preset.
    pub fn preset(&self) -> &'static NoteStyle {
        NoteStyle::lookup(&self.style_id)
    }
}

impl BoxEntity for NoteEntity {
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

impl EditableEntity for NoteEntity {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_lookup() {
        assert_eq!(NoteStyle::lookup("blue-note").name, "Blue Note");
        assert_eq!(NoteStyle::lookup("missing").id, "yellow-note");
        assert_eq!(NoteStyle::default_id(), "yellow-note");
    }

    #[test]
    fn test_note_preset_colors() {
        let note = NoteEntity::new(
            Point::ZERO,
            Size::new(200.0, 200.0),
            TextStyle::default(),
            "blue-note",
        );
        assert_eq!(note.preset().accent, RgbaColor::new(0x21, 0x96, 0xf3, 0xff));
        assert!(note.is_editing());
    }
}
