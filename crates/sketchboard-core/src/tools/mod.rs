//! Tool system for the canvas.

mod eraser;
mod stroke;

pub use eraser::{EraserEngine, hit_test};
pub use stroke::{StrokeEngine, StrokeState};

use crate::config::CanvasConfig;
use crate::entities::{FontFamily, NoteStyle, RgbaColor, TextStyle};
use serde::{Deserialize, Serialize};

/// Available tools. `None` means no tool is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    None,
    Pencil,
    Eraser,
    Text,
    Note,
    Grid,
}

impl ToolKind {
    /// Tools under which a drag on empty canvas pans and a drag on a box moves it.
    pub fn is_navigation(&self) -> bool {
        matches!(self, ToolKind::None | ToolKind::Grid)
    }
}

/// Canvas background pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GridStyle {
    #[default]
    None,
    Lines,
    Dots,
}

impl GridStyle {
    /// Cycle to the next grid style.
    pub fn next(self) -> Self {
        match self {
            GridStyle::None => GridStyle::Lines,
            GridStyle::Lines => GridStyle::Dots,
            GridStyle::Dots => GridStyle::None,
        }
    }

    /// Get display name for this grid style.
    pub fn name(self) -> &'static str {
        match self {
            GridStyle::None => "None",
            GridStyle::Lines => "Lines",
            GridStyle::Dots => "Dots",
        }
    }
}

/// Current tool plus the style settings new entities are created with.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Requested pencil width in screen pixels.
    pub pencil_thickness: f64,
    pub pencil_color: RgbaColor,
    /// Eraser radius in screen pixels.
    pub eraser_size: f64,
    /// Style for new text boxes and notes. Font size is in screen pixels.
    pub text_style: TextStyle,
    /// Preset id for new notes.
    pub note_style: String,
    pub grid_style: GridStyle,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::from_config(&CanvasConfig::default())
    }
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tool defaults taken from a configuration.
    pub fn from_config(config: &CanvasConfig) -> Self {
        Self {
            current_tool: ToolKind::default(),
            pencil_thickness: config.pencil_thickness,
            pencil_color: config.pencil_color,
            eraser_size: config.eraser_size,
            text_style: TextStyle {
                font_size: config.text_font_size,
                ..TextStyle::default()
            },
            note_style: NoteStyle::default_id().to_string(),
            grid_style: GridStyle::default(),
        }
    }

    /// Set the current tool.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.current_tool != tool {
            log::debug!("tool {:?} -> {:?}", self.current_tool, tool);
        }
        self.current_tool = tool;
    }

    /// Select a note preset. Unknown ids fall back to the default preset.
    pub fn set_note_style(&mut self, style_id: &str) {
        self.note_style = NoteStyle::lookup(style_id).id.to_string();
    }

    pub fn set_font_family(&mut self, family: FontFamily) {
        self.text_style.font_family = family;
    }

    /// Pencil width in world units at the given scale.
    pub fn pencil_world_thickness(&self, scale: f64) -> f64 {
        self.pencil_thickness / scale
    }

    /// Eraser radius in world units at the given scale.
    pub fn eraser_world_radius(&self, scale: f64) -> f64 {
        self.eraser_size / scale
    }
}
