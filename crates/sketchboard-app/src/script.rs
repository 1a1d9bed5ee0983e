//! Recorded session format.
//!
//! A session is a JSON document listing the input events and UI commands a
//! user produced, in order. The app replays it against a fresh canvas.

use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use sketchboard_core::entities::{CardPatch, FontFamily};
use sketchboard_core::{CanvasConfig, GridStyle, KeyEvent, PointerEvent, ToolKind, WheelEvent};
use std::path::PathBuf;

/// A recorded session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionScript {
    /// Canvas configuration used when none is given on the command line.
    #[serde(default)]
    pub config: Option<CanvasConfig>,
    /// Viewport size in screen pixels; overrides the configured one.
    #[serde(default)]
    pub viewport: Option<Size>,
    pub events: Vec<Action>,
}

impl SessionScript {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// One recorded step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Pointer { event: PointerEvent },
    Wheel { event: WheelEvent },
    Key { event: KeyEvent },
    /// Type each character of `text` into the active editor.
    Type { text: String },
    Tool { tool: ToolKind },
    Grid { style: GridStyle },
    /// Hex (`#rrggbb`) or palette name.
    PencilColor { color: String },
    PencilThickness { size: f64 },
    EraserSize { size: f64 },
    NoteStyle { id: String },
    FontFamily { family: FontFamily },
    /// Zoom by `factor` around `at`, or around the viewport center.
    Zoom {
        factor: f64,
        #[serde(default)]
        at: Option<Point>,
    },
    /// Zoom slider: absolute scale anchored at the viewport center.
    ZoomTo { scale: f64 },
    Pan { delta: Vec2 },
    CenterView,
    ResetCanvas,
    Undo,
    Redo,
    /// Place a response card at `position`, or centered in the view.
    AddCard {
        content: String,
        #[serde(default)]
        position: Option<Point>,
    },
    /// Cards are addressed by creation order.
    UpdateCard { index: usize, patch: CardPatch },
    RemoveCard { index: usize },
    /// Capture the canvas and feed `reply`, a recorded service response body,
    /// back as the analysis result.
    Analyze {
        #[serde(default)]
        prompt: Option<String>,
        reply: serde_json::Value,
    },
    /// Let animations run for `ms` milliseconds.
    Wait { ms: u64 },
    /// Write the current frame as PNG.
    Snapshot { path: PathBuf },
}
