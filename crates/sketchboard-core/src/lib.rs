//! Sketchboard Core Library
//!
//! Platform-agnostic engine for the Sketchboard infinite canvas: viewport
//! transform, spring animation, entities, stroke and eraser tools, undo
//! history and input routing.

pub mod analysis;
pub mod animation;
pub mod canvas;
pub mod config;
pub mod entities;
pub mod history;
pub mod input;
pub mod router;
pub mod store;
pub mod tools;
pub mod viewport;

pub use analysis::{
    AnalysisError, AnalysisRequest, AnalysisResponse, AnalysisResult, AnalysisService,
    SnapshotExporter,
};
pub use animation::{AnimationController, AnimationHandle, Spring};
pub use canvas::{Canvas, Scene, ViewportChannel};
pub use config::{CanvasConfig, ConfigError};
pub use entities::{EntityId, EntityRef, RgbaColor};
pub use history::{HistoryManager, HistorySnapshot};
pub use input::{InputState, Key, KeyEvent, Modifiers, MouseButton, PointerEvent, WheelEvent};
pub use router::{Gesture, InputRouter};
pub use store::EntityStore;
pub use tools::{GridStyle, ToolKind, ToolManager};
pub use viewport::Viewport;
