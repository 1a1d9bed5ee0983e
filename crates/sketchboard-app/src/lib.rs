//! Sketchboard Application
//!
//! Headless host for the canvas engine: loads configuration, replays a
//! recorded session through the input router and exports PNG snapshots.

mod app;
mod script;
mod shortcuts;

pub use app::{App, AppConfig, AppError, AppResult, Report};
pub use script::{Action, SessionScript};
pub use shortcuts::{Shortcut, ShortcutRegistry};
