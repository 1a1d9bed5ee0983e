//! Input event types and pointer state tracking.

use crate::animation::{Duration, Instant};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event in screen coordinates.
///
/// A `None` position means the host could not resolve where the pointer is
/// (e.g. it left the window); such events are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    Down {
        position: Option<Point>,
        #[serde(default)]
        button: MouseButton,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Move {
        position: Option<Point>,
    },
    Up {
        position: Option<Point>,
        #[serde(default)]
        button: MouseButton,
    },
}

impl PointerEvent {
    pub fn position(&self) -> Option<Point> {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position, .. } => *position,
        }
    }
}

/// Wheel or trackpad scroll. With the command modifier held it zooms,
/// otherwise it pans.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    pub position: Point,
    pub delta: Vec2,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl WheelEvent {
    pub fn is_zoom(&self) -> bool {
        self.modifiers.command()
    }
}

/// Keys the engine reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Enter,
    Escape,
    Delete,
    Backspace,
    /// Printable text typed into the active editor.
    Character(String),
}

/// Keyboard event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// True for a character key matching `c`, ignoring case.
    pub fn is_char(&self, c: char) -> bool {
        match &self.key {
            Key::Character(s) => {
                let mut chars = s.chars();
                matches!(
                    (chars.next(), chars.next()),
                    (Some(k), None) if k.eq_ignore_ascii_case(&c)
                )
            }
            _ => false,
        }
    }
}

/// Double-click detection constants.
const DOUBLE_CLICK_TIME: Duration = Duration::from_millis(500);
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Tracks pointer state across events.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Last resolved pointer position in screen coordinates.
    pub pointer_position: Option<Point>,
    /// Position before the most recent move.
    pub previous_pointer_position: Option<Point>,
    /// Whether the left button is held.
    pub is_dragging: bool,
    /// Start position of the current drag.
    pub drag_start: Option<Point>,
    pub modifiers: Modifiers,
    last_click_time: Option<Instant>,
    last_click_position: Option<Point>,
    double_click_detected: bool,
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer event received at `now`. Events without a position
    /// leave the state untouched.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent, now: Instant) {
        let Some(position) = event.position() else {
            return;
        };
        self.previous_pointer_position = self.pointer_position;
        self.pointer_position = Some(position);

        match *event {
            PointerEvent::Down {
                button: MouseButton::Left,
                modifiers,
                ..
            } => {
                self.modifiers = modifiers;
                self.double_click_detected = false;
                match (self.last_click_time, self.last_click_position) {
                    (Some(last_time), Some(last_pos))
                        if now.saturating_duration_since(last_time) < DOUBLE_CLICK_TIME
                            && position.distance(last_pos) < DOUBLE_CLICK_DISTANCE =>
                    {
                        self.double_click_detected = true;
                        // A third click starts a new pair.
                        self.last_click_time = None;
                        self.last_click_position = None;
                    }
                    _ => {
                        self.last_click_time = Some(now);
                        self.last_click_position = Some(position);
                    }
                }
                self.is_dragging = true;
                self.drag_start = Some(position);
            }
            PointerEvent::Down { modifiers, .. } => {
                self.modifiers = modifiers;
            }
            PointerEvent::Up {
                button: MouseButton::Left,
                ..
            } => {
                self.is_dragging = false;
                self.drag_start = None;
            }
            PointerEvent::Up { .. } | PointerEvent::Move { .. } => {}
        }
    }

    /// Whether the latest left press completed a double-click.
    pub fn is_double_click(&self) -> bool {
        self.double_click_detected
    }

    /// Pointer movement since the previous event.
    pub fn pointer_delta(&self) -> Vec2 {
        match (self.pointer_position, self.previous_pointer_position) {
            (Some(current), Some(previous)) => current - previous,
            _ => Vec2::ZERO,
        }
    }

    /// Drop any drag in progress.
    pub fn release(&mut self) {
        self.is_dragging = false;
        self.drag_start = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Some(Point::new(x, y)),
            button: MouseButton::Left,
            modifiers: Modifiers::default(),
        }
    }

    #[test]
    fn test_drag_tracking() {
        let mut input = InputState::new();
        let now = Instant::now();
        input.handle_pointer_event(&down(100.0, 100.0), now);
        assert!(input.is_dragging);
        assert_eq!(input.drag_start, Some(Point::new(100.0, 100.0)));

        input.handle_pointer_event(
            &PointerEvent::Move {
                position: Some(Point::new(150.0, 120.0)),
            },
            now,
        );
        let delta = input.pointer_delta();
        assert!((delta.x - 50.0).abs() < f64::EPSILON);
        assert!((delta.y - 20.0).abs() < f64::EPSILON);

        input.handle_pointer_event(
            &PointerEvent::Up {
                position: Some(Point::new(150.0, 120.0)),
                button: MouseButton::Left,
            },
            now,
        );
        assert!(!input.is_dragging);
    }

    #[test]
    fn test_unresolved_position_is_ignored() {
        let mut input = InputState::new();
        input.handle_pointer_event(
            &PointerEvent::Down {
                position: None,
                button: MouseButton::Left,
                modifiers: Modifiers::default(),
            },
            Instant::now(),
        );
        assert!(!input.is_dragging);
        assert_eq!(input.pointer_position, None);
    }

    #[test]
    fn test_double_click_detection() {
        let mut input = InputState::new();
        let start = Instant::now();

        input.handle_pointer_event(&down(100.0, 100.0), start);
        assert!(!input.is_double_click());

        input.handle_pointer_event(&down(102.0, 101.0), start + Duration::from_millis(200));
        assert!(input.is_double_click());

        // Third click does not chain.
        input.handle_pointer_event(&down(102.0, 101.0), start + Duration::from_millis(300));
        assert!(!input.is_double_click());
    }

    #[test]
    fn test_double_click_too_slow_or_far() {
        let mut input = InputState::new();
        let start = Instant::now();

        input.handle_pointer_event(&down(100.0, 100.0), start);
        input.handle_pointer_event(&down(100.0, 100.0), start + Duration::from_millis(600));
        assert!(!input.is_double_click());

        input.handle_pointer_event(&down(200.0, 200.0), start + Duration::from_millis(700));
        assert!(!input.is_double_click());
    }

    #[test]
    fn test_pointer_event_json() {
        let event: PointerEvent =
            serde_json::from_str(r#"{ "type": "down", "position": { "x": 1.0, "y": 2.0 } }"#)
                .unwrap();
        assert_eq!(event.position(), Some(Point::new(1.0, 2.0)));

        let event: PointerEvent =
            serde_json::from_str(r#"{ "type": "move", "position": null }"#).unwrap();
        assert_eq!(event.position(), None);
    }

    #[test]
    fn test_command_key_chars() {
        let event = KeyEvent::new(
            Key::Character("Z".to_string()),
            Modifiers {
                meta: true,
                ..Default::default()
            },
        );
        assert!(event.modifiers.command());
        assert!(event.is_char('z'));
        assert!(!event.is_char('y'));
    }
}
