//! Single entry point for pointer, wheel and keyboard input.
//!
//! The router owns the gesture in progress. Only one gesture runs at a time:
//! a pointer-down that arrives while a drag, stroke or resize is active is
//! refused. Every gesture that changes entities ends in exactly one history
//! commit, whether it ends by pointer-up or by [`InputRouter::cancel`].

use crate::animation::Instant;
use crate::canvas::Canvas;
use crate::entities::{BoxEntity, EntityId, EntityRef, ResponseCard};
use crate::input::{InputState, Key, KeyEvent, MouseButton, PointerEvent, WheelEvent};
use crate::tools::{EraserEngine, StrokeEngine, ToolKind};
use kurbo::{Point, Vec2};

/// The gesture currently owning the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Pencil stroke capture.
    Drawing,
    /// Eraser drag.
    Erasing,
    /// Dragging empty canvas.
    Panning,
    /// Moving a box entity. `grab` is the pointer offset from its top-left.
    Dragging {
        target: EntityRef,
        grab: Vec2,
        moved: bool,
    },
    /// Resizing a card from its bottom-right handle.
    Resizing {
        card: EntityId,
        last: Point,
        resized: bool,
    },
}

/// Handles input events and translates them to canvas operations.
#[derive(Debug, Clone, Default)]
pub struct InputRouter {
    input: InputState,
    gesture: Gesture,
    strokes: StrokeEngine,
    eraser: EraserEngine,
}

impl InputRouter {
    /// Create a new router.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Whether a gesture holds the pointer.
    pub fn is_busy(&self) -> bool {
        self.gesture != Gesture::Idle
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Dispatch a pointer event. Returns true if canvas state changed.
    ///
    /// Events without a resolvable position are ignored.
    pub fn handle_pointer(
        &mut self,
        canvas: &mut Canvas,
        event: PointerEvent,
        now: Instant,
    ) -> bool {
        let Some(screen) = event.position() else {
            log::debug!("ignoring pointer event without position");
            return false;
        };
        match event {
            PointerEvent::Down { button, .. } => {
                if self.is_busy() {
                    log::debug!("pointer down refused during {:?}", self.gesture);
                    return false;
                }
                self.input.handle_pointer_event(&event, now);
                if button != MouseButton::Left {
                    return false;
                }
                self.handle_press(canvas, screen)
            }
            PointerEvent::Move { .. } => {
                self.input.handle_pointer_event(&event, now);
                self.handle_drag(canvas, screen)
            }
            PointerEvent::Up { button, .. } => {
                self.input.handle_pointer_event(&event, now);
                if button != MouseButton::Left {
                    return false;
                }
                self.end_gesture(canvas)
            }
        }
    }

    fn handle_press(&mut self, canvas: &mut Canvas, screen: Point) -> bool {
        let world = canvas.viewport().to_world(screen);
        let scale = canvas.viewport().scale;

        // Clicking inside the entity being edited keeps editing; anywhere
        // else is a loss of focus.
        if let Some(editing) = canvas.editing() {
            if canvas.store().box_at(world) == Some(editing) {
                return false;
            }
            canvas.finish_editing();
        }
        let hit = canvas.store().box_at(world);

        let handle = canvas.viewport().screen_to_world_len(ResponseCard::RESIZE_HANDLE);
        if let Some(card) = canvas.store().card_handle_at(world, handle) {
            if let Some(entity) = canvas.store_mut().card_mut(card) {
                entity.is_resizing = true;
            }
            log::debug!("resizing card {}", card);
            self.gesture = Gesture::Resizing {
                card,
                last: world,
                resized: false,
            };
            return true;
        }

        if self.input.is_double_click() {
            if let Some(target) = hit.filter(EntityRef::is_editable) {
                return canvas.begin_editing(target);
            }
        }

        // Cards sit above the drawing surface under every tool.
        if let Some(target @ EntityRef::Card(_)) = hit {
            return self.begin_drag(canvas, target, world);
        }

        match canvas.tool() {
            ToolKind::Pencil => {
                let thickness = canvas.tool_manager.pencil_thickness;
                let color = canvas.tool_manager.pencil_color;
                self.strokes
                    .begin(canvas.store_mut(), world, thickness, scale, color);
                self.gesture = Gesture::Drawing;
                true
            }
            ToolKind::Eraser => {
                let radius = canvas.tool_manager.eraser_world_radius(scale);
                self.eraser.begin();
                self.eraser.erase_at(canvas.store_mut(), world, radius);
                self.gesture = Gesture::Erasing;
                true
            }
            // A single click on existing text only grabs it; editing it
            // again takes a double-click.
            ToolKind::Text => match hit {
                Some(target) => self.begin_drag(canvas, target, world),
                None => {
                    canvas.create_text(world);
                    true
                }
            },
            ToolKind::Note => match hit {
                Some(target) => self.begin_drag(canvas, target, world),
                None => {
                    canvas.create_note(world);
                    true
                }
            },
            ToolKind::None | ToolKind::Grid => match hit {
                Some(target) => self.begin_drag(canvas, target, world),
                None => {
                    self.gesture = Gesture::Panning;
                    false
                }
            },
        }
    }

    fn begin_drag(&mut self, canvas: &Canvas, target: EntityRef, world: Point) -> bool {
        let Some(entity) = canvas.store().get_box(target) else {
            return false;
        };
        self.gesture = Gesture::Dragging {
            target,
            grab: world - entity.position(),
            moved: false,
        };
        false
    }

    fn handle_drag(&mut self, canvas: &mut Canvas, screen: Point) -> bool {
        let world = canvas.viewport().to_world(screen);
        let scale = canvas.viewport().scale;

        match self.gesture {
            Gesture::Idle => false,
            Gesture::Drawing => {
                let thickness = canvas.tool_manager.pencil_thickness;
                self.strokes.extend(canvas.store_mut(), world, thickness, scale)
            }
            Gesture::Erasing => {
                let radius = canvas.tool_manager.eraser_world_radius(scale);
                self.eraser
                    .erase_at(canvas.store_mut(), world, radius)
                    .is_some()
            }
            Gesture::Panning => {
                let delta = self.input.pointer_delta();
                if delta == Vec2::ZERO {
                    return false;
                }
                canvas.pan(delta);
                true
            }
            Gesture::Dragging { target, grab, .. } => {
                if !canvas.move_entity(target, world - grab) {
                    log::warn!("drag target {:?} vanished", target);
                    self.gesture = Gesture::Idle;
                    return false;
                }
                self.gesture = Gesture::Dragging {
                    target,
                    grab,
                    moved: true,
                };
                true
            }
            Gesture::Resizing { card, last, .. } => {
                let min = canvas.config().min_card_size;
                let Some(entity) = canvas.store_mut().card_mut(card) else {
                    log::warn!("resize target {} vanished", card);
                    self.gesture = Gesture::Idle;
                    return false;
                };
                entity.resize_by(world - last, min);
                self.gesture = Gesture::Resizing {
                    card,
                    last: world,
                    resized: true,
                };
                true
            }
        }
    }

    /// Close the current gesture, committing what it changed.
    fn end_gesture(&mut self, canvas: &mut Canvas) -> bool {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle | Gesture::Panning => false,
            Gesture::Drawing => {
                if self.strokes.finish().is_none() {
                    return false;
                }
                canvas.commit();
                true
            }
            Gesture::Erasing => {
                if !self.eraser.finish() {
                    return false;
                }
                canvas.commit();
                true
            }
            Gesture::Dragging { target, moved, .. } => {
                if !moved {
                    return false;
                }
                log::debug!("moved {:?}", target);
                canvas.commit();
                true
            }
            Gesture::Resizing { card, resized, .. } => {
                if let Some(entity) = canvas.store_mut().card_mut(card) {
                    entity.is_resizing = false;
                }
                if !resized {
                    return false;
                }
                canvas.commit();
                true
            }
        }
    }

    /// Tear down whatever gesture is in progress (focus loss, unmount).
    ///
    /// Clears transient flags and commits anything the gesture already
    /// changed. Returns true if a commit happened.
    pub fn cancel(&mut self, canvas: &mut Canvas) -> bool {
        self.input.release();
        if self.is_busy() {
            log::debug!("cancelling {:?}", self.gesture);
        }
        self.end_gesture(canvas)
    }

    /// Dispatch a wheel event: command-wheel zooms around the pointer,
    /// plain wheel pans.
    pub fn handle_wheel(&mut self, canvas: &mut Canvas, event: WheelEvent) -> bool {
        if event.is_zoom() {
            return canvas.zoom_wheel(event.position, event.delta.y);
        }
        if event.delta == Vec2::ZERO {
            return false;
        }
        canvas.pan(-event.delta);
        true
    }

    /// Dispatch a key. While editing, keys drive the editor; otherwise
    /// only the undo/redo shortcuts are handled.
    pub fn handle_key(&mut self, canvas: &mut Canvas, event: &KeyEvent) -> bool {
        if canvas.editing().is_some() {
            return match &event.key {
                Key::Enter if event.modifiers.shift => canvas.insert_text("\n"),
                Key::Enter | Key::Escape => canvas.finish_editing(),
                Key::Delete | Key::Backspace => {
                    if canvas.editing_content().is_some_and(str::is_empty) {
                        canvas.delete_editing()
                    } else if event.key == Key::Backspace {
                        canvas.delete_backward()
                    } else {
                        false
                    }
                }
                Key::Character(_) if event.modifiers.command() => false,
                Key::Character(text) => canvas.insert_text(text),
            };
        }

        if self.is_busy() || !event.modifiers.command() {
            return false;
        }
        if event.is_char('z') {
            if event.modifiers.shift {
                canvas.redo()
            } else {
                canvas.undo()
            }
        } else if event.is_char('y') {
            canvas.redo()
        } else {
            false
        }
    }
}
