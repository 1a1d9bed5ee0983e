//! Canvas session state and the command surface exposed to the UI.

use crate::analysis::{
    AnalysisError, AnalysisRequest, AnalysisResponse, AnalysisResult, AnalysisService,
    SnapshotExporter,
};
use crate::animation::{AnimationController, Instant, Spring};
use crate::config::CanvasConfig;
use crate::entities::{
    BoxEntity, CardPatch, EditableEntity, EntityId, EntityRef, FontFamily, NoteEntity,
    ResponseCard, RgbaColor, TextEntity, TextStyle,
};
use crate::history::HistoryManager;
use crate::store::EntityStore;
use crate::tools::{GridStyle, ToolKind, ToolManager};
use crate::viewport::{DEFAULT_SCALE, Viewport};
use kurbo::{Point, Rect, Size, Vec2};

/// Viewport values driven by the center/reset animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportChannel {
    Scale,
    OffsetX,
    OffsetY,
}

/// Read-only view of everything the renderer paints.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub store: &'a EntityStore,
    pub viewport: &'a Viewport,
    /// Viewport size in screen pixels.
    pub size: Size,
    pub grid: GridStyle,
}

/// The entity in edit mode plus what is needed to close the edit.
#[derive(Debug, Clone, PartialEq)]
struct EditSession {
    target: EntityRef,
    /// Created by this session and not yet in history.
    created: bool,
    /// Content and size when editing began, for change detection.
    before: Option<(String, Size)>,
    /// Last size reported by the editor, in screen pixels.
    editor_size: Option<Size>,
}

/// Runtime canvas state (not persisted).
#[derive(Debug, Clone)]
pub struct Canvas {
    store: EntityStore,
    viewport: Viewport,
    history: HistoryManager,
    /// Tool manager.
    pub tool_manager: ToolManager,
    animations: AnimationController<ViewportChannel>,
    viewport_size: Size,
    config: CanvasConfig,
    edit: Option<EditSession>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create an empty canvas with default configuration.
    pub fn new() -> Self {
        Self::with_config(CanvasConfig::default())
    }

    /// Create an empty canvas.
    pub fn with_config(config: CanvasConfig) -> Self {
        Self {
            store: EntityStore::new(),
            viewport: Viewport::with_bounds(config.min_scale, config.max_scale),
            history: HistoryManager::new(),
            tool_manager: ToolManager::from_config(&config),
            animations: AnimationController::new(),
            viewport_size: config.viewport_size,
            config,
            edit: None,
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    /// Set the viewport size in screen pixels.
    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport_size = size;
    }

    /// Everything a renderer needs for one frame.
    pub fn scene(&self) -> Scene<'_> {
        Scene {
            store: &self.store,
            viewport: &self.viewport,
            size: self.viewport_size,
            grid: self.tool_manager.grid_style,
        }
    }

    // --- tools ---

    /// Set the current tool. Switching tools ends any edit in progress.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if tool != self.tool_manager.current_tool {
            self.finish_editing();
        }
        self.tool_manager.set_tool(tool);
    }

    pub fn tool(&self) -> ToolKind {
        self.tool_manager.current_tool
    }

    pub fn set_pencil_thickness(&mut self, thickness: f64) {
        if thickness.is_finite() && thickness > 0.0 {
            self.tool_manager.pencil_thickness = thickness;
        }
    }

    pub fn set_pencil_color(&mut self, color: RgbaColor) {
        self.tool_manager.pencil_color = color;
    }

    pub fn set_eraser_size(&mut self, size: f64) {
        if size.is_finite() && size > 0.0 {
            self.tool_manager.eraser_size = size;
        }
    }

    pub fn set_note_style(&mut self, style_id: &str) {
        self.tool_manager.set_note_style(style_id);
    }

    pub fn set_text_style(&mut self, style: TextStyle) {
        self.tool_manager.text_style = style;
    }

    pub fn set_font_family(&mut self, family: FontFamily) {
        self.tool_manager.set_font_family(family);
    }

    pub fn set_grid_style(&mut self, grid: GridStyle) {
        self.tool_manager.grid_style = grid;
    }

    // --- history ---

    /// Record the current entities as one history step.
    pub fn commit(&mut self) {
        self.history.commit(&self.store);
    }

    /// Undo the last step. An open edit is closed first.
    pub fn undo(&mut self) -> bool {
        self.finish_editing();
        self.history.undo(&mut self.store)
    }

    /// Redo the next step. An open edit is closed first.
    pub fn redo(&mut self) -> bool {
        self.finish_editing();
        self.history.redo(&mut self.store)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- viewport ---

    /// Zoom by `factor` around a screen point. User zooms cancel any
    /// running center animation.
    pub fn zoom_at(&mut self, pivot: Point, factor: f64) -> bool {
        self.animations.stop_all();
        self.viewport.zoom_at(pivot, factor)
    }

    /// Zoom one wheel notch; positive `delta_y` zooms out.
    pub fn zoom_wheel(&mut self, pivot: Point, delta_y: f64) -> bool {
        self.animations.stop_all();
        self.viewport.zoom_wheel(pivot, delta_y, self.config.zoom_step)
    }

    /// Set an absolute scale keeping the viewport center fixed.
    pub fn set_scale_centered(&mut self, scale: f64) -> bool {
        self.animations.stop_all();
        self.viewport.set_scale_centered(scale, self.viewport_size)
    }

    /// Pan by a screen-space delta.
    pub fn pan(&mut self, delta: Vec2) {
        self.animations.stop_all();
        self.viewport.pan(delta);
    }

    pub fn visible_world_rect(&self) -> Rect {
        self.viewport.visible_world_rect(self.viewport_size)
    }

    pub fn world_center(&self) -> Point {
        self.viewport.world_center(self.viewport_size)
    }

    /// Animate back to scale 1 with the world origin at the top-left.
    ///
    /// Scale and both offsets run as independent springs; a second request
    /// replaces the animations still in flight.
    pub fn center_view(&mut self, now: Instant) {
        let timing = self.config.center_animation;
        let duration = timing.duration();
        let offset = self.viewport.offset;

        let scale = Spring::new(self.viewport.scale, DEFAULT_SCALE, duration)
            .with_damping(timing.scale.damping_ratio, timing.scale.frequency);
        let x = Spring::new(offset.x, 0.0, duration)
            .with_damping(timing.offset.damping_ratio, timing.offset.frequency);
        let y = Spring::new(offset.y, 0.0, duration)
            .with_damping(timing.offset.damping_ratio, timing.offset.frequency);

        self.animations.animate(ViewportChannel::Scale, scale, now);
        self.animations.animate(ViewportChannel::OffsetX, x, now);
        self.animations.animate(ViewportChannel::OffsetY, y, now);
    }

    /// Clear every entity as one undoable step, then center the view.
    pub fn reset_canvas(&mut self, now: Instant) {
        self.edit = None;
        if !self.store.is_empty() {
            self.store.clear();
            self.commit();
        }
        log::info!("canvas reset");
        self.center_view(now);
    }

    /// Advance animations and apply them to the viewport.
    /// Returns true while any animation is still running.
    pub fn tick(&mut self, now: Instant) -> bool {
        for frame in self.animations.tick(now) {
            match frame.key {
                ViewportChannel::Scale => self.viewport.set_scale(frame.value),
                ViewportChannel::OffsetX => self.viewport.offset.x = frame.value,
                ViewportChannel::OffsetY => self.viewport.offset.y = frame.value,
            }
        }
        self.animations.is_animating()
    }

    pub fn is_animating(&self) -> bool {
        self.animations.is_animating()
    }

    pub fn stop_animations(&mut self) {
        self.animations.stop_all();
    }

    // --- text and notes ---

    /// Place a text box at a world point and start editing it.
    pub fn create_text(&mut self, position: Point) -> EntityRef {
        self.finish_editing();
        let scale = self.viewport.scale;
        let mut style = self.tool_manager.text_style;
        style.font_size /= scale;
        let size = self.screen_to_world_size(self.config.text_box_size);
        let text = TextEntity::new(position, size, style);
        let entity = self.store.add_text(text);
        self.open_session(entity, true);
        entity
    }

    /// Place a note at a world point and start editing it.
    pub fn create_note(&mut self, position: Point) -> EntityRef {
        self.finish_editing();
        let scale = self.viewport.scale;
        let mut style = self.tool_manager.text_style;
        style.font_size /= scale;
        let size = self.screen_to_world_size(self.config.note_box_size);
        let note = NoteEntity::new(position, size, style, self.tool_manager.note_style.clone());
        let entity = self.store.add_note(note);
        self.open_session(entity, true);
        entity
    }

    fn screen_to_world_size(&self, size: Size) -> Size {
        Size::new(
            self.viewport.screen_to_world_len(size.width),
            self.viewport.screen_to_world_len(size.height),
        )
    }

    fn open_session(&mut self, target: EntityRef, created: bool) {
        let before = self
            .store
            .editable(target)
            .map(|e| (e.content().to_string(), e.size()));
        self.edit = Some(EditSession {
            target,
            created,
            before: if created { None } else { before },
            editor_size: None,
        });
        log::debug!("editing {:?}", target);
    }

    /// Re-enter edit mode on an existing text or note.
    ///
    /// A stale or non-editable reference is a no-op.
    pub fn begin_editing(&mut self, target: EntityRef) -> bool {
        if self.editing() == Some(target) {
            return true;
        }
        if self.store.editable(target).is_none() {
            log::warn!("cannot edit {:?}: no such entity", target);
            return false;
        }
        self.finish_editing();
        // Closing the previous edit may have removed or restored entities.
        let Some(entity) = self.store.editable_mut(target) else {
            log::warn!("cannot edit {:?}: no such entity", target);
            return false;
        };
        entity.set_editing(true);
        self.open_session(target, false);
        true
    }

    /// The entity currently in edit mode.
    pub fn editing(&self) -> Option<EntityRef> {
        self.edit.as_ref().map(|s| s.target)
    }

    /// Replace the content of the entity being edited.
    pub fn set_editing_content(&mut self, content: impl Into<String>) -> bool {
        let Some(entity) = self.editing_entity_mut() else {
            return false;
        };
        entity.set_content(content.into());
        true
    }

    /// Append typed text to the entity being edited.
    pub fn insert_text(&mut self, text: &str) -> bool {
        let Some(entity) = self.editing_entity_mut() else {
            return false;
        };
        let mut content = entity.content().to_string();
        content.push_str(text);
        entity.set_content(content);
        true
    }

    /// Remove the last character of the entity being edited.
    pub fn delete_backward(&mut self) -> bool {
        let Some(entity) = self.editing_entity_mut() else {
            return false;
        };
        let mut content = entity.content().to_string();
        if content.pop().is_none() {
            return false;
        }
        entity.set_content(content);
        true
    }

    /// Content of the entity being edited.
    pub fn editing_content(&self) -> Option<&str> {
        let target = self.editing()?;
        self.store.editable(target).map(|e| e.content())
    }

    /// Record the editor's current size in screen pixels. Applied to the
    /// entity when editing finishes.
    pub fn set_editor_size(&mut self, size: Size) -> bool {
        match self.edit.as_mut() {
            Some(session) => {
                session.editor_size = Some(size);
                true
            }
            None => false,
        }
    }

    fn editing_entity_mut(&mut self) -> Option<&mut dyn EditableEntity> {
        let target = self.edit.as_ref()?.target;
        self.store.editable_mut(target)
    }

    /// Leave edit mode.
    ///
    /// Empty content removes the entity. Otherwise the box takes the last
    /// editor size (converted to world units) and the edit is committed if
    /// it created the entity or changed it.
    pub fn finish_editing(&mut self) -> bool {
        let Some(session) = self.edit.take() else {
            return false;
        };
        let editor_size = session.editor_size.map(|size| self.screen_to_world_size(size));
        let Some(entity) = self.store.editable_mut(session.target) else {
            log::warn!("edit target {:?} vanished before finishing", session.target);
            return false;
        };

        if entity.content().is_empty() {
            self.store.remove(session.target);
            log::debug!("removed empty {:?}", session.target);
            if !session.created {
                self.commit();
            }
            return true;
        }

        if let Some(size) = editor_size {
            entity.set_size(size);
        }
        entity.set_editing(false);
        let after = (entity.content().to_string(), entity.size());
        if session.created || session.before.as_ref() != Some(&after) {
            self.commit();
        }
        true
    }

    /// Delete the entity being edited.
    pub fn delete_editing(&mut self) -> bool {
        let Some(session) = self.edit.take() else {
            return false;
        };
        if !self.store.remove(session.target) {
            log::warn!("edit target {:?} vanished before deleting", session.target);
            return false;
        }
        log::debug!("deleted {:?}", session.target);
        if !session.created {
            self.commit();
        }
        true
    }

    /// Move a box entity to a new world position without committing.
    pub fn move_entity(&mut self, target: EntityRef, position: Point) -> bool {
        match self.store.get_box_mut(target) {
            Some(entity) => {
                entity.set_position(position);
                true
            }
            None => false,
        }
    }

    /// Remove a text, note or card as one history step. Any other open
    /// edit is closed first.
    pub fn remove_entity(&mut self, target: EntityRef) -> bool {
        if self.editing() == Some(target) {
            return self.delete_editing();
        }
        self.finish_editing();
        if !self.store.remove(target) {
            return false;
        }
        self.commit();
        true
    }

    // --- response cards ---

    /// Add a card with the default size at a world position. An open edit
    /// is closed first.
    pub fn add_response_card(&mut self, content: impl Into<String>, position: Point) -> EntityId {
        self.finish_editing();
        let card = ResponseCard::new(position, self.config.response_card_size, content);
        let id = card.id();
        self.store.add_card(card);
        self.commit();
        log::info!("response card {} added at ({:.1}, {:.1})", id, position.x, position.y);
        id
    }

    /// Add a card centered on the middle of the viewport.
    pub fn add_response_card_at_view_center(&mut self, content: impl Into<String>) -> EntityId {
        let center = self.world_center();
        let size = self.config.response_card_size;
        let position = Point::new(center.x - size.width / 2.0, center.y - size.height / 2.0);
        self.add_response_card(content, position)
    }

    /// Apply a partial update. Commits only if something changed.
    pub fn update_response_card(&mut self, id: EntityId, patch: CardPatch) -> bool {
        if self.store.card(id).is_none() {
            log::debug!("update of unknown card {}", id);
            return false;
        }
        self.finish_editing();
        let min = self.config.min_card_size;
        let Some(card) = self.store.card_mut(id) else {
            return false;
        };
        if !card.apply(patch, min) {
            return false;
        }
        self.commit();
        true
    }

    pub fn remove_response_card(&mut self, id: EntityId) -> bool {
        self.remove_entity(EntityRef::Card(id))
    }

    // --- snapshot export and analysis ---

    /// Render the current scene to PNG bytes.
    pub fn export_snapshot<E: SnapshotExporter>(
        &self,
        exporter: &mut E,
    ) -> Result<Vec<u8>, E::Error> {
        exporter.export_png(&self.scene())
    }

    /// Capture the canvas and build a request for the analysis service.
    pub fn analysis_request<E: SnapshotExporter>(
        &self,
        exporter: &mut E,
        prompt: Option<&str>,
    ) -> AnalysisResult<AnalysisRequest> {
        let image = self
            .export_snapshot(exporter)
            .map_err(|e| AnalysisError::Capture(e.to_string()))?;
        Ok(match prompt {
            Some(prompt) => AnalysisRequest::new(prompt, image),
            None => AnalysisRequest::with_default_prompt(image),
        })
    }

    /// Turn a service result into a response card at the view center.
    ///
    /// Failures are returned unchanged and leave the canvas untouched.
    pub fn apply_analysis(
        &mut self,
        result: AnalysisResult<AnalysisResponse>,
    ) -> AnalysisResult<EntityId> {
        match result {
            Ok(response) if response.text.trim().is_empty() => {
                log::warn!("analysis returned no text");
                Err(AnalysisError::EmptyResponse)
            }
            Ok(response) => Ok(self.add_response_card_at_view_center(response.text)),
            Err(err) => {
                log::warn!("analysis failed: {}", err);
                Err(err)
            }
        }
    }

    /// Capture, ask the service, and place the answer.
    pub async fn run_analysis<S, E>(
        &mut self,
        service: &S,
        exporter: &mut E,
        prompt: Option<&str>,
    ) -> AnalysisResult<EntityId>
    where
        S: AnalysisService + ?Sized,
        E: SnapshotExporter,
    {
        let request = self
            .analysis_request(exporter, prompt)
            .inspect_err(|e| log::warn!("analysis capture failed: {}", e))?;
        let result = service.analyze(request).await;
        self.apply_analysis(result)
    }
}
