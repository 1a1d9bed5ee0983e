//! Authoritative entity collections for a canvas session.

use crate::entities::{
    BoxEntity, EditableEntity, EntityId, EntityRef, NoteEntity, ResponseCard, Stroke, TextEntity,
};
use crate::history::HistorySnapshot;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Owns strokes, text boxes, notes and response cards.
///
/// Collections are kept in creation order, which is also paint order
/// (strokes, then text, then notes, then cards on top).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityStore {
    strokes: Vec<Stroke>,
    texts: Vec<TextEntity>,
    notes: Vec<NoteEntity>,
    cards: Vec<ResponseCard>,
}

impl EntityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn texts(&self) -> &[TextEntity] {
        &self.texts
    }

    pub fn notes(&self) -> &[NoteEntity] {
        &self.notes
    }

    pub fn cards(&self) -> &[ResponseCard] {
        &self.cards
    }

    /// Check if all four collections are empty.
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
            && self.texts.is_empty()
            && self.notes.is_empty()
            && self.cards.is_empty()
    }

    /// Total number of entities.
    pub fn len(&self) -> usize {
        self.strokes.len() + self.texts.len() + self.notes.len() + self.cards.len()
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.texts.clear();
        self.notes.clear();
        self.cards.clear();
    }

    // --- strokes ---

    pub fn add_stroke(&mut self, stroke: Stroke) -> EntityId {
        let id = stroke.id();
        self.strokes.push(stroke);
        id
    }

    /// The most recently added stroke.
    pub fn last_stroke_mut(&mut self) -> Option<&mut Stroke> {
        self.strokes.last_mut()
    }

    pub fn stroke(&self, id: EntityId) -> Option<&Stroke> {
        self.strokes.iter().find(|s| s.id() == id)
    }

    /// Remove the stroke at `index` (eraser semantics are index based).
    pub fn remove_stroke_at(&mut self, index: usize) -> Option<Stroke> {
        if index < self.strokes.len() {
            Some(self.strokes.remove(index))
        } else {
            None
        }
    }

    // --- boxes ---

    pub fn add_text(&mut self, text: TextEntity) -> EntityRef {
        let id = text.id();
        self.texts.push(text);
        EntityRef::Text(id)
    }

    pub fn add_note(&mut self, note: NoteEntity) -> EntityRef {
        let id = note.id();
        self.notes.push(note);
        EntityRef::Note(id)
    }

    pub fn add_card(&mut self, card: ResponseCard) -> EntityRef {
        let id = card.id();
        self.cards.push(card);
        EntityRef::Card(id)
    }

    pub fn text(&self, id: EntityId) -> Option<&TextEntity> {
        self.texts.iter().find(|t| t.id() == id)
    }

    pub fn text_mut(&mut self, id: EntityId) -> Option<&mut TextEntity> {
        self.texts.iter_mut().find(|t| t.id() == id)
    }

    pub fn note(&self, id: EntityId) -> Option<&NoteEntity> {
        self.notes.iter().find(|n| n.id() == id)
    }

    pub fn note_mut(&mut self, id: EntityId) -> Option<&mut NoteEntity> {
        self.notes.iter_mut().find(|n| n.id() == id)
    }

    pub fn card(&self, id: EntityId) -> Option<&ResponseCard> {
        self.cards.iter().find(|c| c.id() == id)
    }

    pub fn card_mut(&mut self, id: EntityId) -> Option<&mut ResponseCard> {
        self.cards.iter_mut().find(|c| c.id() == id)
    }

    /// Check whether a referenced entity still exists.
    pub fn contains(&self, entity: EntityRef) -> bool {
        self.get_box(entity).is_some()
    }

    /// Look up any box entity by reference.
    pub fn get_box(&self, entity: EntityRef) -> Option<&dyn BoxEntity> {
        match entity {
            EntityRef::Text(id) => self.text(id).map(|t| t as &dyn BoxEntity),
            EntityRef::Note(id) => self.note(id).map(|n| n as &dyn BoxEntity),
            EntityRef::Card(id) => self.card(id).map(|c| c as &dyn BoxEntity),
        }
    }

    pub fn get_box_mut(&mut self, entity: EntityRef) -> Option<&mut dyn BoxEntity> {
        match entity {
            EntityRef::Text(id) => self.text_mut(id).map(|t| t as &mut dyn BoxEntity),
            EntityRef::Note(id) => self.note_mut(id).map(|n| n as &mut dyn BoxEntity),
            EntityRef::Card(id) => self.card_mut(id).map(|c| c as &mut dyn BoxEntity),
        }
    }

    /// Look up a text or note for editing. Cards are not editable.
    pub fn editable(&self, entity: EntityRef) -> Option<&dyn EditableEntity> {
        match entity {
            EntityRef::Text(id) => self.text(id).map(|t| t as &dyn EditableEntity),
            EntityRef::Note(id) => self.note(id).map(|n| n as &dyn EditableEntity),
            EntityRef::Card(_) => None,
        }
    }

    pub fn editable_mut(&mut self, entity: EntityRef) -> Option<&mut dyn EditableEntity> {
        match entity {
            EntityRef::Text(id) => self.text_mut(id).map(|t| t as &mut dyn EditableEntity),
            EntityRef::Note(id) => self.note_mut(id).map(|n| n as &mut dyn EditableEntity),
            EntityRef::Card(_) => None,
        }
    }

    /// Remove a box entity. Returns false if it no longer exists.
    pub fn remove(&mut self, entity: EntityRef) -> bool {
        let id = entity.id();
        match entity {
            EntityRef::Text(_) => remove_by_id(&mut self.texts, id),
            EntityRef::Note(_) => remove_by_id(&mut self.notes, id),
            EntityRef::Card(_) => remove_by_id(&mut self.cards, id),
        }
    }

    /// Topmost box entity under a world point.
    ///
    /// Cards paint above notes, notes above text; within a collection the
    /// newest entity wins.
    pub fn box_at(&self, point: Point) -> Option<EntityRef> {
        if let Some(card) = self.cards.iter().rev().find(|c| c.hit_test(point)) {
            return Some(EntityRef::Card(card.id()));
        }
        if let Some(note) = self.notes.iter().rev().find(|n| n.hit_test(point)) {
            return Some(EntityRef::Note(note.id()));
        }
        self.texts
            .iter()
            .rev()
            .find(|t| t.hit_test(point))
            .map(|t| EntityRef::Text(t.id()))
    }

    /// Topmost card whose resize handle contains `point`.
    pub fn card_handle_at(&self, point: Point, handle: f64) -> Option<EntityId> {
        self.cards
            .iter()
            .rev()
            .find(|c| c.hit_resize_handle(point, handle))
            .map(|c| c.id())
    }

    /// The entity currently in edit mode, if any.
    pub fn editing(&self) -> Option<EntityRef> {
        self.texts
            .iter()
            .find(|t| t.is_editing)
            .map(|t| EntityRef::Text(t.id()))
            .or_else(|| {
                self.notes
                    .iter()
                    .find(|n| n.is_editing)
                    .map(|n| EntityRef::Note(n.id()))
            })
    }

    /// Deep copy of all four collections.
    ///
    /// Edit and resize flags belong to the live session and are cleared on
    /// the copies, so restoring a snapshot never revives an open gesture.
    pub fn snapshot(&self) -> HistorySnapshot {
        let mut snapshot = HistorySnapshot {
            strokes: self.strokes.clone(),
            texts: self.texts.clone(),
            notes: self.notes.clone(),
            cards: self.cards.clone(),
        };
        for text in &mut snapshot.texts {
            text.is_editing = false;
        }
        for note in &mut snapshot.notes {
            note.is_editing = false;
        }
        for card in &mut snapshot.cards {
            card.is_resizing = false;
        }
        snapshot
    }

    /// Replace all collections with a snapshot's contents.
    pub fn restore(&mut self, snapshot: &HistorySnapshot) {
        self.strokes = snapshot.strokes.clone();
        self.texts = snapshot.texts.clone();
        self.notes = snapshot.notes.clone();
        self.cards = snapshot.cards.clone();
    }
}

fn remove_by_id<T: BoxEntity>(items: &mut Vec<T>, id: EntityId) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}
