//! The live-entity collection
//!
//! Insertion-ordered. Additions land at the end and are immediately visible
//! to collision scans; removals are only marked during a pass and applied in
//! one `reconcile` step after every entity has had its update. The update
//! loop temporarily lifts an entity out of its slot while it runs, so an
//! entity never sees itself when it walks the registry.

use crate::sim::entity::{Entity, EntityId, EntityKind};
use crate::sim::tank::Tank;

#[derive(Debug, Default, Clone)]
pub struct Registry {
    /// `None` only while the owner of that slot is being updated
    slots: Vec<Option<Entity>>,
    /// Ids marked for removal this pass
    pending: Vec<EntityId>,
    next_id: EntityId,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next registry-unique id
    pub fn allocate_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append an entity; never fails
    pub fn add(&mut self, entity: Entity) -> EntityId {
        let id = entity.id();
        self.slots.push(Some(entity));
        id
    }

    /// Mark an entity for removal at the end of the pass. Idempotent: a
    /// second call for the same id is a no-op, so two entities may each
    /// request the other's removal in the same frame.
    pub fn mark_removed(&mut self, id: EntityId) {
        if !self.pending.contains(&id) {
            self.pending.push(id);
        }
    }

    pub fn is_marked(&self, id: EntityId) -> bool {
        self.pending.contains(&id)
    }

    /// A slot holds this id and it is not marked for removal
    pub fn is_live(&self, id: EntityId) -> bool {
        !self.is_marked(id) && self.iter().any(|e| e.id() == id)
    }

    /// Apply all pending removals at once. Runs between passes, when every
    /// slot is occupied again.
    pub fn reconcile(&mut self) -> usize {
        debug_assert!(self.slots.iter().all(Option::is_some));
        if self.pending.is_empty() {
            return 0;
        }
        let before = self.slots.len();
        let pending = std::mem::take(&mut self.pending);
        self.slots
            .retain(|slot| slot.as_ref().is_some_and(|e| !pending.contains(&e.id())));
        before - self.slots.len()
    }

    /// Slot count, including slots whose entity is currently lifted out.
    /// Snapshot this before an update pass: entities appended mid-pass get
    /// higher indices and wait for the next pass.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Lift the entity out of slot `i` for the duration of its update
    pub fn take_slot(&mut self, i: usize) -> Option<Entity> {
        self.slots.get_mut(i).and_then(Option::take)
    }

    /// Return a lifted entity to its slot
    pub fn put_back(&mut self, i: usize, entity: Entity) {
        debug_assert!(self.slots[i].is_none());
        self.slots[i] = Some(entity);
    }

    /// Lift an entity out by id (damage resolution targets)
    pub fn take_by_id(&mut self, id: EntityId) -> Option<(usize, Entity)> {
        let i = self
            .slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|e| e.id() == id))?;
        Some((i, self.slots[i].take().expect("slot occupied")))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.iter_live().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        if self.is_marked(id) {
            return None;
        }
        self.slots
            .iter_mut()
            .flatten()
            .find(|e| e.id() == id)
    }

    /// Every entity currently in a slot, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.slots.iter().flatten()
    }

    /// Like `iter`, but skipping entities already marked removed this pass
    pub fn iter_live(&self) -> impl Iterator<Item = &Entity> {
        self.iter().filter(|e| !self.is_marked(e.id()))
    }

    pub fn live_count(&self) -> usize {
        self.iter_live().count()
    }

    pub fn count_kind(&self, kind: EntityKind) -> usize {
        self.iter_live().filter(|e| e.kind() == kind).count()
    }

    /// The tanks still in the fight, registry order
    pub fn tanks(&self) -> impl Iterator<Item = &Tank> {
        self.iter().filter_map(|e| match e {
            Entity::Tank(t) => Some(t),
            _ => None,
        })
    }
}
