//! Event service: validation, storage and overlap reporting in one place.
//!
//! Every write goes through [`validate_event`], so a store only ever holds
//! events that satisfy the [`Event`] invariants. Overlaps are computed from a
//! fresh [`EventStore::list`] snapshot on every call.

use tracing::{info, warn};

use crate::error::{EngineError, Result};
use crate::event::{validate_event, Event, EventDraft, EventId, EventPatch};
use crate::overlap::{detect_overlaps, OverlapPair};
use crate::store::EventStore;

#[derive(Debug, Default)]
pub struct EventService<S> {
    store: S,
}

impl<S: EventStore> EventService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate and store a new event.
    ///
    /// # Errors
    /// Returns `EngineError::Validation` listing every problem with the draft.
    pub fn create(&self, draft: &EventDraft) -> Result<Event> {
        let new_event = validate_event(draft).inspect_err(|err| {
            warn!(errors = ?err.messages(), "event_rejected");
        })?;
        let event = self.store.create(new_event)?;
        info!(id = %event.id(), title = event.title(), "event_created");
        Ok(event)
    }

    pub fn list(&self) -> Result<Vec<Event>> {
        self.store.list()
    }

    /// # Errors
    /// Returns `EngineError::NotFound` if no event has this id.
    pub fn get(&self, id: &EventId) -> Result<Event> {
        self.store
            .get_by_id(id)?
            .ok_or(EngineError::NotFound(*id))
    }

    /// Apply a partial update.
    ///
    /// The patch is merged onto the stored event and the merged record is
    /// validated as a whole, so a patch touching only `endTime` is still checked
    /// against the stored `startTime`.
    ///
    /// # Errors
    /// Returns `EngineError::NotFound` if no event has this id, or
    /// `EngineError::Validation` if the merged record is invalid.
    pub fn update(&self, id: &EventId, patch: &EventPatch) -> Result<Event> {
        let current = self.get(id)?;
        if patch.is_empty() {
            return Ok(current);
        }

        let new_event = validate_event(&patch.apply_to(&current)).inspect_err(|err| {
            warn!(id = %id, errors = ?err.messages(), "event_update_rejected");
        })?;

        let updated = self
            .store
            .update(new_event.into_event(*id))?
            .ok_or(EngineError::NotFound(*id))?;
        info!(id = %id, title = updated.title(), "event_updated");
        Ok(updated)
    }

    /// # Errors
    /// Returns `EngineError::NotFound` if no event has this id.
    pub fn delete(&self, id: &EventId) -> Result<Event> {
        let removed = self
            .store
            .delete(id)?
            .ok_or(EngineError::NotFound(*id))?;
        info!(id = %id, "event_deleted");
        Ok(removed)
    }

    /// Overlapping pairs across the whole store.
    pub fn overlaps(&self) -> Result<Vec<OverlapPair>> {
        let snapshot = self.store.list()?;
        Ok(detect_overlaps(&snapshot))
    }
}
