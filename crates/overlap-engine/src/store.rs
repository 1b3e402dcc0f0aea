//! Event persistence boundary.
//!
//! The overlap engine only ever needs [`EventStore::list`]; the remaining
//! operations back the CRUD surface in [`crate::service`].

use parking_lot::RwLock;
use tracing::debug;

use crate::error::Result;
use crate::event::{Event, EventId, NewEvent};

/// Storage for validated events.
///
/// Implementations serialize their own writes. `list` must return a consistent
/// snapshot; no guarantee is made about writes that race with it.
pub trait EventStore: Send + Sync {
    /// Every stored event, in insertion order.
    fn list(&self) -> Result<Vec<Event>>;

    fn get_by_id(&self, id: &EventId) -> Result<Option<Event>>;

    /// Store a new event under a freshly assigned id.
    fn create(&self, event: NewEvent) -> Result<Event>;

    /// Replace the stored event with the same id. Returns `None` if there is none.
    fn update(&self, event: Event) -> Result<Option<Event>>;

    /// Remove and return the event. Returns `None` if there is none.
    fn delete(&self, id: &EventId) -> Result<Option<Event>>;
}

/// Process-local store backed by a `Vec` behind a read/write lock.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    events: RwLock<Vec<Event>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

impl EventStore for InMemoryEventStore {
    fn list(&self) -> Result<Vec<Event>> {
        Ok(self.events.read().clone())
    }

    fn get_by_id(&self, id: &EventId) -> Result<Option<Event>> {
        Ok(self.events.read().iter().find(|e| e.id() == *id).cloned())
    }

    fn create(&self, event: NewEvent) -> Result<Event> {
        let event = event.into_event(EventId::new());
        let mut events = self.events.write();
        events.push(event.clone());
        debug!(id = %event.id(), total = events.len(), "event_stored");
        Ok(event)
    }

    fn update(&self, event: Event) -> Result<Option<Event>> {
        let mut events = self.events.write();
        match events.iter_mut().find(|e| e.id() == event.id()) {
            Some(slot) => {
                *slot = event.clone();
                debug!(id = %event.id(), "event_replaced");
                Ok(Some(event))
            }
            None => Ok(None),
        }
    }

    fn delete(&self, id: &EventId) -> Result<Option<Event>> {
        let mut events = self.events.write();
        let Some(index) = events.iter().position(|e| e.id() == *id) else {
            return Ok(None);
        };
        let removed = events.remove(index);
        debug!(id = %id, total = events.len(), "event_removed");
        Ok(Some(removed))
    }
}
