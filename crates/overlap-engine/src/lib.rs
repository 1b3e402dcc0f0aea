//! # overlap-engine
//!
//! Overlap detection for calendar events.
//!
//! Given a snapshot of events, the engine reports every pair whose time spans
//! intersect. Touching endpoints (one event ending exactly when the next begins)
//! do not count. Around that core sit the pieces a calendar service needs to
//! feed it: strict event validation, a store abstraction, and a service that
//! ties them together.
//!
//! ## Modules
//!
//! - [`overlap`] — Sort-and-sweep overlap detection over an event snapshot
//! - [`event`] — Typed `Event` values and validation of loosely-typed drafts
//! - [`store`] — `EventStore` trait and a thread-safe in-memory implementation
//! - [`service`] — Create/read/update/delete plus overlap reporting
//! - [`error`] — Error types

pub mod error;
pub mod event;
pub mod overlap;
pub mod service;
pub mod store;

pub use error::EngineError;
pub use event::{validate_event, Event, EventDraft, EventId, EventPatch, NewEvent};
pub use overlap::{detect_overlaps, find_overlaps, intervals_overlap, Overlap, OverlapPair};
pub use service::EventService;
pub use store::{EventStore, InMemoryEventStore};
