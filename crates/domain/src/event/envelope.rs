use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

/// Unique identifier for a dispatched event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random event ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an event ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trait for domain events.
///
/// Domain events represent facts that have happened in the domain.
/// They are immutable and named in past tense.
pub trait DomainEvent: Serialize + DeserializeOwned + Send + Sync + Clone {
    /// Returns the event type name.
    ///
    /// This is the name handlers register under with the dispatcher.
    fn event_type(&self) -> &'static str;
}

/// An immutable envelope wrapping a domain event payload.
///
/// Envelopes are transient messages: entities never hold a reference back to
/// the envelopes they emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// When the event occurred.
    pub occurred_at: DateTime<Utc>,

    /// The payload: the triggering data, or a snapshot of the entity that
    /// changed.
    pub payload: E,
}

impl<E: DomainEvent> EventEnvelope<E> {
    /// Wraps a payload, stamping a fresh event ID and the current time.
    pub fn new(payload: E) -> Self {
        Self {
            event_id: EventId::new(),
            occurred_at: Utc::now(),
            payload,
        }
    }

    /// Returns the payload's event type name.
    pub fn event_type(&self) -> &'static str {
        self.payload.event_type()
    }
}
