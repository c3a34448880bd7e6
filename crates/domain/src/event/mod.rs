//! In-process domain events.
//!
//! Entities announce state transitions by handing an [`EventEnvelope`] to an
//! [`EventDispatcher`]; registered [`EventHandler`]s observe them
//! synchronously, in registration order, on the calling thread.

mod dispatcher;
mod envelope;

pub use dispatcher::{EventDispatcher, EventHandler};
pub use envelope::{DomainEvent, EventEnvelope, EventId};
