use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::HandlerError;

use super::{DomainEvent, EventEnvelope};

/// An observer of domain events.
///
/// Handlers are side-effect-only: the correctness of the operation that
/// emitted the event must never depend on a handler running.
pub trait EventHandler<E: DomainEvent>: Send + Sync {
    /// Reacts to a delivered event.
    fn handle(&self, event: &EventEnvelope<E>) -> Result<(), HandlerError>;
}

/// Publish/subscribe registry mapping event names to ordered handler lists.
///
/// One dispatcher serves one entity class. There is no process-wide
/// singleton: the dispatcher is an explicit object owned by whoever
/// constructs it, and entities borrow it in the operations that emit events.
/// Tests should construct a fresh dispatcher per test to avoid cross-test
/// handler leakage.
///
/// The registry is synchronized so concurrent registration mutations and
/// `notify` reads never observe a torn handler list.
pub struct EventDispatcher<E: DomainEvent> {
    handlers: RwLock<HashMap<String, Vec<Arc<dyn EventHandler<E>>>>>,
}

impl<E: DomainEvent> EventDispatcher<E> {
    /// Creates an empty dispatcher.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Appends `handler` to the ordered list for `event_name`.
    ///
    /// Registering the same handler instance twice is permitted and results
    /// in duplicate invocation; there is no deduplication.
    pub fn register(&self, event_name: impl Into<String>, handler: Arc<dyn EventHandler<E>>) {
        let mut handlers = self.handlers.write().expect("handler registry poisoned");
        handlers.entry(event_name.into()).or_default().push(handler);
    }

    /// Removes every registration of `handler` for `event_name`.
    ///
    /// Handlers are matched by pointer identity. No-op when the handler was
    /// never registered.
    pub fn unregister(&self, event_name: &str, handler: &Arc<dyn EventHandler<E>>) {
        let mut handlers = self.handlers.write().expect("handler registry poisoned");
        if let Some(registered) = handlers.get_mut(event_name) {
            registered.retain(|existing| !Arc::ptr_eq(existing, handler));
        }
    }

    /// Removes every handler for every event name.
    pub fn unregister_all(&self) {
        self.handlers
            .write()
            .expect("handler registry poisoned")
            .clear();
    }

    /// Returns the number of handlers registered for `event_name`.
    pub fn handler_count(&self, event_name: &str) -> usize {
        self.handlers
            .read()
            .expect("handler registry poisoned")
            .get(event_name)
            .map_or(0, Vec::len)
    }

    /// Delivers `event` to every handler registered for its event name,
    /// synchronously, in registration order, on the calling thread.
    ///
    /// With no handlers registered this does nothing. The first handler
    /// error aborts delivery to the remaining handlers and propagates to the
    /// caller; handlers already invoked are not undone.
    pub fn notify(&self, event: &EventEnvelope<E>) -> Result<(), HandlerError> {
        // Handlers run outside the registry lock so they can themselves
        // register or unregister without deadlocking.
        let registered = {
            let handlers = self.handlers.read().expect("handler registry poisoned");
            match handlers.get(event.event_type()) {
                Some(list) => list.clone(),
                None => return Ok(()),
            }
        };

        for handler in registered {
            handler.handle(event)?;
        }
        Ok(())
    }
}

impl<E: DomainEvent> Default for EventDispatcher<E> {
    fn default() -> Self {
        Self::new()
    }
}
