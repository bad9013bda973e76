// src/events/bus/event_bus.rs
//
// Core event bus implementation.
//
// DESIGN PRINCIPLES:
// 1. Synchronous - handlers execute immediately in subscription order
// 2. Observable - recent emissions are kept in a bounded log
// 3. Type-safe - events are strongly typed
// 4. Re-entrant - no lock is held while handlers run

use std::any::{Any, TypeId};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, PoisonError, RwLock};

use crate::events::types::DomainEvent;

/// Type-erased event handler function
/// Takes a reference to Any (downcasted to concrete event type inside)
type EventHandler = Arc<dyn Fn(&dyn Any) + Send + Sync>;

/// Number of emissions kept in the event log
pub const EVENT_LOG_CAPACITY: usize = 256;

/// The Event Bus
///
/// Services emit events here; the CLI and any other observer subscribe
/// without the services knowing about them.
///
/// Key characteristics:
/// - Synchronous execution, handlers run on the emitting task
/// - Handlers execute in subscription order
/// - A panicking handler does not prevent the others from running
pub struct EventBus {
    /// Map from event TypeId to list of handlers
    handlers: Arc<RwLock<HashMap<TypeId, Vec<EventHandler>>>>,

    /// Most recent emissions, oldest dropped first (for debugging)
    event_log: Arc<RwLock<VecDeque<EventLogEntry>>>,
}

/// A logged event for debugging and tracing
#[derive(Debug, Clone)]
pub struct EventLogEntry {
    pub event_type: String,
    pub event_id: String,
    pub occurred_at: String,
    pub handler_count: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
            event_log: Arc::new(RwLock::new(VecDeque::with_capacity(EVENT_LOG_CAPACITY))),
        }
    }

    /// Subscribe to a specific event type
    ///
    /// Example:
    /// ```ignore
    /// bus.subscribe::<ServerResolved, _>(|event| {
    ///     println!("Resolved to {}", event.address);
    /// });
    /// ```
    pub fn subscribe<E, F>(&self, handler: F)
    where
        E: DomainEvent + 'static,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let type_id = TypeId::of::<E>();

        let wrapped: EventHandler = Arc::new(move |event_any: &dyn Any| {
            if let Some(event) = event_any.downcast_ref::<E>() {
                handler(event);
            } else {
                log::error!(
                    "Failed to downcast event in handler for {}",
                    std::any::type_name::<E>()
                );
            }
        });

        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        handlers.entry(type_id).or_default().push(wrapped);
    }

    /// Emit an event
    ///
    /// Logs the event, then runs every handler for its type in
    /// subscription order before returning. Handlers subscribed while
    /// an emission runs only see later events.
    pub fn emit<E>(&self, event: E)
    where
        E: DomainEvent + 'static,
    {
        let type_id = TypeId::of::<E>();

        let event_handlers: Vec<EventHandler> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .cloned()
            .unwrap_or_default();

        let log_entry = EventLogEntry {
            event_type: event.event_type().to_string(),
            event_id: event.event_id().to_string(),
            occurred_at: event.occurred_at().to_rfc3339(),
            handler_count: event_handlers.len(),
        };

        log::debug!(
            "[EVENT] {} (id: {}) | {} handlers",
            log_entry.event_type,
            log_entry.event_id,
            log_entry.handler_count
        );

        {
            let mut event_log = self.event_log.write().unwrap_or_else(PoisonError::into_inner);
            if event_log.len() == EVENT_LOG_CAPACITY {
                event_log.pop_front();
            }
            event_log.push_back(log_entry);
        }

        for (idx, handler) in event_handlers.iter().enumerate() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                handler(&event as &dyn Any);
            }));

            if let Err(e) = result {
                log::error!(
                    "Handler {} for {} panicked: {:?}",
                    idx,
                    event.event_type(),
                    e
                );
            }
        }
    }

    /// Get the event log, oldest first (for debugging)
    pub fn get_event_log(&self) -> Vec<EventLogEntry> {
        self.event_log
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn clear_event_log(&self) {
        self.event_log
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Get the number of subscribers for a specific event type
    pub fn subscriber_count<E>(&self) -> usize
    where
        E: 'static,
    {
        let type_id = TypeId::of::<E>();
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        handlers.get(&type_id).map(|h| h.len()).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

// Clones share handlers and log
impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            handlers: Arc::clone(&self.handlers),
            event_log: Arc::clone(&self.event_log),
        }
    }
}
