// src/events/mod.rs
//
// Internal Event System - Public API
//
// CRITICAL: the type-erased handler alias is INTERNAL and must NOT be exported

pub mod bus;
pub mod connection_events;
pub mod types;

// ============================================================================
// PUBLIC EXPORTS - Event Types and Bus Only
// ============================================================================

pub use types::DomainEvent;

pub use connection_events::{
    LocalServerDiscovered, ServerForgotten, ServerResolutionFailed, ServerResolved,
    ServerSelected,
};

pub use bus::{EventBus, EventLogEntry};

/// Initialize a new event bus
pub fn create_event_bus() -> EventBus {
    EventBus::new()
}
