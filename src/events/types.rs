// src/events/types.rs
//
// Domain event contract.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events carry only the data needed to react
// - No business logic in event types

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}
