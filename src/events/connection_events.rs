// src/events/connection_events.rs
//
// Events emitted by the connection flow: resolution outcomes, local
// discovery and server selection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ProbeScore;
use crate::events::DomainEvent;

// ============================================================================
// RESOLUTION
// ============================================================================

/// Emitted when an entered address resolved to a usable server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerResolved {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub entered_address: String,
    pub address: String,
    pub score: ProbeScore,
    pub version: Option<String>,
}

impl ServerResolved {
    pub fn new(
        entered_address: String,
        address: String,
        score: ProbeScore,
        version: Option<String>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            entered_address,
            address,
            score,
            version,
        }
    }
}

impl DomainEvent for ServerResolved {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "ServerResolved" }
}

/// Emitted when no candidate of an entered address was usable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerResolutionFailed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub entered_address: String,
    pub unreachable: Vec<String>,
    pub incompatible: Vec<String>,
}

impl ServerResolutionFailed {
    pub fn new(entered_address: String, unreachable: Vec<String>, incompatible: Vec<String>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            entered_address,
            unreachable,
            incompatible,
        }
    }

    /// True when the input produced no candidates at all
    pub fn had_no_candidates(&self) -> bool {
        self.unreachable.is_empty() && self.incompatible.is_empty()
    }
}

impl DomainEvent for ServerResolutionFailed {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "ServerResolutionFailed" }
}

// ============================================================================
// DISCOVERY
// ============================================================================

/// Emitted for every server answering a local discovery broadcast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalServerDiscovered {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub server_id: String,
    pub name: String,
    pub address: String,
}

impl LocalServerDiscovered {
    pub fn new(server_id: String, name: String, address: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            server_id,
            name,
            address,
        }
    }
}

impl DomainEvent for LocalServerDiscovered {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "LocalServerDiscovered" }
}

// ============================================================================
// SELECTION
// ============================================================================

/// Emitted when a resolved server becomes the current one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSelected {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub server_id: i64,
    pub hostname: String,
}

impl ServerSelected {
    pub fn new(server_id: i64, hostname: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            server_id,
            hostname,
        }
    }
}

impl DomainEvent for ServerSelected {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "ServerSelected" }
}

/// Emitted when a remembered server is removed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerForgotten {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub server_id: i64,
}

impl ServerForgotten {
    pub fn new(server_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            server_id,
        }
    }
}

impl DomainEvent for ServerForgotten {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "ServerForgotten" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_types() {
        let resolved = ServerResolved::new(
            "myserver".to_string(),
            "https://myserver".to_string(),
            ProbeScore::Great,
            Some("10.8.13".to_string()),
        );
        assert_eq!(resolved.event_type(), "ServerResolved");

        let failed = ServerResolutionFailed::new(String::new(), vec![], vec![]);
        assert_eq!(failed.event_type(), "ServerResolutionFailed");
        assert!(failed.had_no_candidates());
    }

    #[test]
    fn test_event_ids_are_unique() {
        let a = ServerSelected::new(1, "https://a.example".to_string());
        let b = ServerSelected::new(1, "https://a.example".to_string());
        assert_ne!(a.event_id(), b.event_id());
    }
}
