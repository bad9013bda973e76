// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are presentation-friendly representations
// - DTOs are simple, serializable structs
// - Conversion FROM domain types only (never TO)

use serde::{Deserialize, Serialize};

// ============================================================================
// RESOLUTION DTOs
// ============================================================================

/// Flattened `ResolutionOutcome` for display and JSON output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionOutcomeDto {
    /// "unchecked", "pending", "success" or "error"
    pub state: String,
    pub address: Option<String>,
    pub message: Option<String>,
}

/// Result of `check_server_url`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckServerUrlDto {
    pub outcome: ResolutionOutcomeDto,
    /// The remembered server on success
    pub server: Option<ServerDto>,
}

// ============================================================================
// SERVER DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerDto {
    pub id: i64,
    pub hostname: String,
    pub last_used_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredServerDto {
    pub id: String,
    pub name: String,
    pub address: String,
    pub endpoint_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseStatusDto {
    pub size_bytes: i64,
    pub server_count: i64,
    pub last_used: Option<ServerDto>,
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<crate::domain::ResolutionOutcome> for ResolutionOutcomeDto {
    fn from(outcome: crate::domain::ResolutionOutcome) -> Self {
        use crate::domain::ResolutionOutcome;

        let (state, address, message) = match outcome {
            ResolutionOutcome::Unchecked => ("unchecked", None, None),
            ResolutionOutcome::Pending => ("pending", None, None),
            ResolutionOutcome::Success(address) => ("success", Some(address), None),
            ResolutionOutcome::Error(message) => ("error", None, message),
        };

        Self {
            state: state.to_string(),
            address,
            message,
        }
    }
}

impl From<crate::domain::Server> for ServerDto {
    fn from(server: crate::domain::Server) -> Self {
        Self {
            id: server.id,
            hostname: server.hostname,
            last_used_at: server.last_used_at.to_rfc3339(),
        }
    }
}

impl From<crate::domain::ServerDiscoveryInfo> for DiscoveredServerDto {
    fn from(info: crate::domain::ServerDiscoveryInfo) -> Self {
        Self {
            id: info.id,
            name: info.name,
            address: info.address,
            endpoint_address: info.endpoint_address,
        }
    }
}
