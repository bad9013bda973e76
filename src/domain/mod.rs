// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod connection;
pub mod server;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Connection Domain (resolution value objects)
pub use connection::{
    ProbeIssue, ProbeResult, ProbeScore, PublicSystemInfo, ResolutionOutcome,
    ServerDiscoveryInfo, ServerVersion, EXPECTED_PRODUCT_NAME,
};

// Server Domain (remembered servers)
pub use server::{validate_hostname, validate_server, Server};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Invalid server version: {0}")]
    InvalidVersion(String),

    #[error("Entity not found: {0}")]
    NotFound(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
