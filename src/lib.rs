// src/lib.rs
// serverhub - Media server connection resolver
//
// Architecture:
// - Domain-centric: scoring vocabulary and invariants live in domain
// - Event-driven: services report what happened through the event bus
// - Explicit: collaborators are traits, wired together in main.rs
// - Application layer: the CLI boundary

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod integrations;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    validate_hostname,
    validate_server,
    DomainError,
    ProbeIssue,
    ProbeResult,
    ProbeScore,
    PublicSystemInfo,
    ResolutionOutcome,
    Server,
    ServerDiscoveryInfo,
    ServerVersion,
};

// ============================================================================
// PUBLIC API - Configuration & Errors
// ============================================================================

pub use config::{AppConfig, ConnectionConfig, DiscoveryConfig};
pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus,
    DomainEvent,
    EventBus,
    EventLogEntry,
    LocalServerDiscovered,
    ServerForgotten,
    ServerResolutionFailed,
    ServerResolved,
    ServerSelected,
};

// ============================================================================
// PUBLIC API - Database & Repositories
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};
pub use repositories::{ServerRepository, SqliteServerRepository};

// ============================================================================
// PUBLIC API - Integrations
// ============================================================================

pub use integrations::{
    AddressCandidateExpander,
    AddressCandidateHelper,
    DiscoveryStream,
    JellyfinClient,
    LocalServerDiscovery,
    SystemInfoFetcher,
    UdpServerDiscovery,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    ConnectionMessages,
    ConnectionService,
    RecommendedServerService,
    ScoringRules,
    ServerProber,
    ServerService,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::AppState;

pub use application::commands;
pub use application::dto;
