// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod connection_messages;
pub mod connection_service;
pub mod recommended_server_service;
pub mod server_service;

#[cfg(test)]
mod connection_service_tests;

pub use connection_messages::ConnectionMessages;

pub use connection_service::ConnectionService;

pub use recommended_server_service::{RecommendedServerService, ScoringRules, ServerProber};

pub use server_service::ServerService;

#[cfg(test)]
pub use recommended_server_service::MockServerProber;
