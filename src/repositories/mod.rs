// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO event emission
// - Explicit SQL only

pub mod server_repository;

pub use server_repository::{ServerRepository, SqliteServerRepository};

#[cfg(test)]
pub use server_repository::MockServerRepository;
