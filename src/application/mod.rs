// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - Boundary between the CLI and the services
// - Translates domain types into DTOs
// - Owns the per-session connect screen state

pub mod commands;
pub mod dto;
pub mod error_handling;
pub mod state;

pub use commands::*;
pub use dto::*;
pub use error_handling::{ErrorResponse, ErrorType, ToErrorResponse};
pub use state::{AppState, PendingCheck};
