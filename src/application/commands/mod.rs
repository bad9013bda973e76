// src/application/commands/mod.rs
//
// Command Handlers
//
// ARCHITECTURE:
// - Commands are thin adapters between the CLI and Services
// - Commands return DTOs
// - Commands handle error conversion (AppError → ErrorResponse)
// - Commands NEVER contain business logic

pub mod connection_commands;
pub mod server_commands;

pub use connection_commands::*;
pub use server_commands::*;
