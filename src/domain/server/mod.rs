pub mod entity;
pub mod invariants;

pub use entity::Server;
pub use invariants::{validate_hostname, validate_server};
