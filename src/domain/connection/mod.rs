// src/domain/connection/mod.rs
//
// Connection Domain
//
// Value objects describing how an entered address turns into a server:
// probe results, their scores, the server identity document and the
// terminal resolution outcome.
//
// RULES:
// - Pure value objects, no I/O
// - Deterministic: same input → same output

pub mod value_objects;
pub mod version;

pub use value_objects::{
    ProbeIssue, ProbeResult, ProbeScore, PublicSystemInfo, ResolutionOutcome,
    ServerDiscoveryInfo, EXPECTED_PRODUCT_NAME,
};
pub use version::ServerVersion;
