use super::entity::Server;
use crate::domain::{DomainError, DomainResult};
use url::Url;

/// Validates all Server invariants
pub fn validate_server(server: &Server) -> DomainResult<()> {
    validate_hostname(&server.hostname)
}

/// A hostname must be a non-empty http(s) URL with a host
pub fn validate_hostname(hostname: &str) -> DomainResult<()> {
    if hostname.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Server hostname cannot be empty".to_string(),
        ));
    }

    let url = Url::parse(hostname).map_err(|e| {
        DomainError::InvariantViolation(format!("Server hostname '{}' is not a URL: {}", hostname, e))
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(DomainError::InvariantViolation(format!(
                "Unsupported scheme '{}' in server hostname '{}'",
                other, hostname
            )))
        }
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(DomainError::InvariantViolation(format!(
            "Server hostname '{}' has no host",
            hostname
        )));
    }

    Ok(())
}

/// Invariants that must hold true for the Server domain:
///
/// 1. Hostname is a resolved http(s) URL, never raw user input
/// 2. Hostname is unique (enforced by the repository schema)
/// 3. Id is assigned by storage and never changes
