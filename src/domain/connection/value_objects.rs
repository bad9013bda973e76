// src/domain/connection/value_objects.rs
//
// Connection Value Objects
//
// Pure, immutable data structures describing one resolution attempt.
//
// CRITICAL INVARIANTS:
// - Exactly one ProbeResult per candidate address
// - A ProbeResult without system info means the candidate was unreachable
// - ResolutionOutcome::Success always carries a probed candidate address

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::version::ServerVersion;

/// Product name reported by a compatible server
pub const EXPECTED_PRODUCT_NAME: &str = "Jellyfin Server";

// ============================================================================
// PROBE SCORE
// ============================================================================

/// Discrete reachability/compatibility rating of a probed candidate.
///
/// Variants are declared worst-first so the derived `Ord` ranks
/// `Bad < Ok < Good < Great`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProbeScore {
    Bad,
    Ok,
    Good,
    Great,
}

impl fmt::Display for ProbeScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProbeScore::Bad => "BAD",
            ProbeScore::Ok => "OK",
            ProbeScore::Good => "GOOD",
            ProbeScore::Great => "GREAT",
        };
        f.write_str(label)
    }
}

// ============================================================================
// PROBE ISSUES
// ============================================================================

/// A reason a candidate scored below GREAT
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbeIssue {
    /// Plain HTTP connection
    MissingHttps,

    /// The identity request took longer than the configured threshold
    SlowResponse { response_time_ms: u64 },

    /// No identity document could be fetched
    Unreachable { reason: String },

    /// Something answered, but not the expected server product
    InvalidProductName { product_name: String },

    /// The identity document has no parseable version
    MissingVersion,

    /// Server is older than the minimum supported release
    UnsupportedServerVersion { version: ServerVersion },

    /// Server works but is older than the recommended release
    OutdatedServerVersion { version: ServerVersion },
}

impl fmt::Display for ProbeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeIssue::MissingHttps => write!(f, "connection is not encrypted"),
            ProbeIssue::SlowResponse { response_time_ms } => {
                write!(f, "slow response ({} ms)", response_time_ms)
            }
            ProbeIssue::Unreachable { reason } => write!(f, "unreachable: {}", reason),
            ProbeIssue::InvalidProductName { product_name } => {
                write!(f, "unexpected product '{}'", product_name)
            }
            ProbeIssue::MissingVersion => write!(f, "server did not report a valid version"),
            ProbeIssue::UnsupportedServerVersion { version } => {
                write!(f, "unsupported server version {}", version)
            }
            ProbeIssue::OutdatedServerVersion { version } => {
                write!(f, "outdated server version {}", version)
            }
        }
    }
}

// ============================================================================
// PUBLIC SYSTEM INFO
// ============================================================================

/// Unauthenticated identity document served at `/System/Info/Public`.
/// Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PublicSystemInfo {
    pub id: Option<String>,
    pub server_name: Option<String>,
    pub version: Option<String>,
    pub product_name: Option<String>,
    pub operating_system: Option<String>,
    pub local_address: Option<String>,
    pub startup_wizard_completed: Option<bool>,
}

impl PublicSystemInfo {
    /// The reported version, if present and well-formed
    pub fn parsed_version(&self) -> Option<ServerVersion> {
        self.version.as_deref().and_then(|v| v.parse().ok())
    }
}

// ============================================================================
// PROBE RESULT
// ============================================================================

/// The classification of one probed candidate address
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub address: String,
    pub score: ProbeScore,
    pub system_info: Option<PublicSystemInfo>,
    pub issues: Vec<ProbeIssue>,
    pub response_time: Duration,
}

impl ProbeResult {
    pub fn new(address: impl Into<String>, score: ProbeScore, system_info: Option<PublicSystemInfo>) -> Self {
        Self {
            address: address.into(),
            score,
            system_info,
            issues: Vec::new(),
            response_time: Duration::ZERO,
        }
    }

    pub fn with_issues(mut self, issues: Vec<ProbeIssue>) -> Self {
        self.issues = issues;
        self
    }

    pub fn with_response_time(mut self, response_time: Duration) -> Self {
        self.response_time = response_time;
        self
    }

    /// True when the candidate answered with an identity document
    pub fn is_reachable(&self) -> bool {
        self.system_info.is_some()
    }

    pub fn version(&self) -> Option<&str> {
        self.system_info.as_ref().and_then(|info| info.version.as_deref())
    }
}

// ============================================================================
// RESOLUTION OUTCOME
// ============================================================================

/// Terminal state of a resolution attempt, as rendered by a connect screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum ResolutionOutcome {
    /// No attempt has been made yet
    Unchecked,

    /// An attempt is in flight
    Pending,

    /// The winning candidate address
    Success(String),

    /// Itemized diagnostic, or `None` when no candidate could be attempted
    Error(Option<String>),
}

impl ResolutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ResolutionOutcome::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ResolutionOutcome::Error(_))
    }

    /// The resolved address on success
    pub fn address(&self) -> Option<&str> {
        match self {
            ResolutionOutcome::Success(address) => Some(address),
            _ => None,
        }
    }

    /// The itemized error message, if this is an error that has one
    pub fn error_message(&self) -> Option<&str> {
        match self {
            ResolutionOutcome::Error(message) => message.as_deref(),
            _ => None,
        }
    }
}

impl Default for ResolutionOutcome {
    fn default() -> Self {
        ResolutionOutcome::Unchecked
    }
}

// ============================================================================
// LOCAL DISCOVERY
// ============================================================================

/// A server that answered the local network discovery broadcast
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerDiscoveryInfo {
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub endpoint_address: Option<String>,
}
