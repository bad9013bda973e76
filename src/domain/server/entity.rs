use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A media server the user has successfully connected to.
///
/// The hostname is the resolved base URL (scheme, host, optional port and
/// path), never the raw text the user typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    /// Database row id; `0` until the server has been persisted
    pub id: i64,

    /// Resolved base URL, unique across servers
    pub hostname: String,

    /// Last time a connection to this server was established
    pub last_used_at: DateTime<Utc>,
}

impl Server {
    /// Create a not-yet-persisted server, marked as used now
    pub fn new(hostname: String) -> Self {
        Self {
            id: 0,
            hostname,
            last_used_at: Utc::now(),
        }
    }

    /// Mark the server as used now
    pub fn touch(&mut self) {
        self.last_used_at = Utc::now();
    }

    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }
}
