// src/domain/connection/version.rs
//
// Server version parsing and ordering

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::DomainError;

/// A `major.minor.patch[.build]` server version.
///
/// Field order matters: the derived `Ord` compares major first, then minor,
/// patch and finally the optional build number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ServerVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub build: Option<u32>,
}

impl ServerVersion {
    /// Oldest server release this client can talk to at all
    pub const MINIMUM: ServerVersion = ServerVersion::new(10, 7, 0);

    /// Release the client API is built against; older servers work with gaps
    pub const RECOMMENDED: ServerVersion = ServerVersion::new(10, 8, 0);

    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            build: None,
        }
    }

    pub fn is_supported(&self) -> bool {
        *self >= Self::MINIMUM
    }

    pub fn is_outdated(&self) -> bool {
        *self < Self::RECOMMENDED
    }
}

impl FromStr for ServerVersion {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidVersion(s.to_string());

        let parts = s
            .trim()
            .split('.')
            .map(|part| part.parse::<u32>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        match parts.as_slice() {
            [major, minor, patch] => Ok(Self::new(*major, *minor, *patch)),
            [major, minor, patch, build] => Ok(Self {
                build: Some(*build),
                ..Self::new(*major, *minor, *patch)
            }),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(build) = self.build {
            write!(f, ".{}", build)?;
        }
        Ok(())
    }
}
