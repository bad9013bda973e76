// src/integrations/jellyfin/mod.rs
//
// Server-side protocol pieces: address expansion, the public identity
// endpoint and UDP discovery.

pub mod address_candidates;
pub mod client;
pub mod discovery;

pub use address_candidates::{
    AddressCandidateExpander, AddressCandidateHelper, DEFAULT_HTTPS_PORT, DEFAULT_HTTP_PORT,
};
pub use client::{JellyfinClient, SystemInfoFetcher, SYSTEM_INFO_PATH};
pub use discovery::{
    parse_discovery_reply, DiscoveryStream, LocalServerDiscovery, UdpServerDiscovery,
    DISCOVERY_MESSAGE,
};

#[cfg(test)]
pub use address_candidates::MockAddressCandidateExpander;
#[cfg(test)]
pub use client::MockSystemInfoFetcher;
#[cfg(test)]
pub use discovery::MockLocalServerDiscovery;
