// src/integrations/mod.rs
//
// External Integrations Module

pub mod jellyfin;

pub use jellyfin::{
    AddressCandidateExpander, AddressCandidateHelper, DiscoveryStream, JellyfinClient,
    LocalServerDiscovery, SystemInfoFetcher, UdpServerDiscovery,
};
