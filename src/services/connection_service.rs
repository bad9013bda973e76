// src/services/connection_service.rs
//
// Connection Service - turns an entered address into a server to use
//
// CRITICAL RULES:
// - Every candidate is probed before selection (the error path needs all of them)
// - The first GREAT candidate wins, otherwise the first GOOD one
// - OK and BAD candidates are never selected
// - An error lists every OK/BAD candidate exactly once
// - Probe failures never escape: they are BAD results, not errors
//
// SELECTION:
// Candidates keep the expander's order. Later GREAT results after the
// winner are ignored; they take part in neither selection nor the report.

use futures::{Stream, StreamExt};
use std::sync::Arc;

use crate::config::DISCOVERY_MAX_SERVERS;
use crate::domain::{ProbeResult, ProbeScore, ResolutionOutcome, ServerDiscoveryInfo};
use crate::events::{EventBus, LocalServerDiscovered, ServerResolutionFailed, ServerResolved};
use crate::integrations::{AddressCandidateExpander, LocalServerDiscovery};
use crate::services::connection_messages::ConnectionMessages;
use crate::services::recommended_server_service::ServerProber;

// ============================================================================
// CONNECTION SERVICE
// ============================================================================

pub struct ConnectionService {
    expander: Arc<dyn AddressCandidateExpander>,
    prober: Arc<dyn ServerProber>,
    discovery: Arc<dyn LocalServerDiscovery>,
    event_bus: Arc<EventBus>,
    messages: ConnectionMessages,
    max_servers: usize,
}

/// Probe results bucketed by score, each bucket in candidate order
#[derive(Debug, Default)]
struct Classification {
    great: Option<ProbeResult>,
    good: Vec<ProbeResult>,
    bad: Vec<ProbeResult>,
}

impl Classification {
    fn from_results(results: Vec<ProbeResult>) -> Self {
        let mut classification = Self::default();

        for result in results {
            match result.score {
                ProbeScore::Great => {
                    if classification.great.is_none() {
                        classification.great = Some(result);
                    }
                }
                ProbeScore::Good => classification.good.push(result),
                ProbeScore::Ok | ProbeScore::Bad => classification.bad.push(result),
            }
        }

        classification
    }

    fn into_selection(self) -> Result<ProbeResult, Vec<ProbeResult>> {
        match self.great.or_else(|| self.good.into_iter().next()) {
            Some(server) => Ok(server),
            None => Err(self.bad),
        }
    }
}

impl ConnectionService {
    pub fn new(
        expander: Arc<dyn AddressCandidateExpander>,
        prober: Arc<dyn ServerProber>,
        discovery: Arc<dyn LocalServerDiscovery>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            expander,
            prober,
            discovery,
            event_bus,
            messages: ConnectionMessages::default(),
            max_servers: DISCOVERY_MAX_SERVERS,
        }
    }

    pub fn with_messages(mut self, messages: ConnectionMessages) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_max_servers(mut self, max_servers: usize) -> Self {
        self.max_servers = max_servers;
        self
    }

    // ========================================================================
    // RESOLUTION
    // ========================================================================

    /// Resolve an entered address to the best usable candidate.
    ///
    /// Never returns `Pending` or `Unchecked`; those belong to the caller's
    /// view of an attempt.
    pub async fn resolve(&self, entered_address: &str) -> ResolutionOutcome {
        log::info!("Checking server address '{}'", entered_address);

        let candidates = self.expander.candidates(entered_address);
        log::info!("Address candidates are {:?}", candidates);

        let results = self.prober.probe(&candidates).await;

        match Classification::from_results(results).into_selection() {
            Ok(server) => {
                let version = server.version().map(str::to_string);
                log::info!(
                    "Found valid server at {} with rating {} and version {}",
                    server.address,
                    server.score,
                    version.as_deref().unwrap_or("unknown")
                );

                self.event_bus.emit(ServerResolved::new(
                    entered_address.to_string(),
                    server.address.clone(),
                    server.score,
                    version,
                ));

                ResolutionOutcome::Success(server.address)
            }
            Err(bad) => {
                let logged: Vec<String> = bad
                    .iter()
                    .map(|result| format!("{}/{:?}", result.address, result.issues))
                    .collect();
                log::info!(
                    "No valid servers found, invalid candidates were: {}",
                    logged.join(", ")
                );

                let (unreachable, incompatible): (Vec<&ProbeResult>, Vec<&ProbeResult>) =
                    bad.iter().partition(|result| !result.is_reachable());

                self.event_bus.emit(ServerResolutionFailed::new(
                    entered_address.to_string(),
                    unreachable.iter().map(|r| r.address.clone()).collect(),
                    incompatible.iter().map(|r| r.address.clone()).collect(),
                ));

                ResolutionOutcome::Error(self.messages.failure_message(&bad))
            }
        }
    }

    // ========================================================================
    // LOCAL DISCOVERY
    // ========================================================================

    /// Lazily discover servers on the local network, up to the configured
    /// maximum. Dropping the stream stops discovery.
    pub fn discover_local_servers(&self) -> impl Stream<Item = ServerDiscoveryInfo> + Send + Unpin {
        self.discover_local_servers_up_to(self.max_servers)
    }

    pub fn discover_local_servers_up_to(
        &self,
        max_servers: usize,
    ) -> impl Stream<Item = ServerDiscoveryInfo> + Send + Unpin {
        let max_servers = max_servers.min(self.max_servers);
        log::info!("Starting local server discovery (max {})", max_servers);

        let event_bus = Arc::clone(&self.event_bus);
        self.discovery.discover(max_servers).inspect(move |info| {
            event_bus.emit(LocalServerDiscovered::new(
                info.id.clone(),
                info.name.clone(),
                info.address.clone(),
            ));
        })
    }
}
