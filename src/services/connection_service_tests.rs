// src/services/connection_service_tests.rs
//
// Connection Service Tests
//
// PURPOSE:
// - Prove the selection rule: first GREAT, else first GOOD, never OK/BAD
// - Prove the failure report lists every rejected candidate exactly once
// - Prove resolution is deterministic for a deterministic prober
// - Prove discovery is lazy and reports every server it yields

#[cfg(test)]
mod resolve_tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::domain::{ProbeResult, ProbeScore, PublicSystemInfo, ResolutionOutcome};
    use crate::events::{EventBus, ServerResolutionFailed, ServerResolved};
    use crate::integrations::jellyfin::{
        AddressCandidateHelper, MockAddressCandidateExpander, MockLocalServerDiscovery,
    };
    use crate::services::connection_messages::ConnectionMessages;
    use crate::services::connection_service::ConnectionService;
    use crate::services::recommended_server_service::MockServerProber;

    // ========================================================================
    // TEST HELPERS
    // ========================================================================

    fn info(version: &str) -> PublicSystemInfo {
        PublicSystemInfo {
            version: Some(version.to_string()),
            product_name: Some("Jellyfin Server".to_string()),
            ..Default::default()
        }
    }

    fn reachable(address: &str, score: ProbeScore) -> ProbeResult {
        ProbeResult::new(address, score, Some(info("10.8.13")))
    }

    fn unreachable(address: &str) -> ProbeResult {
        ProbeResult::new(address, ProbeScore::Bad, None)
    }

    fn expander_for(candidates: Vec<&str>) -> MockAddressCandidateExpander {
        let candidates: Vec<String> = candidates.into_iter().map(String::from).collect();
        let mut expander = MockAddressCandidateExpander::new();
        expander
            .expect_candidates()
            .returning(move |_| candidates.clone());
        expander
    }

    /// Prober answering from a fixed table, one result per candidate
    fn prober_for(table: Vec<ProbeResult>) -> MockServerProber {
        let mut prober = MockServerProber::new();
        prober.expect_probe().returning(move |candidates| {
            candidates
                .iter()
                .map(|address| {
                    table
                        .iter()
                        .find(|result| &result.address == address)
                        .cloned()
                        .unwrap_or_else(|| unreachable(address))
                })
                .collect()
        });
        prober
    }

    fn service(
        expander: MockAddressCandidateExpander,
        prober: MockServerProber,
        event_bus: Arc<EventBus>,
    ) -> ConnectionService {
        ConnectionService::new(
            Arc::new(expander),
            Arc::new(prober),
            Arc::new(MockLocalServerDiscovery::new()),
            event_bus,
        )
    }

    fn count_occurrences(haystack: &str, needle: &str) -> usize {
        haystack
            .lines()
            .filter(|line| line.trim_start_matches("\u{00b7} ") == needle)
            .count()
    }

    // ========================================================================
    // SELECTION
    // ========================================================================

    #[tokio::test]
    async fn test_great_candidate_wins() {
        let service = service(
            expander_for(vec!["https://myserver", "http://myserver"]),
            prober_for(vec![
                reachable("https://myserver", ProbeScore::Great),
                reachable("http://myserver", ProbeScore::Ok),
            ]),
            Arc::new(EventBus::new()),
        );

        let outcome = service.resolve("myserver").await;
        assert_eq!(outcome, ResolutionOutcome::Success("https://myserver".to_string()));
    }

    #[tokio::test]
    async fn test_great_wins_over_earlier_good_and_bad() {
        let service = service(
            expander_for(vec!["https://a", "http://a", "https://a:8920", "http://a:8096"]),
            prober_for(vec![
                reachable("https://a", ProbeScore::Good),
                unreachable("http://a"),
                reachable("https://a:8920", ProbeScore::Great),
                reachable("http://a:8096", ProbeScore::Great),
            ]),
            Arc::new(EventBus::new()),
        );

        let outcome = service.resolve("a").await;
        assert_eq!(outcome, ResolutionOutcome::Success("https://a:8920".to_string()));
    }

    #[tokio::test]
    async fn test_first_good_in_encounter_order_without_great() {
        let service = service(
            expander_for(vec!["https://a", "http://a", "http://a:8096"]),
            prober_for(vec![
                reachable("https://a", ProbeScore::Ok),
                reachable("http://a", ProbeScore::Good),
                reachable("http://a:8096", ProbeScore::Good),
            ]),
            Arc::new(EventBus::new()),
        );

        let outcome = service.resolve("a").await;
        assert_eq!(outcome, ResolutionOutcome::Success("http://a".to_string()));
    }

    #[tokio::test]
    async fn test_ok_is_never_selected() {
        let service = service(
            expander_for(vec!["https://a"]),
            prober_for(vec![reachable("https://a", ProbeScore::Ok)]),
            Arc::new(EventBus::new()),
        );

        let outcome = service.resolve("a").await;
        assert!(outcome.is_error());
        assert!(outcome.error_message().is_some());
    }

    // ========================================================================
    // FAILURE REPORT
    // ========================================================================

    #[tokio::test]
    async fn test_unreachable_host_is_reported() {
        let service = service(
            expander_for(vec!["https://badhost"]),
            prober_for(vec![unreachable("https://badhost")]),
            Arc::new(EventBus::new()),
        );

        let outcome = service.resolve("badhost").await;
        let message = outcome.error_message().unwrap();

        let section = message
            .split("\n\n")
            .find(|section| section.starts_with("Unable to reach server"))
            .unwrap();
        assert!(section.contains("badhost"));
    }

    #[tokio::test]
    async fn test_every_rejected_candidate_listed_exactly_once() {
        let candidates = vec!["https://a", "http://a", "https://a:8920", "http://a:8096"];
        let service = service(
            expander_for(candidates.clone()),
            prober_for(vec![
                unreachable("https://a"),
                reachable("http://a", ProbeScore::Ok),
                ProbeResult::new("https://a:8920", ProbeScore::Bad, Some(info("10.5.0"))),
                unreachable("http://a:8096"),
            ]),
            Arc::new(EventBus::new()),
        );

        let outcome = service.resolve("a").await;
        let message = outcome.error_message().unwrap();

        for candidate in candidates {
            assert_eq!(count_occurrences(message, candidate), 1, "{}", candidate);
        }
        assert!(message.starts_with("Could not connect to any of the 4 server addresses."));
    }

    #[tokio::test]
    async fn test_custom_messages_are_used() {
        let messages = ConnectionMessages {
            prefix_one: "Keine Verbindung zur Serveradresse.".to_string(),
            unreachable_header: "Server nicht erreichbar".to_string(),
            ..ConnectionMessages::default()
        };
        let service = service(
            expander_for(vec!["https://badhost"]),
            prober_for(vec![unreachable("https://badhost")]),
            Arc::new(EventBus::new()),
        )
        .with_messages(messages);

        let outcome = service.resolve("badhost").await;
        let message = outcome.error_message().unwrap();

        assert!(message.starts_with("Keine Verbindung zur Serveradresse."));
        assert!(message.contains("Server nicht erreichbar:"));
        assert!(!message.contains("Unable to reach server"));
    }

    #[tokio::test]
    async fn test_no_candidates_is_error_without_message() {
        let service = service(
            expander_for(vec![]),
            prober_for(vec![]),
            Arc::new(EventBus::new()),
        );

        assert_eq!(service.resolve("").await, ResolutionOutcome::Error(None));
    }

    #[tokio::test]
    async fn test_empty_input_with_real_expander() {
        let mut prober = MockServerProber::new();
        prober.expect_probe().returning(|candidates| {
            assert!(candidates.is_empty());
            Vec::new()
        });

        let service = ConnectionService::new(
            Arc::new(AddressCandidateHelper::new()),
            Arc::new(prober),
            Arc::new(MockLocalServerDiscovery::new()),
            Arc::new(EventBus::new()),
        );

        assert_eq!(service.resolve("").await, ResolutionOutcome::Error(None));
    }

    // ========================================================================
    // DETERMINISM
    // ========================================================================

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let service = service(
            expander_for(vec!["https://a", "http://a"]),
            prober_for(vec![unreachable("https://a"), reachable("http://a", ProbeScore::Ok)]),
            Arc::new(EventBus::new()),
        );

        let first = service.resolve("a").await;
        let second = service.resolve("a").await;
        assert_eq!(first, second);
    }

    // ========================================================================
    // EVENTS
    // ========================================================================

    #[tokio::test]
    async fn test_success_emits_server_resolved() {
        let bus = Arc::new(EventBus::new());
        let resolved = Arc::new(AtomicUsize::new(0));
        let resolved_clone = Arc::clone(&resolved);
        bus.subscribe::<ServerResolved, _>(move |event| {
            assert_eq!(event.address, "https://myserver");
            assert_eq!(event.version.as_deref(), Some("10.8.13"));
            resolved_clone.fetch_add(1, Ordering::SeqCst);
        });

        let service = service(
            expander_for(vec!["https://myserver"]),
            prober_for(vec![reachable("https://myserver", ProbeScore::Great)]),
            Arc::clone(&bus),
        );
        service.resolve("myserver").await;

        assert_eq!(resolved.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_emits_partitioned_addresses() {
        let bus = Arc::new(EventBus::new());
        let failures = Arc::new(std::sync::Mutex::new(Vec::new()));
        let failures_clone = Arc::clone(&failures);
        bus.subscribe::<ServerResolutionFailed, _>(move |event| {
            failures_clone.lock().unwrap().push(event.clone());
        });

        let service = service(
            expander_for(vec!["https://a", "http://a"]),
            prober_for(vec![unreachable("https://a"), reachable("http://a", ProbeScore::Ok)]),
            Arc::clone(&bus),
        );
        service.resolve("a").await;

        let failures = failures.lock().unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].unreachable, vec!["https://a".to_string()]);
        assert_eq!(failures[0].incompatible, vec!["http://a".to_string()]);
        assert!(!failures[0].had_no_candidates());
    }
}

#[cfg(test)]
mod discovery_tests {
    use futures::StreamExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    use crate::domain::ServerDiscoveryInfo;
    use crate::events::{EventBus, LocalServerDiscovered};
    use crate::integrations::jellyfin::{
        DiscoveryStream, MockAddressCandidateExpander, MockLocalServerDiscovery,
    };
    use crate::services::connection_service::ConnectionService;
    use crate::services::recommended_server_service::MockServerProber;

    fn server(id: &str) -> ServerDiscoveryInfo {
        ServerDiscoveryInfo {
            id: id.to_string(),
            name: format!("server-{}", id),
            address: format!("http://10.0.0.{}:8096", id),
            endpoint_address: None,
        }
    }

    fn service(discovery: MockLocalServerDiscovery, bus: Arc<EventBus>) -> ConnectionService {
        ConnectionService::new(
            Arc::new(MockAddressCandidateExpander::new()),
            Arc::new(MockServerProber::new()),
            Arc::new(discovery),
            bus,
        )
        .with_max_servers(15)
    }

    #[tokio::test]
    async fn test_discovery_yields_and_reports_servers() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(server("1")).await.unwrap();
        tx.send(server("2")).await.unwrap();
        drop(tx);

        let mut discovery = MockLocalServerDiscovery::new();
        discovery
            .expect_discover()
            .withf(|max| *max == 15)
            .return_once(move |_| DiscoveryStream::from_receiver(rx));

        let bus = Arc::new(EventBus::new());
        let reported = Arc::new(AtomicUsize::new(0));
        let reported_clone = Arc::clone(&reported);
        bus.subscribe::<LocalServerDiscovered, _>(move |_| {
            reported_clone.fetch_add(1, Ordering::SeqCst);
        });

        let found: Vec<ServerDiscoveryInfo> =
            service(discovery, Arc::clone(&bus)).discover_local_servers().collect().await;

        assert_eq!(found, vec![server("1"), server("2")]);
        assert_eq!(reported.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_discovery_is_lazy() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(server("1")).await.unwrap();
        drop(tx);

        let mut discovery = MockLocalServerDiscovery::new();
        discovery
            .expect_discover()
            .return_once(move |_| DiscoveryStream::from_receiver(rx));

        let bus = Arc::new(EventBus::new());
        let reported = Arc::new(AtomicUsize::new(0));
        let reported_clone = Arc::clone(&reported);
        bus.subscribe::<LocalServerDiscovered, _>(move |_| {
            reported_clone.fetch_add(1, Ordering::SeqCst);
        });

        let service = service(discovery, bus);
        let mut stream = service.discover_local_servers();
        assert_eq!(reported.load(Ordering::SeqCst), 0);

        assert_eq!(stream.next().await, Some(server("1")));
        assert_eq!(reported.load(Ordering::SeqCst), 1);
        assert_eq!(stream.next().await, None);
    }

    #[tokio::test]
    async fn test_requested_limit_is_capped() {
        let mut discovery = MockLocalServerDiscovery::new();
        discovery
            .expect_discover()
            .withf(|max| *max == 15)
            .return_once(|_| DiscoveryStream::empty());

        let service = service(discovery, Arc::new(EventBus::new()));
        let found: Vec<ServerDiscoveryInfo> =
            service.discover_local_servers_up_to(100).collect().await;

        assert!(found.is_empty());
    }
}
