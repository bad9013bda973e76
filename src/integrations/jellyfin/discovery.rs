// src/integrations/jellyfin/discovery.rs
//
// Local network server discovery over UDP broadcast
//
// PROTOCOL:
// - Client sends DISCOVERY_MESSAGE to the broadcast address on port 7359
// - Every server replies with a small JSON document (Address, Id, Name,
//   EndpointAddress) to the sender
//
// RULES:
// - Runs in a background task, results are pushed through a channel
// - Ends when a receive window elapses or max_servers datagrams arrived
// - Dropping the stream aborts the task and closes the socket

use futures::Stream;
use std::collections::HashSet;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::DiscoveryConfig;
use crate::domain::ServerDiscoveryInfo;
use crate::error::{AppError, AppResult};

pub const DISCOVERY_MESSAGE: &str = "who is JellyfinServer?";

const RECEIVE_BUFFER_SIZE: usize = 2048;

// ============================================================================
// DISCOVERY STREAM
// ============================================================================

/// Lazy, finite, non-restartable sequence of discovered servers
pub struct DiscoveryStream {
    receiver: mpsc::Receiver<ServerDiscoveryInfo>,
    task: Option<JoinHandle<()>>,
}

impl DiscoveryStream {
    /// Stream fed by a background task that is aborted on drop
    pub fn new(receiver: mpsc::Receiver<ServerDiscoveryInfo>, task: JoinHandle<()>) -> Self {
        Self {
            receiver,
            task: Some(task),
        }
    }

    /// Stream fed by whoever owns the sender
    pub fn from_receiver(receiver: mpsc::Receiver<ServerDiscoveryInfo>) -> Self {
        Self {
            receiver,
            task: None,
        }
    }

    /// Stream that ends immediately
    pub fn empty() -> Self {
        let (_, receiver) = mpsc::channel(1);
        Self::from_receiver(receiver)
    }
}

impl Stream for DiscoveryStream {
    type Item = ServerDiscoveryInfo;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

impl Drop for DiscoveryStream {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

// ============================================================================
// DISCOVERY SOURCE
// ============================================================================

/// Source of locally discovered servers.
///
/// `discover` spawns onto the current tokio runtime and must be called from
/// within one.
#[cfg_attr(test, mockall::automock)]
pub trait LocalServerDiscovery: Send + Sync {
    fn discover(&self, max_servers: usize) -> DiscoveryStream;
}

pub struct UdpServerDiscovery {
    config: DiscoveryConfig,
}

impl UdpServerDiscovery {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self { config }
    }
}

impl LocalServerDiscovery for UdpServerDiscovery {
    fn discover(&self, max_servers: usize) -> DiscoveryStream {
        let max_servers = max_servers.min(self.config.max_servers);
        if max_servers == 0 {
            return DiscoveryStream::empty();
        }

        let (tx, rx) = mpsc::channel(max_servers);
        let config = self.config.clone();

        let task = tokio::spawn(async move {
            match run_discovery(&config, max_servers, &tx).await {
                Ok(found) => log::info!("Local discovery finished, {} servers found", found),
                Err(e) => log::warn!("Local discovery stopped: {}", e),
            }
        });

        DiscoveryStream::new(rx, task)
    }
}

/// Broadcast once, then read at most `max_servers` datagrams.
/// Returns the number of servers yielded.
async fn run_discovery(
    config: &DiscoveryConfig,
    max_servers: usize,
    tx: &mpsc::Sender<ServerDiscoveryInfo>,
) -> AppResult<usize> {
    let socket = UdpSocket::bind(("0.0.0.0", 0)).await?;
    socket.set_broadcast(true)?;

    let mut sent = 0;
    for address in &config.broadcast_addresses {
        let target = format!("{}:{}", address, config.port);
        match socket.send_to(DISCOVERY_MESSAGE.as_bytes(), target.as_str()).await {
            Ok(_) => sent += 1,
            Err(e) => log::warn!("Cannot send discovery request to {}: {}", target, e),
        }
    }
    if sent == 0 {
        return Err(AppError::Discovery(
            "discovery request could not be sent to any address".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    let mut buf = vec![0u8; RECEIVE_BUFFER_SIZE];

    // Every datagram takes a slot, duplicates and garbage included
    for _ in 0..max_servers {
        let received = tokio::select! {
            _ = tx.closed() => {
                log::debug!("Discovery consumer went away");
                break;
            }
            received = tokio::time::timeout(config.receive_timeout(), socket.recv_from(&mut buf)) => received,
        };

        let (len, from) = match received {
            Ok(result) => result?,
            // Receive window elapsed without a reply
            Err(_) => break,
        };

        let Some(info) = parse_discovery_reply(&buf[..len]) else {
            log::debug!("Ignoring malformed discovery reply from {}", from);
            continue;
        };

        if !seen.insert(info.id.clone()) {
            continue;
        }

        log::debug!("Discovered {} ({}) at {}", info.name, info.id, info.address);
        if tx.send(info).await.is_err() {
            break;
        }
    }

    Ok(seen.len())
}

/// Decode a discovery reply; replies without id or address are unusable
pub fn parse_discovery_reply(bytes: &[u8]) -> Option<ServerDiscoveryInfo> {
    let info: ServerDiscoveryInfo = serde_json::from_slice(bytes).ok()?;
    if info.id.trim().is_empty() || info.address.trim().is_empty() {
        return None;
    }
    Some(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::sync::Arc;
    use std::time::Duration;

    fn reply(id: &str) -> String {
        format!(
            r#"{{"Address":"http://10.0.0.{0}:8096","Id":"{0}","Name":"server-{0}","EndpointAddress":null}}"#,
            id
        )
    }

    /// Fake server answering one discovery request with the given datagrams
    async fn fake_server(replies: Vec<String>) -> (u16, JoinHandle<String>) {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = socket.local_addr().unwrap().port();

        let handle = tokio::spawn(async move {
            let mut buf = [0u8; 256];
            let (len, from) = socket.recv_from(&mut buf).await.unwrap();
            for reply in replies {
                socket.send_to(reply.as_bytes(), from).await.unwrap();
            }
            String::from_utf8_lossy(&buf[..len]).to_string()
        });

        (port, handle)
    }

    fn local_config(port: u16) -> DiscoveryConfig {
        DiscoveryConfig {
            port,
            broadcast_addresses: vec!["127.0.0.1".to_string()],
            receive_timeout_ms: 300,
            ..DiscoveryConfig::default()
        }
    }

    #[test]
    fn test_parse_reply() {
        let info = parse_discovery_reply(reply("7").as_bytes()).unwrap();
        assert_eq!(info.id, "7");
        assert_eq!(info.name, "server-7");
        assert_eq!(info.address, "http://10.0.0.7:8096");
    }

    #[test]
    fn test_parse_rejects_unusable_replies() {
        assert!(parse_discovery_reply(b"garbage").is_none());
        assert!(parse_discovery_reply(br#"{"Address":"","Id":"1","Name":"x"}"#).is_none());
        assert!(parse_discovery_reply(br#"{"Address":"http://a","Id":" ","Name":"x"}"#).is_none());
    }

    #[tokio::test]
    async fn test_stream_from_receiver_yields_in_arrival_order() {
        let (tx, rx) = mpsc::channel(4);
        for id in ["1", "2"] {
            tx.send(parse_discovery_reply(reply(id).as_bytes()).unwrap()).await.unwrap();
        }
        drop(tx);

        let ids: Vec<String> = DiscoveryStream::from_receiver(rx).map(|info| info.id).collect().await;
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_empty_stream_ends() {
        assert!(DiscoveryStream::empty().next().await.is_none());
    }

    #[tokio::test]
    async fn test_drop_aborts_background_task() {
        let sentinel = Arc::new(());
        let held = Arc::clone(&sentinel);
        let (_tx, rx) = mpsc::channel(1);

        let task = tokio::spawn(async move {
            let _held = held;
            std::future::pending::<()>().await;
        });

        let stream = DiscoveryStream::new(rx, task);
        assert_eq!(Arc::strong_count(&sentinel), 2);

        drop(stream);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(Arc::strong_count(&sentinel), 1);
    }

    #[tokio::test]
    async fn test_udp_discovery_skips_duplicates_and_garbage() {
        let (port, server) =
            fake_server(vec![reply("1"), "not json".to_string(), reply("1"), reply("2")]).await;

        let discovery = UdpServerDiscovery::new(local_config(port));
        let found: Vec<ServerDiscoveryInfo> = discovery.discover(15).collect().await;

        assert_eq!(server.await.unwrap(), DISCOVERY_MESSAGE);
        let ids: Vec<&str> = found.iter().map(|info| info.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_repeating_server_cannot_keep_discovery_open() {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = socket.local_addr().unwrap().port();

        let chatty = tokio::spawn(async move {
            let mut buf = [0u8; 256];
            let (_, from) = socket.recv_from(&mut buf).await.unwrap();
            loop {
                if socket.send_to(reply("1").as_bytes(), from).await.is_err() {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        });

        let discovery = UdpServerDiscovery::new(local_config(port));
        let found = tokio::time::timeout(
            Duration::from_secs(3),
            discovery.discover(15).collect::<Vec<ServerDiscoveryInfo>>(),
        )
        .await
        .expect("discovery must end after max_servers datagrams");
        chatty.abort();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "1");
    }

    #[tokio::test]
    async fn test_garbage_counts_toward_the_limit() {
        let (port, _server) = fake_server(vec![
            "noise".to_string(),
            "noise".to_string(),
            reply("1"),
        ])
        .await;

        let discovery = UdpServerDiscovery::new(local_config(port));
        let found: Vec<ServerDiscoveryInfo> = discovery.discover(2).collect().await;

        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_udp_discovery_respects_max_servers() {
        let (port, _server) = fake_server(vec![reply("1"), reply("2"), reply("3")]).await;

        let discovery = UdpServerDiscovery::new(local_config(port));
        let found: Vec<ServerDiscoveryInfo> = discovery.discover(2).collect().await;

        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_zero_max_servers_yields_nothing() {
        let discovery = UdpServerDiscovery::new(DiscoveryConfig::default());
        assert!(discovery.discover(0).next().await.is_none());
    }
}
