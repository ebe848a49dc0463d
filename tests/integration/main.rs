//! courier integration test harness.
//!
//! Each test spawns a mock file server on a loopback UDP socket and
//! drives the client's transfer logic in-process against it. The mock
//! speaks the real wire format: one handshake datagram followed by
//! fixed-capacity segments, all triggered by the client's identifier.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use tokio::net::UdpSocket;

use courier_core::config::TransportConfig;

mod fetch;

// ── Wire builders ─────────────────────────────────────────────────────────────

/// Build a handshake datagram: 4-byte decimal size, 4-byte hex
/// checksum, filename, trailing NUL.
pub fn handshake_datagram(size: usize, checksum: u16, filename: &str) -> Vec<u8> {
    let mut d = format!("{size:04}{checksum:04x}").into_bytes();
    d.extend_from_slice(filename.as_bytes());
    d.push(0);
    d
}

/// Build a segment datagram: 2-digit index, 4 reserved bytes, payload.
pub fn segment_datagram(index: usize, payload: &[u8]) -> Vec<u8> {
    let mut d = format!("{index:02}").into_bytes();
    d.extend_from_slice(&[0u8; 4]);
    d.extend_from_slice(payload);
    d
}

/// The checksum a server would declare for `content`: fold over the
/// payload, padded to a word boundary.
pub fn wire_checksum(content: &[u8]) -> u16 {
    let mut padded = content.to_vec();
    if padded.len() % 2 != 0 {
        padded.push(0);
    }
    courier_core::checksum::fold(&padded)
}

// ── Mock server ───────────────────────────────────────────────────────────────

/// Spawn a mock server. Each inner Vec is one exchange: the server
/// waits for an identifier datagram, then sends that exchange's
/// datagrams back to the client. Returns the server's address.
pub async fn spawn_mock_server(exchanges: Vec<Vec<Vec<u8>>>) -> Result<SocketAddr> {
    let socket = UdpSocket::bind("127.0.0.1:0").await?;
    let addr = socket.local_addr()?;
    tokio::spawn(async move {
        let mut buf = vec![0u8; 2048];
        for datagrams in exchanges {
            let Ok((_, peer)) = socket.recv_from(&mut buf).await else {
                return;
            };
            for datagram in &datagrams {
                if socket.send_to(datagram, peer).await.is_err() {
                    return;
                }
            }
        }
    });
    Ok(addr)
}

// ── Client-side helpers ───────────────────────────────────────────────────────

pub fn test_transport() -> TransportConfig {
    TransportConfig {
        max_datagram_bytes: 2048,
        recv_timeout_secs: 5,
    }
}

/// A per-test storage directory under the system temp dir, wiped first.
pub fn test_storage(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("courier-it-{tag}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

/// Open a link to the mock and run one exchange: send the identifier,
/// then run a full attempt.
pub async fn run_exchange(
    server: SocketAddr,
    identifier: &str,
    storage: &std::path::Path,
) -> Result<courier::transfer::Outcome> {
    let link =
        courier::net::ServerLink::connect("127.0.0.1", server.port(), &test_transport()).await?;
    link.send_identifier(identifier).await?;
    courier::transfer::run_attempt(&link, storage).await
}
