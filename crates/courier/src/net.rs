//! UDP transport to the file server.
//!
//! One socket, one peer, strictly sequential: the client never has more
//! than one receive outstanding. Transport failures are fatal to the
//! attempt — the protocol's only recovery path is the interactive
//! full-exchange retry, and that is reserved for checksum mismatches.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::{lookup_host, UdpSocket};

use courier_core::config::TransportConfig;

/// Errors on the UDP path. All of them abort the attempt.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to resolve {0}: {1}")]
    Resolve(String, std::io::Error),

    #[error("no usable address for {0}")]
    NoAddress(String),

    #[error("failed to bind local socket: {0}")]
    Bind(std::io::Error),

    #[error("failed to connect socket to {0}: {1}")]
    Connect(SocketAddr, std::io::Error),

    #[error("send failed: {0}")]
    Send(std::io::Error),

    #[error("receive failed: {0}")]
    Recv(std::io::Error),

    #[error("receive timed out after {0}s")]
    Timeout(u64),
}

/// A connected datagram socket pointed at the server.
pub struct ServerLink {
    socket: UdpSocket,
    server: SocketAddr,
    max_datagram: usize,
    recv_timeout: Option<Duration>,
}

impl ServerLink {
    /// Resolve the server and open a connected socket to it.
    /// Like getaddrinfo, resolution may yield several addresses; the
    /// first usable one wins.
    pub async fn connect(
        host: &str,
        port: u16,
        transport: &TransportConfig,
    ) -> Result<Self, TransportError> {
        let target = format!("{host}:{port}");
        let server = lookup_host(&target)
            .await
            .map_err(|e| TransportError::Resolve(target.clone(), e))?
            .next()
            .ok_or_else(|| TransportError::NoAddress(target.clone()))?;

        let bind_addr: SocketAddr = match server {
            SocketAddr::V4(_) => ([0, 0, 0, 0], 0).into(),
            SocketAddr::V6(_) => ([0u16, 0, 0, 0, 0, 0, 0, 0], 0).into(),
        };
        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(TransportError::Bind)?;
        socket
            .connect(server)
            .await
            .map_err(|e| TransportError::Connect(server, e))?;

        tracing::debug!(server = %server, "server link established");

        Ok(Self {
            socket,
            server,
            max_datagram: transport.max_datagram_bytes,
            recv_timeout: match transport.recv_timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
        })
    }

    pub fn server(&self) -> SocketAddr {
        self.server
    }

    /// Send the identifier datagram that opens an exchange.
    pub async fn send_identifier(&self, identifier: &str) -> Result<usize, TransportError> {
        let sent = self
            .socket
            .send(identifier.as_bytes())
            .await
            .map_err(TransportError::Send)?;
        tracing::info!(identifier, bytes = sent, server = %self.server, "identifier sent");
        Ok(sent)
    }

    /// Receive one datagram, honoring the configured deadline.
    pub async fn recv_datagram(&self) -> Result<Vec<u8>, TransportError> {
        let mut buf = vec![0u8; self.max_datagram];
        let len = match self.recv_timeout {
            Some(limit) => {
                match tokio::time::timeout(limit, self.socket.recv(&mut buf)).await {
                    Ok(received) => received.map_err(TransportError::Recv)?,
                    Err(_) => return Err(TransportError::Timeout(limit.as_secs())),
                }
            }
            None => self.socket.recv(&mut buf).await.map_err(TransportError::Recv)?,
        };
        buf.truncate(len);
        Ok(buf)
    }
}
