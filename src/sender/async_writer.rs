use super::socket_path::SocketPath;
use super::writer::{Delivery, connect_failed, verify_datagram};
use crate::domain::{EndpointError, JournalEntry, TransportError};
use std::time::Instant;
use tokio::net::UnixDatagram;
use tracing::{debug, trace};

/// [`JournalWriter`](super::JournalWriter) for tokio runtimes.
///
/// Same contract: one socket per write, one datagram per entry, success only
/// when the whole payload was accepted.
#[derive(Debug, Clone)]
pub struct AsyncJournalWriter {
    socket_path: SocketPath,
}

impl AsyncJournalWriter {
    pub fn new(socket_path: SocketPath) -> Self {
        Self { socket_path }
    }

    pub fn system_default() -> Result<Self, EndpointError> {
        Ok(Self::new(SocketPath::system_default()?))
    }

    pub fn socket_path(&self) -> &SocketPath {
        &self.socket_path
    }

    pub async fn write(&self, entry: &JournalEntry) -> Result<Delivery, TransportError> {
        let start = Instant::now();
        let socket = self.connect()?;
        let payload = entry.serialize();

        debug!(
            "Writing entry {} ({} fields, {} bytes) to {}",
            entry.message_id(),
            entry.field_count(),
            payload.len(),
            self.socket_path
        );

        let bytes_sent = verify_datagram(socket.send(&payload).await, payload.len())?;

        Ok(Delivery {
            message_id: Some(entry.message_id().to_string()),
            bytes_sent,
            latency: start.elapsed(),
        })
    }

    pub async fn send_payload(&self, payload: &[u8]) -> Result<Delivery, TransportError> {
        let start = Instant::now();
        let socket = self.connect()?;
        let bytes_sent = verify_datagram(socket.send(payload).await, payload.len())?;

        Ok(Delivery {
            message_id: None,
            bytes_sent,
            latency: start.elapsed(),
        })
    }

    // Connecting a Unix datagram socket never blocks, so this stays sync.
    fn connect(&self) -> Result<UnixDatagram, TransportError> {
        let socket = UnixDatagram::unbound().map_err(|e| connect_failed(&self.socket_path, e))?;
        socket
            .connect(self.socket_path.as_path())
            .map_err(|e| connect_failed(&self.socket_path, e))?;

        trace!("Connected async datagram socket to {}", self.socket_path);
        Ok(socket)
    }
}
