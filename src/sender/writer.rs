use super::socket_path::SocketPath;
use crate::domain::{EndpointError, JournalEntry, TransportError};
use std::io;
use std::os::unix::net::UnixDatagram;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Outcome of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// `MESSAGE_ID` of the delivered entry; `None` for raw payloads.
    pub message_id: Option<String>,
    pub bytes_sent: usize,
    pub latency: Duration,
}

/// Sends journal entries to journald, one datagram per entry.
///
/// No socket is kept between writes: every call opens, connects, sends and
/// closes its own socket, so a writer can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct JournalWriter {
    socket_path: SocketPath,
}

impl JournalWriter {
    pub fn new(socket_path: SocketPath) -> Self {
        Self { socket_path }
    }

    pub fn system_default() -> Result<Self, EndpointError> {
        Ok(Self::new(SocketPath::system_default()?))
    }

    pub fn socket_path(&self) -> &SocketPath {
        &self.socket_path
    }

    /// Serializes `entry` and delivers it as a single datagram.
    ///
    /// Succeeds only if the kernel accepted the whole payload. Nothing is
    /// retried.
    pub fn write(&self, entry: &JournalEntry) -> Result<Delivery, TransportError> {
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

        let bytes_sent = verify_datagram(socket.send(&payload), payload.len())?;

        Ok(Delivery {
            message_id: Some(entry.message_id().to_string()),
            bytes_sent,
            latency: start.elapsed(),
        })
    }

    /// Delivers an already encoded payload as a single datagram.
    pub fn send_payload(&self, payload: &[u8]) -> Result<Delivery, TransportError> {
        let start = Instant::now();
        let socket = self.connect()?;
        let bytes_sent = verify_datagram(socket.send(payload), payload.len())?;

        Ok(Delivery {
            message_id: None,
            bytes_sent,
            latency: start.elapsed(),
        })
    }

    fn connect(&self) -> Result<UnixDatagram, TransportError> {
        let socket = UnixDatagram::unbound().map_err(|e| connect_failed(&self.socket_path, e))?;
        socket
            .connect(self.socket_path.as_path())
            .map_err(|e| connect_failed(&self.socket_path, e))?;

        trace!("Connected datagram socket to {}", self.socket_path);
        Ok(socket)
    }
}

pub(crate) fn connect_failed(socket_path: &SocketPath, source: io::Error) -> TransportError {
    debug!("Failed to connect to {}: {}", socket_path, source);
    TransportError::ConnectFailed {
        path: socket_path.as_str().into_owned(),
        code: source.raw_os_error(),
        source,
    }
}

/// Turns the result of a datagram send into the all-or-nothing contract.
///
/// A datagram is never resumed, so a short send is a failure just like an
/// error.
pub(crate) fn verify_datagram(
    result: io::Result<usize>,
    expected: usize,
) -> Result<usize, TransportError> {
    match result {
        Ok(written) if written == expected => Ok(written),
        Ok(written) => {
            debug!("Datagram truncated: {} of {} bytes accepted", written, expected);
            Err(TransportError::SendFailed {
                written,
                expected,
                code: None,
                reason: "datagram only partially accepted".to_string(),
            })
        }
        Err(e) => {
            debug!("Datagram send of {} bytes failed: {}", expected, e);
            Err(TransportError::SendFailed {
                written: 0,
                expected,
                code: e.raw_os_error(),
                reason: e.to_string(),
            })
        }
    }
}
