//! Delivery side: wire encoding, socket path resolution and the datagram
//! writers.

pub mod async_writer;
pub mod encoding;
pub mod socket_path;
pub mod writer;

pub use async_writer::AsyncJournalWriter;
pub use socket_path::{DEFAULT_SOCKET_PATH, SocketPath};
pub use writer::{Delivery, JournalWriter};
