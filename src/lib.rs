#![deny(warnings, rust_2024_compatibility)]
// Specific pedantic lints enforced (not blanket allow):
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
#![allow(
    clippy::cast_possible_truncation, // Datagram sizes fit in u64/usize
    clippy::missing_errors_doc,       // Error enums document themselves
    clippy::module_name_repetitions,  // e.g. EntryError in entry module
    clippy::must_use_candidate,       // Annotated selectively on critical APIs
    clippy::doc_markdown
)]

//! Client for the systemd-journald native protocol.
//!
//! A [`JournalEntry`] collects validated fields and serializes them into the
//! native wire format; a [`JournalWriter`] delivers that payload as one
//! datagram to the journald socket.

#[macro_use]
mod macros;

pub mod app;
pub mod domain;
pub mod sender;

// Re-export main types for easy access
pub use domain::{
    CallerLocation, EndpointError, EntryError, ErrorContext, JournalEntry, JournalError,
    Priority, StackFrame, TransportError,
};
pub use sender::{AsyncJournalWriter, Delivery, JournalWriter, SocketPath};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
