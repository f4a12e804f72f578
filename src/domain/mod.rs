//! Domain layer for journald-native.
//!
//! Contains the types shared across all modules:
//! - `JournalEntry`: one validated, ordered journal record
//! - `CallerLocation` / `ErrorContext`: what seeds the `CODE_*` and error fields
//! - `Priority`: syslog severity for the `PRIORITY` field
//! - `EntryError`, `EndpointError`, `TransportError`: the three failure families

pub mod entry;
pub mod error;
pub mod field;
pub mod location;
pub mod message_id;
pub mod priority;

pub use entry::{Fields, JournalEntry};
pub use error::{EndpointError, EntryError, JournalError, TransportError};
pub use field::FieldName;
pub use location::{CallerLocation, ErrorContext, StackFrame};
pub use priority::Priority;
