use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while building a [`JournalEntry`](super::JournalEntry).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error(
        "Invalid field name \"{name}\": journald requires a field name to match \"^[A-Z][A-Z0-9_]{{0,63}}$\""
    )]
    InvalidFieldName { name: String },

    #[error("Cannot overwrite already set field \"{name}\"")]
    DuplicateField { name: String },

    #[error("Failed to create uuid for MESSAGE_ID: {reason}")]
    IdGenerationFailed { reason: String },

    #[error("Failed to capture trace context with offset {offset} ({available} frames available)")]
    TraceCaptureFailed { offset: usize, available: usize },
}

/// Failures while resolving the journald socket path.
#[derive(Error, Debug)]
pub enum EndpointError {
    #[error("Invalid path \"{}\" - not found", .path.display())]
    NotFound { path: PathBuf },

    #[error("Invalid path \"{}\" - not a socket", .path.display())]
    NotASocket { path: PathBuf },

    #[error("Invalid path \"{}\" - {source}", .path.display())]
    Inaccessible {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures while delivering a payload to journald.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Failed to connect to journald at {path}: {source} ({})", describe_code(.code))]
    ConnectFailed {
        path: String,
        code: Option<i32>,
        #[source]
        source: io::Error,
    },

    #[error(
        "Failed to write log entry: {reason} ({} - wrote {written} of {expected} bytes)",
        describe_code(.code)
    )]
    SendFailed {
        written: usize,
        expected: usize,
        code: Option<i32>,
        reason: String,
    },
}

impl TransportError {
    /// OS error number behind the failure, if the kernel reported one.
    pub fn code(&self) -> Option<i32> {
        match self {
            TransportError::ConnectFailed { code, .. } | TransportError::SendFailed { code, .. } => {
                *code
            }
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("error {code}"),
        None => "no error code available".to_string(),
    }
}

/// Top-level error for callers that handle every failure family in one place.
#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Entry error: {0}")]
    Entry(#[from] EntryError),

    #[error("Endpoint error: {0}")]
    Endpoint(#[from] EndpointError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}
