//! The `journald-send` command line front end.

pub mod config;
pub mod logging_system;

pub use config::{Config, ConfigError, LogLevel};
pub use logging_system::{LoggingSystem, setup_logging};

use crate::domain::field::SYSLOG_IDENTIFIER;
use crate::domain::{CallerLocation, JournalEntry, JournalError};
use crate::sender::{AsyncJournalWriter, Delivery, SocketPath};
use anyhow::Context;
use std::process;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, error, info};

pub struct App {
    config: Config,
    writer: AsyncJournalWriter,
}

impl App {
    pub fn from_args<I, T>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let config = Config::from_args_and_env(args)?;
        Self::from_config(config)
    }

    /// Resolves the socket path up front so a bad path fails before any
    /// entry is built.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let socket_path = SocketPath::custom(&config.socket).map_err(JournalError::from)?;
        let writer = AsyncJournalWriter::new(socket_path);
        Ok(Self { config, writer })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Seeds the entry from `message` and appends identifier, priority and
    /// extra fields in that order.
    ///
    /// The message comes from outside the process, so the `CODE_*` fields
    /// carry the unknown-location placeholders.
    pub fn build_entry(&self, message: &[u8]) -> Result<JournalEntry, JournalError> {
        let mut entry = JournalEntry::from_message(message, &CallerLocation::unknown())?;

        if let Some(identifier) = &self.config.identifier {
            entry.add_value(SYSLOG_IDENTIFIER, identifier)?;
        }
        if let Some(priority) = self.config.priority {
            entry.add_priority(priority)?;
        }
        for (name, value) in &self.config.extra_fields {
            entry.add_value(name, value)?;
        }

        Ok(entry)
    }

    /// Sends one entry built from the CLI message, or from `input` when no
    /// message was given.
    pub async fn run<R>(&self, input: R) -> anyhow::Result<Delivery>
    where
        R: AsyncRead + Unpin,
    {
        let message = match self.config.message_text() {
            Some(text) => text.into_bytes(),
            None => read_message(input).await?,
        };

        let entry = self.build_entry(&message)?;
        let delivery = self
            .writer
            .write(&entry)
            .await
            .with_context(|| format!("Failed to send entry to {}", self.writer.socket_path()))?;

        info!(
            "Sent entry {} ({} bytes) in {:?}",
            entry.message_id(),
            delivery.bytes_sent,
            delivery.latency
        );
        Ok(delivery)
    }
}

/// Reads the whole input; a single trailing newline is dropped so that
/// `echo msg | journald-send` sends `msg`, not a framed `msg\n`.
pub async fn read_message<R>(mut input: R) -> anyhow::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut message = Vec::new();
    input
        .read_to_end(&mut message)
        .await
        .context("Failed to read message from standard input")?;

    if message.last() == Some(&b'\n') {
        message.pop();
    }

    debug!("Read {} bytes of message from input", message.len());
    Ok(message)
}

pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Main entry point for the binary
pub async fn main() -> anyhow::Result<()> {
    let config = match Config::from_args_and_env(std::env::args_os()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("journald-send: configuration error: {e}");
            process::exit(2);
        }
    };

    if let Err(e) = setup_logging(config.log_level, &config.log_directives) {
        eprintln!("journald-send: {e}");
    }

    let result = match App::from_config(config) {
        Ok(app) => app.run(tokio::io::stdin()).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        eprintln!("journald-send: {e:#}");
        process::exit(1);
    }

    Ok(())
}
