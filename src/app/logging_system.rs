use super::config::LogLevel;
use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    #[error("Invalid directive format '{input}'. Expected: 'target=level'")]
    InvalidDirective { input: String },

    #[error("Invalid log level '{input}'")]
    InvalidLevel { input: String },

    #[error("Logging system initialization failed: {details}")]
    InitFailed { details: String },
}

/// One `target=level` entry of the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDirective {
    target: String,
    level: LogLevel,
}

impl LogDirective {
    pub fn new(target: impl Into<String>, level: LogLevel) -> Self {
        Self {
            target: target.into(),
            level,
        }
    }

    pub fn parse(input: &str) -> Result<Self, LoggingError> {
        let Some((target, level)) = input.split_once('=') else {
            return Err(LoggingError::InvalidDirective {
                input: input.to_string(),
            });
        };

        let target = target.trim();
        if target.is_empty() {
            return Err(LoggingError::InvalidDirective {
                input: input.to_string(),
            });
        }

        let level = <LogLevel as clap::ValueEnum>::from_str(level.trim(), true).map_err(|_| {
            LoggingError::InvalidLevel {
                input: level.to_string(),
            }
        })?;

        Ok(Self::new(target, level))
    }

    pub fn to_filter_string(&self) -> String {
        format!("{}={}", self.target, self.level.as_str())
    }
}

/// Builds the `tracing` filter for the binary and installs the subscriber.
///
/// Diagnostics go to stderr; stdout stays free for the tool's output.
pub struct LoggingSystem {
    directives: Arc<RwLock<Vec<LogDirective>>>,
}

impl LoggingSystem {
    pub fn new() -> Self {
        Self {
            directives: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn add_directive(&self, directive: &str) -> Result<(), LoggingError> {
        let directive = LogDirective::parse(directive)?;
        self.directives.write().push(directive);
        Ok(())
    }

    pub fn add_default_directives(&self) {
        let mut directives = self.directives.write();
        for target in ["tokio", "mio"] {
            directives.push(LogDirective::new(target, LogLevel::Warn));
        }
    }

    pub fn build_filter_string(&self, default_level: LogLevel) -> String {
        let directives = self.directives.read();

        std::iter::once(default_level.as_str().to_string())
            .chain(directives.iter().map(LogDirective::to_filter_string))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// `RUST_LOG`, when set, replaces the built filter.
    pub fn initialize_tracing(&self, default_level: LogLevel) -> Result<(), LoggingError> {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => {
                let filter_string = self.build_filter_string(default_level);
                EnvFilter::try_new(&filter_string).map_err(|e| LoggingError::InitFailed {
                    details: format!("Failed to create EnvFilter with '{filter_string}': {e}"),
                })?
            }
        };

        let subscriber = tracing_subscriber::registry().with(env_filter).with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .compact(),
        );

        tracing::subscriber::set_global_default(subscriber).map_err(|e| {
            LoggingError::InitFailed {
                details: format!("Failed to set global tracing subscriber: {e}"),
            }
        })
    }

    pub fn directive_count(&self) -> usize {
        self.directives.read().len()
    }
}

impl Default for LoggingSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Installs the global subscriber once per process. Later calls return the
/// outcome of the first one.
pub fn setup_logging(level: LogLevel, directives: &[String]) -> Result<(), LoggingError> {
    static INIT: OnceLock<Result<(), LoggingError>> = OnceLock::new();

    INIT.get_or_init(|| {
        let logging_system = LoggingSystem::new();
        logging_system.add_default_directives();
        for directive in directives {
            logging_system.add_directive(directive)?;
        }
        logging_system.initialize_tracing(level)
    })
    .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_parse() {
        let directive = LogDirective::parse("journald_native=debug").unwrap();
        assert_eq!(directive.to_filter_string(), "journald_native=debug");

        let directive = LogDirective::parse(" tokio = WARN ").unwrap();
        assert_eq!(directive.to_filter_string(), "tokio=warn");
    }

    #[test]
    fn test_directive_errors() {
        assert!(matches!(
            LogDirective::parse("invalid"),
            Err(LoggingError::InvalidDirective { .. })
        ));
        assert!(matches!(
            LogDirective::parse("=info"),
            Err(LoggingError::InvalidDirective { .. })
        ));
        assert!(matches!(
            LogDirective::parse("tokio=loud"),
            Err(LoggingError::InvalidLevel { .. })
        ));
    }

    #[test]
    fn test_build_filter_string() {
        let logging_system = LoggingSystem::new();
        assert_eq!(logging_system.build_filter_string(LogLevel::Info), "info");

        logging_system.add_default_directives();
        logging_system.add_directive("journald_native=trace").unwrap();
        assert_eq!(logging_system.directive_count(), 3);
        assert_eq!(
            logging_system.build_filter_string(LogLevel::Error),
            "error,tokio=warn,mio=warn,journald_native=trace"
        );
    }

    #[test]
    fn test_setup_logging_is_idempotent() {
        let first = setup_logging(LogLevel::Warn, &["journald_native=debug".to_string()]);
        let second = setup_logging(LogLevel::Debug, &[]);
        assert_eq!(first, second);
    }
}
