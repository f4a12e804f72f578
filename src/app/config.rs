use super::logging_system::LogDirective;
use crate::domain::{FieldName, Priority};
use crate::sender::DEFAULT_SOCKET_PATH;
use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid field '{input}': {reason}")]
    InvalidField { input: String, reason: String },
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Verbosity of the tool's own diagnostics (not the journal priority).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(
    name = "journald-send",
    author,
    version,
    about = "Send a structured entry to systemd-journald over the native protocol",
    long_about = None
)]
#[serde(default)]
pub struct Config {
    /// Path of the journald native protocol socket
    #[arg(long, env = "JOURNALD_SOCKET", default_value = DEFAULT_SOCKET_PATH)]
    pub socket: PathBuf,

    /// Entry priority (0-7 or emerg, alert, crit, err, warning, notice, info, debug)
    #[arg(short, long, env = "JOURNALD_PRIORITY")]
    pub priority: Option<Priority>,

    /// SYSLOG_IDENTIFIER of the entry
    #[arg(short = 't', long, env = "JOURNALD_IDENTIFIER")]
    pub identifier: Option<String>,

    /// Additional field, may be repeated
    #[arg(short = 'f', long = "field", value_name = "KEY=VALUE")]
    pub fields: Vec<String>,

    /// Log level of the tool's own diagnostics
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    pub log_level: LogLevel,

    /// Per-target diagnostics level, may be repeated
    #[arg(long = "log-directive", value_name = "TARGET=LEVEL")]
    pub log_directives: Vec<String>,

    /// Configuration file path (optional)
    #[serde(skip)]
    #[arg(long, env = "CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Message to send; standard input is read when omitted
    #[serde(skip)]
    #[arg(value_name = "MESSAGE")]
    pub message: Vec<String>,

    /// Parsed `fields` (not a CLI argument)
    #[serde(skip)]
    #[arg(skip)]
    pub extra_fields: Vec<(String, String)>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            socket: PathBuf::from(DEFAULT_SOCKET_PATH),
            priority: None,
            identifier: None,
            fields: Vec::new(),
            log_level: LogLevel::Warn,
            log_directives: Vec::new(),
            config_file: None,
            message: Vec::new(),
            extra_fields: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut config = Config::parse_from(args);
        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    /// CLI arguments (and their env fallbacks) layered over the optional
    /// configuration file. Values given on the command line or through the
    /// environment win, even when they equal the built-in default.
    pub fn from_args_and_env<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = Config::command().get_matches_from(args);
        let mut config = Config::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

        if let Some(config_file) = config.config_file.clone() {
            let base = Self::load_file(&config_file)?;
            config.merge_from(base, &matches);
        }

        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::load_file(path.as_ref())?;
        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    fn merge_from(&mut self, base: Config, matches: &ArgMatches) {
        if !is_given(matches, "socket") {
            self.socket = base.socket;
        }
        if !is_given(matches, "priority") {
            self.priority = base.priority;
        }
        if !is_given(matches, "identifier") {
            self.identifier = base.identifier;
        }
        if !is_given(matches, "log_level") {
            self.log_level = base.log_level;
        }

        // File entries go first so CLI entries keep their given order after them.
        let mut fields = base.fields;
        fields.append(&mut self.fields);
        self.fields = fields;

        let mut log_directives = base.log_directives;
        log_directives.append(&mut self.log_directives);
        self.log_directives = log_directives;
    }

    pub fn post_process(&mut self) -> Result<(), ConfigError> {
        self.extra_fields = self
            .fields
            .iter()
            .map(|field| parse_field(field))
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.socket.as_os_str().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "Socket path must not be empty".to_string(),
            ));
        }

        if let Some(identifier) = &self.identifier
            && identifier.is_empty()
        {
            return Err(ConfigError::InvalidConfig(
                "Identifier must not be empty".to_string(),
            ));
        }

        for directive in &self.log_directives {
            LogDirective::parse(directive)
                .map_err(|e| ConfigError::InvalidConfig(e.to_string()))?;
        }

        for (key, _) in &self.extra_fields {
            FieldName::parse(key).map_err(|e| ConfigError::InvalidField {
                input: key.clone(),
                reason: e.to_string(),
            })?;
        }

        Ok(())
    }

    /// The message given on the command line, if any.
    pub fn message_text(&self) -> Option<String> {
        (!self.message.is_empty()).then(|| self.message.join(" "))
    }
}

/// True when the argument came from the command line or the environment
/// rather than from its default.
fn is_given(matches: &ArgMatches, id: &str) -> bool {
    matches!(
        matches.value_source(id),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

fn parse_field(input: &str) -> Result<(String, String), ConfigError> {
    match input.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(ConfigError::InvalidField {
            input: input.to_string(),
            reason: "expected KEY=VALUE".to_string(),
        }),
    }
}
