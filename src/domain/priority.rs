use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Syslog severity carried in the `PRIORITY` field.
///
/// Parses from the syslog names (`err`, `crit`, `warning`, ...) or the
/// digits `0`-`7`, both on the command line and in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Priority {
    Emergency = 0,
    Alert = 1,
    Critical = 2,
    Error = 3,
    Warning = 4,
    Notice = 5,
    Info = 6,
    Debug = 7,
}

impl Priority {
    /// The numeric value as it appears on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Emergency => "0",
            Priority::Alert => "1",
            Priority::Critical => "2",
            Priority::Error => "3",
            Priority::Warning => "4",
            Priority::Notice => "5",
            Priority::Info => "6",
            Priority::Debug => "7",
        }
    }

    /// Syslog keyword, as used by `logger -p` and `systemd-cat -p`.
    pub fn name(self) -> &'static str {
        match self {
            Priority::Emergency => "emerg",
            Priority::Alert => "alert",
            Priority::Critical => "crit",
            Priority::Error => "err",
            Priority::Warning => "warning",
            Priority::Notice => "notice",
            Priority::Info => "info",
            Priority::Debug => "debug",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "0" | "emerg" | "emergency" => Ok(Priority::Emergency),
            "1" | "alert" => Ok(Priority::Alert),
            "2" | "crit" | "critical" => Ok(Priority::Critical),
            "3" | "err" | "error" => Ok(Priority::Error),
            "4" | "warn" | "warning" => Ok(Priority::Warning),
            "5" | "notice" => Ok(Priority::Notice),
            "6" | "info" => Ok(Priority::Info),
            "7" | "debug" => Ok(Priority::Debug),
            _ => Err(format!("Invalid priority: {s}")),
        }
    }
}

impl TryFrom<String> for Priority {
    type Error = String;

    fn try_from(value: String) -> Result<Self, <Priority as TryFrom<String>>::Error> {
        value.parse()
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        priority.name().to_string()
    }
}

impl From<tracing::Level> for Priority {
    fn from(level: tracing::Level) -> Self {
        if level == tracing::Level::ERROR {
            Priority::Error
        } else if level == tracing::Level::WARN {
            Priority::Warning
        } else if level == tracing::Level::INFO {
            Priority::Info
        } else {
            Priority::Debug
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_digits() {
        assert_eq!("warning".parse::<Priority>(), Ok(Priority::Warning));
        assert_eq!("ERR".parse::<Priority>(), Ok(Priority::Error));
        assert_eq!("0".parse::<Priority>(), Ok(Priority::Emergency));
        assert!("8".parse::<Priority>().is_err());
    }

    #[test]
    fn test_wire_value_matches_discriminant() {
        for priority in [Priority::Emergency, Priority::Notice, Priority::Debug] {
            assert_eq!(priority.as_str(), (priority as u8).to_string());
        }
    }

    #[test]
    fn test_serde_accepts_names_and_digits() {
        #[derive(Deserialize, Serialize)]
        struct Wrapper {
            priority: Priority,
        }

        for (input, expected) in [
            ("err", Priority::Error),
            ("crit", Priority::Critical),
            ("emerg", Priority::Emergency),
            ("warn", Priority::Warning),
            ("3", Priority::Error),
            ("Notice", Priority::Notice),
        ] {
            let wrapper: Wrapper = toml::from_str(&format!("priority = \"{input}\"")).unwrap();
            assert_eq!(wrapper.priority, expected, "input {input}");
        }

        assert!(toml::from_str::<Wrapper>("priority = \"loud\"").is_err());

        let rendered = toml::to_string(&Wrapper {
            priority: Priority::Critical,
        })
        .unwrap();
        assert_eq!(rendered.trim(), "priority = \"crit\"");
    }

    #[test]
    fn test_name_parses_back() {
        for value in 0..=7u8 {
            let priority: Priority = value.to_string().parse().unwrap();
            assert_eq!(priority.name().parse::<Priority>(), Ok(priority));
        }
    }

    #[test]
    fn test_from_tracing_level() {
        assert_eq!(Priority::from(tracing::Level::WARN), Priority::Warning);
        assert_eq!(Priority::from(tracing::Level::TRACE), Priority::Debug);
    }
}
