use super::error::EntryError;
use regex::Regex;
use std::borrow::Borrow;
use std::fmt;
use std::sync::OnceLock;

pub const MESSAGE_ID: &str = "MESSAGE_ID";
pub const MESSAGE: &str = "MESSAGE";
pub const CODE_FILE: &str = "CODE_FILE";
pub const CODE_LINE: &str = "CODE_LINE";
pub const CODE_FUNC: &str = "CODE_FUNC";
pub const ERRNO: &str = "ERRNO";
pub const CLASS: &str = "CLASS";
pub const TRACE: &str = "TRACE";
pub const PRIORITY: &str = "PRIORITY";
pub const SYSLOG_IDENTIFIER: &str = "SYSLOG_IDENTIFIER";

const FIELD_NAME_PATTERN: &str = r"^[A-Z][A-Z0-9_]{0,63}$";

static FIELD_NAME_REGEX: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

/// A journald field name: one uppercase ASCII letter followed by up to 63
/// uppercase letters, digits or underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldName(String);

impl FieldName {
    /// Uppercases `raw` (ASCII only) and validates the result.
    pub fn parse(raw: &str) -> Result<Self, EntryError> {
        let name = raw.to_ascii_uppercase();

        let valid = match FIELD_NAME_REGEX.get_or_init(|| Regex::new(FIELD_NAME_PATTERN)) {
            Ok(regex) => regex.is_match(&name),
            Err(_) => false,
        };

        if !valid {
            return Err(EntryError::InvalidFieldName { name });
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FieldName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FieldName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
