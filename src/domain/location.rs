use super::error::EntryError;
use std::error::Error;
use std::fmt::Write as _;
use std::io;

/// `CODE_FILE` when the call site has no file.
pub const UNKNOWN_FILE: &str = "unknown";
/// Function placeholder used in `CODE_FUNC`.
pub const UNKNOWN_FUNCTION: &str = "{unknown}";

const SCOPE_SEPARATOR: &str = "::";

/// One frame of a stack trace supplied by an embedding host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackFrame {
    pub file: Option<String>,
    pub line: Option<u32>,
    pub scope: Option<String>,
    pub function: Option<String>,
}

/// Where a journal entry was produced.
///
/// Every part is optional; missing parts fall back to [`UNKNOWN_FILE`], line
/// `0` and [`UNKNOWN_FUNCTION`] when rendered into fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerLocation {
    pub file: Option<String>,
    pub line: Option<u32>,
    pub scope: Option<String>,
    pub function: Option<String>,
}

impl CallerLocation {
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Splits a fully qualified function path (`a::b::func`) into scope and
    /// function name. This is what [`caller_location!`](crate::caller_location)
    /// expands to.
    pub fn from_path(file: &str, line: u32, function_path: &str) -> Self {
        let (scope, function) = match function_path.rsplit_once(SCOPE_SEPARATOR) {
            Some((scope, function)) => (non_empty(scope), non_empty(function)),
            None => (None, non_empty(function_path)),
        };

        Self {
            file: non_empty(file),
            line: Some(line),
            scope,
            function,
        }
    }

    /// Picks the location out of a captured trace.
    ///
    /// `frames[offset]` is the call site (file and line), `frames[offset + 1]`
    /// is the function enclosing it.
    pub fn from_frames(frames: &[StackFrame], offset: usize) -> Result<Self, EntryError> {
        let window = offset
            .checked_add(2)
            .and_then(|end| frames.get(offset..end));

        let Some([site, caller]) = window else {
            return Err(EntryError::TraceCaptureFailed {
                offset,
                available: frames.len(),
            });
        };

        Ok(Self {
            file: site.file.clone(),
            line: site.line,
            scope: caller.scope.clone(),
            function: caller.function.clone(),
        })
    }

    pub fn code_file(&self) -> &str {
        self.file.as_deref().unwrap_or(UNKNOWN_FILE)
    }

    pub fn code_line(&self) -> u32 {
        self.line.unwrap_or(0)
    }

    pub fn code_func(&self) -> String {
        let function = self.function.as_deref().unwrap_or(UNKNOWN_FUNCTION);
        match self.scope.as_deref() {
            Some(scope) => format!("{scope}{SCOPE_SEPARATOR}{function}"),
            None => function.to_string(),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Everything `JournalEntry::from_error` needs to know about a caught error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    pub message: String,
    pub location: CallerLocation,
    pub code: i64,
    pub class: String,
    pub trace: String,
}

impl ErrorContext {
    pub fn new(message: impl Into<String>, location: CallerLocation) -> Self {
        Self {
            message: message.into(),
            location,
            code: 0,
            class: String::new(),
            trace: String::new(),
        }
    }

    pub fn with_code(mut self, code: i64) -> Self {
        self.code = code;
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = trace.into();
        self
    }

    /// Extracts message, OS error code, concrete type name and the source
    /// chain from `err`.
    pub fn from_error<E>(err: &E, location: CallerLocation) -> Self
    where
        E: Error + 'static,
    {
        Self {
            message: err.to_string(),
            code: os_error_code(err),
            class: std::any::type_name::<E>().to_string(),
            trace: render_trace(err, &location),
            location,
        }
    }
}

/// First raw OS error found along the source chain, or `0`.
fn os_error_code(err: &(dyn Error + 'static)) -> i64 {
    std::iter::successors(Some(err), |&e| e.source())
        .filter_map(|e| e.downcast_ref::<io::Error>())
        .find_map(io::Error::raw_os_error)
        .map_or(0, i64::from)
}

fn render_trace(err: &(dyn Error + 'static), location: &CallerLocation) -> String {
    let mut trace = format!(
        "#0 {}({}): {}",
        location.code_file(),
        location.code_line(),
        location.code_func()
    );

    for (depth, cause) in std::iter::successors(Some(err), |&e| e.source()).enumerate() {
        let _ = write!(trace, "\n#{} {cause}", depth + 1);
    }

    trace
}
