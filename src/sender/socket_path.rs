use crate::domain::EndpointError;
use std::fmt;
use std::io;
use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};

/// Where journald listens for native protocol datagrams.
pub const DEFAULT_SOCKET_PATH: &str = "/run/systemd/journal/socket";

/// A path verified to exist and to be a Unix socket.
///
/// The check runs once, when the value is built; a socket that disappears
/// later surfaces as a connect failure on send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketPath {
    path: PathBuf,
}

impl SocketPath {
    pub fn system_default() -> Result<Self, EndpointError> {
        Self::custom(DEFAULT_SOCKET_PATH)
    }

    pub fn custom(path: impl Into<PathBuf>) -> Result<Self, EndpointError> {
        let path = path.into();
        ensure_socket(&path)?;
        Ok(Self { path })
    }

    pub fn as_path(&self) -> &Path {
        &self.path
    }

    pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
        self.path.to_string_lossy()
    }
}

impl fmt::Display for SocketPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

fn ensure_socket(path: &Path) -> Result<(), EndpointError> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(EndpointError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(EndpointError::Inaccessible {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if !metadata.file_type().is_socket() {
        return Err(EndpointError::NotASocket {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}
