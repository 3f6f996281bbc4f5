//! Error taxonomy shared by the patcher and the introspector.
//!
//! Library calls return [`MaintError`]; the binaries wrap it in `anyhow`
//! context at the process boundary and exit non-zero.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MaintError>;

#[derive(Debug, Error)]
pub enum MaintError {
    /// The target file or store does not exist.
    #[error("{} not found", .path.display())]
    NotFound { path: PathBuf },
    /// Reading or writing the target failed.
    #[error("i/o failure on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file exists but SQLite does not recognise it as a database.
    #[error("{} is not a valid SQLite store", .path.display())]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    /// Any other SQLite failure while opening or querying the store.
    #[error("querying store {} failed", .path.display())]
    Store {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("invalid substitution rule: {0}")]
    InvalidRule(String),
    #[error("unknown schema object kind '{0}'")]
    UnknownObjectKind(String),
}

impl MaintError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            return MaintError::NotFound { path };
        }
        MaintError::Io { path, source }
    }
}
