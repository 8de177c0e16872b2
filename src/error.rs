use std::io;

use reqwest::StatusCode;

/// Errors produced while probing, reading or seeking a remote resource.
///
/// End-of-stream is never an error: reads past the end return `Ok(0)`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("{status}: {url}")]
    Status { status: StatusCode, url: String },

    #[error("404 Not Found: {url}")]
    NotFound { url: String },

    #[error("403 Forbidden: {url}")]
    PermissionDenied { url: String },

    #[error("read {url}: unexpected end of data (status {status})")]
    UnexpectedEof { status: StatusCode, url: String },

    #[error("seek {url}: invalid argument")]
    InvalidSeek { url: String },

    #[error("close {url}: file already closed")]
    AlreadyClosed { url: String },

    #[error("read {url}: I/O operation on closed file")]
    Closed { url: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The `std::io` kind this error surfaces as through `Read`/`Seek`.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Error::Transport(e) if e.is_timeout() => io::ErrorKind::TimedOut,
            Error::Io(e) => e.kind(),
            Error::NotFound { .. } => io::ErrorKind::NotFound,
            Error::PermissionDenied { .. } => io::ErrorKind::PermissionDenied,
            Error::UnexpectedEof { .. } => io::ErrorKind::UnexpectedEof,
            Error::InvalidSeek { .. } => io::ErrorKind::InvalidInput,
            _ => io::ErrorKind::Other,
        }
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Io(inner) => inner,
            other => io::Error::new(other.kind(), other),
        }
    }
}
