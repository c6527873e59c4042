//! Error types shared by the config loader, transport and connection.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop the logger.
///
/// Parsing of inbound lines never fails: malformed lines produce empty or
/// best-effort fields instead of an error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("could not connect to {host}:{port}: {source}")]
    Transport {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("invalid TLS server name {0:?}")]
    ServerName(String),

    #[error("server closed the connection")]
    ConnectionClosed,

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
