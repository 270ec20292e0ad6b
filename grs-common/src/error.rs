//! Error taxonomy for the shim.
//!
//! Three conditions matter: the proxy being unreachable (reported to the
//! user, exit 1), a protocol violation (fatal, never confused with the
//! remote command's own exit code), and failure to exec the real git
//! binary (fatal, propagated unchanged). Missing configuration is not an
//! error anywhere in the shim.

use std::path::PathBuf;
use thiserror::Error;

use crate::protocol::ProtocolError;

#[derive(Debug, Error)]
pub enum ShimError {
    /// Could not connect to the proxy daemon.
    #[error("unable to connect to git proxy at {endpoint}: {source}")]
    ProxyUnreachable {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    /// The daemon broke the response-frame contract.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Replacing the process image with the real git binary failed.
    #[error("failed to exec real git at {path}: {source}")]
    Exec {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file exists but could not be read or parsed.
    #[error("invalid config file {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Failed to encode the proxy request.
    #[error("failed to encode proxy request: {0}")]
    Encode(#[from] serde_json::Error),

    /// Socket or stdout I/O failure mid-conversation.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
