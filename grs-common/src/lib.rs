//! Shared types and utilities for the Git Relay Shim.
//!
//! The shim (`grs`) stands in for git on devboxes. This crate holds the
//! pieces shared between the shim binary and its tests: the wire protocol
//! spoken with the git proxy daemon, the shim configuration, the
//! managed-directory classifier, and the error taxonomy.

pub mod config;
pub mod error;
pub mod managed;
pub mod protocol;

pub use config::{ShimConfig, load_config};
pub use error::ShimError;
pub use managed::find_managed_root;
pub use protocol::{ProtocolError, ProxyRequest, ResponseFrame};
