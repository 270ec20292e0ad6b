//! Passthrough to the real git binary for unmanaged directories.

use grs_common::ShimError;
use std::path::Path;
use std::process::Command;

/// Replace this process with the real git binary, passing `args` through
/// unchanged. Returns only on failure; the returned error is fatal.
#[cfg(unix)]
pub fn passthrough(real_git: &Path, args: &[String]) -> ShimError {
    use std::os::unix::process::CommandExt;

    let err = Command::new(real_git).args(args).exec();
    ShimError::Exec {
        path: real_git.to_path_buf(),
        source: err,
    }
}

/// No process-image replacement on this platform: spawn the real binary
/// with inherited stdio, wait, and exit with its code. Behaviorally
/// equivalent for callers.
#[cfg(not(unix))]
pub fn passthrough(real_git: &Path, args: &[String]) -> ShimError {
    match Command::new(real_git).args(args).status() {
        Ok(status) => std::process::exit(status.code().unwrap_or(1)),
        Err(err) => ShimError::Exec {
            path: real_git.to_path_buf(),
            source: err,
        },
    }
}
