//! Git Relay Shim - command interception entrypoint.
//!
//! Invoked exactly as git would be. Each invocation runs one of three
//! branches and exits from within it: passthrough to the real binary
//! (directory not managed), a local intrinsic resolution, or a one-shot
//! forward to the git proxy daemon.

#![forbid(unsafe_code)]

mod client;
mod intrinsic;
mod passthrough;

use anyhow::Context;
use grs_common::protocol::ProxyRequest;
use grs_common::{find_managed_root, load_config};
use std::env;
use std::io::Write;
use std::path::Path;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = load_config()?;
    let cwd = env::current_dir().context("failed to resolve current directory")?;

    let Some(managed_root) = find_managed_root(&cwd, &config.managed_dirs_path()) else {
        debug!(cwd = %cwd.display(), "directory not managed, passing through");
        // Only returns on exec failure.
        return Err(passthrough::passthrough(&config.real_git_path(), &args).into());
    };

    if let Some(resolution) = intrinsic::resolve(&args, &managed_root) {
        debug!(?args, "resolved intrinsically");
        let mut stdout = std::io::stdout();
        stdout.write_all(resolution.stdout.as_bytes())?;
        stdout.flush()?;
        std::process::exit(resolution.exit_code);
    }

    let request = ProxyRequest::new(home_relative(&cwd), &args);
    let endpoint = config.proxy.endpoint();
    let client = match client::ProxyClient::connect(&endpoint).await {
        Ok(client) => client,
        Err(err) => {
            debug!(%err, "proxy connect failed");
            eprintln!("Unable to connect to git proxy; is your devbox syncer running?");
            std::process::exit(1);
        }
    };

    let code = client.run(&request).await?;
    std::process::exit(code);
}

/// Diagnostics go to stderr only; stdout belongs to the proxied command.
/// Off unless `GRS_LOG` selects a filter.
fn init_logging() {
    let filter = EnvFilter::try_from_env("GRS_LOG").unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_ansi(false))
        .with(filter)
        .init();
}

/// Working directory as the proxy expects it: relative to `$HOME`.
fn home_relative(cwd: &Path) -> String {
    match dirs::home_dir() {
        Some(home) => relative_to(cwd, &home),
        None => cwd.to_string_lossy().into_owned(),
    }
}

fn relative_to(cwd: &Path, home: &Path) -> String {
    match cwd.strip_prefix(home) {
        Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Ok(rel) => rel.to_string_lossy().into_owned(),
        // Outside $HOME: send the absolute path rather than a ../ chain.
        Err(_) => cwd.to_string_lossy().into_owned(),
    }
}
