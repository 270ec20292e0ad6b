//! Intrinsic commands: git invocations with a knowable, purely-local
//! answer. Resolved without touching the real binary or the proxy.

use std::path::Path;

/// Local resolution of an intrinsic command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Text to write to stdout, trailing newline included.
    pub stdout: String,
    /// Exit code for the shim process.
    pub exit_code: i32,
}

type Resolver = fn(&Path) -> Resolution;

// Argument patterns are matched exactly, not as prefixes: `rev-parse
// --show-toplevel --quiet` must still go to the proxy.
const TABLE: &[(&[&str], Resolver)] = &[(&["rev-parse", "--show-toplevel"], show_toplevel)];

fn show_toplevel(managed_root: &Path) -> Resolution {
    Resolution {
        stdout: format!("{}\n", managed_root.display()),
        exit_code: 0,
    }
}

/// Look up `args` in the intrinsic table.
///
/// Returns the local resolution if the full argument vector matches an
/// entry; the caller prints it and terminates. `None` hands control back
/// so the proxy path can run.
pub fn resolve(args: &[String], managed_root: &Path) -> Option<Resolution> {
    for (pattern, resolver) in TABLE {
        if args.len() == pattern.len() && args.iter().zip(pattern.iter()).all(|(a, p)| a == p) {
            return Some(resolver(managed_root));
        }
    }
    None
}
