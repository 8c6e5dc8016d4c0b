use std::panic;

use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_DIRECTIVE: &str = "plugin_shell=info";

/// Installs the global tracing subscriber. `RUST_LOG` overrides the default filter.
///
/// Logs go to stderr so they never interleave with command output.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Replaces the default panic hook with a debug log. The dispatcher reports
/// procedure panics as failed commands.
pub fn install_panic_hook() {
    panic::set_hook(Box::new(|info| {
        debug!(%info, "panic captured");
    }));
}
