#![doc(test(attr(deny(warnings))))]

//! Plugin Shell discovers command definitions from a directory of plugin
//! files, registers them by name and routes input lines to their procedures.

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod help;
pub mod loader;
pub mod procedures;
pub mod registry;
pub mod utils;

use std::sync::Once;

pub use dispatch::{dispatch, DispatchResult, Session};
pub use loader::{LoadReport, Loader};
pub use registry::{CommandEntry, Registry};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Plugin shell tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
