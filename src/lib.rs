//! Landed cost estimation for import shipments.
//!
//! [`domain::compute`] is the pure calculation; the rest of the crate covers
//! the optional duty-rate lookup, exports, the lead log and console output.

pub mod app;
pub mod domain;
pub mod infra;
pub mod ui;
pub mod util;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the global subscriber. Logs go to stderr so stdout can carry
/// reports and exports. `RUST_LOG` takes precedence over `default_level`.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}
