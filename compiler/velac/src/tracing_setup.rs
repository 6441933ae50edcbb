//! Tracing initialization for the Vela compiler.
//!
//! Controlled by the CLI flags first, then environment variables:
//! - `VELA_LOG`: filter string (`RUST_LOG` syntax), falls back to `RUST_LOG`.
//! - Defaults to `warn` when nothing is set.

use std::sync::OnceLock;
use tracing_subscriber::{prelude::*, EnvFilter, Registry};

static INIT: OnceLock<()> = OnceLock::new();

/// Map `--log-level N` to a filter directive.
fn level_directive(level: u8) -> &'static str {
    match level {
        0 => "error",
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    }
}

/// Initialize the tracing subscriber.
///
/// Safe to call multiple times — only the first call takes effect.
pub fn init(verbose: bool, log_level: Option<u8>) {
    INIT.get_or_init(|| {
        let filter = if let Some(level) = log_level {
            EnvFilter::new(level_directive(level))
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_from_env("VELA_LOG")
                .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
                .unwrap_or_else(|_| EnvFilter::new("warn"))
        };

        Registry::default()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .with(filter)
            .init();
    });
}
