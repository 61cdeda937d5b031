//! Diagnostic logging setup
//!
//! Logs go to stderr so they never interleave with shell output on stdout.
//! The level comes from `FINANCE_LOG` (an `EnvFilter` directive string),
//! defaulting to `warn`; `--verbose` raises this crate to `debug`.

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the filter directives
pub const LOG_ENV: &str = "FINANCE_LOG";

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber; later calls are no-ops
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        let mut filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
        if verbose {
            if let Ok(directive) = "finance_manager=debug".parse() {
                filter = filter.add_directive(directive);
            }
        }

        // Fails only if another subscriber is already installed
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
