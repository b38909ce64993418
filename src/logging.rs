//! Logging setup for the `reportgrid` binary.
//!
//! Logs go to stderr so `--json` output on stdout stays machine-readable.
//! `REPORTGRID_LOG` takes an `EnvFilter` directive (e.g. `reportgrid=debug`);
//! without it the level is `warn`, or `debug` for this crate with `--verbose`.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

pub const LOG_ENV: &str = "REPORTGRID_LOG";

/// Filter directive used when `REPORTGRID_LOG` is unset
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "warn,reportgrid=debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber. Calling it twice is a no-op.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let installed = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(filter)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(verbose, "logging initialized");
    }
}
