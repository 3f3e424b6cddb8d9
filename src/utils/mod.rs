pub mod build_info;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Maps `-v` repetitions to a default filter directive.
pub fn verbosity_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "spendlog=warn",
        1 => "spendlog=info",
        2 => "spendlog=debug",
        _ => "spendlog=trace",
    }
}

/// Installs the global subscriber once; `RUST_LOG` wins over `verbosity`.
pub fn init_tracing(verbosity: u8) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(verbosity_directive(verbosity)));

        // try_init: another subscriber may already be installed by a test harness
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
        tracing::debug!(version = build_info::VERSION, "spendlog tracing initialized");
    });
}
