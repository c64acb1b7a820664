//! Logging setup shared by the binary and tests

use crate::config::DebugConfig;
use tracing_subscriber::EnvFilter;

/// Build the filter for a debug configuration. `RUST_LOG` wins when set.
pub fn env_filter(debug: &DebugConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let mut filter = EnvFilter::new(debug.log_level.as_filter());
        if debug.trace_swi {
            if let Ok(directive) = "swi_bios::dispatcher=trace".parse() {
                filter = filter.add_directive(directive);
            }
        }
        filter
    })
}

/// Initialize the global tracing subscriber.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging(debug: &DebugConfig) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug))
        .try_init();
}
