//! Logging and tracing utilities

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing subscriber with default configuration
pub fn init_tracing() {
    init_tracing_with("info");
}

/// Initialize tracing with a fallback filter directive used when `RUST_LOG` is unset.
///
/// Output goes to stderr so log lines never mix with replies printed on stdout.
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_tracing_with(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init_tracing_with("warn");
        init_tracing_with("debug");
        tracing::info!("still alive");
    }
}
