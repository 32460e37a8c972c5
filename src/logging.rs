use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";

/// Sends tracing output to stderr so it never mixes with menu output.
/// `RUST_LOG` overrides the default `warn` filter.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // A subscriber may already be installed, e.g. by a test harness.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
