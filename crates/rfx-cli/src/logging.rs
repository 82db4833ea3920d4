//! Subscriber setup.

use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber.
///
/// `warn` by default, `debug` with `-v`. `RUST_LOG` overrides either.
pub fn init(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
