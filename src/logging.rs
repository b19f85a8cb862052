//! Diagnostic logging setup.

use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence. Otherwise renfiles logs at `debug` in
/// verbose mode and only warnings and errors by default. Logs go to stderr so
/// they do not interleave with the report on stdout.
pub fn init(verbose: bool) {
    let default_level = if verbose { "renfiles=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
