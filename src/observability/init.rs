//! Tracing initialization and subscriber setup.
//!
//! Configures a `tracing-subscriber` pipeline with an environment filter.
//! The level comes from configuration, with the conventional `RUST_LOG`
//! environment variable taking precedence when set.

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber.
///
/// # Level Resolution
///
/// 1. `RUST_LOG` environment variable if set
/// 2. `level` if provided (supports full filter syntax, e.g. `placemark=debug`)
/// 3. Default: `"info"`
///
/// # Initialization Behavior
///
/// Idempotent: safe to call multiple times, only the first call takes
/// effect. Output goes to stderr so it never interleaves with the
/// interactive shell on stdout.
pub fn init_tracing(level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or("info")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
