//! Log output setup for the CLI

use tracing_subscriber::EnvFilter;

/// Default filter when neither `--verbosity` nor `RUST_LOG` is given
pub const DEFAULT_FILTER: &str = "warn";

/// Install a compact stderr subscriber filtered by `env_filter`
///
/// `RUST_LOG` wins over `env_filter` when it is set.
pub fn setup_for_cli(env_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .init();
}
