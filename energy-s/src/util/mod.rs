pub mod cmd;
pub mod config;
pub mod msg;

use tracing::debug;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins over `default_level` when set.
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    #[cfg(not(debug_assertions))]
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(!cfg!(windows))
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    #[cfg(debug_assertions)]
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(!cfg!(windows))
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .init();

    debug!("Logging initialized");
}
