use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Environment;

/// Initialize structured logging for the application.
///
/// `RUST_LOG` wins when set; otherwise logs at `info`.
/// Call once at startup (in main.rs).
pub fn init_logging(environment: Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    info!("Logging initialized ({})", environment);
}
