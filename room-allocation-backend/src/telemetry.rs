use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_LOG_LEVEL: &str = "warn,allocate=info,room_allocation_backend=info,\
                                 room_allocation_database=info,room_allocation_engine=info,\
                                 room_allocation_config=info";

/// Logs to stderr, filtered by `RUST_LOG` or [`DEFAULT_LOG_LEVEL`], so stdout
/// only carries the report.
pub fn setup_tracing() {
    let stderr_log = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_LEVEL.into()),
        ))
        .init();
}
