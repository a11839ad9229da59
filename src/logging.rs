use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::consts::DEFAULT_LOG_FILTER;

/// Install the global tracing subscriber, filtered by `RUST_LOG`
///
/// Calling it more than once is a no-op.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return;
    }

    // forward records from crates logging through `log`
    if let Err(error) = tracing_log::LogTracer::init() {
        warn!("unable to forward log records: {error}");
    }
}

#[uniffi::export]
fn init_logging() {
    init();
}
