use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured stdout tracing. Call once at service startup.
/// Emits JSON lines; the filter comes from `RUST_LOG`.
///
/// Calling this more than once is a no-op rather than a panic, so tests
/// that each spin up a service can share a process.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().json())
        .try_init();
}
