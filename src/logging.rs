use tracing_subscriber::{fmt, EnvFilter};

/// Initialize tracing once, honoring `RUST_LOG` when set and falling back to
/// the configured level (`LoggingCfg::log_level`) otherwise. Safe to call
/// more than once.
pub fn init_logging(fallback_level: &str) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .compact()
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
    tracing::debug!("tracing initialized");
}
