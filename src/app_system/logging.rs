/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` (from the
/// `logging.filter` setting or `-v`) applies.
///
/// ```bash
/// RUST_LOG=debug versioned_products                       # everything at debug
/// RUST_LOG=versioned_products::handler=debug versioned_products
/// ```
pub fn setup_tracing(default_filter: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .compact()
        .init();
}
