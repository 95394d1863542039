use tracing_subscriber::EnvFilter;

/// Initialize console logging on stderr.
///
/// The filter comes from `RUST_LOG` when set, otherwise everything at `info`
/// and above is shown. Setting it twice (as tests may) is a no-op.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
