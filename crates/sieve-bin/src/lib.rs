//! Shared plumbing for the logsieve binaries.

pub mod pipeline;

/// Stderr logging with `RUST_LOG` override; stdout stays free for tool
/// output.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
