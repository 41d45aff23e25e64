use tracing::Level;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

/// Install the global subscriber, writing to stderr
///
/// `RUST_LOG` takes precedence over `level` when it is set.
pub fn init(level: Level) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
