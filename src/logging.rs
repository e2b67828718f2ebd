use tracing_subscriber::EnvFilter;

use crate::config::LOG_ENV;

/// Install the global tracing subscriber.
///
/// Events go to stderr so they never mix with command output. Nothing is logged unless
/// `INTEK_SH_LOG` holds a filter directive such as `debug` or `intek_sh::shell=trace`.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("off"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
