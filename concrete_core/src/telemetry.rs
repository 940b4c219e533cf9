//! Log output for the `concrete-qa` binary.
//!
//! The engines only emit `tracing` events (batch sizes and headline results
//! at DEBUG, clamped table lookups at TRACE). Nothing is printed until a
//! binary installs a subscriber through [`init_tracing`].
//!
//! Events are written to stderr. Reports and JSON results own stdout, so
//! `concrete-qa run batch.json --format json > result.json` stays clean with
//! logging switched on.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the process-wide subscriber for the CLI.
///
/// `level` is the threshold used when `RUST_LOG` is absent or unparsable;
/// `RUST_LOG=concrete_core=trace` shows every clamped lookup. With `json`
/// each event becomes one JSON object per line for laboratory log
/// collectors, otherwise events are plain text.
///
/// A subscriber can only be installed once per process; later calls do nothing.
pub fn init_tracing(json: bool, level: Level) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let json_layer = json.then(|| fmt::layer().with_writer(std::io::stderr).with_target(false).json());
    let text_layer = (!json).then(|| fmt::layer().with_writer(std::io::stderr).with_target(false));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_ignored() {
        init_tracing(false, Level::WARN);
        init_tracing(true, Level::DEBUG);
        tracing::debug!(samples = 3, "after init");
    }
}
