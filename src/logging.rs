//! tracing subscriber setup; diagnostics go to stderr so stdout stays for status lines.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins; otherwise `default_level` (e.g. "info", "debug").
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    // A second init (tests, embedding) is not an error worth surfacing.
    let _ = tracing_subscriber::registry().with(filter).with(fmt_layer).try_init();
}
