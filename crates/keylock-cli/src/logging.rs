//! Tracing subscriber setup.

use keylock_core::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive for the configured level, raised by `-v` flags.
pub fn directive(config: &LoggingConfig, verbose: u8) -> String {
    let level = match verbose {
        0 => config.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    if verbose > 0 {
        format!("{level},tower_http={level}")
    } else {
        level.to_string()
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the computed filter.
///
/// Logs go to stderr so command output on stdout stays clean.
pub fn init(config: &LoggingConfig, verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directive(config, verbose)));

    let (pretty, json) = match config.format {
        LogFormat::Pretty => (Some(fmt::layer().with_writer(std::io::stderr)), None),
        LogFormat::Json => (
            None,
            Some(fmt::layer().json().with_writer(std::io::stderr)),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .init();
}
