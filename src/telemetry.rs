//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::TelemetryConfig;

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `config.log_level`. Returns `false`
/// when a subscriber was already installed, which leaves the existing one
/// in place.
pub fn init(config: &TelemetryConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_a_no_op() {
        let config = TelemetryConfig::default();
        init(&config);
        assert!(!init(&config));
    }
}
