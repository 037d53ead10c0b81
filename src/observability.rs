//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;

/// Installs a formatted subscriber filtered by `config.trace_level`, falling back to
/// `info` when the directive does not parse.
///
/// Only the first call takes effect; later calls and hosts that already installed a
/// global subscriber are left alone.
pub fn init_tracing(config: &AppConfig) {
    let filter =
        EnvFilter::try_new(config.trace_level()).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent_and_tolerates_bad_levels() {
        init_tracing(&AppConfig {
            trace_level: Some("not a [valid directive".to_owned()),
            ..AppConfig::default()
        });
        init_tracing(&AppConfig::default());
        tracing::info!("tracing initialized twice");
    }
}
