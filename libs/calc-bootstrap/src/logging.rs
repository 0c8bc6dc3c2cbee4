//! Global `tracing` subscriber setup.

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{LogFormat, LoggingConfig};

/// Build the filter: `RUST_LOG` if set, otherwise `cfg.level`.
///
/// # Errors
/// Returns an error if the directive taken from `cfg.level` does not parse.
pub fn build_env_filter(cfg: &LoggingConfig) -> anyhow::Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&cfg.level)
        .with_context(|| format!("invalid logging.level directive '{}'", cfg.level))
}

/// Install the process-wide subscriber (stderr, text or JSON).
///
/// # Errors
/// Returns an error if the filter is invalid or a global subscriber is
/// already installed.
pub fn init_logging(cfg: &LoggingConfig) -> anyhow::Result<()> {
    let filter = build_env_filter(cfg)?;
    let registry = tracing_subscriber::registry().with(filter);

    match cfg.format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_ansi(cfg.ansi),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(false),
            )
            .try_init(),
    }
    .context("failed to install global tracing subscriber")?;

    tracing::debug!(
        level = %cfg.level,
        json = matches!(cfg.format, LogFormat::Json),
        "logging initialized"
    );
    Ok(())
}
