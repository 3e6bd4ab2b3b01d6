use anyhow::{anyhow, Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins over the configured filter when set.
pub fn filter_directives(configured: &str, rust_log: Option<String>) -> String {
    rust_log
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| configured.trim().to_string())
}

pub fn build_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives).with_context(|| format!("invalid log filter `{directives}`"))
}

pub fn init_logging(configured: &str) -> Result<()> {
    let directives = filter_directives(configured, std::env::var(EnvFilter::DEFAULT_ENV).ok());
    let filter = build_filter(&directives)?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))
}
