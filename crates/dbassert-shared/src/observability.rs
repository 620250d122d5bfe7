//! Logging setup

use once_cell::sync::OnceCell;
use tracing::{debug, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::config::{LoggingConfig, ObservabilityConfig};

/// Format the global subscriber was installed with.
static LOG_FORMAT: OnceCell<LogFormat> = OnceCell::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    fn from_config(format: &str) -> Self {
        match format.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Map a configured level name onto a tracing level, defaulting to `WARN`.
pub fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    }
}

/// Install the global tracing subscriber.
///
/// Logs go to stderr so that command output on stdout stays parseable.
/// `RUST_LOG` directives take precedence over the configured level.
pub fn init(config: &ObservabilityConfig) -> anyhow::Result<()> {
    init_logging(&config.logging)
}

fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let format = LogFormat::from_config(&config.format);
    LOG_FORMAT
        .set(format)
        .map_err(|_| anyhow::anyhow!("Logging already initialized"))?;

    let env_filter = EnvFilter::builder()
        .with_default_directive(parse_level(&config.level).into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Json => {
            let json_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_span_events(FmtSpan::CLOSE);
            registry.with(json_layer).try_init()?;
        }
        LogFormat::Pretty => {
            let pretty_layer = tracing_subscriber::fmt::layer()
                .pretty()
                .with_writer(std::io::stderr)
                .with_span_events(FmtSpan::CLOSE);
            registry.with(pretty_layer).try_init()?;
        }
    }

    debug!(?format, level = %config.level, "Logging initialized");
    Ok(())
}
