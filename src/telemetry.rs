use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

/// Environment variable checked before RUST_LOG
pub const LOG_ENV_VAR: &str = "TIDYCODE_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Build the log filter: TIDYCODE_LOG, then RUST_LOG, then `fallback`
pub fn build_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Initialize structured logging on stderr.
/// Tool output owns stdout, so log lines never mix with summaries.
pub fn init_telemetry(format: LogFormat, fallback_level: &str) -> Result<()> {
    let filter = build_filter(fallback_level);

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .try_init()?,
        LogFormat::Text => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .try_init()?,
    }

    tracing::debug!("tidycode telemetry initialized");
    Ok(())
}

/// Generate a correlation ID for linking the log lines of one run
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span wrapping one batch of tool invocations
pub fn create_tool_run_span(
    correlation_id: &str,
    category: &str,
    tool_count: usize,
) -> tracing::Span {
    tracing::info_span!(
        "tool_run",
        correlation.id = correlation_id,
        category = category,
        tool_count = tool_count
    )
}
