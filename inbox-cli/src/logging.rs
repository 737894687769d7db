use inbox::config::{LogFormat, LoggingConfig};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt};

/// Initializes the tracing subscriber for logging using the provided configuration.
///
/// Logs go to stderr so the conversation view on stdout stays machine readable.
pub fn initialize_tracing(logging: &LoggingConfig) {
    let fmt_builder = fmt::fmt()
        .with_env_filter(build_env_filter(logging))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false);

    if matches!(logging.format, LogFormat::Json) {
        fmt_builder.json().with_ansi(false).init();
    } else {
        fmt_builder.with_ansi(false).init();
    }
}

fn build_env_filter(logging: &LoggingConfig) -> EnvFilter {
    let default_level = logging
        .level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::INFO);

    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(default_level.into())
            .from_env_lossy()
    })
}
