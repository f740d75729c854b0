use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

/// Configuration for console and file logging.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub log_dir: String,
    pub enable_console: bool,
    pub enable_file: bool,
    pub log_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            enable_console: true,
            enable_file: false,
            log_level: "info".to_string(),
        }
    }
}

/// Initialize tracing with a console layer and, optionally, a daily-rolling
/// file layer. The returned guard must stay alive for the file writer to
/// flush.
pub fn init_logging(
    config: Option<LoggingConfig>,
) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let config = config.unwrap_or_default();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ledger_es={}", config.log_level)));

    let mut layers: Vec<Box<dyn Layer<_> + Send + Sync>> = Vec::new();
    let mut guard = None;

    if config.enable_console {
        let console_layer = fmt::layer()
            .with_target(false)
            .with_level(true)
            .with_ansi(true);
        layers.push(Box::new(console_layer));
    }

    if config.enable_file {
        fs::create_dir_all(&config.log_dir)?;
        let appender = RollingFileAppender::new(Rotation::DAILY, &config.log_dir, "ledger-es.log");
        let (writer, file_guard) = tracing_appender::non_blocking(appender);
        let file_layer = fmt::layer()
            .with_writer(writer)
            .with_target(false)
            .with_ansi(false);
        layers.push(Box::new(file_layer));
        guard = Some(file_guard);
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .init();

    Ok(guard)
}
