use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub log_dir: String,
    pub enable_file_logging: bool,
    pub log_level: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_dir: std::env::var("LEDGER_LOG_DIR").unwrap_or(defaults.log_dir),
            enable_file_logging: std::env::var("LEDGER_FILE_LOGGING")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.enable_file_logging),
            log_level: std::env::var("LEDGER_LOG_LEVEL").unwrap_or(defaults.log_level),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            enable_file_logging: false,
            log_level: "info".to_string(),
        }
    }
}
