use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    /// Root of the ordering backend, e.g. `http://127.0.0.1:8000`.
    pub api_base_url: String,
    /// Directory backing the durable key-value store (cart, order-type draft, session).
    pub data_dir: PathBuf,
    pub log_level: String,
    /// Seconds before the confirmation screen returns home; 0 returns at once.
    pub confirmation_countdown_secs: u32,
    /// Timeout applied to read requests. Order creation is never given one.
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub read_max_retries: u32,
    pub read_backoff_base_ms: u64,
}
