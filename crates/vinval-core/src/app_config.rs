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

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// `None` is allowed so offline commands run without credentials.
    pub marketcheck_api_key: Option<String>,
    pub marketcheck_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Total attempts per provider request, including the first.
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
    pub backoff_max_ms: u64,
    pub search_radius_miles: u32,
    pub search_rows: u32,
    pub report_sections_path: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field(
                "marketcheck_api_key",
                &self.marketcheck_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("marketcheck_base_url", &self.marketcheck_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_attempts", &self.max_attempts)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .field("backoff_max_ms", &self.backoff_max_ms)
            .field("search_radius_miles", &self.search_radius_miles)
            .field("search_rows", &self.search_rows)
            .field("report_sections_path", &self.report_sections_path)
            .finish()
    }
}
