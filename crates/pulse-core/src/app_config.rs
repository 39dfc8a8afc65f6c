use std::net::SocketAddr;
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
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub feeds_path: PathBuf,
    pub translate_url: String,
    pub translate_target: String,
    pub feed_timeout_secs: u64,
    pub page_timeout_secs: u64,
    pub user_agent: String,
    pub max_concurrent_feeds: usize,
    pub max_concurrent_enrich: usize,
    pub fallback_recent: usize,
    pub recent_load_limit: i64,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("feeds_path", &self.feeds_path)
            .field("database_url", &"[redacted]")
            .field("translate_url", &self.translate_url)
            .field("translate_target", &self.translate_target)
            .field("feed_timeout_secs", &self.feed_timeout_secs)
            .field("page_timeout_secs", &self.page_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_concurrent_feeds", &self.max_concurrent_feeds)
            .field("max_concurrent_enrich", &self.max_concurrent_enrich)
            .field("fallback_recent", &self.fallback_recent)
            .field("recent_load_limit", &self.recent_load_limit)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
