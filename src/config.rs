use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the recommendation API (the `/recommend/` and
    /// `/upload-resume/` endpoints live under it)
    #[serde(default = "default_recommend_api_url")]
    pub recommend_api_url: String,

    /// Redis connection URL for session persistence; sessions stay in memory when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Key under which this client's session object is persisted
    #[serde(default = "default_session_slot")]
    pub session_slot: String,

    /// How long a persisted session survives without being rewritten
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Per-request timeout for the recommendation API
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Extra attempts after a transient fetch failure
    #[serde(default = "default_fetch_retries")]
    pub fetch_retries: u32,

    /// Pause between fetch attempts
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_recommend_api_url() -> String {
    "http://127.0.0.1:8000/api".to_string()
}

fn default_session_slot() -> String {
    "default".to_string()
}

fn default_session_ttl_secs() -> u64 {
    2_592_000 // 30 days
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_fetch_retries() -> u32 {
    1
}

fn default_retry_backoff_ms() -> u64 {
    250
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recommend_api_url: default_recommend_api_url(),
            redis_url: None,
            session_slot: default_session_slot(),
            session_ttl_secs: default_session_ttl_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            fetch_retries: default_fetch_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Address the HTTP surface binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
