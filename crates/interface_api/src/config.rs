//! API configuration

use serde::Deserialize;

/// API configuration
///
/// Loaded once at startup from `API_`-prefixed environment variables.
/// `jwt_secret` and `database_url` have no default; loading fails without them.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
    /// JWT secret for authentication
    pub jwt_secret: String,
    /// JWT expiration in seconds
    #[serde(default = "default_jwt_expiration_secs")]
    pub jwt_expiration_secs: u64,
    /// Database URL
    pub database_url: String,
    /// Upper bound on pooled database connections
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log output format: "text" or "json"
    #[serde(default = "default_log_format")]
    pub log_format: String,
    /// Bound on each claim store call, in milliseconds
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
    /// Origins allowed by CORS
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_jwt_expiration_secs() -> u64 {
    7 * 24 * 60 * 60
}

fn default_db_max_connections() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_store_timeout_ms() -> u64 {
    5_000
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:3001".to_string(),
    ]
}

impl ApiConfig {
    /// Creates a configuration with defaults for every optional field
    pub fn new(jwt_secret: impl Into<String>, database_url: impl Into<String>) -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            jwt_secret: jwt_secret.into(),
            jwt_expiration_secs: default_jwt_expiration_secs(),
            database_url: database_url.into(),
            db_max_connections: default_db_max_connections(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            store_timeout_ms: default_store_timeout_ms(),
            cors_origins: default_cors_origins(),
        }
    }

    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(config::Environment::with_prefix("API"))
    }

    fn from_source(source: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                source
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_origins"),
            )
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns true when logs should be emitted as JSON lines
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }

    pub fn store_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.store_timeout_ms)
    }
}
