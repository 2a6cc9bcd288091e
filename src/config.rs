use secrecy::Secret;
use serde::Deserialize;

pub const DEFAULT_DB_POOL_MAX: u32 = 10;
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_RATE_LIMIT_MAX: u32 = 100;
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: Secret<String>,
    pub db_pool_max: u32,
    pub host: String,
    pub port: u16,

    // Allowed cross-origin hosts; empty disables CORS
    pub cors_origins: Vec<String>,

    // Per-client request budget for /api/todos within one window
    pub rate_limit_max: u32,
    pub rate_limit_window_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        // Load .env file if it exists (for local development)
        let _ = dotenvy::dotenv();

        let source = config::Config::builder()
            .add_source(config::Environment::default().separator("__"))
            .build()?;

        Self::from_source(&source)
    }

    fn from_source(source: &config::Config) -> Result<Self, config::ConfigError> {
        let db_pool_max = get_or(source, "db_pool_max", DEFAULT_DB_POOL_MAX)?;
        if db_pool_max == 0 {
            return Err(config::ConfigError::Message(
                "DB_POOL_MAX must be at least 1".to_string(),
            ));
        }

        let rate_limit_max = get_or(source, "rate_limit_max", DEFAULT_RATE_LIMIT_MAX)?;
        let rate_limit_window_secs = get_or(
            source,
            "rate_limit_window_secs",
            DEFAULT_RATE_LIMIT_WINDOW_SECS,
        )?;
        if rate_limit_max == 0 || rate_limit_window_secs == 0 {
            return Err(config::ConfigError::Message(
                "RATE_LIMIT_MAX and RATE_LIMIT_WINDOW_SECS must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            database_url: Secret::new(source.get("database_url")?),
            db_pool_max,
            host: source
                .get("host")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: get_or(source, "port", DEFAULT_PORT)?,
            cors_origins: source
                .get::<String>("cors_origin")
                .map(|raw| parse_origins(&raw))
                .unwrap_or_default(),
            rate_limit_max,
            rate_limit_window_secs,
        })
    }
}

/// Optional key: absent means `default`, malformed is an error.
fn get_or<T: serde::de::DeserializeOwned>(
    source: &config::Config,
    key: &str,
    default: T,
) -> Result<T, config::ConfigError> {
    match source.get::<T>(key) {
        Err(config::ConfigError::NotFound(_)) => Ok(default),
        other => other,
    }
}

/// Splits a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}
