use std::path::PathBuf;

use crate::server::error::config::ConfigError;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "http://localhost:8080",
];

pub struct Config {
    pub database_url: String,
    pub valkey_url: String,
    pub bind_address: String,
    pub static_dir: PathBuf,
    pub allowed_origins: Vec<String>,
    /// `ENV=production` switches logging to `info` by default
    pub production: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
        };

        let bind_address = lookup("BIND_ADDRESS")
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        if bind_address.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::InvalidEnvValue {
                var: "BIND_ADDRESS".to_string(),
                reason: format!("'{}' is not a socket address", bind_address),
            });
        }

        let allowed_origins = match lookup("ALLOWED_ORIGINS").filter(|value| !value.is_empty()) {
            Some(origins) => origins
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            None => DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|origin| origin.to_string())
                .collect(),
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            valkey_url: required("VALKEY_URL")?,
            bind_address,
            static_dir: PathBuf::from(
                lookup("STATIC_DIR")
                    .filter(|value| !value.is_empty())
                    .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
            ),
            allowed_origins,
            production: lookup("ENV").as_deref() == Some("production"),
        })
    }
}
