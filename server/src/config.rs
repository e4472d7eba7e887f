use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("unknown TODO_STORE {0:?} (expected \"postgres\" or \"memory\")")]
    UnknownStore(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    Postgres { url: String, max_connections: u32 },
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store: StoreKind,
}

impl Config {
    /// Read settings from the process environment. Call `dotenv` first if a
    /// `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var("HOST", "0.0.0.0");
        let port = parse("PORT", var("PORT", "3000"))?;

        let store = match var("TODO_STORE", "postgres").as_str() {
            "memory" => StoreKind::Memory,
            "postgres" => {
                let url = lookup("DATABASE_URL").unwrap_or_else(|| {
                    format!(
                        "postgres://{}:{}@{}:{}/{}",
                        var("DB_USER", "todouser"),
                        var("DB_PASSWORD", "todopassword"),
                        var("DB_HOST", "localhost"),
                        var("DB_PORT", "5432"),
                        var("DB_NAME", "tododb"),
                    )
                });
                let max_connections = parse("DB_MAX_CONNECTIONS", var("DB_MAX_CONNECTIONS", "5"))?;
                StoreKind::Postgres {
                    url,
                    max_connections,
                }
            }
            other => return Err(ConfigError::UnknownStore(other.to_string())),
        };

        Ok(Self { host, port, store })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}
