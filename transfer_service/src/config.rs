use std::env;
use std::str::FromStr;

use common::money::Money;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value '{value}' for environment variable {name}")]
    InvalidVar { name: String, value: String },
}

/// Configuración completa del servicio, cargada del entorno una sola vez en el
/// arranque. Ningún componente vuelve a leer variables de entorno después.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // Base de datos
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_seconds: u64,
    pub db_idle_timeout_seconds: u64,

    // Cache
    pub redis_url: String,
    pub cache_retry_attempts: u32,
    pub cache_retry_backoff_ms: u64,

    // Protocolo de transferencia
    pub idempotency_ttl_seconds: u64,
    pub lease_ttl_seconds: u64,
    pub max_transfer_amount: Money,

    // HTTP
    pub host: String,
    pub port: u16,
}

fn optional_parsed<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
{
    match env::var(name) {
        Ok(raw) => raw.parse::<T>().map_err(|_| ConfigError::InvalidVar {
            name: name.to_string(),
            value: raw,
        }),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    /// Lee la configuración del entorno, con defaults para todo menos la DSN.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        Ok(Self {
            database_url,
            db_max_connections: optional_parsed("DB_MAX_CONNECTIONS", 5)?,
            db_min_connections: optional_parsed("DB_MIN_CONNECTIONS", 1)?,
            db_acquire_timeout_seconds: optional_parsed("DB_ACQUIRE_TIMEOUT_SECONDS", 5)?,
            db_idle_timeout_seconds: optional_parsed("DB_IDLE_TIMEOUT_SECONDS", 600)?,
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            cache_retry_attempts: optional_parsed("CACHE_RETRY_ATTEMPTS", 3)?,
            cache_retry_backoff_ms: optional_parsed("CACHE_RETRY_BACKOFF_MS", 100)?,
            idempotency_ttl_seconds: optional_parsed("IDEMPOTENCY_TTL_SECONDS", 86_400)?,
            lease_ttl_seconds: optional_parsed("LEASE_TTL_SECONDS", 30)?,
            max_transfer_amount: optional_parsed("MAX_TRANSFER_AMOUNT", default_max_amount())?,
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: optional_parsed("PORT", 3000)?,
        })
    }
}

fn default_max_amount() -> Money {
    "1000000000"
        .parse()
        .expect("default MAX_TRANSFER_AMOUNT is canonical")
}

/// Subconjunto de configuración que consume el coordinador de transferencias.
#[derive(Debug, Clone)]
pub struct TransferSettings {
    pub max_transfer_amount: Money,
    pub lease_ttl_seconds: u64,
    pub idempotency_ttl_seconds: u64,
}

impl From<&AppConfig> for TransferSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_transfer_amount: config.max_transfer_amount,
            lease_ttl_seconds: config.lease_ttl_seconds,
            idempotency_ttl_seconds: config.idempotency_ttl_seconds,
        }
    }
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            max_transfer_amount: default_max_amount(),
            lease_ttl_seconds: 30,
            idempotency_ttl_seconds: 86_400,
        }
    }
}
