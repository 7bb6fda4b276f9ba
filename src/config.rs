use anyhow::{Context, Result, anyhow, bail};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

/// Where leave records and notifications are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    MySql,
    /// Process memory only, lost on restart. Meant for local runs.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mysql" => Ok(StorageBackend::MySql),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(anyhow!("unknown STORAGE_BACKEND `{}` (expected mysql or memory)", other)),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub api_prefix: String,

    // Rate limiting
    pub rate_protected_per_min: u32,

    pub storage_backend: StorageBackend,
    pub run_migrations: bool,
    /// JSON array of employees loaded into the memory backend at startup
    pub memory_seed_file: Option<String>,

    pub log_dir: String,
    pub log_level: tracing::Level,
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{} must be set", key))
}

fn parsed_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("invalid {} `{}`: {}", key, raw, e)),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let storage_backend = parsed_or("STORAGE_BACKEND", StorageBackend::MySql)?;
        let database_url = env::var("DATABASE_URL").ok();
        if storage_backend == StorageBackend::MySql && database_url.is_none() {
            bail!("DATABASE_URL must be set when STORAGE_BACKEND=mysql");
        }

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url,
            jwt_secret: required("JWT_SECRET")?,
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            rate_protected_per_min: parsed_or("RATE_PROTECTED_PER_MIN", 1000)?,
            storage_backend,
            run_migrations: parsed_or("RUN_MIGRATIONS", true)?,
            memory_seed_file: env::var("MEMORY_SEED_FILE").ok(),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            log_level: parsed_or("LOG_LEVEL", tracing::Level::DEBUG)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_backend_parses_case_insensitively() {
        assert_eq!("MySQL".parse::<StorageBackend>().unwrap(), StorageBackend::MySql);
        assert_eq!(" memory ".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert!("postgres".parse::<StorageBackend>().is_err());
    }
}
