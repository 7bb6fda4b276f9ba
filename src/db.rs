use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::MySqlPool;
use tracing::info;

use crate::config::{Config, StorageBackend};
use crate::model::employee::Employee;
use crate::store::{LeaveStore, MemoryStore, MySqlStore};

pub async fn init_db(database_url: &str) -> Result<MySqlPool> {
    MySqlPool::connect(database_url)
        .await
        .context("Failed to connect to database")
}

/// Opens the configured backend, applying migrations when asked to.
pub async fn init_store(config: &Config) -> Result<Arc<dyn LeaveStore>> {
    match config.storage_backend {
        StorageBackend::MySql => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set")?;
            let pool = init_db(url).await?;

            if config.run_migrations {
                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .context("Failed to run migrations")?;
                info!("Database migrations applied");
            }

            Ok(Arc::new(MySqlStore::new(pool)))
        }
        StorageBackend::Memory => {
            let employees = match &config.memory_seed_file {
                Some(path) => load_seed(path)?,
                None => Vec::new(),
            };
            info!(
                employees = employees.len(),
                "Using in-memory store; data is lost on restart"
            );
            Ok(Arc::new(MemoryStore::with_employees(employees)))
        }
    }
}

fn load_seed(path: &str) -> Result<Vec<Employee>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid seed file {}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_seed_file_parses() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/seed/employees.json");
        let employees = load_seed(path).unwrap();
        assert_eq!(employees.len(), 2);
        assert_eq!(employees[0].id, 1000);
        assert_eq!(employees[0].leave_balance, 20);
        assert_eq!(employees[1].employee_code, "EMP-1001");
    }

    #[test]
    fn missing_seed_file_is_an_error() {
        assert!(load_seed("/nonexistent/employees.json").is_err());
    }

    #[actix_web::test]
    async fn memory_backend_starts_from_the_seed() {
        let config = Config {
            server_addr: "127.0.0.1:0".to_string(),
            database_url: None,
            jwt_secret: "seed-test".to_string(),
            api_prefix: "/api".to_string(),
            rate_protected_per_min: 10,
            storage_backend: StorageBackend::Memory,
            run_migrations: false,
            memory_seed_file: Some(
                concat!(env!("CARGO_MANIFEST_DIR"), "/seed/employees.json").to_string(),
            ),
            log_dir: "logs".to_string(),
            log_level: tracing::Level::INFO,
        };

        let store = init_store(&config).await.unwrap();
        let jane = store.employee(1001).await.unwrap().unwrap();
        assert_eq!(jane.leave_balance, 12);
    }
}
