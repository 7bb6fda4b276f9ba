use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::http::header;
use actix_web::test::TestRequest;

use crate::auth::jwt::test_tokens;
use crate::config::{Config, StorageBackend};
use crate::model::{employee::Employee, role::Role};
use crate::models::TokenType;
use crate::store::MemoryStore;

pub(super) const SECRET: &str = "test-secret";

pub(super) fn config() -> Config {
    Config {
        server_addr: "127.0.0.1:0".to_string(),
        database_url: None,
        jwt_secret: SECRET.to_string(),
        api_prefix: "/api".to_string(),
        rate_protected_per_min: 10_000,
        storage_backend: StorageBackend::Memory,
        run_migrations: false,
        memory_seed_file: None,
        log_dir: "logs".to_string(),
        log_level: tracing::Level::DEBUG,
    }
}

pub(super) fn employee(id: u64, balance: i32) -> Employee {
    Employee {
        id,
        employee_code: format!("EMP-{}", id),
        first_name: "Test".to_string(),
        last_name: format!("Employee{}", id),
        email: format!("emp{}@company.com", id),
        leave_balance: balance,
    }
}

pub(super) fn store_with(employees: impl IntoIterator<Item = Employee>) -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_employees(employees))
}

pub(super) fn empty_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

pub(super) fn hr_token() -> String {
    test_tokens::issue(SECRET, Role::Hr as u8, None, TokenType::Access, 600)
}

pub(super) fn employee_token(employee_id: u64) -> String {
    test_tokens::issue(
        SECRET,
        Role::Employee as u8,
        Some(employee_id),
        TokenType::Access,
        600,
    )
}

fn peer() -> SocketAddr {
    "127.0.0.1:40000".parse().expect("valid socket addr")
}

/// Adds the peer address the rate limiter keys on plus a bearer token.
pub(super) fn authed(req: TestRequest, token: &str) -> TestRequest {
    req.peer_addr(peer())
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
}

pub(super) fn anonymous(req: TestRequest) -> TestRequest {
    req.peer_addr(peer())
}

/// Builds the routed service over `$store` (an `Arc<MemoryStore>`).
macro_rules! test_app {
    ($store:expr) => {{
        let config = $crate::api::tests::common::config();
        let rate_limit = $crate::routes::build_limiter(config.rate_protected_per_min)
            .expect("valid limiter");
        let store: std::sync::Arc<dyn $crate::store::LeaveStore> = $store.clone();
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::from(store))
                .app_data(actix_web::web::Data::new(config.clone()))
                .configure(|cfg| $crate::routes::configure(cfg, &config, &rate_limit)),
        )
        .await
    }};
}
