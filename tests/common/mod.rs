use std::sync::Arc;

use tempfile::TempDir;

use papertrade_core::db::{self, DbPool};
use papertrade_core::portfolios::{Portfolio, PortfolioService};
use papertrade_core::users::{NewUser, UserService};

/// A migrated scratch database living in a temp directory that is removed
/// when the value drops.
pub struct TestDb {
    pub pool: Arc<DbPool>,
    _dir: TempDir,
}

pub fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = db::init(dir.path().to_str().unwrap()).expect("Failed to initialize database");
    let pool = db::create_pool(&db_path).expect("Failed to create database pool");
    db::run_migrations(&pool).expect("Failed to run migrations");

    TestDb { pool, _dir: dir }
}

/// Registers a user and opens their portfolio with the starting funds.
pub fn create_player(pool: &Arc<DbPool>, username: &str) -> Portfolio {
    let user_service = UserService::new(pool.clone());
    let user = user_service
        .create_user(NewUser {
            email: format!("{}@example.com", username),
            username: username.to_string(),
            password_hash: "pbkdf2-test-hash".to_string(),
        })
        .expect("Failed to create user");

    PortfolioService::new(pool.clone())
        .create_portfolio(&user.id)
        .expect("Failed to create portfolio")
}
