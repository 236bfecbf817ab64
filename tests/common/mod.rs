#![allow(dead_code)]

use std::env;
use std::time::Duration;

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::test;
use anyhow::Result;
use sqlx::SqlitePool;
use tempfile::TempDir;

use geolocationapi::database::init_database;
use geolocationapi::handlers::shared::ErrorResponse;
use geolocationapi::{AppState, Collections};

pub const LOCATIONS: &str = "/geolocationapi/location";
pub const MEMBERSHIPS: &str = "/geolocationapi/membership";
pub const COMMUNITIES: &str = "/geolocationapi/community";

/// Application state plus whatever backs it; the temp dir must outlive the
/// pool.
pub struct TestContext {
    pub state: AppState,
    pub pool: Option<SqlitePool>,
    pub database_url: Option<String>,
    _temp_dir: Option<TempDir>,
}

impl TestContext {
    pub fn in_memory() -> Self {
        setup_test_env();

        TestContext {
            state: AppState::new(Collections::in_memory()),
            pool: None,
            database_url: None,
            _temp_dir: None,
        }
    }

    pub async fn document() -> Result<Self> {
        setup_test_env();

        let temp_dir = TempDir::new()?;
        let database_url = format!("sqlite:{}/test.db", temp_dir.path().display());
        let pool = init_database(&database_url).await?;
        let collections = Collections::document(pool.clone(), Duration::from_secs(10)).await?;

        Ok(TestContext {
            state: AppState::new(collections),
            pool: Some(pool),
            database_url: Some(database_url),
            _temp_dir: Some(temp_dir),
        })
    }
}

pub fn item_uri(base: &str, id: &str) -> String {
    format!("{}/{}", base, id)
}

pub async fn read_error<B: MessageBody>(resp: ServiceResponse<B>) -> ErrorResponse {
    test::read_body_json(resp).await
}

pub fn setup_test_env() {
    unsafe {
        env::set_var("RUST_LOG", "debug");
    }
    let _ = env_logger::builder().is_test(true).try_init();
}
