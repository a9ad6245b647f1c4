#![allow(dead_code)]

use actix_web::web;
use anyhow::Result;
use fake::Fake;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::CellNumber;
use serde::de::DeserializeOwned;
use sqlx::SqlitePool;
use std::env;
use tempfile::TempDir;

use worksite::database::init_database;
use worksite::database::models::{CreateUserInput, CreateWorkerInput, Worker};
use worksite::handlers::shared::ApiResponse;
use worksite::{AppData, AuthService, Config, UserRepository, WorkerRepository};

// Test database wrapper
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let database_url = format!("sqlite:{}/test.db", temp_dir.path().display());
        let pool = init_database(&database_url).await?;

        Ok(TestDb {
            pool,
            _temp_dir: temp_dir,
        })
    }
}

/// A logged-in account and its bearer token.
pub struct TestUser {
    pub id: String,
    pub token: String,
}

pub struct TestContext {
    pub db: TestDb,
    pub config: Config,
    pub app_data: AppData,
    pub auth_service: AuthService,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        let db = TestDb::new().await?;
        let config = Config::test_config();
        let app_data = AppData::new(db.pool.clone(), config.clone());
        let auth_service = AuthService::new(UserRepository::new(db.pool.clone()), config.clone());

        Ok(TestContext {
            db,
            config,
            app_data,
            auth_service,
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    /// Use as `App::new().configure(|cfg| ctx.configure(cfg))`.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        self.app_data.configure(cfg);
    }

    pub async fn register(&self, email: &str) -> Result<TestUser> {
        let response = self
            .auth_service
            .register(CreateUserInput {
                email: email.to_string(),
                password: "password123".to_string(),
                name: "Test Owner".to_string(),
                company_name: None,
            })
            .await?;

        Ok(TestUser {
            id: response.user.id,
            token: response.access_token,
        })
    }

    /// Demotes the account to viewer and returns a token carrying the new role.
    pub async fn make_viewer(&self, user: &TestUser) -> Result<TestUser> {
        sqlx::query("UPDATE users SET role = 'viewer' WHERE id = ?")
            .bind(&user.id)
            .execute(self.pool())
            .await?;

        let stored = UserRepository::new(self.pool().clone())
            .find_by_id(&user.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("user {} vanished", user.id))?;

        Ok(TestUser {
            id: stored.id.clone(),
            token: self.auth_service.generate_token(&stored)?,
        })
    }

    pub async fn create_worker(&self, user: &TestUser, input: CreateWorkerInput) -> Result<Worker> {
        WorkerRepository::new(self.pool().clone())
            .create_worker(&user.id, input)
            .await
    }

    pub async fn create_named_worker(&self, user: &TestUser, name: &str) -> Result<Worker> {
        self.create_worker(
            user,
            CreateWorkerInput {
                name: name.to_string(),
                ..CreateWorkerInput::default()
            },
        )
        .await
    }
}

/// A worker with a random name, phone and rate.
pub fn fake_worker() -> CreateWorkerInput {
    CreateWorkerInput {
        name: Name().fake(),
        phone: Some(CellNumber().fake()),
        role: Some("Labourer".to_string()),
        daily_rate: Some(f64::from((400..800).fake::<u32>())),
        ..CreateWorkerInput::default()
    }
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// Unwraps the `{success, data, message}` envelope of a 2xx body.
pub fn assert_success<T: DeserializeOwned>(body: &[u8]) -> T {
    let response: ApiResponse<T> =
        serde_json::from_slice(body).expect("Failed to parse JSON response");

    assert!(
        response.success,
        "Expected successful response but got error: {:?}",
        response.message
    );
    response.data.expect("Expected data in successful response")
}

/// Returns the message of an error envelope.
pub fn assert_error(body: &[u8]) -> String {
    let response: ApiResponse<serde_json::Value> =
        serde_json::from_slice(body).expect("Failed to parse JSON response");

    assert!(!response.success, "Expected an error response");
    response.message.unwrap_or_default()
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    let query = format!("SELECT COUNT(*) FROM {}", table);
    sqlx::query_scalar::<_, i64>(&query)
        .fetch_one(pool)
        .await
        .expect("Failed to count records")
}

pub fn setup_test_env() {
    unsafe {
        env::set_var("RUST_LOG", "debug");
    }
    let _ = env_logger::builder().is_test(true).try_init();
}
