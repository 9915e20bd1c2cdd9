use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use sqlx::SqlitePool;
use tempfile::TempDir;
use uuid::Uuid;

use klinika_payroll::Config;
use klinika_payroll::database::init_database;
use klinika_payroll::database::models::{CalculationType, WorkScheduleInput};
use klinika_payroll::services::{AuthService, Role};

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

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test-jwt-secret-key-that-is-long-enough".to_string(),
        jwt_expiration_days: 1,
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
    }
}

// Shared test fixture: database, config and a token mint
pub struct TestContext {
    pub db: TestDb,
    pub config: Config,
    pub auth_service: AuthService,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        let db = TestDb::new().await?;
        let config = test_config();
        let auth_service = AuthService::new(config.clone());

        Ok(TestContext {
            db,
            config,
            auth_service,
        })
    }

    pub fn pool(&self) -> SqlitePool {
        self.db.pool.clone()
    }

    #[allow(dead_code)]
    pub fn token(&self, staff_id: Uuid, role: Role) -> String {
        self.auth_service
            .generate_token(staff_id, role)
            .expect("token generation should not fail")
    }
}

/// The everyday schedule used across tests: 2,500,000 so'm,
/// 09:00-18:00, 208 hours a month.
#[allow(dead_code)]
pub fn standard_schedule(staff_id: Uuid, effective_from: NaiveDate) -> WorkScheduleInput {
    WorkScheduleInput {
        staff_id,
        base_salary: 2_500_000,
        work_start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        work_end_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        work_days_per_week: 6,
        work_hours_per_month: 208,
        calculation_type: CalculationType::Fixed,
        effective_from,
    }
}
