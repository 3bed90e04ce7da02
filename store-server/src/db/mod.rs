//! Database Module
//!
//! Embedded SurrealDB storage and repositories.

pub mod repository;

use shared::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) a RocksDB-backed database at the given path
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        let service = Self { db };
        service.select_namespace().await?;
        service.define_schema().await?;

        tracing::info!("Database opened at {}", db_path);
        Ok(service)
    }

    /// Open an in-memory database, used by integration tests
    pub async fn new_memory() -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open memory database: {e}")))?;

        let service = Self { db };
        service.select_namespace().await?;
        service.define_schema().await?;
        Ok(service)
    }

    async fn select_namespace(&self) -> Result<(), AppError> {
        self.db
            .use_ns("store")
            .use_db("store")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))
    }

    /// Define indexes. Idempotent, runs on every startup.
    async fn define_schema(&self) -> Result<(), AppError> {
        self.db
            .query("DEFINE INDEX IF NOT EXISTS coupon_code ON coupon FIELDS code UNIQUE")
            .query("DEFINE INDEX IF NOT EXISTS cart_session ON cart FIELDS session UNIQUE")
            .query("DEFINE INDEX IF NOT EXISTS order_created_at ON order FIELDS created_at")
            .await
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
        Ok(())
    }
}
