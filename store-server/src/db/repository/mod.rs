//! Repository Module
//!
//! CRUD operations over the embedded SurrealDB tables.

// Catalog
pub mod product;

// Discounts
pub mod coupon;

// Shopping
pub mod cart;
pub mod order;

// Re-exports
pub use cart::{CartRepository, CartSession};
pub use coupon::CouponRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;

use shared::{AppError, ErrorCode};
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::not_found(msg),
            RepoError::Duplicate(msg) => AppError::already_exists(msg),
            RepoError::Conflict(msg) => AppError::with_message(ErrorCode::CartConflict, msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: "table:id" strings end to end
// =============================================================================
//
// surrealdb::RecordId handles all IDs:
//   - parse: let id: RecordId = "product:abc".parse()?;
//   - build: let id = RecordId::from_table_key("product", "abc");
//   - table name: id.table()
//   - bare key:  id.key().to_string()
//   - CRUD: db.select(id) / db.delete(id) take RecordId directly

/// Resolve a client-supplied id ("table:key" or bare key) to a RecordId
pub(crate) fn record_id(table: &str, id: &str) -> RecordId {
    match id.parse::<RecordId>() {
        Ok(rid) if rid.table() == table => rid,
        _ => RecordId::from_table_key(table, id),
    }
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
