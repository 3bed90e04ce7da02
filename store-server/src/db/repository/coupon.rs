//! Coupon Repository

use super::{BaseRepository, RepoError, RepoResult, record_id};
use shared::models::{Coupon, CouponCreate, CouponKind, CouponUpdate, canonical_code};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "coupon";

#[derive(Clone)]
pub struct CouponRepository {
    base: BaseRepository,
}

impl CouponRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all coupons, newest first (admin listing)
    pub async fn find_all(&self) -> RepoResult<Vec<Coupon>> {
        let coupons: Vec<Coupon> = self
            .base
            .db()
            .query("SELECT * FROM coupon ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(coupons)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Coupon>> {
        let rid = record_id(TABLE, id);
        let coupon: Option<Coupon> = self.base.db().select(rid).await?;
        Ok(coupon)
    }

    /// Find a coupon by its canonical code
    ///
    /// Codes are stored canonicalized (trimmed, uppercase), so lookups
    /// canonicalize the input the same way.
    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<Coupon>> {
        let code = canonical_code(code);
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM coupon WHERE code = $code LIMIT 1")
            .bind(("code", code))
            .await?;
        let coupons: Vec<Coupon> = result.take(0)?;
        Ok(coupons.into_iter().next())
    }

    /// Create a new coupon
    pub async fn create(&self, data: CouponCreate) -> RepoResult<Coupon> {
        let code = canonical_code(&data.code);
        if code.is_empty() {
            return Err(RepoError::Validation("Coupon code is required".into()));
        }
        validate_value(data.kind, data.value)?;
        if data.min_order_amount.unwrap_or(0.0) < 0.0 {
            return Err(RepoError::Validation(
                "Minimum order amount cannot be negative".into(),
            ));
        }

        if self.find_by_code(&code).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Coupon '{}' already exists",
                code
            )));
        }

        let coupon = Coupon {
            id: None,
            code,
            kind: data.kind,
            value: data.value,
            expires_at: data.expires_at,
            min_order_amount: data.min_order_amount.unwrap_or(0.0),
            is_active: data.is_active.unwrap_or(true),
            created_at: Some(chrono::Utc::now().timestamp_millis()),
        };

        let created: Option<Coupon> = self.base.db().create(TABLE).content(coupon).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create coupon".to_string()))
    }

    /// Update a coupon (partial merge)
    pub async fn update(&self, id: &str, mut data: CouponUpdate) -> RepoResult<Coupon> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Coupon {} not found", id)))?;

        if let Some(ref new_code) = data.code {
            let code = canonical_code(new_code);
            if code.is_empty() {
                return Err(RepoError::Validation("Coupon code is required".into()));
            }
            if code != existing.code && self.find_by_code(&code).await?.is_some() {
                return Err(RepoError::Duplicate(format!(
                    "Coupon '{}' already exists",
                    code
                )));
            }
            data.code = Some(code);
        }
        if let Some(value) = data.value {
            validate_value(data.kind.unwrap_or(existing.kind), value)?;
        }
        if let Some(min) = data.min_order_amount
            && min < 0.0
        {
            return Err(RepoError::Validation(
                "Minimum order amount cannot be negative".into(),
            ));
        }

        let rid = record_id(TABLE, id);
        self.base
            .db()
            .query("UPDATE $rid MERGE $data")
            .bind(("rid", rid))
            .bind(("data", data))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Coupon {} not found", id)))
    }

    /// Hard delete a coupon
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = record_id(TABLE, id);
        let deleted: Option<Coupon> = self.base.db().delete(rid).await?;
        Ok(deleted.is_some())
    }
}

fn validate_value(kind: CouponKind, value: f64) -> RepoResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(RepoError::Validation(format!(
            "Invalid coupon value: {}",
            value
        )));
    }
    if kind == CouponKind::Percentage && value > 100.0 {
        return Err(RepoError::Validation(format!(
            "Percentage discount cannot exceed 100: {}",
            value
        )));
    }
    Ok(())
}
