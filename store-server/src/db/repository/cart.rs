//! Cart Repository
//!
//! Carts are keyed by an opaque session id. Every mutation bumps the
//! document revision; coupon application additionally uses the revision
//! as a compare-and-set guard so a stale read cannot overwrite a cart
//! that changed since the caller looked at it.

use super::{BaseRepository, RepoError, RepoResult};
use serde::{Deserialize, Serialize};
use shared::cart::{Cart, LineItem};
use shared::models::serde_helpers;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "cart";

/// Persisted cart document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSession {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Opaque session key chosen by the client (UUID)
    pub session: String,
    pub items: Vec<LineItem>,
    /// Coupon code remembered across requests, re-validated on read
    pub coupon_code: Option<String>,
    /// Bumped on every mutation; CAS guard for coupon application
    pub revision: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl CartSession {
    /// View the stored items as a cart for pricing
    pub fn cart(&self) -> Cart {
        Cart {
            items: self.items.clone(),
        }
    }
}

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_session(&self, session: &str) -> RepoResult<Option<CartSession>> {
        let session = session.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM cart WHERE session = $session_key LIMIT 1")
            .bind(("session_key", session))
            .await?;
        let carts: Vec<CartSession> = result.take(0)?;
        Ok(carts.into_iter().next())
    }

    /// Find the cart for a session, creating an empty one if needed
    pub async fn find_or_create(&self, session: &str) -> RepoResult<CartSession> {
        if let Some(existing) = self.find_by_session(session).await? {
            return Ok(existing);
        }

        let now = chrono::Utc::now().timestamp_millis();
        let cart = CartSession {
            id: None,
            session: session.to_string(),
            items: Vec::new(),
            coupon_code: None,
            revision: 0,
            created_at: now,
            updated_at: now,
        };

        let created: Option<CartSession> = self.base.db().create(TABLE).content(cart).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create cart".to_string()))
    }

    /// Replace the cart's items, bumping the revision
    pub async fn save_items(&self, session: &str, items: Vec<LineItem>) -> RepoResult<CartSession> {
        let session_owned = session.to_string();
        let now = chrono::Utc::now().timestamp_millis();
        let updated: Vec<CartSession> = self
            .base
            .db()
            .query(
                "UPDATE cart SET items = $items, revision += 1, updated_at = $now \
                 WHERE session = $session_key RETURN AFTER",
            )
            .bind(("items", items))
            .bind(("now", now))
            .bind(("session_key", session_owned))
            .await?
            .take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Cart {} not found", session)))
    }

    /// Attach a coupon code, guarded by the expected revision
    ///
    /// Returns `Conflict` when the cart changed since `expected_revision`
    /// was read; the caller should reload and retry.
    pub async fn set_coupon(
        &self,
        session: &str,
        code: &str,
        expected_revision: i64,
    ) -> RepoResult<CartSession> {
        let session_owned = session.to_string();
        let code_owned = code.to_string();
        let now = chrono::Utc::now().timestamp_millis();
        let updated: Vec<CartSession> = self
            .base
            .db()
            .query(
                "UPDATE cart SET coupon_code = $code, revision += 1, updated_at = $now \
                 WHERE session = $session_key AND revision = $revision RETURN AFTER",
            )
            .bind(("code", code_owned))
            .bind(("now", now))
            .bind(("session_key", session_owned))
            .bind(("revision", expected_revision))
            .await?
            .take(0)?;

        match updated.into_iter().next() {
            Some(cart) => Ok(cart),
            None => {
                // Distinguish a missing cart from a revision miss
                if self.find_by_session(session).await?.is_some() {
                    Err(RepoError::Conflict(format!(
                        "Cart {} changed since revision {}",
                        session, expected_revision
                    )))
                } else {
                    Err(RepoError::NotFound(format!("Cart {} not found", session)))
                }
            }
        }
    }

    /// Remove the stored coupon code
    pub async fn clear_coupon(&self, session: &str) -> RepoResult<CartSession> {
        let session_owned = session.to_string();
        let now = chrono::Utc::now().timestamp_millis();
        let updated: Vec<CartSession> = self
            .base
            .db()
            .query(
                "UPDATE cart SET coupon_code = NONE, revision += 1, updated_at = $now \
                 WHERE session = $session_key RETURN AFTER",
            )
            .bind(("now", now))
            .bind(("session_key", session_owned))
            .await?
            .take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Cart {} not found", session)))
    }

    /// Empty the cart and drop the coupon (after checkout)
    pub async fn clear(&self, session: &str) -> RepoResult<CartSession> {
        let session_owned = session.to_string();
        let now = chrono::Utc::now().timestamp_millis();
        let updated: Vec<CartSession> = self
            .base
            .db()
            .query(
                "UPDATE cart SET items = [], coupon_code = NONE, revision += 1, \
                 updated_at = $now WHERE session = $session_key RETURN AFTER",
            )
            .bind(("now", now))
            .bind(("session_key", session_owned))
            .await?
            .take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Cart {} not found", session)))
    }

    /// Hard delete a cart document
    pub async fn delete(&self, session: &str) -> RepoResult<bool> {
        let session_owned = session.to_string();
        let deleted: Vec<CartSession> = self
            .base
            .db()
            .query("DELETE cart WHERE session = $session_key RETURN BEFORE")
            .bind(("session_key", session_owned))
            .await?
            .take(0)?;
        Ok(!deleted.is_empty())
    }
}
