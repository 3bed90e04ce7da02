//! Order Repository

use super::{BaseRepository, RepoError, RepoResult, record_id};
use shared::models::{Order, OrderStatus};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All orders, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let rid = record_id(TABLE, id);
        let order: Option<Order> = self.base.db().select(rid).await?;
        Ok(order)
    }

    /// Persist a new order
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        if order.items.is_empty() {
            return Err(RepoError::Validation("Order has no items".into()));
        }
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Move an order to a new status
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> RepoResult<Order> {
        let rid = record_id(TABLE, id);
        let updated: Vec<Order> = self
            .base
            .db()
            .query("UPDATE $rid SET status = $status RETURN AFTER")
            .bind(("rid", rid))
            .bind(("status", status))
            .await?
            .take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Record that the notification message was sent for this order
    pub async fn mark_notified(&self, id: &str) -> RepoResult<Order> {
        let rid = record_id(TABLE, id);
        let updated: Vec<Order> = self
            .base
            .db()
            .query("UPDATE $rid SET whatsapp_sent = true RETURN AFTER")
            .bind(("rid", rid))
            .await?
            .take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }
}
