//! Product Repository

use super::{BaseRepository, RepoError, RepoResult, record_id};
use shared::models::{Product, ProductCreate, ProductFilter, ProductUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all products visible to the storefront, newest first
    pub async fn find_active(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE is_active = true ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find every product, including hidden ones (admin listing)
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Search active products by text, category and price range
    pub async fn search(&self, filter: ProductFilter) -> RepoResult<Vec<Product>> {
        let mut sql = String::from("SELECT * FROM product WHERE is_active = true");
        if filter.q.is_some() {
            sql.push_str(
                " AND (string::contains(string::lowercase(name), $q) \
                 OR string::contains(string::lowercase(description), $q))",
            );
        }
        if filter.category.is_some() {
            sql.push_str(" AND category = $category");
        }
        if filter.min_price.is_some() {
            sql.push_str(" AND price >= $min_price");
        }
        if filter.max_price.is_some() {
            sql.push_str(" AND price <= $max_price");
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = self.base.db().query(sql);
        if let Some(q) = filter.q {
            query = query.bind(("q", q.to_lowercase()));
        }
        if let Some(category) = filter.category {
            query = query.bind(("category", category));
        }
        if let Some(min_price) = filter.min_price {
            query = query.bind(("min_price", min_price));
        }
        if let Some(max_price) = filter.max_price {
            query = query.bind(("max_price", max_price));
        }

        let products: Vec<Product> = query.await?.take(0)?;
        Ok(products)
    }

    /// Distinct categories among active products
    pub async fn distinct_categories(&self) -> RepoResult<Vec<String>> {
        let categories: Vec<String> = self
            .base
            .db()
            .query("SELECT VALUE category FROM product WHERE is_active = true AND category != NONE")
            .await?
            .take(0)?;

        let mut unique: Vec<String> = Vec::new();
        for category in categories {
            if !unique.contains(&category) {
                unique.push(category);
            }
        }
        unique.sort();
        Ok(unique)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let rid = record_id(TABLE, id);
        let product: Option<Product> = self.base.db().select(rid).await?;
        Ok(product)
    }

    /// Create a new product
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        if data.name.trim().is_empty() {
            return Err(RepoError::Validation("Product name is required".into()));
        }
        if !data.price.is_finite() || data.price < 0.0 {
            return Err(RepoError::Validation(format!(
                "Invalid product price: {}",
                data.price
            )));
        }
        let stock = data.stock.unwrap_or(0);
        if stock < 0 {
            return Err(RepoError::Validation(format!(
                "Invalid product stock: {}",
                stock
            )));
        }

        let product = Product {
            id: None,
            name: data.name,
            description: data.description,
            image: data.image,
            category: data.category,
            price: data.price,
            original_price: data.original_price,
            discount_percent: data.discount_percent,
            rating: data.rating,
            review_count: data.review_count,
            stock,
            colors: data.colors.unwrap_or_default(),
            sizes: data.sizes.unwrap_or_default(),
            is_active: true,
            created_at: Some(chrono::Utc::now().timestamp_millis()),
        };

        let created: Option<Product> = self.base.db().create(TABLE).content(product).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product (partial merge)
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        if let Some(price) = data.price
            && (!price.is_finite() || price < 0.0)
        {
            return Err(RepoError::Validation(format!(
                "Invalid product price: {}",
                price
            )));
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
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Set the stock level for a product
    pub async fn update_stock(&self, id: &str, stock: i32) -> RepoResult<Product> {
        if stock < 0 {
            return Err(RepoError::Validation(format!("Invalid stock: {}", stock)));
        }
        let rid = record_id(TABLE, id);
        let updated: Vec<Product> = self
            .base
            .db()
            .query("UPDATE $rid SET stock = $stock RETURN AFTER")
            .bind(("rid", rid))
            .bind(("stock", stock))
            .await?
            .take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Show or hide a product on the storefront
    pub async fn set_active(&self, id: &str, is_active: bool) -> RepoResult<Product> {
        let rid = record_id(TABLE, id);
        let updated: Vec<Product> = self
            .base
            .db()
            .query("UPDATE $rid SET is_active = $is_active RETURN AFTER")
            .bind(("rid", rid))
            .bind(("is_active", is_active))
            .await?
            .take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Hard delete a product
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = record_id(TABLE, id);
        let deleted: Option<Product> = self.base.db().delete(rid).await?;
        Ok(deleted.is_some())
    }
}
