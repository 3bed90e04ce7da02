//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::error::{AppError, AppResult};
use shared::models::{Product, ProductCreate, ProductFilter, ProductUpdate};

use crate::core::ServerState;
use crate::db::repository::ProductRepository;

const RESOURCE: &str = "product";

/// GET /api/products - active products, optionally filtered
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<ProductFilter>,
) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.get_db());
    let has_filter = filter.q.is_some()
        || filter.category.is_some()
        || filter.min_price.is_some()
        || filter.max_price.is_some();
    let products = if has_filter {
        repo.search(filter).await?
    } else {
        repo.find_active().await?
    };
    Ok(Json(products))
}

/// GET /api/products/all - every product, hidden ones included (admin)
pub async fn list_all(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.get_db());
    let products = repo.find_all().await?;
    Ok(Json(products))
}

/// GET /api/products/categories - distinct categories among active products
pub async fn categories(State(state): State<ServerState>) -> AppResult<Json<Vec<String>>> {
    let repo = ProductRepository::new(state.get_db());
    let categories = repo.distinct_categories().await?;
    Ok(Json(categories))
}

/// GET /api/products/:id - single product
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.get_db());
    let product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {} not found", id)))?;
    Ok(Json(product))
}

/// POST /api/products - create a product (admin)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.get_db());
    let product = repo.create(payload).await?;
    state.bump_version(RESOURCE);
    Ok(Json(product))
}

/// PUT /api/products/:id - partial update (admin)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.get_db());
    let product = repo.update(&id, payload).await?;
    state.bump_version(RESOURCE);
    Ok(Json(product))
}

/// Stock update body
#[derive(Debug, Deserialize)]
pub struct StockUpdate {
    pub stock: i32,
}

/// PATCH /api/products/:id/stock - set stock level (admin)
pub async fn update_stock(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<StockUpdate>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.get_db());
    let product = repo.update_stock(&id, payload.stock).await?;
    state.bump_version(RESOURCE);
    Ok(Json(product))
}

/// Visibility update body
#[derive(Debug, Deserialize)]
pub struct ActiveUpdate {
    pub is_active: bool,
}

/// PATCH /api/products/:id/active - show or hide on the storefront (admin)
pub async fn set_active(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ActiveUpdate>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.get_db());
    let product = repo.set_active(&id, payload.is_active).await?;
    state.bump_version(RESOURCE);
    Ok(Json(product))
}

/// DELETE /api/products/:id - hard delete (admin)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = ProductRepository::new(state.get_db());
    let deleted = repo.delete(&id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Product {} not found", id)));
    }
    state.bump_version(RESOURCE);
    Ok(Json(true))
}
