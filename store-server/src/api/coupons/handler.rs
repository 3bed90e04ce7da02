//! Coupon API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{AppError, AppResult};
use shared::models::{Coupon, CouponCreate, CouponUpdate};

use crate::core::ServerState;
use crate::db::repository::CouponRepository;

const RESOURCE: &str = "coupon";

/// GET /api/coupons - all coupons, newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Coupon>>> {
    let repo = CouponRepository::new(state.get_db());
    let coupons = repo.find_all().await?;
    Ok(Json(coupons))
}

/// GET /api/coupons/:id - single coupon
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Coupon>> {
    let repo = CouponRepository::new(state.get_db());
    let coupon = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Coupon {} not found", id)))?;
    Ok(Json(coupon))
}

/// GET /api/coupons/by-code/:code - lookup by (canonicalized) code
pub async fn get_by_code(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> AppResult<Json<Coupon>> {
    let repo = CouponRepository::new(state.get_db());
    let coupon = repo
        .find_by_code(&code)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Coupon '{}' not found", code)))?;
    Ok(Json(coupon))
}

/// POST /api/coupons - create a coupon
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CouponCreate>,
) -> AppResult<Json<Coupon>> {
    let repo = CouponRepository::new(state.get_db());
    let coupon = repo.create(payload).await?;
    state.bump_version(RESOURCE);
    Ok(Json(coupon))
}

/// PUT /api/coupons/:id - partial update
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CouponUpdate>,
) -> AppResult<Json<Coupon>> {
    let repo = CouponRepository::new(state.get_db());
    let coupon = repo.update(&id, payload).await?;
    state.bump_version(RESOURCE);
    Ok(Json(coupon))
}

/// DELETE /api/coupons/:id - hard delete
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = CouponRepository::new(state.get_db());
    let deleted = repo.delete(&id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Coupon {} not found", id)));
    }
    state.bump_version(RESOURCE);
    Ok(Json(true))
}
