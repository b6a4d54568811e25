//! Product catalog handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;

use crate::{AppError, AppState, SuccessResponse};
use smartfin_core::models::{NewProduct, Product, User};

#[derive(Serialize)]
pub struct ProductResponse {
    pub products: Vec<Product>,
    pub total: i64,
}

/// GET /api/products - List the catalog
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<ProductResponse>, AppError> {
    let products = state.db.list_products(user.id)?;
    let total = products.len() as i64;
    Ok(Json(ProductResponse { products, total }))
}

/// POST /api/products - Add a product
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(payload): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = state.db.insert_product(user.id, &payload)?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /api/products/:id - Fetch one product
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, AppError> {
    let product = state
        .db
        .get_product(user.id, id)?
        .ok_or_else(|| AppError::not_found("Product not found"))?;
    Ok(Json(product))
}

/// PUT /api/products/:id - Update a product
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
    Json(payload): Json<NewProduct>,
) -> Result<Json<Product>, AppError> {
    if !state.db.update_product(user.id, id, &payload)? {
        return Err(AppError::not_found("Product not found"));
    }
    let product = state
        .db
        .get_product(user.id, id)?
        .ok_or_else(|| AppError::not_found("Product not found"))?;
    Ok(Json(product))
}

/// DELETE /api/products/:id - Remove a product
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_product(user.id, id)? {
        return Err(AppError::not_found("Product not found"));
    }
    Ok(Json(SuccessResponse { success: true }))
}
