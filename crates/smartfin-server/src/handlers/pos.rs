//! Point-of-sale handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use tracing::info;

use crate::{AppError, AppState};
use smartfin_core::models::{NewSale, Sale, SaleItem, User};

/// A completed checkout with its line items.
#[derive(Serialize)]
pub struct SaleResponse {
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

#[derive(Serialize)]
pub struct SalesListResponse {
    pub sales: Vec<Sale>,
    pub total: i64,
}

/// POST /api/pos/checkout - Record a sale
///
/// Validates stock, decrements it, writes the sale and the matching income
/// transaction atomically. Insufficient stock is a 409 and leaves nothing
/// behind.
pub async fn checkout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(payload): Json<NewSale>,
) -> Result<(StatusCode, Json<SaleResponse>), AppError> {
    let (sale, items) = state.db.record_sale(user.id, &payload)?;
    info!(user = %user.email, reference = %sale.reference, total = sale.total, "Sale recorded");
    Ok((StatusCode::CREATED, Json(SaleResponse { sale, items })))
}

/// GET /api/sales - List past sales, newest first
pub async fn list_sales(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<SalesListResponse>, AppError> {
    let sales = state.db.list_sales(user.id)?;
    let total = sales.len() as i64;
    Ok(Json(SalesListResponse { sales, total }))
}

/// GET /api/sales/:id - Fetch one sale with its line items
pub async fn get_sale(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<Json<SaleResponse>, AppError> {
    let (sale, items) = state
        .db
        .get_sale(user.id, id)?
        .ok_or_else(|| AppError::not_found("Sale not found"))?;
    Ok(Json(SaleResponse { sale, items }))
}
