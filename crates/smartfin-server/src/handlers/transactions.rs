//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState, SuccessResponse, MAX_PAGE_LIMIT};
use smartfin_core::ledger::{parse_amount, parse_date, RawAmount, RawDate, TransactionKind};
use smartfin_core::models::{NewTransaction, Transaction, User};

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    /// Filter by kind ("income" or "expense")
    #[serde(rename = "type")]
    pub kind: Option<TransactionKind>,
    /// Filter by exact category label
    pub category: Option<String>,
}

fn default_limit() -> i64 {
    50
}

#[derive(Serialize)]
pub struct TransactionResponse {
    pub transactions: Vec<Transaction>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Incoming transaction payload. Amounts arrive as JSON numbers or strings
/// and dates as RFC 3339, bare dates or Unix milliseconds; both are
/// normalized here, with a 400 for values that parse to nothing.
#[derive(Debug, Deserialize)]
pub struct TransactionPayload {
    pub description: Option<String>,
    pub amount: RawAmount,
    #[serde(rename = "type")]
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub date: Option<RawDate>,
}

impl TransactionPayload {
    pub(crate) fn into_new_transaction(self) -> Result<NewTransaction, AppError> {
        let amount = parse_amount(&self.amount)
            .ok_or_else(|| AppError::bad_request("Amount is not a valid number"))?;
        let date = match &self.date {
            Some(raw) => {
                parse_date(raw).ok_or_else(|| AppError::bad_request("Date is not parseable"))?
            }
            None => chrono::Utc::now(),
        };
        Ok(NewTransaction {
            description: self.description,
            amount,
            kind: self.kind,
            category: self.category,
            date,
        })
    }
}

/// GET /api/transactions - List transactions
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Query(params): Query<TransactionQuery>,
) -> Result<Json<TransactionResponse>, AppError> {
    // Input validation: clamp pagination parameters
    let limit = params.limit.max(1).min(MAX_PAGE_LIMIT);
    let offset = params.offset.max(0);

    let transactions = state.db.list_transactions(
        user.id,
        params.kind,
        params.category.as_deref(),
        limit,
        offset,
    )?;
    let total = state.db.count_transactions(user.id)?;

    Ok(Json(TransactionResponse {
        transactions,
        total,
        limit,
        offset,
    }))
}

/// POST /api/transactions - Create a transaction
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(payload): Json<TransactionPayload>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let new_tx = payload.into_new_transaction()?;
    let tx = state.db.insert_transaction(user.id, &new_tx)?;
    Ok((StatusCode::CREATED, Json(tx)))
}

/// GET /api/transactions/export - CSV download
pub async fn export_transactions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse, AppError> {
    let csv = state.db.export_transactions_csv(user.id)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"transactions.csv\"",
            ),
        ],
        csv,
    ))
}

/// GET /api/transactions/:id - Fetch one transaction
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<Json<Transaction>, AppError> {
    let tx = state
        .db
        .get_transaction(user.id, id)?
        .ok_or_else(|| AppError::not_found("Transaction not found"))?;
    Ok(Json(tx))
}

/// PUT /api/transactions/:id - Update a transaction
pub async fn update_transaction(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
    Json(payload): Json<TransactionPayload>,
) -> Result<Json<Transaction>, AppError> {
    let new_tx = payload.into_new_transaction()?;
    if !state.db.update_transaction(user.id, id, &new_tx)? {
        return Err(AppError::not_found("Transaction not found"));
    }
    let tx = state
        .db
        .get_transaction(user.id, id)?
        .ok_or_else(|| AppError::not_found("Transaction not found"))?;
    Ok(Json(tx))
}

/// DELETE /api/transactions/:id - Delete a transaction
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_transaction(user.id, id)? {
        return Err(AppError::not_found("Transaction not found"));
    }
    Ok(Json(SuccessResponse { success: true }))
}
