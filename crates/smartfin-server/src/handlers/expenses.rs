//! Expense handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState, SuccessResponse, MAX_PAGE_LIMIT};
use smartfin_core::ledger::{parse_amount, parse_date, RawAmount, RawDate};
use smartfin_core::models::{Expense, NewExpense, User};

/// Query parameters for listing expenses
#[derive(Debug, Deserialize)]
pub struct ExpenseQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    pub category: Option<String>,
}

fn default_limit() -> i64 {
    50
}

#[derive(Serialize)]
pub struct ExpenseResponse {
    pub expenses: Vec<Expense>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Incoming expense payload, tolerant of the same wire shapes as
/// transactions. Expenses carry no kind; the collection marks them as
/// money out.
#[derive(Debug, Deserialize)]
pub struct ExpensePayload {
    pub description: Option<String>,
    pub amount: RawAmount,
    pub category: Option<String>,
    pub date: Option<RawDate>,
}

impl ExpensePayload {
    fn into_new_expense(self) -> Result<NewExpense, AppError> {
        let amount = parse_amount(&self.amount)
            .ok_or_else(|| AppError::bad_request("Amount is not a valid number"))?;
        let date = match &self.date {
            Some(raw) => {
                parse_date(raw).ok_or_else(|| AppError::bad_request("Date is not parseable"))?
            }
            None => chrono::Utc::now(),
        };
        Ok(NewExpense {
            description: self.description,
            amount,
            category: self.category,
            date,
        })
    }
}

/// GET /api/expenses - List expenses
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Query(params): Query<ExpenseQuery>,
) -> Result<Json<ExpenseResponse>, AppError> {
    let limit = params.limit.max(1).min(MAX_PAGE_LIMIT);
    let offset = params.offset.max(0);

    let expenses = state
        .db
        .list_expenses(user.id, params.category.as_deref(), limit, offset)?;
    let total = state.db.count_expenses(user.id)?;

    Ok(Json(ExpenseResponse {
        expenses,
        total,
        limit,
        offset,
    }))
}

/// POST /api/expenses - Create an expense
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(payload): Json<ExpensePayload>,
) -> Result<(StatusCode, Json<Expense>), AppError> {
    let new_expense = payload.into_new_expense()?;
    let expense = state.db.insert_expense(user.id, &new_expense)?;
    Ok((StatusCode::CREATED, Json(expense)))
}

/// GET /api/expenses/:id - Fetch one expense
pub async fn get_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<Json<Expense>, AppError> {
    let expense = state
        .db
        .get_expense(user.id, id)?
        .ok_or_else(|| AppError::not_found("Expense not found"))?;
    Ok(Json(expense))
}

/// PUT /api/expenses/:id - Update an expense
pub async fn update_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
    Json(payload): Json<ExpensePayload>,
) -> Result<Json<Expense>, AppError> {
    let new_expense = payload.into_new_expense()?;
    if !state.db.update_expense(user.id, id, &new_expense)? {
        return Err(AppError::not_found("Expense not found"));
    }
    let expense = state
        .db
        .get_expense(user.id, id)?
        .ok_or_else(|| AppError::not_found("Expense not found"))?;
    Ok(Json(expense))
}

/// DELETE /api/expenses/:id - Delete an expense
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_expense(user.id, id)? {
        return Err(AppError::not_found("Expense not found"));
    }
    Ok(Json(SuccessResponse { success: true }))
}
