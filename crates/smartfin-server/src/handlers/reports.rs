//! Report and dashboard handlers
//!
//! Every report runs over the combined ledger view (transactions plus
//! expense entities) so the two collections can never disagree.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState, MAX_PROJECTION_MONTHS, MAX_TREND_MONTHS};
use smartfin_core::analytics::{
    group_by_category, monthly_trend, project_cashflow, summarize, CashflowProjection,
    CategoryBreakdown, FinancialSummary, MonthlyTrendPoint, DEFAULT_PROJECTION_MONTHS,
    DEFAULT_TREND_MONTHS,
};
use smartfin_core::models::User;

/// Window parameter shared by the trend and projection reports.
#[derive(Debug, Deserialize)]
pub struct MonthsQuery {
    pub months: Option<usize>,
}

fn validated_months(
    requested: Option<usize>,
    default: usize,
    max: usize,
) -> Result<usize, AppError> {
    let months = requested.unwrap_or(default);
    if months == 0 || months > max {
        return Err(AppError::bad_request(&format!(
            "months must be between 1 and {}",
            max
        )));
    }
    Ok(months)
}

/// GET /api/reports/summary - Income/expense totals
pub async fn report_summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<FinancialSummary>, AppError> {
    let records = state.db.ledger_records(user.id)?;
    Ok(Json(summarize(&records)))
}

#[derive(Serialize)]
pub struct TrendResponse {
    pub months: usize,
    pub trend: Vec<MonthlyTrendPoint>,
}

/// GET /api/reports/trends - Monthly income/expense trend
pub async fn report_trends(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Query(params): Query<MonthsQuery>,
) -> Result<Json<TrendResponse>, AppError> {
    let months = validated_months(params.months, DEFAULT_TREND_MONTHS, MAX_TREND_MONTHS)?;
    let records = state.db.ledger_records(user.id)?;
    let trend = monthly_trend(&records, months, Utc::now());
    Ok(Json(TrendResponse { months, trend }))
}

/// GET /api/reports/categories - Per-category totals with records
pub async fn report_categories(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<CategoryBreakdown>, AppError> {
    let records = state.db.ledger_records(user.id)?;
    Ok(Json(group_by_category(&records)))
}

/// GET /api/reports/projection - Flat-average cashflow projection
pub async fn report_projection(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Query(params): Query<MonthsQuery>,
) -> Result<Json<CashflowProjection>, AppError> {
    let months = validated_months(
        params.months,
        DEFAULT_PROJECTION_MONTHS,
        MAX_PROJECTION_MONTHS,
    )?;
    let records = state.db.ledger_records(user.id)?;
    Ok(Json(project_cashflow(&records, months, Utc::now())))
}

#[derive(Serialize)]
pub struct DashboardCounts {
    pub transactions: i64,
    pub expenses: i64,
    pub products: i64,
    pub contacts: i64,
}

/// One category's share of the dashboard top-list.
#[derive(Serialize)]
pub struct TopCategory {
    pub category: String,
    pub total: String,
    pub count: usize,
}

#[derive(Serialize)]
pub struct DashboardResponse {
    pub summary: FinancialSummary,
    /// Trend for the current window, oldest month first.
    pub trend: Vec<MonthlyTrendPoint>,
    pub top_categories: Vec<TopCategory>,
    pub counts: DashboardCounts,
}

/// How many categories the dashboard shows.
const TOP_CATEGORY_LIMIT: usize = 5;

/// GET /api/dashboard - Everything the landing page needs in one call
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<DashboardResponse>, AppError> {
    let records = state.db.ledger_records(user.id)?;

    let summary = summarize(&records);
    let trend = monthly_trend(&records, DEFAULT_TREND_MONTHS, Utc::now());

    let mut top_categories: Vec<TopCategory> = group_by_category(&records)
        .into_iter()
        .map(|(category, group)| TopCategory {
            category,
            total: group.total,
            count: group.count,
        })
        .collect();
    // largest absolute total first; per-label order from the map breaks ties
    top_categories.sort_by(|a, b| {
        let a_total = a.total.parse::<f64>().unwrap_or(0.0).abs();
        let b_total = b.total.parse::<f64>().unwrap_or(0.0).abs();
        b_total
            .partial_cmp(&a_total)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    top_categories.truncate(TOP_CATEGORY_LIMIT);

    let counts = DashboardCounts {
        transactions: state.db.count_transactions(user.id)?,
        expenses: state.db.count_expenses(user.id)?,
        products: state.db.count_products(user.id)?,
        contacts: state.db.count_contacts(user.id)?,
    };

    Ok(Json(DashboardResponse {
        summary,
        trend,
        top_categories,
        counts,
    }))
}
