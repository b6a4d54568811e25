//! Notification feed handler

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use chrono::Utc;
use serde::Serialize;

use crate::{AppError, AppState};
use smartfin_core::analytics::{group_by_category, monthly_trend, summarize, DEFAULT_TREND_MONTHS};
use smartfin_core::models::User;
use smartfin_core::notifications::{Notification, NotificationEngine, RuleContext};

#[derive(Serialize)]
pub struct NotificationResponse {
    pub notifications: Vec<Notification>,
}

/// GET /api/notifications - Recompute the feed for the current user
///
/// Nothing is stored; each request re-evaluates the rules against the
/// aggregates of the moment.
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<NotificationResponse>, AppError> {
    let records = state.db.ledger_records(user.id)?;
    let summary = summarize(&records);
    let trend = monthly_trend(&records, DEFAULT_TREND_MONTHS, Utc::now());
    let categories = group_by_category(&records);
    let profile = user.profile();

    let ctx = RuleContext::new(&summary, &trend, &categories, Utc::now())
        .with_counts(
            state.db.count_transactions(user.id)? as usize,
            state.db.count_expenses(user.id)? as usize,
        )
        .with_profile(&profile);

    let notifications = NotificationEngine::new().generate(&ctx);
    Ok(Json(NotificationResponse { notifications }))
}
