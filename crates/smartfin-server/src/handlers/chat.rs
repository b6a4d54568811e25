//! Business assistant handlers

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{AppError, AppState};
use smartfin_core::ai::{business_context, ChatBackend, ChatMessage};
use smartfin_core::analytics::summarize;
use smartfin_core::models::User;

/// Recent transactions handed to the prompt builder.
const CONTEXT_TRANSACTIONS: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub model: String,
}

#[derive(Serialize)]
pub struct ChatHealthResponse {
    pub configured: bool,
    pub available: bool,
    pub model: Option<String>,
}

/// POST /api/chat - Ask the assistant a question
///
/// The prompt carries the user's current numbers so answers are grounded in
/// their data. 503 when no backend is configured.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let Some(client) = &state.chat else {
        return Err(AppError::service_unavailable(
            "Chat backend not configured",
        ));
    };
    if payload.message.trim().is_empty() {
        return Err(AppError::bad_request("Message must not be empty"));
    }

    let records = state.db.ledger_records(user.id)?;
    let summary = summarize(&records);
    let recent = state
        .db
        .list_transactions(user.id, None, None, CONTEXT_TRANSACTIONS, 0)?;
    let product_count = state.db.count_products(user.id)?;

    let system = business_context(
        user.business_name.as_deref(),
        &summary,
        &recent,
        product_count,
    );
    let messages = [
        ChatMessage::system(system),
        ChatMessage::user(payload.message),
    ];

    let reply = client.chat(&messages).await.map_err(|e| {
        error!(error = %e, "Chat backend request failed");
        AppError::service_unavailable("Chat backend unavailable")
    })?;

    Ok(Json(ChatResponse {
        reply,
        model: client.model().to_string(),
    }))
}

/// GET /api/chat/health - Assistant availability probe
pub async fn chat_health(State(state): State<Arc<AppState>>) -> Json<ChatHealthResponse> {
    match &state.chat {
        Some(client) => Json(ChatHealthResponse {
            configured: true,
            available: client.health_check().await,
            model: Some(client.model().to_string()),
        }),
        None => Json(ChatHealthResponse {
            configured: false,
            available: false,
            model: None,
        }),
    }
}
