//! Contact handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState, SuccessResponse};
use smartfin_core::models::{Contact, ContactKind, NewContact, User};

/// Query parameters for listing contacts
#[derive(Debug, Deserialize)]
pub struct ContactQuery {
    /// Filter by kind ("customer" or "supplier")
    pub kind: Option<ContactKind>,
}

#[derive(Serialize)]
pub struct ContactResponse {
    pub contacts: Vec<Contact>,
    pub total: i64,
}

/// GET /api/contacts - List contacts
pub async fn list_contacts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Query(params): Query<ContactQuery>,
) -> Result<Json<ContactResponse>, AppError> {
    let contacts = state.db.list_contacts(user.id, params.kind)?;
    let total = contacts.len() as i64;
    Ok(Json(ContactResponse { contacts, total }))
}

/// POST /api/contacts - Add a contact
pub async fn create_contact(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(payload): Json<NewContact>,
) -> Result<(StatusCode, Json<Contact>), AppError> {
    let contact = state.db.insert_contact(user.id, &payload)?;
    Ok((StatusCode::CREATED, Json(contact)))
}

/// GET /api/contacts/:id - Fetch one contact
pub async fn get_contact(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<Json<Contact>, AppError> {
    let contact = state
        .db
        .get_contact(user.id, id)?
        .ok_or_else(|| AppError::not_found("Contact not found"))?;
    Ok(Json(contact))
}

/// PUT /api/contacts/:id - Update a contact
pub async fn update_contact(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
    Json(payload): Json<NewContact>,
) -> Result<Json<Contact>, AppError> {
    if !state.db.update_contact(user.id, id, &payload)? {
        return Err(AppError::not_found("Contact not found"));
    }
    let contact = state
        .db
        .get_contact(user.id, id)?
        .ok_or_else(|| AppError::not_found("Contact not found"))?;
    Ok(Json(contact))
}

/// DELETE /api/contacts/:id - Remove a contact
pub async fn delete_contact(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_contact(user.id, id)? {
        return Err(AppError::not_found("Contact not found"));
    }
    Ok(Json(SuccessResponse { success: true }))
}
