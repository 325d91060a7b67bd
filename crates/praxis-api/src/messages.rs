//! Contact-message handlers.
//!
//! Submission is public and append-only: the messages collection is a log,
//! so every submission prepends regardless of id. Reading and status changes
//! are admin-only.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use praxis_core::{
  KeyValue,
  id::local_id,
  messages::{ContactMessage, MessageStatus},
};
use serde::Deserialize;

use crate::{AppState, auth::AdminSession, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ContactBody {
  pub name:    String,
  pub email:   String,
  #[serde(default)]
  pub subject: String,
  pub body:    String,
}

/// `POST /contact` — public.
pub async fn submit<K: KeyValue>(
  State(state): State<AppState<K>>,
  Json(body): Json<ContactBody>,
) -> Result<impl IntoResponse, ApiError> {
  let message = ContactMessage {
    id:          local_id(),
    name:        body.name,
    email:       body.email,
    subject:     body.subject,
    body:        body.body,
    received_at: Utc::now(),
    status:      MessageStatus::New,
  };
  state.stores.messages.save(message.clone())?;
  Ok((StatusCode::CREATED, Json(message)))
}

/// `GET /admin/messages` — newest first.
pub async fn list<K: KeyValue>(
  _admin: AdminSession,
  State(state): State<AppState<K>>,
) -> Json<Vec<ContactMessage>> {
  Json(state.stores.messages.get_all())
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: MessageStatus,
}

/// `POST /admin/messages/:id/status`
pub async fn set_status<K: KeyValue>(
  _admin: AdminSession,
  State(state): State<AppState<K>>,
  Path(id): Path<String>,
  Json(body): Json<StatusBody>,
) -> Result<Json<ContactMessage>, ApiError> {
  let matched = state
    .stores
    .messages
    .update_with(&id, |m| m.status = body.status)?;
  if !matched {
    return Err(ApiError::NotFound(format!("message {id} not found")));
  }
  state
    .stores
    .messages
    .get_by_id(&id)
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("message {id} not found")))
}
