//! JSON HTTP API for the Praxis content-management core.
//!
//! Exposes an axum [`Router`] backed by any [`KeyValue`] medium. Public
//! routes serve site content and accept contact messages and applications;
//! `/auth` manages sessions; `/admin` routes require an admin session and
//! carry the full CRUD surface.

pub mod auth;
pub mod careers;
pub mod content;
pub mod error;
pub mod messages;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get, post},
};
use praxis_core::{KeyValue, SessionVault, Stores};
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,

  #[serde(default = "default_session_ttl_secs")]
  pub session_ttl_secs: i64,
  /// Sessions closer to expiry than this are reissued on refresh.
  #[serde(default = "default_refresh_threshold_secs")]
  pub session_refresh_threshold_secs: i64,

  #[serde(default = "default_cookie_name")]
  pub cookie_name:   String,
  #[serde(default)]
  pub cookie_secure: bool,

  /// Optional bootstrap admin, seeded at startup when the email is not yet
  /// registered. The hash is an argon2 PHC string (`server --hash-password`).
  pub admin_email:         Option<String>,
  pub admin_name:          Option<String>,
  pub admin_password_hash: Option<String>,
}

fn default_session_ttl_secs() -> i64 {
  3600
}

fn default_refresh_threshold_secs() -> i64 {
  300
}

fn default_cookie_name() -> String {
  "praxis_session".to_string()
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<K: KeyValue> {
  pub stores:   Arc<Stores<K>>,
  pub sessions: Arc<SessionVault<K>>,
  pub config:   Arc<ServerConfig>,
}

// Manual impl: `K` itself need not be `Clone` behind the `Arc`s.
impl<K: KeyValue> Clone for AppState<K> {
  fn clone(&self) -> Self {
    Self {
      stores:   self.stores.clone(),
      sessions: self.sessions.clone(),
      config:   self.config.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full API router for `state`.
pub fn router<K: KeyValue>(state: AppState<K>) -> Router {
  Router::new()
    // Public content reads.
    .route("/content/posts", get(content::list_posts::<K>))
    .route("/content/posts/{id}", get(content::get_post::<K>))
    .route("/content/services", get(content::list_services::<K>))
    .route("/content/services/{id}", get(content::get_service::<K>))
    .route("/content/testimonials", get(content::list_testimonials::<K>))
    .route("/content/employees", get(content::list_employees::<K>))
    .route("/content/trainings", get(content::list_trainings::<K>))
    .route("/content/trainings/{id}", get(content::get_training::<K>))
    .route("/content/internships", get(careers::list_internships::<K>))
    .route("/content/internships/{id}", get(careers::get_internship::<K>))
    .route("/content/jobs", get(careers::list_jobs::<K>))
    .route("/content/jobs/{id}", get(careers::get_job::<K>))
    // Public submissions.
    .route("/contact", post(messages::submit::<K>))
    .route("/internships/{id}/apply", post(careers::apply_internship::<K>))
    .route("/jobs/{id}/apply", post(careers::apply_job::<K>))
    // Sessions.
    .route("/auth/register", post(auth::register::<K>))
    .route("/auth/login", post(auth::login::<K>))
    .route("/auth/logout", post(auth::logout::<K>))
    .route("/auth/refresh", post(auth::refresh::<K>))
    .route("/auth/me", get(auth::me::<K>))
    // Admin CRUD: one save (upsert) and one delete route per collection.
    .route("/admin/posts", post(content::save_post::<K>))
    .route("/admin/posts/{id}", delete(content::delete_post::<K>))
    .route("/admin/services", post(content::save_service::<K>))
    .route("/admin/services/{id}", delete(content::delete_service::<K>))
    .route("/admin/testimonials", post(content::save_testimonial::<K>))
    .route(
      "/admin/testimonials/{id}",
      delete(content::delete_testimonial::<K>),
    )
    .route("/admin/employees", post(content::save_employee::<K>))
    .route("/admin/employees/{id}", delete(content::delete_employee::<K>))
    .route("/admin/trainings", post(content::save_training::<K>))
    .route("/admin/trainings/{id}", delete(content::delete_training::<K>))
    .route("/admin/internships", post(careers::save_internship::<K>))
    .route(
      "/admin/internships/{id}",
      delete(careers::delete_internship::<K>),
    )
    .route("/admin/jobs", post(careers::save_job::<K>))
    .route("/admin/jobs/{id}", delete(careers::delete_job::<K>))
    // Admin: logs and statuses.
    .route("/admin/messages", get(messages::list::<K>))
    .route("/admin/messages/{id}/status", post(messages::set_status::<K>))
    .route(
      "/admin/internship-applications",
      get(careers::list_internship_applications::<K>),
    )
    .route(
      "/admin/internship-applications/{id}/status",
      post(careers::set_internship_application_status::<K>),
    )
    .route(
      "/admin/job-applications",
      get(careers::list_job_applications::<K>),
    )
    .route(
      "/admin/job-applications/{id}/status",
      post(careers::set_job_application_status::<K>),
    )
    .with_state(state)
}

#[cfg(test)]
mod tests;
