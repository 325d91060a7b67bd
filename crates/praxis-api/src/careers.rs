//! Handlers for internships, jobs, and their application sub-collections.
//!
//! Applications live in their own collections and reference their parent by
//! foreign id; submitting one checks that the parent exists, nothing more.
//! Status changes are unrestricted within the closed status set — ordering
//! is an admin-side convention.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use praxis_core::{
  KeyValue,
  careers::{ApplicationStatus, Job, JobApplication},
  id::local_id,
  programs::{Internship, InternshipApplication},
};
use serde::Deserialize;

use crate::{AppState, auth::AdminSession, error::ApiError};

// ─── Internships ─────────────────────────────────────────────────────────────

/// `GET /content/internships`
pub async fn list_internships<K: KeyValue>(
  State(state): State<AppState<K>>,
) -> Json<Vec<Internship>> {
  Json(state.stores.internships.get_all())
}

/// `GET /content/internships/:id`
pub async fn get_internship<K: KeyValue>(
  State(state): State<AppState<K>>,
  Path(id): Path<String>,
) -> Result<Json<Internship>, ApiError> {
  state
    .stores
    .internships
    .get_by_id(&id)
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("internship {id} not found")))
}

#[derive(Debug, Deserialize)]
pub struct InternshipBody {
  pub id:             Option<String>,
  pub title:          String,
  pub field:          String,
  pub description:    String,
  pub duration_weeks: u32,
  #[serde(default)]
  pub paid:           bool,
}

/// `POST /admin/internships` — upsert.
pub async fn save_internship<K: KeyValue>(
  _admin: AdminSession,
  State(state): State<AppState<K>>,
  Json(body): Json<InternshipBody>,
) -> Result<impl IntoResponse, ApiError> {
  let internship = Internship {
    id:             body.id.unwrap_or_else(local_id),
    title:          body.title,
    field:          body.field,
    description:    body.description,
    duration_weeks: body.duration_weeks,
    paid:           body.paid,
  };
  state.stores.internships.save(internship.clone())?;
  Ok(Json(internship))
}

/// `DELETE /admin/internships/:id`
pub async fn delete_internship<K: KeyValue>(
  _admin: AdminSession,
  State(state): State<AppState<K>>,
  Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
  state.stores.internships.delete(&id)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Internship applications ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct InternshipApplicationBody {
  pub applicant_name: String,
  pub email:          String,
  #[serde(default)]
  pub phone:          String,
  pub resume_url:     Option<String>,
}

/// `POST /internships/:id/apply` — public; 404 when the track is absent.
pub async fn apply_internship<K: KeyValue>(
  State(state): State<AppState<K>>,
  Path(id): Path<String>,
  Json(body): Json<InternshipApplicationBody>,
) -> Result<impl IntoResponse, ApiError> {
  if state.stores.internships.get_by_id(&id).is_none() {
    return Err(ApiError::NotFound(format!("internship {id} not found")));
  }

  let application = InternshipApplication {
    id:             local_id(),
    internship_id:  id,
    applicant_name: body.applicant_name,
    email:          body.email,
    phone:          body.phone,
    resume_url:     body.resume_url,
    submitted_at:   Utc::now(),
    status:         ApplicationStatus::Pending,
  };
  state.stores.internship_applications.save(application.clone())?;
  Ok((StatusCode::CREATED, Json(application)))
}

#[derive(Debug, Deserialize)]
pub struct ApplicationListParams {
  /// Restrict to applications for one parent entity.
  pub parent: Option<String>,
}

/// `GET /admin/internship-applications[?parent=<internship id>]`
pub async fn list_internship_applications<K: KeyValue>(
  _admin: AdminSession,
  State(state): State<AppState<K>>,
  Query(params): Query<ApplicationListParams>,
) -> Json<Vec<InternshipApplication>> {
  let mut applications = state.stores.internship_applications.get_all();
  if let Some(parent) = &params.parent {
    applications.retain(|a| &a.internship_id == parent);
  }
  Json(applications)
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: ApplicationStatus,
}

/// `POST /admin/internship-applications/:id/status`
pub async fn set_internship_application_status<K: KeyValue>(
  _admin: AdminSession,
  State(state): State<AppState<K>>,
  Path(id): Path<String>,
  Json(body): Json<StatusBody>,
) -> Result<Json<InternshipApplication>, ApiError> {
  let matched = state
    .stores
    .internship_applications
    .update_with(&id, |a| a.status = body.status)?;
  if !matched {
    return Err(ApiError::NotFound(format!("application {id} not found")));
  }
  state
    .stores
    .internship_applications
    .get_by_id(&id)
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("application {id} not found")))
}

// ─── Jobs ────────────────────────────────────────────────────────────────────

/// `GET /content/jobs`
pub async fn list_jobs<K: KeyValue>(State(state): State<AppState<K>>) -> Json<Vec<Job>> {
  Json(state.stores.jobs.get_all())
}

/// `GET /content/jobs/:id`
pub async fn get_job<K: KeyValue>(
  State(state): State<AppState<K>>,
  Path(id): Path<String>,
) -> Result<Json<Job>, ApiError> {
  state
    .stores
    .jobs
    .get_by_id(&id)
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("job {id} not found")))
}

#[derive(Debug, Deserialize)]
pub struct JobBody {
  pub id:              Option<String>,
  pub title:           String,
  pub location:        String,
  pub employment_type: String,
  pub description:     String,
}

/// `POST /admin/jobs` — upsert.
pub async fn save_job<K: KeyValue>(
  _admin: AdminSession,
  State(state): State<AppState<K>>,
  Json(body): Json<JobBody>,
) -> Result<impl IntoResponse, ApiError> {
  let posted_at = body
    .id
    .as_deref()
    .and_then(|id| state.stores.jobs.get_by_id(id))
    .map(|existing| existing.posted_at)
    .unwrap_or_else(Utc::now);

  let job = Job {
    id: body.id.unwrap_or_else(local_id),
    title: body.title,
    location: body.location,
    employment_type: body.employment_type,
    description: body.description,
    posted_at,
  };
  state.stores.jobs.save(job.clone())?;
  Ok(Json(job))
}

/// `DELETE /admin/jobs/:id`
pub async fn delete_job<K: KeyValue>(
  _admin: AdminSession,
  State(state): State<AppState<K>>,
  Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
  state.stores.jobs.delete(&id)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Job applications ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct JobApplicationBody {
  pub applicant_name: String,
  pub email:          String,
  #[serde(default)]
  pub phone:          String,
  pub cover_letter:   Option<String>,
}

/// `POST /jobs/:id/apply` — public; 404 when the job is absent.
pub async fn apply_job<K: KeyValue>(
  State(state): State<AppState<K>>,
  Path(id): Path<String>,
  Json(body): Json<JobApplicationBody>,
) -> Result<impl IntoResponse, ApiError> {
  if state.stores.jobs.get_by_id(&id).is_none() {
    return Err(ApiError::NotFound(format!("job {id} not found")));
  }

  let application = JobApplication {
    id:             local_id(),
    job_id:         id,
    applicant_name: body.applicant_name,
    email:          body.email,
    phone:          body.phone,
    cover_letter:   body.cover_letter,
    submitted_at:   Utc::now(),
    status:         ApplicationStatus::Pending,
  };
  state.stores.job_applications.save(application.clone())?;
  Ok((StatusCode::CREATED, Json(application)))
}

/// `GET /admin/job-applications[?parent=<job id>]`
pub async fn list_job_applications<K: KeyValue>(
  _admin: AdminSession,
  State(state): State<AppState<K>>,
  Query(params): Query<ApplicationListParams>,
) -> Json<Vec<JobApplication>> {
  let mut applications = state.stores.job_applications.get_all();
  if let Some(parent) = &params.parent {
    applications.retain(|a| &a.job_id == parent);
  }
  Json(applications)
}

/// `POST /admin/job-applications/:id/status`
pub async fn set_job_application_status<K: KeyValue>(
  _admin: AdminSession,
  State(state): State<AppState<K>>,
  Path(id): Path<String>,
  Json(body): Json<StatusBody>,
) -> Result<Json<JobApplication>, ApiError> {
  let matched = state
    .stores
    .job_applications
    .update_with(&id, |a| a.status = body.status)?;
  if !matched {
    return Err(ApiError::NotFound(format!("application {id} not found")));
  }
  state
    .stores
    .job_applications
    .get_by_id(&id)
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("application {id} not found")))
}
