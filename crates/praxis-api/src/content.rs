//! Handlers for site content: blog posts, services, testimonials, employees,
//! and training programs.
//!
//! Reads are public. Writes go through `/admin` and follow the store's save
//! semantics: one upsert endpoint per collection (a body without an id is a
//! create; a body with a known id replaces that record in place) plus a
//! delete endpoint.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use praxis_core::{
  KeyValue,
  content::{BlogPost, Employee, Service, Testimonial},
  id::local_id,
  programs::TrainingProgram,
};
use serde::Deserialize;

use crate::{AppState, auth::AdminSession, error::ApiError};

// ─── Blog posts ───────────────────────────────────────────────────────────────

/// `GET /content/posts`
pub async fn list_posts<K: KeyValue>(
  State(state): State<AppState<K>>,
) -> Json<Vec<BlogPost>> {
  Json(state.stores.posts.get_all())
}

/// `GET /content/posts/:id`
pub async fn get_post<K: KeyValue>(
  State(state): State<AppState<K>>,
  Path(id): Path<String>,
) -> Result<Json<BlogPost>, ApiError> {
  state
    .stores
    .posts
    .get_by_id(&id)
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("post {id} not found")))
}

#[derive(Debug, Deserialize)]
pub struct PostBody {
  pub id:           Option<String>,
  pub title:        String,
  pub author:       String,
  pub category:     String,
  #[serde(default)]
  pub excerpt:      String,
  pub body:         String,
  pub cover_image:  Option<String>,
  pub published_at: Option<DateTime<Utc>>,
}

/// `POST /admin/posts` — upsert.
pub async fn save_post<K: KeyValue>(
  _admin: AdminSession,
  State(state): State<AppState<K>>,
  Json(body): Json<PostBody>,
) -> Result<impl IntoResponse, ApiError> {
  // When a body omits the timestamp, keep the existing record's rather than
  // resetting it on every edit.
  let published_at = body
    .published_at
    .or_else(|| {
      body
        .id
        .as_deref()
        .and_then(|id| state.stores.posts.get_by_id(id))
        .map(|existing| existing.published_at)
    })
    .unwrap_or_else(Utc::now);

  let post = BlogPost {
    id:           body.id.unwrap_or_else(local_id),
    title:        body.title,
    author:       body.author,
    category:     body.category,
    excerpt:      body.excerpt,
    body:         body.body,
    cover_image:  body.cover_image,
    published_at,
  };
  state.stores.posts.save(post.clone())?;
  Ok(Json(post))
}

/// `DELETE /admin/posts/:id` — no-op on an absent id.
pub async fn delete_post<K: KeyValue>(
  _admin: AdminSession,
  State(state): State<AppState<K>>,
  Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
  state.stores.posts.delete(&id)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Services ─────────────────────────────────────────────────────────────────

/// `GET /content/services`
pub async fn list_services<K: KeyValue>(
  State(state): State<AppState<K>>,
) -> Json<Vec<Service>> {
  Json(state.stores.services.get_all())
}

/// `GET /content/services/:id`
pub async fn get_service<K: KeyValue>(
  State(state): State<AppState<K>>,
  Path(id): Path<String>,
) -> Result<Json<Service>, ApiError> {
  state
    .stores
    .services
    .get_by_id(&id)
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("service {id} not found")))
}

#[derive(Debug, Deserialize)]
pub struct ServiceBody {
  pub id:          Option<String>,
  pub title:       String,
  #[serde(default)]
  pub summary:     String,
  pub description: String,
  pub icon:        Option<String>,
}

/// `POST /admin/services` — upsert.
pub async fn save_service<K: KeyValue>(
  _admin: AdminSession,
  State(state): State<AppState<K>>,
  Json(body): Json<ServiceBody>,
) -> Result<impl IntoResponse, ApiError> {
  let service = Service {
    id:          body.id.unwrap_or_else(local_id),
    title:       body.title,
    summary:     body.summary,
    description: body.description,
    icon:        body.icon,
  };
  state.stores.services.save(service.clone())?;
  Ok(Json(service))
}

/// `DELETE /admin/services/:id`
pub async fn delete_service<K: KeyValue>(
  _admin: AdminSession,
  State(state): State<AppState<K>>,
  Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
  state.stores.services.delete(&id)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Testimonials ─────────────────────────────────────────────────────────────

/// `GET /content/testimonials`
pub async fn list_testimonials<K: KeyValue>(
  State(state): State<AppState<K>>,
) -> Json<Vec<Testimonial>> {
  Json(state.stores.testimonials.get_all())
}

#[derive(Debug, Deserialize)]
pub struct TestimonialBody {
  pub id:     Option<String>,
  pub author: String,
  #[serde(default)]
  pub role:   String,
  pub quote:  String,
  pub rating: u8,
  pub photo:  Option<String>,
}

/// `POST /admin/testimonials` — upsert.
pub async fn save_testimonial<K: KeyValue>(
  _admin: AdminSession,
  State(state): State<AppState<K>>,
  Json(body): Json<TestimonialBody>,
) -> Result<impl IntoResponse, ApiError> {
  let testimonial = Testimonial {
    id:     body.id.unwrap_or_else(local_id),
    author: body.author,
    role:   body.role,
    quote:  body.quote,
    rating: body.rating,
    photo:  body.photo,
  };
  state.stores.testimonials.save(testimonial.clone())?;
  Ok(Json(testimonial))
}

/// `DELETE /admin/testimonials/:id`
pub async fn delete_testimonial<K: KeyValue>(
  _admin: AdminSession,
  State(state): State<AppState<K>>,
  Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
  state.stores.testimonials.delete(&id)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Employees ────────────────────────────────────────────────────────────────

/// `GET /content/employees`
pub async fn list_employees<K: KeyValue>(
  State(state): State<AppState<K>>,
) -> Json<Vec<Employee>> {
  Json(state.stores.employees.get_all())
}

#[derive(Debug, Deserialize)]
pub struct EmployeeBody {
  pub id:         Option<String>,
  pub name:       String,
  pub title:      String,
  #[serde(default)]
  pub department: String,
  pub email:      String,
  pub photo:      Option<String>,
}

/// `POST /admin/employees` — upsert.
pub async fn save_employee<K: KeyValue>(
  _admin: AdminSession,
  State(state): State<AppState<K>>,
  Json(body): Json<EmployeeBody>,
) -> Result<impl IntoResponse, ApiError> {
  let employee = Employee {
    id:         body.id.unwrap_or_else(local_id),
    name:       body.name,
    title:      body.title,
    department: body.department,
    email:      body.email,
    photo:      body.photo,
  };
  state.stores.employees.save(employee.clone())?;
  Ok(Json(employee))
}

/// `DELETE /admin/employees/:id`
pub async fn delete_employee<K: KeyValue>(
  _admin: AdminSession,
  State(state): State<AppState<K>>,
  Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
  state.stores.employees.delete(&id)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Training programs ────────────────────────────────────────────────────────

/// `GET /content/trainings`
pub async fn list_trainings<K: KeyValue>(
  State(state): State<AppState<K>>,
) -> Json<Vec<TrainingProgram>> {
  Json(state.stores.trainings.get_all())
}

/// `GET /content/trainings/:id`
pub async fn get_training<K: KeyValue>(
  State(state): State<AppState<K>>,
  Path(id): Path<String>,
) -> Result<Json<TrainingProgram>, ApiError> {
  state
    .stores
    .trainings
    .get_by_id(&id)
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("training {id} not found")))
}

#[derive(Debug, Deserialize)]
pub struct TrainingBody {
  pub id:             Option<String>,
  pub title:          String,
  pub description:    String,
  pub duration_weeks: u32,
  pub fee:            Option<u32>,
  #[serde(default)]
  pub topics:         Vec<String>,
}

/// `POST /admin/trainings` — upsert.
pub async fn save_training<K: KeyValue>(
  _admin: AdminSession,
  State(state): State<AppState<K>>,
  Json(body): Json<TrainingBody>,
) -> Result<impl IntoResponse, ApiError> {
  let training = TrainingProgram {
    id:             body.id.unwrap_or_else(local_id),
    title:          body.title,
    description:    body.description,
    duration_weeks: body.duration_weeks,
    fee:            body.fee,
    topics:         body.topics,
  };
  state.stores.trainings.save(training.clone())?;
  Ok(Json(training))
}

/// `DELETE /admin/trainings/:id`
pub async fn delete_training<K: KeyValue>(
  _admin: AdminSession,
  State(state): State<AppState<K>>,
  Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
  state.stores.trainings.delete(&id)?;
  Ok(StatusCode::NO_CONTENT)
}
