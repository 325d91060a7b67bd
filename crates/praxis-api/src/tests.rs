//! Integration tests for the API router against an in-memory medium.

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  body::Body,
  http::{Request, Response, StatusCode, header},
};
use chrono::{Duration, Utc};
use praxis_core::{
  KeyValue, MemoryKv, SessionVault, Stores,
  id::local_id,
  users::{Role, UserRecord},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::{AppState, ServerConfig, auth::hash_password};

const ADMIN_EMAIL: &str = "admin@praxis.test";
const ADMIN_PASSWORD: &str = "correct horse";

fn test_config() -> ServerConfig {
  ServerConfig {
    host:                           "127.0.0.1".to_string(),
    port:                           0,
    store_path:                     PathBuf::from(":memory:"),
    session_ttl_secs:               3600,
    session_refresh_threshold_secs: 60,
    cookie_name:                    "praxis_session".to_string(),
    cookie_secure:                  false,
    admin_email:                    None,
    admin_name:                     None,
    admin_password_hash:            None,
  }
}

/// Router plus state, with one admin account already registered.
fn app() -> (Router, AppState<MemoryKv>) {
  let kv = Arc::new(MemoryKv::new());
  let stores = Arc::new(Stores::new(kv.clone()));
  let sessions = Arc::new(SessionVault::new(
    kv,
    Duration::seconds(3600),
    Duration::seconds(60),
  ));

  stores
    .users
    .save(UserRecord {
      id:            local_id(),
      name:          "Admin".to_string(),
      email:         ADMIN_EMAIL.to_string(),
      phone:         String::new(),
      password_hash: hash_password(ADMIN_PASSWORD).expect("hash"),
      role:          Role::Admin,
      registered_at: Utc::now(),
    })
    .expect("seed admin");

  let state = AppState {
    stores,
    sessions,
    config: Arc::new(test_config()),
  };
  (crate::router(state.clone()), state)
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
  let mut req = Request::builder().uri(uri);
  if let Some(cookie) = cookie {
    req = req.header(header::COOKIE, cookie);
  }
  req.body(Body::empty()).expect("request")
}

fn post_json(uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
  let mut req = Request::builder()
    .method("POST")
    .uri(uri)
    .header(header::CONTENT_TYPE, "application/json");
  if let Some(cookie) = cookie {
    req = req.header(header::COOKIE, cookie);
  }
  req.body(Body::from(body.to_string())).expect("request")
}

fn delete(uri: &str, cookie: Option<&str>) -> Request<Body> {
  let mut req = Request::builder().method("DELETE").uri(uri);
  if let Some(cookie) = cookie {
    req = req.header(header::COOKIE, cookie);
  }
  req.body(Body::empty()).expect("request")
}

/// The `name=value` pair from the response's `Set-Cookie` header.
fn cookie_of(res: &Response<axum::body::Body>) -> String {
  res
    .headers()
    .get(header::SET_COOKIE)
    .expect("set-cookie header")
    .to_str()
    .expect("cookie string")
    .split(';')
    .next()
    .expect("cookie pair")
    .to_string()
}

async fn body_json(res: Response<axum::body::Body>) -> Value {
  let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
    .await
    .expect("read body");
  serde_json::from_slice(&bytes).expect("json body")
}

async fn login(router: &Router, email: &str, password: &str) -> String {
  let res = router
    .clone()
    .oneshot(post_json(
      "/auth/login",
      None,
      json!({ "email": email, "password": password }),
    ))
    .await
    .expect("login request");
  assert_eq!(res.status(), StatusCode::OK);
  cookie_of(&res)
}

// ─── Auth ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_login_me_flow() {
  let (router, _) = app();

  let res = router
    .clone()
    .oneshot(post_json(
      "/auth/register",
      None,
      json!({
        "name": "Alice",
        "email": "alice@example.com",
        "phone": "+1 555 0100",
        "password": "hunter2hunter2"
      }),
    ))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::CREATED);
  let cookie = cookie_of(&res);
  let body = body_json(res).await;
  assert_eq!(body["role"], "student");

  let res = router
    .clone()
    .oneshot(get("/auth/me", Some(&cookie)))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::OK);
  let me = body_json(res).await;
  assert_eq!(me["email"], "alice@example.com");
  assert_eq!(me["name"], "Alice");
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
  let (router, _) = app();
  let body = json!({
    "name": "Admin Again",
    "email": ADMIN_EMAIL,
    "password": "whatever11"
  });

  let res = router
    .clone()
    .oneshot(post_json("/auth/register", None, body))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
  let (router, _) = app();
  let res = router
    .clone()
    .oneshot(post_json(
      "/auth/login",
      None,
      json!({ "email": ADMIN_EMAIL, "password": "wrong" }),
    ))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_destroys_the_session() {
  let (router, _) = app();
  let cookie = login(&router, ADMIN_EMAIL, ADMIN_PASSWORD).await;

  let res = router
    .clone()
    .oneshot(post_json("/auth/logout", Some(&cookie), json!({})))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::NO_CONTENT);

  let res = router
    .clone()
    .oneshot(get("/auth/me", Some(&cookie)))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn refresh_sets_a_session_cookie() {
  let (router, _) = app();
  let cookie = login(&router, ADMIN_EMAIL, ADMIN_PASSWORD).await;

  let res = router
    .clone()
    .oneshot(post_json("/auth/refresh", Some(&cookie), json!({})))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::NO_CONTENT);
  assert!(res.headers().get(header::SET_COOKIE).is_some());
}

// ─── Guard ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn anonymous_admin_access_redirects_to_login() {
  let (router, _) = app();
  let res = router
    .clone()
    .oneshot(get("/admin/messages", None))
    .await
    .unwrap();

  assert_eq!(res.status(), StatusCode::SEE_OTHER);
  let location = res.headers().get(header::LOCATION).unwrap().to_str().unwrap();
  assert_eq!(location, "/login?next=/admin/messages");
}

#[tokio::test]
async fn student_admin_access_redirects_to_fallback() {
  let (router, _) = app();

  router
    .clone()
    .oneshot(post_json(
      "/auth/register",
      None,
      json!({ "name": "Bob", "email": "bob@example.com", "password": "hunter2hunter2" }),
    ))
    .await
    .unwrap();
  let cookie = login(&router, "bob@example.com", "hunter2hunter2").await;

  let res = router
    .clone()
    .oneshot(get("/admin/messages", Some(&cookie)))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::SEE_OTHER);
  let location = res.headers().get(header::LOCATION).unwrap().to_str().unwrap();
  assert_eq!(location, "/");
}

#[tokio::test]
async fn student_session_reaches_me_but_not_admin() {
  let (router, _) = app();
  router
    .clone()
    .oneshot(post_json(
      "/auth/register",
      None,
      json!({ "name": "Cas", "email": "cas@example.com", "password": "hunter2hunter2" }),
    ))
    .await
    .unwrap();
  let cookie = login(&router, "cas@example.com", "hunter2hunter2").await;

  let me = router
    .clone()
    .oneshot(get("/auth/me", Some(&cookie)))
    .await
    .unwrap();
  assert_eq!(me.status(), StatusCode::OK);

  let admin = router
    .clone()
    .oneshot(get("/admin/posts", Some(&cookie)))
    .await
    .unwrap();
  assert_ne!(admin.status(), StatusCode::OK);
}

// ─── Admin CRUD ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn post_crud_flow() {
  let (router, _) = app();
  let cookie = login(&router, ADMIN_EMAIL, ADMIN_PASSWORD).await;

  // Create.
  let res = router
    .clone()
    .oneshot(post_json(
      "/admin/posts",
      Some(&cookie),
      json!({
        "title": "Intro to Rust",
        "author": "Admin",
        "category": "engineering",
        "body": "..."
      }),
    ))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::OK);
  let created = body_json(res).await;
  let id = created["id"].as_str().unwrap().to_string();

  // Publicly listed.
  let res = router.clone().oneshot(get("/content/posts", None)).await.unwrap();
  let listed = body_json(res).await;
  assert_eq!(listed.as_array().unwrap().len(), 1);

  // Update in place: same id, new title, length unchanged.
  let res = router
    .clone()
    .oneshot(post_json(
      "/admin/posts",
      Some(&cookie),
      json!({
        "id": id,
        "title": "Intro to Rust, revised",
        "author": "Admin",
        "category": "engineering",
        "body": "..."
      }),
    ))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::OK);

  let res = router.clone().oneshot(get("/content/posts", None)).await.unwrap();
  let listed = body_json(res).await;
  let listed = listed.as_array().unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0]["title"], "Intro to Rust, revised");

  // Delete, then the public read 404s.
  let res = router
    .clone()
    .oneshot(delete(&format!("/admin/posts/{id}"), Some(&cookie)))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::NO_CONTENT);

  let res = router
    .clone()
    .oneshot(get(&format!("/content/posts/{id}"), None))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn post_update_preserves_published_at() {
  let (router, _) = app();
  let cookie = login(&router, ADMIN_EMAIL, ADMIN_PASSWORD).await;

  let res = router
    .clone()
    .oneshot(post_json(
      "/admin/posts",
      Some(&cookie),
      json!({
        "title": "Cohort dates",
        "author": "Admin",
        "category": "news",
        "body": "..."
      }),
    ))
    .await
    .unwrap();
  let created = body_json(res).await;
  let id = created["id"].as_str().unwrap().to_string();
  let published_at = created["published_at"].clone();

  // Edit without resending the timestamp.
  let res = router
    .clone()
    .oneshot(post_json(
      "/admin/posts",
      Some(&cookie),
      json!({
        "id": id,
        "title": "Cohort dates, updated",
        "author": "Admin",
        "category": "news",
        "body": "..."
      }),
    ))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::OK);
  let updated = body_json(res).await;
  assert_eq!(updated["published_at"], published_at);
  assert_eq!(updated["title"], "Cohort dates, updated");
}

// ─── Messages ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn contact_submission_and_status_flow() {
  let (router, _) = app();

  let res = router
    .clone()
    .oneshot(post_json(
      "/contact",
      None,
      json!({
        "name": "Visitor",
        "email": "visitor@example.com",
        "subject": "Question",
        "body": "When does the next cohort start?"
      }),
    ))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::CREATED);
  let message = body_json(res).await;
  assert_eq!(message["status"], "new");
  let id = message["id"].as_str().unwrap().to_string();

  let cookie = login(&router, ADMIN_EMAIL, ADMIN_PASSWORD).await;
  let res = router
    .clone()
    .oneshot(get("/admin/messages", Some(&cookie)))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::OK);
  assert_eq!(body_json(res).await.as_array().unwrap().len(), 1);

  let res = router
    .clone()
    .oneshot(post_json(
      &format!("/admin/messages/{id}/status"),
      Some(&cookie),
      json!({ "status": "read" }),
    ))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::OK);
  assert_eq!(body_json(res).await["status"], "read");
}

// ─── Applications ────────────────────────────────────────────────────────────

#[tokio::test]
async fn internship_application_flow() {
  let (router, _) = app();
  let cookie = login(&router, ADMIN_EMAIL, ADMIN_PASSWORD).await;

  let res = router
    .clone()
    .oneshot(post_json(
      "/admin/internships",
      Some(&cookie),
      json!({
        "title": "Backend internship",
        "field": "engineering",
        "description": "Six weeks of Rust.",
        "duration_weeks": 6,
        "paid": true
      }),
    ))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::OK);
  let internship_id = body_json(res).await["id"].as_str().unwrap().to_string();

  // Anonymous application against the live track.
  let res = router
    .clone()
    .oneshot(post_json(
      &format!("/internships/{internship_id}/apply"),
      None,
      json!({
        "applicant_name": "Dana",
        "email": "dana@example.com",
        "resume_url": "https://example.com/dana.pdf"
      }),
    ))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::CREATED);
  let application = body_json(res).await;
  assert_eq!(application["status"], "pending");
  assert_eq!(application["internship_id"], internship_id.as_str());
  let application_id = application["id"].as_str().unwrap().to_string();

  // Applying to an absent track 404s.
  let res = router
    .clone()
    .oneshot(post_json(
      "/internships/ghost/apply",
      None,
      json!({ "applicant_name": "Eve", "email": "eve@example.com" }),
    ))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::NOT_FOUND);

  // Admin sees it under the parent filter and can approve it.
  let res = router
    .clone()
    .oneshot(get(
      &format!("/admin/internship-applications?parent={internship_id}"),
      Some(&cookie),
    ))
    .await
    .unwrap();
  assert_eq!(body_json(res).await.as_array().unwrap().len(), 1);

  let res = router
    .clone()
    .oneshot(post_json(
      &format!("/admin/internship-applications/{application_id}/status"),
      Some(&cookie),
      json!({ "status": "approved" }),
    ))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::OK);
  assert_eq!(body_json(res).await["status"], "approved");
}

// ─── Failing medium ──────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("medium offline")]
struct MediumOffline;

/// A medium that reads fine but rejects every write.
struct ReadOnlyKv(MemoryKv);

impl KeyValue for ReadOnlyKv {
  type Error = MediumOffline;

  fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
    self.0.get(key).map_err(|e| match e {})
  }

  fn set(&self, _key: &str, _value: &str) -> Result<(), Self::Error> {
    Err(MediumOffline)
  }

  fn remove(&self, _key: &str) -> Result<(), Self::Error> {
    Err(MediumOffline)
  }
}

#[tokio::test]
async fn store_write_failure_surfaces_as_500() {
  let kv = Arc::new(ReadOnlyKv(MemoryKv::new()));
  let stores = Arc::new(Stores::new(kv.clone()));
  let sessions = Arc::new(SessionVault::new(
    kv,
    Duration::seconds(3600),
    Duration::seconds(60),
  ));
  let router = crate::router(AppState {
    stores,
    sessions,
    config: Arc::new(test_config()),
  });

  let res = router
    .oneshot(post_json(
      "/contact",
      None,
      json!({
        "name": "Visitor",
        "email": "visitor@example.com",
        "body": "hello"
      }),
    ))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn job_application_requires_existing_job() {
  let (router, _) = app();

  let res = router
    .clone()
    .oneshot(post_json(
      "/jobs/ghost/apply",
      None,
      json!({ "applicant_name": "Finn", "email": "finn@example.com" }),
    ))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
