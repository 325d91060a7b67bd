//! Session endpoints and the guard extractors protecting routes.
//!
//! The guard itself lives in `praxis_core::guard`; this module resolves the
//! session cookie to a [`SessionState`] and enacts the guard's decision as
//! an extractor rejection.

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use axum::{
  Json,
  extract::{FromRequestParts, State},
  http::{HeaderMap, StatusCode, header, request::Parts},
  response::IntoResponse,
};
use chrono::Utc;
use praxis_core::{
  KeyValue, Principal, SessionState,
  guard::{self, AccessPolicy, Decision},
  id::local_id,
  users::{self, Role, UserRecord},
};
use rand_core::OsRng;
use serde::Deserialize;

use crate::{AppState, error::ApiError};

// ─── Cookie helpers ───────────────────────────────────────────────────────────

/// Pull the session token out of the `Cookie` header, if any.
pub(crate) fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
  let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
  cookies.split(';').find_map(|pair| {
    let (name, value) = pair.trim().split_once('=')?;
    (name == cookie_name).then(|| value.to_string())
  })
}

fn session_cookie<K: KeyValue>(state: &AppState<K>, token: &str) -> String {
  let mut cookie = format!(
    "{}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
    state.config.cookie_name, state.config.session_ttl_secs,
  );
  if state.config.cookie_secure {
    cookie.push_str("; Secure");
  }
  cookie
}

fn clear_cookie<K: KeyValue>(state: &AppState<K>) -> String {
  let mut cookie = format!(
    "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
    state.config.cookie_name,
  );
  if state.config.cookie_secure {
    cookie.push_str("; Secure");
  }
  cookie
}

// ─── Guard extractors ─────────────────────────────────────────────────────────

/// Any authenticated principal, plus the bearer token that proved it.
pub struct CurrentSession {
  pub token:     String,
  pub principal: Principal,
}

/// An authenticated principal with the admin role.
pub struct AdminSession(pub Principal);

fn resolve_state<K: KeyValue>(
  parts: &Parts,
  state: &AppState<K>,
) -> (Option<String>, SessionState) {
  match session_token(&parts.headers, &state.config.cookie_name) {
    Some(token) => {
      let session = state.sessions.resolve(&token);
      (Some(token), session)
    }
    None => (None, SessionState::Unauthenticated),
  }
}

fn enact(decision: Decision, requested: &str) -> Result<(), ApiError> {
  match decision {
    Decision::Render => Ok(()),
    Decision::RedirectToLogin { next } => Err(ApiError::RedirectToLogin { next }),
    Decision::RedirectToFallback(location) => {
      Err(ApiError::RedirectToFallback { location })
    }
    // The vault resolves synchronously, so the pending state never reaches
    // the HTTP layer; treat it as not-yet-authenticated if it ever does.
    Decision::Defer => Err(ApiError::RedirectToLogin {
      next: requested.to_string(),
    }),
  }
}

impl<K: KeyValue> FromRequestParts<AppState<K>> for CurrentSession {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<K>,
  ) -> Result<Self, Self::Rejection> {
    let requested = parts.uri.path().to_string();
    let (token, session) = resolve_state(parts, state);
    enact(
      guard::decide(&session, &AccessPolicy::authenticated(), &requested),
      &requested,
    )?;

    let (SessionState::Authenticated(principal), Some(token)) = (session, token) else {
      return Err(ApiError::RedirectToLogin { next: requested });
    };
    Ok(CurrentSession { token, principal })
  }
}

impl<K: KeyValue> FromRequestParts<AppState<K>> for AdminSession {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<K>,
  ) -> Result<Self, Self::Rejection> {
    let requested = parts.uri.path().to_string();
    let (_, session) = resolve_state(parts, state);
    enact(
      guard::decide(&session, &AccessPolicy::role(Role::Admin), &requested),
      &requested,
    )?;

    let SessionState::Authenticated(principal) = session else {
      return Err(ApiError::RedirectToLogin { next: requested });
    };
    Ok(AdminSession(principal))
  }
}

// ─── Password hashing ─────────────────────────────────────────────────────────

pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::Store(format!("argon2 error: {e}").into()))
}

fn verify_password(password: &str, phc: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

// ─── Handlers ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub name:     String,
  pub email:    String,
  #[serde(default)]
  pub phone:    String,
  pub password: String,
}

/// `POST /auth/register` — creates a student account and opens a session.
pub async fn register<K: KeyValue>(
  State(state): State<AppState<K>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError> {
  if body.email.trim().is_empty() || body.password.is_empty() {
    return Err(ApiError::BadRequest("email and password are required".into()));
  }
  if users::find_by_email(&state.stores.users, &body.email).is_some() {
    return Err(ApiError::Conflict(format!(
      "email {} is already registered",
      body.email
    )));
  }

  let user = UserRecord {
    id:            local_id(),
    name:          body.name,
    email:         body.email,
    phone:         body.phone,
    password_hash: hash_password(&body.password)?,
    role:          Role::Student,
    registered_at: Utc::now(),
  };
  state.stores.users.save(user.clone())?;

  let principal = user.principal();
  let token = state.sessions.open(&principal)?;
  Ok((
    StatusCode::CREATED,
    [(header::SET_COOKIE, session_cookie(&state, token.as_str()))],
    Json(principal),
  ))
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

/// `POST /auth/login`
pub async fn login<K: KeyValue>(
  State(state): State<AppState<K>>,
  Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, ApiError> {
  let user = users::find_by_email(&state.stores.users, &body.email)
    .ok_or(ApiError::Unauthorized)?;
  if !verify_password(&body.password, &user.password_hash) {
    return Err(ApiError::Unauthorized);
  }

  let principal = user.principal();
  let token = state.sessions.open(&principal)?;
  Ok((
    [(header::SET_COOKIE, session_cookie(&state, token.as_str()))],
    Json(principal),
  ))
}

/// `POST /auth/logout` — destroys the session (if any) and clears the
/// cookie. Safe to call with a stale or missing cookie.
pub async fn logout<K: KeyValue>(
  State(state): State<AppState<K>>,
  headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
  if let Some(token) = session_token(&headers, &state.config.cookie_name) {
    state.sessions.close(&token)?;
  }
  Ok((
    StatusCode::NO_CONTENT,
    [(header::SET_COOKIE, clear_cookie(&state))],
  ))
}

/// `POST /auth/refresh` — reissues the session when it is close to expiry.
/// The (possibly fresh) token is set back on the cookie.
pub async fn refresh<K: KeyValue>(
  State(state): State<AppState<K>>,
  headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
  let token = session_token(&headers, &state.config.cookie_name)
    .ok_or(ApiError::Unauthorized)?;
  let token = state
    .sessions
    .refresh(&token)?
    .ok_or(ApiError::Unauthorized)?;
  Ok((
    StatusCode::NO_CONTENT,
    [(header::SET_COOKIE, session_cookie(&state, token.as_str()))],
  ))
}

/// `GET /auth/me`
pub async fn me<K: KeyValue>(session: CurrentSession) -> Json<Principal> {
  Json(session.principal)
}
