//! The access guard — render-vs-redirect for protected views.
//!
//! [`decide`] is a pure function of (session state, access policy, requested
//! location). It has no side effects; the routing layer enacts whatever
//! decision comes back.

use crate::{session::SessionState, users::Role};

// ─── Policy ──────────────────────────────────────────────────────────────────

/// What a protected view requires of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessPolicy {
  /// `None` means any authenticated principal may enter.
  pub allowed_roles: Option<Vec<Role>>,
  /// Where to send an authenticated principal whose role is not allowed.
  pub fallback:      String,
}

impl AccessPolicy {
  /// Authentication required, any role.
  pub fn authenticated() -> Self {
    Self {
      allowed_roles: None,
      fallback:      "/".to_string(),
    }
  }

  /// Authentication required with a single allowed role.
  pub fn role(role: Role) -> Self {
    Self {
      allowed_roles: Some(vec![role]),
      ..Self::authenticated()
    }
  }

  pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
    self.fallback = fallback.into();
    self
  }
}

// ─── Decision ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
  /// The session check has not settled yet — show a neutral loading state,
  /// do not redirect.
  Defer,
  /// Send to the login view; `next` is the originally requested location so
  /// login can return there.
  RedirectToLogin { next: String },
  /// Authenticated, but the role is outside the allowed set.
  RedirectToFallback(String),
  /// Let the protected view render.
  Render,
}

/// Decide what to do with a request for a protected view at `requested`.
pub fn decide(state: &SessionState, policy: &AccessPolicy, requested: &str) -> Decision {
  let principal = match state {
    SessionState::Unknown => return Decision::Defer,
    SessionState::Unauthenticated => {
      return Decision::RedirectToLogin {
        next: requested.to_string(),
      };
    }
    SessionState::Authenticated(principal) => principal,
  };

  match &policy.allowed_roles {
    Some(roles) if !roles.contains(&principal.role) => {
      Decision::RedirectToFallback(policy.fallback.clone())
    }
    _ => Decision::Render,
  }
}
