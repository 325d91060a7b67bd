//! Job openings and their applications.
//!
//! An application lives in its own collection and references its parent job
//! by foreign id only — it is never nested inside the job record.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  kv::KeyValue,
  store::{AggregateStore, Identifiable},
};

pub const JOBS_KEY: &str = "praxis.jobs";
pub const JOB_APPLICATIONS_KEY: &str = "praxis.job_applications";

// ─── Status ──────────────────────────────────────────────────────────────────

/// Lifecycle status of an application (job or internship).
///
/// Any status may be set to any other — ordering is convention owned by the
/// admin surface, not enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
  #[default]
  Pending,
  Approved,
  Rejected,
}

// ─── Jobs ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
  pub id:              String,
  pub title:           String,
  pub location:        String,
  /// Free-form ("full-time", "contract"); mirrored into listings as-is.
  pub employment_type: String,
  pub description:     String,
  pub posted_at:       DateTime<Utc>,
}

impl Identifiable for Job {
  fn id(&self) -> &str {
    &self.id
  }
}

pub fn job_store<K: KeyValue>(kv: Arc<K>) -> AggregateStore<Job, K> {
  AggregateStore::new(kv, JOBS_KEY)
}

// ─── Applications ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobApplication {
  pub id:             String,
  /// Foreign id of the parent [`Job`].
  pub job_id:         String,
  pub applicant_name: String,
  pub email:          String,
  pub phone:          String,
  pub cover_letter:   Option<String>,
  pub submitted_at:   DateTime<Utc>,
  pub status:         ApplicationStatus,
}

impl Identifiable for JobApplication {
  fn id(&self) -> &str {
    &self.id
  }
}

pub fn job_application_store<K: KeyValue>(kv: Arc<K>) -> AggregateStore<JobApplication, K> {
  AggregateStore::new(kv, JOB_APPLICATIONS_KEY)
}
