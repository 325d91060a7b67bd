//! Training programs, internship tracks, and internship applications.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  careers::ApplicationStatus,
  kv::KeyValue,
  store::{AggregateStore, Identifiable},
};

pub const TRAININGS_KEY: &str = "praxis.trainings";
pub const INTERNSHIPS_KEY: &str = "praxis.internships";
pub const INTERNSHIP_APPLICATIONS_KEY: &str = "praxis.internship_applications";

// ─── Training programs ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingProgram {
  pub id:             String,
  pub title:          String,
  pub description:    String,
  pub duration_weeks: u32,
  /// Course fee in whole currency units; `None` means "contact us".
  pub fee:            Option<u32>,
  pub topics:         Vec<String>,
}

impl Identifiable for TrainingProgram {
  fn id(&self) -> &str {
    &self.id
  }
}

pub fn training_store<K: KeyValue>(kv: Arc<K>) -> AggregateStore<TrainingProgram, K> {
  AggregateStore::new(kv, TRAININGS_KEY)
}

// ─── Internships ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Internship {
  pub id:             String,
  pub title:          String,
  pub field:          String,
  pub description:    String,
  pub duration_weeks: u32,
  pub paid:           bool,
}

impl Identifiable for Internship {
  fn id(&self) -> &str {
    &self.id
  }
}

pub fn internship_store<K: KeyValue>(kv: Arc<K>) -> AggregateStore<Internship, K> {
  AggregateStore::new(kv, INTERNSHIPS_KEY)
}

// ─── Applications ────────────────────────────────────────────────────────────

/// An application to an internship track. References the parent track by
/// foreign id; lives in its own collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternshipApplication {
  pub id:             String,
  /// Foreign id of the parent [`Internship`].
  pub internship_id:  String,
  pub applicant_name: String,
  pub email:          String,
  pub phone:          String,
  pub resume_url:     Option<String>,
  pub submitted_at:   DateTime<Utc>,
  pub status:         ApplicationStatus,
}

impl Identifiable for InternshipApplication {
  fn id(&self) -> &str {
    &self.id
  }
}

pub fn internship_application_store<K: KeyValue>(
  kv: Arc<K>,
) -> AggregateStore<InternshipApplication, K> {
  AggregateStore::new(kv, INTERNSHIP_APPLICATIONS_KEY)
}
