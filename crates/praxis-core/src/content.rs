//! Site-content entities: blog posts, testimonials, services, employees.
//!
//! Each type binds the generic [`AggregateStore`] to one collection key via
//! its `*_store` constructor.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  kv::KeyValue,
  store::{AggregateStore, Identifiable},
};

pub const POSTS_KEY: &str = "praxis.blog_posts";
pub const TESTIMONIALS_KEY: &str = "praxis.testimonials";
pub const SERVICES_KEY: &str = "praxis.services";
pub const EMPLOYEES_KEY: &str = "praxis.employees";

// ─── Blog ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
  pub id:           String,
  pub title:        String,
  pub author:       String,
  pub category:     String,
  /// Short teaser shown in listings.
  pub excerpt:      String,
  pub body:         String,
  pub cover_image:  Option<String>,
  pub published_at: DateTime<Utc>,
}

impl Identifiable for BlogPost {
  fn id(&self) -> &str {
    &self.id
  }
}

pub fn post_store<K: KeyValue>(kv: Arc<K>) -> AggregateStore<BlogPost, K> {
  AggregateStore::new(kv, POSTS_KEY)
}

// ─── Testimonials ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
  pub id:     String,
  pub author: String,
  /// The author's role or affiliation ("graduate, class of 2024").
  pub role:   String,
  pub quote:  String,
  /// 1–5; not enforced by the store.
  pub rating: u8,
  pub photo:  Option<String>,
}

impl Identifiable for Testimonial {
  fn id(&self) -> &str {
    &self.id
  }
}

pub fn testimonial_store<K: KeyValue>(kv: Arc<K>) -> AggregateStore<Testimonial, K> {
  AggregateStore::new(kv, TESTIMONIALS_KEY)
}

// ─── Services ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
  pub id:          String,
  pub title:       String,
  pub summary:     String,
  pub description: String,
  pub icon:        Option<String>,
}

impl Identifiable for Service {
  fn id(&self) -> &str {
    &self.id
  }
}

pub fn service_store<K: KeyValue>(kv: Arc<K>) -> AggregateStore<Service, K> {
  AggregateStore::new(kv, SERVICES_KEY)
}

// ─── Employees ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
  pub id:         String,
  pub name:       String,
  pub title:      String,
  pub department: String,
  pub email:      String,
  pub photo:      Option<String>,
}

impl Identifiable for Employee {
  fn id(&self) -> &str {
    &self.id
  }
}

pub fn employee_store<K: KeyValue>(kv: Arc<K>) -> AggregateStore<Employee, K> {
  AggregateStore::new(kv, EMPLOYEES_KEY)
}
