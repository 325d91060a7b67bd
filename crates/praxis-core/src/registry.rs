//! [`Stores`] — every per-entity store, constructed once at wiring time.
//!
//! Explicit construction instead of ambient singletons: whoever owns the
//! medium builds the registry and threads it through. Tests build their own
//! against a [`MemoryKv`](crate::MemoryKv).

use std::sync::Arc;

use crate::{
  careers::{self, Job, JobApplication},
  content::{self, BlogPost, Employee, Service, Testimonial},
  kv::KeyValue,
  messages::{self, ContactMessage},
  programs::{self, Internship, InternshipApplication, TrainingProgram},
  store::AggregateStore,
  users::{self, UserRecord},
};

pub struct Stores<K: KeyValue> {
  pub posts:                   AggregateStore<BlogPost, K>,
  pub testimonials:            AggregateStore<Testimonial, K>,
  pub services:                AggregateStore<Service, K>,
  pub employees:               AggregateStore<Employee, K>,
  pub trainings:               AggregateStore<TrainingProgram, K>,
  pub internships:             AggregateStore<Internship, K>,
  pub internship_applications: AggregateStore<InternshipApplication, K>,
  pub jobs:                    AggregateStore<Job, K>,
  pub job_applications:        AggregateStore<JobApplication, K>,
  pub messages:                AggregateStore<ContactMessage, K>,
  pub users:                   AggregateStore<UserRecord, K>,
}

impl<K: KeyValue> Stores<K> {
  pub fn new(kv: Arc<K>) -> Self {
    Self {
      posts:                   content::post_store(kv.clone()),
      testimonials:            content::testimonial_store(kv.clone()),
      services:                content::service_store(kv.clone()),
      employees:               content::employee_store(kv.clone()),
      trainings:               programs::training_store(kv.clone()),
      internships:             programs::internship_store(kv.clone()),
      internship_applications: programs::internship_application_store(kv.clone()),
      jobs:                    careers::job_store(kv.clone()),
      job_applications:        careers::job_application_store(kv.clone()),
      messages:                messages::message_store(kv.clone()),
      users:                   users::user_store(kv),
    }
  }
}
