//! Subscription module: three-layer architecture (domain, repository, service).
//!
//! The repository trait is the persistence boundary; `repo::seaorm` talks to
//! Postgres and `repository::mock` keeps rows in memory.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;

pub use domain::{Lookup, PriceFilter, SubscriptionChanges};
pub use repository::SubscriptionRepository;
pub use service::{parse_id, SubscriptionService};
