//! xpost-scheduler
//!
//! Data layer of a social post scheduler:
//! - Subscription plans with per-channel monthly/daily/hourly quotas
//! - Recurring post schedules evaluated against a clock
//! - A document store with in-memory and PostgreSQL backends
//! - Password hashing, secret encryption and CSV post import

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::DomainError;
