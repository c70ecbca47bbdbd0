//! Subscription domain
//!
//! Plan-based usage quotas with rolling monthly, daily and hourly windows,
//! metered separately for the GUI and API channels.

mod entity;
mod plan;

pub use entity::{Managed, Subscription};
pub use plan::{Channel, Count, Plan, PlanLimits};
