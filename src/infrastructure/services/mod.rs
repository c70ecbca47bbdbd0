//! Services orchestrating domain records and the document store

mod account_service;
mod post_service;
mod quota_service;

pub use account_service::{AccountService, RegisterAccountRequest};
pub use post_service::PostService;
pub use quota_service::{QuotaDecision, QuotaService};
