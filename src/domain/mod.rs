//! Domain layer - records, quota tracking and schedule evaluation

pub mod account;
pub mod error;
pub mod post;
pub mod schedule;
pub mod setting;
pub mod storage;
pub mod subscription;
pub mod text;

pub use account::{check_duplicate_account, Account, Claims};
pub use error::DomainError;
pub use post::{Group, Post, PostLookup};
pub use schedule::{Schedule, ScheduleKind};
pub use setting::Rule;
pub use storage::{DocumentStore, GeneratedKey, IdentityKey, KeyStrategy, StorageEntity};
pub use subscription::{Channel, Count, Plan, Subscription};
