//! Account domain
//!
//! Linked social accounts and the OAuth claims used while linking them.

mod entity;

pub use entity::{check_duplicate_account, Account, Claims};
