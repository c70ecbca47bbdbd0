//! Post domain
//!
//! Posts, thread groups and the tabular column layout used for imports.

mod columns;
mod entity;
mod group;

pub use columns::{check_columns, next_append_row, POST_COLUMNS};
pub use entity::{Post, PostLookup};
pub use group::Group;
