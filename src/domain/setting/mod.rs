//! Setting domain - account-wide posting rules

mod entity;

pub use entity::Rule;
