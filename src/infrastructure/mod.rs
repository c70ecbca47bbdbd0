//! Infrastructure layer - storage backends, crypto, import and services

pub mod crypto;
pub mod import;
pub mod logging;
pub mod services;
pub mod storage;
