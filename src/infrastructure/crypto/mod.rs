//! Password hashing and secret encryption

mod cipher;
mod password;

pub use cipher::{SecretCipher, KEY_SIZE};
pub use password::{Argon2Hasher, PasswordHasher};
