//! Symmetric encryption of stored secrets (AES-256-GCM)

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::domain::DomainError;

/// Key length in bytes
pub const KEY_SIZE: usize = 32;

const NONCE_SIZE: usize = 12;

/// Encrypts short secrets such as access tokens.
///
/// Output is base64 of `nonce || ciphertext`, with a fresh random nonce per
/// call, so encrypting the same value twice gives different strings.
#[derive(Clone)]
pub struct SecretCipher {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for SecretCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretCipher").finish_non_exhaustive()
    }
}

impl SecretCipher {
    pub fn new(key: &[u8]) -> Result<Self, DomainError> {
        if key.len() != KEY_SIZE {
            return Err(DomainError::crypto(format!(
                "Key must be {} bytes, got {}",
                KEY_SIZE,
                key.len()
            )));
        }

        Ok(Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)),
        })
    }

    /// Builds a cipher from a base64-encoded key
    pub fn from_base64(key: &str) -> Result<Self, DomainError> {
        let bytes = STANDARD
            .decode(key.trim())
            .map_err(|e| DomainError::crypto(format!("Invalid key encoding: {}", e)))?;

        Self::new(&bytes)
    }

    /// Fresh random key, base64 encoded
    pub fn generate_key() -> String {
        let key = Aes256Gcm::generate_key(&mut OsRng);
        STANDARD.encode(key)
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String, DomainError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| DomainError::crypto(format!("Encryption failed: {}", e)))?;

        let mut combined = nonce.to_vec();
        combined.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(combined))
    }

    pub fn decrypt(&self, encoded: &str) -> Result<String, DomainError> {
        let combined = STANDARD
            .decode(encoded)
            .map_err(|e| DomainError::crypto(format!("Invalid ciphertext encoding: {}", e)))?;

        if combined.len() < NONCE_SIZE {
            return Err(DomainError::crypto("Ciphertext too short"));
        }

        let (nonce, ciphertext) = combined.split_at(NONCE_SIZE);

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|e| DomainError::crypto(format!("Decryption failed: {}", e)))?;

        String::from_utf8(plaintext)
            .map_err(|e| DomainError::crypto(format!("Decrypted value is not UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> SecretCipher {
        SecretCipher::from_base64(&SecretCipher::generate_key()).unwrap()
    }

    #[test]
    fn test_encrypt_decrypt() {
        let cipher = cipher();

        let encrypted = cipher.encrypt("access-secret").unwrap();
        assert_ne!(encrypted, "access-secret");
        assert_eq!(cipher.decrypt(&encrypted).unwrap(), "access-secret");
    }

    #[test]
    fn test_nonce_is_random() {
        let cipher = cipher();

        let first = cipher.encrypt("same").unwrap();
        let second = cipher.encrypt("same").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_generated_key_size() {
        let key = STANDARD.decode(SecretCipher::generate_key()).unwrap();
        assert_eq!(key.len(), KEY_SIZE);
    }

    #[test]
    fn test_rejects_wrong_key_size() {
        let result = SecretCipher::new(&[0u8; 16]);
        assert!(matches!(result, Err(DomainError::Crypto { .. })));

        let result = SecretCipher::from_base64("not base64!");
        assert!(matches!(result, Err(DomainError::Crypto { .. })));
    }

    #[test]
    fn test_decrypt_with_wrong_key() {
        let encrypted = cipher().encrypt("secret").unwrap();
        assert!(cipher().decrypt(&encrypted).is_err());
    }

    #[test]
    fn test_decrypt_short_input() {
        let short = STANDARD.encode([1u8; 5]);
        assert!(cipher().decrypt(&short).is_err());
        assert!(cipher().decrypt("%%%").is_err());
    }

    #[test]
    fn test_decrypt_tampered() {
        let cipher = cipher();
        let encrypted = cipher.encrypt("secret").unwrap();

        let mut bytes = STANDARD.decode(&encrypted).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;

        assert!(cipher.decrypt(&STANDARD.encode(bytes)).is_err());
    }
}
