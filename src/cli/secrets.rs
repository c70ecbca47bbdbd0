use crate::config::AppConfig;
use crate::domain::text::mask;
use crate::infrastructure::crypto::SecretCipher;

/// Prints a fresh key suitable for `security.encryption_key`
pub fn gen_key() -> anyhow::Result<()> {
    println!("{}", SecretCipher::generate_key());
    Ok(())
}

pub fn mask_value(value: &str) -> anyhow::Result<()> {
    println!("{}", mask(value));
    Ok(())
}

/// Cipher from configuration, if a key is set
pub fn configured_cipher(config: &AppConfig) -> anyhow::Result<Option<SecretCipher>> {
    config
        .security
        .encryption_key
        .as_deref()
        .filter(|key| !key.is_empty())
        .map(SecretCipher::from_base64)
        .transpose()
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_cipher() {
        let mut config = AppConfig::default();
        assert!(configured_cipher(&config).unwrap().is_none());

        config.security.encryption_key = Some(String::new());
        assert!(configured_cipher(&config).unwrap().is_none());

        config.security.encryption_key = Some(SecretCipher::generate_key());
        assert!(configured_cipher(&config).unwrap().is_some());

        config.security.encryption_key = Some("short".to_string());
        assert!(configured_cipher(&config).is_err());
    }
}
