//! Account service - sign-up of social accounts

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::storage::IdentityKey;
use crate::domain::{check_duplicate_account, Account, DomainError, Subscription};
use crate::infrastructure::crypto::{PasswordHasher, SecretCipher};
use crate::infrastructure::storage::DocumentClient;

/// Request to register a social account
#[derive(Debug, Clone, Default)]
pub struct RegisterAccountRequest {
    pub id: String,
    pub spread_id: String,
    /// Plain password, empty for none
    pub password: String,
    pub access_token: String,
    pub access_secret: String,
}

/// Registers accounts together with their subscription record
#[derive(Debug)]
pub struct AccountService<H: PasswordHasher> {
    client: DocumentClient,
    hasher: Arc<H>,
    cipher: Option<SecretCipher>,
}

impl<H: PasswordHasher> AccountService<H> {
    pub fn new(client: DocumentClient, hasher: Arc<H>) -> Self {
        Self {
            client,
            hasher,
            cipher: None,
        }
    }

    /// Stores access tokens encrypted with the given cipher
    pub fn with_cipher(mut self, cipher: SecretCipher) -> Self {
        self.cipher = Some(cipher);
        self
    }

    /// Registers an account on the free plan. Its subscription starts
    /// unsubscribed with no quota until a plan is assigned.
    ///
    /// `known` are accounts already loaded by the caller; a clash on their
    /// spreadsheet or account id is rejected, as is an account id that is
    /// already in the store.
    pub async fn register(
        &self,
        request: RegisterAccountRequest,
        known: &[Account],
    ) -> Result<Account, DomainError> {
        if request.id.is_empty() {
            return Err(DomainError::validation("Account id is required"));
        }

        check_duplicate_account(&request.id, &request.spread_id, known)?;

        let taken = self
            .client
            .existing_keys::<Account>(std::slice::from_ref(&request.id))
            .await?;
        if !taken.is_empty() {
            return Err(DomainError::conflict(format!(
                "Account id '{}' is already registered",
                request.id
            )));
        }

        let mut account = Account::new(
            request.id,
            request.spread_id,
            request.access_token,
            request.access_secret,
        );

        if !request.password.is_empty() {
            account.password = self.hasher.hash(&request.password)?;
        }

        if let Some(cipher) = &self.cipher {
            account.access_token = cipher.encrypt(&account.access_token)?;
            account.access_secret = cipher.encrypt(&account.access_secret)?;
            debug!(account_id = %account.id, "Encrypted access tokens");
        }

        // the account document is what marks the id as taken, so it goes last
        let account_id = account.id.clone();
        self.client
            .save(Subscription::new(account_id.clone()), &IdentityKey)
            .await?;

        let account = match self.client.save(account, &IdentityKey).await {
            Ok(account) => account,
            Err(e) => {
                if let Err(cleanup) = self.client.delete::<Subscription>(&account_id).await {
                    warn!(account_id = %account_id, error = %cleanup, "Failed to remove subscription");
                }
                return Err(e);
            }
        };

        info!(account_id = %account.id, plan = %account.subscribed, "Account registered");
        Ok(account)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Account>, DomainError> {
        self.client.load(id).await
    }

    /// Checks a password against the stored hash. Unknown accounts and
    /// accounts without a password never authenticate.
    pub async fn verify_password(&self, id: &str, password: &str) -> Result<bool, DomainError> {
        let Some(account) = self.get(id).await? else {
            return Ok(false);
        };

        if account.password.is_empty() {
            return Ok(false);
        }

        Ok(self.hasher.verify(password, &account.password))
    }

    /// Access token and secret in plain text
    pub fn reveal_tokens(&self, account: &Account) -> Result<(String, String), DomainError> {
        match &self.cipher {
            Some(cipher) => Ok((
                cipher.decrypt(&account.access_token)?,
                cipher.decrypt(&account.access_secret)?,
            )),
            None => Ok((account.access_token.clone(), account.access_secret.clone())),
        }
    }

    /// Removes an account and its subscription
    pub async fn remove(&self, id: &str) -> Result<bool, DomainError> {
        let removed = self.client.delete::<Account>(id).await?;
        self.client.delete::<Subscription>(id).await?;

        if removed {
            info!(account_id = %id, "Account removed");
        }
        Ok(removed)
    }
}
