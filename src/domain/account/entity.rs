//! Account and OAuth claim records

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::storage::StorageEntity;
use crate::domain::subscription::Plan;
use crate::domain::text::mask;
use crate::domain::DomainError;

/// A customer's linked social account. Keyed by the social account id, so
/// one social account can be registered only once.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Account {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uuid: String,
    /// Social account id
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Password hash
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    /// Spreadsheet the account's posts are managed in
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub spread_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub access_token: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub access_secret: String,
    #[serde(default, skip_serializing_if = "Plan::is_unsubscribed")]
    pub subscribed: Plan,
}

impl Account {
    /// New sign-up on the free plan, with a fresh UUID and no password
    pub fn new(
        id: impl Into<String>,
        spread_id: impl Into<String>,
        access_token: impl Into<String>,
        access_secret: impl Into<String>,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4().to_string(),
            id: id.into(),
            password: String::new(),
            spread_id: spread_id.into(),
            access_token: access_token.into(),
            access_secret: access_secret.into(),
            subscribed: Plan::Free,
        }
    }

    pub fn set_subscribed(&mut self, plan: Plan) -> &mut Self {
        self.subscribed = plan;
        self
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("uuid", &self.uuid)
            .field("id", &self.id)
            .field("spread_id", &self.spread_id)
            .field("access_token", &mask(&self.access_token))
            .field("access_secret", &mask(&self.access_secret))
            .field("subscribed", &self.subscribed)
            .finish_non_exhaustive()
    }
}

impl StorageEntity for Account {
    const COLLECTION: &'static str = "accounts";

    fn key(&self) -> &str {
        &self.id
    }
}

/// Rejects a sign-up whose spreadsheet or social account is already taken
pub fn check_duplicate_account(
    id: &str,
    spread_id: &str,
    accounts: &[Account],
) -> Result<(), DomainError> {
    for account in accounts {
        if account.spread_id == spread_id {
            return Err(DomainError::conflict(format!(
                "Spread id '{}' is already registered",
                spread_id
            )));
        }

        if account.id == id {
            return Err(DomainError::conflict(format!(
                "Account id '{}' is already registered",
                id
            )));
        }
    }

    Ok(())
}

/// OAuth handshake state for linking a social account
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub access_token: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub access_secret: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub request_token: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub request_token_secret: String,
    /// Page the user came from
    #[serde(rename = "ref", default, skip_serializing_if = "String::is_empty")]
    pub referer: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub classification: String,
}

impl std::fmt::Debug for Claims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Claims")
            .field("id", &self.id)
            .field("access_token", &mask(&self.access_token))
            .field("request_token", &mask(&self.request_token))
            .field("ref", &self.referer)
            .field("classification", &self.classification)
            .finish_non_exhaustive()
    }
}

impl StorageEntity for Claims {
    const COLLECTION: &'static str = "claims";

    fn key(&self) -> &str {
        &self.id
    }
}
