//! Quota service - plan assignment and usage accounting

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone};
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, info, warn};

use crate::domain::storage::IdentityKey;
use crate::domain::{Account, Channel, Count, DomainError, Plan, Subscription};
use crate::infrastructure::storage::DocumentClient;

/// Outcome of recording one use of a channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaDecision {
    pub account_id: String,
    pub channel: Channel,
    pub plan: Plan,
    /// Usage including the use just recorded
    pub used: Count,
    pub limit: Count,
    /// False once any counter has gone past its limit
    pub allowed: bool,
}

/// Loads, updates and persists subscriptions.
///
/// Updates to one account are serialized; different accounts proceed
/// independently.
#[derive(Debug)]
pub struct QuotaService {
    client: DocumentClient,
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl QuotaService {
    pub fn new(client: DocumentClient) -> Self {
        Self {
            client,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, account_id: &str) -> Result<Arc<tokio::sync::Mutex<()>>, DomainError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|e| DomainError::internal(format!("Failed to acquire lock table: {}", e)))?;

        Ok(locks.entry(account_id.to_string()).or_default().clone())
    }

    /// Waits for exclusive access to one account's records
    async fn lock_account(&self, account_id: &str) -> Result<AccountLock<'_>, DomainError> {
        let guard = self.lock_for(account_id)?.lock_owned().await;

        Ok(AccountLock {
            locks: &self.locks,
            account_id: account_id.to_string(),
            guard: Some(guard),
        })
    }

    #[cfg(test)]
    fn tracked_accounts(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or_default()
    }

    /// Current subscription of an account
    pub async fn status(&self, account_id: &str) -> Result<Subscription, DomainError> {
        self.client.load(account_id).await?.ok_or_else(|| {
            DomainError::not_found(format!("Subscription '{}' not found", account_id))
        })
    }

    /// Moves an account to a plan, creating the subscription if needed.
    /// Usage counters carry over. The account record is updated first and
    /// put back if the subscription cannot be saved.
    pub async fn assign_plan(
        &self,
        account_id: &str,
        plan: Plan,
    ) -> Result<Subscription, DomainError> {
        let _lock = self.lock_account(account_id).await?;

        let mut subscription = self
            .client
            .load::<Subscription>(account_id)
            .await?
            .unwrap_or_else(|| Subscription::new(account_id));
        subscription.set_plan(plan);

        let account = self.client.load::<Account>(account_id).await?;
        match &account {
            Some(account) => {
                let mut updated = account.clone();
                updated.set_subscribed(plan);
                self.client.save(updated, &IdentityKey).await?;
            }
            None => warn!(account_id = %account_id, "Plan assigned without an account record"),
        }

        let subscription = match self.client.save(subscription, &IdentityKey).await {
            Ok(subscription) => subscription,
            Err(e) => {
                if let Some(account) = account {
                    if let Err(restore) = self.client.save(account, &IdentityKey).await {
                        warn!(account_id = %account_id, error = %restore, "Failed to restore account plan");
                    }
                }
                return Err(e);
            }
        };

        info!(account_id = %account_id, plan = %plan, "Plan assigned");
        Ok(subscription)
    }

    /// Records one use of `channel` at `now` and reports whether the account
    /// is still within its limits. The use is persisted either way.
    pub async fn consume<Tz: TimeZone>(
        &self,
        account_id: &str,
        channel: Channel,
        now: &DateTime<Tz>,
    ) -> Result<QuotaDecision, DomainError> {
        let _lock = self.lock_account(account_id).await?;

        let mut subscription = self.status(account_id).await?;
        subscription.record_use(channel, now);
        let subscription = self.client.save(subscription, &IdentityKey).await?;

        let managed = subscription.managed(channel);
        let decision = QuotaDecision {
            account_id: account_id.to_string(),
            channel,
            plan: subscription.plan(),
            used: managed.used(),
            limit: managed.limit(),
            allowed: !managed.is_over_limit(),
        };

        if decision.allowed {
            debug!(
                account_id = %account_id,
                channel = %channel,
                used = %decision.used,
                "Quota consumed"
            );
        } else {
            warn!(
                account_id = %account_id,
                channel = %channel,
                used = %decision.used,
                limit = %decision.limit,
                "Quota exceeded"
            );
        }

        Ok(decision)
    }
}

/// Held while an account's records are being updated. Dropping it releases
/// the account and forgets its lock once nobody else is waiting on it.
struct AccountLock<'a> {
    locks: &'a Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
    account_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for AccountLock<'_> {
    fn drop(&mut self) {
        self.guard.take();

        let Ok(mut locks) = self.locks.lock() else {
            return;
        };
        if locks
            .get(&self.account_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.account_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::storage::MockDocumentStore;
    use crate::infrastructure::storage::InMemoryDocumentStore;
    use chrono::Utc;

    fn service() -> QuotaService {
        QuotaService::new(DocumentClient::new(Arc::new(InMemoryDocumentStore::new())))
    }

    fn at(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, d, h, m, 0).unwrap()
    }

    #[tokio::test]
    async fn test_assign_plan_creates_subscription() {
        let service = service();

        let subscription = service.assign_plan("x-1", Plan::Basic).await.unwrap();

        assert_eq!(subscription.plan(), Plan::Basic);
        assert_eq!(subscription.managed(Channel::Gui).limit(), Count::new(30, 1, 1));
        assert_eq!(service.status("x-1").await.unwrap(), subscription);
    }

    #[tokio::test]
    async fn test_assign_plan_updates_account() {
        let client = DocumentClient::new(Arc::new(InMemoryDocumentStore::new()));
        client
            .save(Account::new("x-1", "sheet-1", "t", "s"), &IdentityKey)
            .await
            .unwrap();
        let service = QuotaService::new(client.clone());

        service.assign_plan("x-1", Plan::Pro).await.unwrap();

        let account: Account = client.load("x-1").await.unwrap().unwrap();
        assert_eq!(account.subscribed, Plan::Pro);
    }

    #[tokio::test]
    async fn test_assign_plan_keeps_usage() {
        let service = service();
        service.assign_plan("x-1", Plan::Free).await.unwrap();
        service.consume("x-1", Channel::Api, &at(13, 9, 0)).await.unwrap();

        let subscription = service.assign_plan("x-1", Plan::Basic).await.unwrap();
        assert_eq!(subscription.managed(Channel::Api).used(), Count::new(1, 1, 1));
    }

    #[tokio::test]
    async fn test_consume_free_api_hourly_limit() {
        let service = service();
        service.assign_plan("x-1", Plan::Free).await.unwrap();

        let first = service.consume("x-1", Channel::Api, &at(13, 9, 0)).await.unwrap();
        assert!(first.allowed);
        assert_eq!(first.used, Count::new(1, 1, 1));
        assert_eq!(first.limit, Count::new(50, 3, 1));

        let second = service.consume("x-1", Channel::Api, &at(13, 9, 30)).await.unwrap();
        assert!(!second.allowed);
        assert_eq!(second.used, Count::new(2, 2, 2));

        // next hour resets the hourly counter
        let third = service.consume("x-1", Channel::Api, &at(13, 10, 0)).await.unwrap();
        assert!(third.allowed);
        assert_eq!(third.used, Count::new(3, 3, 1));
    }

    #[tokio::test]
    async fn test_consume_persists() {
        let service = service();
        service.assign_plan("x-1", Plan::Basic).await.unwrap();

        service.consume("x-1", Channel::Gui, &at(13, 9, 0)).await.unwrap();

        let subscription = service.status("x-1").await.unwrap();
        assert_eq!(subscription.managed(Channel::Gui).used(), Count::new(1, 1, 1));
        assert_eq!(subscription.managed(Channel::Gui).last_used_at(), Some(at(13, 9, 0)));
        assert!(subscription.managed(Channel::Api).used().is_zero());
    }

    #[tokio::test]
    async fn test_consume_unknown_account() {
        let service = service();

        let result = service.consume("nobody", Channel::Api, &at(13, 9, 0)).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
        assert_eq!(service.tracked_accounts(), 0);
    }

    #[tokio::test]
    async fn test_locks_released_after_use() {
        let service = service();

        for i in 0..10 {
            let account_id = format!("x-{}", i);
            service.assign_plan(&account_id, Plan::Free).await.unwrap();
            service.consume(&account_id, Channel::Api, &at(13, 9, 0)).await.unwrap();
        }

        assert_eq!(service.tracked_accounts(), 0);
    }

    #[tokio::test]
    async fn test_assign_plan_restores_account_when_subscription_fails() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let account = serde_json::to_value(Account::new("x-1", "sheet-1", "t", "s")).unwrap();

        let mut mock = MockDocumentStore::new();
        mock.expect_get_document().returning(move |collection, _| {
            Ok((collection == "accounts").then(|| account.clone()))
        });
        let log = written.clone();
        mock.expect_set_document().returning(move |collection, _, document| {
            if collection == "subscriptions" {
                return Err(DomainError::storage("write rejected"));
            }
            log.lock().unwrap().push(document["subscribed"].as_u64());
            Ok(())
        });
        let service = QuotaService::new(DocumentClient::new(Arc::new(mock)));

        let result = service.assign_plan("x-1", Plan::Pro).await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
        // Pro written, then Free put back
        assert_eq!(*written.lock().unwrap(), vec![Some(3), Some(1)]);
    }

    #[tokio::test]
    async fn test_concurrent_consume_counts_every_use() {
        let service = Arc::new(service());
        service.assign_plan("x-1", Plan::Pro).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..20 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.consume("x-1", Channel::Api, &at(13, 9, 0)).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let subscription = service.status("x-1").await.unwrap();
        assert_eq!(subscription.managed(Channel::Api).used(), Count::new(20, 20, 20));
        assert_eq!(service.tracked_accounts(), 0);
    }
}
