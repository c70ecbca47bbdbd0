//! Subscription record and the rolling usage counters

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::plan::{Channel, Count, Plan};
use crate::domain::storage::StorageEntity;

/// Limit and usage bookkeeping for one channel
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Managed {
    #[serde(default, skip_serializing_if = "Count::is_zero")]
    limit: Count,
    #[serde(default, skip_serializing_if = "Count::is_zero")]
    used: Count,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_used_at: Option<DateTime<Utc>>,
}

impl Managed {
    pub fn limit(&self) -> Count {
        self.limit
    }

    pub fn used(&self) -> Count {
        self.used
    }

    pub fn last_used_at(&self) -> Option<DateTime<Utc>> {
        self.last_used_at
    }

    pub fn is_over_limit(&self) -> bool {
        self.used.exceeds(&self.limit)
    }

    fn is_empty(&self) -> bool {
        self.limit.is_zero() && self.used.is_zero() && self.last_used_at.is_none()
    }

    /// Counts one use at `now`, first clearing any window whose calendar
    /// unit changed since the previous use. Calendar fields are read in the
    /// time zone of `now`.
    fn record_use<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) {
        if let Some(last) = self.last_used_at {
            let last = last.with_timezone(&now.timezone());

            let month_changed = now.month() != last.month();
            let day_changed = month_changed || now.day() != last.day();
            let hour_changed = day_changed || now.hour() != last.hour();

            if month_changed {
                self.used.monthly = 0;
            }
            if day_changed {
                self.used.daily = 0;
            }
            if hour_changed {
                self.used.hourly = 0;
            }
        }

        self.used.increment();
        self.last_used_at = Some(now.with_timezone(&Utc));
    }
}

/// Per-account subscription state, keyed by the account id
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    id: String,
    #[serde(default, skip_serializing_if = "Plan::is_unsubscribed")]
    plan: Plan,
    #[serde(default, skip_serializing_if = "Managed::is_empty")]
    managed_gui: Managed,
    #[serde(default, skip_serializing_if = "Managed::is_empty")]
    managed_api: Managed,
}

impl Subscription {
    /// Fresh subscription for a newly registered account: unsubscribed, no usage
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            id: account_id.into(),
            ..Default::default()
        }
    }

    pub fn account_id(&self) -> &str {
        &self.id
    }

    pub fn plan(&self) -> Plan {
        self.plan
    }

    pub fn managed(&self, channel: Channel) -> &Managed {
        match channel {
            Channel::Gui => &self.managed_gui,
            Channel::Api => &self.managed_api,
        }
    }

    fn managed_mut(&mut self, channel: Channel) -> &mut Managed {
        match channel {
            Channel::Gui => &mut self.managed_gui,
            Channel::Api => &mut self.managed_api,
        }
    }

    /// Switches plan and re-derives both limit triples. Usage is left alone,
    /// so an upgrade mid-month keeps the month's count.
    pub fn set_plan(&mut self, plan: Plan) -> &mut Self {
        let limits = plan.limits();

        self.plan = plan;
        self.managed_gui.limit = limits.gui;
        self.managed_api.limit = limits.api;
        self
    }

    pub fn record_use<Tz: TimeZone>(&mut self, channel: Channel, now: &DateTime<Tz>) {
        self.managed_mut(channel).record_use(now);
    }

    /// Usage equal to the limit is still allowed; only the use past it trips this.
    pub fn is_over_limit(&self, channel: Channel) -> bool {
        self.managed(channel).is_over_limit()
    }
}

impl StorageEntity for Subscription {
    const COLLECTION: &'static str = "subscriptions";

    fn key(&self) -> &str {
        &self.id
    }
}
