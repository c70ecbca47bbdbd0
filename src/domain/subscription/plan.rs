//! Subscription plans, usage channels and the plan limit table

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Subscription tier. Persisted as a small integer (0 = Unsubscribed .. 3 = Pro).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Plan {
    #[default]
    Unsubscribed,
    Free,
    Basic,
    Pro,
}

impl Plan {
    pub const ALL: [Plan; 4] = [Plan::Unsubscribed, Plan::Free, Plan::Basic, Plan::Pro];

    /// Usage ceilings granted by this plan
    pub fn limits(self) -> PlanLimits {
        match self {
            Self::Unsubscribed => PlanLimits {
                gui: Count::ZERO,
                api: Count::ZERO,
            },
            Self::Free => PlanLimits {
                gui: Count::ZERO,
                api: Count::new(50, 3, 1),
            },
            Self::Basic => PlanLimits {
                gui: Count::new(30, 1, 1),
                api: Count::new(10_000, 1_000, 100),
            },
            // GUI posting is not part of Pro
            Self::Pro => PlanLimits {
                gui: Count::ZERO,
                api: Count::new(10_000, 1_000, 100),
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unsubscribed => "unsubscribed",
            Self::Free => "free",
            Self::Basic => "basic",
            Self::Pro => "pro",
        }
    }

    pub(crate) fn is_unsubscribed(&self) -> bool {
        matches!(self, Self::Unsubscribed)
    }
}

impl TryFrom<u8> for Plan {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Unsubscribed),
            1 => Ok(Self::Free),
            2 => Ok(Self::Basic),
            3 => Ok(Self::Pro),
            other => Err(DomainError::validation(format!(
                "Unknown subscription plan: {}",
                other
            ))),
        }
    }
}

impl From<Plan> for u8 {
    fn from(plan: Plan) -> Self {
        match plan {
            Plan::Unsubscribed => 0,
            Plan::Free => 1,
            Plan::Basic => 2,
            Plan::Pro => 3,
        }
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Plan {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unsubscribed" | "none" => Ok(Self::Unsubscribed),
            "free" => Ok(Self::Free),
            "basic" => Ok(Self::Basic),
            "pro" => Ok(Self::Pro),
            other => Err(DomainError::validation(format!(
                "Unknown subscription plan: {}",
                other
            ))),
        }
    }
}

/// Usage channel, metered independently per account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Posting driven from the web UI
    Gui,
    /// Programmatic access
    Api,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gui => "gui",
            Self::Api => "api",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Monthly, daily and hourly counts. Used both as a limit triple and as usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Count {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub monthly: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub daily: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub hourly: u32,
}

impl Count {
    pub const ZERO: Count = Count::new(0, 0, 0);

    pub const fn new(monthly: u32, daily: u32, hourly: u32) -> Self {
        Self {
            monthly,
            daily,
            hourly,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// True if any window of `self` is strictly above the same window of `limit`
    pub fn exceeds(&self, limit: &Count) -> bool {
        self.monthly > limit.monthly || self.daily > limit.daily || self.hourly > limit.hourly
    }

    pub(crate) fn increment(&mut self) {
        self.monthly = self.monthly.saturating_add(1);
        self.daily = self.daily.saturating_add(1);
        self.hourly = self.hourly.saturating_add(1);
    }
}

impl std::fmt::Display for Count {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.monthly, self.daily, self.hourly)
    }
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

/// Limit triples for both channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanLimits {
    pub gui: Count,
    pub api: Count,
}

impl PlanLimits {
    pub fn for_channel(&self, channel: Channel) -> Count {
        match channel {
            Channel::Gui => self.gui,
            Channel::Api => self.api,
        }
    }
}
