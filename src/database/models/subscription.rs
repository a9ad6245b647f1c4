use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::macros::string_enum;

/// Per-user subscription; users without a row are on the basic plan.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subscription {
    pub user_id: String,
    pub plan: Plan,
    pub status: SubscriptionStatus,
    pub updated_at: DateTime<Utc>,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
    #[serde(rename_all = "lowercase")]
    pub enum Plan {
        #[default]
        Basic => "basic",
        Standard => "standard",
        Pro => "pro",
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
    #[serde(rename_all = "lowercase")]
    pub enum SubscriptionStatus {
        #[default]
        Active => "active",
        Cancelled => "cancelled",
    }
}

/// Site and worker caps for a plan. `None` means unlimited.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanLimits {
    pub max_sites: Option<i64>,
    pub max_workers: Option<i64>,
}

impl Plan {
    pub fn limits(&self) -> PlanLimits {
        match self {
            Plan::Basic => PlanLimits {
                max_sites: Some(1),
                max_workers: Some(10),
            },
            Plan::Standard => PlanLimits {
                max_sites: Some(5),
                max_workers: Some(50),
            },
            Plan::Pro => PlanLimits {
                max_sites: None,
                max_workers: None,
            },
        }
    }
}

impl Subscription {
    pub fn basic(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            plan: Plan::Basic,
            status: SubscriptionStatus::Active,
            updated_at: Utc::now(),
        }
    }

    /// Limits in force; a cancelled paid plan falls back to basic.
    pub fn effective_limits(&self) -> PlanLimits {
        match self.status {
            SubscriptionStatus::Active => self.plan.limits(),
            SubscriptionStatus::Cancelled => Plan::Basic.limits(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionInput {
    pub plan: Plan,
    pub status: Option<SubscriptionStatus>,
}
