//! Plan and subscription snapshots.
//!
//! These are read-only views of billing terms at the moment an operator opens
//! the plan-change dialog. They are built once at the ingestion boundary
//! (see [`crate::records`]) and never mutated by the calculation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::daily_rate;
use crate::PlanId;

/// Billing terms of a plan at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSnapshot {
    /// Plan identifier, when the plan directory supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PlanId>,

    /// Display name, when the plan directory supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Price for one full period, in currency units.
    pub price: Decimal,

    /// Length of one billing period in days.
    pub period_days: i64,
}

impl PlanSnapshot {
    /// Create an anonymous snapshot from price and period.
    #[must_use]
    pub const fn new(price: Decimal, period_days: i64) -> Self {
        Self {
            id: None,
            name: None,
            price,
            period_days,
        }
    }

    /// Attach the plan identifier.
    #[must_use]
    pub fn with_id(mut self, id: PlanId) -> Self {
        self.id = Some(id);
        self
    }

    /// Attach the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Price per day, rounded to cents (zero when the period is not positive).
    #[must_use]
    pub fn daily_rate(&self) -> Decimal {
        daily_rate(self.price, self.period_days)
    }
}

/// A user's active subscription billing state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionState {
    /// The plan the user is currently on.
    pub current_plan: PlanSnapshot,

    /// When the current plan expires. `None` means nothing is left to prorate.
    pub expires_at: Option<DateTime<Utc>>,
}

impl SubscriptionState {
    /// Create a subscription state.
    #[must_use]
    pub fn new(current_plan: PlanSnapshot, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            current_plan,
            expires_at,
        }
    }
}
