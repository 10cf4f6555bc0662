//! Ingestion of loosely typed backend records.
//!
//! Plans and subscriptions reach the dashboards from more than one backend
//! shape: the REST API speaks camelCase, the database views speak snake_case,
//! and prices sometimes arrive as strings. All of that is resolved here, once,
//! into [`PlanSnapshot`] and [`SubscriptionState`]. The calculation never
//! looks at raw JSON.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{BillingError, Result};
use crate::plan::{PlanSnapshot, SubscriptionState};
use crate::PlanId;

/// A number that may be sent as a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    /// A JSON number.
    Number(serde_json::Number),
    /// A JSON string holding a number, e.g. `"49.90"`.
    Text(String),
}

impl NumericField {
    fn to_decimal(&self, field: &'static str) -> Result<Decimal> {
        let raw = match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.trim().to_string(),
        };
        Decimal::from_str(&raw)
            .or_else(|_| Decimal::from_scientific(&raw))
            .map_err(|_| BillingError::InvalidAmount { field, value: raw })
    }

    fn raw(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// A plan as returned by the plan directory.
///
/// `periodDays` takes precedence over `period_days` when both are present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanRecord {
    /// Plan identifier.
    #[serde(default)]
    pub id: Option<String>,

    /// Display name.
    #[serde(default)]
    pub name: Option<String>,

    /// Price for one period.
    #[serde(default)]
    pub price: Option<NumericField>,

    /// Period length in days (camelCase shape).
    #[serde(default, rename = "periodDays")]
    pub period_days_camel: Option<NumericField>,

    /// Period length in days (snake_case shape).
    #[serde(default)]
    pub period_days: Option<NumericField>,
}

impl TryFrom<PlanRecord> for PlanSnapshot {
    type Error = BillingError;

    fn try_from(record: PlanRecord) -> Result<Self> {
        let price = record
            .price
            .as_ref()
            .ok_or(BillingError::MissingField("price"))?
            .to_decimal("price")?;
        if price.is_sign_negative() {
            return Err(BillingError::InvalidAmount {
                field: "price",
                value: price.to_string(),
            });
        }

        let period = record
            .period_days_camel
            .as_ref()
            .or(record.period_days.as_ref())
            .ok_or(BillingError::MissingField("period_days"))?;
        let period_days = parse_period(period)?;

        let mut snapshot = Self::new(price, period_days);
        if let Some(id) = record.id.as_deref().filter(|id| !id.trim().is_empty()) {
            snapshot = snapshot.with_id(PlanId::from_str(id)?);
        }
        if let Some(name) = record.name {
            snapshot = snapshot.with_name(name);
        }
        Ok(snapshot)
    }
}

/// Period lengths must be whole days; zero and negatives are passed through.
fn parse_period(period: &NumericField) -> Result<i64> {
    let invalid = || BillingError::InvalidPeriod {
        field: "period_days",
        value: period.raw(),
    };
    let value = period.to_decimal("period_days").map_err(|_| invalid())?;
    if !value.fract().is_zero() {
        return Err(invalid());
    }
    value.to_i64().ok_or_else(invalid)
}

/// A user's subscription as returned by the user service.
///
/// `expiresAt` takes precedence over `expires_at`. An empty string or null
/// means the subscription has no expiration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscriptionRecord {
    /// The plan the user is on.
    #[serde(default, alias = "currentPlan")]
    pub current_plan: Option<PlanRecord>,

    /// Expiration (camelCase shape).
    #[serde(default, rename = "expiresAt")]
    pub expires_at_camel: Option<String>,

    /// Expiration (snake_case shape).
    #[serde(default)]
    pub expires_at: Option<String>,
}

impl TryFrom<SubscriptionRecord> for SubscriptionState {
    type Error = BillingError;

    fn try_from(record: SubscriptionRecord) -> Result<Self> {
        let current_plan: PlanSnapshot = record
            .current_plan
            .ok_or(BillingError::MissingField("current_plan"))?
            .try_into()?;

        let raw = record
            .expires_at_camel
            .as_deref()
            .or(record.expires_at.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let expires_at = raw.map(|s| parse_timestamp("expires_at", s)).transpose()?;

        Ok(Self::new(current_plan, expires_at))
    }
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339, a naive date-time (taken as UTC) and a bare date
/// (midnight UTC).
fn parse_timestamp(field: &'static str, raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(BillingError::InvalidTimestamp {
        field,
        value: raw.to_string(),
    })
}
