//! Core types and calculations for PABX plan billing.
//!
//! This crate provides the billing logic behind the admin and reseller
//! dashboards' "change plan" dialog:
//!
//! - **Identifiers**: `UserId`, `PlanId`
//! - **Plans**: `PlanSnapshot`, `SubscriptionState`
//! - **Ingestion**: `PlanRecord`, `SubscriptionRecord` (loosely typed backend JSON)
//! - **Proration**: `calculate_plan_change`, `compare_plans`, `ProrationResult`
//!
//! # Money
//!
//! Amounts are `rust_decimal::Decimal` in currency units (not cents), rounded
//! half-up to two decimals after every arithmetic step.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod ids;
pub mod money;
pub mod plan;
pub mod proration;
pub mod records;

pub use error::{BillingError, Result};
pub use ids::{IdError, PlanId, UserId};
pub use money::{daily_rate, round2};
pub use plan::{PlanSnapshot, SubscriptionState};
pub use proration::{
    calculate_plan_change, compare_plans, remaining_days, PlanChangeKind, PlanComparison,
    ProrationResult,
};
pub use records::{NumericField, PlanRecord, SubscriptionRecord};
