//! Proportional plan-change calculation.
//!
//! When an operator switches a user to another plan mid-cycle, the expiration
//! date stays where it is. The user is credited for the days left on the
//! current plan and charged the new plan's daily rate for the same days. The
//! difference, floored at zero, is what the finance service collects today.
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, Utc};
//! use pabx_billing_core::{calculate_plan_change, PlanSnapshot, SubscriptionState};
//! use rust_decimal::Decimal;
//!
//! let today = Utc::now();
//! let current = SubscriptionState::new(
//!     PlanSnapshot::new(Decimal::from(30), 30),
//!     Some(today + Duration::days(15)),
//! );
//! let candidate = PlanSnapshot::new(Decimal::from(90), 30);
//!
//! let result = calculate_plan_change(&current, &candidate, today);
//! assert_eq!(result.remaining_days, 15);
//! assert_eq!(result.amount_due_today.to_string(), "30.00");
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::round2;
use crate::plan::{PlanSnapshot, SubscriptionState};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Figures of a plan-change preview. Derived on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProrationResult {
    /// Whole days left until expiration (partial days count as a full day).
    pub remaining_days: u32,

    /// Daily rate of the current plan.
    pub current_daily_rate: Decimal,

    /// Daily rate of the candidate plan.
    pub new_daily_rate: Decimal,

    /// Value of the unused days on the current plan.
    pub credit_from_current_plan: Decimal,

    /// Cost of the candidate plan for the remaining days.
    pub proportional_new_plan_cost: Decimal,

    /// One-time amount to collect now. Never negative.
    pub amount_due_today: Decimal,

    /// The expiration the subscription keeps after the change.
    pub maintained_expiration: DateTime<Utc>,
}

impl ProrationResult {
    /// Signed difference between the new cost and the credit.
    ///
    /// Negative when the unused credit exceeds the new cost. That surplus is
    /// not refunded; `amount_due_today` is zero in that case.
    #[must_use]
    pub fn net_change(&self) -> Decimal {
        round2(self.proportional_new_plan_cost - self.credit_from_current_plan)
    }

    /// Whether switching would charge the user anything today.
    #[must_use]
    pub fn is_chargeable(&self) -> bool {
        self.amount_due_today > Decimal::ZERO
    }
}

/// Direction of a plan change, judged by daily rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanChangeKind {
    /// The candidate costs more per day.
    Upgrade,
    /// The candidate costs less per day.
    Downgrade,
    /// Same daily rate.
    Lateral,
}

impl PlanChangeKind {
    /// Classify a change from one daily rate to another.
    #[must_use]
    pub fn from_rates(current_daily_rate: Decimal, new_daily_rate: Decimal) -> Self {
        match new_daily_rate.cmp(&current_daily_rate) {
            std::cmp::Ordering::Greater => Self::Upgrade,
            std::cmp::Ordering::Less => Self::Downgrade,
            std::cmp::Ordering::Equal => Self::Lateral,
        }
    }
}

/// One candidate plan with its preview figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanComparison {
    /// The plan being considered.
    pub candidate: PlanSnapshot,
    /// Upgrade, downgrade or lateral move.
    pub kind: PlanChangeKind,
    /// The preview figures.
    pub result: ProrationResult,
}

/// Days left until `expires_at`, rounded up.
///
/// Zero when there is no expiration or it is not in the future.
#[must_use]
pub fn remaining_days(expires_at: Option<DateTime<Utc>>, today: DateTime<Utc>) -> u32 {
    let Some(expires_at) = expires_at else {
        return 0;
    };

    let millis = expires_at.signed_duration_since(today).num_milliseconds();
    if millis <= 0 {
        return 0;
    }

    let days = (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY;
    u32::try_from(days).unwrap_or(u32::MAX)
}

/// Preview switching `current` to `candidate` at `today`.
///
/// Each figure is rounded to cents before the next one is derived from it.
/// The function is total: missing expirations and non-positive periods
/// contribute zero rather than failing.
#[must_use]
pub fn calculate_plan_change(
    current: &SubscriptionState,
    candidate: &PlanSnapshot,
    today: DateTime<Utc>,
) -> ProrationResult {
    let remaining_days = remaining_days(current.expires_at, today);
    let days = Decimal::from(remaining_days);

    let current_daily_rate = current.current_plan.daily_rate();
    let credit_from_current_plan = if remaining_days > 0 {
        round2(days.saturating_mul(current_daily_rate))
    } else {
        round2(Decimal::ZERO)
    };

    let new_daily_rate = candidate.daily_rate();
    let proportional_new_plan_cost = if remaining_days > 0 {
        round2(days.saturating_mul(new_daily_rate))
    } else {
        round2(Decimal::ZERO)
    };

    let difference = round2(proportional_new_plan_cost - credit_from_current_plan);
    let amount_due_today = difference.max(round2(Decimal::ZERO));

    ProrationResult {
        remaining_days,
        current_daily_rate,
        new_daily_rate,
        credit_from_current_plan,
        proportional_new_plan_cost,
        amount_due_today,
        maintained_expiration: current.expires_at.unwrap_or(today),
    }
}

/// Preview every candidate against the same subscription, in input order.
#[must_use]
pub fn compare_plans(
    current: &SubscriptionState,
    candidates: &[PlanSnapshot],
    today: DateTime<Utc>,
) -> Vec<PlanComparison> {
    candidates
        .iter()
        .map(|candidate| {
            let result = calculate_plan_change(current, candidate, today);
            PlanComparison {
                candidate: candidate.clone(),
                kind: PlanChangeKind::from_rates(result.current_daily_rate, result.new_daily_rate),
                result,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn today() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 14, 30, 0).unwrap()
    }

    fn subscription(price: Decimal, period_days: i64, days_left: i64) -> SubscriptionState {
        SubscriptionState::new(
            PlanSnapshot::new(price, period_days),
            Some(today() + Duration::days(days_left)),
        )
    }

    #[test]
    fn lateral_change_costs_nothing() {
        let current = subscription(dec!(90), 30, 10);
        let result = calculate_plan_change(&current, &PlanSnapshot::new(dec!(90), 30), today());

        assert_eq!(result.remaining_days, 10);
        assert_eq!(result.current_daily_rate, dec!(3.00));
        assert_eq!(result.new_daily_rate, dec!(3.00));
        assert_eq!(result.credit_from_current_plan, dec!(30.00));
        assert_eq!(result.proportional_new_plan_cost, dec!(30.00));
        assert_eq!(result.amount_due_today, dec!(0.00));
        assert!(!result.is_chargeable());
    }

    #[test]
    fn upgrade_mid_cycle_charges_the_difference() {
        let current = subscription(dec!(30), 30, 15);
        let result = calculate_plan_change(&current, &PlanSnapshot::new(dec!(90), 30), today());

        assert_eq!(result.remaining_days, 15);
        assert_eq!(result.current_daily_rate, dec!(1.00));
        assert_eq!(result.new_daily_rate, dec!(3.00));
        assert_eq!(result.credit_from_current_plan, dec!(15.00));
        assert_eq!(result.proportional_new_plan_cost, dec!(45.00));
        assert_eq!(result.amount_due_today, dec!(30.00));
        assert_eq!(result.net_change(), dec!(30.00));
        assert!(result.is_chargeable());
    }

    #[test]
    fn downgrade_mid_cycle_is_floored_at_zero() {
        let current = subscription(dec!(90), 30, 15);
        let result = calculate_plan_change(&current, &PlanSnapshot::new(dec!(30), 30), today());

        assert_eq!(result.credit_from_current_plan, dec!(45.00));
        assert_eq!(result.proportional_new_plan_cost, dec!(15.00));
        assert_eq!(result.amount_due_today, dec!(0.00));
        assert_eq!(result.net_change(), dec!(-30.00));
    }

    #[test]
    fn missing_expiration_collapses_to_zero() {
        let current = SubscriptionState::new(PlanSnapshot::new(dec!(30), 30), None);
        let result = calculate_plan_change(&current, &PlanSnapshot::new(dec!(900), 30), today());

        assert_eq!(result.remaining_days, 0);
        assert_eq!(result.credit_from_current_plan, Decimal::ZERO);
        assert_eq!(result.proportional_new_plan_cost, Decimal::ZERO);
        assert_eq!(result.amount_due_today, Decimal::ZERO);
        assert_eq!(result.maintained_expiration, today());
        // rates are still reported for display
        assert_eq!(result.current_daily_rate, dec!(1.00));
        assert_eq!(result.new_daily_rate, dec!(30.00));
    }

    #[test]
    fn expired_subscription_collapses_to_zero() {
        let current = subscription(dec!(30), 30, -3);
        let result = calculate_plan_change(&current, &PlanSnapshot::new(dec!(90), 30), today());

        assert_eq!(result.remaining_days, 0);
        assert_eq!(result.amount_due_today, Decimal::ZERO);
        assert_eq!(result.maintained_expiration, today() - Duration::days(3));
    }

    #[test]
    fn expiration_is_maintained() {
        let current = subscription(dec!(30), 30, 12);
        let expected = current.expires_at.unwrap();

        for candidate in [
            PlanSnapshot::new(dec!(10), 30),
            PlanSnapshot::new(dec!(300), 365),
            PlanSnapshot::new(dec!(5), 0),
        ] {
            let result = calculate_plan_change(&current, &candidate, today());
            assert_eq!(result.maintained_expiration, expected);
        }
        assert_eq!(current.expires_at, Some(expected));
    }

    #[test]
    fn partial_day_counts_as_full_day() {
        assert_eq!(remaining_days(Some(today() + Duration::hours(1)), today()), 1);
        assert_eq!(
            remaining_days(Some(today() + Duration::days(2) + Duration::seconds(1)), today()),
            3
        );
        assert_eq!(remaining_days(Some(today() + Duration::days(2)), today()), 2);
    }

    #[test]
    fn no_days_remaining_at_or_after_expiration() {
        assert_eq!(remaining_days(Some(today()), today()), 0);
        assert_eq!(remaining_days(Some(today() - Duration::hours(5)), today()), 0);
        assert_eq!(remaining_days(None, today()), 0);
    }

    #[test]
    fn zero_period_contributes_nothing() {
        let current = subscription(dec!(90), 0, 10);
        let result = calculate_plan_change(&current, &PlanSnapshot::new(dec!(90), 30), today());

        assert_eq!(result.current_daily_rate, Decimal::ZERO);
        assert_eq!(result.credit_from_current_plan, Decimal::ZERO);
        assert_eq!(result.proportional_new_plan_cost, dec!(30.00));
        assert_eq!(result.amount_due_today, dec!(30.00));
    }

    #[test]
    fn rounding_happens_after_every_step() {
        // 100 / 30 rounds to 3.33 before it is multiplied, so the credit for
        // a full period is 99.90 rather than 100.00.
        let current = subscription(dec!(100), 30, 30);
        // 50 / 7 rounds to 7.14; 30 days cost 214.20 (exact would be 214.29).
        let result = calculate_plan_change(&current, &PlanSnapshot::new(dec!(50), 7), today());

        assert_eq!(result.current_daily_rate, dec!(3.33));
        assert_eq!(result.credit_from_current_plan, dec!(99.90));
        assert_eq!(result.new_daily_rate, dec!(7.14));
        assert_eq!(result.proportional_new_plan_cost, dec!(214.20));
        assert_eq!(result.amount_due_today, dec!(114.30));
    }

    #[test]
    fn amounts_carry_two_decimals() {
        let current = subscription(dec!(90), 30, 10);
        let result = calculate_plan_change(&current, &PlanSnapshot::new(dec!(90), 30), today());

        assert_eq!(result.amount_due_today.to_string(), "0.00");
        assert_eq!(result.credit_from_current_plan.to_string(), "30.00");
    }

    #[test]
    fn change_kind_follows_daily_rate() {
        assert_eq!(
            PlanChangeKind::from_rates(dec!(1.00), dec!(3.00)),
            PlanChangeKind::Upgrade
        );
        assert_eq!(
            PlanChangeKind::from_rates(dec!(3.00), dec!(1.00)),
            PlanChangeKind::Downgrade
        );
        assert_eq!(
            PlanChangeKind::from_rates(dec!(3.00), dec!(3.0)),
            PlanChangeKind::Lateral
        );
    }

    #[test]
    fn compare_plans_keeps_candidate_order() {
        let current = subscription(dec!(30), 30, 15);
        let candidates = vec![
            PlanSnapshot::new(dec!(90), 30).with_name("Premium"),
            PlanSnapshot::new(dec!(30), 30).with_name("Basic"),
            PlanSnapshot::new(dec!(15), 30).with_name("Lite"),
        ];

        let comparisons = compare_plans(&current, &candidates, today());

        let names: Vec<_> = comparisons
            .iter()
            .map(|c| c.candidate.name.as_deref().unwrap())
            .collect();
        assert_eq!(names, ["Premium", "Basic", "Lite"]);
        assert_eq!(comparisons[0].kind, PlanChangeKind::Upgrade);
        assert_eq!(comparisons[0].result.amount_due_today, dec!(30.00));
        assert_eq!(comparisons[1].kind, PlanChangeKind::Lateral);
        assert_eq!(comparisons[2].kind, PlanChangeKind::Downgrade);
        assert_eq!(comparisons[2].result.amount_due_today, Decimal::ZERO);
    }

    #[test]
    fn compare_plans_with_no_candidates_is_empty() {
        let current = subscription(dec!(30), 30, 15);
        assert!(compare_plans(&current, &[], today()).is_empty());
    }

    #[test]
    fn result_serializes_amounts_as_strings() {
        let current = subscription(dec!(30), 30, 15);
        let result = calculate_plan_change(&current, &PlanSnapshot::new(dec!(90), 30), today());
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["remaining_days"], 15);
        assert_eq!(json["amount_due_today"], "30.00");
        assert_eq!(json["credit_from_current_plan"], "15.00");
        assert_eq!(json["maintained_expiration"], "2026-03-25T14:30:00Z");
    }
}
