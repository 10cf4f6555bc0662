//! Money helpers.
//!
//! Every intermediate figure of a plan-change preview is rounded to cents
//! before it feeds the next step. The dashboards display these exact cents,
//! so the step-wise rounding is part of the contract.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept for monetary amounts.
pub const MONEY_SCALE: u32 = 2;

/// Round half-up to two decimal places, always carrying a scale of two.
///
/// `3` becomes `3.00` and `0.125` becomes `0.13`.
#[must_use]
pub fn round2(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Price per day of a plan, rounded to cents.
///
/// A non-positive period or a negative price contributes nothing and yields zero.
#[must_use]
pub fn daily_rate(price: Decimal, period_days: i64) -> Decimal {
    if period_days <= 0 || price.is_sign_negative() {
        return round2(Decimal::ZERO);
    }
    round2(price / Decimal::from(period_days))
}
