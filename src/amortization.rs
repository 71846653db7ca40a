//! Single-debt amortization: months to payoff, lifetime interest, and
//! the minimum-payment formula.
//!
//! All three use the same iterative accrue-then-pay loop rather than the
//! closed-form log formula. The iteration matches the exact rounding the
//! simulators use and generalizes to gap-coverage allocation; the closed
//! form does not.

use crate::core::money::{monthly_rate, non_negative, round_money, PAYOFF_HORIZON_MONTHS_CAP};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Months required to retire a balance under a fixed monthly payment.
///
/// Returns 0 for a non-positive balance. Returns the
/// [`PAYOFF_HORIZON_MONTHS_CAP`] sentinel (exactly 600) when the payment
/// is non-positive or does not cover monthly interest — the debt would
/// never shrink. Callers branch on exact equality with the cap for
/// debt-trap messaging, so the sentinel is never approximated.
pub fn months_to_payoff(balance: Decimal, apr: Decimal, monthly_payment: Decimal) -> u32 {
    let balance = non_negative(balance);
    if balance == Decimal::ZERO {
        return 0;
    }
    if monthly_payment <= Decimal::ZERO {
        return PAYOFF_HORIZON_MONTHS_CAP;
    }

    let rate = monthly_rate(non_negative(apr));
    if monthly_payment <= balance * rate {
        return PAYOFF_HORIZON_MONTHS_CAP;
    }

    let mut remaining = balance;
    let mut months = 0u32;
    while remaining > Decimal::ZERO && months < PAYOFF_HORIZON_MONTHS_CAP {
        let interest = remaining * rate;
        let principal = monthly_payment - interest;
        if principal <= Decimal::ZERO {
            return PAYOFF_HORIZON_MONTHS_CAP;
        }
        remaining -= principal;
        months += 1;
    }
    months
}

/// Total interest paid over the life of the debt, rounded to cents.
///
/// Accumulates the 2dp-rounded interest charge of each month, matching
/// how statements actually post. Returns 0 for non-positive balance or
/// payment.
pub fn total_interest(balance: Decimal, apr: Decimal, monthly_payment: Decimal) -> Decimal {
    let balance = non_negative(balance);
    if balance == Decimal::ZERO || monthly_payment <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let rate = monthly_rate(non_negative(apr));
    let mut remaining = balance;
    let mut total = Decimal::ZERO;
    let mut months = 0u32;

    while remaining > Decimal::ZERO && months < PAYOFF_HORIZON_MONTHS_CAP {
        let interest = round_money(remaining * rate);
        total += interest;
        let principal = monthly_payment - interest;
        if principal <= Decimal::ZERO {
            break;
        }
        remaining -= principal;
        months += 1;
    }

    round_money(total)
}

/// Contractual minimum payment for a revolving account:
/// one month of interest plus 1% of the balance, floored at $25,
/// and never more than the balance itself.
pub fn minimum_payment(balance: Decimal, apr: Decimal) -> Decimal {
    let balance = non_negative(balance);
    if balance == Decimal::ZERO {
        return Decimal::ZERO;
    }

    let interest = balance * monthly_rate(non_negative(apr));
    let principal = balance * dec!(0.01);
    let floor = dec!(25.00);

    if balance < floor {
        return round_money(balance);
    }
    round_money((interest + principal).max(floor))
}
