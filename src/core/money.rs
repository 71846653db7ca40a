use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Payoff horizon ceiling in months (50 years).
///
/// Any debt that cannot be retired within this window is treated as
/// "never pays off". Callers branch on exact equality with this value,
/// so it must be returned unmodified by every calculator that hits it.
pub const PAYOFF_HORIZON_MONTHS_CAP: u32 = 600;

/// Default emergency-fund floor (the "Peace Shield") in dollars.
pub const DEFAULT_PEACE_SHIELD: Decimal = dec!(1000.00);

/// Round a money amount to 2 decimal places, half-up.
///
/// Every externally observable money result goes through this exact
/// rounding so identical inputs always produce byte-identical outputs.
/// Internal intermediates may carry more precision.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a percentage to 1 decimal place, half-up.
pub fn round_pct(pct: Decimal) -> Decimal {
    pct.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Monthly periodic rate from an annual percentage rate: `APR / 100 / 12`.
pub fn monthly_rate(apr: Decimal) -> Decimal {
    apr / dec!(100) / dec!(12)
}

/// Daily periodic rate from an annual percentage rate: `APR / 100 / 365`.
///
/// Note: the engine deliberately uses 365-day daily accrual alongside
/// 12-period monthly accrual. The two conventions are not reconciled;
/// each is used at its own call sites.
pub fn daily_rate(apr: Decimal) -> Decimal {
    apr / dec!(100) / dec!(365)
}

/// Normalize a caller-supplied amount: negative or invalid becomes zero.
///
/// The engine favors total functions over raised errors — a negative
/// balance or APR degrades the computation to a no-op instead of
/// propagating negative debt.
pub fn non_negative(amount: Decimal) -> Decimal {
    if amount < Decimal::ZERO {
        Decimal::ZERO
    } else {
        amount
    }
}

/// Convert a decimal to `f64` for display percentages only.
pub fn to_display_f64(value: Decimal) -> f64 {
    value.to_string().parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(round_money(dec!(1.005)), dec!(1.01));
        assert_eq!(round_money(dec!(1.004)), dec!(1.00));
        assert_eq!(round_money(dec!(916.666666)), dec!(916.67));
    }

    #[test]
    fn test_monthly_rate() {
        // 24% APR → 2% per month
        assert_eq!(monthly_rate(dec!(24)), dec!(0.02));
    }

    #[test]
    fn test_daily_rate_heloc() {
        // $50,000 at 8% → $10.96/day
        let daily = round_money(dec!(50000) * daily_rate(dec!(8)));
        assert_eq!(daily, dec!(10.96));
    }

    #[test]
    fn test_daily_rate_credit_card() {
        // $5,000 at 24.99% → $3.42/day
        let daily = round_money(dec!(5000) * daily_rate(dec!(24.99)));
        assert_eq!(daily, dec!(3.42));
    }

    #[test]
    fn test_non_negative_clamps() {
        assert_eq!(non_negative(dec!(-500)), Decimal::ZERO);
        assert_eq!(non_negative(dec!(500)), dec!(500));
    }

    #[test]
    fn test_monthly_vs_daily_drift_is_bounded() {
        // Monthly ≈ daily × 30 within 2% — the documented approximation.
        let balance = dec!(10000);
        let monthly = to_display_f64(balance * monthly_rate(dec!(20)));
        let daily30 = to_display_f64(balance * daily_rate(dec!(20))) * 30.0;
        let drift = (monthly - daily30).abs() / monthly;
        assert!(drift < 0.02, "drift {drift:.4} exceeds 2%");
    }
}
