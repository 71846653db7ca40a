//! Per-debt danger detection.
//!
//! Scans a portfolio for structural payment problems: minimums that
//! never touch principal, payments that barely touch it, and payoff
//! horizons past the thirty-year mark. Each debt surfaces at most one
//! alert, the worst that applies.

use crate::amortization::months_to_payoff;
use crate::core::debt::DebtAccount;
use crate::core::money::{round_money, round_pct};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payoff horizons past this many months trigger a caution.
const LONG_HAUL_MONTHS: u32 = 360;

/// Principal share below this fraction of the payment is a warning.
const THIN_PRINCIPAL_RATIO: Decimal = dec!(0.10);

/// Alert severity, ordered worst-first for sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertSeverity {
    Critical,
    Warning,
    Caution,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertSeverity::Critical => write!(f, "CRITICAL"),
            AlertSeverity::Warning => write!(f, "WARNING"),
            AlertSeverity::Caution => write!(f, "CAUTION"),
        }
    }
}

/// A detected payment-structure problem on a single debt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtAlert {
    pub debt_name: String,
    pub severity: AlertSeverity,
    pub headline: String,
    pub detail: String,
    /// Monthly interest accrual on the debt.
    pub monthly_interest: Decimal,
    /// How far the minimum falls short of interest, zero unless critical.
    pub shortfall: Decimal,
    pub months_to_payoff: u32,
}

impl fmt::Display for DebtAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.debt_name, self.headline)
    }
}

/// Scan every active debt and return alerts sorted worst-first.
///
/// At most one alert per debt. A minimum that fails to cover interest
/// outranks thin principal, which outranks a merely long horizon.
pub fn detect_debt_alerts(debts: &[DebtAccount]) -> Vec<DebtAlert> {
    let mut alerts: Vec<DebtAlert> = debts
        .iter()
        .filter(|d| d.is_active())
        .filter_map(classify_debt)
        .collect();
    alerts.sort_by(|a, b| a.severity.cmp(&b.severity));
    alerts
}

fn classify_debt(debt: &DebtAccount) -> Option<DebtAlert> {
    let monthly_interest = debt.monthly_interest();
    let months = months_to_payoff(debt.balance, debt.interest_rate, debt.min_payment);

    if debt.min_payment <= monthly_interest {
        let shortfall = round_money(monthly_interest - debt.min_payment);
        return Some(DebtAlert {
            debt_name: debt.name.clone(),
            severity: AlertSeverity::Critical,
            headline: "Minimum payment never touches principal".to_string(),
            detail: format!(
                "Interest accrues at ${}/month but the minimum is only ${}. \
                 The balance grows ${}/month even with on-time payments.",
                monthly_interest, debt.min_payment, shortfall
            ),
            monthly_interest,
            shortfall,
            months_to_payoff: months,
        });
    }

    let principal_portion = debt.min_payment - monthly_interest;
    if principal_portion < debt.min_payment * THIN_PRINCIPAL_RATIO {
        let principal_pct = round_pct(principal_portion / debt.min_payment * dec!(100));
        return Some(DebtAlert {
            debt_name: debt.name.clone(),
            severity: AlertSeverity::Warning,
            headline: "Payment is almost all interest".to_string(),
            detail: format!(
                "Only ${} of the ${} minimum reaches principal ({}%). \
                 At this pace payoff takes {} months.",
                round_money(principal_portion),
                debt.min_payment,
                principal_pct,
                months
            ),
            monthly_interest,
            shortfall: Decimal::ZERO,
            months_to_payoff: months,
        });
    }

    if months > LONG_HAUL_MONTHS {
        return Some(DebtAlert {
            debt_name: debt.name.clone(),
            severity: AlertSeverity::Caution,
            headline: "Payoff horizon exceeds thirty years".to_string(),
            detail: format!(
                "Minimum payments clear this balance in {} months. \
                 Any extra payment shortens that dramatically.",
                months
            ),
            monthly_interest,
            shortfall: Decimal::ZERO,
            months_to_payoff: months,
        });
    }

    None
}
