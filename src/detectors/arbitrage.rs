//! Rate-arbitrage and shield-sacrifice detection.
//!
//! Flags savings balances earning less than debts cost, and scores the
//! riskier move of spending down a fully charged Peace Shield onto the
//! avalanche target.

use crate::core::debt::{avalanche_target, DebtAccount};
use crate::core::money::{monthly_rate, non_negative, round_money, round_pct};
use crate::detectors::alerts::AlertSeverity;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Spread tiers: how loudly to flag idle savings.
const CRITICAL_SPREAD: Decimal = dec!(15);
const WARNING_SPREAD: Decimal = dec!(8);

/// At most this share of the shield may be sacrificed.
const MAX_SACRIFICE_RATIO: Decimal = dec!(0.90);

/// Monthly savings below this are not worth draining the shield.
const MIN_MONTHLY_SAVINGS: Decimal = dec!(10);

/// An interest-bearing deposit account, as supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsAccount {
    pub name: String,
    pub balance: Decimal,
    /// Annual percentage yield.
    pub apy: Decimal,
}

/// A savings balance losing money against a debt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbitrageFinding {
    pub savings_account: String,
    pub debt_name: String,
    pub savings_apy: Decimal,
    pub debt_apr: Decimal,
    pub rate_spread: Decimal,
    /// `min(savings balance, debt balance)`.
    pub transferable_amount: Decimal,
    /// Net interest lost per year by holding instead of paying down.
    pub annual_net_loss: Decimal,
    pub severity: AlertSeverity,
    pub recommendation: String,
}

/// Pair each savings account against the highest-APR debt.
///
/// Only positive spreads are reported; results are sorted worst-first.
pub fn detect_rate_arbitrage(
    savings: &[SavingsAccount],
    debts: &[DebtAccount],
) -> Vec<ArbitrageFinding> {
    let target = match avalanche_target(debts) {
        Some(t) => t,
        None => return Vec::new(),
    };

    let mut findings: Vec<ArbitrageFinding> = savings
        .iter()
        .filter(|s| s.balance > Decimal::ZERO)
        .filter_map(|account| {
            let spread = target.interest_rate - account.apy;
            if spread <= Decimal::ZERO {
                return None;
            }
            let transferable = account.balance.min(target.balance);
            let annual_net_loss = round_money(transferable * spread / dec!(100));
            let severity = if spread >= CRITICAL_SPREAD {
                AlertSeverity::Critical
            } else if spread >= WARNING_SPREAD {
                AlertSeverity::Warning
            } else {
                AlertSeverity::Caution
            };
            Some(ArbitrageFinding {
                savings_account: account.name.clone(),
                debt_name: target.name.clone(),
                savings_apy: account.apy,
                debt_apr: target.interest_rate,
                rate_spread: spread,
                transferable_amount: transferable,
                annual_net_loss,
                severity,
                recommendation: format!(
                    "Transfer ${} from {} ({}% APY) to {} ({}% APR) to stop losing ${}/year",
                    transferable,
                    account.name,
                    account.apy,
                    target.name,
                    target.interest_rate,
                    annual_net_loss
                ),
            })
        })
        .collect();

    findings.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then(b.annual_net_loss.cmp(&a.annual_net_loss))
    });
    findings
}

/// How dangerous draining the shield would leave the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Moderate,
    High,
    Critical,
}

/// A shield-sacrifice play: spend emergency reserves on the avalanche
/// target for an outsized interest saving.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskyOpportunity {
    pub target_name: String,
    pub sacrifice_amount: Decimal,
    pub monthly_interest_savings: Decimal,
    pub annual_interest_savings: Decimal,
    /// Shield fill percentage after the sacrifice.
    pub resulting_shield_pct: Decimal,
    pub risk_tier: RiskTier,
    pub reasoning: String,
}

/// Score the shield-sacrifice move.
///
/// Offered only when the shield is fully charged. The sacrifice is
/// capped at 90% of the shield target and at the target debt's balance,
/// and must clear a $10/month savings floor.
pub fn detect_risky_opportunity(
    debts: &[DebtAccount],
    liquid_cash: Decimal,
    shield_target: Decimal,
) -> Option<RiskyOpportunity> {
    let shield_target = non_negative(shield_target);
    if shield_target <= Decimal::ZERO || non_negative(liquid_cash) < shield_target {
        return None;
    }
    let target = avalanche_target(debts)?;

    let sacrifice = round_money((shield_target * MAX_SACRIFICE_RATIO).min(target.balance));
    let monthly_savings = round_money(sacrifice * monthly_rate(target.interest_rate));
    if monthly_savings < MIN_MONTHLY_SAVINGS {
        return None;
    }

    let remaining = shield_target - sacrifice;
    let resulting_pct = round_pct(remaining / shield_target * dec!(100));
    let risk_tier = if resulting_pct >= dec!(70) {
        RiskTier::Moderate
    } else if resulting_pct >= dec!(40) {
        RiskTier::High
    } else {
        RiskTier::Critical
    };

    Some(RiskyOpportunity {
        target_name: target.name.clone(),
        sacrifice_amount: sacrifice,
        monthly_interest_savings: monthly_savings,
        annual_interest_savings: round_money(monthly_savings * dec!(12)),
        resulting_shield_pct: resulting_pct,
        risk_tier,
        reasoning: format!(
            "Spending ${} of the shield on {} ({}% APR) saves ${}/month but drops the shield to {}%",
            sacrifice, target.name, target.interest_rate, monthly_savings, resulting_pct
        ),
    })
}
