//! Billing-cycle timing detectors.
//!
//! Float-kill candidates: revolving debts inside their grace window,
//! annotated with whether current attack equity can retire them.
//! Closing-day intelligence: per-card cycle position and purchase
//! timing advice.

use crate::core::debt::DebtAccount;
use crate::core::money::{daily_rate, round_money, round_pct};
use crate::simulation::action_plan::{days_until_due, GRACE_WINDOW_DAYS};
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Utilization above this fraction drags on credit scoring.
const HIGH_UTILIZATION_PCT: Decimal = dec!(30);

/// A revolving debt due soon enough that paying it in full preserves
/// its interest-free float.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatKillCandidate {
    pub name: String,
    pub balance: Decimal,
    pub days_until_due: i64,
    pub daily_interest_at_risk: Decimal,
    pub monthly_interest_at_risk: Decimal,
    /// Whether current attack equity covers the full balance.
    pub can_kill: bool,
    pub apr: Decimal,
    /// 1-based rank, smallest balance first.
    pub priority: usize,
    pub reason: String,
}

/// Find revolving debts due within the grace window, smallest first.
pub fn detect_float_kill_opportunities(
    debts: &[DebtAccount],
    attack_equity: Decimal,
) -> Vec<FloatKillCandidate> {
    detect_float_kill_opportunities_from(Utc::now().date_naive(), debts, attack_equity)
}

/// Deterministic variant with an explicit reference date.
pub fn detect_float_kill_opportunities_from(
    today: NaiveDate,
    debts: &[DebtAccount],
    attack_equity: Decimal,
) -> Vec<FloatKillCandidate> {
    let mut candidates: Vec<(&DebtAccount, i64)> = debts
        .iter()
        .filter(|d| d.is_active() && d.is_revolving() && d.due_day != 0)
        .map(|d| (d, days_until_due(today, d.due_day)))
        .filter(|(_, days)| *days <= GRACE_WINDOW_DAYS)
        .collect();
    candidates.sort_by_key(|(d, _)| d.balance);

    candidates
        .into_iter()
        .enumerate()
        .map(|(i, (debt, days))| {
            let daily = round_money(debt.daily_interest());
            let can_kill = attack_equity >= debt.balance && debt.balance > Decimal::ZERO;
            let reason = if can_kill {
                format!(
                    "Pay ${} before day {} to keep the grace period and dodge ${}/month in interest",
                    debt.balance,
                    debt.due_day,
                    debt.monthly_interest()
                )
            } else {
                format!(
                    "Due in {} days; ${} attack equity cannot cover the ${} balance yet",
                    days, attack_equity, debt.balance
                )
            };
            FloatKillCandidate {
                name: debt.name.clone(),
                balance: debt.balance,
                days_until_due: days,
                daily_interest_at_risk: daily,
                monthly_interest_at_risk: debt.monthly_interest(),
                can_kill,
                apr: debt.interest_rate,
                priority: i + 1,
                reason,
            }
        })
        .collect()
}

/// Where a card sits in its statement cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePosition {
    Early,
    MidCycle,
    PreClose,
    CloseWeek,
    GracePeriod,
    Unknown,
}

/// Purchase-timing intelligence for one revolving account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosingDayIntel {
    pub name: String,
    pub cycle_position: CyclePosition,
    pub days_until_closing: Option<i64>,
    pub days_until_due: Option<i64>,
    /// Interest-free days a purchase made today would enjoy.
    pub float_days_if_buy_today: i64,
    pub credit_utilization: Option<Decimal>,
    pub tips: Vec<String>,
}

/// Timing advice for each revolving debt with a known closing or due day.
pub fn closing_day_intelligence(debts: &[DebtAccount]) -> Vec<ClosingDayIntel> {
    closing_day_intelligence_from(Utc::now().date_naive(), debts)
}

/// Deterministic variant with an explicit reference date.
pub fn closing_day_intelligence_from(today: NaiveDate, debts: &[DebtAccount]) -> Vec<ClosingDayIntel> {
    debts
        .iter()
        .filter(|d| d.is_revolving() && (d.closing_day != 0 || d.due_day != 0))
        .map(|debt| build_intel(today, debt))
        .collect()
}

fn build_intel(today: NaiveDate, debt: &DebtAccount) -> ClosingDayIntel {
    let days_to_close = (debt.closing_day != 0).then(|| days_until_due(today, debt.closing_day));
    let days_to_due = (debt.due_day != 0).then(|| days_until_due(today, debt.due_day));

    let (position, float_days) = match days_to_close {
        Some(to_close) => {
            let closing_date = today + Duration::days(to_close);
            // A purchase today rides until the due date after the next close.
            let float_days = match debt.due_day {
                0 => to_close + GRACE_WINDOW_DAYS,
                due_day => {
                    let after_close = closing_date + Duration::days(1);
                    to_close + 1 + days_until_due(after_close, due_day)
                }
            };
            let position = if let Some(to_due) = days_to_due {
                if to_due < to_close {
                    CyclePosition::GracePeriod
                } else {
                    position_from_days(to_close)
                }
            } else {
                position_from_days(to_close)
            };
            (position, float_days)
        }
        None => (
            CyclePosition::Unknown,
            days_to_due.unwrap_or(0).max(1) + GRACE_WINDOW_DAYS,
        ),
    };

    let utilization = (debt.credit_limit > Decimal::ZERO)
        .then(|| round_pct(debt.balance / debt.credit_limit * dec!(100)));

    let mut tips = Vec::new();
    match position {
        CyclePosition::CloseWeek | CyclePosition::PreClose => {
            tips.push(format!(
                "Statement closes soon; delay large purchases until after day {} for maximum float",
                debt.closing_day
            ));
            if utilization.map_or(false, |u| u > HIGH_UTILIZATION_PCT) {
                tips.push(
                    "Pay the balance down before closing so a lower figure hits your report"
                        .to_string(),
                );
            }
        }
        CyclePosition::GracePeriod => {
            tips.push(format!(
                "In the grace window: purchases made now ride interest-free for {} days",
                float_days
            ));
        }
        CyclePosition::Early | CyclePosition::MidCycle => {
            tips.push(format!(
                "Purchases made today float {} days before payment is due",
                float_days
            ));
        }
        CyclePosition::Unknown => {
            tips.push("Set the statement closing day to unlock purchase timing advice".to_string());
        }
    }

    ClosingDayIntel {
        name: debt.name.clone(),
        cycle_position: position,
        days_until_closing: days_to_close,
        days_until_due: days_to_due,
        float_days_if_buy_today: float_days,
        credit_utilization: utilization,
        tips,
    }
}

fn position_from_days(days_to_close: i64) -> CyclePosition {
    match days_to_close {
        0..=3 => CyclePosition::CloseWeek,
        4..=7 => CyclePosition::PreClose,
        8..=14 => CyclePosition::MidCycle,
        _ => CyclePosition::Early,
    }
}
