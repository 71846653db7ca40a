//! Month-by-month multi-debt payoff simulation.
//!
//! Each simulated month accrues interest, applies minimum payments, then
//! allocates extra cash gap-first: interest shortfalls are covered before
//! any avalanche attack, so extra money first stops debts from growing
//! before it accelerates payoff of another.

use crate::core::debt::{avalanche_target, DebtAccount};
use crate::core::money::{non_negative, round_money, PAYOFF_HORIZON_MONTHS_CAP};
use chrono::{Duration, NaiveDate, Utc};
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// State of the portfolio at the end of one simulated month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthSnapshot {
    /// 1-based month index.
    pub month: u32,
    pub total_balance: Decimal,
    pub active_debts: usize,
    pub interest_paid: Decimal,
    /// Human-readable elimination events, e.g. "Eliminated: Chase Sapphire".
    pub events: Vec<String>,
}

/// Result of a freedom-path simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreedomPath {
    pub timeline: Vec<MonthSnapshot>,
    pub freedom_date: NaiveDate,
    pub total_interest_paid: Decimal,
    pub total_months: u32,
    /// True when the simulation hit the 600-month ceiling with debt left.
    pub capped: bool,
}

/// Simulate the freedom path starting from today.
pub fn simulate_freedom_path(debts: &[DebtAccount], extra_monthly: Decimal) -> FreedomPath {
    simulate_freedom_path_from(Utc::now().date_naive(), debts, extra_monthly)
}

/// Simulate the freedom path from a fixed start date (deterministic).
///
/// Inputs are cloned before mutation; caller-owned debts are untouched.
pub fn simulate_freedom_path_from(
    start: NaiveDate,
    debts: &[DebtAccount],
    extra_monthly: Decimal,
) -> FreedomPath {
    let extra_monthly = non_negative(extra_monthly);
    let mut sim: Vec<DebtAccount> = debts.iter().filter(|d| d.is_active()).cloned().collect();

    let mut timeline = Vec::new();
    let mut total_interest_paid = Decimal::ZERO;
    let mut months = 0u32;

    while sim.iter().any(|d| d.is_active()) && months < PAYOFF_HORIZON_MONTHS_CAP {
        months += 1;
        let mut interest_this_month = Decimal::ZERO;
        let mut events = Vec::new();
        // Interest accrued per debt this month, used for gap coverage.
        let mut accrued = vec![Decimal::ZERO; sim.len()];

        // Accrue-then-pay. A minimum below the accrued interest lets the
        // balance grow; the debt-alert detector flags exactly that case.
        for (i, debt) in sim.iter_mut().enumerate() {
            if !debt.is_active() {
                continue;
            }
            let interest = round_money(debt.balance * debt.monthly_rate());
            accrued[i] = interest;
            debt.balance += interest;
            interest_this_month += interest;
            debt.apply_payment(debt.min_payment);
        }

        let mut extra = extra_monthly;

        // Step A — gap coverage: stop any debt from growing before
        // accelerating payoff of another.
        if extra > Decimal::ZERO {
            for (i, debt) in sim.iter_mut().enumerate() {
                if !debt.is_active() || extra <= Decimal::ZERO {
                    continue;
                }
                let shortfall = accrued[i] - debt.min_payment;
                if shortfall > Decimal::ZERO {
                    let cover = shortfall.min(extra).min(debt.balance);
                    debt.apply_payment(cover);
                    extra -= cover;
                }
            }
        }

        // Step B — avalanche: re-sort by APR each month (the target can
        // change as debts are eliminated) and cascade the remainder.
        sim.sort_by_key(|d| Reverse(d.interest_rate));
        for debt in sim.iter_mut() {
            if extra <= Decimal::ZERO {
                break;
            }
            if !debt.is_active() {
                continue;
            }
            let paid = debt.apply_payment(extra);
            extra -= paid;
        }

        for debt in &sim {
            if debt.balance == Decimal::ZERO {
                // Report each elimination exactly once.
                let event = format!("Eliminated: {}", debt.name);
                let already = timeline
                    .iter()
                    .any(|s: &MonthSnapshot| s.events.contains(&event));
                if !already {
                    debug!("month {}: {}", months, event);
                    events.push(event);
                }
            }
        }

        total_interest_paid += interest_this_month;
        timeline.push(MonthSnapshot {
            month: months,
            total_balance: round_money(sim.iter().map(|d| d.balance).sum()),
            active_debts: sim.iter().filter(|d| d.is_active()).count(),
            interest_paid: interest_this_month,
            events,
        });
    }

    let capped = sim.iter().any(|d| d.is_active());
    FreedomPath {
        timeline,
        freedom_date: start + Duration::days(i64::from(months) * 30),
        total_interest_paid: round_money(total_interest_paid),
        total_months: months,
        capped,
    }
}

/// Standard-vs-velocity comparison: the difference between a
/// minimums-only run and a run with the caller's extra monthly cash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtFreeProjection {
    pub standard_months: u32,
    pub velocity_months: u32,
    pub standard_date: NaiveDate,
    pub velocity_date: NaiveDate,
    pub months_saved: u32,
    pub interest_saved: Decimal,
}

pub fn calculate_debt_free_date(debts: &[DebtAccount], extra_monthly: Decimal) -> DebtFreeProjection {
    calculate_debt_free_date_from(Utc::now().date_naive(), debts, extra_monthly)
}

pub fn calculate_debt_free_date_from(
    start: NaiveDate,
    debts: &[DebtAccount],
    extra_monthly: Decimal,
) -> DebtFreeProjection {
    let standard = simulate_freedom_path_from(start, debts, Decimal::ZERO);
    let velocity = simulate_freedom_path_from(start, debts, extra_monthly);

    DebtFreeProjection {
        standard_months: standard.total_months,
        velocity_months: velocity.total_months,
        standard_date: standard.freedom_date,
        velocity_date: velocity.freedom_date,
        months_saved: standard.total_months.saturating_sub(velocity.total_months),
        interest_saved: non_negative(round_money(
            standard.total_interest_paid - velocity.total_interest_paid,
        )),
    }
}

/// Dashboard-level projection summary.
///
/// Velocity power follows the 20%-of-liquid-cash deployment assumption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VelocityProjection {
    pub total_debt: Decimal,
    pub total_min_payments: Decimal,
    pub liquid_cash: Decimal,
    pub velocity_power: Decimal,
    pub velocity_target: Option<String>,
    pub standard_debt_free_date: NaiveDate,
    pub velocity_debt_free_date: NaiveDate,
    pub months_saved: u32,
    pub interest_saved: Decimal,
    pub years_saved: f64,
}

pub fn get_projections(debts: &[DebtAccount], liquid_cash: Decimal) -> VelocityProjection {
    get_projections_from(Utc::now().date_naive(), debts, liquid_cash)
}

pub fn get_projections_from(
    start: NaiveDate,
    debts: &[DebtAccount],
    liquid_cash: Decimal,
) -> VelocityProjection {
    let liquid_cash = non_negative(liquid_cash);
    let extra_monthly = round_money(liquid_cash * dec!(0.20));
    let projection = calculate_debt_free_date_from(start, debts, extra_monthly);

    VelocityProjection {
        total_debt: round_money(debts.iter().map(|d| d.balance).sum()),
        total_min_payments: round_money(
            debts.iter().filter(|d| d.is_active()).map(|d| d.min_payment).sum(),
        ),
        liquid_cash,
        velocity_power: extra_monthly,
        velocity_target: avalanche_target(debts).map(|d| d.name.clone()),
        standard_debt_free_date: projection.standard_date,
        velocity_debt_free_date: projection.velocity_date,
        months_saved: projection.months_saved,
        interest_saved: projection.interest_saved,
        years_saved: (f64::from(projection.months_saved) / 12.0 * 10.0).round() / 10.0,
    }
}

/// How much a discretionary purchase delays the debt-free date.
///
/// Simulates the purchase as phantom debt added to the avalanche target
/// (where the money would otherwise have gone) and diffs the two runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseTimeCost {
    pub purchase_amount: Decimal,
    pub days_delayed: i64,
    pub months_delayed: u32,
    pub cost_in_interest: Decimal,
    pub pushes_past_horizon: bool,
}

pub fn purchase_time_cost(
    purchase_amount: Decimal,
    debts: &[DebtAccount],
    extra_monthly: Decimal,
) -> PurchaseTimeCost {
    purchase_time_cost_from(Utc::now().date_naive(), purchase_amount, debts, extra_monthly)
}

pub fn purchase_time_cost_from(
    start: NaiveDate,
    purchase_amount: Decimal,
    debts: &[DebtAccount],
    extra_monthly: Decimal,
) -> PurchaseTimeCost {
    let purchase_amount = non_negative(purchase_amount);
    if debts.iter().all(|d| !d.is_active()) {
        return PurchaseTimeCost {
            purchase_amount,
            days_delayed: 0,
            months_delayed: 0,
            cost_in_interest: Decimal::ZERO,
            pushes_past_horizon: false,
        };
    }

    let baseline = simulate_freedom_path_from(start, debts, extra_monthly);

    let mut simulated: Vec<DebtAccount> = debts.to_vec();
    let target_name = avalanche_target(&simulated).map(|d| d.name.clone());
    let mut target_apr = Decimal::ZERO;
    if let Some(name) = &target_name {
        for debt in simulated.iter_mut() {
            if &debt.name == name {
                debt.balance += purchase_amount;
                target_apr = debt.interest_rate;
            }
        }
    }

    let impact = simulate_freedom_path_from(start, &simulated, extra_monthly);

    let mut months_delayed = impact.total_months.saturating_sub(baseline.total_months);
    let mut days_delayed = i64::from(months_delayed) * 30;
    let mut pushes_past_horizon = false;

    let baseline_capped = baseline.total_months >= PAYOFF_HORIZON_MONTHS_CAP;
    let impact_capped = impact.total_months >= PAYOFF_HORIZON_MONTHS_CAP;
    if baseline_capped && impact_capped {
        // Already at the 50-year ceiling; a purchase cannot measurably
        // delay a timeline that is maxed out.
        months_delayed = 0;
        days_delayed = 0;
    } else if impact_capped {
        pushes_past_horizon = true;
    }

    // Interest forgone on the diverted funds over the baseline horizon.
    let years = Decimal::from(baseline.total_months) / dec!(12);
    let cost_in_interest = round_money(purchase_amount * (target_apr / dec!(100)) * years);

    PurchaseTimeCost {
        purchase_amount,
        days_delayed,
        months_delayed,
        cost_in_interest,
        pushes_past_horizon,
    }
}

impl std::fmt::Display for FreedomPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Freedom Path ===")?;
        writeln!(f, "Months to freedom: {}{}", self.total_months, if self.capped { " (capped)" } else { "" })?;
        writeln!(f, "Freedom date:      {}", self.freedom_date)?;
        writeln!(f, "Interest paid:     {}", self.total_interest_paid)?;
        for snapshot in &self.timeline {
            if !snapshot.events.is_empty() {
                writeln!(
                    f,
                    "  Month {:>3}: balance {} — {}",
                    snapshot.month,
                    snapshot.total_balance,
                    snapshot.events.join(", ")
                )?;
            }
        }
        Ok(())
    }
}
