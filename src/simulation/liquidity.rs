//! Day-by-day liquidity projection and the "lowest-low" safety rule.
//!
//! The engine never recommends deploying cash that would, under the
//! projected recurring schedule, push the balance below the Peace Shield
//! at any point inside the lookahead window. Safe attack equity is the
//! surplus above the shield at the *worst* projected day, not today.

use crate::core::cashflow::{CashflowItem, Recurrence};
use crate::core::debt::DebtAccount;
use crate::core::money::{non_negative, round_money, round_pct, to_display_f64};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use log::trace;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Default projection window in days — one full billing cycle plus slack.
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 35;

/// Fallback monthly income assumption used when no recurring income data
/// is supplied, so the projector degrades gracefully instead of
/// reserving the entire window's obligations against a silent balance.
pub const FALLBACK_MONTHLY_INCOME: Decimal = dec!(3000.00);
const FALLBACK_INCOME_DAY: u32 = 1;

/// One projected day in the cash calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub balance: Decimal,
    /// Events applied this day, e.g. "Min payment: Amex (-450.00)".
    pub events: Vec<String>,
}

/// Result of the safe-attack-equity projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyProjection {
    /// Surplus that survives the worst projected day above the shield.
    pub safe_equity: Decimal,
    /// Naive surplus above the shield today.
    pub raw_equity: Decimal,
    /// Withheld today because a future obligation would breach the floor.
    pub reserved_for_bills: Decimal,
    pub lowest_projected_balance: Decimal,
    pub lowest_balance_date: NaiveDate,
    /// What drove the balance to its lowest point, if any event did.
    pub lowest_balance_cause: Option<String>,
    pub calendar: Vec<CalendarDay>,
}

/// Project cash forward and compute how much is safe to deploy.
pub fn calculate_safe_attack_equity(
    liquid_cash: Decimal,
    shield_target: Decimal,
    debts: &[DebtAccount],
    lookahead_days: u32,
    incomes: &[CashflowItem],
    expenses: &[CashflowItem],
) -> SafetyProjection {
    calculate_safe_attack_equity_from(
        Utc::now().date_naive(),
        liquid_cash,
        shield_target,
        debts,
        lookahead_days,
        incomes,
        expenses,
    )
}

/// Deterministic variant with an explicit start date.
///
/// Per day, in order: debt minimums due that day debit the balance, then
/// recurring expenses debit, then recurring incomes credit. The minimum
/// balance ever reached, checked after each individual debit, drives
/// `safe_equity`.
pub fn calculate_safe_attack_equity_from(
    start: NaiveDate,
    liquid_cash: Decimal,
    shield_target: Decimal,
    debts: &[DebtAccount],
    lookahead_days: u32,
    incomes: &[CashflowItem],
    expenses: &[CashflowItem],
) -> SafetyProjection {
    let liquid_cash = non_negative(liquid_cash);
    let shield_target = non_negative(shield_target);

    let fallback_income;
    let incomes: &[CashflowItem] = if incomes.is_empty() {
        fallback_income = [CashflowItem::income(
            "Assumed income",
            FALLBACK_MONTHLY_INCOME,
            Recurrence::Monthly {
                day: FALLBACK_INCOME_DAY,
            },
        )];
        &fallback_income
    } else {
        incomes
    };

    let mut balance = liquid_cash;
    let mut lowest = balance;
    let mut lowest_date = start;
    let mut lowest_cause: Option<String> = None;
    let mut calendar = Vec::with_capacity(lookahead_days as usize);

    for offset in 1..=i64::from(lookahead_days) {
        let date = start + Duration::days(offset);
        let mut events = Vec::new();

        // The low-water mark is checked after every debit, so a dip that
        // a same-day income later refills still counts against the floor.
        for debt in debts.iter().filter(|d| d.is_active()) {
            if debt.due_day != 0 && due_day_matches(date, debt.due_day) {
                balance -= debt.min_payment;
                let event = format!("Min payment: {} (-{})", debt.name, debt.min_payment);
                if balance < lowest {
                    lowest = balance;
                    lowest_date = date;
                    lowest_cause = Some(event.clone());
                    trace!("new lowest {} on {}", lowest, date);
                }
                events.push(event);
            }
        }
        for expense in expenses {
            if expense.triggers_on(date) {
                balance -= expense.amount;
                let event = format!("{} (-{})", expense.name, expense.amount);
                if balance < lowest {
                    lowest = balance;
                    lowest_date = date;
                    lowest_cause = Some(event.clone());
                    trace!("new lowest {} on {}", lowest, date);
                }
                events.push(event);
            }
        }
        // Credits can only raise the balance, never set a new low.
        for income in incomes {
            if income.triggers_on(date) {
                balance += income.amount;
                events.push(format!("{} (+{})", income.name, income.amount));
            }
        }

        calendar.push(CalendarDay {
            date,
            balance: round_money(balance),
            events,
        });
    }

    let raw_equity = non_negative(round_money(liquid_cash - shield_target));
    let safe_equity = non_negative(round_money(lowest - shield_target));
    // lowest ≤ starting balance, so safe ≤ raw always holds.
    let reserved_for_bills = round_money(raw_equity - safe_equity);

    SafetyProjection {
        safe_equity,
        raw_equity,
        reserved_for_bills,
        lowest_projected_balance: round_money(lowest),
        lowest_balance_date: lowest_date,
        lowest_balance_cause: lowest_cause,
        calendar,
    }
}

/// Whether a due day-of-month falls on `date`, clamping short months.
fn due_day_matches(date: NaiveDate, due_day: u32) -> bool {
    let last = crate::core::cashflow::days_in_month(date.year(), date.month());
    date.day() == due_day.min(last)
}

/// Health of the Peace Shield (emergency-fund floor).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShieldStatus {
    pub shield_target: Decimal,
    pub current_fill: Decimal,
    /// Percentage filled, one decimal place.
    pub fill_percentage: Decimal,
    pub deficit: Decimal,
    pub is_active: bool,
    pub attack_authorized: bool,
    pub status: ShieldState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShieldState {
    FullyCharged,
    Charging,
}

/// Evaluate whether the shield is charged and attacks are authorized.
pub fn peace_shield_status(liquid_cash: Decimal, shield_target: Decimal) -> ShieldStatus {
    let liquid_cash = non_negative(liquid_cash);
    let shield_target = non_negative(shield_target);

    let current_fill = liquid_cash.min(shield_target);
    let fill_percentage = if shield_target > Decimal::ZERO {
        round_pct(current_fill / shield_target * dec!(100))
    } else {
        dec!(100.0)
    };
    let deficit = round_money(non_negative(shield_target - liquid_cash));
    let is_active = liquid_cash >= shield_target;

    ShieldStatus {
        shield_target,
        current_fill: round_money(current_fill),
        fill_percentage,
        deficit,
        is_active,
        attack_authorized: is_active,
        status: if is_active {
            ShieldState::FullyCharged
        } else {
            ShieldState::Charging
        },
    }
}

impl std::fmt::Display for SafetyProjection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Liquidity Safety Projection ===")?;
        writeln!(f, "Raw equity:         {}", self.raw_equity)?;
        writeln!(f, "Safe attack equity: {}", self.safe_equity)?;
        writeln!(f, "Reserved for bills: {}", self.reserved_for_bills)?;
        writeln!(
            f,
            "Lowest low:         {} on {}",
            self.lowest_projected_balance, self.lowest_balance_date
        )?;
        if let Some(cause) = &self.lowest_balance_cause {
            writeln!(f, "Driven by:          {}", cause)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for ShieldStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Peace Shield ===")?;
        writeln!(
            f,
            "Fill: {}% ({} / {})",
            to_display_f64(self.fill_percentage),
            self.current_fill,
            self.shield_target
        )?;
        writeln!(f, "Deficit: {}", self.deficit)?;
        writeln!(
            f,
            "Status:  {}",
            match self.status {
                ShieldState::FullyCharged => "FULLY CHARGED: attacks authorized",
                ShieldState::Charging => "CHARGING: attacks paused",
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::debt::DebtSubtype;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()
    }

    fn card(due: u32, min_pay: Decimal) -> DebtAccount {
        DebtAccount::new("Card", dec!(5000), dec!(24), min_pay)
            .with_due_day(due)
            .with_subtype(DebtSubtype::CreditCard)
    }

    fn monthly_income(amount: Decimal, day: u32) -> CashflowItem {
        CashflowItem::income("Salary", amount, Recurrence::monthly(day).unwrap())
    }

    fn monthly_expense(amount: Decimal, day: u32) -> CashflowItem {
        CashflowItem::expense("Rent", amount, Recurrence::monthly(day).unwrap())
    }

    #[test]
    fn test_safe_never_exceeds_raw() {
        let debts = vec![card(15, dec!(150))];
        let projection = calculate_safe_attack_equity_from(
            start(),
            dec!(5000),
            dec!(1000),
            &debts,
            DEFAULT_LOOKAHEAD_DAYS,
            &[monthly_income(dec!(4000), 1)],
            &[monthly_expense(dec!(2000), 5)],
        );
        assert!(projection.safe_equity <= projection.raw_equity);
        assert!(projection.safe_equity >= Decimal::ZERO);
        assert_eq!(
            projection.reserved_for_bills,
            projection.raw_equity - projection.safe_equity
        );
    }

    #[test]
    fn test_below_shield_means_zero_equity() {
        let debts = vec![card(15, dec!(150))];
        let projection = calculate_safe_attack_equity_from(
            start(),
            dec!(500),
            dec!(1000),
            &debts,
            DEFAULT_LOOKAHEAD_DAYS,
            &[],
            &[],
        );
        assert_eq!(projection.safe_equity, Decimal::ZERO);
        assert_eq!(projection.raw_equity, Decimal::ZERO);
    }

    #[test]
    fn test_upcoming_bill_reserves_cash() {
        // $1,500 cash, $1,000 shield: raw equity $500. A $400 rent hits
        // on day 5 before any income, so only $100 is truly safe.
        let projection = calculate_safe_attack_equity_from(
            start(),
            dec!(1500),
            dec!(1000),
            &[],
            DEFAULT_LOOKAHEAD_DAYS,
            &[monthly_income(dec!(3000), 28)],
            &[monthly_expense(dec!(400), 5)],
        );
        assert_eq!(projection.raw_equity, dec!(500.00));
        assert_eq!(projection.safe_equity, dec!(100.00));
        assert_eq!(projection.reserved_for_bills, dec!(400.00));
    }

    #[test]
    fn test_same_day_income_does_not_mask_dip() {
        // Rent and salary both land on day 5. The balance passes through
        // $900 before the deposit refills it, so the floor is breached
        // and nothing is safe to deploy even though every end-of-day
        // balance stays at $1,500.
        let projection = calculate_safe_attack_equity_from(
            start(),
            dec!(1500),
            dec!(1000),
            &[],
            DEFAULT_LOOKAHEAD_DAYS,
            &[monthly_income(dec!(600), 5)],
            &[monthly_expense(dec!(600), 5)],
        );
        assert_eq!(projection.safe_equity, dec!(0.00));
        assert_eq!(projection.lowest_projected_balance, dec!(900.00));
        assert_eq!(
            projection.lowest_balance_date,
            NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
        );
        let cause = projection.lowest_balance_cause.unwrap();
        assert!(cause.starts_with("Rent"), "cause was {cause}");
    }

    #[test]
    fn test_due_day_payment_applied() {
        let debts = vec![card(15, dec!(450))];
        let projection = calculate_safe_attack_equity_from(
            start(),
            dec!(5000),
            dec!(1000),
            &debts,
            DEFAULT_LOOKAHEAD_DAYS,
            &[monthly_income(dec!(100), 1)],
            &[],
        );
        let day_15 = projection
            .calendar
            .iter()
            .find(|d| d.date == NaiveDate::from_ymd_opt(2026, 8, 15).unwrap())
            .unwrap();
        assert!(day_15.events.iter().any(|e| e.contains("Min payment")));
    }

    #[test]
    fn test_calendar_covers_window() {
        let projection = calculate_safe_attack_equity_from(
            start(),
            dec!(5000),
            dec!(1000),
            &[],
            35,
            &[monthly_income(dec!(4000), 1)],
            &[],
        );
        assert_eq!(projection.calendar.len(), 35);
    }

    #[test]
    fn test_fallback_income_assumed_when_none_supplied() {
        // Without the fallback, 35 days of minimums with no income would
        // reserve far more. The assumed deposit lands on the 1st.
        let projection = calculate_safe_attack_equity_from(
            start(),
            dec!(2000),
            dec!(1000),
            &[card(15, dec!(500))],
            DEFAULT_LOOKAHEAD_DAYS,
            &[],
            &[],
        );
        let has_assumed = projection
            .calendar
            .iter()
            .any(|d| d.events.iter().any(|e| e.contains("Assumed income")));
        assert!(has_assumed);
    }

    #[test]
    fn test_shield_status_partially_filled() {
        let status = peace_shield_status(dec!(300), dec!(1000));
        assert!(!status.is_active);
        assert!(!status.attack_authorized);
        assert_eq!(status.fill_percentage, dec!(30.0));
        assert_eq!(status.deficit, dec!(700.00));
        assert_eq!(status.status, ShieldState::Charging);
    }

    #[test]
    fn test_shield_status_fully_charged() {
        let status = peace_shield_status(dec!(1500), dec!(1000));
        assert!(status.is_active);
        assert!(status.attack_authorized);
        assert_eq!(status.fill_percentage, dec!(100.0));
        assert_eq!(status.deficit, dec!(0.00));
        assert_eq!(status.current_fill, dec!(1000.00));
    }

    #[test]
    fn test_shield_zero_target_counts_as_full() {
        let status = peace_shield_status(dec!(100), Decimal::ZERO);
        assert!(status.is_active);
        assert_eq!(status.fill_percentage, dec!(100.0));
    }
}
