use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors arising from recurrence construction.
#[derive(Debug, Error)]
pub enum RecurrenceError {
    #[error("day of month must be 1-31, got {0}")]
    InvalidDayOfMonth(u32),
    #[error("semi-monthly days must differ, got {0} twice")]
    DuplicateSemiMonthlyDay(u32),
    #[error("invalid month {month} / day {day} for annual recurrence")]
    InvalidAnnualDate { month: u32, day: u32 },
}

/// When a recurring cashflow item triggers.
///
/// The engine only needs the "does this item trigger on date D"
/// capability; the richer recurrence shapes exist because real income
/// schedules (biweekly paychecks, semi-monthly salary) do not fit a
/// simple day-of-month model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recurrence {
    /// Triggers on one day each month. A day past the end of a short
    /// month (e.g. 31 in February) triggers on that month's last day.
    Monthly { day: u32 },
    /// Triggers every week on the given weekday.
    Weekly { weekday: Weekday },
    /// Triggers every 14 days from an anchor date.
    Biweekly { anchor: NaiveDate },
    /// Triggers on two days each month (typically 1st and 15th).
    SemiMonthly { first: u32, second: u32 },
    /// Triggers once a year.
    Annual { month: u32, day: u32 },
}

impl Recurrence {
    pub fn monthly(day: u32) -> Result<Self, RecurrenceError> {
        if day == 0 || day > 31 {
            return Err(RecurrenceError::InvalidDayOfMonth(day));
        }
        Ok(Self::Monthly { day })
    }

    pub fn semi_monthly(first: u32, second: u32) -> Result<Self, RecurrenceError> {
        for d in [first, second] {
            if d == 0 || d > 31 {
                return Err(RecurrenceError::InvalidDayOfMonth(d));
            }
        }
        if first == second {
            return Err(RecurrenceError::DuplicateSemiMonthlyDay(first));
        }
        Ok(Self::SemiMonthly { first, second })
    }

    pub fn annual(month: u32, day: u32) -> Result<Self, RecurrenceError> {
        if month == 0 || month > 12 || day == 0 || day > 31 {
            return Err(RecurrenceError::InvalidAnnualDate { month, day });
        }
        Ok(Self::Annual { month, day })
    }

    /// Whether this recurrence triggers on the given date.
    pub fn triggers_on(&self, date: NaiveDate) -> bool {
        match *self {
            Self::Monthly { day } => date.day() == effective_day(date, day),
            Self::Weekly { weekday } => date.weekday() == weekday,
            Self::Biweekly { anchor } => {
                let delta = (date - anchor).num_days();
                delta >= 0 && delta % 14 == 0
            }
            Self::SemiMonthly { first, second } => {
                date.day() == effective_day(date, first) || date.day() == effective_day(date, second)
            }
            Self::Annual { month, day } => {
                date.month() == month && date.day() == effective_day(date, day)
            }
        }
    }
}

/// Clamp a scheduled day-of-month to the month that contains `date`.
fn effective_day(date: NaiveDate, scheduled: u32) -> u32 {
    scheduled.min(days_in_month(date.year(), date.month()))
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_y, next_m) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    // First of next month minus one day. Both dates are always valid.
    let first_next = NaiveDate::from_ymd_opt(next_y, next_m, 1).expect("valid month start");
    first_next.pred_opt().expect("not date MIN").day()
}

/// A recurring cashflow entry: income credits, expense debits.
///
/// `amount` is always stored non-negative; direction comes from `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashflowItem {
    pub name: String,
    pub amount: Decimal,
    pub kind: CashflowKind,
    pub schedule: Recurrence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashflowKind {
    Income,
    Expense,
}

impl CashflowItem {
    pub fn income(
        name: impl Into<String>,
        amount: Decimal,
        schedule: Recurrence,
    ) -> Self {
        Self {
            name: name.into(),
            amount: amount.abs(),
            kind: CashflowKind::Income,
            schedule,
        }
    }

    pub fn expense(
        name: impl Into<String>,
        amount: Decimal,
        schedule: Recurrence,
    ) -> Self {
        Self {
            name: name.into(),
            amount: amount.abs(),
            kind: CashflowKind::Expense,
            schedule,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == CashflowKind::Income
    }

    pub fn triggers_on(&self, date: NaiveDate) -> bool {
        self.schedule.triggers_on(date)
    }

    /// Signed effect on a cash balance: income positive, expense negative.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            CashflowKind::Income => self.amount,
            CashflowKind::Expense => -self.amount,
        }
    }
}
