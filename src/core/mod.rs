//! Foundational value types: money math, debts, cashflows, movements.

pub mod cashflow;
pub mod debt;
pub mod money;
pub mod movement;
