//! # velocity-engine
//!
//! Multi-debt repayment strategy optimization and liquidity safety engine.
//!
//! Given a set of interest-bearing liabilities, recurring cashflows, and
//! a liquid cash position, this engine computes which debt to pay down,
//! by how much, and when, to minimize total interest and time to zero
//! debt while holding a liquidity safety floor.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: money math, debts, weapons, cashflows, movements
//! - **amortization** — Exact-decimal payoff and interest projection
//! - **simulation** — Month-by-month freedom path, day-by-day action planning, liquidity safety
//! - **detectors** — Stateless analyzers: debt alerts, float kills, timing, arbitrage

pub mod amortization;
pub mod core;
pub mod detectors;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::cashflow::{CashflowItem, Recurrence};
    pub use crate::core::debt::{DebtAccount, DebtSubtype, VelocityWeapon};
    pub use crate::core::movement::{Movement, MovementKind};
    pub use crate::detectors::alerts::{detect_debt_alerts, AlertSeverity, DebtAlert};
    pub use crate::simulation::action_plan::{generate_action_plan, PlanRequest};
    pub use crate::simulation::freedom_path::{simulate_freedom_path, FreedomPath};
    pub use crate::simulation::liquidity::{calculate_safe_attack_equity, SafetyProjection};
}
