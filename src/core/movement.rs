use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// What kind of money movement a plan step represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    Income,
    MinPayment,
    Attack,
    FloatKill,
    HybridKill,
    VelocityChunk,
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Income => "income",
            Self::MinPayment => "min_payment",
            Self::Attack => "attack",
            Self::FloatKill => "float_kill",
            Self::HybridKill => "hybrid_kill",
            Self::VelocityChunk => "velocity_chunk",
        };
        write!(f, "{}", s)
    }
}

/// Impact metrics attached to a movement so the caller can render a
/// complete explanation without re-deriving anything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovementImpact {
    pub daily_interest_saved: Decimal,
    pub days_shortened: i64,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
    pub total_interest_saved: Decimal,
    /// Share of the destination debt retired by this movement, percent.
    pub debt_progress_pct: Decimal,
}

/// A single recommended money movement in a chronological action plan.
///
/// Movements are pure simulation artifacts — emitting one mutates no
/// persisted state. Executing it is the caller's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movement {
    pub id: Uuid,
    pub date: NaiveDate,
    pub title: String,
    pub description: String,
    pub amount: Decimal,
    pub kind: MovementKind,
    /// Account the money leaves.
    pub source: String,
    /// Account the money arrives at.
    pub destination: String,
    #[serde(default)]
    pub impact: MovementImpact,
}

impl Movement {
    pub fn new(
        date: NaiveDate,
        kind: MovementKind,
        title: impl Into<String>,
        description: impl Into<String>,
        amount: Decimal,
        source: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            title: title.into(),
            description: description.into(),
            amount,
            kind,
            source: source.into(),
            destination: destination.into(),
            impact: MovementImpact::default(),
        }
    }

    pub fn with_impact(mut self, impact: MovementImpact) -> Self {
        self.impact = impact;
        self
    }
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {} — ${} ({} → {})",
            self.date, self.kind, self.title, self.amount, self.source, self.destination
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_movement_serializes_kind_snake_case() {
        let m = Movement::new(
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            MovementKind::FloatKill,
            "PAY OFF: Visa",
            "Kill before grace period ends",
            dec!(450),
            "Checking",
            "Visa",
        );
        let json = serde_json::to_string(&m).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["kind"], "float_kill");
        assert_eq!(parsed["source"], "Checking");
    }

    #[test]
    fn test_impact_defaults_zero() {
        let impact = MovementImpact::default();
        assert_eq!(impact.daily_interest_saved, Decimal::ZERO);
        assert_eq!(impact.days_shortened, 0);
    }
}
