//! Standalone hybrid-kill advisory.
//!
//! Answers "should this surplus fully retire a small debt instead of
//! hitting the avalanche target?" without generating a plan. Compares
//! twelve months of freed minimum payments plus leftover-on-target
//! interest against twelve months of pure avalanche interest savings.

use crate::core::debt::{avalanche_target, DebtAccount};
use crate::core::money::{monthly_rate, round_money};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

const COMPARISON_MONTHS: Decimal = dec!(12);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KillStrategy {
    HybridKill,
    Avalanche,
}

/// The recommended use of a lump of attack equity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HybridKillAdvice {
    pub strategy: KillStrategy,
    /// Set when the strategy is a hybrid kill.
    pub kill_target_name: Option<String>,
    /// The avalanche target the comparison was run against.
    pub avalanche_target_name: String,
    pub freed_min_payment: Decimal,
    /// Twelve-month benefit of the recommended path.
    pub twelve_month_benefit: Decimal,
    /// Twelve-month benefit of the pure-avalanche alternative.
    pub avalanche_benefit: Decimal,
    pub reasoning: String,
}

/// Compare hybrid kill against pure avalanche for the given equity.
///
/// Returns `None` when there is nothing to decide: no active debts or
/// no equity to deploy.
pub fn hybrid_kill_target(debts: &[DebtAccount], attack_equity: Decimal) -> Option<HybridKillAdvice> {
    if attack_equity <= Decimal::ZERO {
        return None;
    }
    let target = avalanche_target(debts)?;
    let target_rate = monthly_rate(target.interest_rate);
    let avalanche_benefit = round_money(attack_equity * target_rate * COMPARISON_MONTHS);

    let mut best: Option<(&DebtAccount, Decimal)> = None;
    for debt in debts {
        if debt.name == target.name || !debt.is_active() || debt.balance > attack_equity {
            continue;
        }
        let leftover = attack_equity - debt.balance;
        let benefit = round_money(
            debt.min_payment * COMPARISON_MONTHS + leftover * target_rate * COMPARISON_MONTHS,
        );
        if benefit > avalanche_benefit && best.map_or(true, |(_, b)| benefit > b) {
            best = Some((debt, benefit));
        }
    }

    Some(match best {
        Some((kill, benefit)) => HybridKillAdvice {
            strategy: KillStrategy::HybridKill,
            kill_target_name: Some(kill.name.clone()),
            avalanche_target_name: target.name.clone(),
            freed_min_payment: kill.min_payment,
            twelve_month_benefit: benefit,
            avalanche_benefit,
            reasoning: format!(
                "Killing {} frees its ${}/month minimum: ${} over twelve months versus ${} from pure avalanche on {}",
                kill.name, kill.min_payment, benefit, avalanche_benefit, target.name
            ),
        },
        None => HybridKillAdvice {
            strategy: KillStrategy::Avalanche,
            kill_target_name: None,
            avalanche_target_name: target.name.clone(),
            freed_min_payment: Decimal::ZERO,
            twelve_month_benefit: avalanche_benefit,
            avalanche_benefit,
            reasoning: format!(
                "No fully-killable debt beats the avalanche: ${} on {} ({}% APR) saves ${} over twelve months",
                attack_equity, target.name, target.interest_rate, avalanche_benefit
            ),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hybrid_wins_with_heavy_minimum() {
        // Killing the $500 card frees $100/mo: $1,200 freed + leftover
        // interest vs $600 × 22%/12 × 12 = $132 avalanche benefit.
        let debts = vec![
            DebtAccount::new("Small Card", dec!(500), dec!(18), dec!(100)),
            DebtAccount::new("Big Card", dec!(10000), dec!(22), dec!(200)),
        ];
        let advice = hybrid_kill_target(&debts, dec!(600)).unwrap();
        assert_eq!(advice.strategy, KillStrategy::HybridKill);
        assert_eq!(advice.kill_target_name.as_deref(), Some("Small Card"));
        assert_eq!(advice.freed_min_payment, dec!(100));
        assert!(advice.twelve_month_benefit > advice.avalanche_benefit);
    }

    #[test]
    fn test_avalanche_wins_with_tiny_minimum() {
        let debts = vec![
            DebtAccount::new("Low Rate Card", dec!(500), dec!(5), dec!(5)),
            DebtAccount::new("Monster Card", dec!(10000), dec!(29.99), dec!(200)),
        ];
        let advice = hybrid_kill_target(&debts, dec!(600)).unwrap();
        // $5/mo freed = $60/yr vs $600 × 29.99%/12 × 12 ≈ $180/yr.
        assert_eq!(advice.strategy, KillStrategy::Avalanche);
        assert!(advice.kill_target_name.is_none());
        assert_eq!(advice.avalanche_target_name, "Monster Card");
    }

    #[test]
    fn test_single_debt_is_avalanche() {
        let debts = vec![DebtAccount::new("Solo Card", dec!(5000), dec!(20), dec!(150))];
        let advice = hybrid_kill_target(&debts, dec!(1000)).unwrap();
        assert_eq!(advice.strategy, KillStrategy::Avalanche);
    }

    #[test]
    fn test_no_debts_returns_none() {
        assert!(hybrid_kill_target(&[], dec!(1000)).is_none());
    }

    #[test]
    fn test_zero_equity_returns_none() {
        let debts = vec![
            DebtAccount::new("A", dec!(500), dec!(20), dec!(50)),
            DebtAccount::new("B", dec!(3000), dec!(24), dec!(90)),
        ];
        assert!(hybrid_kill_target(&debts, Decimal::ZERO).is_none());
    }

    #[test]
    fn test_reasoning_is_descriptive() {
        let debts = vec![
            DebtAccount::new("Tiny", dec!(200), dec!(15), dec!(50)),
            DebtAccount::new("Large", dec!(8000), dec!(24), dec!(180)),
        ];
        let advice = hybrid_kill_target(&debts, dec!(500)).unwrap();
        assert!(advice.reasoning.len() > 10);
    }
}
