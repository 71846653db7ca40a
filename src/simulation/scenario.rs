//! Random portfolio generation for stress testing.
//!
//! Produces randomized debt portfolios to exercise the simulators
//! under varied balance, rate, and payment mixes.

use crate::core::debt::{DebtAccount, DebtSubtype};
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Configuration for generating a random debt portfolio.
#[derive(Debug, Clone)]
pub struct PortfolioConfig {
    /// Number of debts to generate.
    pub debt_count: usize,
    /// Minimum starting balance.
    pub min_balance: Decimal,
    /// Maximum starting balance.
    pub max_balance: Decimal,
    /// Minimum APR.
    pub min_rate: Decimal,
    /// Maximum APR.
    pub max_rate: Decimal,
    /// Minimum payment as a fraction of balance.
    pub min_payment_ratio: Decimal,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            debt_count: 8,
            min_balance: Decimal::from(500),
            max_balance: Decimal::from(60_000),
            min_rate: dec!(3.5),
            max_rate: dec!(29.99),
            min_payment_ratio: dec!(0.03),
        }
    }
}

const SUBTYPES: [DebtSubtype; 5] = [
    DebtSubtype::CreditCard,
    DebtSubtype::AutoLoan,
    DebtSubtype::PersonalLoan,
    DebtSubtype::StudentLoan,
    DebtSubtype::Heloc,
];

/// Generate a random debt portfolio for testing.
pub fn generate_random_portfolio(config: &PortfolioConfig) -> Vec<DebtAccount> {
    let mut rng = rand::thread_rng();
    let mut debts = Vec::with_capacity(config.debt_count);

    let min_bal: f64 = config.min_balance.to_string().parse().unwrap_or(500.0);
    let max_bal: f64 = config.max_balance.to_string().parse().unwrap_or(60_000.0);
    let min_rate: f64 = config.min_rate.to_string().parse().unwrap_or(3.5);
    let max_rate: f64 = config.max_rate.to_string().parse().unwrap_or(29.99);
    let ratio: f64 = config
        .min_payment_ratio
        .to_string()
        .parse()
        .unwrap_or(0.03);

    for i in 0..config.debt_count {
        let balance = Decimal::from_f64_retain(rng.gen_range(min_bal..max_bal))
            .unwrap_or(Decimal::from(1000))
            .round_dp(2);
        let rate = Decimal::from_f64_retain(rng.gen_range(min_rate..max_rate))
            .unwrap_or(dec!(18.0))
            .round_dp(2);
        let min_payment = (balance * Decimal::from_f64_retain(ratio).unwrap_or(dec!(0.03)))
            .round_dp(2)
            .max(dec!(25));
        let subtype = SUBTYPES[rng.gen_range(0..SUBTYPES.len())];

        debts.push(
            DebtAccount::new(format!("DEBT-{:03}", i), balance, rate, min_payment)
                .with_due_day(rng.gen_range(1..=28))
                .with_subtype(subtype),
        );
    }

    debts
}
