//! Freedom path simulation example.
//!
//! Demonstrates how extra monthly cash accelerates the month-by-month
//! march to zero debt.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use velocity_engine::core::debt::{DebtAccount, DebtSubtype};
use velocity_engine::detectors::alerts::detect_debt_alerts;
use velocity_engine::simulation::freedom_path::{
    calculate_debt_free_date_from, simulate_freedom_path_from,
};

fn main() {
    println!("╔════════════════════════════════════════════╗");
    println!("║  velocity-engine: Freedom Path Example     ║");
    println!("╚════════════════════════════════════════════╝\n");

    let start = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();

    let debts = vec![
        DebtAccount::new("Amex Platinum", dec!(18500), dec!(24.99), dec!(450))
            .with_due_day(5)
            .with_subtype(DebtSubtype::CreditCard),
        DebtAccount::new("Chase Freedom", dec!(2200), dec!(19.99), dec!(65))
            .with_due_day(12)
            .with_subtype(DebtSubtype::CreditCard),
        DebtAccount::new("Auto Loan", dec!(14000), dec!(6.5), dec!(385))
            .with_due_day(20)
            .with_subtype(DebtSubtype::AutoLoan),
    ];

    // --- Scenario 1: Minimums only ---
    println!("━━━ Scenario 1: Minimum payments only ━━━\n");

    let baseline = simulate_freedom_path_from(start, &debts, dec!(0));
    println!("Debt free in:   {} months", baseline.total_months);
    println!("Freedom date:   {}", baseline.freedom_date);
    println!("Total interest: ${}\n", baseline.total_interest_paid);

    // --- Scenario 2: $800/month extra, avalanche-allocated ---
    println!("━━━ Scenario 2: $800/month extra ━━━\n");

    let accelerated = simulate_freedom_path_from(start, &debts, dec!(800));
    println!("Debt free in:   {} months", accelerated.total_months);
    println!("Freedom date:   {}", accelerated.freedom_date);
    println!("Total interest: ${}\n", accelerated.total_interest_paid);

    let projection = calculate_debt_free_date_from(start, &debts, dec!(800));
    println!(
        "Velocity saves {} months and ${} in interest.\n",
        projection.months_saved, projection.interest_saved
    );

    // --- Scenario 3: Elimination timeline ---
    println!("━━━ Scenario 3: Elimination events ━━━\n");

    for snapshot in &accelerated.timeline {
        for event in &snapshot.events {
            println!("Month {:>3}: {}", snapshot.month, event);
        }
    }
    println!();

    // --- Scenario 4: Health check ---
    println!("━━━ Scenario 4: Debt alerts ━━━\n");

    let alerts = detect_debt_alerts(&debts);
    if alerts.is_empty() {
        println!("No structural payment problems detected.");
    } else {
        for alert in &alerts {
            println!("{}", alert);
        }
    }
}
