//! Day-by-day action plan example.
//!
//! Demonstrates the multi-phase planner: minimum payments, income
//! deposits, a HELOC velocity chunk, and surplus attacks.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use velocity_engine::core::cashflow::{CashflowItem, Recurrence};
use velocity_engine::core::debt::{DebtAccount, DebtSubtype, VelocityWeapon};
use velocity_engine::simulation::action_plan::{generate_action_plan_from, PlanRequest};
use velocity_engine::simulation::liquidity::{
    calculate_safe_attack_equity_from, peace_shield_status, DEFAULT_LOOKAHEAD_DAYS,
};

fn main() {
    println!("╔════════════════════════════════════════════╗");
    println!("║  velocity-engine: Action Plan Example      ║");
    println!("╚════════════════════════════════════════════╝\n");

    let start = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();

    let debts = vec![
        DebtAccount::new("Store Card", dec!(900), dec!(26.99), dec!(35))
            .with_due_day(10)
            .with_subtype(DebtSubtype::CreditCard)
            .with_credit_limit(dec!(3000)),
        DebtAccount::new("Amex Platinum", dec!(18500), dec!(24.99), dec!(450))
            .with_due_day(5)
            .with_subtype(DebtSubtype::CreditCard)
            .with_credit_limit(dec!(25000)),
        DebtAccount::new("Auto Loan", dec!(14000), dec!(6.5), dec!(385))
            .with_due_day(20)
            .with_subtype(DebtSubtype::AutoLoan),
    ];
    let cashflows = vec![
        CashflowItem::income("Salary", dec!(4250), Recurrence::semi_monthly(1, 15).unwrap()),
        CashflowItem::expense("Rent", dec!(1800), Recurrence::monthly(3).unwrap()),
    ];
    let weapons = vec![VelocityWeapon::new(
        "HELOC",
        dec!(12000),
        dec!(60000),
        dec!(8.5),
        DebtSubtype::Heloc,
    )];

    // --- Safety check before attacking ---
    println!("━━━ Liquidity safety ━━━\n");

    let (incomes, expenses): (Vec<_>, Vec<_>) =
        cashflows.iter().cloned().partition(|c| c.is_income());
    let projection = calculate_safe_attack_equity_from(
        start,
        dec!(6500),
        dec!(1000),
        &debts,
        DEFAULT_LOOKAHEAD_DAYS,
        &incomes,
        &expenses,
    );
    println!("{}", projection);
    println!("{}", peace_shield_status(dec!(6500), dec!(1000)));

    // --- The plan itself ---
    println!("━━━ 62-day action plan ━━━\n");

    let plan = generate_action_plan_from(
        start,
        &PlanRequest {
            debts,
            cashflows,
            checking_balance: dec!(6500),
            funding_account: "Checking".to_string(),
            shield_target: dec!(1000),
            weapons,
        },
    );

    for movement in &plan {
        println!("{}", movement);
    }
    println!("\nTotal movements: {}", plan.len());
}
