use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal_macros::dec;
use velocity_engine::simulation::action_plan::{generate_action_plan_from, PlanRequest};
use velocity_engine::simulation::freedom_path::simulate_freedom_path_from;
use velocity_engine::simulation::scenario::{generate_random_portfolio, PortfolioConfig};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()
}

fn bench_freedom_path_4_debts(c: &mut Criterion) {
    let config = PortfolioConfig {
        debt_count: 4,
        ..Default::default()
    };
    let debts = generate_random_portfolio(&config);

    c.bench_function("freedom_path_4_debts", |b| {
        b.iter(|| simulate_freedom_path_from(start(), black_box(&debts), dec!(500)))
    });
}

fn bench_freedom_path_12_debts(c: &mut Criterion) {
    let config = PortfolioConfig {
        debt_count: 12,
        ..Default::default()
    };
    let debts = generate_random_portfolio(&config);

    c.bench_function("freedom_path_12_debts", |b| {
        b.iter(|| simulate_freedom_path_from(start(), black_box(&debts), dec!(500)))
    });
}

fn bench_freedom_path_minimums_only(c: &mut Criterion) {
    // No extra cash: the longest timelines the simulator produces.
    let config = PortfolioConfig {
        debt_count: 12,
        ..Default::default()
    };
    let debts = generate_random_portfolio(&config);

    c.bench_function("freedom_path_minimums_only", |b| {
        b.iter(|| simulate_freedom_path_from(start(), black_box(&debts), dec!(0)))
    });
}

fn bench_action_plan_12_debts(c: &mut Criterion) {
    let config = PortfolioConfig {
        debt_count: 12,
        ..Default::default()
    };
    let request = PlanRequest {
        debts: generate_random_portfolio(&config),
        cashflows: Vec::new(),
        checking_balance: dec!(8000),
        funding_account: "Checking".to_string(),
        shield_target: dec!(1000),
        weapons: Vec::new(),
    };

    c.bench_function("action_plan_12_debts", |b| {
        b.iter(|| generate_action_plan_from(start(), black_box(&request)))
    });
}

criterion_group!(
    benches,
    bench_freedom_path_4_debts,
    bench_freedom_path_12_debts,
    bench_freedom_path_minimums_only,
    bench_action_plan_12_debts
);
criterion_main!(benches);
