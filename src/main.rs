//! velocity-engine CLI
//!
//! Run debt-payoff simulations from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Month-by-month freedom path from a snapshot file
//! velocity-engine path --input snapshot.json --extra 500
//!
//! # Day-by-day action plan
//! velocity-engine plan --input snapshot.json --format json
//!
//! # Safe-to-spend liquidity projection
//! velocity-engine safety --input snapshot.json
//!
//! # Scan for alerts and opportunities
//! velocity-engine alerts --input snapshot.json
//!
//! # Generate a random portfolio for testing
//! velocity-engine generate --debts 8 --output snapshot.json
//! ```

use rust_decimal::Decimal;
use std::fs;
use std::process;
use velocity_engine::detectors::alerts::detect_debt_alerts;
use velocity_engine::detectors::arbitrage::{
    detect_rate_arbitrage, detect_risky_opportunity, SavingsAccount,
};
use velocity_engine::detectors::hybrid::hybrid_kill_target;
use velocity_engine::detectors::timing::{closing_day_intelligence, detect_float_kill_opportunities};
use velocity_engine::prelude::*;
use velocity_engine::simulation::action_plan::generate_action_plan;
use velocity_engine::simulation::liquidity::{
    calculate_safe_attack_equity, peace_shield_status, DEFAULT_LOOKAHEAD_DAYS,
};
use velocity_engine::simulation::scenario::{generate_random_portfolio, PortfolioConfig};

fn print_usage() {
    eprintln!(
        r#"velocity-engine — multi-debt repayment strategy optimization

USAGE:
    velocity-engine <COMMAND> [OPTIONS]

COMMANDS:
    path        Simulate the month-by-month path to zero debt
    plan        Generate the day-by-day attack plan
    safety      Project liquidity and compute safe attack equity
    alerts      Scan debts and savings for alerts and opportunities
    generate    Generate a random debt snapshot (for testing)
    help        Show this message

OPTIONS (path, plan, safety, alerts):
    --input <FILE>      Path to JSON snapshot file
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (path):
    --extra <AMOUNT>    Extra monthly attack budget (default: 0)

OPTIONS (generate):
    --debts <N>         Number of debts (default: 8)
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    velocity-engine path --input snapshot.json --extra 500
    velocity-engine plan --input snapshot.json --format json
    velocity-engine safety --input snapshot.json
    velocity-engine alerts --input snapshot.json
    velocity-engine generate --debts 12 --output snapshot.json"#
    );
}

/// JSON schema for the input snapshot.
#[derive(serde::Serialize, serde::Deserialize)]
struct Snapshot {
    debts: Vec<DebtAccount>,
    #[serde(default)]
    cashflows: Vec<CashflowItem>,
    #[serde(default)]
    weapons: Vec<VelocityWeapon>,
    #[serde(default)]
    savings: Vec<SavingsAccount>,
    #[serde(default)]
    liquid_cash: Decimal,
    #[serde(default = "default_shield")]
    shield_target: Decimal,
    #[serde(default = "default_funding")]
    funding_account: String,
}

fn default_shield() -> Decimal {
    velocity_engine::core::money::DEFAULT_PEACE_SHIELD
}

fn default_funding() -> String {
    "Checking".to_string()
}

fn load_snapshot(path: &str) -> Snapshot {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "debts": [
    {{ "name": "Amex", "balance": "18500", "interest_rate": "24.99", "min_payment": "450", "due_day": 5, "subtype": "credit_card" }}
  ],
  "cashflows": [
    {{ "name": "Salary", "amount": "4250", "kind": "income", "schedule": {{ "kind": "semi_monthly", "first": 1, "second": 15 }} }}
  ],
  "liquid_cash": "5000",
  "shield_target": "1000"
}}"#
        );
        process::exit(1);
    })
}

/// Parsed `--input` / `--format` plus the `path`-only `--extra` flag.
struct CommonOpts {
    input: String,
    format: String,
    extra: Decimal,
}

fn parse_common(args: &[String], allow_extra: bool) -> CommonOpts {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut extra = Decimal::ZERO;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            "--extra" if allow_extra => {
                i += 1;
                extra = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--extra requires a decimal amount");
                        process::exit(1);
                    });
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let input = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    CommonOpts { input, format, extra }
}

fn cmd_path(args: &[String]) {
    let opts = parse_common(args, true);
    let snapshot = load_snapshot(&opts.input);
    let path = simulate_freedom_path(&snapshot.debts, opts.extra);

    if opts.format == "json" {
        println!("{}", serde_json::to_string_pretty(&path).unwrap());
    } else {
        println!("{}", path);
    }
}

fn cmd_plan(args: &[String]) {
    let opts = parse_common(args, false);
    let snapshot = load_snapshot(&opts.input);
    let request = PlanRequest {
        debts: snapshot.debts,
        cashflows: snapshot.cashflows,
        checking_balance: snapshot.liquid_cash,
        funding_account: snapshot.funding_account,
        shield_target: snapshot.shield_target,
        weapons: snapshot.weapons,
    };
    let plan = generate_action_plan(&request);

    if opts.format == "json" {
        println!("{}", serde_json::to_string_pretty(&plan).unwrap());
    } else if plan.is_empty() {
        println!("No movements scheduled in the planning window.");
    } else {
        for movement in &plan {
            println!("{}", movement);
        }
        println!("\nTotal movements: {}", plan.len());
    }
}

fn cmd_safety(args: &[String]) {
    let opts = parse_common(args, false);
    let snapshot = load_snapshot(&opts.input);

    let (incomes, expenses): (Vec<CashflowItem>, Vec<CashflowItem>) = snapshot
        .cashflows
        .iter()
        .cloned()
        .partition(|c| c.is_income());

    let projection = calculate_safe_attack_equity(
        snapshot.liquid_cash,
        snapshot.shield_target,
        &snapshot.debts,
        DEFAULT_LOOKAHEAD_DAYS,
        &incomes,
        &expenses,
    );
    let shield = peace_shield_status(snapshot.liquid_cash, snapshot.shield_target);

    if opts.format == "json" {
        #[derive(serde::Serialize)]
        struct SafetyOutput {
            projection: SafetyProjection,
            shield: velocity_engine::simulation::liquidity::ShieldStatus,
        }
        let output = SafetyOutput { projection, shield };
        println!("{}", serde_json::to_string_pretty(&output).unwrap());
    } else {
        println!("{}", projection);
        println!("{}", shield);
    }
}

fn cmd_alerts(args: &[String]) {
    let opts = parse_common(args, false);
    let snapshot = load_snapshot(&opts.input);

    let (incomes, expenses): (Vec<CashflowItem>, Vec<CashflowItem>) = snapshot
        .cashflows
        .iter()
        .cloned()
        .partition(|c| c.is_income());
    let projection = calculate_safe_attack_equity(
        snapshot.liquid_cash,
        snapshot.shield_target,
        &snapshot.debts,
        DEFAULT_LOOKAHEAD_DAYS,
        &incomes,
        &expenses,
    );
    let equity = projection.safe_equity;

    let alerts = detect_debt_alerts(&snapshot.debts);
    let float_kills = detect_float_kill_opportunities(&snapshot.debts, equity);
    let intel = closing_day_intelligence(&snapshot.debts);
    let hybrid = hybrid_kill_target(&snapshot.debts, equity);
    let arbitrage = detect_rate_arbitrage(&snapshot.savings, &snapshot.debts);
    let risky =
        detect_risky_opportunity(&snapshot.debts, snapshot.liquid_cash, snapshot.shield_target);

    if opts.format == "json" {
        #[derive(serde::Serialize)]
        struct AlertsOutput {
            safe_attack_equity: Decimal,
            alerts: Vec<DebtAlert>,
            float_kills: Vec<velocity_engine::detectors::timing::FloatKillCandidate>,
            closing_day_intel: Vec<velocity_engine::detectors::timing::ClosingDayIntel>,
            hybrid_kill: Option<velocity_engine::detectors::hybrid::HybridKillAdvice>,
            arbitrage: Vec<velocity_engine::detectors::arbitrage::ArbitrageFinding>,
            risky_opportunity: Option<velocity_engine::detectors::arbitrage::RiskyOpportunity>,
        }
        let output = AlertsOutput {
            safe_attack_equity: equity,
            alerts,
            float_kills,
            closing_day_intel: intel,
            hybrid_kill: hybrid,
            arbitrage,
            risky_opportunity: risky,
        };
        println!("{}", serde_json::to_string_pretty(&output).unwrap());
    } else {
        println!("Safe attack equity: {}\n", equity);

        if alerts.is_empty() {
            println!("No debt alerts.");
        } else {
            println!("Debt alerts:");
            for alert in &alerts {
                println!("  {}", alert);
            }
        }

        if !float_kills.is_empty() {
            println!("\nFloat-kill candidates:");
            for candidate in &float_kills {
                println!(
                    "  {}. {} (${}, due in {} days){}",
                    candidate.priority,
                    candidate.name,
                    candidate.balance,
                    candidate.days_until_due,
                    if candidate.can_kill { " [KILLABLE]" } else { "" }
                );
            }
        }

        if let Some(advice) = &hybrid {
            println!("\nStrategy: {}", advice.reasoning);
        }

        for finding in &arbitrage {
            println!("\n[{}] {}", finding.severity, finding.recommendation);
        }

        if let Some(opportunity) = &risky {
            println!("\nRisky opportunity: {}", opportunity.reasoning);
        }

        if !intel.is_empty() {
            println!("\nPurchase timing:");
            for card in &intel {
                for tip in &card.tips {
                    println!("  {}: {}", card.name, tip);
                }
            }
        }
    }
}

fn cmd_generate(args: &[String]) {
    let mut debt_count = 8usize;
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--debts" => {
                i += 1;
                debt_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--debts requires a number");
                        process::exit(1);
                    });
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = PortfolioConfig {
        debt_count,
        ..Default::default()
    };
    let debts = generate_random_portfolio(&config);

    let snapshot = Snapshot {
        debts,
        cashflows: Vec::new(),
        weapons: Vec::new(),
        savings: Vec::new(),
        liquid_cash: Decimal::from(5000),
        shield_target: default_shield(),
        funding_account: default_funding(),
    };

    let json = serde_json::to_string_pretty(&snapshot).unwrap();

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!("Generated {} debts → {}", debt_count, path);
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "path" => cmd_path(rest),
        "plan" => cmd_plan(rest),
        "safety" => cmd_safety(rest),
        "alerts" => cmd_alerts(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
