//! trip-ledger CLI
//!
//! Settle a two-person trip from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Print the settlement for an expenses file
//! trip-ledger summarize --input expenses.json
//!
//! # Output as JSON, with a different THB -> TWD rate
//! trip-ledger summarize --input expenses.json --format json --rate 0.92
//!
//! # Generate a random trip for testing
//! trip-ledger generate --count 40 --output trip.json
//! ```

use rust_decimal::Decimal;
use std::fs;
use std::process;
use trip_ledger::core::currency::ConversionConfig;
use trip_ledger::core::expense::ExpenseInput;
use trip_ledger::core::ledger::Ledger;
use trip_ledger::settlement::calculator::{Settlement, SettlementSummary};
use trip_ledger::settlement::report::TripReport;
use trip_ledger::simulation::trip_generator::{generate_random_trip, TripConfig};

fn print_usage() {
    eprintln!(
        r#"trip-ledger — shared trip expenses and settlement for two travellers

USAGE:
    trip-ledger <COMMAND> [OPTIONS]

COMMANDS:
    summarize   Record an expenses file and print who owes whom
    generate    Generate a random expenses file (for testing)
    help        Show this message

OPTIONS (summarize):
    --input <FILE>      Path to JSON expenses file
    --format <FORMAT>   Output format: text (default) or json
    --rate <RATE>       TWD bought by one THB (default: 0.9)

OPTIONS (generate):
    --count <N>         Number of expenses (default: 20)
    --output <FILE>     Write to file instead of stdout

ENVIRONMENT:
    RUST_LOG            Log filter, e.g. RUST_LOG=debug

EXAMPLES:
    trip-ledger summarize --input expenses.json
    trip-ledger summarize --input expenses.json --format json --rate 0.92
    trip-ledger generate --count 40 --output trip.json"#
    );
}

#[derive(serde::Deserialize, serde::Serialize)]
struct ExpensesFile {
    expenses: Vec<ExpenseInput>,
}

/// JSON output schema for a settlement.
#[derive(serde::Serialize)]
struct SummaryOutput<'a> {
    rate: Decimal,
    expense_count: usize,
    summary: &'a SettlementSummary,
    settlement: Settlement,
}

fn load_ledger(path: &str) -> Ledger {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    let file: ExpensesFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "expenses": [
    {{ "item": "Taxi", "amount": "1000", "currency": "THB", "paid_by": "A" }}
  ]
}}"#
        );
        process::exit(1);
    });

    let mut ledger = Ledger::new();
    for (i, input) in file.expenses.iter().enumerate() {
        if let Err(e) = ledger.append_raw(input) {
            eprintln!("Invalid expense #{} ('{}'): {}", i + 1, input.item, e);
            process::exit(1);
        }
    }
    log::info!("recorded {} expenses from {}", ledger.len(), path);
    ledger
}

fn cmd_summarize(args: &[String]) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut config = ConversionConfig::default();
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
            "--rate" => {
                i += 1;
                let rate: Decimal = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--rate requires a decimal number");
                        process::exit(1);
                    });
                config = config.with_rate(rate).unwrap_or_else(|e| {
                    eprintln!("Invalid configuration: {}", e);
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

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let ledger = load_ledger(&path);

    if format == "json" {
        let summary = ledger.summarize(&config);
        let output = SummaryOutput {
            rate: config.rate(),
            expense_count: ledger.len(),
            summary: &summary,
            settlement: summary.settlement(),
        };
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing summary: {}", e);
                process::exit(1);
            }
        }
    } else {
        let report = TripReport::new(&ledger, &config);
        println!("{}", report);
        println!("{}", report.summary());
    }
}

fn cmd_generate(args: &[String]) {
    let mut count = 20usize;
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--count" => {
                i += 1;
                count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--count requires a number");
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

    let config = TripConfig {
        expense_count: count,
        ..Default::default()
    };
    let output = ExpensesFile {
        expenses: generate_random_trip(&config),
    };

    let json = serde_json::to_string_pretty(&output).unwrap_or_else(|e| {
        eprintln!("Error serializing expenses: {}", e);
        process::exit(1);
    });

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!("Generated {} expenses → {}", output.expenses.len(), path);
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
        "summarize" => cmd_summarize(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
