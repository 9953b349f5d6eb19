//! Bangkok weekend walkthrough.
//!
//! Records a handful of expenses in both currencies and shows how the
//! settlement line changes as the trip goes on.

use rust_decimal_macros::dec;
use trip_ledger::core::currency::{ConversionConfig, Currency};
use trip_ledger::core::ledger::Ledger;
use trip_ledger::core::payer::Payer;
use trip_ledger::settlement::report::{settlement_line, TripReport};

fn main() {
    println!("╔══════════════════════════════════════╗");
    println!("║  trip-ledger: Bangkok Weekend Demo   ║");
    println!("╚══════════════════════════════════════╝\n");

    let config = ConversionConfig::default();
    println!("Rate: 1 {} = {} {}\n", config.reference(), config.rate(), config.counter());

    let mut ledger = Ledger::new();
    let entries = [
        ("Taxi", dec!(1000), Currency::Thb, Payer::A),
        ("Dinner", dec!(450), Currency::Twd, Payer::B),
        ("Chatuchak snacks", dec!(320), Currency::Thb, Payer::B),
        ("Thai massage", dec!(1200), Currency::Thb, Payer::A),
        ("Airport rail", dec!(270), Currency::Twd, Payer::B),
    ];

    for (item, amount, currency, payer) in entries {
        ledger
            .append(item, amount, currency, payer)
            .expect("demo entries are valid");
        let summary = ledger.summarize(&config);
        println!(
            "+ {:<18} {:>7} {}  by {}  →  {}",
            item,
            amount.to_string(),
            currency,
            payer,
            settlement_line(&summary)
        );
    }

    println!("\n━━━ Rejected entry ━━━\n");
    match ledger.append("Tip", dec!(0), Currency::Thb, Payer::A) {
        Ok(_) => println!("unexpectedly accepted"),
        Err(e) => println!("  {} (ledger still has {} entries)", e, ledger.len()),
    }

    println!("\n━━━ Final report ━━━\n");
    let report = TripReport::new(&ledger, &config);
    println!("{}", report);
    println!("{}", report.summary());
}
