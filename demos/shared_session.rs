//! Two travellers adding expenses from separate threads.
//!
//! Both threads write into one `SharedLedger`; a running-totals observer keeps
//! the cached settlement in step with a full recomputation.

use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};
use std::thread;
use trip_ledger::core::currency::{ConversionConfig, Currency};
use trip_ledger::core::ledger::SharedLedger;
use trip_ledger::core::payer::Payer;
use trip_ledger::settlement::running::RunningTotals;

fn main() {
    println!("╔══════════════════════════════════════╗");
    println!("║  trip-ledger: Shared Session Demo    ║");
    println!("╚══════════════════════════════════════╝\n");

    let config = ConversionConfig::default();
    let ledger = SharedLedger::new();
    let running = Arc::new(Mutex::new(RunningTotals::new(config)));
    ledger.subscribe(Arc::clone(&running));

    let person_a = {
        let ledger = ledger.clone();
        thread::spawn(move || {
            for item in ["Coffee", "Tuk-tuk", "Pad thai"] {
                ledger
                    .append(item, dec!(150), Currency::Thb, Payer::A)
                    .expect("valid expense");
            }
        })
    };
    let person_b = {
        let ledger = ledger.clone();
        thread::spawn(move || {
            for item in ["Bubble tea", "Souvenirs"] {
                ledger
                    .append(item, dec!(180), Currency::Twd, Payer::B)
                    .expect("valid expense");
            }
        })
    };
    person_a.join().expect("person A thread");
    person_b.join().expect("person B thread");

    let recomputed = ledger.summarize(&config);
    let cached = running.lock().expect("running totals").summary();

    println!("Recorded {} expenses", ledger.len());
    println!("{}", recomputed);
    println!("Cached summary matches recomputation: {}", cached == recomputed);
}
