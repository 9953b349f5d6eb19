//! Incrementally maintained totals.
//!
//! [`RunningTotals`] subscribes to a ledger and folds each appended record into
//! the same per-payer, per-currency buckets the calculator builds from scratch,
//! so reading the summary costs O(1) in the number of records.

use crate::core::currency::ConversionConfig;
use crate::core::expense::ExpenseRecord;
use crate::core::ledger::LedgerObserver;
use crate::settlement::calculator::{CurrencyBuckets, SettlementSummary};

/// Cached settlement inputs, updated on every append.
#[derive(Debug, Clone)]
pub struct RunningTotals {
    config: ConversionConfig,
    buckets: CurrencyBuckets,
    count: usize,
}

impl RunningTotals {
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            config,
            buckets: CurrencyBuckets::new(),
            count: 0,
        }
    }

    /// Seed from records that were appended before subscribing.
    pub fn from_records(config: ConversionConfig, records: &[ExpenseRecord]) -> Self {
        let mut totals = Self::new(config);
        for record in records {
            totals.on_append(record);
        }
        totals
    }

    /// Number of records folded in so far.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn summary(&self) -> SettlementSummary {
        self.buckets.summarize(&self.config)
    }
}

impl LedgerObserver for RunningTotals {
    fn on_append(&mut self, record: &ExpenseRecord) {
        self.buckets.add(record);
        self.count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::Currency;
    use crate::core::ledger::Ledger;
    use crate::core::payer::Payer;
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_running_matches_recompute() {
        let config = ConversionConfig::default();
        let running = Arc::new(Mutex::new(RunningTotals::new(config)));
        let mut ledger = Ledger::new();
        ledger.subscribe(Arc::clone(&running));

        ledger.append("Taxi", dec!(1000), Currency::Thb, Payer::A).unwrap();
        ledger.append("Dinner", dec!(450), Currency::Twd, Payer::B).unwrap();
        ledger.append("Snacks", dec!(37.5), Currency::Twd, Payer::A).unwrap();

        let cached = running.lock().unwrap().summary();
        assert_eq!(cached, ledger.summarize(&config));
        assert_eq!(running.lock().unwrap().count(), 3);
    }

    #[test]
    fn test_seeded_from_existing_records() {
        let config = ConversionConfig::default();
        let mut ledger = Ledger::new();
        ledger.append("Hotel", dec!(2400), Currency::Thb, Payer::B).unwrap();

        let running = RunningTotals::from_records(config, ledger.all());
        assert_eq!(running.summary().net_transfer(), dec!(-1200));
    }
}
