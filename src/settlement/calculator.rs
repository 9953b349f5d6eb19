use crate::core::currency::{ConversionConfig, Currency};
use crate::core::expense::ExpenseRecord;
use crate::core::payer::Payer;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The single payment that evens out the trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Settlement {
    /// Both travellers have paid the same normalized amount.
    Settled,
    /// `from` owes `to` this amount, in the reference currency.
    Transfer {
        from: Payer,
        to: Payer,
        amount: Decimal,
    },
}

/// Amount each payer spent in each recorded currency, before normalization.
///
/// Sums within one currency are exact, so bucketing first keeps the
/// normalized totals independent of the order expenses were recorded in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrencyBuckets {
    /// (payer, currency) -> raw amount
    raw: BTreeMap<(Payer, Currency), Decimal>,
}

impl Serialize for CurrencyBuckets {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.raw.len()))?;
        for ((payer, currency), amount) in &self.raw {
            map.serialize_entry(&format!("{}:{}", payer, currency), amount)?;
        }
        map.end()
    }
}

impl CurrencyBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record in. Amounts are capped at
    /// [`MAX_AMOUNT`](crate::core::expense::MAX_AMOUNT), so the sums cannot
    /// overflow for any ledger that fits in memory.
    pub fn add(&mut self, record: &ExpenseRecord) {
        *self
            .raw
            .entry((record.paid_by(), record.currency()))
            .or_insert(Decimal::ZERO) += record.amount();
    }

    /// Raw amount `payer` spent in `currency`.
    pub fn spent(&self, payer: Payer, currency: Currency) -> Decimal {
        self.raw
            .get(&(payer, currency))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Normalize every bucket and derive the settlement.
    pub fn summarize(&self, config: &ConversionConfig) -> SettlementSummary {
        let mut total_by_payer = BTreeMap::new();
        for payer in Payer::ALL {
            let total: Decimal = Currency::ALL
                .iter()
                .map(|&currency| config.to_reference(self.spent(payer, currency), currency))
                .sum();
            total_by_payer.insert(payer, total);
        }

        let total_a = total_by_payer[&Payer::A];
        let total_b = total_by_payer[&Payer::B];
        let total_all_payers = total_a + total_b;

        SettlementSummary {
            reference: config.reference(),
            total_all_payers,
            total_by_payer,
            share_per_person: total_all_payers / Decimal::TWO,
            net_transfer: (total_a - total_b) / Decimal::TWO,
            spent: self.clone(),
        }
    }
}

/// Derived totals and settlement for a ledger.
///
/// Never stored on its own; recompute it from the records whenever it is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettlementSummary {
    /// Currency every amount below is expressed in.
    reference: Currency,
    total_all_payers: Decimal,
    total_by_payer: BTreeMap<Payer, Decimal>,
    /// Equal-split share each traveller should bear.
    share_per_person: Decimal,
    /// Positive: B owes A. Negative: A owes B. Zero: settled.
    net_transfer: Decimal,
    /// Raw amounts, serialized with "payer:currency" keys.
    spent: CurrencyBuckets,
}

impl SettlementSummary {
    pub fn reference(&self) -> Currency {
        self.reference
    }

    /// Sum of every expense, normalized.
    pub fn total_all_payers(&self) -> Decimal {
        self.total_all_payers
    }

    /// Normalized total paid by one traveller.
    pub fn total_for(&self, payer: Payer) -> Decimal {
        self.total_by_payer
            .get(&payer)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn share_per_person(&self) -> Decimal {
        self.share_per_person
    }

    /// Signed transfer: A's total minus the equal share, i.e. `(A - B) / 2`.
    pub fn net_transfer(&self) -> Decimal {
        self.net_transfer
    }

    /// Raw amount `payer` spent in `currency`, before normalization.
    pub fn spent(&self, payer: Payer, currency: Currency) -> Decimal {
        self.spent.spent(payer, currency)
    }

    pub fn is_settled(&self) -> bool {
        self.net_transfer.is_zero()
    }

    /// Who pays whom, and how much.
    pub fn settlement(&self) -> Settlement {
        if self.net_transfer > Decimal::ZERO {
            Settlement::Transfer {
                from: Payer::B,
                to: Payer::A,
                amount: self.net_transfer,
            }
        } else if self.net_transfer < Decimal::ZERO {
            Settlement::Transfer {
                from: Payer::A,
                to: Payer::B,
                amount: self.net_transfer.abs(),
            }
        } else {
            Settlement::Settled
        }
    }
}

/// Computes the settlement for a sequence of expense records.
///
/// Pure: the same records always give the same summary, and nothing is cached
/// between calls.
///
/// # Algorithm
///
/// 1. Group amounts by payer and recorded currency.
/// 2. Normalize each group into the reference currency.
/// 3. Total = A + B; each traveller's share is half of it.
/// 4. Net transfer = A - share, computed as `(A - B) / 2`. Positive means
///    B owes A.
///
/// # Examples
///
/// ```
/// use trip_ledger::core::currency::{ConversionConfig, Currency};
/// use trip_ledger::core::expense::ExpenseRecord;
/// use trip_ledger::core::payer::Payer;
/// use trip_ledger::settlement::calculator::SettlementCalculator;
/// use rust_decimal_macros::dec;
///
/// let records = vec![
///     ExpenseRecord::new("Taxi", dec!(1000), Currency::Thb, Payer::A).unwrap(),
///     ExpenseRecord::new("Dinner", dec!(450), Currency::Twd, Payer::B).unwrap(),
/// ];
/// let summary = SettlementCalculator::new(ConversionConfig::default()).summarize(&records);
/// assert_eq!(summary.total_all_payers(), dec!(1500));
/// assert_eq!(summary.net_transfer(), dec!(250));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementCalculator {
    config: ConversionConfig,
}

impl SettlementCalculator {
    pub fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn summarize(&self, records: &[ExpenseRecord]) -> SettlementSummary {
        let mut buckets = CurrencyBuckets::new();
        for record in records {
            buckets.add(record);
        }
        buckets.summarize(&self.config)
    }
}

impl fmt::Display for SettlementSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Settlement Summary ({}) ===", self.reference)?;
        writeln!(f, "Total:          {}", self.total_all_payers)?;
        for payer in Payer::ALL {
            writeln!(f, "Paid by {}:      {}", payer, self.total_for(payer))?;
        }
        writeln!(f, "Share each:     {}", self.share_per_person)?;
        match self.settlement() {
            Settlement::Settled => writeln!(f, "Settlement:     settled")?,
            Settlement::Transfer { from, to, amount } => {
                writeln!(f, "Settlement:     {} pays {} {}", from, to, amount)?
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(item: &str, amount: Decimal, currency: Currency, payer: Payer) -> ExpenseRecord {
        ExpenseRecord::new(item, amount, currency, payer).unwrap()
    }

    fn calculator() -> SettlementCalculator {
        SettlementCalculator::new(ConversionConfig::default())
    }

    #[test]
    fn test_mixed_currency_scenario() {
        let records = vec![
            record("Taxi", dec!(1000), Currency::Thb, Payer::A),
            record("Dinner", dec!(450), Currency::Twd, Payer::B),
        ];
        let summary = calculator().summarize(&records);

        assert_eq!(summary.total_for(Payer::A), dec!(1000));
        assert_eq!(summary.total_for(Payer::B), dec!(500));
        assert_eq!(summary.total_all_payers(), dec!(1500));
        assert_eq!(summary.share_per_person(), dec!(750));
        assert_eq!(summary.net_transfer(), dec!(250));
        assert_eq!(
            summary.settlement(),
            Settlement::Transfer {
                from: Payer::B,
                to: Payer::A,
                amount: dec!(250),
            }
        );
    }

    #[test]
    fn test_empty_ledger_is_settled() {
        let summary = calculator().summarize(&[]);
        assert_eq!(summary.total_all_payers(), Decimal::ZERO);
        assert_eq!(summary.net_transfer(), Decimal::ZERO);
        assert_eq!(summary.settlement(), Settlement::Settled);
        assert!(summary.is_settled());
    }

    #[test]
    fn test_single_payer_owed_half() {
        let records = vec![
            record("Hotel", dec!(3000), Currency::Thb, Payer::B),
            record("Boat", dec!(800), Currency::Thb, Payer::B),
        ];
        let summary = calculator().summarize(&records);

        assert_eq!(summary.total_all_payers(), dec!(3800));
        assert_eq!(summary.net_transfer(), dec!(-1900));
        assert_eq!(
            summary.settlement(),
            Settlement::Transfer {
                from: Payer::A,
                to: Payer::B,
                amount: dec!(1900),
            }
        );
    }

    #[test]
    fn test_equal_normalized_amounts_settle() {
        // 900 TWD = 1000 THB at 0.9
        let records = vec![
            record("Temple tickets", dec!(1000), Currency::Thb, Payer::A),
            record("Night market", dec!(900), Currency::Twd, Payer::B),
        ];
        let summary = calculator().summarize(&records);
        assert!(summary.is_settled());
        assert_eq!(summary.settlement(), Settlement::Settled);
    }

    #[test]
    fn test_raw_breakdown() {
        let records = vec![
            record("Taxi", dec!(100), Currency::Thb, Payer::A),
            record("Taxi", dec!(50), Currency::Thb, Payer::A),
            record("Tea", dec!(90), Currency::Twd, Payer::A),
        ];
        let summary = calculator().summarize(&records);
        assert_eq!(summary.spent(Payer::A, Currency::Thb), dec!(150));
        assert_eq!(summary.spent(Payer::A, Currency::Twd), dec!(90));
        assert_eq!(summary.spent(Payer::B, Currency::Thb), Decimal::ZERO);
        assert_eq!(summary.total_for(Payer::A), dec!(250));
    }

    #[test]
    fn test_amounts_at_limit_with_extreme_rates() {
        use crate::core::expense::MAX_AMOUNT;

        let mut records = Vec::new();
        for _ in 0..1_000 {
            for payer in Payer::ALL {
                for currency in Currency::ALL {
                    records.push(record("Villa", MAX_AMOUNT, currency, payer));
                }
            }
        }
        records.push(record("Tip", dec!(0.01), Currency::Twd, Payer::A));

        for rate in [ConversionConfig::MIN_RATE, ConversionConfig::MAX_RATE] {
            let config = ConversionConfig::new(Currency::Thb, rate).unwrap();
            let summary = SettlementCalculator::new(config).summarize(&records);

            assert_eq!(
                summary.total_for(Payer::A) + summary.total_for(Payer::B),
                summary.total_all_payers()
            );
            assert_eq!(summary.spent(Payer::B, Currency::Twd), MAX_AMOUNT * dec!(1000));
            assert!(summary.net_transfer() > Decimal::ZERO);
        }
    }

    #[test]
    fn test_summarize_is_deterministic() {
        let records = vec![
            record("Taxi", dec!(1000), Currency::Thb, Payer::A),
            record("Dinner", dec!(100), Currency::Twd, Payer::B),
        ];
        let first = calculator().summarize(&records);
        let second = calculator().summarize(&records);
        assert_eq!(first, second);
    }

    #[test]
    fn test_summary_serializes() {
        let records = vec![record("Taxi", dec!(1000), Currency::Thb, Payer::A)];
        let summary = calculator().summarize(&records);
        let json: serde_json::Value = serde_json::to_value(&summary).unwrap();
        let amount = |v: &serde_json::Value| v.as_str().unwrap().parse::<Decimal>().unwrap();

        assert_eq!(json["reference"], "THB");
        assert_eq!(amount(&json["total_all_payers"]), dec!(1000));
        assert_eq!(amount(&json["total_by_payer"]["A"]), dec!(1000));
        assert_eq!(amount(&json["net_transfer"]), dec!(500));
        assert_eq!(amount(&json["spent"]["A:THB"]), dec!(1000));
    }
}
