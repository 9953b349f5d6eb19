//! Text rendering of the trip's expenses and settlement.
//!
//! This is the only place amounts are rounded: the calculator keeps full
//! precision and the report shows whole units of the reference currency.

use crate::core::currency::ConversionConfig;
use crate::core::expense::ExpenseRecord;
use crate::core::ledger::Ledger;
use crate::settlement::calculator::{Settlement, SettlementSummary};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;

/// Round to whole currency units, halves away from zero.
pub fn round_whole(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// The settlement instruction as shown to the travellers.
pub fn settlement_line(summary: &SettlementSummary) -> String {
    match summary.settlement() {
        Settlement::Settled => "All settled!".to_string(),
        Settlement::Transfer { from, to, amount } => format!(
            "Person {} pays {}: {} {}",
            from,
            to,
            round_whole(amount),
            summary.reference()
        ),
    }
}

/// One history entry: "item — amount CUR (paid by X)".
pub fn history_line(record: &ExpenseRecord) -> String {
    format!(
        "{} — {} {} (paid by {})",
        record.item(),
        record.amount(),
        record.currency(),
        record.paid_by()
    )
}

/// Everything the expense view shows for one ledger.
#[derive(Debug, Clone)]
pub struct TripReport {
    summary: SettlementSummary,
    config: ConversionConfig,
    history: Vec<String>,
}

impl TripReport {
    pub fn new(ledger: &Ledger, config: &ConversionConfig) -> Self {
        Self {
            summary: ledger.summarize(config),
            config: *config,
            history: ledger.recent_first().map(history_line).collect(),
        }
    }

    pub fn summary(&self) -> &SettlementSummary {
        &self.summary
    }

    /// "Total Spent: N THB"
    pub fn total_line(&self) -> String {
        format!(
            "Total Spent: {} {}",
            round_whole(self.summary.total_all_payers()),
            self.summary.reference()
        )
    }

    /// "(Approx N TWD)"
    pub fn approx_line(&self) -> String {
        format!(
            "(Approx {} {})",
            round_whole(self.config.from_reference(self.summary.total_all_payers())),
            self.config.counter()
        )
    }

    pub fn settlement_line(&self) -> String {
        settlement_line(&self.summary)
    }

    /// History lines, newest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl fmt::Display for TripReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Trip Expenses ===")?;
        writeln!(f, "{}", self.total_line())?;
        writeln!(f, "{}", self.approx_line())?;
        writeln!(f, "{}", self.settlement_line())?;
        writeln!(f)?;
        if self.history.is_empty() {
            writeln!(f, "No expenses recorded.")?;
        }
        for line in &self.history {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
