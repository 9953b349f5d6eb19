//! # trip-ledger
//!
//! Shared-trip expense ledger for two travellers and two currencies.
//!
//! Expenses are appended to an in-memory [`Ledger`](core::ledger::Ledger) as
//! they are paid. The settlement calculator normalizes everything into one
//! reference currency and works out the single payment that evens out an
//! equal split.
//!
//! ## Architecture
//!
//! - **core** — Currency and payer tags, expense records, the ledger
//! - **settlement** — Settlement calculator, incremental totals, text report
//! - **simulation** — Random trip generation for benchmarks and tests

pub mod core;
pub mod settlement;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::currency::{ConversionConfig, Currency};
    pub use crate::core::expense::{ExpenseInput, ExpenseRecord, ValidationError};
    pub use crate::core::ledger::{Ledger, LedgerObserver, SharedLedger};
    pub use crate::core::payer::Payer;
    pub use crate::settlement::calculator::{Settlement, SettlementCalculator, SettlementSummary};
    pub use crate::settlement::report::TripReport;
    pub use crate::settlement::running::RunningTotals;
}
