use crate::core::currency::{ConversionConfig, Currency};
use crate::core::expense::{ExpenseInput, ExpenseRecord, ValidationError};
use crate::core::payer::Payer;
use crate::settlement::calculator::{SettlementCalculator, SettlementSummary};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Notified after every successful append.
///
/// This is a lightweight change signal for dependent views, not a durable
/// event log. Observers must not assume they see records that were appended
/// before they subscribed.
///
/// Observers run after the record is stored, while the appender still holds
/// the ledger (the write lock, for a [`SharedLedger`]). Lock order is ledger
/// first, then whatever the observer locks; an observer must never call back
/// into the ledger it is subscribed to.
pub trait LedgerObserver: Send + Sync {
    fn on_append(&mut self, record: &ExpenseRecord);
}

impl<T: LedgerObserver> LedgerObserver for Arc<Mutex<T>> {
    fn on_append(&mut self, record: &ExpenseRecord) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_append(record);
    }
}

/// Append-only, insertion-ordered list of the trip's expenses.
///
/// The ledger holds no derived state: totals and the settlement are
/// recomputed from the full history by [`SettlementCalculator`].
#[derive(Default)]
pub struct Ledger {
    records: Vec<ExpenseRecord>,
    ids: HashSet<uuid::Uuid>,
    observers: Vec<Box<dyn LedgerObserver>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and record a new expense.
    ///
    /// On error the ledger is left untouched.
    pub fn append(
        &mut self,
        item: &str,
        amount: Decimal,
        currency: Currency,
        paid_by: Payer,
    ) -> Result<ExpenseRecord, ValidationError> {
        let record = ExpenseRecord::new(item, amount, currency, paid_by).map_err(|e| {
            log::warn!("rejected expense '{}': {}", item, e);
            e
        })?;
        self.append_record(record)
    }

    /// Record an expense from unparsed form fields.
    pub fn append_raw(&mut self, input: &ExpenseInput) -> Result<ExpenseRecord, ValidationError> {
        let record = input.to_record().map_err(|e| {
            log::warn!("rejected expense '{}': {}", input.item, e);
            e
        })?;
        self.append_record(record)
    }

    /// Append an already-built record. Fails if its id is already present.
    pub fn append_record(&mut self, record: ExpenseRecord) -> Result<ExpenseRecord, ValidationError> {
        if !self.ids.insert(record.id()) {
            log::warn!("rejected duplicate expense id {}", record.id());
            return Err(ValidationError::DuplicateId(record.id()));
        }
        log::debug!(
            "appended expense {} '{}': {} {} paid by {}",
            record.id(),
            record.item(),
            record.amount(),
            record.currency(),
            record.paid_by()
        );
        self.records.push(record.clone());
        for observer in &mut self.observers {
            observer.on_append(&record);
        }
        Ok(record)
    }

    /// Register an observer for future appends.
    pub fn subscribe<O: LedgerObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    /// All records in insertion order.
    pub fn all(&self) -> &[ExpenseRecord] {
        &self.records
    }

    /// Records newest first, for history display.
    pub fn recent_first(&self) -> impl Iterator<Item = &ExpenseRecord> {
        self.records.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Recompute the settlement over the current history.
    pub fn summarize(&self, config: &ConversionConfig) -> SettlementSummary {
        SettlementCalculator::new(*config).summarize(&self.records)
    }
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("records", &self.records)
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Cloneable handle to one session's ledger, for multi-threaded hosts.
///
/// Appends take the write lock, so ids stay unique and insertion order is
/// total. Reads take the read lock and may run concurrently.
#[derive(Debug, Clone, Default)]
pub struct SharedLedger {
    inner: Arc<RwLock<Ledger>>,
}

impl SharedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(
        &self,
        item: &str,
        amount: Decimal,
        currency: Currency,
        paid_by: Payer,
    ) -> Result<ExpenseRecord, ValidationError> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .append(item, amount, currency, paid_by)
    }

    pub fn append_raw(&self, input: &ExpenseInput) -> Result<ExpenseRecord, ValidationError> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .append_raw(input)
    }

    pub fn subscribe<O: LedgerObserver + 'static>(&self, observer: O) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .subscribe(observer);
    }

    /// Copy of the records at call time.
    pub fn snapshot(&self) -> Vec<ExpenseRecord> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .all()
            .to_vec()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn summarize(&self, config: &ConversionConfig) -> SettlementSummary {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .summarize(config)
    }
}
