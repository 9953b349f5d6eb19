use crate::core::currency::Currency;
use crate::core::payer::Payer;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Rejected expense input.
///
/// The ledger is never touched when one of these is returned; the caller keeps
/// the submitted form and shows the message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("item description must not be empty")]
    EmptyItem,
    #[error("amount '{0}' is not a number")]
    InvalidAmount(String),
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("amount {0} exceeds the maximum of {max}", max = MAX_AMOUNT)]
    AmountTooLarge(Decimal),
    #[error("unsupported currency '{0}' (expected THB or TWD)")]
    UnknownCurrency(String),
    #[error("unknown payer '{0}' (expected A or B)")]
    UnknownPayer(String),
    #[error("expense {0} is already recorded")]
    DuplicateId(Uuid),
}

/// Largest amount a single expense may carry (10^15 units).
///
/// Together with the rate bounds in [`ConversionConfig`](crate::core::currency::ConversionConfig)
/// this keeps per-payer sums and their normalization far inside `Decimal`'s
/// range for any ledger that fits in memory.
pub const MAX_AMOUNT: Decimal = dec!(1_000_000_000_000_000);

/// Check that an amount is positive and within [`MAX_AMOUNT`].
pub fn check_amount(amount: Decimal) -> Result<Decimal, ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount(amount));
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge(amount));
    }
    Ok(amount)
}

/// Parse a free-text amount the way the entry form submits it.
pub fn parse_amount(raw: &str) -> Result<Decimal, ValidationError> {
    let trimmed = raw.trim();
    let amount = Decimal::from_str(trimmed)
        .map_err(|_| ValidationError::InvalidAmount(raw.to_string()))?;
    check_amount(amount)
}

/// A single payment made by one of the two travellers.
///
/// Records are immutable once created; the ledger only ever appends them.
///
/// # Examples
///
/// ```
/// use trip_ledger::core::currency::Currency;
/// use trip_ledger::core::expense::ExpenseRecord;
/// use trip_ledger::core::payer::Payer;
/// use rust_decimal_macros::dec;
///
/// let taxi = ExpenseRecord::new("Taxi", dec!(1000), Currency::Thb, Payer::A).unwrap();
/// assert_eq!(taxi.item(), "Taxi");
/// assert_eq!(taxi.amount(), dec!(1000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredExpense")]
pub struct ExpenseRecord {
    id: Uuid,
    /// Display label, stored trimmed.
    item: String,
    /// Amount paid, in `currency`. Always positive.
    amount: Decimal,
    currency: Currency,
    paid_by: Payer,
    /// Creation instant. Only used for display ordering.
    timestamp: DateTime<Utc>,
}

impl ExpenseRecord {
    /// Create a new record with a fresh id, stamped with the current time.
    pub fn new(
        item: impl AsRef<str>,
        amount: Decimal,
        currency: Currency,
        paid_by: Payer,
    ) -> Result<Self, ValidationError> {
        Self::with_id(Uuid::new_v4(), item, amount, currency, paid_by)
    }

    /// Create a record with a specific id (useful for testing / determinism).
    pub fn with_id(
        id: Uuid,
        item: impl AsRef<str>,
        amount: Decimal,
        currency: Currency,
        paid_by: Payer,
    ) -> Result<Self, ValidationError> {
        let item = item.as_ref().trim();
        if item.is_empty() {
            return Err(ValidationError::EmptyItem);
        }
        let amount = check_amount(amount)?;
        Ok(Self {
            id,
            item: item.to_string(),
            amount,
            currency,
            paid_by,
            timestamp: Utc::now(),
        })
    }

    /// Override the creation instant.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn item(&self) -> &str {
        &self.item
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn paid_by(&self) -> Payer {
        self.paid_by
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Wire form of a record; deserialization goes through the same checks as
/// [`ExpenseRecord::with_id`].
#[derive(Deserialize)]
struct StoredExpense {
    id: Uuid,
    item: String,
    amount: Decimal,
    currency: Currency,
    paid_by: Payer,
    timestamp: DateTime<Utc>,
}

impl TryFrom<StoredExpense> for ExpenseRecord {
    type Error = ValidationError;

    fn try_from(stored: StoredExpense) -> Result<Self, Self::Error> {
        Ok(ExpenseRecord::with_id(
            stored.id,
            stored.item,
            stored.amount,
            stored.currency,
            stored.paid_by,
        )?
        .with_timestamp(stored.timestamp))
    }
}

/// Unvalidated expense fields, as typed into the entry form or read from a
/// JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseInput {
    pub item: String,
    pub amount: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_payer")]
    pub paid_by: String,
}

fn default_currency() -> String {
    Currency::Thb.code().to_string()
}

fn default_payer() -> String {
    Payer::A.as_str().to_string()
}

impl ExpenseInput {
    pub fn new(
        item: impl Into<String>,
        amount: impl Into<String>,
        currency: impl Into<String>,
        paid_by: impl Into<String>,
    ) -> Self {
        Self {
            item: item.into(),
            amount: amount.into(),
            currency: currency.into(),
            paid_by: paid_by.into(),
        }
    }

    /// Check every field and build a record from them.
    pub fn to_record(&self) -> Result<ExpenseRecord, ValidationError> {
        if self.item.trim().is_empty() {
            return Err(ValidationError::EmptyItem);
        }
        let amount = parse_amount(&self.amount)?;
        let currency: Currency = self.currency.parse()?;
        let paid_by: Payer = self.paid_by.parse()?;
        ExpenseRecord::new(&self.item, amount, currency, paid_by)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_record_creation() {
        let record = ExpenseRecord::new("  Dinner ", dec!(450), Currency::Twd, Payer::B).unwrap();
        assert_eq!(record.item(), "Dinner");
        assert_eq!(record.amount(), dec!(450));
        assert_eq!(record.currency(), Currency::Twd);
        assert_eq!(record.paid_by(), Payer::B);
    }

    #[test]
    fn test_record_ids_unique() {
        let a = ExpenseRecord::new("Taxi", dec!(100), Currency::Thb, Payer::A).unwrap();
        let b = ExpenseRecord::new("Taxi", dec!(100), Currency::Thb, Payer::A).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_record_rejects_blank_item() {
        let err = ExpenseRecord::new("   ", dec!(100), Currency::Thb, Payer::A).unwrap_err();
        assert_eq!(err, ValidationError::EmptyItem);
    }

    #[test]
    fn test_record_rejects_zero_and_negative() {
        assert_eq!(
            ExpenseRecord::new("Taxi", Decimal::ZERO, Currency::Thb, Payer::A).unwrap_err(),
            ValidationError::NonPositiveAmount(Decimal::ZERO)
        );
        assert_eq!(
            ExpenseRecord::new("Taxi", dec!(-5), Currency::Thb, Payer::A).unwrap_err(),
            ValidationError::NonPositiveAmount(dec!(-5))
        );
    }

    #[test]
    fn test_amount_limit() {
        let record = ExpenseRecord::new("Villa", MAX_AMOUNT, Currency::Twd, Payer::A).unwrap();
        assert_eq!(record.amount(), MAX_AMOUNT);

        let over = MAX_AMOUNT + dec!(0.01);
        assert_eq!(
            ExpenseRecord::new("Villa", over, Currency::Twd, Payer::A).unwrap_err(),
            ValidationError::AmountTooLarge(over)
        );
        assert!(matches!(
            parse_amount("79228162514264337593543950335"),
            Err(ValidationError::AmountTooLarge(_))
        ));
        assert_eq!(parse_amount("1000000000000000").unwrap(), MAX_AMOUNT);
    }

    #[test]
    fn test_deserialize_runs_validation() {
        let valid = ExpenseRecord::new("Taxi", dec!(1000), Currency::Thb, Payer::A).unwrap();
        let json = serde_json::to_string(&valid).unwrap();
        let back: ExpenseRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, valid);

        let bad = format!(
            r#"{{"id":"{}","item":"","amount":"-500","currency":"THB","paid_by":"A","timestamp":"2026-01-01T00:00:00Z"}}"#,
            Uuid::new_v4()
        );
        assert!(serde_json::from_str::<ExpenseRecord>(&bad).is_err());

        let too_large = format!(
            r#"{{"id":"{}","item":"Yacht","amount":"79228162514264337593543950335","currency":"TWD","paid_by":"B","timestamp":"2026-01-01T00:00:00Z"}}"#,
            Uuid::new_v4()
        );
        assert!(serde_json::from_str::<ExpenseRecord>(&too_large).is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 12.50 ").unwrap(), dec!(12.50));
        assert!(matches!(
            parse_amount("abc"),
            Err(ValidationError::InvalidAmount(_))
        ));
        assert!(matches!(parse_amount(""), Err(ValidationError::InvalidAmount(_))));
        assert!(matches!(parse_amount("NaN"), Err(ValidationError::InvalidAmount(_))));
        assert_eq!(
            parse_amount("-1").unwrap_err(),
            ValidationError::NonPositiveAmount(dec!(-1))
        );
    }

    #[test]
    fn test_input_to_record() {
        let input = ExpenseInput::new("Massage", "600", "thb", "b");
        let record = input.to_record().unwrap();
        assert_eq!(record.amount(), dec!(600));
        assert_eq!(record.currency(), Currency::Thb);
        assert_eq!(record.paid_by(), Payer::B);
    }

    #[test]
    fn test_input_unknown_tags() {
        let bad_currency = ExpenseInput::new("Taxi", "10", "USD", "A");
        assert_eq!(
            bad_currency.to_record().unwrap_err(),
            ValidationError::UnknownCurrency("USD".to_string())
        );
        let bad_payer = ExpenseInput::new("Taxi", "10", "THB", "C");
        assert_eq!(
            bad_payer.to_record().unwrap_err(),
            ValidationError::UnknownPayer("C".to_string())
        );
    }

    #[test]
    fn test_input_json_defaults() {
        let input: ExpenseInput =
            serde_json::from_str(r#"{ "item": "Mango sticky rice", "amount": "80" }"#).unwrap();
        assert_eq!(input.currency, "THB");
        assert_eq!(input.paid_by, "A");
    }
}
