use crate::core::expense::ValidationError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the two currencies a trip expense can be recorded in.
///
/// # Examples
///
/// ```
/// use trip_ledger::core::currency::Currency;
///
/// let thb: Currency = "THB".parse().unwrap();
/// assert_eq!(thb, Currency::Thb);
/// assert_eq!(thb.other(), Currency::Twd);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Thai baht.
    Thb,
    /// New Taiwan dollar.
    Twd,
}

impl Currency {
    pub const ALL: [Currency; 2] = [Currency::Thb, Currency::Twd];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Thb => "THB",
            Currency::Twd => "TWD",
        }
    }

    /// The other supported currency.
    pub fn other(&self) -> Currency {
        match self {
            Currency::Thb => Currency::Twd,
            Currency::Twd => Currency::Thb,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "THB" => Ok(Currency::Thb),
            "TWD" => Ok(Currency::Twd),
            _ => Err(ValidationError::UnknownCurrency(s.to_string())),
        }
    }
}

/// Errors in the static currency configuration.
///
/// These are checked once when a [`ConversionConfig`] is built, so converting
/// an amount never fails afterwards.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("conversion rate must be positive, got {rate} for {reference} -> {other}")]
    InvalidRate {
        reference: Currency,
        other: Currency,
        rate: Decimal,
    },
    #[error("conversion rate {rate} is outside [{min}, {max}]", min = ConversionConfig::MIN_RATE, max = ConversionConfig::MAX_RATE)]
    RateOutOfRange { rate: Decimal },
}

/// Fixed conversion between the reference currency and the other one.
///
/// The rate is quoted reference → other: one unit of `reference` buys `rate`
/// units of the other currency. Normalizing an amount recorded in the other
/// currency therefore divides by `rate`.
///
/// # Examples
///
/// ```
/// use trip_ledger::core::currency::{ConversionConfig, Currency};
/// use rust_decimal_macros::dec;
///
/// // 1 THB = 0.9 TWD
/// let config = ConversionConfig::new(Currency::Thb, dec!(0.9)).unwrap();
/// assert_eq!(config.to_reference(dec!(450), Currency::Twd), dec!(500));
/// assert_eq!(config.to_reference(dec!(450), Currency::Thb), dec!(450));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConversionConfig {
    reference: Currency,
    rate: Decimal,
}

impl ConversionConfig {
    /// Units of TWD bought by one THB in the default configuration.
    pub const DEFAULT_RATE: Decimal = dec!(0.9);

    /// Smallest accepted rate. Bounds how far dividing by the rate can scale
    /// an amount.
    pub const MIN_RATE: Decimal = dec!(0.0001);

    /// Largest accepted rate.
    pub const MAX_RATE: Decimal = dec!(10_000);

    pub fn new(reference: Currency, rate: Decimal) -> Result<Self, ConfigError> {
        if rate <= Decimal::ZERO {
            return Err(ConfigError::InvalidRate {
                reference,
                other: reference.other(),
                rate,
            });
        }
        if rate < Self::MIN_RATE || rate > Self::MAX_RATE {
            return Err(ConfigError::RateOutOfRange { rate });
        }
        Ok(Self { reference, rate })
    }

    /// Same reference currency, different rate.
    pub fn with_rate(self, rate: Decimal) -> Result<Self, ConfigError> {
        Self::new(self.reference, rate)
    }

    pub fn reference(&self) -> Currency {
        self.reference
    }

    /// The non-reference currency.
    pub fn counter(&self) -> Currency {
        self.reference.other()
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// Express `amount` (denominated in `currency`) in the reference currency.
    pub fn to_reference(&self, amount: Decimal, currency: Currency) -> Decimal {
        if currency == self.reference {
            amount
        } else {
            amount / self.rate
        }
    }

    /// Express a reference-currency amount in the counter currency.
    pub fn from_reference(&self, amount: Decimal) -> Decimal {
        amount * self.rate
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            reference: Currency::Thb,
            rate: Self::DEFAULT_RATE,
        }
    }
}
