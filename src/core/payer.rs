use crate::core::expense::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two people sharing the trip.
///
/// # Examples
///
/// ```
/// use trip_ledger::core::payer::Payer;
///
/// let a: Payer = "A".parse().unwrap();
/// assert_eq!(a.other(), Payer::B);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Payer {
    A,
    B,
}

impl Payer {
    pub const ALL: [Payer; 2] = [Payer::A, Payer::B];

    pub fn as_str(&self) -> &'static str {
        match self {
            Payer::A => "A",
            Payer::B => "B",
        }
    }

    /// The counterparty in a settlement.
    pub fn other(&self) -> Payer {
        match self {
            Payer::A => Payer::B,
            Payer::B => Payer::A,
        }
    }
}

impl fmt::Display for Payer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Payer {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Payer::A),
            "B" | "b" => Ok(Payer::B),
            _ => Err(ValidationError::UnknownPayer(s.to_string())),
        }
    }
}
