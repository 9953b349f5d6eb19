//! Expense records, the ledger that holds them, and the currency and payer
//! tags they are expressed in.

pub mod currency;
pub mod expense;
pub mod ledger;
pub mod payer;
