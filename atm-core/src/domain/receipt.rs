//! Outcomes of successful terminal operations

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

/// What the terminal reports after an operation succeeds
///
/// `Display` renders the message shown at the terminal; all amounts are
/// printed with two decimal places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Receipt {
    LoggedIn { username: String },
    Deposited { amount: Decimal },
    Withdrew { amount: Decimal, currency: String },
    Balance { amount: Decimal, currency: String },
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Receipt::LoggedIn { .. } => write!(f, "Login successful!"),
            // Deposits are always in the base currency; the symbol is fixed
            Receipt::Deposited { amount } => write!(f, "Deposited: ${}", two_places(*amount)),
            Receipt::Withdrew { amount, currency } => {
                write!(f, "Withdrew: {} {}", two_places(*amount), currency)
            }
            Receipt::Balance { amount, currency } => {
                write!(f, "Current balance: {} {}", two_places(*amount), currency)
            }
        }
    }
}

/// Format with exactly two decimal places, rounding half away from zero
pub fn two_places(amount: Decimal) -> String {
    let rounded =
        amount.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}
