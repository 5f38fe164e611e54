//! Result and error types for the core library

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Terminal operation that requires a logged-in session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Deposit,
    Withdraw,
    CheckBalance,
}

impl Operation {
    /// Stable name used in event logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Deposit => "deposit",
            Operation::Withdraw => "withdraw",
            Operation::CheckBalance => "check_balance",
        }
    }

    fn login_hint(&self) -> &'static str {
        match self {
            Operation::Deposit => "deposit money",
            Operation::Withdraw => "withdraw money",
            Operation::CheckBalance => "check your balance",
        }
    }

    fn amount_label(&self) -> &'static str {
        match self {
            Operation::Deposit => "Deposit",
            Operation::Withdraw => "Withdrawal",
            Operation::CheckBalance => "Balance",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core library error type
///
/// The domain variants render as the exact message shown to the person at
/// the terminal.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Please log in to {}.", .0.login_hint())]
    NotLoggedIn(Operation),

    #[error("Invalid PIN. Login failed.")]
    InvalidPin,

    #[error("{} amount must be positive.", .0.amount_label())]
    NonPositiveAmount(Operation),

    #[error("Invalid currency!")]
    UnknownCurrency(String),

    #[error("Insufficient funds!")]
    InsufficientFunds,

    #[error("Amount is too large.")]
    AmountOutOfRange,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for failures caused by a single bad request at the terminal.
    /// These leave state untouched and the session carries on.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::NotLoggedIn(_)
                | Error::InvalidPin
                | Error::NonPositiveAmount(_)
                | Error::UnknownCurrency(_)
                | Error::InsufficientFunds
                | Error::AmountOutOfRange
        )
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
