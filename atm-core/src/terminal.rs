//! Account/terminal - balance keeping behind a PIN-checked session
//!
//! The terminal holds a single balance in the base currency and a rate table
//! used to convert amounts at the edges. It performs no I/O; callers decide
//! how results are shown.

use rust_decimal::Decimal;

use crate::domain::result::{Error, Operation, Result};
use crate::domain::{ExchangeRates, Identity, Receipt, Session};

/// A teller machine with one balance and at most one logged-in identity
#[derive(Debug, Clone)]
pub struct Terminal<'a> {
    balance: Decimal,
    rates: ExchangeRates,
    session: Session<'a>,
}

impl<'a> Terminal<'a> {
    /// Create a logged-out terminal with a zero balance
    pub fn new(rates: ExchangeRates) -> Self {
        Self {
            balance: Decimal::ZERO,
            rates,
            session: Session::LoggedOut,
        }
    }

    /// Create a logged-out terminal holding an opening balance
    pub fn with_balance(rates: ExchangeRates, opening_balance: Decimal) -> Result<Self> {
        if opening_balance < Decimal::ZERO {
            return Err(Error::config(format!(
                "opening balance cannot be negative, got {}",
                opening_balance
            )));
        }
        Ok(Self {
            balance: opening_balance,
            rates,
            session: Session::LoggedOut,
        })
    }

    /// Log `identity` in if `supplied_pin` matches
    ///
    /// A successful login replaces whoever was logged in before. A failed
    /// one leaves the current session exactly as it was.
    pub fn login(&mut self, identity: &'a Identity, supplied_pin: &str) -> Result<Receipt> {
        if !identity.validate_secret(supplied_pin) {
            return Err(Error::InvalidPin);
        }
        self.session = Session::LoggedIn(identity);
        Ok(Receipt::LoggedIn {
            username: identity.username().to_string(),
        })
    }

    /// Add `amount` (in the base currency) to the balance
    pub fn deposit(&mut self, amount: Decimal) -> Result<Receipt> {
        self.require_login(Operation::Deposit)?;
        if amount <= Decimal::ZERO {
            return Err(Error::NonPositiveAmount(Operation::Deposit));
        }

        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(Error::AmountOutOfRange)?;
        Ok(Receipt::Deposited { amount })
    }

    /// Take `amount` expressed in `currency` out of the balance
    ///
    /// Nothing is dispensed; the balance is reduced by the base-currency
    /// equivalent. Rejected without change if it would go negative.
    pub fn withdraw(&mut self, amount: Decimal, currency: &str) -> Result<Receipt> {
        self.require_login(Operation::Withdraw)?;
        let amount_in_base = self.rates.to_base(amount, currency)?;
        if amount <= Decimal::ZERO {
            return Err(Error::NonPositiveAmount(Operation::Withdraw));
        }
        if amount_in_base > self.balance {
            return Err(Error::InsufficientFunds);
        }

        self.balance -= amount_in_base;
        Ok(Receipt::Withdrew {
            amount,
            currency: currency.to_string(),
        })
    }

    /// Report the balance converted into `currency`
    ///
    /// The currency is checked before the session so an unknown code is
    /// reported the same way whether or not anyone is logged in.
    pub fn check_balance(&self, currency: &str) -> Result<Receipt> {
        let amount = self.rates.from_base(self.balance, currency)?;
        self.require_login(Operation::CheckBalance)?;

        Ok(Receipt::Balance {
            amount,
            currency: currency.to_string(),
        })
    }

    /// Balance in the base currency
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn rates(&self) -> &ExchangeRates {
        &self.rates
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }

    pub fn current_identity(&self) -> Option<&'a Identity> {
        self.session.identity()
    }

    fn require_login(&self, operation: Operation) -> Result<()> {
        if self.session.is_logged_in() {
            Ok(())
        } else {
            Err(Error::NotLoggedIn(operation))
        }
    }
}
