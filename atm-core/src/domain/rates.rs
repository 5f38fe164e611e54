//! Exchange rate table

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::result::{Error, Result};

/// Currency the balance is stored in unless configured otherwise
pub const DEFAULT_BASE_CURRENCY: &str = "USD";

/// Fixed multipliers from one unit of the base currency to other currencies
///
/// Always contains the base currency at a rate of exactly 1, and every
/// rate is strictly positive. Codes are matched case-sensitively.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeRates {
    base: String,
    rates: BTreeMap<String, Decimal>,
}

impl ExchangeRates {
    /// Build a validated rate table
    ///
    /// The base currency is added at 1 when missing from `rates`; a base
    /// entry with any other value is rejected.
    pub fn new(
        base: impl Into<String>,
        rates: impl IntoIterator<Item = (String, Decimal)>,
    ) -> Result<Self> {
        let base = base.into();
        if base.trim().is_empty() {
            return Err(Error::config("base currency cannot be empty"));
        }

        let mut table = BTreeMap::new();
        for (code, rate) in rates {
            if code.trim().is_empty() {
                return Err(Error::config("currency code cannot be empty"));
            }
            if rate <= Decimal::ZERO {
                return Err(Error::config(format!(
                    "exchange rate for {} must be positive, got {}",
                    code, rate
                )));
            }
            table.insert(code, rate);
        }

        match table.get(&base) {
            Some(rate) if *rate != Decimal::ONE => {
                return Err(Error::config(format!(
                    "base currency {} must have a rate of 1, got {}",
                    base, rate
                )));
            }
            Some(_) => {}
            None => {
                table.insert(base.clone(), Decimal::ONE);
            }
        }

        Ok(Self { base, rates: table })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn rate(&self, currency: &str) -> Option<Decimal> {
        self.rates.get(currency).copied()
    }

    pub fn contains(&self, currency: &str) -> bool {
        self.rates.contains_key(currency)
    }

    /// Convert an amount in `currency` into the base currency
    pub fn to_base(&self, amount: Decimal, currency: &str) -> Result<Decimal> {
        let rate = self.require(currency)?;
        amount.checked_div(rate).ok_or(Error::AmountOutOfRange)
    }

    /// Convert an amount in the base currency into `currency`
    pub fn from_base(&self, amount: Decimal, currency: &str) -> Result<Decimal> {
        let rate = self.require(currency)?;
        amount.checked_mul(rate).ok_or(Error::AmountOutOfRange)
    }

    /// Currency codes, base first and the rest in alphabetical order
    pub fn codes(&self) -> Vec<&str> {
        let mut codes = vec![self.base.as_str()];
        codes.extend(
            self.rates
                .keys()
                .map(String::as_str)
                .filter(|code| *code != self.base),
        );
        codes
    }

    /// (code, rate) pairs in the same order as [`ExchangeRates::codes`]
    pub fn entries(&self) -> Vec<(&str, Decimal)> {
        self.codes()
            .into_iter()
            .filter_map(|code| self.rate(code).map(|rate| (code, rate)))
            .collect()
    }

    fn require(&self, currency: &str) -> Result<Decimal> {
        self.rate(currency)
            .ok_or_else(|| Error::UnknownCurrency(currency.to_string()))
    }
}

impl Default for ExchangeRates {
    fn default() -> Self {
        let mut rates = BTreeMap::new();
        rates.insert(DEFAULT_BASE_CURRENCY.to_string(), Decimal::ONE);
        rates.insert("EUR".to_string(), Decimal::new(85, 2));
        rates.insert("GBP".to_string(), Decimal::new(75, 2));
        rates.insert("INR".to_string(), Decimal::new(74, 0));
        Self {
            base: DEFAULT_BASE_CURRENCY.to_string(),
            rates,
        }
    }
}
