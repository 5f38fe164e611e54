//! Configuration management
//!
//! Settings live in `settings.json` inside the ATM directory:
//! ```json
//! {
//!   "user": { "username": "needoweb", "pin": "1234" },
//!   "baseCurrency": "USD",
//!   "exchangeRates": { "USD": 1.0, "EUR": 0.85, "GBP": 0.75, "INR": 74.0 },
//!   "openingBalance": 0,
//!   "exitPolicy": "legacy",
//!   "eventLog": false
//! }
//! ```
//! Every key is optional. A missing file means all defaults, and nothing is
//! written unless [`Config::save`] is called.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::rates::DEFAULT_BASE_CURRENCY;
use crate::domain::{ExchangeRates, Identity};

pub const SETTINGS_FILE: &str = "settings.json";

const DEFAULT_USERNAME: &str = "needoweb";
const DEFAULT_PIN: &str = "1234";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<UserSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_currency: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_rates"
    )]
    exchange_rates: Option<BTreeMap<String, Decimal>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    opening_balance: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exit_policy: Option<ExitPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    event_log: Option<bool>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

// Written as plain JSON numbers; reading accepts numbers or strings
fn serialize_rates<S: Serializer>(
    rates: &Option<BTreeMap<String, Decimal>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match rates {
        Some(rates) => serializer.collect_map(
            rates
                .iter()
                .map(|(code, rate)| (code, rate.to_f64().unwrap_or_default())),
        ),
        None => serializer.serialize_none(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserSettings {
    username: String,
    pin: String,
}

/// What the menu does when "Exit" is chosen
///
/// `Legacy` reproduces the historical loop: choosing 4 prints "Exiting..."
/// and the menu comes back, and the loop only ends after the unlisted
/// choice 5. `Strict` ends the session on 4.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitPolicy {
    #[default]
    Legacy,
    Strict,
}

/// ATM configuration (resolved view of settings plus env overrides)
#[derive(Debug, Clone)]
pub struct Config {
    pub identity: Identity,
    pub rates: ExchangeRates,
    pub opening_balance: Decimal,
    pub exit_policy: ExitPolicy,
    pub event_log: bool,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            identity: Identity::new(DEFAULT_USERNAME, DEFAULT_PIN),
            rates: ExchangeRates::default(),
            opening_balance: Decimal::ZERO,
            exit_policy: ExitPolicy::Legacy,
            event_log: false,
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the ATM directory
    ///
    /// Environment overrides (for CI/testing):
    /// - `ATM_PIN` replaces the configured PIN
    /// - `ATM_STRICT_EXIT` selects the exit policy
    /// - `ATM_EVENT_LOG` turns the event log on or off
    pub fn load(atm_dir: &Path) -> Result<Self> {
        let settings_path = atm_dir.join(SETTINGS_FILE);

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)
                .with_context(|| format!("Failed to read {:?}", settings_path))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid settings in {:?}", settings_path))?
        } else {
            SettingsFile::default()
        };

        let mut config = Self::from_settings(raw)?;

        if let Ok(pin) = std::env::var("ATM_PIN") {
            config.identity = Identity::new(config.identity.username(), pin);
        }
        match parse_flag(std::env::var("ATM_STRICT_EXIT").ok().as_deref()) {
            Some(true) => config.exit_policy = ExitPolicy::Strict,
            Some(false) => config.exit_policy = ExitPolicy::Legacy,
            None => {}
        }
        if let Some(enabled) = parse_flag(std::env::var("ATM_EVENT_LOG").ok().as_deref()) {
            config.event_log = enabled;
        }

        Ok(config)
    }

    fn from_settings(raw: SettingsFile) -> Result<Self> {
        let identity = match &raw.user {
            Some(user) => Identity::new(&user.username, &user.pin),
            None => Identity::new(DEFAULT_USERNAME, DEFAULT_PIN),
        };

        let base = raw
            .base_currency
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_CURRENCY.to_string());
        let rates = match &raw.exchange_rates {
            Some(table) => ExchangeRates::new(base, table.clone())?,
            None if base == DEFAULT_BASE_CURRENCY => ExchangeRates::default(),
            None => anyhow::bail!(
                "baseCurrency is {} but no exchangeRates are configured",
                base
            ),
        };

        let opening_balance = raw.opening_balance.unwrap_or(Decimal::ZERO);
        if opening_balance < Decimal::ZERO {
            anyhow::bail!("openingBalance cannot be negative");
        }

        Ok(Self {
            identity,
            rates,
            opening_balance,
            exit_policy: raw.exit_policy.unwrap_or_default(),
            event_log: raw.event_log.unwrap_or(false),
            _raw_settings: raw,
        })
    }

    /// Save config to the ATM directory
    /// Preserves settings this program does not manage
    pub fn save(&self, atm_dir: &Path) -> Result<()> {
        let settings_path = atm_dir.join(SETTINGS_FILE);

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            self._raw_settings.clone()
        };

        settings.user = Some(UserSettings {
            username: self.identity.username().to_string(),
            pin: self.pin_for_save().to_string(),
        });
        settings.base_currency = Some(self.rates.base().to_string());
        settings.exchange_rates = Some(
            self.rates
                .entries()
                .into_iter()
                .map(|(code, rate)| (code.to_string(), rate))
                .collect(),
        );
        settings.opening_balance = Some(self.opening_balance);
        settings.exit_policy = Some(self.exit_policy);
        settings.event_log = Some(self.event_log);

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)
            .with_context(|| format!("Failed to write {:?}", settings_path))?;
        Ok(())
    }

    // The env override must not leak into the settings file
    fn pin_for_save(&self) -> &str {
        match &self._raw_settings.user {
            Some(user) => &user.pin,
            None => DEFAULT_PIN,
        }
    }
}

fn parse_flag(value: Option<&str>) -> Option<bool> {
    match value {
        Some("true" | "1" | "yes" | "TRUE" | "YES") => Some(true),
        Some("false" | "0" | "no" | "FALSE" | "NO") => Some(false),
        _ => None,
    }
}
