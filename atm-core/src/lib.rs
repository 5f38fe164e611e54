//! ATM Core - terminal logic for the ATM simulator
//!
//! - **domain**: identity, exchange rates, session state, receipts and errors
//! - **terminal**: the account/terminal that owns the balance
//! - **services**: event logging
//! - **config**: settings.json loading with env overrides

pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod services;
pub mod terminal;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use config::Config;
use services::LoggingService;

// Re-export commonly used types at crate root
pub use config::ExitPolicy;
pub use domain::result::{Error, Operation};
pub use domain::{ExchangeRates, Identity, Receipt, Session};
pub use services::{LogEntry, LogEvent};
pub use terminal::Terminal;

/// Main context for a terminal run
///
/// Holds the resolved configuration and, when enabled, the event logger.
pub struct AtmContext {
    pub atm_dir: PathBuf,
    pub config: Config,
    pub logger: Option<LoggingService>,
    /// Why an explicitly requested event log could not be opened
    pub log_unavailable: Option<String>,
}

impl AtmContext {
    /// Load configuration from `atm_dir`
    ///
    /// The event log is opened when the config enables it or `force_log` is
    /// set. A log that cannot be opened is skipped; it never blocks a session.
    /// When `force_log` asked for it, the reason is kept in `log_unavailable`.
    pub fn new(atm_dir: &Path, force_log: bool) -> Result<Self> {
        let config = Config::load(atm_dir)?;

        let (logger, log_unavailable) = if config.event_log || force_log {
            match Self::open_logger(atm_dir) {
                Ok(logger) => (Some(logger), None),
                Err(e) if force_log => (None, Some(format!("{:#}", e))),
                Err(_) => (None, None),
            }
        } else {
            (None, None)
        };

        Ok(Self {
            atm_dir: atm_dir.to_path_buf(),
            config,
            logger,
            log_unavailable,
        })
    }

    fn open_logger(atm_dir: &Path) -> Result<LoggingService> {
        std::fs::create_dir_all(atm_dir)
            .with_context(|| format!("Failed to create {:?}", atm_dir))?;
        LoggingService::new(atm_dir, env!("CARGO_PKG_VERSION"))
    }

    /// Build a logged-out terminal from the configured rates and balance
    pub fn terminal<'a>(&self) -> Result<Terminal<'a>> {
        Ok(Terminal::with_balance(
            self.config.rates.clone(),
            self.config.opening_balance,
        )?)
    }

    /// Log an event, ignoring any errors (logging should never break the app)
    pub fn log(&self, event: LogEvent) {
        if let Some(logger) = &self.logger {
            let _ = logger.log(event);
        }
    }
}
