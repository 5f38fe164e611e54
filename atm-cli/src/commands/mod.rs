//! CLI command implementations

pub mod init;
pub mod logs;
pub mod rates;
pub mod session;

use std::path::PathBuf;

use anyhow::{Context, Result};
use atm_core::AtmContext;

/// Get the ATM directory from environment or default
pub fn get_atm_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("ATM_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".atm"))
}

/// Load the ATM context
///
/// Only reads the ATM directory; it is created on demand by whatever needs
/// to write there.
pub fn get_context(force_log: bool) -> Result<AtmContext> {
    let atm_dir = get_atm_dir()?;
    AtmContext::new(&atm_dir, force_log)
        .with_context(|| format!("Failed to load ATM settings from {:?}", atm_dir))
}
