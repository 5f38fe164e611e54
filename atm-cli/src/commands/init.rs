//! Init command - write a default settings file

use anyhow::{Context, Result};

use super::get_atm_dir;
use crate::output;
use atm_core::config::{Config, SETTINGS_FILE};

pub fn run(force: bool) -> Result<()> {
    let atm_dir = get_atm_dir()?;
    let settings_path = atm_dir.join(SETTINGS_FILE);

    if settings_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to reset it to the defaults.",
            settings_path.display()
        );
    }

    std::fs::create_dir_all(&atm_dir)
        .with_context(|| format!("Failed to create ATM directory: {:?}", atm_dir))?;

    if settings_path.exists() {
        output::warning("Resetting managed settings to their defaults");
    }
    Config::default().save(&atm_dir)?;

    output::success(&format!("Wrote {}", settings_path.display()));
    Ok(())
}
