//! Logs command - view and manage the session event log

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;

use super::get_atm_dir;
use crate::output;
use atm_core::services::logging::{now_ms, LOG_DB_FILE};
use atm_core::services::LoggingService;

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent log entries
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Show only errors
        #[arg(long)]
        errors: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Clear old log entries
    Clear {
        /// Delete logs older than N days
        #[arg(long, default_value = "30")]
        older_than_days: u64,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show log statistics and database path
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Open the event log, which must already exist
fn get_logging_service() -> Result<Option<LoggingService>> {
    let atm_dir = get_atm_dir()?;
    if !atm_dir.join(LOG_DB_FILE).exists() {
        return Ok(None);
    }
    let service = LoggingService::new(&atm_dir, env!("CARGO_PKG_VERSION"))
        .context("Failed to open the event log")?;
    Ok(Some(service))
}

fn format_timestamp(timestamp_ms: i64) -> String {
    use chrono::{TimeZone, Utc};
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Timestamp `days` days before `now_ms`
fn cutoff_before(now_ms: i64, days: u64) -> Result<i64> {
    i64::try_from(days)
        .ok()
        .and_then(|days| days.checked_mul(MS_PER_DAY))
        .and_then(|span| now_ms.checked_sub(span))
        .with_context(|| format!("--older-than-days {} is too large", days))
}

pub fn run(command: LogsCommands) -> Result<()> {
    let Some(service) = get_logging_service()? else {
        output::info("No event log yet. Run a session with --log or set \"eventLog\": true.");
        return Ok(());
    };

    match command {
        LogsCommands::List { limit, errors, json } => {
            let entries = if errors {
                service.get_errors(limit)?
            } else {
                service.get_recent(limit)?
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }

            if entries.is_empty() {
                println!("No log entries found.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Time", "Session", "Event", "Context", "Error"]);

            for entry in entries {
                let context = [entry.command.as_deref(), entry.currency.as_deref()]
                    .iter()
                    .filter_map(|&s| s)
                    .collect::<Vec<_>>()
                    .join(", ");

                // First block of the UUID is enough to tell sessions apart
                let session = entry.session_id.split('-').next().unwrap_or_default().to_string();

                table.add_row(vec![
                    format_timestamp(entry.timestamp),
                    session,
                    entry.event,
                    context,
                    entry.error_message.unwrap_or_default().red().to_string(),
                ]);
            }

            println!("{}", table);
        }
        LogsCommands::Clear {
            older_than_days,
            force,
            json,
        } => {
            let cutoff_ms = cutoff_before(now_ms(), older_than_days)?;

            if !force
                && !json
                && !Confirm::new()
                    .with_prompt(format!("Delete logs older than {} days?", older_than_days))
                    .default(false)
                    .interact()?
            {
                println!("Cancelled.");
                return Ok(());
            }

            let deleted = service.delete_before(cutoff_ms)?;

            if json {
                println!("{}", serde_json::json!({ "deleted": deleted }));
            } else {
                output::success(&format!("Deleted {} log entries", deleted));
            }
        }
        LogsCommands::Stats { json } => {
            let total = service.count()?;
            let errors = service.get_errors(1000)?.len();
            let db_path = service.db_path().to_path_buf();
            let size_bytes = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "total_entries": total,
                        "error_count": errors,
                        "database_path": db_path.to_string_lossy(),
                        "database_size_bytes": size_bytes
                    })
                );
            } else {
                println!("{}", "Log Statistics".bold());
                println!("  Total entries: {}", total);
                println!("  Errors: {}", errors);
                println!("  Database: {}", db_path.display());
                println!("  Size: {} bytes", size_bytes);
            }
        }
    }

    Ok(())
}
