//! ATM CLI - a teller machine simulator in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

mod commands;
mod output;

use commands::{init, logs, rates, session};

/// ATM - check, deposit and withdraw against a simulated balance
#[derive(Parser)]
#[command(name = "atm", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    session: SessionArgs,
}

#[derive(Args)]
struct SessionArgs {
    /// End the session when "Exit" is chosen
    #[arg(long)]
    strict_exit: bool,
    /// Record this session in the event log
    #[arg(long)]
    log: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session (the default)
    Session {
        #[command(flatten)]
        args: SessionArgs,
    },

    /// Show the configured exchange rates
    Rates {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default settings.json
    Init {
        /// Overwrite an existing settings file
        #[arg(long, short)]
        force: bool,
    },

    /// Manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None => session::run(cli.session.strict_exit, cli.session.log),
        Some(Commands::Session { args }) => session::run(
            args.strict_exit || cli.session.strict_exit,
            args.log || cli.session.log,
        ),
        Some(Commands::Rates { json }) => rates::run(json),
        Some(Commands::Init { force }) => init::run(force),
        Some(Commands::Logs { command }) => logs::run(command),
    }
}
