//! Session command - the interactive ATM menu

use std::io::{self, BufRead, Write};

use anyhow::Result;
use atm_core::services::LoggingService;
use atm_core::{Error, ExitPolicy, Identity, LogEvent, Receipt, Terminal};
use colored::Colorize;
use dialoguer::Password;
use rust_decimal::Decimal;

use super::get_context;
use crate::output;

/// The unlisted choice that ends the loop under [`ExitPolicy::Legacy`]
const LEGACY_SENTINEL: i64 = 5;

/// A line typed at the menu prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    CheckBalance,
    Deposit,
    Withdraw,
    Exit,
    /// Any other integer
    Unknown(i64),
    /// Not an integer at all
    Garbage,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Self {
        match input.trim().parse::<i64>() {
            Ok(1) => MenuChoice::CheckBalance,
            Ok(2) => MenuChoice::Deposit,
            Ok(3) => MenuChoice::Withdraw,
            Ok(4) => MenuChoice::Exit,
            Ok(n) => MenuChoice::Unknown(n),
            Err(_) => MenuChoice::Garbage,
        }
    }
}

/// Why the menu loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// "Exit" chosen under the strict policy
    ExitChosen,
    /// The legacy loop saw its sentinel choice
    Sentinel,
    /// Input ran out
    EndOfInput,
}

impl SessionEnd {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionEnd::ExitChosen => "exit_chosen",
            SessionEnd::Sentinel => "sentinel",
            SessionEnd::EndOfInput => "end_of_input",
        }
    }
}

/// Drives a terminal from line-based input
///
/// Reads choices and arguments from `input`, writes prompts and results to
/// `output`. Per-request failures are printed and the menu comes back.
pub struct MenuDriver<'l, R, W> {
    input: R,
    output: W,
    exit_policy: ExitPolicy,
    logger: Option<&'l LoggingService>,
}

impl<'l, R: BufRead, W: Write> MenuDriver<'l, R, W> {
    pub fn new(input: R, output: W, exit_policy: ExitPolicy) -> Self {
        Self {
            input,
            output,
            exit_policy,
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Option<&'l LoggingService>) -> Self {
        self.logger = logger;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Attempt the single login at the start of a session
    ///
    /// Uses `pin` when the caller already collected it, otherwise prompts
    /// and reads one line. Returns whether the login succeeded.
    pub fn login<'a>(
        &mut self,
        terminal: &mut Terminal<'a>,
        identity: &'a Identity,
        pin: Option<String>,
    ) -> Result<bool> {
        let pin = match pin {
            Some(pin) => pin,
            None => {
                let prompt = format!("Enter PIN for user {}: ", identity.username());
                self.prompt(&prompt)?.unwrap_or_default()
            }
        };

        match terminal.login(identity, &pin) {
            Ok(receipt) => {
                self.log(LogEvent::new("login_succeeded").with_command("login"));
                self.report(&receipt)?;
                Ok(true)
            }
            Err(e) => {
                self.log(LogEvent::new("login_failed").with_command("login"));
                self.fail(e)?;
                Ok(false)
            }
        }
    }

    /// Run the menu loop until it ends
    pub fn run(&mut self, terminal: &mut Terminal<'_>) -> Result<SessionEnd> {
        let currency_prompt = format!(
            "Enter currency ({}): ",
            terminal.rates().codes().join(", ")
        );

        loop {
            self.print_menu()?;
            let Some(line) = self.prompt("Choose an option: ")? else {
                return Ok(SessionEnd::EndOfInput);
            };

            match MenuChoice::parse(&line) {
                MenuChoice::CheckBalance => {
                    let Some(currency) = self.prompt(&currency_prompt)? else {
                        return Ok(SessionEnd::EndOfInput);
                    };
                    let result = terminal.check_balance(&currency);
                    self.finish(
                        "check_balance",
                        Some(currency.as_str()),
                        "balance_checked",
                        result,
                    )?;
                }
                MenuChoice::Deposit => {
                    let Some(amount) = self.prompt_amount("Enter amount to deposit: ")? else {
                        return Ok(SessionEnd::EndOfInput);
                    };
                    if let Some(amount) = amount {
                        let result = terminal.deposit(amount);
                        self.finish("deposit", None, "deposit_completed", result)?;
                    }
                }
                MenuChoice::Withdraw => {
                    let Some(amount) = self.prompt_amount("Enter amount to withdraw: ")? else {
                        return Ok(SessionEnd::EndOfInput);
                    };
                    if let Some(amount) = amount {
                        let Some(currency) = self.prompt(&currency_prompt)? else {
                            return Ok(SessionEnd::EndOfInput);
                        };
                        let result = terminal.withdraw(amount, &currency);
                        self.finish(
                            "withdraw",
                            Some(currency.as_str()),
                            "withdraw_completed",
                            result,
                        )?;
                    }
                }
                MenuChoice::Exit => {
                    writeln!(self.output, "Exiting...")?;
                    self.log(LogEvent::new("exit_selected").with_command("exit"));
                    if self.exit_policy == ExitPolicy::Strict {
                        return Ok(SessionEnd::ExitChosen);
                    }
                }
                MenuChoice::Unknown(n) => {
                    writeln!(self.output, "{}", "Invalid option! Please try again.".red())?;
                    if self.exit_policy == ExitPolicy::Legacy && n == LEGACY_SENTINEL {
                        return Ok(SessionEnd::Sentinel);
                    }
                }
                MenuChoice::Garbage => {
                    writeln!(self.output, "{}", "Invalid option! Please try again.".red())?;
                }
            }
        }
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", "ATM Menu:".bold())?;
        writeln!(self.output, "1. Check Balance")?;
        writeln!(self.output, "2. Deposit Cash")?;
        writeln!(self.output, "3. Withdraw Cash")?;
        writeln!(self.output, "4. Exit")
    }

    /// Print a prompt and read one trimmed line; `None` at end of input
    fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompt for a decimal amount
    ///
    /// Outer `None` is end of input, inner `None` an unparseable amount
    /// (already reported).
    fn prompt_amount(&mut self, prompt: &str) -> io::Result<Option<Option<Decimal>>> {
        let Some(line) = self.prompt(prompt)? else {
            return Ok(None);
        };
        match line.parse::<Decimal>() {
            Ok(amount) => Ok(Some(Some(amount))),
            Err(_) => {
                writeln!(
                    self.output,
                    "{}",
                    "Invalid amount! Please enter a number.".red()
                )?;
                Ok(Some(None))
            }
        }
    }

    fn finish(
        &mut self,
        command: &str,
        currency: Option<&str>,
        success_event: &str,
        result: atm_core::domain::result::Result<Receipt>,
    ) -> Result<()> {
        match result {
            Ok(receipt) => {
                let mut event = LogEvent::new(success_event).with_command(command);
                if let Some(currency) = currency {
                    event = event.with_currency(currency);
                }
                self.log(event);
                Ok(self.report(&receipt)?)
            }
            Err(e) => {
                self.log(LogEvent::failure(command, &e));
                self.fail(e)
            }
        }
    }

    fn report(&mut self, receipt: &Receipt) -> io::Result<()> {
        writeln!(self.output, "{}", receipt.to_string().green())
    }

    /// Print a rejected request; anything that is not the user's doing ends the run
    fn fail(&mut self, error: Error) -> Result<()> {
        if !error.is_user_error() {
            return Err(error.into());
        }
        writeln!(self.output, "{}", error.to_string().red())?;
        Ok(())
    }

    fn log(&self, event: LogEvent) {
        if let Some(logger) = self.logger {
            let _ = logger.log(event);
        }
    }
}

pub fn run(strict_exit: bool, log: bool) -> Result<()> {
    let ctx = get_context(log)?;
    if let Some(reason) = &ctx.log_unavailable {
        output::warning(&format!(
            "Event log unavailable, continuing without it: {}",
            reason
        ));
    }
    let exit_policy = if strict_exit {
        ExitPolicy::Strict
    } else {
        ctx.config.exit_policy
    };
    let identity = &ctx.config.identity;
    let mut terminal = ctx.terminal()?;

    ctx.log(LogEvent::new("session_started"));

    // Hide the PIN when a person is typing it; piped input is read as a line
    let pin = if atty::is(atty::Stream::Stdin) {
        Some(
            Password::new()
                .with_prompt(format!("Enter PIN for user {}", identity.username()))
                .allow_empty_password(true)
                .interact()?,
        )
    } else {
        None
    };

    let stdin = io::stdin();
    let mut driver = MenuDriver::new(stdin.lock(), io::stdout(), exit_policy)
        .with_logger(ctx.logger.as_ref());

    driver.login(&mut terminal, identity, pin)?;
    let end = driver.run(&mut terminal)?;

    ctx.log(LogEvent::new("session_ended").with_command(end.as_str()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use atm_core::ExchangeRates;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    struct Outcome {
        output: String,
        end: SessionEnd,
        balance: Decimal,
        logged_in: bool,
    }

    fn drive(script: &str, policy: ExitPolicy) -> Outcome {
        colored::control::set_override(false);

        let identity = Identity::new("needoweb", "1234");
        let mut terminal = Terminal::new(ExchangeRates::default());
        let mut driver = MenuDriver::new(script.as_bytes(), Vec::new(), policy);

        driver.login(&mut terminal, &identity, None).unwrap();
        let end = driver.run(&mut terminal).unwrap();

        Outcome {
            output: String::from_utf8(driver.into_output()).unwrap(),
            end,
            balance: terminal.balance(),
            logged_in: terminal.is_logged_in(),
        }
    }

    #[test]
    fn test_menu_choice_parse() {
        assert_eq!(MenuChoice::parse("1"), MenuChoice::CheckBalance);
        assert_eq!(MenuChoice::parse(" 4 "), MenuChoice::Exit);
        assert_eq!(MenuChoice::parse("5"), MenuChoice::Unknown(5));
        assert_eq!(MenuChoice::parse("-2"), MenuChoice::Unknown(-2));
        assert_eq!(MenuChoice::parse("abc"), MenuChoice::Garbage);
        assert_eq!(MenuChoice::parse(""), MenuChoice::Garbage);
    }

    #[test]
    fn test_deposit_then_check_balance() {
        let outcome = drive("1234\n2\n100\n1\nUSD\n1\nEUR\n", ExitPolicy::Strict);

        assert!(outcome.output.contains("Enter PIN for user needoweb: "));
        assert!(outcome.output.contains("Login successful!"));
        assert!(outcome.output.contains("Deposited: $100.00"));
        assert!(outcome.output.contains("Current balance: 100.00 USD"));
        assert!(outcome.output.contains("Current balance: 85.00 EUR"));
        assert_eq!(outcome.balance, dec("100"));
        assert_eq!(outcome.end, SessionEnd::EndOfInput);
    }

    #[test]
    fn test_withdraw_prompts_amount_then_currency() {
        let outcome = drive("1234\n2\n100\n3\n50\nUSD\n3\n1000\nUSD\n", ExitPolicy::Strict);

        let amount_at = outcome.output.find("Enter amount to withdraw: ").unwrap();
        let currency_at = outcome.output[amount_at..]
            .find("Enter currency (USD, EUR, GBP, INR): ")
            .unwrap();
        assert!(currency_at > 0);
        assert!(outcome.output.contains("Withdrew: 50.00 USD"));
        assert!(outcome.output.contains("Insufficient funds!"));
        assert_eq!(outcome.balance, dec("50"));
    }

    #[test]
    fn test_wrong_pin_leaves_everything_locked() {
        let outcome = drive("9999\n2\n100\n1\nUSD\n3\n5\nUSD\n", ExitPolicy::Strict);

        assert!(outcome.output.contains("Invalid PIN. Login failed."));
        assert!(outcome.output.contains("Please log in to deposit money."));
        assert!(outcome.output.contains("Please log in to check your balance."));
        assert!(outcome.output.contains("Please log in to withdraw money."));
        assert!(!outcome.logged_in);
        assert_eq!(outcome.balance, Decimal::ZERO);
    }

    #[test]
    fn test_unknown_currency() {
        let outcome = drive("0000\n1\nJPY\n", ExitPolicy::Strict);
        assert!(outcome.output.contains("Invalid currency!"));
    }

    #[test]
    fn test_legacy_exit_reprompts() {
        let outcome = drive("1234\n4\n2\n10\n", ExitPolicy::Legacy);

        assert!(outcome.output.contains("Exiting..."));
        // The menu came back after "Exiting..." and the deposit went through
        let after_exit = &outcome.output[outcome.output.find("Exiting...").unwrap()..];
        assert!(after_exit.contains("ATM Menu:"));
        assert!(after_exit.contains("Deposited: $10.00"));
        assert_eq!(outcome.end, SessionEnd::EndOfInput);
    }

    #[test]
    fn test_legacy_sentinel_ends_loop() {
        let outcome = drive("1234\n5\n2\n10\n", ExitPolicy::Legacy);

        assert!(outcome.output.contains("Invalid option! Please try again."));
        assert_eq!(outcome.end, SessionEnd::Sentinel);
        assert_eq!(outcome.balance, Decimal::ZERO);
    }

    #[test]
    fn test_strict_exit_ends_loop() {
        let outcome = drive("1234\n4\n2\n10\n", ExitPolicy::Strict);

        assert!(outcome.output.contains("Exiting..."));
        assert_eq!(outcome.end, SessionEnd::ExitChosen);
        assert_eq!(outcome.balance, Decimal::ZERO);
    }

    #[test]
    fn test_strict_treats_five_as_invalid() {
        let outcome = drive("1234\n5\n", ExitPolicy::Strict);
        assert!(outcome.output.contains("Invalid option! Please try again."));
        assert_eq!(outcome.end, SessionEnd::EndOfInput);
    }

    #[test]
    fn test_bad_input_is_reported() {
        let outcome = drive("1234\nhello\n2\nten\n3\n-\n", ExitPolicy::Strict);

        assert!(outcome.output.contains("Invalid option! Please try again."));
        assert_eq!(
            outcome
                .output
                .matches("Invalid amount! Please enter a number.")
                .count(),
            2
        );
        // An unparseable withdrawal amount does not ask for a currency
        assert!(!outcome.output.contains("Enter currency"));
        assert_eq!(outcome.balance, Decimal::ZERO);
    }

    #[test]
    fn test_only_user_errors_keep_the_session_going() {
        colored::control::set_override(false);
        let mut driver = MenuDriver::new(&b""[..], Vec::new(), ExitPolicy::Strict);

        driver.fail(Error::InsufficientFunds).unwrap();
        assert!(driver.fail(Error::config("broken rate table")).is_err());

        let output = String::from_utf8(driver.into_output()).unwrap();
        assert_eq!(output, "Insufficient funds!\n");
    }

    #[test]
    fn test_non_positive_amounts() {
        let outcome = drive("1234\n2\n0\n2\n-5\n2\n10\n3\n0\nEUR\n", ExitPolicy::Strict);

        assert_eq!(
            outcome.output.matches("Deposit amount must be positive.").count(),
            2
        );
        assert!(outcome.output.contains("Withdrawal amount must be positive."));
        assert_eq!(outcome.balance, dec("10"));
    }
}
