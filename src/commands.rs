//! Line commands for the terminal shell.
//!
//! Each command maps onto one ledger operation, so the binary stays a thin
//! loop: parse a line, apply it, print the result.

use anyhow::{anyhow, bail, Result};
use rust_decimal::Decimal;
use std::fmt::Write as _;

use crate::entry::parse_amount;
use crate::ledger::Ledger;
use crate::types::{BetId, LedgerError, NetOutlook, Outcome};

pub const HELP: &str = "\
commands:
  bet <amount>     log a new pending bet
  win <id>         mark a bet as won
  loss <id>        mark a bet as lost
  delete <id>      remove a bet
  list             show bets, newest first
  totals           show won / lost / net
  help             show this message
  quit             exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Bet(Decimal),
    Resolve(BetId, Outcome),
    Delete(BetId),
    List,
    Totals,
    Help,
    Quit,
}

impl std::str::FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let verb = parts
            .next()
            .ok_or_else(|| anyhow!("empty command"))?
            .to_lowercase();
        let arg = parts.next();
        if parts.next().is_some() {
            bail!("too many arguments: {line}");
        }

        let id = |arg: Option<&str>| -> Result<BetId> {
            arg.ok_or_else(|| anyhow!("{verb} needs a bet id"))?.parse()
        };

        match verb.as_str() {
            "bet" | "add" => {
                let raw = arg.ok_or_else(|| anyhow!("bet needs an amount"))?;
                Ok(Command::Bet(parse_amount(raw)?))
            }
            "win" | "won" | "loss" | "lost" => Ok(Command::Resolve(id(arg)?, verb.parse()?)),
            "delete" | "del" | "rm" => Ok(Command::Delete(id(arg)?)),
            "list" | "ls" => Ok(Command::List),
            "totals" | "total" => Ok(Command::Totals),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(anyhow!("unknown command: {other} (try `help`)")),
        }
    }
}

/// Format an amount for the terminal, e.g. `$12.50` or `-$3.00`.
pub fn format_money(amount: Decimal) -> String {
    if amount < Decimal::ZERO {
        format!("-${:.2}", -amount)
    } else {
        format!("${:.2}", amount)
    }
}

/// Apply `command` to `ledger` and return the text to print.
///
/// A storage failure is reported alongside the applied change rather than
/// as an error, since the change is already in the ledger.
pub fn apply(ledger: &mut Ledger, command: &Command) -> Result<String, LedgerError> {
    let text = match command {
        Command::Bet(amount) => match ledger.place_bet(*amount) {
            Ok(id) => format!("placed {id} for {}", format_money(*amount)),
            Err(LedgerError::StorageUnavailable(e)) => {
                format!("placed {} for {} (not saved: {e})", last_label(ledger), format_money(*amount))
            }
            Err(e) => return Err(e),
        },
        Command::Resolve(id, outcome) => match ledger.resolve_bet(*id, *outcome) {
            Ok(()) => format!("{id} marked {outcome}"),
            Err(LedgerError::StorageUnavailable(e)) => format!("{id} marked {outcome} (not saved: {e})"),
            Err(e) => return Err(e),
        },
        Command::Delete(id) => match ledger.delete_bet(*id) {
            Ok(true) => format!("deleted {id}"),
            Ok(false) => format!("{id} was already gone"),
            Err(LedgerError::StorageUnavailable(e)) => format!("deleted {id} (not saved: {e})"),
            Err(e) => return Err(e),
        },
        Command::List => render_list(ledger),
        Command::Totals => render_totals(ledger),
        Command::Help => HELP.to_string(),
        Command::Quit => String::new(),
    };
    Ok(text)
}

fn last_label(ledger: &Ledger) -> String {
    ledger
        .last_id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "bet".to_string())
}

fn render_list(ledger: &Ledger) -> String {
    if ledger.is_empty() {
        return "no bets yet".to_string();
    }
    let mut out = String::new();
    for bet in ledger.recent_first() {
        let _ = writeln!(out, "{:>5}  {:>12}  {}", bet.id, format_money(bet.amount), bet.status);
    }
    out.trim_end().to_string()
}

fn render_totals(ledger: &Ledger) -> String {
    let totals = ledger.totals();
    let mood = match totals.outlook() {
        NetOutlook::Ahead => "🏆",
        NetOutlook::Behind => "💀",
        NetOutlook::Even => "🎯",
    };
    format!(
        "{mood} net {}  |  won {}  |  lost {}  |  pending {}",
        format_money(totals.net),
        format_money(totals.won),
        format_money(totals.lost),
        format_money(totals.pending),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
