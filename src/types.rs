//! Shared types for the bet tracker.
//!
//! The ledger, storage, gesture, and dashboard modules all speak in these
//! types, so they live here to avoid circular references.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Bet
// ---------------------------------------------------------------------------

/// Ledger-assigned bet identifier. Allocated from a monotonically increasing
/// counter and never reused, even after the bet is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BetId(pub u64);

impl fmt::Display for BetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl std::str::FromStr for BetId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        digits
            .parse::<u64>()
            .map(BetId)
            .map_err(|_| anyhow::anyhow!("Invalid bet id: {s}"))
    }
}

/// Largest stake a single bet may carry. Keeps every sum over the ledger
/// far inside `Decimal` range.
pub const MAX_AMOUNT: Decimal = dec!(1_000_000_000);

/// A single logged wager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    pub id: BetId,
    /// Stake, always in `(0, MAX_AMOUNT]`. Stored as a JSON number with every
    /// digit kept.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    pub status: BetStatus,
}

impl fmt::Display for Bet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ${:.2} [{}]", self.id, self.amount, self.status)
    }
}

impl Bet {
    pub fn is_pending(&self) -> bool {
        self.status == BetStatus::Pending
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Bet lifecycle status. `Pending` moves exactly once to `Won` or `Lost`.
///
/// Older snapshots spell the resolved states `win` / `loss`; both are
/// accepted on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    Pending,
    #[serde(alias = "win")]
    Won,
    #[serde(alias = "loss")]
    Lost,
}

impl fmt::Display for BetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetStatus::Pending => write!(f, "pending"),
            BetStatus::Won => write!(f, "won"),
            BetStatus::Lost => write!(f, "lost"),
        }
    }
}

/// The two ways a pending bet can be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    #[serde(alias = "win")]
    Won,
    #[serde(alias = "loss")]
    Lost,
}

impl From<Outcome> for BetStatus {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Won => BetStatus::Won,
            Outcome::Lost => BetStatus::Lost,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&BetStatus::from(*self), f)
    }
}

/// Parse an outcome (case-insensitive), accepting the short forms the
/// shell uses.
impl std::str::FromStr for Outcome {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "won" | "win" | "w" => Ok(Outcome::Won),
            "lost" | "loss" | "lose" | "l" => Ok(Outcome::Lost),
            _ => Err(anyhow::anyhow!("Unknown outcome: {s}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Running sums derived from the ledger. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub won: Decimal,
    pub lost: Decimal,
    /// `won - lost`
    pub net: Decimal,
    /// Stakes still awaiting resolution.
    pub pending: Decimal,
}

impl Default for Totals {
    fn default() -> Self {
        Self {
            won: Decimal::ZERO,
            lost: Decimal::ZERO,
            net: Decimal::ZERO,
            pending: Decimal::ZERO,
        }
    }
}

impl fmt::Display for Totals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "won=${:.2} lost=${:.2} net=${:.2} pending=${:.2}",
            self.won, self.lost, self.net, self.pending,
        )
    }
}

impl Totals {
    /// Sign of the net result, for the shell's profit/loss indicator.
    pub fn outlook(&self) -> NetOutlook {
        if self.net > Decimal::ZERO {
            NetOutlook::Ahead
        } else if self.net < Decimal::ZERO {
            NetOutlook::Behind
        } else {
            NetOutlook::Even
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetOutlook {
    Ahead,
    Behind,
    Even,
}

// ---------------------------------------------------------------------------
// Outcome events
// ---------------------------------------------------------------------------

/// Emitted once per successful resolution. The presentation layer decides
/// what to show; `cue_duration` is how long it should stay on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeEvent {
    pub bet_id: BetId,
    pub status: Outcome,
    pub amount: Decimal,
    pub cue_duration: Duration,
}

impl fmt::Display for OutcomeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.status {
            Outcome::Won => "🏆 WON",
            Outcome::Lost => "💀 LOST",
        };
        write!(f, "{label} {} ${:.2}", self.bet_id, self.amount)
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Failures reported by a storage adapter.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoding error: {0}")]
    Encode(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by ledger operations. None of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Bet not found: {0}")]
    NotFound(BetId),

    #[error("Bet {id} already resolved as {status}")]
    AlreadyResolved { id: BetId, status: BetStatus },

    #[error("No bet ids left to allocate")]
    IdsExhausted,

    /// The in-memory ledger already reflects the mutation; only the write
    /// failed. Retry with `Ledger::flush`.
    #[error("Storage unavailable, change kept in memory: {0}")]
    StorageUnavailable(#[from] StorageError),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
