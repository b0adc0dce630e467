//! Bet ledger: the list of wagers, their outcomes, and running totals.
//!
//! Every mutation writes the whole snapshot through the injected
//! `KeyValueStore` before returning. Totals are recomputed from the bet list
//! on each call and never stored, so they cannot drift.

pub mod snapshot;

use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::cues::{NullSink, OutcomeSink};
use crate::entry::check_amount;
use crate::storage::KeyValueStore;
use crate::types::{Bet, BetId, BetStatus, LedgerError, Outcome, OutcomeEvent, Totals};

/// How long the shell should show a win/loss cue unless configured otherwise.
pub const DEFAULT_CUE_DURATION: Duration = Duration::from_millis(3000);

pub struct Ledger {
    bets: Vec<Bet>,
    next_id: u64,
    store: Box<dyn KeyValueStore>,
    sink: Box<dyn OutcomeSink>,
    cue_duration: Duration,
    /// Set when the last write failed; cleared by the next successful one.
    dirty: bool,
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("bets", &self.bets)
            .field("next_id", &self.next_id)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl Ledger {
    /// Rebuild the ledger from whatever `store` last saved. A fresh or
    /// corrupt store yields an empty ledger whose first id is 1.
    pub fn open(store: Box<dyn KeyValueStore>) -> Self {
        let snapshot = snapshot::read(store.as_ref());
        info!(
            bets = snapshot.bets.len(),
            next_id = snapshot.next_id,
            "Ledger opened"
        );
        Self {
            bets: snapshot.bets,
            next_id: snapshot.next_id,
            store,
            sink: Box::new(NullSink),
            cue_duration: DEFAULT_CUE_DURATION,
            dirty: false,
        }
    }

    /// Route outcome events to `sink`.
    pub fn with_sink(mut self, sink: Box<dyn OutcomeSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Cue duration attached to every outcome event.
    pub fn with_cue_duration(mut self, cue_duration: Duration) -> Self {
        self.cue_duration = cue_duration;
        self
    }

    // -- Commands ---------------------------------------------------------

    /// Log a new pending bet and return its id.
    ///
    /// On `StorageUnavailable` the bet is still in the ledger under
    /// `self.last_id()`.
    pub fn place_bet(&mut self, amount: Decimal) -> Result<BetId, LedgerError> {
        let amount = check_amount(amount)?;
        let following = self.next_id.checked_add(1).ok_or(LedgerError::IdsExhausted)?;

        let id = BetId(self.next_id);
        self.next_id = following;
        self.bets.push(Bet {
            id,
            amount,
            status: BetStatus::Pending,
        });
        info!(bet_id = %id, amount = %amount, "Bet placed");

        self.persist()?;
        Ok(id)
    }

    /// Mark a pending bet as won or lost and fire one outcome event.
    ///
    /// The event fires once the status has changed in memory, even if the
    /// subsequent write fails.
    pub fn resolve_bet(&mut self, id: BetId, outcome: Outcome) -> Result<(), LedgerError> {
        let bet = self
            .bets
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(LedgerError::NotFound(id))?;

        if bet.status != BetStatus::Pending {
            return Err(LedgerError::AlreadyResolved {
                id,
                status: bet.status,
            });
        }

        bet.status = outcome.into();
        let event = OutcomeEvent {
            bet_id: id,
            status: outcome,
            amount: bet.amount,
            cue_duration: self.cue_duration,
        };
        info!(bet_id = %id, status = %outcome, amount = %event.amount, "Bet resolved");

        let persisted = self.persist();
        self.sink.emit(event);
        persisted
    }

    /// Remove a bet. Unknown ids are ignored so a stale row can't error.
    ///
    /// Returns whether anything was removed.
    pub fn delete_bet(&mut self, id: BetId) -> Result<bool, LedgerError> {
        let before = self.bets.len();
        self.bets.retain(|b| b.id != id);

        if self.bets.len() == before {
            debug!(bet_id = %id, "Delete of unknown bet ignored");
            return Ok(false);
        }

        info!(bet_id = %id, remaining = self.bets.len(), "Bet deleted");
        self.persist()?;
        Ok(true)
    }

    /// Retry the last failed write.
    pub fn flush(&mut self) -> Result<(), LedgerError> {
        self.persist()
    }

    // -- Queries ----------------------------------------------------------

    /// Running sums over the current bet list. Stakes are capped at
    /// `MAX_AMOUNT`, so the sums cannot overflow.
    pub fn totals(&self) -> Totals {
        let sum = |status: BetStatus| -> Decimal {
            self.bets
                .iter()
                .filter(|b| b.status == status)
                .map(|b| b.amount)
                .sum()
        };

        let won = sum(BetStatus::Won);
        let lost = sum(BetStatus::Lost);
        Totals {
            won,
            lost,
            net: won - lost,
            pending: sum(BetStatus::Pending),
        }
    }

    /// Bets in insertion order.
    pub fn bets(&self) -> &[Bet] {
        &self.bets
    }

    /// Bets newest first, the order the list is usually shown in.
    pub fn recent_first(&self) -> impl Iterator<Item = &Bet> {
        self.bets.iter().rev()
    }

    pub fn get(&self, id: BetId) -> Option<&Bet> {
        self.bets.iter().find(|b| b.id == id)
    }

    pub fn contains(&self, id: BetId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.bets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bets.is_empty()
    }

    /// The id the next placed bet will receive.
    pub fn next_id(&self) -> BetId {
        BetId(self.next_id)
    }

    /// Id of the most recently placed bet, if any bet was ever placed.
    pub fn last_id(&self) -> Option<BetId> {
        self.next_id.checked_sub(1).filter(|&n| n >= 1).map(BetId)
    }

    /// Whether the in-memory ledger is ahead of storage.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Give back the storage adapter, e.g. to reopen the ledger on it.
    pub fn into_store(self) -> Box<dyn KeyValueStore> {
        self.store
    }

    fn persist(&mut self) -> Result<(), LedgerError> {
        match snapshot::write(self.store.as_mut(), &self.bets, self.next_id) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                self.dirty = true;
                warn!(error = %e, bets = self.bets.len(), "Ledger write failed, keeping in-memory state");
                Err(LedgerError::StorageUnavailable(e))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
