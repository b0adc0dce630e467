//! One recognizer per visible row.
//!
//! The board routes input to the row under the pointer, treats a press on
//! one row as an outside press for every other row, and forwards confirmed
//! deletions to the ledger. A row's session is dropped as soon as its bet
//! is gone so it can never be reused for a different bet.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::{PointerKind, SwipeConfig, SwipeFrame, SwipeRecognizer, SwipeState};
use crate::ledger::Ledger;
use crate::types::{BetId, LedgerError};

#[derive(Debug, Clone, Default)]
pub struct SwipeBoard {
    config: SwipeConfig,
    rows: HashMap<BetId, SwipeRecognizer>,
}

impl SwipeBoard {
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            config,
            rows: HashMap::new(),
        }
    }

    /// Press on the row for `id`. Any other armed row is dismissed first.
    pub fn press(&mut self, id: BetId, kind: PointerKind, x: f64, at: DateTime<Utc>) {
        for (other, row) in self.rows.iter_mut() {
            if *other != id && row.press_outside() {
                debug!(bet_id = %other, "Dismissed by press on another row");
            }
        }
        let config = self.config;
        self.rows
            .entry(id)
            .or_insert_with(|| SwipeRecognizer::new(config))
            .press(kind, x, at);
    }

    pub fn move_to(&mut self, id: BetId, x: f64) {
        if let Some(row) = self.rows.get_mut(&id) {
            row.move_to(x);
        }
    }

    /// Release on the row for `id`. Rows never pressed stay idle.
    pub fn release(&mut self, id: BetId, at: DateTime<Utc>) -> SwipeState {
        self.rows
            .get_mut(&id)
            .map_or(SwipeState::Idle, |row| row.release(at))
    }

    pub fn cancel(&mut self, id: BetId) {
        if let Some(row) = self.rows.get_mut(&id) {
            row.cancel();
        }
    }

    /// A press somewhere outside every row. Returns how many rows closed.
    pub fn press_outside(&mut self) -> usize {
        self.rows
            .values_mut()
            .map(SwipeRecognizer::press_outside)
            .filter(|&closed| closed)
            .count()
    }

    /// The delete button on row `id` was tapped.
    ///
    /// When the row is armed, deletes the bet from `ledger` and discards the
    /// row's session whatever the ledger reports. Returns `Ok(false)` if the
    /// row wasn't armed and nothing happened.
    pub fn confirm_delete(&mut self, id: BetId, ledger: &mut Ledger) -> Result<bool, LedgerError> {
        let Some(row) = self.rows.get_mut(&id) else {
            return Ok(false);
        };

        let mut outcome = Ok(false);
        let confirmed = row.confirm_delete(|| outcome = ledger.delete_bet(id));
        if !confirmed {
            return Ok(false);
        }

        self.rows.remove(&id);
        info!(bet_id = %id, "Swipe delete confirmed");
        outcome.map(|_| true)
    }

    /// Drop sessions for rows whose bets no longer exist.
    pub fn retain_bets(&mut self, ledger: &Ledger) -> usize {
        let before = self.rows.len();
        self.rows.retain(|id, _| ledger.contains(*id));
        let dropped = before - self.rows.len();
        if dropped > 0 {
            debug!(dropped, "Discarded swipe sessions for removed bets");
        }
        dropped
    }

    /// Render state for row `id`; rows with no session render idle.
    pub fn frame(&self, id: BetId) -> SwipeFrame {
        self.rows
            .get(&id)
            .map(SwipeRecognizer::frame)
            .unwrap_or_else(|| SwipeRecognizer::new(self.config).frame())
    }

    pub fn state(&self, id: BetId) -> SwipeState {
        self.rows.get(&id).map_or(SwipeState::Idle, SwipeRecognizer::state)
    }

    /// Rows currently showing their delete button.
    pub fn armed(&self) -> Vec<BetId> {
        let mut ids: Vec<BetId> = self
            .rows
            .iter()
            .filter(|(_, row)| row.is_armed())
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    /// Number of rows with a live recognizer.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
