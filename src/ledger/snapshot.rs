//! Snapshot encoding for the ledger.
//!
//! Bets go under `BETS_KEY` as a JSON array of `{id, amount, status}`
//! records; the counter goes under `NEXT_ID_KEY` as a bare integer.
//! Anything unreadable is treated as if it had never been written.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::storage::{KeyValueStore, BETS_KEY, NEXT_ID_KEY};
use crate::types::{Bet, StorageError, MAX_AMOUNT};

/// First id handed out by a fresh ledger.
pub const FIRST_ID: u64 = 1;

/// Ledger contents as read back from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub bets: Vec<Bet>,
    pub next_id: u64,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            bets: Vec::new(),
            next_id: FIRST_ID,
        }
    }
}

/// Read the last snapshot. Never fails: missing, unreadable, or corrupt
/// values fall back to an empty ledger and a counter of `FIRST_ID`.
pub fn read(store: &dyn KeyValueStore) -> Snapshot {
    let bets = load_key(store, BETS_KEY)
        .and_then(|raw| decode_bets(&raw))
        .unwrap_or_default();
    let next_id = load_key(store, NEXT_ID_KEY)
        .and_then(|raw| decode_counter(&raw))
        .unwrap_or(FIRST_ID);

    repair(bets, next_id)
}

/// Write the full bet list, then the counter.
pub fn write(store: &mut dyn KeyValueStore, bets: &[Bet], next_id: u64) -> Result<(), StorageError> {
    let encoded = serde_json::to_string(bets).map_err(|e| StorageError::Encode(e.to_string()))?;
    store.save(BETS_KEY, &encoded)?;
    store.save(NEXT_ID_KEY, &next_id.to_string())?;
    debug!(bets = bets.len(), next_id, "Snapshot written");
    Ok(())
}

fn load_key(store: &dyn KeyValueStore, key: &str) -> Option<String> {
    match store.load(key) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "Failed to read stored value, treating as absent");
            None
        }
    }
}

fn decode_bets(raw: &str) -> Option<Vec<Bet>> {
    match serde_json::from_str::<Vec<Bet>>(raw) {
        Ok(bets) => Some(bets),
        Err(e) => {
            warn!(key = BETS_KEY, error = %e, "Stored bets are corrupt, starting empty");
            None
        }
    }
}

fn decode_counter(raw: &str) -> Option<u64> {
    match raw.trim().parse::<u64>() {
        Ok(n) if n >= FIRST_ID => Some(n),
        _ => {
            warn!(key = NEXT_ID_KEY, raw, "Stored counter is corrupt, resetting");
            None
        }
    }
}

/// Drop records that break ledger invariants and make sure the counter is
/// ahead of every surviving id.
fn repair(bets: Vec<Bet>, next_id: u64) -> Snapshot {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(bets.len());

    for bet in bets {
        if bet.amount <= Decimal::ZERO {
            warn!(bet_id = %bet.id, amount = %bet.amount, "Dropping stored bet with non-positive amount");
            continue;
        }
        if bet.amount > MAX_AMOUNT {
            warn!(bet_id = %bet.id, amount = %bet.amount, "Dropping stored bet above the stake limit");
            continue;
        }
        // Allocation stops one short of `u64::MAX`.
        if bet.id.0 == u64::MAX {
            warn!(bet_id = %bet.id, "Dropping stored bet with an unallocatable id");
            continue;
        }
        if !seen.insert(bet.id) {
            warn!(bet_id = %bet.id, "Dropping stored bet with duplicate id");
            continue;
        }
        kept.push(bet);
    }

    let floor = kept
        .iter()
        .filter_map(|b| b.id.0.checked_add(1))
        .max()
        .unwrap_or(FIRST_ID);
    if next_id < floor {
        warn!(stored = next_id, raised_to = floor, "Stored counter behind existing ids");
    }

    Snapshot {
        bets: kept,
        next_id: next_id.max(floor),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
