//! Ledger lifecycle against a shared store: place, resolve, delete,
//! restart, and riding out a storage outage.

use rust_decimal_macros::dec;

use bet_tracker::ledger::Ledger;
use bet_tracker::storage::{JsonFileStore, BETS_KEY, NEXT_ID_KEY};
use bet_tracker::types::{BetId, BetStatus, LedgerError, Outcome, Totals, MAX_AMOUNT};

use crate::support::{RecordingSink, SharedStore};

fn open(store: &SharedStore) -> Ledger {
    Ledger::open(Box::new(store.clone()))
}

#[test]
fn test_session_survives_restart() {
    let store = SharedStore::new();
    {
        let mut ledger = open(&store);
        let a = ledger.place_bet(dec!(10)).unwrap();
        let b = ledger.place_bet(dec!(5)).unwrap();
        let c = ledger.place_bet(dec!(2.5)).unwrap();
        ledger.resolve_bet(a, Outcome::Won).unwrap();
        ledger.resolve_bet(b, Outcome::Lost).unwrap();
        assert!(ledger.delete_bet(c).unwrap());
    }

    let ledger = open(&store);
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger.get(BetId(1)).unwrap().status, BetStatus::Won);
    assert_eq!(ledger.get(BetId(2)).unwrap().status, BetStatus::Lost);
    assert_eq!(
        ledger.totals(),
        Totals { won: dec!(10), lost: dec!(5), net: dec!(5), pending: dec!(0) }
    );
    // Deleted ids are never reused.
    assert_eq!(ledger.next_id(), BetId(4));
}

#[test]
fn test_ids_not_reused_after_deleting_everything() {
    let store = SharedStore::new();
    let mut ledger = open(&store);
    for _ in 0..3 {
        let id = ledger.place_bet(dec!(1)).unwrap();
        ledger.delete_bet(id).unwrap();
    }
    assert!(ledger.is_empty());

    let mut ledger = open(&store);
    assert_eq!(ledger.place_bet(dec!(1)).unwrap(), BetId(4));
}

#[test]
fn test_outcome_events_reach_sink() {
    let store = SharedStore::new();
    let sink = RecordingSink::new();
    let mut ledger = open(&store).with_sink(Box::new(sink.clone()));

    let a = ledger.place_bet(dec!(7)).unwrap();
    let b = ledger.place_bet(dec!(3)).unwrap();
    ledger.resolve_bet(b, Outcome::Lost).unwrap();
    ledger.resolve_bet(a, Outcome::Won).unwrap();
    assert!(matches!(
        ledger.resolve_bet(a, Outcome::Lost),
        Err(LedgerError::AlreadyResolved { .. })
    ));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!((events[0].bet_id, events[0].status), (b, Outcome::Lost));
    assert_eq!((events[1].bet_id, events[1].status), (a, Outcome::Won));
    assert_eq!(events[1].amount, dec!(7));
}

#[test]
fn test_storage_outage_then_recovery() {
    let store = SharedStore::new();
    let mut ledger = open(&store);
    ledger.place_bet(dec!(4)).unwrap();

    store.fail_writes("disk full");
    let err = ledger.place_bet(dec!(6)).unwrap_err();
    assert!(matches!(err, LedgerError::StorageUnavailable(_)));
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger.last_id(), Some(BetId(2)));
    assert!(ledger.is_dirty());

    // Nothing from the failed write reached storage.
    assert_eq!(open(&store).len(), 1);

    store.heal();
    ledger.flush().unwrap();
    assert!(!ledger.is_dirty());

    let reopened = open(&store);
    assert_eq!(reopened.len(), 2);
    assert_eq!(reopened.totals().pending, dec!(10));
}

#[test]
fn test_rejections_do_not_touch_storage() {
    let store = SharedStore::new();
    let mut ledger = open(&store);
    ledger.place_bet(dec!(1)).unwrap();
    let saves = store.save_count();

    assert!(ledger.place_bet(dec!(0)).is_err());
    assert!(ledger.place_bet(dec!(-2)).is_err());
    assert!(ledger.resolve_bet(BetId(9), Outcome::Won).is_err());
    assert!(!ledger.delete_bet(BetId(9)).unwrap());

    assert_eq!(store.save_count(), saves);
}

#[test]
fn test_reads_legacy_and_repairs_counter() {
    let store = SharedStore::new();
    store.put_raw(
        BETS_KEY,
        r#"[{"id":3,"amount":8.0,"status":"win"},{"id":5,"amount":2.0,"status":"loss"},{"id":6,"amount":1.0,"status":"pending"}]"#,
    );
    store.put_raw(NEXT_ID_KEY, "2");

    let mut ledger = open(&store);
    assert_eq!(ledger.totals().net, dec!(6));
    assert_eq!(ledger.place_bet(dec!(1)).unwrap(), BetId(7));
}

#[test]
fn test_corrupt_store_starts_empty() {
    let store = SharedStore::new();
    store.put_raw(BETS_KEY, "{not json");
    store.put_raw(NEXT_ID_KEY, "banana");

    let mut ledger = open(&store);
    assert!(ledger.is_empty());
    assert_eq!(ledger.place_bet(dec!(1)).unwrap(), BetId(1));
}

#[test]
fn test_json_file_store_round_trip() {
    let dir = std::env::temp_dir().join(format!("bet-tracker-it-{}", uuid::Uuid::new_v4()));
    {
        let store = JsonFileStore::open(&dir).unwrap();
        let mut ledger = Ledger::open(Box::new(store));
        let id = ledger.place_bet(dec!(12.25)).unwrap();
        ledger.resolve_bet(id, Outcome::Won).unwrap();
    }

    let ledger = Ledger::open(Box::new(JsonFileStore::open(&dir).unwrap()));
    assert_eq!(ledger.totals().won, dec!(12.25));
    assert_eq!(ledger.next_id(), BetId(2));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_extreme_amounts_survive_file_restart() {
    let dir = std::env::temp_dir().join(format!("bet-tracker-it-{}", uuid::Uuid::new_v4()));
    let precise = dec!(0.12345678901234567891);
    {
        let mut ledger = Ledger::open(Box::new(JsonFileStore::open(&dir).unwrap()));
        ledger.place_bet(dec!(5)).unwrap();
        ledger.place_bet(precise).unwrap();
        ledger.place_bet(MAX_AMOUNT).unwrap();
        assert!(ledger.place_bet(MAX_AMOUNT + dec!(1)).is_err());
    }

    let ledger = Ledger::open(Box::new(JsonFileStore::open(&dir).unwrap()));
    assert_eq!(ledger.len(), 3);
    assert_eq!(ledger.get(BetId(2)).unwrap().amount, precise);
    assert_eq!(ledger.totals().pending, dec!(5) + precise + MAX_AMOUNT);

    let _ = std::fs::remove_dir_all(&dir);
}
