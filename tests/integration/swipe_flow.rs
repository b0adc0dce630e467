//! Swipe-to-delete driven end to end through the board and a ledger.

use chrono::{Duration, TimeZone, Utc};
use rust_decimal_macros::dec;

use bet_tracker::gesture::{PointerKind, SwipeBoard, SwipeConfig, SwipeState};
use bet_tracker::ledger::Ledger;
use bet_tracker::types::BetId;

use crate::support::SharedStore;

fn t0() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
}

fn seeded(n: usize) -> (SharedStore, Ledger) {
    let store = SharedStore::new();
    let mut ledger = Ledger::open(Box::new(store.clone()));
    for _ in 0..n {
        ledger.place_bet(dec!(5)).unwrap();
    }
    (store, ledger)
}

/// Slow drag from x=300 to x=300-distance over one second.
fn slow_swipe(board: &mut SwipeBoard, id: BetId, distance: f64) -> SwipeState {
    board.press(id, PointerKind::Touch, 300.0, t0());
    board.move_to(id, 300.0 - distance);
    board.release(id, t0() + Duration::milliseconds(1000))
}

#[test]
fn test_swipe_confirm_deletes_and_persists() {
    let (store, mut ledger) = seeded(3);
    let mut board = SwipeBoard::new(SwipeConfig::default());

    assert_eq!(slow_swipe(&mut board, BetId(2), 70.0), SwipeState::Armed);
    assert!(board.frame(BetId(2)).delete_visible);

    assert!(board.confirm_delete(BetId(2), &mut ledger).unwrap());
    assert!(!ledger.contains(BetId(2)));
    assert_eq!(board.state(BetId(2)), SwipeState::Idle);

    let reopened = Ledger::open(Box::new(store));
    assert_eq!(reopened.len(), 2);
    assert!(!reopened.contains(BetId(2)));
}

#[test]
fn test_short_slow_swipe_snaps_back() {
    let (_store, mut ledger) = seeded(1);
    let mut board = SwipeBoard::new(SwipeConfig::default());

    assert_eq!(slow_swipe(&mut board, BetId(1), 30.0), SwipeState::Idle);
    assert!(!board.confirm_delete(BetId(1), &mut ledger).unwrap());
    assert_eq!(ledger.len(), 1);
}

#[test]
fn test_quick_flick_arms() {
    let (_store, _ledger) = seeded(1);
    let mut board = SwipeBoard::new(SwipeConfig::default());

    board.press(BetId(1), PointerKind::Mouse, 300.0, t0());
    board.move_to(BetId(1), 270.0);
    let state = board.release(BetId(1), t0() + Duration::milliseconds(40));
    assert_eq!(state, SwipeState::Armed);
}

#[test]
fn test_rightward_drag_never_arms() {
    let mut board = SwipeBoard::new(SwipeConfig::default());
    board.press(BetId(1), PointerKind::Touch, 100.0, t0());
    board.move_to(BetId(1), 260.0);
    assert_eq!(board.frame(BetId(1)).offset, 0.0);
    assert_eq!(
        board.release(BetId(1), t0() + Duration::milliseconds(20)),
        SwipeState::Idle
    );
}

#[test]
fn test_only_one_row_armed_at_a_time() {
    let (_store, mut ledger) = seeded(2);
    let mut board = SwipeBoard::new(SwipeConfig::default());

    slow_swipe(&mut board, BetId(1), 80.0);
    slow_swipe(&mut board, BetId(2), 80.0);
    assert_eq!(board.armed(), vec![BetId(2)]);

    assert_eq!(board.press_outside(), 1);
    assert!(board.armed().is_empty());
    assert!(!board.confirm_delete(BetId(2), &mut ledger).unwrap());
    assert_eq!(ledger.len(), 2);
}

#[test]
fn test_storage_failure_still_deletes_row() {
    let (store, mut ledger) = seeded(1);
    let mut board = SwipeBoard::new(SwipeConfig::default());
    slow_swipe(&mut board, BetId(1), 60.0);

    store.fail_writes("quota exceeded");
    assert!(board.confirm_delete(BetId(1), &mut ledger).is_err());
    assert!(ledger.is_empty());
    assert_eq!(board.state(BetId(1)), SwipeState::Idle);
}

#[test]
fn test_retain_drops_rows_for_removed_bets() {
    let (_store, mut ledger) = seeded(2);
    let mut board = SwipeBoard::new(SwipeConfig::default());
    slow_swipe(&mut board, BetId(1), 80.0);
    slow_swipe(&mut board, BetId(2), 10.0);

    ledger.delete_bet(BetId(1)).unwrap();
    assert_eq!(board.retain_bets(&ledger), 1);
    assert_eq!(board.len(), 1);
}
