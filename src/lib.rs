//! Bet tracker: a persisted wager ledger with running profit/loss and
//! swipe-to-delete rows.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod storage;
pub mod ledger;
pub mod cues;
pub mod entry;
pub mod gesture;
pub mod commands;
pub mod dashboard;
