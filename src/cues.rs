//! Outcome cues.
//!
//! Resolving a bet fires one `OutcomeEvent`. What the user sees (a trophy,
//! a sad animation, nothing at all) is up to whoever implements
//! `OutcomeSink`; the ledger only promises one event per resolution.

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::types::OutcomeEvent;

/// Receiver of outcome events.
///
/// Called synchronously from the ledger, so implementations must not block.
#[cfg_attr(test, mockall::automock)]
pub trait OutcomeSink: Send + Sync {
    fn emit(&self, event: OutcomeEvent);
}

/// Drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl OutcomeSink for NullSink {
    fn emit(&self, _event: OutcomeEvent) {}
}

/// Writes each event to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl OutcomeSink for LogSink {
    fn emit(&self, event: OutcomeEvent) {
        info!(
            bet_id = %event.bet_id,
            status = %event.status,
            amount = %event.amount,
            cue_ms = event.cue_duration.as_millis() as u64,
            "Bet resolved"
        );
    }
}

/// Forwards events to an async consumer over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<OutcomeEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiver that drains it.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutcomeEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl OutcomeSink for ChannelSink {
    fn emit(&self, event: OutcomeEvent) {
        if self.tx.send(event).is_err() {
            warn!("Outcome cue receiver dropped, event discarded");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
