//! Swipe-to-delete gesture recognition for ledger rows.
//!
//! A `SwipeRecognizer` turns press / move / release input for one row into
//! a horizontal offset and an armed flag. Only leftward drags count, since
//! the delete affordance sits on the trailing edge. A release arms the row
//! when the drag went far enough *or* fast enough, so a short flick works as
//! well as a long slow pull.
//!
//! Everything here is synchronous and driven by the caller's event loop.
//! Times come in with the events so the recognizer never reads a clock.

pub mod board;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use board::SwipeBoard;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Gesture tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwipeConfig {
    /// Width of the delete affordance; offsets are clamped to it.
    pub max_offset: f64,
    /// Release past this distance arms the row.
    pub swipe_threshold: f64,
    /// Release faster than this (px/ms) arms the row.
    pub velocity_threshold: f64,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            max_offset: 80.0,
            swipe_threshold: 50.0,
            velocity_threshold: 0.5,
        }
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwipeState {
    /// At rest, hint visible.
    Idle,
    /// Pointer down, offset follows it.
    Dragging,
    /// Delete affordance fully revealed.
    Armed,
}

/// Input device that started the gesture. Only used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerKind {
    Touch,
    Mouse,
}

/// What the shell needs to draw a row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SwipeFrame {
    /// Leftward translation in px.
    pub offset: f64,
    /// `offset / max_offset`, for feedback proportional to drag distance.
    pub reveal: f64,
    pub delete_visible: bool,
    pub hint_visible: bool,
}

#[derive(Debug, Clone, Copy)]
struct DragSession {
    origin_x: f64,
    started_at: DateTime<Utc>,
    kind: PointerKind,
}

// ---------------------------------------------------------------------------
// Recognizer
// ---------------------------------------------------------------------------

/// Per-row swipe state machine.
#[derive(Debug, Clone)]
pub struct SwipeRecognizer {
    config: SwipeConfig,
    state: SwipeState,
    offset: f64,
    session: Option<DragSession>,
}

impl Default for SwipeRecognizer {
    fn default() -> Self {
        Self::new(SwipeConfig::default())
    }
}

impl SwipeRecognizer {
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            config,
            state: SwipeState::Idle,
            offset: 0.0,
            session: None,
        }
    }

    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    pub fn state(&self) -> SwipeState {
        self.state
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn is_armed(&self) -> bool {
        self.state == SwipeState::Armed
    }

    /// Touch-start / pointer-down at `x`. Replaces any session in flight.
    pub fn press(&mut self, kind: PointerKind, x: f64, at: DateTime<Utc>) {
        if self.session.is_some() {
            debug!(?kind, "New press replaces in-flight swipe");
        }
        self.session = Some(DragSession {
            origin_x: x,
            started_at: at,
            kind,
        });
        self.state = SwipeState::Dragging;
        self.offset = 0.0;
    }

    /// Pointer moved to `x`. Ignored unless dragging.
    pub fn move_to(&mut self, x: f64) {
        let Some(session) = self.session else {
            return;
        };
        self.offset = drag_offset(session.origin_x, x, self.config.max_offset);
    }

    /// Touch-end / pointer-up. Arms or snaps back and returns the new state.
    pub fn release(&mut self, at: DateTime<Utc>) -> SwipeState {
        let Some(session) = self.session.take() else {
            return self.state;
        };

        let elapsed_ms = elapsed_ms(session.started_at, at);
        let velocity = self.offset / elapsed_ms;
        let far_enough = self.offset > self.config.swipe_threshold;
        let fast_enough = velocity > self.config.velocity_threshold;

        if far_enough || fast_enough {
            debug!(
                kind = ?session.kind,
                offset = self.offset,
                velocity,
                far_enough,
                fast_enough,
                "Swipe armed"
            );
            self.state = SwipeState::Armed;
            self.offset = self.config.max_offset;
        } else {
            debug!(kind = ?session.kind, offset = self.offset, velocity, "Swipe snapped back");
            self.reset();
        }
        self.state
    }

    /// Touch-cancel: the platform took the gesture (e.g. for scrolling).
    pub fn cancel(&mut self) {
        if self.state == SwipeState::Dragging {
            debug!("Swipe cancelled");
            self.reset();
        }
    }

    /// A press landed outside this row. Dismisses an armed row without
    /// deleting; returns whether anything changed.
    pub fn press_outside(&mut self) -> bool {
        if self.state != SwipeState::Armed {
            return false;
        }
        debug!("Armed swipe dismissed");
        self.reset();
        true
    }

    /// The revealed delete button was tapped. Runs `on_delete` and resets,
    /// but only while armed; returns whether the delete ran.
    pub fn confirm_delete<F: FnOnce()>(&mut self, on_delete: F) -> bool {
        if self.state != SwipeState::Armed {
            return false;
        }
        on_delete();
        self.reset();
        true
    }

    pub fn frame(&self) -> SwipeFrame {
        let reveal = if self.config.max_offset > 0.0 {
            (self.offset / self.config.max_offset).clamp(0.0, 1.0)
        } else {
            0.0
        };
        SwipeFrame {
            offset: self.offset,
            reveal,
            delete_visible: self.state == SwipeState::Armed,
            hint_visible: self.state == SwipeState::Idle && self.offset == 0.0,
        }
    }

    fn reset(&mut self) {
        self.state = SwipeState::Idle;
        self.offset = 0.0;
        self.session = None;
    }
}

/// Leftward distance from `origin_x` to `x`, clamped to `[0, max_offset]`.
pub fn drag_offset(origin_x: f64, x: f64, max_offset: f64) -> f64 {
    let diff = origin_x - x;
    if diff > 0.0 {
        diff.min(max_offset)
    } else {
        0.0
    }
}

/// Whole-gesture duration in ms, floored at 1 ms so a same-instant release
/// still produces a finite velocity.
fn elapsed_ms(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let micros = (end - start).num_microseconds().unwrap_or(i64::MAX);
    (micros as f64 / 1000.0).max(1.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
