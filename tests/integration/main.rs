//! End-to-end tests driving the public API the way the shell and the
//! dashboard do.

mod support;

mod ledger_flow;
mod swipe_flow;
