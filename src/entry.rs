//! Turning user input into bet amounts.
//!
//! `parse_amount` handles typed text, `amount_from_f64` handles numbers from
//! a JSON client, and `AmountBuffer` is the keypad accumulator: digits and
//! one decimal point go in, a validated amount comes out.

use rust_decimal::prelude::*;
use std::str::FromStr;

use crate::types::{LedgerError, MAX_AMOUNT};

/// Parse typed input such as `"12.50"` or `"$7"` into a positive amount.
pub fn parse_amount(input: &str) -> Result<Decimal, LedgerError> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
    if digits.is_empty() {
        return Err(LedgerError::InvalidAmount("amount is empty".into()));
    }

    let amount = Decimal::from_str(digits)
        .map_err(|_| LedgerError::InvalidAmount(format!("not a number: {input}")))?;
    check_amount(amount)
}

/// Convert a float amount, rejecting NaN, infinities, and anything ≤ 0.
pub fn amount_from_f64(value: f64) -> Result<Decimal, LedgerError> {
    if !value.is_finite() {
        return Err(LedgerError::InvalidAmount(format!("not a finite number: {value}")));
    }
    let amount = Decimal::from_f64(value)
        .ok_or_else(|| LedgerError::InvalidAmount(format!("out of range: {value}")))?;
    check_amount(amount)
}

/// Accept a stake in `(0, MAX_AMOUNT]`.
pub fn check_amount(amount: Decimal) -> Result<Decimal, LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(format!(
            "bet amount must be greater than zero, got {amount}"
        )));
    }
    if amount > MAX_AMOUNT {
        return Err(LedgerError::InvalidAmount(format!(
            "bet amount must be at most {MAX_AMOUNT}, got {amount}"
        )));
    }
    Ok(amount)
}

/// Keypad-style amount accumulator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmountBuffer {
    text: String,
}

impl AmountBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a digit; anything other than `0`–`9` is ignored.
    pub fn push_digit(&mut self, digit: char) {
        if digit.is_ascii_digit() {
            self.text.push(digit);
        }
    }

    /// Append a decimal point unless there already is one.
    pub fn push_point(&mut self) {
        if !self.text.contains('.') {
            self.text.push('.');
        }
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Raw text as entered, e.g. for the keypad display.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// What the display shows: the entered text, or `0` when empty.
    pub fn display(&self) -> &str {
        if self.text.is_empty() {
            "0"
        } else {
            &self.text
        }
    }

    /// The entered amount, if it is a valid bet.
    pub fn value(&self) -> Result<Decimal, LedgerError> {
        // A trailing point ("12.") still means 12.
        parse_amount(self.text.trim_end_matches('.'))
    }

    /// Take the amount and reset the buffer, leaving it intact on error.
    pub fn take(&mut self) -> Result<Decimal, LedgerError> {
        let amount = self.value()?;
        self.clear();
        Ok(amount)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
