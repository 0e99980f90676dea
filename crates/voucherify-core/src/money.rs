//! # Money Module
//!
//! Provides the `Money` type for the minor-unit amounts carried on the wire,
//! and the rounding rule every price calculation ends with.
//!
//! ## Two Representations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WIRE (service JSON)                 PRICING (caller side)              │
//! │                                                                         │
//! │  amount_off:   1500  (cents)  ──┐                                       │
//! │  amount_limit: 500   (cents)    ├──► Money ──► to_major() ──► 15.00     │
//! │  balance:      2500  (cents)  ──┘                                       │
//! │                                                                         │
//! │  base price / unit price arrive as f64 major units (e.g. dollars),     │
//! │  every result goes through round_money() before it leaves the engine.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use voucherify_core::money::{round_money, Money};
//!
//! let off = Money::from_cents(1500);
//! assert_eq!(off.to_major(), 15.0);
//! assert_eq!(round_money(10.005), 10.01);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Rounding
// =============================================================================

/// Rounds a major-unit amount to two decimal places, half-up with a bias.
///
/// The value is scaled by `100.001` rather than `100` so that amounts which
/// float arithmetic leaves just below a `.xx5` boundary (`1.005` is stored
/// as `1.00499999...`) still round up. Ties go toward positive infinity.
///
/// The bias grows with the value: it adds `value / 1000` cents before
/// rounding, so once that reaches half a cent an exact amount gains one.
/// Whole amounts from 500.00 upward come out a cent high (`500.0` gives
/// `500.01`, `1000.0` gives `1000.01`), and a PERCENT price plus its
/// discount can then exceed the base price by a cent or two.
///
/// ## Example
/// ```rust
/// use voucherify_core::money::round_money;
///
/// assert_eq!(round_money(1.005), 1.01);
/// assert_eq!(round_money(19.994), 19.99);
/// assert_eq!(round_money(80.0), 80.0);
/// assert_eq!(round_money(1000.0), 1000.01);
/// ```
pub fn round_money(value: f64) -> f64 {
    (value * (100.0 + 0.001) + 0.5).floor() / 100.0
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD).
///
/// Serialized as a bare integer so it maps one-to-one onto the service's
/// `amount_off`, `amount_limit`, `balance` and `amount` fields. Cent values
/// fit a JS number, so the TS binding is `number` rather than `bigint`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, type = "number")]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use voucherify_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a major-unit amount to cents, truncating toward zero.
    ///
    /// This is the conversion applied to an amount a shopper typed in
    /// (`10.509` becomes 1050 cents, never 1051).
    ///
    /// ## Example
    /// ```rust
    /// use voucherify_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_truncated(10.5).cents(), 1050);
    /// assert_eq!(Money::from_major_truncated(0.999).cents(), 99);
    /// ```
    pub fn from_major_truncated(major: f64) -> Self {
        // Float multiplication lands on 1049.9999 for 10.5 * 100 with some
        // inputs; nudge by a tiny epsilon before truncating.
        let scaled = major * 100.0;
        let nudged = scaled + scaled.signum() * 1e-7;
        Money(nudged.trunc() as i64)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the value in major units (cents / 100).
    ///
    /// ## Example
    /// ```rust
    /// use voucherify_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1250).to_major(), 12.5);
    /// ```
    #[inline]
    pub fn to_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `$10.99` / `-$5.50`, for logs and CLI output.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.unsigned_abs();
        write!(f, "{}${}.{:02}", sign, cents / 100, cents % 100)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(round_money(1.005), 1.01);
        assert_eq!(round_money(2.675), 2.68);
        assert_eq!(round_money(0.125), 0.13);
        assert_eq!(round_money(19.994), 19.99);
    }

    #[test]
    fn test_round_money_exact_values_unchanged() {
        assert_eq!(round_money(0.0), 0.0);
        assert_eq!(round_money(80.0), 80.0);
        assert_eq!(round_money(12.34), 12.34);
        assert_eq!(round_money(99.99), 99.99);
    }

    #[test]
    fn test_round_money_bias_drifts_large_whole_amounts() {
        assert_eq!(round_money(250.0), 250.0);
        assert_eq!(round_money(499.0), 499.0);
        assert_eq!(round_money(499.99), 499.99);
        assert_eq!(round_money(500.0), 500.01);
        assert_eq!(round_money(999.0), 999.01);
        assert_eq!(round_money(1000.0), 1000.01);
    }

    #[test]
    fn test_from_cents_and_major() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.to_major(), 10.99);
    }

    #[test]
    fn test_from_major_truncated() {
        assert_eq!(Money::from_major_truncated(10.5).cents(), 1050);
        assert_eq!(Money::from_major_truncated(10.509).cents(), 1050);
        assert_eq!(Money::from_major_truncated(0.29).cents(), 29);
        assert_eq!(Money::from_major_truncated(0.0).cents(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::from_cents(1000).is_positive());
        assert!(Money::from_cents(-500).is_negative());
        assert!(!Money::zero().is_positive());
        assert!(!Money::zero().is_negative());
        assert_eq!(Money::default(), Money::zero());
    }

    #[test]
    fn test_serializes_as_bare_integer() {
        let json = serde_json::to_string(&Money::from_cents(1500)).unwrap();
        assert_eq!(json, "1500");
        let back: Money = serde_json::from_str("250").unwrap();
        assert_eq!(back, Money::from_cents(250));
    }

    #[test]
    fn test_ts_binding_is_number() {
        assert_eq!(Money::inline(), "number");
    }
}
