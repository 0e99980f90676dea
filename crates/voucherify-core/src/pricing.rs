//! # Pricing Engine
//!
//! Computes the price after a voucher is applied, or the discount itself.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pricing Calculation                              │
//! │                                                                         │
//! │  base_price (major units) ──┐                                          │
//! │  Discount ──────────────────┼──► validate ──► branch on kind ──► round │
//! │  unit_price (UNIT only) ────┘                                          │
//! │                                                                         │
//! │  Kind     │ calculate_price                │ calculate_discount        │
//! │  ─────────┼────────────────────────────────┼─────────────────────────  │
//! │  GIFT     │ base - min(balance, base)      │ min(balance, base)        │
//! │  PERCENT  │ base - min(base*pct, limit)    │ min(base*pct, limit)      │
//! │  AMOUNT   │ max(base - amount_off, 0)      │ amount_off, or base when  │
//! │           │                                │ amount_off ≥ base         │
//! │  UNIT     │ max(base - unit*count, 0)      │ min(unit*count, base)     │
//! │                                                                         │
//! │  balance / amount_off / limit are cents on the wire → divided by 100   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both functions are pure and deterministic. A malformed discount aborts the
//! calculation with a [`PricingError`].

use crate::error::{PricingError, PricingResult};
use crate::money::{round_money, Money};
use crate::types::{Discount, Voucher};

// =============================================================================
// Input Checks
// =============================================================================

fn check_base_price(base_price: f64) -> PricingResult<()> {
    if !base_price.is_finite() || base_price < 0.0 {
        return Err(PricingError::InvalidBasePrice(base_price));
    }
    Ok(())
}

fn require_unit_price(unit_price: Option<f64>) -> PricingResult<f64> {
    let unit_price = unit_price.ok_or(PricingError::MissingUnitPrice)?;
    if !unit_price.is_finite() || unit_price < 0.0 {
        return Err(PricingError::InvalidUnitPrice(unit_price));
    }
    Ok(unit_price)
}

/// Percentage discount before rounding, capped by `amount_limit` (cents).
fn percent_discount(base_price: f64, percent_off: f64, amount_limit: Option<Money>) -> f64 {
    let discount = base_price * (percent_off / 100.0);
    match amount_limit {
        Some(limit) => discount.min(limit.to_major()),
        None => discount,
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Returns the price left to pay after applying `discount` to `base_price`.
///
/// `unit_price` is only read for UNIT discounts, where it is required.
///
/// ## Example
/// ```rust
/// use voucherify_core::{calculate_price, Discount, Money};
///
/// let fifteen_off = Discount::Amount { amount_off: Money::from_cents(1500) };
/// assert_eq!(calculate_price(10.0, &fifteen_off, None).unwrap(), 0.0);
///
/// let two_free = Discount::Unit { unit_off: 2 };
/// assert_eq!(calculate_price(50.0, &two_free, Some(12.5)).unwrap(), 25.0);
/// ```
pub fn calculate_price(
    base_price: f64,
    discount: &Discount,
    unit_price: Option<f64>,
) -> PricingResult<f64> {
    check_base_price(base_price)?;
    discount.validate()?;

    let price = match *discount {
        Discount::Gift { balance } => base_price - balance.to_major().min(base_price),
        // No floor: the discount never exceeds the base price here.
        Discount::Percent {
            percent_off,
            amount_limit,
        } => base_price - percent_discount(base_price, percent_off, amount_limit),
        Discount::Amount { amount_off } => (base_price - amount_off.to_major()).max(0.0),
        Discount::Unit { unit_off } => {
            let unit_price = require_unit_price(unit_price)?;
            (base_price - unit_price * unit_off as f64).max(0.0)
        }
    };

    Ok(round_money(price))
}

/// Returns the amount `discount` takes off `base_price`.
///
/// For AMOUNT discounts larger than the base price the whole base price is
/// the discount.
///
/// ## Example
/// ```rust
/// use voucherify_core::{calculate_discount, Discount, Money};
///
/// let fifteen_off = Discount::Amount { amount_off: Money::from_cents(1500) };
/// assert_eq!(calculate_discount(10.0, &fifteen_off, None).unwrap(), 10.0);
/// assert_eq!(calculate_discount(40.0, &fifteen_off, None).unwrap(), 15.0);
/// ```
pub fn calculate_discount(
    base_price: f64,
    discount: &Discount,
    unit_price: Option<f64>,
) -> PricingResult<f64> {
    check_base_price(base_price)?;
    discount.validate()?;

    let amount = match *discount {
        Discount::Gift { balance } => balance.to_major().min(base_price),
        Discount::Percent {
            percent_off,
            amount_limit,
        } => percent_discount(base_price, percent_off, amount_limit),
        Discount::Amount { amount_off } => {
            let amount_off = amount_off.to_major();
            if base_price - amount_off > 0.0 {
                amount_off
            } else {
                base_price
            }
        }
        Discount::Unit { unit_off } => {
            let unit_price = require_unit_price(unit_price)?;
            (unit_price * unit_off as f64).min(base_price)
        }
    };

    Ok(round_money(amount))
}

impl Voucher {
    /// Resolves this voucher's discount and returns the price after it.
    ///
    /// ## Errors
    /// - `UnsupportedDiscountType` when the voucher has no usable shape
    /// - `InvalidDiscount` when its fields are out of range
    pub fn calculate_price(&self, base_price: f64, unit_price: Option<f64>) -> PricingResult<f64> {
        calculate_price(base_price, &self.discount()?, unit_price)
    }

    /// Resolves this voucher's discount and returns the discount amount.
    pub fn calculate_discount(&self, base_price: f64, unit_price: Option<f64>) -> PricingResult<f64> {
        calculate_discount(base_price, &self.discount()?, unit_price)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
