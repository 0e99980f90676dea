//! # Domain Types
//!
//! Voucher descriptors as the service sends them, and the validated
//! [`Discount`] union the pricing engine works on.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  WIRE (serde, lenient)              VALIDATED (exhaustive match)        │
//! │                                                                         │
//! │  ┌─────────────────┐                ┌──────────────────────────────┐   │
//! │  │    Voucher      │  discount()    │          Discount            │   │
//! │  │  ─────────────  │ ─────────────► │  Percent { percent_off,      │   │
//! │  │  code           │                │            amount_limit }    │   │
//! │  │  discount ──┐   │                │  Amount  { amount_off }      │   │
//! │  │  gift ───┐  │   │                │  Unit    { unit_off }        │   │
//! │  └──────────┼──┼───┘                │  Gift    { balance }         │   │
//! │             │  ▼                    └──────────────────────────────┘   │
//! │             │  DiscountSpec { type, percent_off, amount_off,           │
//! │             │                 unit_off, amount_limit }                 │
//! │             ▼                                                           │
//! │          GiftSpec { balance }                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The wire types accept whatever the service sends; every shape problem
//! surfaces as a [`PricingError`] at the `Voucher::discount()` boundary
//! rather than as a deserialization failure.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{PricingError, PricingResult};
use crate::money::Money;

// =============================================================================
// Discount Kind
// =============================================================================

/// The four ways a voucher can reduce a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscountKind {
    /// Percentage of the base price, optionally capped.
    Percent,
    /// Fixed amount off.
    Amount,
    /// A number of free units at the caller's unit price.
    Unit,
    /// Gift card balance.
    Gift,
}

impl DiscountKind {
    /// Returns the tag the service uses for this kind.
    pub fn as_wire(&self) -> &'static str {
        match self {
            DiscountKind::Percent => "PERCENT",
            DiscountKind::Amount => "AMOUNT",
            DiscountKind::Unit => "UNIT",
            DiscountKind::Gift => "GIFT",
        }
    }

    /// Parses a `discount.type` tag. GIFT is never a discount tag; gift
    /// vouchers carry a separate `gift` object.
    pub fn from_discount_type(tag: &str) -> Option<Self> {
        match tag {
            "PERCENT" => Some(DiscountKind::Percent),
            "AMOUNT" => Some(DiscountKind::Amount),
            "UNIT" => Some(DiscountKind::Unit),
            _ => None,
        }
    }
}

impl fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

// =============================================================================
// Wire Descriptors
// =============================================================================

/// A voucher as returned by validate/publish/list calls.
///
/// Only the fields the pricing engine needs are modelled; everything else in
/// the service's payload is ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Voucher {
    /// Voucher code, when the payload carries one.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub code: Option<String>,

    /// Discount definition for discount vouchers.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub discount: Option<DiscountSpec>,

    /// Gift definition for gift vouchers.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub gift: Option<GiftSpec>,
}

/// The `discount` object of a voucher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountSpec {
    /// `PERCENT`, `AMOUNT` or `UNIT`.
    #[serde(rename = "type")]
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub kind: Option<String>,

    /// Percentage points, 0-100 exclusive of 0.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub percent_off: Option<f64>,

    /// Fixed discount in cents.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub amount_off: Option<Money>,

    /// Number of free units.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional, type = "number")]
    pub unit_off: Option<i64>,

    /// Cap on a percentage discount, in cents.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub amount_limit: Option<Money>,
}

/// The `gift` object of a gift voucher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GiftSpec {
    /// Remaining balance in cents.
    #[serde(default)]
    pub balance: Money,
}

// =============================================================================
// Validated Discount
// =============================================================================

/// A discount the pricing engine can apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Discount {
    Percent {
        percent_off: f64,
        amount_limit: Option<Money>,
    },
    Amount {
        amount_off: Money,
    },
    Unit {
        unit_off: i64,
    },
    Gift {
        balance: Money,
    },
}

impl Discount {
    /// Returns the kind of this discount.
    pub fn kind(&self) -> DiscountKind {
        match self {
            Discount::Percent { .. } => DiscountKind::Percent,
            Discount::Amount { .. } => DiscountKind::Amount,
            Discount::Unit { .. } => DiscountKind::Unit,
            Discount::Gift { .. } => DiscountKind::Gift,
        }
    }

    /// Checks the discount's fields are in range.
    ///
    /// ## Rules
    /// - PERCENT: `percent_off` finite and in (0, 100]; `amount_limit`, when
    ///   present, not negative
    /// - AMOUNT: `amount_off` above zero
    /// - UNIT: `unit_off` above zero
    /// - GIFT: `balance` not negative
    pub fn validate(&self) -> PricingResult<()> {
        let invalid = |reason: &str| {
            Err(PricingError::InvalidDiscount {
                kind: self.kind(),
                reason: reason.to_string(),
            })
        };

        match *self {
            Discount::Percent {
                percent_off,
                amount_limit,
            } => {
                if !percent_off.is_finite() || percent_off <= 0.0 || percent_off > 100.0 {
                    return invalid("should be between 0-100");
                }
                if amount_limit.is_some_and(|limit| limit.is_negative()) {
                    return invalid("amount limit must not be negative");
                }
                Ok(())
            }
            Discount::Amount { amount_off } if !amount_off.is_positive() => {
                invalid("must be higher than zero")
            }
            Discount::Unit { unit_off } if unit_off <= 0 => invalid("must be higher than zero"),
            Discount::Gift { balance } if balance.is_negative() => {
                invalid("balance must not be negative")
            }
            _ => Ok(()),
        }
    }
}

impl Voucher {
    /// Converts the wire descriptor into a validated [`Discount`].
    ///
    /// ## Resolution Order
    /// ```text
    /// gift present?            ──yes──► Discount::Gift
    ///      │ no
    /// discount present?        ──no───► UnsupportedDiscountType
    ///      │ yes
    /// type PERCENT/AMOUNT/UNIT ──no───► UnsupportedDiscountType
    ///      │ yes
    /// fields in range?         ──no───► InvalidDiscount
    ///      │ yes
    ///      ▼
    ///   Discount::{Percent, Amount, Unit}
    /// ```
    pub fn discount(&self) -> PricingResult<Discount> {
        if let Some(gift) = &self.gift {
            let discount = Discount::Gift {
                balance: gift.balance,
            };
            discount.validate()?;
            return Ok(discount);
        }

        let spec = self
            .discount
            .as_ref()
            .ok_or_else(|| PricingError::UnsupportedDiscountType("unsupported voucher type".into()))?;

        let missing = |kind: DiscountKind, reason: &str| PricingError::InvalidDiscount {
            kind,
            reason: reason.to_string(),
        };

        let discount = match spec.kind.as_deref().unwrap_or_default() {
            "PERCENT" => Discount::Percent {
                percent_off: spec
                    .percent_off
                    .ok_or_else(|| missing(DiscountKind::Percent, "should be between 0-100"))?,
                amount_limit: spec.amount_limit,
            },
            "AMOUNT" => Discount::Amount {
                amount_off: spec
                    .amount_off
                    .ok_or_else(|| missing(DiscountKind::Amount, "must be higher than zero"))?,
            },
            "UNIT" => Discount::Unit {
                unit_off: spec
                    .unit_off
                    .ok_or_else(|| missing(DiscountKind::Unit, "must be higher than zero"))?,
            },
            other => return Err(PricingError::UnsupportedDiscountType(other.to_string())),
        };

        discount.validate()?;
        Ok(discount)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn voucher(value: serde_json::Value) -> Voucher {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_percent_voucher_from_wire() {
        let v = voucher(json!({
            "code": "SUMMER20",
            "discount": { "type": "PERCENT", "percent_off": 20, "amount_limit": 500 },
            "campaign": "Summer"
        }));
        assert_eq!(v.code.as_deref(), Some("SUMMER20"));
        assert_eq!(
            v.discount().unwrap(),
            Discount::Percent {
                percent_off: 20.0,
                amount_limit: Some(Money::from_cents(500)),
            }
        );
    }

    #[test]
    fn test_amount_and_unit_vouchers_from_wire() {
        let amount = voucher(json!({ "discount": { "type": "AMOUNT", "amount_off": 1500 } }));
        assert_eq!(
            amount.discount().unwrap(),
            Discount::Amount {
                amount_off: Money::from_cents(1500)
            }
        );

        let unit = voucher(json!({ "discount": { "type": "UNIT", "unit_off": 2 } }));
        assert_eq!(unit.discount().unwrap(), Discount::Unit { unit_off: 2 });
    }

    #[test]
    fn test_gift_wins_over_discount() {
        let v = voucher(json!({
            "gift": { "balance": 2500 },
            "discount": { "type": "PERCENT", "percent_off": 10 }
        }));
        assert_eq!(
            v.discount().unwrap(),
            Discount::Gift {
                balance: Money::from_cents(2500)
            }
        );
    }

    #[test]
    fn test_missing_shapes_are_unsupported() {
        let v = voucher(json!({ "code": "NOTHING" }));
        assert!(matches!(
            v.discount(),
            Err(PricingError::UnsupportedDiscountType(_))
        ));

        let v = voucher(json!({ "discount": { "type": "SHIPPING" } }));
        assert_eq!(
            v.discount(),
            Err(PricingError::UnsupportedDiscountType("SHIPPING".into()))
        );
    }

    #[test]
    fn test_out_of_range_fields_are_invalid() {
        for body in [
            json!({ "discount": { "type": "PERCENT", "percent_off": 0 } }),
            json!({ "discount": { "type": "PERCENT", "percent_off": 150 } }),
            json!({ "discount": { "type": "PERCENT" } }),
            json!({ "discount": { "type": "AMOUNT", "amount_off": 0 } }),
            json!({ "discount": { "type": "AMOUNT", "amount_off": -100 } }),
            json!({ "discount": { "type": "UNIT", "unit_off": 0 } }),
            json!({ "gift": { "balance": -1 } }),
        ] {
            let result = voucher(body.clone()).discount();
            assert!(
                matches!(result, Err(PricingError::InvalidDiscount { .. })),
                "expected InvalidDiscount for {body}, got {result:?}"
            );
        }
    }

    #[test]
    fn test_percent_boundary_is_inclusive() {
        let d = Discount::Percent {
            percent_off: 100.0,
            amount_limit: None,
        };
        assert!(d.validate().is_ok());

        let d = Discount::Percent {
            percent_off: f64::NAN,
            amount_limit: None,
        };
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(DiscountKind::Percent.to_string(), "PERCENT");
        assert_eq!(Discount::Gift { balance: Money::zero() }.kind(), DiscountKind::Gift);
        assert_eq!(DiscountKind::from_discount_type("GIFT"), None);
    }

    #[test]
    fn test_ts_bindings_follow_wire_names() {
        let decl = DiscountSpec::decl();
        assert!(decl.contains("type?: string"), "{decl}");
        assert!(decl.contains("unit_off?: number"), "{decl}");
        assert!(!decl.contains("kind"), "{decl}");

        let decl = Voucher::decl();
        assert!(decl.contains("code?: string"), "{decl}");
    }

    #[test]
    fn test_serialization_skips_absent_fields() {
        let spec = DiscountSpec {
            kind: Some("AMOUNT".into()),
            amount_off: Some(Money::from_cents(1500)),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&spec).unwrap(),
            json!({ "type": "AMOUNT", "amount_off": 1500 })
        );
    }
}
