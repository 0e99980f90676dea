//! # Error Types
//!
//! Domain-specific error types for voucherify-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  voucherify-core errors (this file)                                    │
//! │  ├── PricingError     - Malformed or unsupported voucher descriptor    │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── ApiErrorKey      - Error keys the service puts in error bodies    │
//! │                                                                         │
//! │  voucherify-client errors (separate crate)                             │
//! │  └── ClientError      - Configuration, transport, response shape       │
//! │                                                                         │
//! │  Flow: ValidationError → ClientError → ErrorObject → caller            │
//! │        PricingError    → raised synchronously to the caller            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (kind, field, value)
//! 3. Pricing errors abort the calculation; they are never swallowed

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::DiscountKind;

// =============================================================================
// Pricing Error
// =============================================================================

/// Errors raised by the pricing engine.
///
/// These are data errors in the voucher descriptor (or the caller's inputs),
/// not network errors, and are returned immediately from the calculation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// The descriptor names a known kind but its fields are out of range.
    ///
    /// ## When This Occurs
    /// - PERCENT with `percent_off` missing, zero, negative or above 100
    /// - AMOUNT with `amount_off` missing or not above zero
    /// - UNIT with `unit_off` missing or not above zero
    /// - GIFT with a negative balance
    #[error("Invalid voucher, {kind} discount {reason}")]
    InvalidDiscount { kind: DiscountKind, reason: String },

    /// The descriptor has neither a `discount` nor a `gift` object, or its
    /// discount `type` is not one this engine knows.
    #[error("Unsupported discount type: {0}")]
    UnsupportedDiscountType(String),

    /// The base price is negative or not a finite number.
    #[error("Invalid base price: {0}")]
    InvalidBasePrice(f64),

    /// A UNIT discount was priced without a unit price.
    #[error("Unit price is required for UNIT discounts")]
    MissingUnitPrice,

    /// The unit price is negative or not a finite number.
    #[error("Invalid unit price: {0}")]
    InvalidUnitPrice(f64),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur before a request is built, when caller input doesn't meet
/// requirements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g. malformed email, non-numeric amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value must not be negative.
    #[error("{field} must be positive")]
    MustBePositive { field: String },
}

// =============================================================================
// API Error Keys
// =============================================================================

/// Error keys the service returns in the `key` field of an error body.
///
/// ## User Workflow
/// ```text
/// validate({ code, amount }) ──► 400 { "key": "invalid_amount", ... }
///      │
///      ▼
/// ApiErrorKey::InvalidAmount.is_amount_error() == true
///      │
///      ▼
/// UI marks the AMOUNT field invalid instead of the CODE field
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApiErrorKey {
    InvalidAmount,
    InvalidNumber,
    MissingAmount,
    InvalidCustomerPhone,
    /// Any key this SDK doesn't interpret, kept verbatim.
    Other(String),
}

impl ApiErrorKey {
    /// Returns the wire representation of the key.
    pub fn as_str(&self) -> &str {
        match self {
            ApiErrorKey::InvalidAmount => "invalid_amount",
            ApiErrorKey::InvalidNumber => "invalid_number",
            ApiErrorKey::MissingAmount => "missing_amount",
            ApiErrorKey::InvalidCustomerPhone => "invalid_customer_phone",
            ApiErrorKey::Other(key) => key,
        }
    }

    /// Returns true when the service rejected the order amount rather than
    /// the voucher code.
    pub fn is_amount_error(&self) -> bool {
        matches!(
            self,
            ApiErrorKey::InvalidAmount | ApiErrorKey::InvalidNumber | ApiErrorKey::MissingAmount
        )
    }
}

impl From<String> for ApiErrorKey {
    fn from(key: String) -> Self {
        match key.as_str() {
            "invalid_amount" => ApiErrorKey::InvalidAmount,
            "invalid_number" => ApiErrorKey::InvalidNumber,
            "missing_amount" => ApiErrorKey::MissingAmount,
            "invalid_customer_phone" => ApiErrorKey::InvalidCustomerPhone,
            _ => ApiErrorKey::Other(key),
        }
    }
}

impl From<&str> for ApiErrorKey {
    fn from(key: &str) -> Self {
        ApiErrorKey::from(key.to_string())
    }
}

impl From<ApiErrorKey> for String {
    fn from(key: ApiErrorKey) -> Self {
        key.as_str().to_string()
    }
}

impl std::fmt::Display for ApiErrorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for pricing results.
pub type PricingResult<T> = Result<T, PricingError>;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
