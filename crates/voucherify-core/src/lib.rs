//! # voucherify-core: Pure Pricing Logic for the Voucherify SDK
//!
//! This crate holds everything in the SDK that does not touch the network:
//! the price/discount calculations, the voucher descriptor types the
//! service returns, and the input checks run before a request is built.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Voucherify SDK Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Caller (CLI, web front end, ...)                │   │
//! │  └───────────────┬─────────────────────────────────┬───────────────┘   │
//! │                  │ validate/redeem/...             │ final price       │
//! │  ┌───────────────▼─────────────────┐               │                   │
//! │  │        voucherify-client        │               │                   │
//! │  │  HTTP round-trip, shape checks  │               │                   │
//! │  └───────────────┬─────────────────┘               │                   │
//! │                  │ Voucher descriptor              │                   │
//! │  ┌───────────────▼─────────────────────────────────┴───────────────┐   │
//! │  │            ★ voucherify-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │ validation│  │   │
//! │  │   │  Voucher  │  │   Money   │  │  price    │  │  code     │  │   │
//! │  │   │  Discount │  │ round     │  │  discount │  │  email    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Voucher descriptors as sent by the service, and the
//!   validated [`Discount`] union
//! - [`money`] - Minor-unit `Money` and the price rounding rule
//! - [`pricing`] - `calculate_price` / `calculate_discount`
//! - [`validation`] - Input checks (codes, campaigns, emails, amounts)
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use voucherify_core::pricing::{calculate_discount, calculate_price};
//! use voucherify_core::Discount;
//!
//! let twenty_off = Discount::Percent { percent_off: 20.0, amount_limit: None };
//!
//! assert_eq!(calculate_price(100.0, &twenty_off, None).unwrap(), 80.0);
//! assert_eq!(calculate_discount(100.0, &twenty_off, None).unwrap(), 20.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use voucherify_core::Money` instead of
// `use voucherify_core::money::Money`

pub use error::{ApiErrorKey, PricingError, PricingResult, ValidationError};
pub use money::{round_money, Money};
pub use pricing::{calculate_discount, calculate_price};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length accepted for a voucher code after sanitizing.
pub const MAX_CODE_LENGTH: usize = 100;
