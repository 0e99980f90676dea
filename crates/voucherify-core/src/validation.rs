//! # Validation Module
//!
//! Input validation run before any request leaves the SDK.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller input (form, CLI flag)                                │
//! │  ├── THIS MODULE: code/campaign/email/amount checks                     │
//! │  └── Fails locally, nothing is sent                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: voucherify-client                                            │
//! │  ├── Credentials present?                                              │
//! │  └── Query/body encoding                                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Voucherify API                                               │
//! │  └── Business rules (expiry, quota, amount) → error `key`              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use voucherify_core::validation::{parse_amount_input, validate_code};
//!
//! assert_eq!(validate_code(" SUMMER \n20 ").unwrap(), "SUMMER20");
//! assert_eq!(parse_amount_input("10,50").unwrap().cents(), 1050);
//! ```

use regex::Regex;

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::MAX_CODE_LENGTH;

// =============================================================================
// Codes & Names
// =============================================================================

/// Strips every whitespace character (spaces, tabs, CR, LF) from a code.
///
/// Codes are often pasted from emails with stray line breaks or spaces in
/// the middle; the service never issues codes containing whitespace.
pub fn sanitize_code(code: &str) -> String {
    code.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Validates a voucher code and returns its sanitized form.
///
/// ## Rules
/// - Whitespace is stripped first
/// - Must not be empty afterwards
/// - At most 100 characters
///
/// ## Example
/// ```rust
/// use voucherify_core::validation::validate_code;
///
/// assert!(validate_code("SUMMER20").is_ok());
/// assert!(validate_code(" \r\n ").is_err());
/// ```
pub fn validate_code(code: &str) -> ValidationResult<String> {
    let code = sanitize_code(code);

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.chars().count() > MAX_CODE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: MAX_CODE_LENGTH,
        });
    }

    Ok(code)
}

/// Validates a campaign name for publishing. Returns the trimmed name.
pub fn validate_campaign(campaign: &str) -> ValidationResult<String> {
    required_trimmed("campaign", campaign)
}

/// Validates a tracked event name. Returns the trimmed name.
pub fn validate_event_name(event: &str) -> ValidationResult<String> {
    required_trimmed("event", event)
}

fn required_trimmed(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(value.to_string())
}

// =============================================================================
// Email
// =============================================================================

const EMAIL_PATTERN: &str = r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#;

/// Validates a customer email before it is published with a voucher.
///
/// ## Example
/// ```rust
/// use voucherify_core::validation::validate_email;
///
/// assert!(validate_email("jane@example.com").is_ok());
/// assert!(validate_email("jane@localhost").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    if email.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let pattern = Regex::new(EMAIL_PATTERN).map_err(|e| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: e.to_string(),
    })?;

    if !pattern.is_match(email) {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "not a valid email address".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Amounts
// =============================================================================

/// Parses an amount typed in major units into cents.
///
/// ## Rules
/// - `.` or the first `,` is the decimal separator (`"10,50"` → 1050)
/// - Fractions of a cent are truncated, never rounded up
/// - Must be a non-negative number
///
/// ## User Workflow
/// ```text
/// Shopper types "24,99" in the amount box
///      │
///      ▼
/// parse_amount_input("24,99") ← THIS FUNCTION
///      │
///      ▼
/// Money(2499) ──► validate?code=..&amount=2499
/// ```
pub fn parse_amount_input(input: &str) -> ValidationResult<Money> {
    let normalized = input.trim().replacen(',', ".", 1);

    if normalized.is_empty() {
        return Err(ValidationError::Required {
            field: "amount".to_string(),
        });
    }

    let value: f64 = normalized
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: format!("'{}' is not a number", input.trim()),
        })?;

    if value < 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(Money::from_major_truncated(value))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_code_strips_all_whitespace() {
        assert_eq!(sanitize_code(" AB C\r\n-12\t3 "), "ABC-123");
        assert_eq!(sanitize_code(""), "");
    }

    #[test]
    fn test_validate_code() {
        assert_eq!(validate_code("SUMMER20").unwrap(), "SUMMER20");
        assert_eq!(validate_code("SUM MER\n20").unwrap(), "SUMMER20");
        assert!(matches!(
            validate_code("  \n"),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_code(&"X".repeat(101)),
            Err(ValidationError::TooLong { max: 100, .. })
        ));
    }

    #[test]
    fn test_validate_campaign_and_event() {
        assert_eq!(validate_campaign(" Summer Sale ").unwrap(), "Summer Sale");
        assert!(validate_campaign("   ").is_err());
        assert_eq!(validate_event_name("checkout").unwrap(), "checkout");
        assert!(validate_event_name("").is_err());
    }

    #[test]
    fn test_email_pattern_compiles() {
        assert!(Regex::new(EMAIL_PATTERN).is_ok());
        match validate_email("jane@localhost") {
            Err(ValidationError::InvalidFormat { reason, .. }) => {
                assert_eq!(reason, "not a valid email address")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("jane.doe@example.com").is_ok());
        assert!(validate_email("jane+promo@mail.example.co.uk").is_ok());
        assert!(validate_email("ops@[192.168.0.1]").is_ok());

        assert!(matches!(
            validate_email(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_email("jane@localhost"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(validate_email("jane example.com").is_err());
        assert!(validate_email("jane@@example.com").is_err());
    }

    #[test]
    fn test_parse_amount_input() {
        assert_eq!(parse_amount_input("10,50").unwrap().cents(), 1050);
        assert_eq!(parse_amount_input("10.5").unwrap().cents(), 1050);
        assert_eq!(parse_amount_input(" 24.999 ").unwrap().cents(), 2499);
        assert_eq!(parse_amount_input("0").unwrap().cents(), 0);
    }

    #[test]
    fn test_parse_amount_input_rejects_garbage() {
        assert!(matches!(
            parse_amount_input(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            parse_amount_input("ten"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_amount_input("1,000,00"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_amount_input("-3"),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(parse_amount_input("inf").is_err());
    }
}
