//! # Validation Module
//!
//! Input validation utilities shared by the submission client and the relay.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form session (horn-submit)                                   │
//! │  ├── Required contact fields, email shape                              │
//! │  └── Cart gate (empty cart, MOQ) - see `moq`                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Relay endpoint (relay-api)                                   │
//! │  ├── Message presence                                                  │
//! │  └── Per-field length limits, attachment size                          │
//! │                                                                         │
//! │  Each layer rejects what it can act on; the relay never trusts the     │
//! │  client.                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lengths are counted in characters, not bytes.

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 50 characters
/// - Should contain only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use horn_core::validation::validate_sku;
///
/// assert!(validate_sku("RHG-SN-101").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("A".repeat(100).as_str()).is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    validate_max_len("sku", sku, 50)?;

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name: non-empty, at most 200 characters.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_required("name", name)?;
    validate_max_len("name", name.trim(), 200)
}

/// Fails when `value` is empty after trimming.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Fails when `value` has more than `max` characters.
pub fn validate_max_len(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// Fails when `value` has fewer than `min` characters.
pub fn validate_min_len(field: &str, value: &str, min: usize) -> ValidationResult<()> {
    if value.chars().count() < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min,
        });
    }
    Ok(())
}

/// Shape check for an email address.
///
/// ## Rules
/// - Exactly one `@`, no whitespace
/// - Non-empty local part
/// - Domain contains a dot that is neither first nor last
///
/// Deliverability is not checked.
///
/// ## Example
/// ```rust
/// use horn_core::validation::validate_email;
///
/// assert!(validate_email("orders@risinghorn.com").is_ok());
/// assert!(validate_email("orders@localhost").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| invalid("must contain @"))?;

    if local.is_empty() || domain.contains('@') {
        return Err(invalid("must look like name@example.com"));
    }

    let dot = domain.rfind('.');
    match dot {
        Some(i) if i > 0 && i + 1 < domain.len() => Ok(()),
        _ => Err(invalid("domain must contain a dot")),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
