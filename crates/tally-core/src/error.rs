//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations (caller side)         │
//! │  └── ValidationError  - Field-level input failures                     │
//! │                                                                         │
//! │  tally-cli errors (app crate)                                          │
//! │  ├── ConfigError      - Bad environment configuration                  │
//! │  └── AppError         - What the command line reports                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → exit code              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Where Errors Come From
//! The totals engine ([`crate::line`], [`crate::totals`]) never returns an
//! error. Every variant here is raised by [`crate::validation`] or by the
//! document lifecycle in [`crate::document`], before or around the engine.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations detected by the calling layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Percent discount outside 0..=100, or a fixed discount larger than
    /// the amount it discounts.
    #[error("Invalid discount: {reason}")]
    InvalidDiscountRange { reason: String },

    /// Computed deposit is not within `0 < deposit <= total`.
    ///
    /// ## User Workflow
    /// ```text
    /// Set deposit: fixed $250.00
    ///      │
    ///      ▼
    /// Document total: $200.00
    ///      │
    ///      ▼
    /// InvalidDepositAmount { deposit_cents: 25000, total_cents: 20000 }
    ///      │
    ///      ▼
    /// UI shows: "Deposit cannot exceed the document total"
    /// ```
    #[error("Invalid deposit amount {deposit_cents} for document total {total_cents}")]
    InvalidDepositAmount {
        deposit_cents: i64,
        total_cents: i64,
    },

    /// Quantity or unit price below zero.
    #[error("Negative {field} is not allowed")]
    NegativeQuantityOrPrice { field: String },

    /// The document has been issued and its lines are frozen.
    #[error("Document {document_id} is issued, lines and pricing can no longer change")]
    DocumentFrozen { document_id: String },

    /// No line at the given position.
    #[error("Line {index} not found (document has {len} lines)")]
    LineNotFound { index: usize, len: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Human-readable message for end users.
    ///
    /// `Display` keeps the technical detail for logs; this is what a form
    /// shows next to the offending field.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::InvalidDepositAmount { deposit_cents, .. } if *deposit_cents <= 0 => {
                "Deposit must be greater than zero".to_string()
            }
            CoreError::InvalidDepositAmount { .. } => {
                "Deposit cannot exceed the document total".to_string()
            }
            CoreError::DocumentFrozen { .. } => {
                "This document has been issued and can no longer be edited".to_string()
            }
            other => other.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid currency code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidDepositAmount {
            deposit_cents: 25000,
            total_cents: 20000,
        };
        assert_eq!(
            err.to_string(),
            "Invalid deposit amount 25000 for document total 20000"
        );
        assert_eq!(
            err.user_message(),
            "Deposit cannot exceed the document total"
        );
    }

    #[test]
    fn test_zero_deposit_user_message() {
        let err = CoreError::InvalidDepositAmount {
            deposit_cents: 0,
            total_cents: 20000,
        };
        assert_eq!(err.user_message(), "Deposit must be greater than zero");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "tax name".to_string(),
        };
        assert_eq!(err.to_string(), "tax name is required");

        let err = ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: "0".to_string(),
            max: "100".to_string(),
        };
        assert_eq!(err.to_string(), "discount must be between 0 and 100");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
